//! Models Builder - strongly-typed C# models for content types.
//!
//! Turns content type descriptions into C# partial classes (and interfaces
//! for mixins). Every referenced type name is rendered in the shortest form
//! that still binds to the intended declaration from the models namespace,
//! falling back to a `global::`-anchored name when the short one would be
//! ambiguous.

pub mod config;
pub mod graph;
pub mod resolve;
pub mod select;

mod emit;
mod error;

pub use modelsbuilder_core::{catalog, clr_type, identifier, model};
pub use modelsbuilder_parser as parser;

pub use error::BuilderError;

use log::{debug, info};

use catalog::TypeCatalog;
use clr_type::ClrType;
use config::BuilderConfig;
use emit::ModelWriter;
use graph::TypeGraph;
use identifier::Id;
use model::TypeModel;
use resolve::{ResolveContext, SymbolIndex, SymbolResolver};

/// Version of this crate, the default generator version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Builder for the source text of generated models.
///
/// A builder is configured once and is immutable afterwards; it can generate
/// any number of files, from any number of threads.
///
/// # Examples
///
/// ```
/// use modelsbuilder::{
///     TextBuilder,
///     catalog::Catalog,
///     clr_type::ClrType,
///     config::BuilderConfig,
///     model::{ItemType, PropertyModel, TypeModel},
/// };
///
/// let page = TypeModel::new(1, "page", "Page", ItemType::Content)
///     .with_property(PropertyModel::new("title", "Title", ClrType::string()));
///
/// let builder = TextBuilder::new(BuilderConfig::default(), vec![page], Catalog::standard())
///     .expect("Failed to prepare models");
///
/// let mut source = String::new();
/// for model in builder.models_to_generate() {
///     builder.generate(&mut source, model).expect("Failed to generate");
/// }
///
/// assert!(source.contains("public partial class Page : PublishedContentModel"));
/// assert!(source.contains("public string Title => this.Value<string>(_publishedValueFallback, \"title\");"));
/// ```
#[derive(Debug)]
pub struct TextBuilder {
    config: BuilderConfig,
    graph: TypeGraph,
    index: SymbolIndex,
    context: ResolveContext,
}

impl TextBuilder {
    /// Create a builder for the given content types.
    ///
    /// # Arguments
    ///
    /// * `config` - Namespace, imports, generator identity and mode
    /// * `types` - Every content type, including ignored ones
    /// * `catalog` - The types visible to generated code besides the models
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the types do not
    /// form a valid graph.
    pub fn new(
        config: BuilderConfig,
        types: Vec<TypeModel>,
        catalog: impl TypeCatalog,
    ) -> Result<Self, BuilderError> {
        config.validate()?;

        let graph = TypeGraph::with_mode(types, config.mode())?;
        let models_namespace = Id::new(config.models_namespace());
        let index = SymbolIndex::build(catalog, &graph, models_namespace);
        let context = ResolveContext::from_config(&config);

        info!(
            types = graph.len(),
            generated = select::models_to_generate(&graph).count(),
            models_namespace = config.models_namespace();
            "Text builder ready"
        );

        Ok(Self {
            config,
            graph,
            index,
            context,
        })
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    pub fn graph(&self) -> &TypeGraph {
        &self.graph
    }

    /// The types a model is generated for, in declaration order.
    pub fn models_to_generate(&self) -> impl Iterator<Item = &TypeModel> + Clone + '_ {
        select::models_to_generate(&self.graph)
    }

    /// A resolver rendering type names for the models namespace.
    pub fn resolver(&self) -> SymbolResolver<'_> {
        SymbolResolver::new(&self.index, &self.graph, self.context.clone())
    }

    /// Appends a complete source file for `model` to `out`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownModelType` if `model` is not generated by this builder,
    /// and resolution errors for its property types.
    pub fn generate(&self, out: &mut String, model: &TypeModel) -> Result<(), BuilderError> {
        self.generate_all(out, [model])
    }

    /// Appends one source file holding all `models` to `out`.
    ///
    /// The header, the `using` directives and the namespace are written once.
    ///
    /// # Errors
    ///
    /// See [`generate`](Self::generate).
    pub fn generate_all<'m>(
        &self,
        out: &mut String,
        models: impl IntoIterator<Item = &'m TypeModel>,
    ) -> Result<(), BuilderError> {
        let models = models
            .into_iter()
            .map(|model| self.generated_model(model))
            .collect::<Result<Vec<_>, _>>()?;

        let start = out.len();
        let writer = ModelWriter::new(&self.config, &self.graph, self.resolver());
        writer.write_file_start(out)?;
        for (i, model) in models.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            writer.write_model(out, model)?;
        }
        writer.write_file_end(out);

        debug!(models = models.len(), bytes = out.len() - start; "Generated source file");
        Ok(())
    }

    /// Appends `clr_type` rendered for the models namespace to `out`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownModelType` or `AmbiguousModelType` for model
    /// placeholders that do not designate exactly one generated model.
    pub fn write_clr_type(&self, out: &mut String, clr_type: &ClrType) -> Result<(), BuilderError> {
        self.resolver().write_clr_type(out, clr_type)
    }

    /// The graph's copy of `model`, which carries validation notes.
    fn generated_model(&self, model: &TypeModel) -> Result<&TypeModel, BuilderError> {
        self.graph
            .position(model)
            .map(|idx| &self.graph.types()[idx])
            .filter(|model| select::is_generated(&self.graph, model))
            .ok_or_else(|| BuilderError::UnknownModelType(model.alias().to_string()))
    }
}
