//! Namespace-aware rendering of type references.
//!
//! A [`SymbolIndex`] records every declared type under its short name: the
//! catalog types plus the models and mixin interfaces that will be generated.
//! A [`SymbolResolver`] then renders [`ClrType`]s for one target namespace and
//! set of imports, emitting the bare name when C# would bind it to the right
//! declaration and a `global::`-anchored name otherwise.

use std::fmt::Write as _;

use indexmap::{IndexMap, IndexSet};
use log::{debug, trace};

use modelsbuilder_core::{
    catalog::TypeCatalog,
    clr_type::{ClrType, ModelTypeRef, NamedType},
    identifier::Id,
    model::TypeModel,
};

use crate::{config::BuilderConfig, error::BuilderError, graph::TypeGraph, select};

/// Where a declaration comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// A type from the [`TypeCatalog`].
    Catalog,
    /// A generated model, by type id.
    Model(i32),
    /// The interface of a generated mixin, by type id.
    MixinInterface(i32),
}

/// A declaration of a short name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Declaration {
    namespace: Id,
    origin: Origin,
}

impl Declaration {
    pub fn namespace(&self) -> Id {
        self.namespace
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }
}

/// Declarations of every known type, keyed by short name.
#[derive(Debug)]
pub struct SymbolIndex {
    symbols: IndexMap<Id, IndexSet<Declaration>>,
    models_namespace: Id,
}

impl SymbolIndex {
    /// Indexes the catalog types and everything generated from `graph`.
    ///
    /// Generated models and the `I{Name}` interfaces of generated mixins are
    /// declared in `models_namespace`.
    pub fn build(catalog: impl TypeCatalog, graph: &TypeGraph, models_namespace: Id) -> Self {
        let mut index = Self {
            symbols: IndexMap::new(),
            models_namespace,
        };

        for declared in catalog.declared_types() {
            index.declare(declared.name(), declared.namespace(), Origin::Catalog);
        }

        for model in select::models_to_generate(graph) {
            index.declare(
                Id::new(model.clr_name()),
                models_namespace,
                Origin::Model(model.id()),
            );
            if model.is_mixin() {
                index.declare(
                    Id::new(&interface_name(model)),
                    models_namespace,
                    Origin::MixinInterface(model.id()),
                );
            }
        }

        debug!(symbols = index.symbols.len(), models_namespace:%; "Symbol index built");
        index
    }

    pub fn models_namespace(&self) -> Id {
        self.models_namespace
    }

    /// Declarations of `symbol`, in indexing order.
    ///
    /// Names that were never interned have no declarations.
    pub fn declarations(&self, symbol: &str) -> impl Iterator<Item = &Declaration> {
        Id::lookup(symbol)
            .and_then(|symbol| self.symbols.get(&symbol))
            .into_iter()
            .flat_map(IndexSet::iter)
    }

    fn declare(&mut self, symbol: Id, namespace: Id, origin: Origin) {
        self.symbols
            .entry(symbol)
            .or_default()
            .insert(Declaration { namespace, origin });
    }
}

/// Name of the interface generated for a mixin.
pub(crate) fn interface_name(model: &TypeModel) -> String {
    format!("I{}", model.clr_name())
}

/// The namespace code is generated into and the namespaces it imports.
#[derive(Debug, Clone)]
pub struct ResolveContext {
    namespace: Id,
    imports: Vec<Id>,
}

impl ResolveContext {
    pub fn new(namespace: Id, imports: Vec<Id>) -> Self {
        Self { namespace, imports }
    }

    /// The context of files generated with `config`.
    pub fn from_config(config: &BuilderConfig) -> Self {
        Self::new(
            Id::new(config.models_namespace()),
            config.using().iter().map(|ns| Id::new(ns)).collect(),
        )
    }

    pub fn namespace(&self) -> Id {
        self.namespace
    }

    pub fn imports(&self) -> &[Id] {
        &self.imports
    }
}

/// Renders type references for one [`ResolveContext`].
///
/// # Examples
///
/// ```
/// use modelsbuilder::{
///     graph::TypeGraph,
///     resolve::{ResolveContext, SymbolIndex, SymbolResolver},
/// };
/// use modelsbuilder_core::{catalog::Catalog, clr_type::ClrType, identifier::Id};
///
/// let catalog = Catalog::new()
///     .with_type("System.Text", "StringBuilder")
///     .with_type("System.Collections.Generic", "List");
/// let graph = TypeGraph::new(Vec::new()).expect("empty graph");
/// let index = SymbolIndex::build(&catalog, &graph, Id::new("My.Models"));
/// let context = ResolveContext::new(Id::new("My.Models"), vec![Id::new("System.Text")]);
/// let resolver = SymbolResolver::new(&index, &graph, context);
///
/// let list = ClrType::generic(
///     "System.Collections.Generic",
///     "List",
///     vec![ClrType::named("System.Text", "StringBuilder")],
/// );
/// assert_eq!(
///     resolver.resolve(&list).unwrap(),
///     "global::System.Collections.Generic.List<StringBuilder>"
/// );
/// ```
#[derive(Debug)]
pub struct SymbolResolver<'a> {
    index: &'a SymbolIndex,
    graph: &'a TypeGraph,
    namespace: Id,
    visible: IndexSet<Id>,
}

impl<'a> SymbolResolver<'a> {
    pub fn new(index: &'a SymbolIndex, graph: &'a TypeGraph, context: ResolveContext) -> Self {
        let mut visible = IndexSet::with_capacity(context.imports.len() + 2);
        visible.insert(context.namespace);
        visible.extend(context.imports.iter().copied());
        visible.insert(Id::global());

        Self {
            index,
            graph,
            namespace: context.namespace,
            visible,
        }
    }

    /// The namespace code is generated into.
    pub fn namespace(&self) -> Id {
        self.namespace
    }

    /// Returns `true` if `symbol` declared in `namespace` must be qualified.
    ///
    /// The bare name is safe only when `namespace` is visible and the single
    /// visible declaration of `symbol` lives in `namespace`.
    pub fn is_ambiguous(&self, symbol: &str, namespace: Id) -> bool {
        if !self.visible.contains(&namespace) {
            return true;
        }

        let mut visible = self
            .index
            .declarations(symbol)
            .filter(|declaration| self.visible.contains(&declaration.namespace));

        match (visible.next(), visible.next()) {
            (None, _) => false,
            (Some(declaration), None) => declaration.namespace != namespace,
            (Some(_), Some(_)) => true,
        }
    }

    /// Renders `clr_type` as C# source.
    ///
    /// # Errors
    ///
    /// Returns `UnknownModelType` or `AmbiguousModelType` when a model
    /// placeholder does not designate exactly one generated model.
    pub fn resolve(&self, clr_type: &ClrType) -> Result<String, BuilderError> {
        let mut out = String::new();
        self.write_clr_type(&mut out, clr_type)?;
        Ok(out)
    }

    /// Appends the rendering of `clr_type` to `out`.
    ///
    /// # Errors
    ///
    /// See [`resolve`](Self::resolve).
    pub fn write_clr_type(&self, out: &mut String, clr_type: &ClrType) -> Result<(), BuilderError> {
        let start = out.len();
        match clr_type {
            ClrType::Named(named) => self.write_named(out, named)?,
            ClrType::Model(model_ref) => {
                let model = self.resolve_model(model_ref)?;
                self.write_model_symbol(out, model.clr_name())?;
            }
            ClrType::Array(element) => {
                self.write_clr_type(out, element)?;
                out.push_str("[]");
            }
        }
        trace!(clr_type:%, resolved = &out[start..]; "Resolved type reference");
        Ok(())
    }

    /// Finds the generated model a placeholder designates.
    ///
    /// # Errors
    ///
    /// See [`resolve`](Self::resolve).
    pub fn resolve_model(&self, model_ref: &ModelTypeRef) -> Result<&'a TypeModel, BuilderError> {
        let unknown = || BuilderError::UnknownModelType(model_ref.to_string());

        let model = match model_ref.item_type() {
            Some(item_type) => self
                .graph
                .find(model_ref.alias(), item_type)
                .ok_or_else(unknown)?,
            None => {
                let mut candidates = self.graph.by_alias(model_ref.alias());
                match (candidates.next(), candidates.next()) {
                    (None, _) => return Err(unknown()),
                    (Some(model), None) => model,
                    (Some(_), Some(_)) => {
                        return Err(BuilderError::AmbiguousModelType(model_ref.to_string()));
                    }
                }
            }
        };

        if !select::is_generated(self.graph, model) {
            return Err(unknown());
        }
        Ok(model)
    }

    /// Appends a symbol declared in the models namespace, such as a model
    /// class or a mixin interface.
    pub(crate) fn write_model_symbol(
        &self,
        out: &mut String,
        symbol: &str,
    ) -> Result<(), BuilderError> {
        self.write_symbol(out, self.index.models_namespace, symbol)
    }

    /// Appends the non-generic top-level type `symbol` declared in `namespace`.
    pub(crate) fn write_symbol(
        &self,
        out: &mut String,
        namespace: Id,
        symbol: &str,
    ) -> Result<(), BuilderError> {
        self.write_qualifier(out, symbol, namespace)?;
        out.push_str(symbol);
        Ok(())
    }

    /// Appends the name of the attribute class `{name}Attribute` declared in
    /// `namespace`, as written inside `[...]`.
    pub(crate) fn write_attribute_name(
        &self,
        out: &mut String,
        namespace: Id,
        name: &str,
    ) -> Result<(), BuilderError> {
        self.write_qualifier(out, &format!("{name}Attribute"), namespace)?;
        out.push_str(name);
        Ok(())
    }

    /// Appends `global::Namespace.` when `symbol` must be qualified.
    fn write_qualifier(&self, out: &mut String, symbol: &str, namespace: Id) -> Result<(), BuilderError> {
        if self.is_ambiguous(symbol, namespace) {
            out.push_str("global::");
            if !namespace.is_global() {
                write!(out, "{namespace}.")?;
            }
        }
        Ok(())
    }

    fn write_named(&self, out: &mut String, named: &NamedType) -> Result<(), BuilderError> {
        if let Some(keyword) = named.keyword() {
            out.push_str(keyword);
            return Ok(());
        }

        self.write_qualifier(out, named.outer_name(), named.namespace())?;
        named.write_source_path(out)?;

        if !named.args().is_empty() {
            out.push('<');
            for (i, arg) in named.args().iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                self.write_clr_type(out, arg)?;
            }
            out.push('>');
        }
        Ok(())
    }
}
