//! Source text emission for generated models.
//!
//! [`ModelWriter`] appends the C# text of one file: the auto-generated
//! header, `using` directives, the namespace block and, for each model, the
//! mixin interface (if any) and the partial class. Every type name goes
//! through the [`SymbolResolver`], so references are qualified exactly when
//! they would otherwise be ambiguous.

use std::{fmt::Write as _, ptr};

use log::debug;

use modelsbuilder_core::{
    identifier::Id,
    model::{PropertyModel, TypeModel},
};

use crate::{
    config::BuilderConfig,
    error::BuilderError,
    graph::TypeGraph,
    resolve::{SymbolResolver, interface_name},
    select,
};

/// Width after which error messages are wrapped at the next space.
const ERROR_LINE_WIDTH: usize = 50;

const SYSTEM: &str = "System";
const LINQ_EXPRESSIONS: &str = "System.Linq.Expressions";
const PUBLISHED_CONTENT: &str = "Umbraco.Cms.Core.Models.PublishedContent";
const PUBLISHED_CACHE: &str = "Umbraco.Cms.Core.PublishedCache";
const MODELS_BUILDER: &str = "Umbraco.Cms.ModelsBuilder.Embedded";

/// The published content abstraction a model wraps.
fn published_interface(model: &TypeModel) -> &'static str {
    if model.is_element() {
        "IPublishedElement"
    } else {
        "IPublishedContent"
    }
}

/// Base class of models without a base model.
fn published_base_class(model: &TypeModel) -> &'static str {
    if model.is_element() {
        "PublishedElementModel"
    } else {
        "PublishedContentModel"
    }
}

/// Writes generated source for one file.
pub(crate) struct ModelWriter<'a> {
    config: &'a BuilderConfig,
    graph: &'a TypeGraph,
    resolver: SymbolResolver<'a>,
}

impl<'a> ModelWriter<'a> {
    pub(crate) fn new(
        config: &'a BuilderConfig,
        graph: &'a TypeGraph,
        resolver: SymbolResolver<'a>,
    ) -> Self {
        Self {
            config,
            graph,
            resolver,
        }
    }

    /// Writes the header, the `using` directives and opens the namespace.
    pub(crate) fn write_file_start(&self, out: &mut String) -> Result<(), BuilderError> {
        let generator = self.config.generator();
        let rule = "//------------------------------------------------------------------------------\n";

        out.push_str(rule);
        out.push_str("// <auto-generated>\n");
        out.push_str("//   This code was generated by a tool.\n");
        out.push_str("//\n");
        writeln!(out, "//    {} v{}", generator.name(), generator.version())?;
        out.push_str("//\n");
        out.push_str("//   Changes to this file will be lost if the code is regenerated.\n");
        out.push_str("// </auto-generated>\n");
        out.push_str(rule);
        out.push('\n');

        for namespace in self.config.using() {
            writeln!(out, "using {namespace};")?;
        }
        out.push('\n');

        writeln!(out, "namespace {}", self.config.models_namespace())?;
        out.push_str("{\n");
        Ok(())
    }

    /// Closes the namespace.
    pub(crate) fn write_file_end(&self, out: &mut String) {
        out.push_str("}\n");
    }

    /// Writes the mixin interface, if any, and the class of `model`.
    pub(crate) fn write_model(&self, out: &mut String, model: &'a TypeModel) -> Result<(), BuilderError> {
        debug!(alias = model.alias(), item_type:% = model.item_type(); "Writing model");
        if model.is_mixin() {
            self.write_mixin_interface(out, model)?;
        }
        self.write_class(out, model)
    }

    fn write_mixin_interface(&self, out: &mut String, model: &'a TypeModel) -> Result<(), BuilderError> {
        writeln!(out, "\t// Mixin Content Type with alias \"{}\"", model.alias())?;
        if let Some(name) = model.name() {
            writeln!(out, "\t/// <summary>{}</summary>", xml_comment(name))?;
        }

        write!(out, "\tpublic partial interface {} : ", interface_name(model))?;
        let base = self
            .graph
            .base_type(model)
            .filter(|base| base.is_mixin() && select::is_generated(self.graph, base));
        match base {
            Some(base) => self.resolver.write_model_symbol(out, &interface_name(base))?,
            None => self.write_framework(out, PUBLISHED_CONTENT, published_interface(model))?,
        }
        for mixin in self.lifted_interfaces(model, self.graph.declaring_interfaces(model)) {
            out.push_str(", ");
            self.resolver.write_model_symbol(out, &interface_name(mixin))?;
        }
        out.push_str("\n\t{\n");

        for (i, property) in sorted_properties(model).into_iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            if let Some(name) = property.name() {
                writeln!(out, "\t\t/// <summary>{}</summary>", xml_comment(name))?;
            }
            self.write_generated_code_attribute(out)?;
            out.push_str("\t\t");
            self.resolver.write_clr_type(out, property.model_clr_type())?;
            writeln!(out, " {} {{ get; }}", property.clr_name())?;
        }

        out.push_str("\t}\n\n");
        Ok(())
    }

    fn write_class(&self, out: &mut String, model: &'a TypeModel) -> Result<(), BuilderError> {
        let clr_name = model.clr_name();

        if let Some(name) = model.name() {
            writeln!(out, "\t/// <summary>{}</summary>", xml_comment(name))?;
        }
        out.push_str("\t[");
        self.resolver
            .write_attribute_name(out, Id::new(PUBLISHED_CONTENT), "PublishedModel")?;
        writeln!(out, "(\"{}\")]", model.alias())?;

        write!(out, "\tpublic partial class {clr_name} : ")?;
        match self.graph.base_type(model) {
            Some(base) => self.resolver.write_model_symbol(out, base.clr_name())?,
            None => self.write_framework(out, PUBLISHED_CONTENT, published_base_class(model))?,
        }
        if model.is_mixin() {
            out.push_str(", ");
            self.resolver.write_model_symbol(out, &interface_name(model))?;
        } else {
            for mixin in self.lifted_interfaces(model, self.graph.declaring_interfaces(model)) {
                out.push_str(", ");
                self.resolver.write_model_symbol(out, &interface_name(mixin))?;
            }
        }
        out.push_str("\n\t{\n");

        self.write_helpers(out, model)?;

        out.push_str("\t\tprivate ");
        self.write_framework(out, PUBLISHED_CONTENT, "IPublishedValueFallback")?;
        out.push_str(" _publishedValueFallback;\n\n");
        out.push_str("\t\t// ctor\n");
        write!(out, "\t\tpublic {clr_name}(")?;
        self.write_framework(out, PUBLISHED_CONTENT, published_interface(model))?;
        out.push_str(" content, ");
        self.write_framework(out, PUBLISHED_CONTENT, "IPublishedValueFallback")?;
        out.push_str(" publishedValueFallback)\n");
        let base_args = if model.is_element() {
            ", publishedValueFallback"
        } else {
            ""
        };
        writeln!(out, "\t\t\t: base(content{base_args})")?;
        out.push_str("\t\t{\n");
        out.push_str("\t\t\t_publishedValueFallback = publishedValueFallback;\n");
        out.push_str("\t\t}\n\n");

        out.push_str("\t\t// properties\n");
        let own_mixin = model.is_mixin().then_some(model);
        for property in sorted_properties(model) {
            self.write_property(out, property, own_mixin)?;
        }

        let mut implementing: Vec<_> = self.graph.implementing_interfaces(model).collect();
        implementing.sort_by(|a, b| a.clr_name().cmp(b.clr_name()));
        for mixin in implementing {
            let generated = select::is_generated(self.graph, mixin);
            for property in sorted_properties(mixin) {
                if generated {
                    self.write_mixin_property(out, mixin, property)?;
                } else {
                    self.write_property(out, property, None)?;
                }
            }
        }

        out.push_str("\t}\n");
        Ok(())
    }

    fn write_helpers(&self, out: &mut String, model: &TypeModel) -> Result<(), BuilderError> {
        // Elements are published as content.
        let item_type = if model.is_element() {
            "Content"
        } else {
            model.item_type().as_str()
        };

        out.push_str("\t\t// helpers\n");
        out.push_str("#pragma warning disable 0109 // new is redundant\n");
        self.write_generated_code_attribute(out)?;
        writeln!(
            out,
            "\t\tpublic new const string ModelTypeAlias = \"{}\";",
            model.alias()
        )?;

        self.write_generated_code_attribute(out)?;
        out.push_str("\t\tpublic new const ");
        self.write_framework(out, PUBLISHED_CONTENT, "PublishedItemType")?;
        out.push_str(" ModelItemType = ");
        self.write_framework(out, PUBLISHED_CONTENT, "PublishedItemType")?;
        writeln!(out, ".{item_type};")?;

        self.write_generated_code_attribute(out)?;
        out.push_str("\t\tpublic new static ");
        self.write_framework(out, PUBLISHED_CONTENT, "IPublishedContentType")?;
        out.push_str(" GetModelContentType(");
        self.write_framework(out, PUBLISHED_CACHE, "IPublishedSnapshotAccessor")?;
        out.push_str(" publishedSnapshotAccessor)\n\t\t\t=> ");
        self.write_framework(out, MODELS_BUILDER, "PublishedModelUtility")?;
        out.push_str(".GetModelContentType(publishedSnapshotAccessor, ModelItemType, ModelTypeAlias);\n");

        self.write_generated_code_attribute(out)?;
        out.push_str("\t\tpublic static ");
        self.write_framework(out, PUBLISHED_CONTENT, "IPublishedPropertyType")?;
        out.push_str(" GetModelPropertyType<TValue>(");
        self.write_framework(out, PUBLISHED_CACHE, "IPublishedSnapshotAccessor")?;
        out.push_str(" publishedSnapshotAccessor, ");
        self.write_framework(out, LINQ_EXPRESSIONS, "Expression")?;
        out.push('<');
        self.write_framework(out, SYSTEM, "Func")?;
        out.push('<');
        self.resolver.write_model_symbol(out, model.clr_name())?;
        out.push_str(", TValue>> selector)\n\t\t\t=> ");
        self.write_framework(out, MODELS_BUILDER, "PublishedModelUtility")?;
        out.push_str(".GetModelPropertyType(GetModelContentType(publishedSnapshotAccessor), selector);\n");
        out.push_str("#pragma warning restore 0109\n\n");
        Ok(())
    }

    /// Writes a property implemented on the class itself.
    ///
    /// A mixin's own properties delegate to a static getter taking the mixin
    /// interface, so composed types can share the implementation.
    fn write_property(
        &self,
        out: &mut String,
        property: &PropertyModel,
        mixin: Option<&TypeModel>,
    ) -> Result<(), BuilderError> {
        let clr_name = property.clr_name();
        let has_errors = !property.errors().is_empty();

        out.push('\n');
        if has_errors {
            write_error_block(out, property.errors());
        }

        write_property_summary(out, property);
        self.write_generated_code_attribute(out)?;
        self.write_implement_property_type(out, property)?;
        out.push_str("\t\tpublic ");
        self.resolver.write_clr_type(out, property.model_clr_type())?;
        if mixin.is_some() {
            writeln!(out, " {clr_name} => Get{clr_name}(this, _publishedValueFallback);")?;
        } else {
            write!(out, " {clr_name} => this.Value")?;
            self.write_value_type_argument(out, property)?;
            writeln!(out, "(_publishedValueFallback, \"{}\");", property.alias())?;
        }

        if has_errors {
            out.push_str("\n\t\t *\n\t\t */\n");
        }

        let Some(mixin) = mixin else {
            return Ok(());
        };

        out.push('\n');
        if let Some(name) = property.name() {
            writeln!(out, "\t\t/// <summary>Static getter for {}</summary>", xml_comment(name))?;
        }
        self.write_generated_code_attribute(out)?;
        out.push_str("\t\tpublic static ");
        self.resolver.write_clr_type(out, property.model_clr_type())?;
        write!(out, " Get{clr_name}(")?;
        self.resolver.write_model_symbol(out, &interface_name(mixin))?;
        out.push_str(" that, ");
        self.write_framework(out, PUBLISHED_CONTENT, "IPublishedValueFallback")?;
        out.push_str(" publishedValueFallback) => that.Value");
        self.write_value_type_argument(out, property)?;
        writeln!(out, "(publishedValueFallback, \"{}\");", property.alias())?;
        Ok(())
    }

    /// Writes a property of a generated mixin, delegating to its static getter.
    fn write_mixin_property(
        &self,
        out: &mut String,
        mixin: &TypeModel,
        property: &PropertyModel,
    ) -> Result<(), BuilderError> {
        out.push('\n');
        write_property_summary(out, property);
        self.write_generated_code_attribute(out)?;
        self.write_implement_property_type(out, property)?;
        out.push_str("\t\tpublic ");
        self.resolver.write_clr_type(out, property.model_clr_type())?;
        write!(out, " {} => ", property.clr_name())?;
        self.resolver.write_model_symbol(out, mixin.clr_name())?;
        writeln!(out, ".Get{}(this, _publishedValueFallback);", property.clr_name())?;
        Ok(())
    }

    /// Writes `<T>` for `Value<T>(...)` calls; omitted for `object`.
    fn write_value_type_argument(
        &self,
        out: &mut String,
        property: &PropertyModel,
    ) -> Result<(), BuilderError> {
        if property.model_clr_type().is_object() {
            return Ok(());
        }
        out.push('<');
        self.resolver.write_clr_type(out, property.model_clr_type())?;
        out.push('>');
        Ok(())
    }

    /// Writes a framework type declared in `namespace`.
    fn write_framework(
        &self,
        out: &mut String,
        namespace: &str,
        symbol: &str,
    ) -> Result<(), BuilderError> {
        self.resolver.write_symbol(out, Id::new(namespace), symbol)
    }

    fn write_implement_property_type(
        &self,
        out: &mut String,
        property: &PropertyModel,
    ) -> Result<(), BuilderError> {
        out.push_str("\t\t[");
        self.resolver.write_attribute_name(
            out,
            Id::new(PUBLISHED_CONTENT),
            "ImplementPropertyType",
        )?;
        writeln!(out, "(\"{}\")]", property.alias())?;
        Ok(())
    }

    fn write_generated_code_attribute(&self, out: &mut String) -> Result<(), BuilderError> {
        let generator = self.config.generator();
        writeln!(
            out,
            "\t\t[global::System.CodeDom.Compiler.GeneratedCodeAttribute(\"{}\", \"{}\")]",
            generator.name(),
            generator.version()
        )?;
        Ok(())
    }

    /// Replaces mixins without a generated interface by the generated mixins
    /// they are composed of, dropping interfaces the base chain of `model`
    /// already implements. Sorted by CLR name.
    fn lifted_interfaces(
        &self,
        model: &TypeModel,
        mixins: impl Iterator<Item = &'a TypeModel>,
    ) -> Vec<&'a TypeModel> {
        let mut pending: Vec<&TypeModel> = mixins.collect();
        let mut lifted: Vec<&TypeModel> = Vec::with_capacity(pending.len());

        while let Some(mixin) = pending.pop() {
            if self.graph.inherits_interface(model, mixin) {
                continue;
            }
            if select::is_generated(self.graph, mixin) {
                if !lifted.iter().any(|seen| ptr::eq(*seen, mixin)) {
                    lifted.push(mixin);
                }
            } else {
                pending.extend(self.graph.mixins(mixin));
            }
        }

        lifted.sort_by(|a, b| a.clr_name().cmp(b.clr_name()));
        lifted
    }
}

/// Non-ignored properties of `model`, ordered by CLR name.
fn sorted_properties(model: &TypeModel) -> Vec<&PropertyModel> {
    let mut properties: Vec<_> = model.properties().iter().filter(|p| !p.is_ignored()).collect();
    properties.sort_by(|a, b| a.clr_name().cmp(b.clr_name()));
    properties
}

fn write_property_summary(out: &mut String, property: &PropertyModel) {
    let (name, description) = (property.name(), property.description());
    if name.is_none() && description.is_none() {
        return;
    }

    out.push_str("\t\t///<summary>\n");
    out.push_str("\t\t/// ");
    out.push_str(&xml_comment(name.unwrap_or_default()));
    if let Some(description) = description {
        out.push_str(": ");
        out.push_str(&xml_comment(description));
    }
    out.push('\n');
    out.push_str("\t\t///</summary>\n");
}

/// Opens the comment that disables a property which cannot be implemented.
fn write_error_block(out: &mut String, errors: &[String]) {
    out.push_str("\t\t/*\n");
    out.push_str("\t\t * THIS PROPERTY CANNOT BE IMPLEMENTED, BECAUSE:\n");
    out.push_str("\t\t *\n");
    for (i, error) in errors.iter().enumerate() {
        if i > 0 {
            out.push_str("\t\t *\n");
        }
        for line in split_error(error) {
            out.push_str("\t\t * ");
            out.push_str(line);
            out.push('\n');
        }
    }
    out.push_str("\t\t *\n");
    out.push('\n');
}

/// Splits `error` into lines of at least [`ERROR_LINE_WIDTH`] characters,
/// breaking at the first space past that width.
fn split_error(error: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = error.char_indices().collect();
    let mut lines = Vec::new();
    let mut p = 0;

    while p < chars.len() {
        let mut n = p + ERROR_LINE_WIDTH;
        while n < chars.len() && chars[n].1 != ' ' {
            n += 1;
        }
        if n >= chars.len() {
            break;
        }
        lines.push(&error[chars[p].0..chars[n].0]);
        p = n + 1;
    }
    if p < chars.len() {
        lines.push(&error[chars[p].0..]);
    }
    lines
}

/// Makes `text` safe to embed in a single-line XML doc comment.
fn xml_comment(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '<' => '{',
            '>' => '}',
            '\r' | '\n' => ' ',
            c => c,
        })
        .collect()
}
