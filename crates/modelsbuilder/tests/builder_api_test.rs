//! Integration tests for the TextBuilder API
//!
//! These tests generate complete files through the public API and check the
//! emitted source text.

use modelsbuilder::{
    BuilderError, TextBuilder, VERSION,
    catalog::Catalog,
    clr_type::ClrType,
    config::{BuilderConfig, ModelsMode},
    model::{ItemType, PropertyModel, TypeModel},
    parser::parse_clr_type,
};

fn builder(types: Vec<TypeModel>) -> TextBuilder {
    TextBuilder::new(BuilderConfig::default(), types, Catalog::standard())
        .expect("Failed to create builder")
}

fn generate_first(builder: &TextBuilder) -> String {
    let model = builder
        .models_to_generate()
        .next()
        .expect("Nothing to generate");
    let mut out = String::new();
    builder
        .generate(&mut out, model)
        .expect("Failed to generate");
    out
}

fn generate_alias(builder: &TextBuilder, alias: &str) -> String {
    let model = builder
        .models_to_generate()
        .find(|model| model.alias() == alias)
        .expect("Model is not generated");
    let mut out = String::new();
    builder
        .generate(&mut out, model)
        .expect("Failed to generate");
    out
}

fn type1() -> TypeModel {
    TypeModel::new(1, "type1", "Type1", ItemType::Content)
}

const SIMPLE_TYPE: &str = "\
//------------------------------------------------------------------------------\n\
// <auto-generated>\n\
//   This code was generated by a tool.\n\
//\n\
//    Umbraco.ModelsBuilder.Embedded v{version}\n\
//\n\
//   Changes to this file will be lost if the code is regenerated.\n\
// </auto-generated>\n\
//------------------------------------------------------------------------------\n\
\n\
using System;\n\
using System.Linq.Expressions;\n\
using Umbraco.Cms.Core.Models.PublishedContent;\n\
using Umbraco.Cms.Core.PublishedCache;\n\
using Umbraco.Cms.ModelsBuilder.Embedded;\n\
using Umbraco.Cms.Core;\n\
using Umbraco.Extensions;\n\
\n\
namespace Umbraco.Cms.Web.Common.PublishedModels\n\
{\n\
\t[PublishedModel(\"type1\")]\n\
\tpublic partial class Type1 : PublishedContentModel\n\
\t{\n\
\t\t// helpers\n\
#pragma warning disable 0109 // new is redundant\n\
\t\t[global::System.CodeDom.Compiler.GeneratedCodeAttribute(\"Umbraco.ModelsBuilder.Embedded\", \"{version}\")]\n\
\t\tpublic new const string ModelTypeAlias = \"type1\";\n\
\t\t[global::System.CodeDom.Compiler.GeneratedCodeAttribute(\"Umbraco.ModelsBuilder.Embedded\", \"{version}\")]\n\
\t\tpublic new const PublishedItemType ModelItemType = PublishedItemType.Content;\n\
\t\t[global::System.CodeDom.Compiler.GeneratedCodeAttribute(\"Umbraco.ModelsBuilder.Embedded\", \"{version}\")]\n\
\t\tpublic new static IPublishedContentType GetModelContentType(IPublishedSnapshotAccessor publishedSnapshotAccessor)\n\
\t\t\t=> PublishedModelUtility.GetModelContentType(publishedSnapshotAccessor, ModelItemType, ModelTypeAlias);\n\
\t\t[global::System.CodeDom.Compiler.GeneratedCodeAttribute(\"Umbraco.ModelsBuilder.Embedded\", \"{version}\")]\n\
\t\tpublic static IPublishedPropertyType GetModelPropertyType<TValue>(IPublishedSnapshotAccessor publishedSnapshotAccessor, Expression<Func<Type1, TValue>> selector)\n\
\t\t\t=> PublishedModelUtility.GetModelPropertyType(GetModelContentType(publishedSnapshotAccessor), selector);\n\
#pragma warning restore 0109\n\
\n\
\t\tprivate IPublishedValueFallback _publishedValueFallback;\n\
\n\
\t\t// ctor\n\
\t\tpublic Type1(IPublishedContent content, IPublishedValueFallback publishedValueFallback)\n\
\t\t\t: base(content)\n\
\t\t{\n\
\t\t\t_publishedValueFallback = publishedValueFallback;\n\
\t\t}\n\
\n\
\t\t// properties\n\
\n\
\t\t[global::System.CodeDom.Compiler.GeneratedCodeAttribute(\"Umbraco.ModelsBuilder.Embedded\", \"{version}\")]\n\
\t\t[ImplementPropertyType(\"prop1\")]\n\
\t\tpublic string Prop1 => this.Value<string>(_publishedValueFallback, \"prop1\");\n\
\t}\n\
}\n";

#[test]
fn test_generate_simple_type() {
    let builder = builder(vec![
        type1().with_property(PropertyModel::new("prop1", "Prop1", ClrType::string())),
    ]);

    let generated = generate_first(&builder);
    assert_eq!(generated, SIMPLE_TYPE.replace("{version}", VERSION));
}

#[test]
fn test_generation_is_deterministic() {
    let types = || {
        vec![
            TypeModel::new(1, "seo", "Seo", ItemType::Content)
                .as_mixin()
                .with_property(PropertyModel::new("metaTitle", "MetaTitle", ClrType::string())),
            TypeModel::new(2, "page", "Page", ItemType::Content)
                .with_mixin("seo")
                .with_property(PropertyModel::new("title", "Title", ClrType::string())),
        ]
    };

    let first = builder(types());
    let second = builder(types());
    let mut a = String::new();
    let mut b = String::new();
    first
        .generate_all(&mut a, first.models_to_generate())
        .expect("Failed to generate");
    second
        .generate_all(&mut b, second.models_to_generate())
        .expect("Failed to generate");

    assert_eq!(a, b);
}

#[test]
fn test_same_short_name_in_generic_argument_is_qualified() {
    let builder = builder(vec![
        type1().with_property(PropertyModel::new(
            "foo",
            "Foo",
            parse_clr_type("System.Collections.Generic.IEnumerable<{foo:Element}>")
                .expect("Failed to parse type"),
        )),
        TypeModel::new(2, "foo", "Foo", ItemType::Content),
        TypeModel::new(3, "foo", "Foo", ItemType::Element),
    ]);

    let generated = generate_first(&builder);
    let expected_type = "global::System.Collections.Generic.IEnumerable<global::Umbraco.Cms.Web.Common.PublishedModels.Foo>";
    assert!(
        generated.contains(&format!(
            "\t\tpublic {expected_type} Foo => this.Value<{expected_type}>(_publishedValueFallback, \"foo\");\n"
        )),
        "Unexpected output:\n{generated}"
    );
}

#[test]
fn test_unqualified_placeholder_must_be_unique() {
    let builder = builder(vec![
        type1().with_property(PropertyModel::new("foo", "Foo", ClrType::model("foo"))),
        TypeModel::new(2, "foo", "Foo", ItemType::Content),
        TypeModel::new(3, "foo", "Foo", ItemType::Element),
    ]);

    let model = builder.models_to_generate().next().expect("type1");
    let mut out = String::new();
    assert!(matches!(
        builder.generate(&mut out, model),
        Err(BuilderError::AmbiguousModelType(_))
    ));
}

#[test]
fn test_primitives_render_as_keywords() {
    let builder = builder(Vec::new());

    for (source, expected) in [
        ("int", "int"),
        ("System.Int32", "int"),
        ("System.Boolean[]", "bool[]"),
        (
            "System.Collections.Generic.IEnumerable<int>",
            "global::System.Collections.Generic.IEnumerable<int>",
        ),
        (
            "System.Collections.Generic.Dictionary<string, System.Decimal>",
            "global::System.Collections.Generic.Dictionary<string, decimal>",
        ),
    ] {
        let clr_type = parse_clr_type(source).expect("Failed to parse type");
        let mut out = String::new();
        builder
            .write_clr_type(&mut out, &clr_type)
            .expect("Failed to resolve");
        assert_eq!(out, expected, "resolving {source}");
    }
}

#[test]
fn test_imported_namespace_allows_short_names() {
    let mut config = BuilderConfig::default();
    config
        .add_using("System.Collections.Generic")
        .expect("Failed to add using");
    let builder = TextBuilder::new(config, Vec::new(), Catalog::standard())
        .expect("Failed to create builder");

    let mut out = String::new();
    builder
        .write_clr_type(
            &mut out,
            &parse_clr_type("System.Collections.Generic.IEnumerable<int>").expect("Failed to parse"),
        )
        .expect("Failed to resolve");
    assert_eq!(out, "IEnumerable<int>");
}

#[test]
fn test_ambiguous_catalog_names() {
    let test_ns = "Site.Tests.ModelsBuilder";
    let catalog = Catalog::standard()
        .with_type(test_ns, "ASCIIEncoding")
        .with_type(test_ns, "BuilderClass");

    let mut config = BuilderConfig::default();
    config.set_models_namespace("SomeRandomNamespace").expect("Failed to set namespace");
    config.add_using("System.Text").expect("Failed to add using");
    config.add_using(test_ns).expect("Failed to add using");
    let builder = TextBuilder::new(config, Vec::new(), catalog).expect("Failed to create builder");

    let resolve = |clr_type: ClrType| {
        let mut out = String::new();
        builder
            .write_clr_type(&mut out, &clr_type)
            .expect("Failed to resolve");
        out
    };

    assert_eq!(
        resolve(ClrType::named("System.Text", "ASCIIEncoding")),
        "global::System.Text.ASCIIEncoding"
    );
    assert_eq!(
        resolve(ClrType::named(test_ns, "ASCIIEncoding")),
        "global::Site.Tests.ModelsBuilder.ASCIIEncoding"
    );
    assert_eq!(resolve(ClrType::named(test_ns, "BuilderClass")), "BuilderClass");
    assert_eq!(
        resolve(ClrType::named("System.Text", "StringBuilder")),
        "StringBuilder"
    );
}

#[test]
fn test_nested_types() {
    let test_ns = "Site.Tests.ModelsBuilder";
    let nested = ClrType::nested(test_ns, "ASCIIEncoding", ["Nested"]);
    let catalog = || Catalog::standard().with_type(test_ns, "ASCIIEncoding");

    let mut config = BuilderConfig::default();
    config.add_using(test_ns).expect("Failed to add using");
    let local = TextBuilder::new(config.clone(), Vec::new(), catalog())
        .expect("Failed to create builder");

    let mut out = String::new();
    local.write_clr_type(&mut out, &nested).expect("Failed to resolve");
    assert_eq!(out, "ASCIIEncoding.Nested");

    config.add_using("System.Text").expect("Failed to add using");
    let ambiguous =
        TextBuilder::new(config, Vec::new(), catalog()).expect("Failed to create builder");

    let mut out = String::new();
    ambiguous
        .write_clr_type(&mut out, &nested)
        .expect("Failed to resolve");
    assert_eq!(out, "global::Site.Tests.ModelsBuilder.ASCIIEncoding.Nested");
}

#[test]
fn test_unimported_namespaces_are_qualified() {
    let mut config = BuilderConfig::default();
    config
        .set_models_namespace("Umbraco.ModelsBuilder.Models")
        .expect("Failed to set namespace");
    let builder = TextBuilder::new(
        config,
        vec![
            type1()
                .as_mixin()
                .with_property(PropertyModel::new(
                    "prop1",
                    "Prop1",
                    ClrType::named("Umbraco.Cms.Core.Models.PublishedContent", "IPublishedContent"),
                ))
                .with_property(PropertyModel::new(
                    "prop2",
                    "Prop2",
                    ClrType::named("System.Text", "StringBuilder"),
                ))
                .with_property(PropertyModel::new(
                    "prop3",
                    "Prop3",
                    ClrType::named("Umbraco.Cms.Core.Exceptions", "BootFailedException"),
                )),
        ],
        Catalog::standard(),
    )
    .expect("Failed to create builder");

    let generated = generate_first(&builder);

    assert!(generated.contains(" IPublishedContent Prop1"));
    assert!(generated.contains(" global::System.Text.StringBuilder Prop2"));
    assert!(generated.contains(" global::Umbraco.Cms.Core.Exceptions.BootFailedException Prop3"));
}

#[test]
fn test_framework_types_are_qualified_without_usings() {
    let mut config = BuilderConfig::default();
    config.clear_using();
    let builder = TextBuilder::new(
        config,
        vec![
            TypeModel::new(1, "page", "Page", ItemType::Content).with_property(PropertyModel::new(
                "date",
                "D",
                ClrType::system("DateTime"),
            )),
        ],
        Catalog::standard(),
    )
    .expect("Failed to create builder");

    let generated = generate_first(&builder);
    let published = "global::Umbraco.Cms.Core.Models.PublishedContent";

    assert!(!generated.contains("\nusing "));
    assert!(generated.contains(&format!("\t[{published}.PublishedModel(\"page\")]\n")));
    assert!(generated.contains(&format!(
        "\tpublic partial class Page : {published}.PublishedContentModel\n"
    )));
    assert!(generated.contains(&format!(
        "\t\tpublic new const {published}.PublishedItemType ModelItemType = {published}.PublishedItemType.Content;\n"
    )));
    assert!(generated.contains(&format!(
        "\t\tpublic new static {published}.IPublishedContentType GetModelContentType(global::Umbraco.Cms.Core.PublishedCache.IPublishedSnapshotAccessor publishedSnapshotAccessor)\n"
    )));
    assert!(generated.contains(
        "\t\t\t=> global::Umbraco.Cms.ModelsBuilder.Embedded.PublishedModelUtility.GetModelContentType("
    ));
    assert!(generated.contains(
        "global::System.Linq.Expressions.Expression<global::System.Func<Page, TValue>> selector)\n"
    ));
    assert!(generated.contains(&format!(
        "\t\tprivate {published}.IPublishedValueFallback _publishedValueFallback;\n"
    )));
    assert!(generated.contains(&format!(
        "\t\tpublic Page({published}.IPublishedContent content, {published}.IPublishedValueFallback publishedValueFallback)\n"
    )));
    assert!(generated.contains(&format!("\t\t[{published}.ImplementPropertyType(\"date\")]\n")));
    assert!(generated.contains("\t\tpublic global::System.DateTime D => "));
}

#[test]
fn test_model_named_like_framework_type() {
    let builder = builder(vec![
        TypeModel::new(1, "func", "Func", ItemType::Content),
        TypeModel::new(2, "expression", "Expression", ItemType::Content),
    ]);
    let models = "global::Umbraco.Cms.Web.Common.PublishedModels";

    let func = generate_alias(&builder, "func");
    assert!(func.contains("\tpublic partial class Func : PublishedContentModel\n"));
    assert!(func.contains(&format!(
        "global::System.Linq.Expressions.Expression<global::System.Func<{models}.Func, TValue>> selector)"
    )));

    let expression = generate_alias(&builder, "expression");
    assert!(expression.contains(&format!(
        "global::System.Linq.Expressions.Expression<global::System.Func<{models}.Expression, TValue>> selector)"
    )));

    let page = TextBuilder::new(
        BuilderConfig::default(),
        vec![TypeModel::new(3, "page", "Page", ItemType::Content)],
        Catalog::standard(),
    )
    .expect("Failed to create builder");
    assert!(generate_first(&page).contains("Expression<Func<Page, TValue>> selector)"));
}

#[test]
fn test_single_string_property() {
    let builder = builder(vec![
        type1().with_property(PropertyModel::new("myTitle", "MyTitle", ClrType::string())),
    ]);

    let generated = generate_first(&builder);

    assert_eq!(generated.matches("[ImplementPropertyType(").count(), 1);
    assert!(generated.contains(
        "\t\tpublic string MyTitle => this.Value<string>(_publishedValueFallback, \"myTitle\");\n"
    ));
}

#[test]
fn test_object_property_omits_type_argument() {
    let builder = builder(vec![
        type1().with_property(PropertyModel::new("data", "Data", parse_clr_type("object").expect("object"))),
    ]);

    let generated = generate_first(&builder);
    assert!(generated.contains("\t\tpublic object Data => this.Value(_publishedValueFallback, \"data\");\n"));
}

#[test]
fn test_summaries() {
    let builder = builder(vec![
        TypeModel::new(1, "home", "Home", ItemType::Content)
            .with_name("Home <main>")
            .with_property(
                PropertyModel::new("title", "Title", ClrType::string())
                    .with_name("Title")
                    .with_description("Shown in\nthe browser tab"),
            ),
    ]);

    let generated = generate_first(&builder);

    assert!(generated.contains("\t/// <summary>Home {main}</summary>\n\t[PublishedModel(\"home\")]\n"));
    assert!(generated.contains(
        "\n\t\t///<summary>\n\t\t/// Title: Shown in the browser tab\n\t\t///</summary>\n\t\t[global::"
    ));
}

#[test]
fn test_properties_are_sorted_and_ignored_ones_skipped() {
    let builder = builder(vec![
        type1()
            .with_property(PropertyModel::new("zeta", "Zeta", ClrType::string()))
            .with_property(PropertyModel::new("hidden", "Hidden", ClrType::string()).ignored())
            .with_property(PropertyModel::new("alpha", "Alpha", ClrType::int32())),
    ]);

    let generated = generate_first(&builder);

    let alpha = generated.find("public int Alpha").expect("Alpha is generated");
    let zeta = generated.find("public string Zeta").expect("Zeta is generated");
    assert!(alpha < zeta);
    assert!(!generated.contains("Hidden"));
}

#[test]
fn test_element_type() {
    let builder = builder(vec![TypeModel::new(1, "card", "Card", ItemType::Element)]);

    let generated = generate_first(&builder);

    assert!(generated.contains("\tpublic partial class Card : PublishedElementModel\n"));
    assert!(generated.contains("PublishedItemType ModelItemType = PublishedItemType.Content;"));
    assert!(generated.contains(
        "\t\tpublic Card(IPublishedElement content, IPublishedValueFallback publishedValueFallback)\n\t\t\t: base(content, publishedValueFallback)\n"
    ));
}

#[test]
fn test_media_type() {
    let builder = builder(vec![TypeModel::new(1, "image", "Image", ItemType::Media)]);

    let generated = generate_first(&builder);
    assert!(generated.contains("PublishedItemType ModelItemType = PublishedItemType.Media;"));
}

#[test]
fn test_mixin_and_composed_type() {
    let builder = builder(vec![
        TypeModel::new(1, "seo", "Seo", ItemType::Content)
            .as_mixin()
            .with_property(PropertyModel::new("metaTitle", "MetaTitle", ClrType::string()).with_name("Meta title")),
        TypeModel::new(2, "page", "Page", ItemType::Content)
            .with_mixin("seo")
            .with_property(PropertyModel::new("title", "Title", ClrType::string())),
        TypeModel::new(3, "article", "Article", ItemType::Content).with_parent_id(2),
    ]);

    let seo = generate_alias(&builder, "seo");
    assert!(seo.contains(
        "\t// Mixin Content Type with alias \"seo\"\n\tpublic partial interface ISeo : IPublishedContent\n\t{\n"
    ));
    assert!(seo.contains("\t\t/// <summary>Meta title</summary>\n"));
    assert!(seo.contains("\t\tstring MetaTitle { get; }\n\t}\n\n"));
    assert!(seo.contains("\tpublic partial class Seo : PublishedContentModel, ISeo\n"));
    assert!(seo.contains("\t\tpublic string MetaTitle => GetMetaTitle(this, _publishedValueFallback);\n"));
    assert!(seo.contains("\t\t/// <summary>Static getter for Meta title</summary>\n"));
    assert!(seo.contains(
        "\t\tpublic static string GetMetaTitle(ISeo that, IPublishedValueFallback publishedValueFallback) => that.Value<string>(publishedValueFallback, \"metaTitle\");\n"
    ));

    let page = generate_alias(&builder, "page");
    assert!(page.contains("\tpublic partial class Page : PublishedContentModel, ISeo\n"));
    assert!(page.contains("\t\tpublic string MetaTitle => Seo.GetMetaTitle(this, _publishedValueFallback);\n"));
    assert!(!page.contains("interface"));

    let article = generate_alias(&builder, "article");
    assert!(article.contains("\tpublic partial class Article : Page\n"));
    assert!(!article.contains("MetaTitle"));
}

#[test]
fn test_mixin_extends_mixin_base() {
    let builder = builder(vec![
        TypeModel::new(1, "meta", "Meta", ItemType::Element).as_mixin(),
        TypeModel::new(2, "seo", "Seo", ItemType::Element)
            .as_mixin()
            .with_parent_id(1),
    ]);

    let seo = generate_alias(&builder, "seo");
    assert!(seo.contains("\tpublic partial interface ISeo : IMeta\n"));
    assert!(seo.contains("\tpublic partial class Seo : Meta, ISeo\n"));
}

#[test]
fn test_composition_only_mixins() {
    let builder = builder(vec![
        TypeModel::new(1, "meta", "Meta", ItemType::Content)
            .as_mixin()
            .with_property(PropertyModel::new("keywords", "Keywords", ClrType::string())),
        TypeModel::new(2, "nav", "Nav", ItemType::Content)
            .composition_only()
            .with_mixin("meta")
            .with_property(PropertyModel::new("menu", "Menu", ClrType::string())),
        TypeModel::new(3, "page", "Page", ItemType::Content).with_mixin("nav"),
    ]);

    let aliases: Vec<_> = builder.models_to_generate().map(TypeModel::alias).collect();
    assert_eq!(aliases, ["meta", "page"]);

    let page = generate_alias(&builder, "page");
    assert!(page.contains("\tpublic partial class Page : PublishedContentModel, IMeta\n"));
    assert!(!page.contains("INav"));
    assert!(page.contains("\t\tpublic string Menu => this.Value<string>(_publishedValueFallback, \"menu\");\n"));
    assert!(page.contains("\t\tpublic string Keywords => Meta.GetKeywords(this, _publishedValueFallback);\n"));
}

#[test]
fn test_referenced_composition_only_mixin_is_generated() {
    let builder = builder(vec![
        TypeModel::new(1, "card", "Card", ItemType::Element).composition_only(),
        TypeModel::new(2, "page", "Page", ItemType::Content).with_property(PropertyModel::new(
            "cards",
            "Cards",
            parse_clr_type("{card:Element}[]").expect("Failed to parse"),
        )),
    ]);

    assert_eq!(builder.models_to_generate().count(), 2);
    let page = generate_alias(&builder, "page");
    assert!(page.contains("\t\tpublic Card[] Cards => this.Value<Card[]>(_publishedValueFallback, \"cards\");\n"));
}

#[test]
fn test_in_memory_mode_comments_out_clashing_property() {
    let page = TypeModel::new(1, "page", "Page", ItemType::Content)
        .with_property(PropertyModel::new("page", "Page", ClrType::string()));

    let err = TextBuilder::new(BuilderConfig::default(), vec![page.clone()], Catalog::standard())
        .unwrap_err();
    assert!(matches!(err, BuilderError::PropertyNameClash { .. }));

    let mut config = BuilderConfig::default();
    config.set_mode(ModelsMode::InMemory);
    let builder =
        TextBuilder::new(config, vec![page], Catalog::standard()).expect("Failed to create builder");

    let generated = generate_first(&builder);
    assert!(generated.contains(
        "\t\t// properties\n\n\t\t/*\n\t\t * THIS PROPERTY CANNOT BE IMPLEMENTED, BECAUSE:\n\t\t *\n\t\t * The property name \"Page\" is the same as the name of\n"
    ));
    assert!(generated.contains(
        "\t\tpublic string Page => this.Value<string>(_publishedValueFallback, \"page\");\n\n\t\t *\n\t\t */\n"
    ));
}

#[test]
fn test_generate_all_writes_one_file() {
    let builder = builder(vec![
        TypeModel::new(1, "home", "Home", ItemType::Content),
        TypeModel::new(2, "news", "News", ItemType::Content),
    ]);

    let mut out = String::new();
    builder
        .generate_all(&mut out, builder.models_to_generate())
        .expect("Failed to generate");

    assert_eq!(out.matches("// <auto-generated>").count(), 1);
    assert_eq!(out.matches("namespace ").count(), 1);
    assert!(out.contains("\t}\n\n\t[PublishedModel(\"news\")]\n"));
    assert!(out.ends_with("\t}\n}\n"));
}

#[test]
fn test_config_from_toml() {
    let config = BuilderConfig::from_toml_str(
        r#"
        models_namespace = "Site.Models"
        using = ["System", "Site.Core"]

        [generator]
        name = "Site.Generator"
        version = "9.9.9"
        "#,
    )
    .expect("Failed to load config");
    let builder =
        TextBuilder::new(config, vec![type1()], Catalog::standard()).expect("Failed to create builder");

    let generated = generate_first(&builder);
    assert!(generated.contains("//    Site.Generator v9.9.9\n"));
    assert!(generated.contains("\nusing System;\nusing Site.Core;\n\nnamespace Site.Models\n{\n"));
    assert!(generated.contains("GeneratedCodeAttribute(\"Site.Generator\", \"9.9.9\")"));
}
