//! Example: Generating models for a small site
//!
//! This example describes a few content types in code, loads the builder
//! configuration from TOML and prints one source file holding every model.

use modelsbuilder::{
    TextBuilder,
    catalog::Catalog,
    clr_type::ClrType,
    config::BuilderConfig,
    model::{ItemType, PropertyModel, TypeModel},
    parser::parse_clr_type,
};

const CONFIG: &str = r#"
models_namespace = "Site.Models"
mode = "source_code"

[generator]
name = "Site.ModelsGenerator"
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = BuilderConfig::from_toml_str(CONFIG)?;

    // A mixin shared by every page
    let seo = TypeModel::new(1, "seo", "Seo", ItemType::Content)
        .as_mixin()
        .with_name("SEO")
        .with_property(
            PropertyModel::new("metaTitle", "MetaTitle", ClrType::string())
                .with_name("Meta title")
                .with_description("Used for the <title> tag"),
        );

    // A block only used inside pages
    let card = TypeModel::new(2, "card", "Card", ItemType::Element)
        .composition_only()
        .with_property(PropertyModel::new("heading", "Heading", ClrType::string()))
        .with_property(PropertyModel::new("link", "Link", parse_clr_type("System.Uri")?));

    let page = TypeModel::new(3, "page", "Page", ItemType::Content)
        .with_name("Page")
        .with_mixin("seo")
        .with_property(PropertyModel::new("title", "Title", ClrType::string()))
        .with_property(PropertyModel::new(
            "cards",
            "Cards",
            parse_clr_type("System.Collections.Generic.IEnumerable<{card:Element}>")?,
        ))
        .with_property(PropertyModel::new("publishedOn", "PublishedOn", parse_clr_type("System.DateTime")?));

    let article = TypeModel::new(4, "article", "Article", ItemType::Content)
        .with_parent_id(3)
        .with_property(PropertyModel::new("body", "Body", parse_clr_type("string")?));

    let builder = TextBuilder::new(config, vec![seo, card, page, article], Catalog::standard())?;

    println!("Generating models:");
    for model in builder.models_to_generate() {
        println!("  {} ({})", model.clr_name(), model.item_type());
    }
    println!();

    let mut source = String::new();
    builder.generate_all(&mut source, builder.models_to_generate())?;
    print!("{source}");

    Ok(())
}
