//! Configuration for generating models.
//!
//! [`BuilderConfig`] holds everything that shapes the generated text apart from
//! the content types themselves: the namespace the models are written into,
//! the `using` directives, the generator identity stamped into headers and
//! attributes, and the [`ModelsMode`]. All types implement
//! [`serde::Deserialize`] so the configuration can be loaded from TOML.
//!
//! Setters validate their input, so a configuration that was built without
//! errors never fails later while rendering.
//!
//! # Example
//!
//! ```
//! # use modelsbuilder::config::{BuilderConfig, ModelsMode};
//! let config = BuilderConfig::from_toml_str(
//!     r#"
//!     models_namespace = "My.Site.Models"
//!     mode = "in_memory"
//!
//!     [generator]
//!     version = "1.2.3"
//!     "#,
//! )
//! .expect("valid configuration");
//!
//! assert_eq!(config.models_namespace(), "My.Site.Models");
//! assert_eq!(config.mode(), ModelsMode::InMemory);
//! assert_eq!(config.generator().version(), "1.2.3");
//! assert_eq!(config.using().len(), 7);
//! ```

use indexmap::IndexSet;
use log::debug;
use serde::Deserialize;

use crate::error::BuilderError;

/// Namespace models are generated into when none is configured.
pub const DEFAULT_MODELS_NAMESPACE: &str = "Umbraco.Cms.Web.Common.PublishedModels";

/// Generator name written into headers and `GeneratedCodeAttribute`s.
pub const DEFAULT_GENERATOR_NAME: &str = "Umbraco.ModelsBuilder.Embedded";

/// Namespaces imported by every generated file, in order.
pub const DEFAULT_USING: [&str; 7] = [
    "System",
    "System.Linq.Expressions",
    "Umbraco.Cms.Core.Models.PublishedContent",
    "Umbraco.Cms.Core.PublishedCache",
    "Umbraco.Cms.ModelsBuilder.Embedded",
    "Umbraco.Cms.Core",
    "Umbraco.Extensions",
];

fn default_models_namespace() -> String {
    DEFAULT_MODELS_NAMESPACE.to_string()
}

fn default_using() -> Vec<String> {
    DEFAULT_USING.iter().map(|ns| ns.to_string()).collect()
}

fn default_generator_name() -> String {
    DEFAULT_GENERATOR_NAME.to_string()
}

fn default_generator_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// How generated models are consumed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelsMode {
    /// Models are written out as source files. Invalid content types are
    /// rejected.
    #[default]
    SourceCode,

    /// Models are compiled in memory. Properties that cannot be implemented
    /// are emitted commented out instead of failing the whole generation.
    InMemory,
}

/// Identity of the generator, stamped into generated code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_generator_name")]
    name: String,

    #[serde(default = "default_generator_version")]
    version: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            name: default_generator_name(),
            version: default_generator_version(),
        }
    }
}

impl GeneratorConfig {
    /// Creates a generator identity.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the name or the version is blank.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Result<Self, BuilderError> {
        let generator = Self {
            name: name.into(),
            version: version.into(),
        };
        generator.validate()?;
        Ok(generator)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    fn validate(&self) -> Result<(), BuilderError> {
        if self.name.trim().is_empty() {
            return Err(BuilderError::invalid_config("generator name is empty"));
        }
        if self.version.trim().is_empty() {
            return Err(BuilderError::invalid_config("generator version is empty"));
        }
        Ok(())
    }
}

/// Configuration of a [`TextBuilder`](crate::TextBuilder).
#[derive(Debug, Clone, Deserialize)]
pub struct BuilderConfig {
    /// Namespace the models are generated into.
    #[serde(default = "default_models_namespace")]
    models_namespace: String,

    /// Imported namespaces, written as `using` directives in order.
    #[serde(default = "default_using")]
    using: Vec<String>,

    #[serde(default)]
    generator: GeneratorConfig,

    #[serde(default)]
    mode: ModelsMode,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            models_namespace: default_models_namespace(),
            using: default_using(),
            generator: GeneratorConfig::default(),
            mode: ModelsMode::default(),
        }
    }
}

impl BuilderConfig {
    /// Loads a configuration from TOML text. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `Toml` for malformed TOML and `InvalidConfig` or `TypeName` for
    /// values that would be rejected by the setters.
    pub fn from_toml_str(source: &str) -> Result<Self, BuilderError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        debug!(
            models_namespace = config.models_namespace.as_str(),
            using_count = config.using.len();
            "Loaded builder configuration"
        );
        Ok(config)
    }

    pub fn models_namespace(&self) -> &str {
        &self.models_namespace
    }

    pub fn using(&self) -> &[String] {
        &self.using
    }

    pub fn generator(&self) -> &GeneratorConfig {
        &self.generator
    }

    pub fn mode(&self) -> ModelsMode {
        self.mode
    }

    /// Sets the namespace models are generated into.
    ///
    /// # Errors
    ///
    /// Returns `TypeName` if `namespace` is not a dotted sequence of identifiers.
    pub fn set_models_namespace(&mut self, namespace: impl Into<String>) -> Result<(), BuilderError> {
        let namespace = namespace.into();
        modelsbuilder_parser::parse_namespace(&namespace)?;
        self.models_namespace = namespace;
        Ok(())
    }

    /// Appends a `using` directive.
    ///
    /// # Errors
    ///
    /// Returns `TypeName` for a malformed namespace and `InvalidConfig` if the
    /// namespace is already imported.
    pub fn add_using(&mut self, namespace: impl Into<String>) -> Result<(), BuilderError> {
        let namespace = namespace.into();
        modelsbuilder_parser::parse_namespace(&namespace)?;
        if self.using.contains(&namespace) {
            return Err(BuilderError::invalid_config(format!(
                "namespace `{namespace}` is already imported"
            )));
        }
        debug!(namespace = namespace.as_str(); "Added using directive");
        self.using.push(namespace);
        Ok(())
    }

    /// Removes every `using` directive, including the defaults.
    pub fn clear_using(&mut self) {
        self.using.clear();
    }

    pub fn set_generator(&mut self, generator: GeneratorConfig) {
        self.generator = generator;
    }

    pub fn set_mode(&mut self, mode: ModelsMode) {
        self.mode = mode;
    }

    /// Checks every value the setters would check.
    pub(crate) fn validate(&self) -> Result<(), BuilderError> {
        modelsbuilder_parser::parse_namespace(&self.models_namespace)?;

        let mut seen = IndexSet::with_capacity(self.using.len());
        for namespace in &self.using {
            modelsbuilder_parser::parse_namespace(namespace)?;
            if !seen.insert(namespace.as_str()) {
                return Err(BuilderError::invalid_config(format!(
                    "namespace `{namespace}` is imported more than once"
                )));
            }
        }

        self.generator.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BuilderConfig::default();

        assert_eq!(config.models_namespace(), DEFAULT_MODELS_NAMESPACE);
        assert_eq!(config.using(), DEFAULT_USING);
        assert_eq!(config.generator().name(), DEFAULT_GENERATOR_NAME);
        assert_eq!(config.generator().version(), env!("CARGO_PKG_VERSION"));
        assert_eq!(config.mode(), ModelsMode::SourceCode);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_set_models_namespace() {
        let mut config = BuilderConfig::default();

        config
            .set_models_namespace("My.Models")
            .expect("valid namespace");
        assert_eq!(config.models_namespace(), "My.Models");

        let err = config.set_models_namespace("My Models").unwrap_err();
        assert!(matches!(err, BuilderError::TypeName(_)));
        assert_eq!(config.models_namespace(), "My.Models");
    }

    #[test]
    fn test_add_using() {
        let mut config = BuilderConfig::default();

        config.add_using("System.Text").expect("new namespace");
        assert_eq!(config.using().last().map(String::as_str), Some("System.Text"));

        assert!(matches!(
            config.add_using("System.Text"),
            Err(BuilderError::InvalidConfig(_))
        ));
        assert!(matches!(
            config.add_using(""),
            Err(BuilderError::TypeName(_))
        ));
        assert_eq!(config.using().len(), 8);
    }

    #[test]
    fn test_clear_using() {
        let mut config = BuilderConfig::default();
        config.clear_using();

        assert!(config.using().is_empty());
    }

    #[test]
    fn test_generator_rejects_blank_values() {
        assert!(GeneratorConfig::new("Gen", "1.0.0").is_ok());
        assert!(matches!(
            GeneratorConfig::new("Gen", " "),
            Err(BuilderError::InvalidConfig(_))
        ));
        assert!(matches!(
            GeneratorConfig::new("", "1.0.0"),
            Err(BuilderError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_from_toml_defaults() {
        let config = BuilderConfig::from_toml_str("").expect("empty config is valid");

        assert_eq!(config.models_namespace(), DEFAULT_MODELS_NAMESPACE);
        assert_eq!(config.using().len(), DEFAULT_USING.len());
    }

    #[test]
    fn test_from_toml_overrides() {
        let config = BuilderConfig::from_toml_str(
            r#"
            models_namespace = "Site.Models"
            using = ["System", "Site.Core"]
            mode = "in_memory"

            [generator]
            name = "Site.Generator"
            version = "2.0.0"
            "#,
        )
        .expect("valid config");

        assert_eq!(config.models_namespace(), "Site.Models");
        assert_eq!(config.using(), ["System", "Site.Core"]);
        assert_eq!(config.mode(), ModelsMode::InMemory);
        assert_eq!(config.generator().name(), "Site.Generator");
    }

    #[test]
    fn test_from_toml_rejects_invalid_values() {
        assert!(matches!(
            BuilderConfig::from_toml_str("models_namespace = \"\""),
            Err(BuilderError::TypeName(_))
        ));
        assert!(matches!(
            BuilderConfig::from_toml_str("using = [\"System\", \"System\"]"),
            Err(BuilderError::InvalidConfig(_))
        ));
        assert!(matches!(
            BuilderConfig::from_toml_str("[generator]\nversion = \"\""),
            Err(BuilderError::InvalidConfig(_))
        ));
        assert!(matches!(
            BuilderConfig::from_toml_str("mode = \"auto\""),
            Err(BuilderError::Toml(_))
        ));
    }
}
