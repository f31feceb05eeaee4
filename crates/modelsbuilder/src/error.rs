//! Error types for models builder operations.
//!
//! [`BuilderError`] covers configuration problems, type graph validation
//! failures and references that cannot be resolved while generating.

use std::fmt;

use thiserror::Error;

use modelsbuilder_core::model::ItemType;
use modelsbuilder_parser::ParseError;

/// The main error type for models builder operations.
#[derive(Debug, Error)]
pub enum BuilderError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid configuration file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid type name: {0}")]
    TypeName(#[from] ParseError),

    #[error("Alias `{alias}` is used by more than one {item_type} type")]
    DuplicateAlias { alias: String, item_type: ItemType },

    #[error("Id {0} is used by more than one type")]
    DuplicateId(i32),

    #[error("Type `{type_alias}` declares more than one property named `{property}`")]
    DuplicatePropertyName { type_alias: String, property: String },

    #[error("Property `{property}` of type `{type_alias}` has the same name as its declaring type")]
    PropertyNameClash { type_alias: String, property: String },

    #[error("Type `{type_alias}` inherits from unknown type `{base}`")]
    UnknownBaseType { type_alias: String, base: String },

    #[error("Type `{type_alias}` has unknown parent id {parent_id}")]
    UnknownParent { type_alias: String, parent_id: i32 },

    #[error("Type `{type_alias}` is composed of unknown type `{mixin}`")]
    UnknownMixin { type_alias: String, mixin: String },

    #[error("Type `{type_alias}` is composed of `{mixin}`, which is not a mixin")]
    NotAMixin { type_alias: String, mixin: String },

    #[error("Alias `{alias}` referenced by type `{type_alias}` matches types of several item types")]
    AmbiguousAlias { type_alias: String, alias: String },

    #[error("Type `{0}` is part of an inheritance or composition cycle")]
    Cycle(String),

    #[error("Element type `{type_alias}` cannot inherit from non-element type `{parent}`")]
    ElementParent { type_alias: String, parent: String },

    #[error("Element type `{type_alias}` cannot be composed of non-element type `{mixin}`")]
    ElementMixins { type_alias: String, mixin: String },

    #[error("Model type `{0}` does not exist or is not generated")]
    UnknownModelType(String),

    #[error("Model type `{0}` matches types of several item types, specify the item type")]
    AmbiguousModelType(String),

    #[error("Failed to write generated text: {0}")]
    Format(#[from] fmt::Error),
}

impl BuilderError {
    /// Creates an `InvalidConfig` error.
    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
