//! # Models Builder Parser
//!
//! Parses the textual spelling of CLR types used by the models builder, so
//! property types and configured namespaces can be written as plain strings.
//!
//! ## Usage
//!
//! ```
//! # use modelsbuilder_parser::{parse_clr_type, ParseError};
//! use modelsbuilder_core::{clr_type::ClrType, model::ItemType};
//!
//! fn main() -> Result<(), ParseError> {
//!     let ty = parse_clr_type("System.Collections.Generic.IEnumerable<{foo:Element}>")?;
//!     assert_eq!(ty, ClrType::enumerable_of(ClrType::model_of("foo", ItemType::Element)));
//!
//!     assert_eq!(parse_clr_type("int")?, ClrType::int32());
//!     Ok(())
//! }
//! ```

pub mod error;
mod span;
mod type_name;

pub use error::ParseError;
pub use span::Span;

use log::{debug, trace};

use modelsbuilder_core::{clr_type::ClrType, identifier::Id};

/// Parses a CLR type name.
///
/// Supported forms:
///
/// * `Namespace.Type`, and `Type` for the global namespace
/// * `Namespace.Outer+Nested` for nested types
/// * `Namespace.Type<Arg1, Arg2>` for constructed generic types
/// * `Type[]` for arrays
/// * C# keywords such as `int` or `string`
/// * `{alias}` and `{alias:Element}` placeholders for generated models
///
/// An optional leading `global::` is accepted and ignored.
///
/// # Errors
///
/// Returns a [`ParseError`] whose diagnostic locates the first syntax error.
pub fn parse_clr_type(source: &str) -> Result<ClrType, ParseError> {
    trace!(source; "Parsing CLR type name");
    let result = type_name::parse_clr_type(source);
    if let Err(err) = &result {
        debug!(source, err:%; "Rejected CLR type name");
    }
    result
}

/// Parses a dotted namespace such as `Umbraco.Cms.Core`.
///
/// # Errors
///
/// Returns a [`ParseError`] with code [`E107`](error::ErrorCode::E107) when
/// the text is empty or is not a sequence of identifiers separated by `.`.
pub fn parse_namespace(source: &str) -> Result<Id, ParseError> {
    type_name::parse_namespace(source)
}
