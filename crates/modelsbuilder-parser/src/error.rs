//! Diagnostics reported while parsing type names.
//!
//! Every failure is described by a [`Diagnostic`] carrying an [`ErrorCode`],
//! a labelled [`Span`](crate::Span) into the parsed text and optional help.
//! Diagnostics are returned wrapped in a [`ParseError`].
//!
//! # Example
//!
//! ```
//! # use modelsbuilder_parser::error::{Diagnostic, ErrorCode};
//! # use modelsbuilder_parser::Span;
//!
//! let diag = Diagnostic::error("unterminated generic argument list")
//!     .with_code(ErrorCode::E102)
//!     .with_label(Span::new(4..9), "opened here")
//!     .with_help("close the list with `>`");
//!
//! assert_eq!(diag.to_string(), "error[E102]: unterminated generic argument list");
//! ```

mod diagnostic;
mod error_code;
mod parse_error;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
pub use parse_error::ParseError;
