//! Error codes for type name diagnostics.
//!
//! - `E10x` - type name syntax errors

use std::fmt;

/// Stable identifier of a diagnostic kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Expected a type name.
    ///
    /// The input is empty or starts with a character that cannot begin a type.
    E100,

    /// Unexpected trailing input.
    ///
    /// A complete type was parsed but text remains after it.
    E101,

    /// Unterminated generic argument list.
    ///
    /// A `<` was not followed by comma-separated types and a closing `>`.
    E102,

    /// Missing model alias.
    ///
    /// A `{` placeholder does not start with an alias.
    E103,

    /// Unknown item type.
    ///
    /// The item type after `:` in a placeholder is not `Content`, `Element`,
    /// `Media` or `Member`.
    E104,

    /// Unterminated placeholder.
    ///
    /// A `{alias` placeholder is missing its closing `}`.
    E105,

    /// Expected an identifier.
    ///
    /// A `.` or `+` separator is not followed by a name.
    E106,

    /// Invalid namespace.
    ///
    /// A namespace must be one or more identifiers separated by `.`.
    E107,

    /// Unterminated array rank.
    ///
    /// A `[` is not followed by `]`.
    E108,
}

impl ErrorCode {
    /// Returns the code as written in diagnostics, e.g. `"E100"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E104 => "E104",
            ErrorCode::E105 => "E105",
            ErrorCode::E106 => "E106",
            ErrorCode::E107 => "E107",
            ErrorCode::E108 => "E108",
        }
    }

    /// Short description, used as the label of the primary span.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "expected type name",
            ErrorCode::E101 => "unexpected trailing input",
            ErrorCode::E102 => "unterminated generic arguments",
            ErrorCode::E103 => "missing model alias",
            ErrorCode::E104 => "unknown item type",
            ErrorCode::E105 => "unterminated placeholder",
            ErrorCode::E106 => "expected identifier",
            ErrorCode::E107 => "invalid namespace",
            ErrorCode::E108 => "unterminated array rank",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
