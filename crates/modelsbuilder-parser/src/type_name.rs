//! Parser for textual CLR type names.
//!
//! Accepted syntax:
//!
//! ```text
//! type        := base ( '[' ']' )*
//! base        := placeholder | named
//! placeholder := '{' alias ( ':' item_type )? '}'
//! named       := ( 'global::' )? ident ( '.' ident )* ( '+' ident )* generic_args?
//! generic_args:= '<' type ( ',' type )* '>'
//! ```
//!
//! The last dotted identifier is the outer type, the preceding ones form its
//! namespace, and `+` separates nested types. A single identifier that is a
//! C# keyword (`int`, `string`, ...) stands for its `System` type.

use winnow::{
    Parser as _,
    ascii::multispace0,
    combinator::{alt, cut_err, delimited, opt, preceded, repeat, separated, terminated},
    error::{ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location},
    token::{literal, one_of, take_while},
};

use modelsbuilder_core::{
    clr_type::{ClrType, NamedType},
    identifier::Id,
    model::ItemType,
};

use crate::{
    error::{Diagnostic, ErrorCode, ParseError},
    span::Span,
};

/// Diagnostic details attached to winnow errors via `.context()`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TypeNameDiagnostic {
    code: ErrorCode,
    message: &'static str,
    help: Option<&'static str>,
    /// Position where the failing construct started.
    start: usize,
}

impl TypeNameDiagnostic {
    fn new(code: ErrorCode, message: &'static str, start: usize) -> Self {
        Self {
            code,
            message,
            help: None,
            start,
        }
    }

    fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = ModalResult<O, ContextError<TypeNameDiagnostic>>;

/// Parses a C# identifier.
fn identifier<'a>(input: &mut Input<'a>) -> IResult<&'a str> {
    (
        one_of(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)
}

/// Parses an identifier following a `.` or `+` separator.
fn identifier_after<'a>(separator: char, start: usize) -> impl FnMut(&mut Input<'a>) -> IResult<&'a str> {
    move |input: &mut Input<'a>| {
        preceded(
            separator,
            cut_err(identifier).context(
                TypeNameDiagnostic::new(ErrorCode::E106, "expected an identifier", start)
                    .with_help("remove the trailing separator or add a name after it"),
            ),
        )
        .parse_next(input)
    }
}

/// Parses `{alias}` or `{alias:ItemType}`.
fn placeholder(input: &mut Input<'_>) -> IResult<ClrType> {
    let start = input.current_token_start();

    '{'.parse_next(input)?;

    let alias = cut_err(take_while(1.., |c: char| {
        c.is_ascii_alphanumeric() || c == '_'
    }))
    .context(
        TypeNameDiagnostic::new(ErrorCode::E103, "missing model alias", start)
            .with_help("write the alias of a content type, e.g. `{homePage}`"),
    )
    .parse_next(input)?;

    let item_type = opt(preceded(
        ':',
        cut_err(identifier.verify_map(ItemType::from_name)).context(
            TypeNameDiagnostic::new(ErrorCode::E104, "unknown item type", start)
                .with_help("use one of `Content`, `Element`, `Media` or `Member`"),
        ),
    ))
    .parse_next(input)?;

    cut_err('}')
        .context(
            TypeNameDiagnostic::new(ErrorCode::E105, "unterminated placeholder", start)
                .with_help("close the placeholder with `}`"),
        )
        .parse_next(input)?;

    Ok(match item_type {
        Some(item_type) => ClrType::model_of(alias, item_type),
        None => ClrType::model(alias),
    })
}

/// Parses `<T1, T2, ...>`.
fn generic_args(input: &mut Input<'_>) -> IResult<Vec<ClrType>> {
    let start = input.current_token_start();

    '<'.parse_next(input)?;

    cut_err(terminated(
        separated(1.., delimited(multispace0, type_ref, multispace0), ','),
        '>',
    ))
    .context(
        TypeNameDiagnostic::new(ErrorCode::E102, "unterminated generic argument list", start)
            .with_help("separate arguments with `,` and close the list with `>`"),
    )
    .parse_next(input)
}

/// Parses a possibly namespaced, nested and generic type name.
fn named_type(input: &mut Input<'_>) -> IResult<ClrType> {
    let start = input.current_token_start();

    let is_rooted = opt(literal("global::")).parse_next(input)?.is_some();
    let first = identifier.parse_next(input)?;
    let dotted: Vec<&str> = repeat(0.., identifier_after('.', start)).parse_next(input)?;
    let nested: Vec<&str> = repeat(0.., identifier_after('+', start)).parse_next(input)?;
    let args = opt(generic_args).parse_next(input)?.unwrap_or_default();

    let mut segments = Vec::with_capacity(dotted.len() + 1);
    segments.push(first);
    segments.extend(dotted);

    if !is_rooted && segments.len() == 1 && nested.is_empty() && args.is_empty() {
        if let Some(keyword) = ClrType::from_keyword(first) {
            return Ok(keyword);
        }
    }

    let outer = segments.pop().unwrap_or(first);
    let namespace = Id::new(&segments.join("."));
    let nested = nested.into_iter().map(str::to_string).collect();

    Ok(ClrType::Named(NamedType::new(namespace, outer, nested, args)))
}

/// Parses `[]` following an element type.
fn array_rank(input: &mut Input<'_>) -> IResult<()> {
    let start = input.current_token_start();

    '['.parse_next(input)?;
    cut_err(preceded(multispace0, ']'))
        .void()
        .context(
            TypeNameDiagnostic::new(ErrorCode::E108, "unterminated array rank", start)
                .with_help("only single-dimension arrays `[]` are supported"),
        )
        .parse_next(input)
}

/// Parses a complete type reference.
fn type_ref(input: &mut Input<'_>) -> IResult<ClrType> {
    let start = input.current_token_start();

    let element = alt((
        placeholder,
        named_type.context(
            TypeNameDiagnostic::new(ErrorCode::E100, "expected a type name", start)
                .with_help("write a name such as `System.String`, `int` or `{alias}`"),
        ),
    ))
    .parse_next(input)?;

    let rank: usize = repeat(0.., array_rank).parse_next(input)?;
    Ok((0..rank).fold(element, |ty, _| ClrType::array(ty)))
}

/// Converts a winnow error into a diagnostic spanning from the start of the
/// failing construct to `error_pos`.
fn to_diagnostic(err: ErrMode<ContextError<TypeNameDiagnostic>>, error_pos: usize) -> Diagnostic {
    let context_error = match err {
        ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
        ErrMode::Incomplete(_) => ContextError::new(),
    };

    match context_error.context().next() {
        Some(TypeNameDiagnostic {
            code,
            message,
            help,
            start,
        }) => {
            let mut diag = Diagnostic::error(*message)
                .with_code(*code)
                .with_label(Span::new(*start..error_pos.max(*start + 1)), code.description());
            if let Some(help) = help {
                diag = diag.with_help(*help);
            }
            diag
        }
        None => Diagnostic::error("expected a type name")
            .with_code(ErrorCode::E100)
            .with_label(Span::new(error_pos..error_pos + 1), ErrorCode::E100.description()),
    }
}

/// Parses a type name such as `System.Collections.Generic.IEnumerable<{foo}>`.
pub(crate) fn parse_clr_type(source: &str) -> Result<ClrType, ParseError> {
    let mut input = LocatingSlice::new(source);

    let ty = type_ref(&mut input)
        .map_err(|err| to_diagnostic(err, input.current_token_start()))?;

    if !input.is_empty() {
        let start = input.current_token_start();
        return Err(Diagnostic::error("unexpected input after the type name")
            .with_code(ErrorCode::E101)
            .with_label(Span::new(start..source.len()), ErrorCode::E101.description())
            .with_secondary_label(Span::new(0..start), "parsed as a complete type")
            .into());
    }

    Ok(ty)
}

/// Parses a dotted namespace such as `Umbraco.Cms.Core`.
pub(crate) fn parse_namespace(source: &str) -> Result<Id, ParseError> {
    let mut input = LocatingSlice::new(source);

    let parsed: Result<&str, ErrMode<ContextError<TypeNameDiagnostic>>> =
        separated(1.., identifier, '.')
            .map(|()| ())
            .take()
            .parse_next(&mut input);

    match parsed {
        Ok(namespace) if input.is_empty() => Ok(Id::new(namespace)),
        _ => {
            let start = input.current_token_start();
            Err(Diagnostic::error(format!("`{source}` is not a valid namespace"))
                .with_code(ErrorCode::E107)
                .with_label(
                    Span::new(start..source.len().max(start + 1)),
                    ErrorCode::E107.description(),
                )
                .with_help("namespaces are identifiers separated by `.`, e.g. `My.Models`")
                .into())
        }
    }
}
