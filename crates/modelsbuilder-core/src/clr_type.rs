//! References to the value types of properties.
//!
//! A [`ClrType`] is either a declared type living in some namespace (possibly
//! nested and possibly generic), a placeholder for another generated model,
//! or an array of either. Placeholders are resolved against the type graph at
//! generation time, so a property may refer to its own type or to types
//! declared later.

use std::fmt;

use crate::{identifier::Id, model::ItemType};

/// CLR types that C# spells with a keyword, keyed by their name in `System`.
const KEYWORDS: [(&str, &str); 16] = [
    ("Boolean", "bool"),
    ("Byte", "byte"),
    ("Char", "char"),
    ("Decimal", "decimal"),
    ("Double", "double"),
    ("Int16", "short"),
    ("Int32", "int"),
    ("Int64", "long"),
    ("Object", "object"),
    ("SByte", "sbyte"),
    ("Single", "float"),
    ("String", "string"),
    ("UInt16", "ushort"),
    ("UInt32", "uint"),
    ("UInt64", "ulong"),
    ("Void", "void"),
];

/// Value type of a property.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClrType {
    /// A type declared in a namespace.
    Named(NamedType),
    /// A placeholder for a generated model.
    Model(ModelTypeRef),
    /// A single-dimension array.
    Array(Box<ClrType>),
}

impl ClrType {
    /// Creates a reference to a top-level, non-generic type.
    ///
    /// An empty `namespace` denotes the global namespace.
    pub fn named(namespace: &str, name: impl Into<String>) -> Self {
        Self::Named(NamedType::new(Id::new(namespace), name, Vec::new(), Vec::new()))
    }

    /// Creates a reference to a type nested in `outer`, outermost first.
    ///
    /// # Examples
    ///
    /// ```
    /// use modelsbuilder_core::clr_type::ClrType;
    ///
    /// let nested = ClrType::nested("My.Types", "ASCIIEncoding", ["Nested"]);
    /// assert_eq!(nested.to_string(), "My.Types.ASCIIEncoding+Nested");
    /// ```
    pub fn nested<I, S>(namespace: &str, outer: impl Into<String>, nested: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let nested = nested.into_iter().map(Into::into).collect();
        Self::Named(NamedType::new(Id::new(namespace), outer, nested, Vec::new()))
    }

    /// Creates a reference to a constructed generic type.
    pub fn generic(namespace: &str, name: impl Into<String>, args: Vec<ClrType>) -> Self {
        Self::Named(NamedType::new(Id::new(namespace), name, Vec::new(), args))
    }

    /// Creates a placeholder for the generated model with the given alias.
    pub fn model(alias: impl Into<String>) -> Self {
        Self::Model(ModelTypeRef::new(alias, None))
    }

    /// Creates a placeholder for the generated model with the given alias and item type.
    pub fn model_of(alias: impl Into<String>, item_type: ItemType) -> Self {
        Self::Model(ModelTypeRef::new(alias, Some(item_type)))
    }

    /// Creates an array of `element`.
    pub fn array(element: ClrType) -> Self {
        Self::Array(Box::new(element))
    }

    /// Creates a reference to a type in the `System` namespace.
    pub fn system(name: &str) -> Self {
        Self::named("System", name)
    }

    pub fn string() -> Self {
        Self::system("String")
    }

    pub fn int32() -> Self {
        Self::system("Int32")
    }

    pub fn boolean() -> Self {
        Self::system("Boolean")
    }

    pub fn object() -> Self {
        Self::system("Object")
    }

    /// Creates `System.Collections.Generic.IEnumerable<element>`.
    pub fn enumerable_of(element: ClrType) -> Self {
        Self::generic("System.Collections.Generic", "IEnumerable", vec![element])
    }

    /// Returns the CLR type a C# keyword stands for, e.g. `System.Int32` for `int`.
    ///
    /// # Examples
    ///
    /// ```
    /// use modelsbuilder_core::clr_type::ClrType;
    ///
    /// assert_eq!(ClrType::from_keyword("int"), Some(ClrType::int32()));
    /// assert_eq!(ClrType::from_keyword("Int32"), None);
    /// ```
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        KEYWORDS
            .iter()
            .find(|(_, kw)| *kw == keyword)
            .map(|(name, _)| Self::system(name))
    }

    /// Returns the C# keyword for primitive types.
    pub fn keyword(&self) -> Option<&'static str> {
        match self {
            ClrType::Named(named) => named.keyword(),
            _ => None,
        }
    }

    /// Returns `true` for `System.Object`.
    pub fn is_object(&self) -> bool {
        self.keyword() == Some("object")
    }

    /// Collects every model placeholder in this type, generic arguments included.
    pub fn model_refs(&self) -> Vec<&ModelTypeRef> {
        let mut refs = Vec::new();
        self.collect_model_refs(&mut refs);
        refs
    }

    fn collect_model_refs<'a>(&'a self, refs: &mut Vec<&'a ModelTypeRef>) {
        match self {
            ClrType::Named(named) => {
                for arg in named.args() {
                    arg.collect_model_refs(refs);
                }
            }
            ClrType::Model(model_ref) => refs.push(model_ref),
            ClrType::Array(element) => element.collect_model_refs(refs),
        }
    }
}

/// Prints the CLR spelling: dotted namespace, `+` between nested types,
/// `<...>` generic arguments, `{alias}` placeholders and `[]` arrays.
impl fmt::Display for ClrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClrType::Named(named) => write!(f, "{named}"),
            ClrType::Model(model_ref) => write!(f, "{model_ref}"),
            ClrType::Array(element) => write!(f, "{element}[]"),
        }
    }
}

/// A type declared in a namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedType {
    namespace: Id,
    outer: String,
    nested: Vec<String>,
    args: Vec<ClrType>,
}

impl NamedType {
    /// Creates a named type.
    ///
    /// # Arguments
    ///
    /// * `namespace` - Declaring namespace, [`Id::global`] for none.
    /// * `outer` - Name of the outermost type.
    /// * `nested` - Names of the nested types inside `outer`, outermost first.
    /// * `args` - Generic arguments of the innermost type.
    pub fn new(
        namespace: Id,
        outer: impl Into<String>,
        nested: Vec<String>,
        args: Vec<ClrType>,
    ) -> Self {
        Self {
            namespace,
            outer: outer.into(),
            nested,
            args,
        }
    }

    pub fn namespace(&self) -> Id {
        self.namespace
    }

    /// Name of the outermost type, the symbol that must be unambiguous.
    pub fn outer_name(&self) -> &str {
        &self.outer
    }

    pub fn nested(&self) -> &[String] {
        &self.nested
    }

    /// The outer type name followed by nested type names.
    pub fn path(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.outer.as_str()).chain(self.nested.iter().map(String::as_str))
    }

    pub fn args(&self) -> &[ClrType] {
        &self.args
    }

    /// Returns the C# keyword for primitive types.
    pub fn keyword(&self) -> Option<&'static str> {
        if !self.nested.is_empty() || !self.args.is_empty() || self.namespace != "System" {
            return None;
        }
        KEYWORDS
            .iter()
            .find(|(name, _)| *name == self.outer)
            .map(|(_, keyword)| *keyword)
    }

    fn write_path(&self, f: &mut impl fmt::Write, separator: char) -> fmt::Result {
        f.write_str(&self.outer)?;
        for name in &self.nested {
            f.write_char(separator)?;
            f.write_str(name)?;
        }
        Ok(())
    }

    /// Writes the outer and nested names joined as C# spells them, with `.`.
    pub fn write_source_path(&self, f: &mut impl fmt::Write) -> fmt::Result {
        self.write_path(f, '.')
    }
}

impl fmt::Display for NamedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.namespace.is_global() {
            write!(f, "{}.", self.namespace)?;
        }
        self.write_path(f, '+')?;
        if !self.args.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

/// Placeholder for a generated model, identified by alias.
///
/// Without an item type the alias must be unique across item types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelTypeRef {
    alias: String,
    item_type: Option<ItemType>,
}

impl ModelTypeRef {
    pub fn new(alias: impl Into<String>, item_type: Option<ItemType>) -> Self {
        Self {
            alias: alias.into(),
            item_type,
        }
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn item_type(&self) -> Option<ItemType> {
        self.item_type
    }
}

impl fmt::Display for ModelTypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.item_type {
            Some(item_type) => write!(f, "{{{}:{item_type}}}", self.alias),
            None => write!(f, "{{{}}}", self.alias),
        }
    }
}
