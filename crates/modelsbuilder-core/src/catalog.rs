//! Catalog of the types that exist outside the generated models.
//!
//! Deciding whether a short name is ambiguous needs to know every type that
//! could be visible from the generated file. That knowledge is supplied by the
//! caller through the [`TypeCatalog`] trait instead of being discovered at
//! runtime.

use std::fmt;

use indexmap::IndexSet;
use log::debug;

use crate::identifier::Id;

/// A top-level type declared in a namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeclaredType {
    namespace: Id,
    name: Id,
}

impl DeclaredType {
    /// Creates a declaration of `name` in `namespace`.
    ///
    /// An empty `namespace` denotes the global namespace.
    pub fn new(namespace: &str, name: &str) -> Self {
        Self {
            namespace: Id::new(namespace),
            name: Id::new(name),
        }
    }

    pub fn namespace(&self) -> Id {
        self.namespace
    }

    /// Short name of the type, without namespace.
    pub fn name(&self) -> Id {
        self.name
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_global() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}.{}", self.namespace, self.name)
        }
    }
}

/// Source of the types that exist and the namespaces declaring them.
///
/// Only top-level types are listed; nested types are reached through their
/// outer type, whose short name is the one subject to ambiguity.
pub trait TypeCatalog {
    /// Returns every declared type. Order must be stable between calls.
    fn declared_types(&self) -> Box<dyn Iterator<Item = DeclaredType> + '_>;
}

impl<T: TypeCatalog + ?Sized> TypeCatalog for &T {
    fn declared_types(&self) -> Box<dyn Iterator<Item = DeclaredType> + '_> {
        (**self).declared_types()
    }
}

/// In-memory [`TypeCatalog`] preserving insertion order.
///
/// # Examples
///
/// ```
/// use modelsbuilder_core::catalog::{Catalog, DeclaredType, TypeCatalog};
///
/// let catalog = Catalog::new()
///     .with_type("System.Text", "StringBuilder")
///     .with_type("My.Project", "StringBuilder");
///
/// assert_eq!(catalog.len(), 2);
/// assert!(catalog.contains(&DeclaredType::new("System.Text", "StringBuilder")));
/// assert_eq!(catalog.declared_types().count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    types: IndexSet<DeclaredType>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog of the framework types generated models commonly
    /// meet: the base class library namespaces and the published content API.
    pub fn standard() -> Self {
        const STANDARD_TYPES: &[(&str, &[&str])] = &[
            (
                "System",
                &[
                    "Boolean", "Byte", "Char", "DateTime", "DateTimeOffset", "Decimal", "Double",
                    "Func", "Guid", "Int16", "Int32", "Int64", "Object", "SByte", "Single",
                    "String", "TimeSpan", "UInt16", "UInt32", "UInt64", "Uri", "Void",
                ],
            ),
            (
                "System.Collections.Generic",
                &["Dictionary", "IDictionary", "IEnumerable", "IList", "List"],
            ),
            ("System.Linq.Expressions", &["Expression"]),
            (
                "System.Text",
                &["ASCIIEncoding", "Encoding", "StringBuilder", "UTF8Encoding"],
            ),
            ("Umbraco.Cms.Core", &["Udi", "GuidUdi"]),
            ("Umbraco.Cms.Core.Exceptions", &["BootFailedException"]),
            (
                "Umbraco.Cms.Core.Models",
                &["Link", "MediaWithCrops"],
            ),
            (
                "Umbraco.Cms.Core.Models.PublishedContent",
                &[
                    "IPublishedContent",
                    "IPublishedContentType",
                    "IPublishedElement",
                    "IPublishedPropertyType",
                    "IPublishedValueFallback",
                    "ImplementPropertyTypeAttribute",
                    "PublishedContentModel",
                    "PublishedElementModel",
                    "PublishedItemType",
                    "PublishedModelAttribute",
                ],
            ),
            ("Umbraco.Cms.Core.PublishedCache", &["IPublishedSnapshotAccessor"]),
            ("Umbraco.Cms.Core.Strings", &["IHtmlEncodedString"]),
            (
                "Umbraco.Cms.ModelsBuilder.Embedded",
                &["PublishedModelUtility"],
            ),
        ];

        let catalog = STANDARD_TYPES
            .iter()
            .flat_map(|(namespace, names)| names.iter().map(move |name| (*namespace, *name)))
            .fold(Self::new(), |catalog, (namespace, name)| {
                catalog.with_type(namespace, name)
            });
        debug!(types = catalog.len(); "Built standard type catalog");
        catalog
    }

    /// Declares a type, ignoring repeated declarations.
    ///
    /// Returns `true` if the type was not declared yet.
    pub fn declare(&mut self, namespace: &str, name: &str) -> bool {
        self.types.insert(DeclaredType::new(namespace, name))
    }

    /// Declares a type, builder style.
    pub fn with_type(mut self, namespace: &str, name: &str) -> Self {
        self.declare(namespace, name);
        self
    }

    /// Returns `true` if the exact declaration is present.
    pub fn contains(&self, declared: &DeclaredType) -> bool {
        self.types.contains(declared)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeCatalog for Catalog {
    fn declared_types(&self) -> Box<dyn Iterator<Item = DeclaredType> + '_> {
        Box::new(self.types.iter().copied())
    }
}

impl Extend<DeclaredType> for Catalog {
    fn extend<I: IntoIterator<Item = DeclaredType>>(&mut self, iter: I) {
        self.types.extend(iter);
    }
}
