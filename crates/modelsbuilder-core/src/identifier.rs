//! Interned identifiers for namespaces and symbol names.
//!
//! Namespaces and type names are compared over and over while resolving
//! symbols, so they are stored once in a global string interner and handled
//! through the copyable [`Id`] type.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner backing every [`Id`].
///
/// # Thread Safety
///
/// Access is serialized through a `Mutex`, so identifiers may be created and
/// displayed from any thread.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn with_interner<R>(f: impl FnOnce(&mut DefaultStringInterner) -> R) -> R {
    let mut interner = INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock");
    f(&mut interner)
}

/// Interned name of a namespace or a symbol.
///
/// The empty string stands for the global namespace.
///
/// # Examples
///
/// ```
/// use modelsbuilder_core::identifier::Id;
///
/// let system = Id::new("System");
/// let text = system.create_nested(Id::new("Text"));
/// assert_eq!(text, "System.Text");
///
/// assert!(Id::global().is_global());
/// assert_eq!(Id::global().create_nested(system), "System");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from a string slice.
    ///
    /// # Arguments
    ///
    /// * `name` - A namespace (`System.Text`) or a simple name (`StringBuilder`).
    pub fn new(name: &str) -> Self {
        Self(with_interner(|interner| interner.get_or_intern(name)))
    }

    /// Returns the `Id` of `name` if it was interned before, without interning it.
    pub fn lookup(name: &str) -> Option<Self> {
        with_interner(|interner| interner.get(name)).map(Self)
    }

    /// Returns the identifier of the global namespace.
    pub fn global() -> Self {
        Self::new("")
    }

    /// Returns `true` if this is the global (unnamed) namespace.
    pub fn is_global(&self) -> bool {
        *self == Self::global()
    }

    /// Creates a dotted child name such as `System.Text` from `System` and `Text`.
    ///
    /// Nesting under the global namespace returns the child unchanged.
    ///
    /// # Arguments
    ///
    /// * `child_id` - The segment to append.
    pub fn create_nested(&self, child_id: Id) -> Self {
        if self.is_global() {
            return child_id;
        }

        with_interner(|interner| {
            let parent_str = interner
                .resolve(self.0)
                .expect("Parent ID should exist in interner");
            let child_str = interner
                .resolve(child_id.0)
                .expect("Child ID should exist in interner");
            let nested_name = format!("{parent_str}.{child_str}");
            Self(interner.get_or_intern(&nested_name))
        })
    }

    /// Returns the interned text as an owned string.
    pub fn to_owned_string(&self) -> String {
        with_interner(|interner| {
            interner
                .resolve(self.0)
                .expect("Symbol should exist in interner")
                .to_string()
        })
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_owned_string())
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        with_interner(|interner| interner.resolve(self.0) == Some(other))
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}
