//! Content type descriptions consumed by the generator.
//!
//! A [`TypeModel`] describes one content type: its identity, its place in the
//! inheritance and composition hierarchy, and its ordered
//! [`PropertyModel`]s. The models are produced by an external metadata
//! loader and are treated as read-only input by the generator.

use std::fmt;

use crate::clr_type::ClrType;

/// Category a content type belongs to.
///
/// Two types may share an alias when their item types differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemType {
    /// A routable content item.
    Content,
    /// A non-routable element, used inside block editors and nested content.
    Element,
    /// A media item.
    Media,
    /// A member (site user) profile.
    Member,
}

impl ItemType {
    /// Returns the variant name, as emitted in `PublishedItemType.<name>`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Content => "Content",
            ItemType::Element => "Element",
            ItemType::Media => "Media",
            ItemType::Member => "Member",
        }
    }

    /// Looks an item type up by its variant name, ignoring ASCII case.
    ///
    /// # Examples
    ///
    /// ```
    /// use modelsbuilder_core::model::ItemType;
    ///
    /// assert_eq!(ItemType::from_name("element"), Some(ItemType::Element));
    /// assert_eq!(ItemType::from_name("Block"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        [
            ItemType::Content,
            ItemType::Element,
            ItemType::Media,
            ItemType::Member,
        ]
        .into_iter()
        .find(|item_type| item_type.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A property of a content type.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyModel {
    alias: String,
    clr_name: String,
    model_clr_type: ClrType,
    name: Option<String>,
    description: Option<String>,
    is_ignored: bool,
    errors: Vec<String>,
}

impl PropertyModel {
    /// Creates a property.
    ///
    /// # Arguments
    ///
    /// * `alias` - Stable external identifier, used verbatim in the value accessor.
    /// * `clr_name` - Generated member name.
    /// * `model_clr_type` - Declared value type of the property.
    pub fn new(
        alias: impl Into<String>,
        clr_name: impl Into<String>,
        model_clr_type: ClrType,
    ) -> Self {
        Self {
            alias: alias.into(),
            clr_name: clr_name.into(),
            model_clr_type,
            name: None,
            description: None,
            is_ignored: false,
            errors: Vec::new(),
        }
    }

    /// Sets the display name written into the XML summary.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the description written into the XML summary.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Marks the property as ignored; no member is generated for it.
    pub fn ignored(mut self) -> Self {
        self.is_ignored = true;
        self
    }

    /// Records a reason why the property cannot be implemented.
    ///
    /// Properties carrying errors are generated commented out.
    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn clr_name(&self) -> &str {
        &self.clr_name
    }

    pub fn model_clr_type(&self) -> &ClrType {
        &self.model_clr_type
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_ignored(&self) -> bool {
        self.is_ignored
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

/// A content type and its properties.
///
/// # Examples
///
/// ```
/// use modelsbuilder_core::{
///     clr_type::ClrType,
///     model::{ItemType, PropertyModel, TypeModel},
/// };
///
/// let seo = TypeModel::new(2, "seo", "Seo", ItemType::Content)
///     .composition_only()
///     .with_property(PropertyModel::new("metaTitle", "MetaTitle", ClrType::string()));
///
/// let page = TypeModel::new(1, "page", "Page", ItemType::Content)
///     .with_mixin("seo")
///     .with_property(PropertyModel::new("title", "Title", ClrType::string()));
///
/// assert!(seo.is_mixin());
/// assert_eq!(page.mixins(), ["seo"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TypeModel {
    id: i32,
    alias: String,
    clr_name: String,
    parent_id: i32,
    base_type: Option<String>,
    item_type: ItemType,
    is_mixin: bool,
    is_composition_only: bool,
    is_ignored: bool,
    mixins: Vec<String>,
    name: Option<String>,
    properties: Vec<PropertyModel>,
}

impl TypeModel {
    /// Creates a type without parent, mixins or properties.
    ///
    /// # Arguments
    ///
    /// * `id` - Identity of the type in the source repository.
    /// * `alias` - Stable external identifier.
    /// * `clr_name` - Generated class name.
    /// * `item_type` - Category of the type.
    pub fn new(
        id: i32,
        alias: impl Into<String>,
        clr_name: impl Into<String>,
        item_type: ItemType,
    ) -> Self {
        Self {
            id,
            alias: alias.into(),
            clr_name: clr_name.into(),
            parent_id: 0,
            base_type: None,
            item_type,
            is_mixin: false,
            is_composition_only: false,
            is_ignored: false,
            mixins: Vec::new(),
            name: None,
            properties: Vec::new(),
        }
    }

    /// Sets the id of the parent type; `0` means no parent.
    pub fn with_parent_id(mut self, parent_id: i32) -> Self {
        self.parent_id = parent_id;
        self
    }

    /// Sets the alias of the supertype, taking precedence over the parent id.
    pub fn with_base_type(mut self, alias: impl Into<String>) -> Self {
        self.base_type = Some(alias.into());
        self
    }

    /// Marks the type as a mixin that other types may be composed of.
    pub fn as_mixin(mut self) -> Self {
        self.is_mixin = true;
        self
    }

    /// Marks the type as a pure mixin which is only generated when a property
    /// refers to it.
    pub fn composition_only(mut self) -> Self {
        self.is_mixin = true;
        self.is_composition_only = true;
        self
    }

    /// Marks the type as ignored; no model is generated for it.
    pub fn ignored(mut self) -> Self {
        self.is_ignored = true;
        self
    }

    /// Composes the type of the mixin with the given alias.
    pub fn with_mixin(mut self, alias: impl Into<String>) -> Self {
        self.mixins.push(alias.into());
        self
    }

    /// Sets the display name written into the XML summary.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Appends a property.
    pub fn with_property(mut self, property: PropertyModel) -> Self {
        self.properties.push(property);
        self
    }

    /// Appends a property in place.
    pub fn add_property(&mut self, property: PropertyModel) {
        self.properties.push(property);
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn clr_name(&self) -> &str {
        &self.clr_name
    }

    pub fn parent_id(&self) -> i32 {
        self.parent_id
    }

    pub fn base_type(&self) -> Option<&str> {
        self.base_type.as_deref()
    }

    pub fn item_type(&self) -> ItemType {
        self.item_type
    }

    /// Returns `true` for element types.
    pub fn is_element(&self) -> bool {
        self.item_type == ItemType::Element
    }

    pub fn is_mixin(&self) -> bool {
        self.is_mixin
    }

    pub fn is_composition_only(&self) -> bool {
        self.is_composition_only
    }

    pub fn is_ignored(&self) -> bool {
        self.is_ignored
    }

    /// Aliases of the mixins this type is composed of, in declaration order.
    pub fn mixins(&self) -> &[String] {
        &self.mixins
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn properties(&self) -> &[PropertyModel] {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut [PropertyModel] {
        &mut self.properties
    }
}
