//! The validated graph of content types.
//!
//! [`TypeGraph`] owns the [`TypeModel`]s handed to the builder and links them
//! in a `petgraph` directed graph with an edge from every type to its base
//! type and to each mixin it is composed of. Construction validates the
//! whole graph once, so generation never meets a dangling reference.

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use log::{debug, info, trace};
use petgraph::{
    algo::toposort,
    graph::{DiGraph, NodeIndex},
    visit::Dfs,
};

use modelsbuilder_core::model::{ItemType, TypeModel};

use crate::{config::ModelsMode, error::BuilderError};

/// Relation between a type and one of its supertypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Relation {
    Inherits,
    Composes,
}

/// Derived facts about one type, indexed like [`TypeGraph::types`].
#[derive(Debug, Default)]
struct TypeNode {
    base: Option<usize>,
    mixins: Vec<usize>,
    /// Every type implemented by the base chain, bases and mixins included.
    inherited: IndexSet<usize>,
    /// Own mixins not already implemented by the base chain.
    declaring: Vec<usize>,
    /// Mixins reachable from `declaring`, minus `inherited`.
    implementing: Vec<usize>,
    /// Whether a property of a non-ignored type refers to this type.
    referenced: bool,
}

/// Content types linked by inheritance and composition.
///
/// # Examples
///
/// ```
/// use modelsbuilder::graph::TypeGraph;
/// use modelsbuilder_core::model::{ItemType, TypeModel};
///
/// let graph = TypeGraph::new(vec![
///     TypeModel::new(1, "seo", "Seo", ItemType::Content).as_mixin(),
///     TypeModel::new(2, "page", "Page", ItemType::Content).with_mixin("seo"),
///     TypeModel::new(3, "article", "Article", ItemType::Content).with_parent_id(2),
/// ])
/// .expect("valid graph");
///
/// let article = graph.find("article", ItemType::Content).expect("article exists");
/// assert_eq!(graph.base_type(article).map(|t| t.alias()), Some("page"));
/// assert_eq!(graph.declaring_interfaces(article).count(), 0);
/// ```
#[derive(Debug)]
pub struct TypeGraph {
    types: Vec<TypeModel>,
    nodes: Vec<TypeNode>,
    graph: DiGraph<usize, Relation>,
    by_alias: IndexMap<String, Vec<usize>>,
    by_id: HashMap<i32, usize>,
}

impl TypeGraph {
    /// Builds and validates a graph, rejecting properties named like their type.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure found.
    pub fn new(types: Vec<TypeModel>) -> Result<Self, BuilderError> {
        Self::with_mode(types, ModelsMode::SourceCode)
    }

    /// Builds and validates a graph.
    ///
    /// In [`ModelsMode::InMemory`] a property named like its declaring type is
    /// not an error; the property records the problem and is generated
    /// commented out.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure found.
    pub fn with_mode(mut types: Vec<TypeModel>, mode: ModelsMode) -> Result<Self, BuilderError> {
        info!(types = types.len(), mode:?; "Building type graph");

        let (by_alias, by_id) = index_types(&types)?;
        check_properties(&mut types, mode)?;

        let mut graph = Self {
            nodes: types.iter().map(|_| TypeNode::default()).collect(),
            types,
            graph: DiGraph::new(),
            by_alias,
            by_id,
        };

        graph.link()?;
        graph.check_acyclic()?;
        graph.check_elements()?;
        graph.collect_interfaces();
        graph.mark_referenced();

        debug!(edges = graph.graph.edge_count(); "Type graph built");
        Ok(graph)
    }

    /// All types in declaration order.
    pub fn types(&self) -> &[TypeModel] {
        &self.types
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Types with the given alias, across item types.
    pub fn by_alias<'a>(&'a self, alias: &str) -> impl Iterator<Item = &'a TypeModel> + 'a {
        self.alias_indices(alias).iter().map(|&idx| &self.types[idx])
    }

    /// The type with the given alias and item type.
    pub fn find(&self, alias: &str, item_type: ItemType) -> Option<&TypeModel> {
        self.by_alias(alias)
            .find(|model| model.item_type() == item_type)
    }

    pub fn by_id(&self, id: i32) -> Option<&TypeModel> {
        self.by_id.get(&id).map(|&idx| &self.types[idx])
    }

    /// The type `model` directly inherits from.
    pub fn base_type(&self, model: &TypeModel) -> Option<&TypeModel> {
        let idx = self.position(model)?;
        self.nodes[idx].base.map(|base| &self.types[base])
    }

    /// The mixins `model` is composed of, in declaration order.
    pub fn mixins<'a>(&'a self, model: &TypeModel) -> impl Iterator<Item = &'a TypeModel> + 'a {
        self.related(model, |node| &node.mixins)
    }

    /// The mixins of `model` whose interfaces its base chain does not already
    /// implement.
    pub fn declaring_interfaces<'a>(
        &'a self,
        model: &TypeModel,
    ) -> impl Iterator<Item = &'a TypeModel> + 'a {
        self.related(model, |node| &node.declaring)
    }

    /// The mixins whose properties `model` must implement itself: everything
    /// reachable from its declaring interfaces that the base chain does not
    /// implement.
    pub fn implementing_interfaces<'a>(
        &'a self,
        model: &TypeModel,
    ) -> impl Iterator<Item = &'a TypeModel> + 'a {
        self.related(model, |node| &node.implementing)
    }

    /// Returns `true` if `implemented` is a mixin implemented by the base chain
    /// of `model`.
    pub fn inherits_interface(&self, model: &TypeModel, implemented: &TypeModel) -> bool {
        match (self.position(model), self.position(implemented)) {
            (Some(idx), Some(other)) => self.nodes[idx].inherited.contains(&other),
            _ => false,
        }
    }

    /// Returns `true` if a property of a non-ignored type refers to `model`
    /// through a model placeholder.
    pub fn is_referenced(&self, model: &TypeModel) -> bool {
        self.position(model)
            .is_some_and(|idx| self.nodes[idx].referenced)
    }

    /// Position of `model` in [`types`](Self::types), matched by alias and item type.
    pub(crate) fn position(&self, model: &TypeModel) -> Option<usize> {
        self.alias_indices(model.alias())
            .iter()
            .copied()
            .find(|&idx| self.types[idx].item_type() == model.item_type())
    }

    fn alias_indices(&self, alias: &str) -> &[usize] {
        self.by_alias.get(alias).map(Vec::as_slice).unwrap_or_default()
    }

    fn related<'a>(
        &'a self,
        model: &TypeModel,
        select: impl Fn(&TypeNode) -> &Vec<usize>,
    ) -> impl Iterator<Item = &'a TypeModel> + 'a {
        let indices = self
            .position(model)
            .map(|idx| select(&self.nodes[idx]).as_slice())
            .unwrap_or_default();
        indices.iter().map(|&idx| &self.types[idx])
    }

    /// Resolves an alias referenced by the type at `from`, preferring its own
    /// item type.
    fn resolve_alias(&self, from: usize, alias: &str) -> Result<Option<usize>, BuilderError> {
        let candidates = self.alias_indices(alias);
        let item_type = self.types[from].item_type();

        if let Some(&idx) = candidates
            .iter()
            .find(|&&idx| self.types[idx].item_type() == item_type)
        {
            return Ok(Some(idx));
        }

        match candidates {
            [] => Ok(None),
            [idx] => Ok(Some(*idx)),
            _ => Err(BuilderError::AmbiguousAlias {
                type_alias: self.types[from].alias().to_string(),
                alias: alias.to_string(),
            }),
        }
    }

    /// Resolves bases and mixins and adds the graph edges.
    fn link(&mut self) -> Result<(), BuilderError> {
        for idx in 0..self.types.len() {
            self.graph.add_node(idx);
        }

        for idx in 0..self.types.len() {
            let model = &self.types[idx];

            let base = if let Some(base_alias) = model.base_type() {
                let base = self.resolve_alias(idx, base_alias)?;
                Some(base.ok_or_else(|| BuilderError::UnknownBaseType {
                    type_alias: model.alias().to_string(),
                    base: base_alias.to_string(),
                })?)
            } else if model.parent_id() != 0 {
                let parent = self.by_id.get(&model.parent_id()).copied();
                Some(parent.ok_or_else(|| BuilderError::UnknownParent {
                    type_alias: model.alias().to_string(),
                    parent_id: model.parent_id(),
                })?)
            } else {
                None
            };

            let mut mixins = Vec::with_capacity(model.mixins().len());
            for mixin_alias in model.mixins() {
                let mixin = self.resolve_alias(idx, mixin_alias)?.ok_or_else(|| {
                    BuilderError::UnknownMixin {
                        type_alias: model.alias().to_string(),
                        mixin: mixin_alias.clone(),
                    }
                })?;
                if !self.types[mixin].is_mixin() {
                    return Err(BuilderError::NotAMixin {
                        type_alias: model.alias().to_string(),
                        mixin: mixin_alias.clone(),
                    });
                }
                if !mixins.contains(&mixin) {
                    mixins.push(mixin);
                }
            }

            trace!(alias = model.alias(), base:?, mixins:?; "Linked type");

            if let Some(base) = base {
                self.graph
                    .add_edge(NodeIndex::new(idx), NodeIndex::new(base), Relation::Inherits);
            }
            for &mixin in &mixins {
                self.graph
                    .add_edge(NodeIndex::new(idx), NodeIndex::new(mixin), Relation::Composes);
            }

            let node = &mut self.nodes[idx];
            node.base = base;
            node.mixins = mixins;
        }

        Ok(())
    }

    fn check_acyclic(&self) -> Result<(), BuilderError> {
        toposort(&self.graph, None).map(|_| ()).map_err(|cycle| {
            let idx = self.graph[cycle.node_id()];
            BuilderError::Cycle(self.types[idx].alias().to_string())
        })
    }

    /// Elements can only inherit from and be composed of elements.
    fn check_elements(&self) -> Result<(), BuilderError> {
        for (model, node) in self.types.iter().zip(&self.nodes) {
            if !model.is_element() {
                continue;
            }
            if let Some(base) = node.base.map(|base| &self.types[base]) {
                if !base.is_element() {
                    return Err(BuilderError::ElementParent {
                        type_alias: model.alias().to_string(),
                        parent: base.alias().to_string(),
                    });
                }
            }
            if let Some(mixin) = node
                .mixins
                .iter()
                .map(|&mixin| &self.types[mixin])
                .find(|mixin| !mixin.is_element())
            {
                return Err(BuilderError::ElementMixins {
                    type_alias: model.alias().to_string(),
                    mixin: mixin.alias().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Types reachable from `idx` through any edge, `idx` included.
    fn closure(&self, idx: usize) -> IndexSet<usize> {
        let mut dfs = Dfs::new(&self.graph, NodeIndex::new(idx));
        let mut reached = IndexSet::new();
        while let Some(node) = dfs.next(&self.graph) {
            reached.insert(self.graph[node]);
        }
        reached
    }

    fn collect_interfaces(&mut self) {
        for idx in 0..self.types.len() {
            let inherited = self.nodes[idx]
                .base
                .map(|base| self.closure(base))
                .unwrap_or_default();

            let declaring: Vec<usize> = self.nodes[idx]
                .mixins
                .iter()
                .copied()
                .filter(|mixin| !inherited.contains(mixin))
                .collect();

            let mut implementing = IndexSet::new();
            for &mixin in &declaring {
                implementing.extend(
                    self.closure(mixin)
                        .into_iter()
                        .filter(|&reached| self.types[reached].is_mixin())
                        .filter(|reached| !inherited.contains(reached)),
                );
            }

            let node = &mut self.nodes[idx];
            node.inherited = inherited;
            node.declaring = declaring;
            node.implementing = implementing.into_iter().collect();
        }
    }

    fn mark_referenced(&mut self) {
        let mut referenced = Vec::new();
        for model in self.types.iter().filter(|model| !model.is_ignored()) {
            for property in model.properties().iter().filter(|p| !p.is_ignored()) {
                for model_ref in property.model_clr_type().model_refs() {
                    referenced.extend(
                        self.alias_indices(model_ref.alias())
                            .iter()
                            .copied()
                            .filter(|&idx| {
                                model_ref
                                    .item_type()
                                    .is_none_or(|item_type| self.types[idx].item_type() == item_type)
                            }),
                    );
                }
            }
        }

        for idx in referenced {
            self.nodes[idx].referenced = true;
        }
    }
}

/// Indexes types by alias and id, rejecting duplicates.
fn index_types(
    types: &[TypeModel],
) -> Result<(IndexMap<String, Vec<usize>>, HashMap<i32, usize>), BuilderError> {
    let mut by_alias: IndexMap<String, Vec<usize>> = IndexMap::new();
    let mut by_id = HashMap::with_capacity(types.len());

    for (idx, model) in types.iter().enumerate() {
        let same_alias = by_alias.entry(model.alias().to_string()).or_default();
        if same_alias
            .iter()
            .any(|&other| types[other].item_type() == model.item_type())
        {
            return Err(BuilderError::DuplicateAlias {
                alias: model.alias().to_string(),
                item_type: model.item_type(),
            });
        }
        same_alias.push(idx);

        if by_id.insert(model.id(), idx).is_some() {
            return Err(BuilderError::DuplicateId(model.id()));
        }
    }

    Ok((by_alias, by_id))
}

/// Rejects duplicate property names and handles properties named like their type.
fn check_properties(types: &mut [TypeModel], mode: ModelsMode) -> Result<(), BuilderError> {
    for model in types.iter_mut() {
        let mut names = IndexSet::new();
        for property in model.properties().iter().filter(|p| !p.is_ignored()) {
            if !names.insert(property.clr_name()) {
                return Err(BuilderError::DuplicatePropertyName {
                    type_alias: model.alias().to_string(),
                    property: property.clr_name().to_string(),
                });
            }
        }

        let type_alias = model.alias().to_string();
        let clr_name = model.clr_name().to_string();
        for property in model
            .properties_mut()
            .iter_mut()
            .filter(|p| !p.is_ignored() && p.clr_name() == clr_name)
        {
            match mode {
                ModelsMode::SourceCode => {
                    return Err(BuilderError::PropertyNameClash {
                        type_alias,
                        property: property.clr_name().to_string(),
                    });
                }
                ModelsMode::InMemory => {
                    debug!(type_alias = type_alias.as_str(), property = property.alias(); "Property named like its type");
                    property.add_error(format!(
                        "The property name \"{clr_name}\" is the same as the name of its declaring \
                         content type. A member cannot have the same name as its enclosing type."
                    ));
                }
            }
        }
    }
    Ok(())
}
