//! Selection of the types that get a generated model.

use modelsbuilder_core::model::TypeModel;

use crate::graph::TypeGraph;

/// Returns the types a model is generated for, in declaration order.
///
/// Ignored types are skipped. Composition-only mixins are generated only when
/// a property of a non-ignored type refers to them.
pub fn models_to_generate(graph: &TypeGraph) -> impl Iterator<Item = &TypeModel> + Clone + '_ {
    graph
        .types()
        .iter()
        .filter(move |model| is_generated(graph, model))
}

/// Returns `true` if a model is generated for `model`.
pub fn is_generated(graph: &TypeGraph, model: &TypeModel) -> bool {
    !model.is_ignored() && (!model.is_composition_only() || graph.is_referenced(model))
}
