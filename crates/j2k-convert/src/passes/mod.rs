//! The pass catalog, in pipeline order.
//!
//! Ordering matters: every pass that reasons about primitive operand types
//! (operators, implicit casts, array factories, range loops) runs before type
//! mapping replaces primitives with Kotlin class types, and nullability
//! resolution runs last so no `Default` nullability survives to the printer.

use j2k_core::NodeId;
use j2k_tree::node::Modality;
use j2k_tree::{InvalidTreeState, Mutability, NodeKind, Tree};

use crate::engine::Conversion;

pub mod array_initializer;
pub mod constructor;
pub mod field_to_property;
pub mod for_loop;
pub mod implicit_casts;
pub mod implicit_initializer;
pub mod java_modifiers;
pub mod labeled;
pub mod literal;
pub mod method_to_function;
pub mod modality;
pub mod nullability;
pub mod operators;
pub mod primary_constructor;
pub mod switch_to_when;
pub mod synchronized;
pub mod type_mapping;

#[must_use]
pub fn default_conversions() -> Vec<Box<dyn Conversion>> {
    vec![
        Box::new(modality::ModalityConversion),
        Box::new(java_modifiers::JavaModifierConversion),
        Box::new(implicit_initializer::ImplicitInitializerConversion),
        Box::new(literal::LiteralConversion),
        Box::new(array_initializer::ArrayInitializerConversion),
        Box::new(for_loop::ForConversion),
        Box::new(switch_to_when::SwitchToWhenConversion),
        Box::new(synchronized::SynchronizedConversion),
        Box::new(labeled::LabelConversion),
        Box::new(operators::OperatorConversion),
        Box::new(implicit_casts::ImplicitCastConversion),
        Box::new(constructor::ConstructorConversion),
        Box::new(primary_constructor::PrimaryConstructorConversion),
        Box::new(method_to_function::MethodToFunctionConversion),
        Box::new(field_to_property::FieldToPropertyConversion),
        Box::new(type_mapping::TypeMappingConversion),
        Box::new(nullability::NullabilityResolutionConversion),
    ]
}

/// Pre-order collection of the nodes under `root` matching `pred`.
pub(crate) fn collect_nodes(
    tree: &Tree,
    root: NodeId,
    pred: &impl Fn(&NodeKind) -> bool,
) -> Result<Vec<NodeId>, InvalidTreeState> {
    let mut out = Vec::new();
    collect_into(tree, root, pred, &mut out)?;
    Ok(out)
}

fn collect_into(
    tree: &Tree,
    node: NodeId,
    pred: &impl Fn(&NodeKind) -> bool,
    out: &mut Vec<NodeId>,
) -> Result<(), InvalidTreeState> {
    if pred(tree.kind(node)) {
        out.push(node);
    }
    for child in tree.children(node)? {
        collect_into(tree, child, pred, out)?;
    }
    Ok(())
}

/// Modifier-list helpers shared by the modifier-shaped passes.
pub(crate) fn list_modifiers(tree: &Tree, list: NodeId) -> Vec<NodeId> {
    match tree.kind(list) {
        NodeKind::ModifierList { modifiers } => modifiers.clone(),
        _ => Vec::new(),
    }
}

pub(crate) fn find_modality(tree: &Tree, list: NodeId) -> Option<(NodeId, Modality)> {
    list_modifiers(tree, list).into_iter().find_map(|m| {
        match tree.kind(m) {
            NodeKind::ModalityModifier(modality) => Some((m, *modality)),
            _ => None,
        }
    })
}

pub(crate) fn has_mutability(tree: &Tree, list: NodeId) -> bool {
    list_modifiers(tree, list)
        .into_iter()
        .any(|m| matches!(tree.kind(m), NodeKind::MutabilityModifier(_)))
}

pub(crate) fn push_modifier(
    tree: &mut Tree,
    list: NodeId,
    modifier: NodeId,
) -> Result<(), InvalidTreeState> {
    let mut modifiers = list_modifiers(tree, list);
    modifiers.push(modifier);
    tree.set_kind(list, NodeKind::ModifierList { modifiers })
}

/// Adds a mutability modifier following the `final`→`val` rule: an explicit
/// `final` turns into `val`, everything else becomes `var`.
pub(crate) fn ensure_mutability(tree: &mut Tree, list: NodeId) -> Result<(), InvalidTreeState> {
    if has_mutability(tree, list) {
        return Ok(());
    }
    if let Some((node, Modality::Final)) = find_modality(tree, list) {
        return tree.set_kind(node, NodeKind::MutabilityModifier(Mutability::Val));
    }
    let var = tree.mutability_modifier(Mutability::Var);
    push_modifier(tree, list, var)
}
