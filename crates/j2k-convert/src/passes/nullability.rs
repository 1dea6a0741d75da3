//! Terminal nullability resolution.
//!
//! Nothing with `Default` nullability may reach the printer. Variable types
//! take a hint from their initializer (a `null` initializer forces nullable,
//! a constructor call or non-null literal proves not-null); every position
//! still undecided degrades to nullable, the conservative reading of a Java
//! platform type.

use j2k_core::NodeId;
use j2k_tree::{InvalidTreeState, LiteralKind, NodeKind, Tree};
use j2k_types::{Nullability, Ty};

use crate::context::ConversionContext;
use crate::engine::Conversion;
use crate::passes::collect_nodes;

pub struct NullabilityResolutionConversion;

impl Conversion for NullabilityResolutionConversion {
    fn name(&self) -> &'static str {
        "nullability-resolution"
    }

    fn run(
        &self,
        ctx: &mut ConversionContext<'_>,
        root: NodeId,
    ) -> Result<(), InvalidTreeState> {
        let elements =
            collect_nodes(&ctx.tree, root, &|k| matches!(k, NodeKind::TypeElement { .. }))?;
        for node in elements {
            let NodeKind::TypeElement { ty } = ctx.tree.kind(node).clone() else {
                continue;
            };
            if !ty.has_default_nullability() {
                continue;
            }
            let mut resolved = resolve_defaults(&ty);
            if resolved.nullability() == Nullability::Nullable {
                if let Some(hint) = initializer_hint(&ctx.tree, node) {
                    resolved = resolved.update_nullability(hint);
                }
            }
            ctx.tree.set_kind(node, NodeKind::TypeElement { ty: resolved })?;
        }
        Ok(())
    }
}

/// `Default` becomes `Nullable` at every position, bottom-up.
fn resolve_defaults(ty: &Ty) -> Ty {
    let resolved = match ty {
        Ty::Class(c) => Ty::class(
            c.symbol,
            c.args.iter().map(resolve_defaults).collect(),
            c.nullability,
        ),
        Ty::Array { elem, nullability } => Ty::array(resolve_defaults(elem), *nullability),
        Ty::UnresolvedClass {
            name,
            args,
            nullability,
        } => Ty::UnresolvedClass {
            name: name.clone(),
            args: args.iter().map(resolve_defaults).collect(),
            nullability: *nullability,
        },
        Ty::Disjunction { parts, nullability } => Ty::Disjunction {
            parts: parts.iter().map(resolve_defaults).collect(),
            nullability: *nullability,
        },
        _ => ty.clone(),
    };
    if resolved.nullability() == Nullability::Default {
        resolved.update_nullability(Nullability::Nullable)
    } else {
        resolved
    }
}

/// Root-level verdict from the initializer of the owning declaration, when
/// the type element annotates one.
fn initializer_hint(tree: &Tree, type_element: NodeId) -> Option<Nullability> {
    let parent = tree.parent(type_element)?;
    let initializer = match tree.kind(parent) {
        NodeKind::JavaField(v)
        | NodeKind::Property(v)
        | NodeKind::Parameter(v)
        | NodeKind::LocalVariable(v)
            if v.type_element == type_element =>
        {
            v.initializer
        }
        _ => return None,
    };
    match tree.kind(initializer) {
        NodeKind::Literal {
            kind: LiteralKind::Null,
            ..
        } => Some(Nullability::Nullable),
        NodeKind::Literal { .. }
        | NodeKind::NewExpression { .. }
        | NodeKind::JavaNewArray { .. }
        | NodeKind::JavaNewEmptyArray { .. } => Some(Nullability::NotNull),
        _ => None,
    }
}
