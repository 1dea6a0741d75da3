//! Operator token rewriting.
//!
//! Three families:
//! - Java bitwise/shift symbols become the Kotlin named infix operators
//!   (`&` → `and`, `<<` → `shl`, ...);
//! - Java `==`/`!=` on reference operands is identity and becomes
//!   `===`/`!==`; on primitives (and on `null` comparisons) it stays;
//! - compound assignments with no Kotlin form (`&=`, `<<=`, ...) unfold into
//!   `x = x and y`.
//!
//! Operand type checks degrade to "don't touch" when a side is unresolved.

use j2k_core::NodeId;
use j2k_tree::node::{AssignmentOp, BinaryOp};
use j2k_tree::{InvalidTreeState, NodeKind};
use j2k_types::Ty;

use crate::context::ConversionContext;
use crate::engine::{rewrite_recursively, Conversion};
use crate::expr_ty::expression_ty;

pub struct OperatorConversion;

impl Conversion for OperatorConversion {
    fn name(&self) -> &'static str {
        "operators"
    }

    fn run(
        &self,
        ctx: &mut ConversionContext<'_>,
        root: NodeId,
    ) -> Result<(), InvalidTreeState> {
        rewrite_recursively(ctx, root, &mut |ctx: &mut ConversionContext<'_>, node| {
            match ctx.tree.kind(node).clone() {
                NodeKind::BinaryExpression { left, right, op } => {
                    if let Some(named) = named_infix(op) {
                        ctx.tree.set_kind(
                            node,
                            NodeKind::BinaryExpression {
                                left,
                                right,
                                op: named,
                            },
                        )?;
                        return Ok(None);
                    }
                    if matches!(op, BinaryOp::Eq | BinaryOp::NotEq)
                        && is_reference_comparison(ctx, left, right)
                    {
                        let identity = if op == BinaryOp::Eq {
                            BinaryOp::RefEq
                        } else {
                            BinaryOp::RefNotEq
                        };
                        ctx.tree.set_kind(
                            node,
                            NodeKind::BinaryExpression {
                                left,
                                right,
                                op: identity,
                            },
                        )?;
                    }
                    Ok(None)
                }
                NodeKind::AssignmentExpression { target, value, op } => {
                    let Some(named) = compound_infix(op) else {
                        return Ok(None);
                    };
                    let target_copy = ctx.tree.copy_subtree_detached(target)?;
                    ctx.tree.invalidate(node)?;
                    let unfolded = ctx.tree.alloc(NodeKind::BinaryExpression {
                        left: target_copy,
                        right: value,
                        op: named,
                    })?;
                    let assignment = ctx.tree.alloc(NodeKind::AssignmentExpression {
                        target,
                        value: unfolded,
                        op: AssignmentOp::Assign,
                    })?;
                    ctx.tree.replace(node, assignment)?;
                    Ok(Some(assignment))
                }
                _ => Ok(None),
            }
        })?;
        Ok(())
    }
}

fn named_infix(op: BinaryOp) -> Option<BinaryOp> {
    Some(match op {
        BinaryOp::BitAnd => BinaryOp::KtAnd,
        BinaryOp::BitOr => BinaryOp::KtOr,
        BinaryOp::BitXor => BinaryOp::KtXor,
        BinaryOp::Shl => BinaryOp::KtShl,
        BinaryOp::Shr => BinaryOp::KtShr,
        BinaryOp::Ushr => BinaryOp::KtUshr,
        _ => return None,
    })
}

fn compound_infix(op: AssignmentOp) -> Option<BinaryOp> {
    Some(match op {
        AssignmentOp::AndAssign => BinaryOp::KtAnd,
        AssignmentOp::OrAssign => BinaryOp::KtOr,
        AssignmentOp::XorAssign => BinaryOp::KtXor,
        AssignmentOp::ShlAssign => BinaryOp::KtShl,
        AssignmentOp::ShrAssign => BinaryOp::KtShr,
        AssignmentOp::UshrAssign => BinaryOp::KtUshr,
        _ => return None,
    })
}

/// Both sides must be known reference types. A `null` literal keeps
/// structural `==` (idiomatic Kotlin null check), unknown sides are left
/// alone.
fn is_reference_comparison(
    ctx: &mut ConversionContext<'_>,
    left: NodeId,
    right: NodeId,
) -> bool {
    if is_null_literal(ctx, left) || is_null_literal(ctx, right) {
        return false;
    }
    is_reference_ty(&expression_ty(ctx, left)) && is_reference_ty(&expression_ty(ctx, right))
}

fn is_null_literal(ctx: &ConversionContext<'_>, node: NodeId) -> bool {
    matches!(
        ctx.tree.kind(node),
        NodeKind::Literal {
            kind: j2k_tree::LiteralKind::Null,
            ..
        }
    )
}

fn is_reference_ty(ty: &Ty) -> bool {
    matches!(ty, Ty::Class(_) | Ty::Array { .. } | Ty::TypeParameter { .. })
}
