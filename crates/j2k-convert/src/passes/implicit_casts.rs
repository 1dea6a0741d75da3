//! Java's implicit widening conversions made explicit.
//!
//! Kotlin has no implicit numeric widening: `long x = 1` needs `1L`. Literal
//! operands are respelled in place; non-literal expressions go through the
//! `Number.toX()` conversion call. An unresolved side aborts the rewrite
//! without touching the tree.

use j2k_core::{NodeId, SmolStr};
use j2k_symbols::SymbolKind;
use j2k_tree::{InvalidTreeState, LiteralKind, NodeKind};
use j2k_types::mapping::primitive_by_class_fq_name;
use j2k_types::{PrimitiveKind, Ty};

use crate::context::ConversionContext;
use crate::engine::Conversion;
use crate::expr_ty::expression_ty;
use crate::passes::collect_nodes;

pub struct ImplicitCastConversion;

impl Conversion for ImplicitCastConversion {
    fn name(&self) -> &'static str {
        "implicit-casts"
    }

    fn run(
        &self,
        ctx: &mut ConversionContext<'_>,
        root: NodeId,
    ) -> Result<(), InvalidTreeState> {
        let sites = collect_nodes(&ctx.tree, root, &|k| {
            matches!(
                k,
                NodeKind::JavaField(_)
                    | NodeKind::Property(_)
                    | NodeKind::LocalVariable(_)
                    | NodeKind::AssignmentExpression { .. }
            )
        })?;
        for site in sites {
            let (expr, declared) = match ctx.tree.kind(site).clone() {
                NodeKind::JavaField(v) | NodeKind::Property(v) | NodeKind::LocalVariable(v) => {
                    let NodeKind::TypeElement { ty } = ctx.tree.kind(v.type_element).clone()
                    else {
                        continue;
                    };
                    (v.initializer, ty)
                }
                NodeKind::AssignmentExpression { target, value, op } => {
                    if op != j2k_tree::AssignmentOp::Assign {
                        continue;
                    }
                    (value, expression_ty(ctx, target))
                }
                _ => continue,
            };
            let Some(target_kind) = primitive_of(ctx, &declared) else {
                continue;
            };
            let source_ty = expression_ty(ctx, expr);
            let Some(source_kind) = primitive_of(ctx, &source_ty) else {
                continue;
            };
            if !source_kind.widens_to(target_kind) {
                continue;
            }
            widen(ctx, site, expr, target_kind)?;
        }
        Ok(())
    }
}

/// Boxed operand types unbox for widening purposes, as they do in Java.
fn primitive_of(ctx: &ConversionContext<'_>, ty: &Ty) -> Option<PrimitiveKind> {
    if let Some(kind) = ty.as_primitive() {
        return Some(kind);
    }
    let class = ty.as_class()?;
    primitive_by_class_fq_name(&ctx.symbols.symbol(class.symbol).fq_name)
}

fn widen(
    ctx: &mut ConversionContext<'_>,
    site: NodeId,
    expr: NodeId,
    target: PrimitiveKind,
) -> Result<(), InvalidTreeState> {
    if let NodeKind::Literal { kind, text } = ctx.tree.kind(expr).clone() {
        if let Some((kind, text)) = widen_literal(kind, &text, target) {
            return ctx.tree.set_kind(expr, NodeKind::Literal { kind, text });
        }
    }
    // Non-literal: expr becomes expr.toLong() etc.
    let symbol = ctx.symbols.resolve_by_name(
        &format!("kotlin.Number.to{}", target.kotlin_name()),
        SymbolKind::Method,
    );
    let placeholder = ctx.tree.stub();
    ctx.tree.replace_child(site, expr, placeholder)?;
    let call = ctx.tree.method_call(symbol, Vec::new())?;
    let qualified = ctx.tree.qualified(expr, call)?;
    ctx.tree.replace_child(site, placeholder, qualified)
}

/// In-place respelling of an integer or float literal at the wider type.
fn widen_literal(
    kind: LiteralKind,
    text: &str,
    target: PrimitiveKind,
) -> Option<(LiteralKind, SmolStr)> {
    match (kind, target) {
        (LiteralKind::Int, PrimitiveKind::Long) => {
            Some((LiteralKind::Long, SmolStr::new(format!("{text}L"))))
        }
        (LiteralKind::Int | LiteralKind::Long, PrimitiveKind::Float) => {
            let digits = text.trim_end_matches(['l', 'L']);
            Some((LiteralKind::Float, SmolStr::new(format!("{digits}f"))))
        }
        (LiteralKind::Int | LiteralKind::Long, PrimitiveKind::Double) => {
            let digits = text.trim_end_matches(['l', 'L']);
            Some((LiteralKind::Double, SmolStr::new(format!("{digits}.0"))))
        }
        (LiteralKind::Float, PrimitiveKind::Double) => {
            let digits = text.trim_end_matches(['f', 'F']);
            Some((LiteralKind::Double, SmolStr::new(digits)))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn literals_are_respelled_in_place() {
        assert_eq!(
            widen_literal(LiteralKind::Int, "1", PrimitiveKind::Long),
            Some((LiteralKind::Long, SmolStr::new("1L")))
        );
        assert_eq!(
            widen_literal(LiteralKind::Int, "3", PrimitiveKind::Double),
            Some((LiteralKind::Double, SmolStr::new("3.0")))
        );
        assert_eq!(
            widen_literal(LiteralKind::Float, "1.5f", PrimitiveKind::Double),
            Some((LiteralKind::Double, SmolStr::new("1.5")))
        );
        assert_eq!(widen_literal(LiteralKind::Int, "1", PrimitiveKind::Char), None);
    }
}
