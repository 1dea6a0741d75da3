//! Best-effort expression typing.
//!
//! Passes that depend on operand types (operator rewriting, implicit casts)
//! ask here. The answer degrades to [`Ty::NoType`] whenever a symbol is
//! unresolved or a construct carries no type information; callers must treat
//! `NoType` as "don't touch".

use j2k_core::NodeId;
use j2k_tree::{BinaryOp, LiteralKind, NodeKind, UnaryOp};
use j2k_types::{Nullability, PrimitiveKind, Ty};

use crate::context::ConversionContext;

/// The declared type behind a symbol: the annotated type of a universe
/// declaration, or the external signature of a multiverse one.
pub fn declared_ty(ctx: &mut ConversionContext<'_>, symbol: j2k_core::SymbolId) -> Option<Ty> {
    if let Some(target) = ctx.symbols.symbol(symbol).node_target() {
        let type_element = match ctx.tree.kind(target) {
            NodeKind::JavaMethod(m) | NodeKind::Function(m) => m.return_type,
            NodeKind::JavaField(v)
            | NodeKind::Property(v)
            | NodeKind::Parameter(v)
            | NodeKind::LocalVariable(v) => v.type_element,
            _ => return None,
        };
        match ctx.tree.kind(type_element) {
            NodeKind::TypeElement { ty } => return Some(ty.clone()),
            _ => return None,
        }
    }
    ctx.symbols.external_signature_ty(symbol)
}

/// Java binary numeric promotion: operands below `int` widen to `int`, the
/// result is the wider of the two.
fn promote(left: Option<PrimitiveKind>, right: Option<PrimitiveKind>) -> Ty {
    let (Some(left), Some(right)) = (left, right) else {
        return Ty::NoType;
    };
    let (Some(l), Some(r)) = (left.widening_rank(), right.widening_rank()) else {
        return Ty::NoType;
    };
    let kind = if l >= r { left } else { right };
    let kind = if kind.widens_to(PrimitiveKind::Int) {
        PrimitiveKind::Int
    } else {
        kind
    };
    Ty::Primitive(kind)
}

fn is_string(ctx: &ConversionContext<'_>, ty: &Ty) -> bool {
    match ty {
        Ty::Class(c) => {
            let fq = &ctx.symbols.symbol(c.symbol).fq_name;
            fq == "java.lang.String" || fq == "kotlin.String"
        }
        Ty::UnresolvedClass { name, .. } => name == "java.lang.String" || name == "String",
        _ => false,
    }
}

pub fn expression_ty(ctx: &mut ConversionContext<'_>, node: NodeId) -> Ty {
    match ctx.tree.kind(node).clone() {
        NodeKind::Literal { kind, .. } => match kind {
            LiteralKind::Boolean => Ty::Primitive(PrimitiveKind::Boolean),
            LiteralKind::Char => Ty::Primitive(PrimitiveKind::Char),
            LiteralKind::Int => Ty::Primitive(PrimitiveKind::Int),
            LiteralKind::Long => Ty::Primitive(PrimitiveKind::Long),
            LiteralKind::Float => Ty::Primitive(PrimitiveKind::Float),
            LiteralKind::Double => Ty::Primitive(PrimitiveKind::Double),
            LiteralKind::String => {
                let symbol = ctx
                    .symbols
                    .resolve_by_name("java.lang.String", j2k_symbols::SymbolKind::Class);
                if ctx.symbols.symbol(symbol).is_unresolved() {
                    Ty::UnresolvedClass {
                        name: "java.lang.String".into(),
                        args: Vec::new(),
                        nullability: Nullability::NotNull,
                    }
                } else {
                    Ty::class(symbol, Vec::new(), Nullability::NotNull)
                }
            }
            LiteralKind::Null => Ty::NoType,
        },

        NodeKind::BinaryExpression { left, right, op } => match op {
            BinaryOp::Less
            | BinaryOp::LessOrEq
            | BinaryOp::Greater
            | BinaryOp::GreaterOrEq
            | BinaryOp::Eq
            | BinaryOp::NotEq
            | BinaryOp::RefEq
            | BinaryOp::RefNotEq
            | BinaryOp::LogicAnd
            | BinaryOp::LogicOr => Ty::Primitive(PrimitiveKind::Boolean),
            BinaryOp::Plus
            | BinaryOp::Minus
            | BinaryOp::Mul
            | BinaryOp::Div
            | BinaryOp::Rem => {
                let lt = expression_ty(ctx, left);
                let rt = expression_ty(ctx, right);
                if op == BinaryOp::Plus && (is_string(ctx, &lt) || is_string(ctx, &rt)) {
                    if is_string(ctx, &lt) {
                        lt
                    } else {
                        rt
                    }
                } else {
                    promote(lt.as_primitive(), rt.as_primitive())
                }
            }
            BinaryOp::BitAnd
            | BinaryOp::BitOr
            | BinaryOp::BitXor
            | BinaryOp::KtAnd
            | BinaryOp::KtOr
            | BinaryOp::KtXor => {
                let lt = expression_ty(ctx, left);
                let rt = expression_ty(ctx, right);
                match (lt.as_primitive(), rt.as_primitive()) {
                    (Some(PrimitiveKind::Boolean), Some(PrimitiveKind::Boolean)) => {
                        Ty::Primitive(PrimitiveKind::Boolean)
                    }
                    (l, r) => promote(l, r),
                }
            }
            BinaryOp::Shl
            | BinaryOp::Shr
            | BinaryOp::Ushr
            | BinaryOp::KtShl
            | BinaryOp::KtShr
            | BinaryOp::KtUshr => {
                // Shift results take the promoted left operand only.
                let lt = expression_ty(ctx, left);
                promote(lt.as_primitive(), Some(PrimitiveKind::Int))
            }
        },

        NodeKind::PrefixExpression { operand, op } => match op {
            UnaryOp::Not => Ty::Primitive(PrimitiveKind::Boolean),
            UnaryOp::Plus | UnaryOp::Minus | UnaryOp::BitNot => {
                let ty = expression_ty(ctx, operand);
                promote(ty.as_primitive(), Some(PrimitiveKind::Int))
            }
            UnaryOp::Increment | UnaryOp::Decrement => expression_ty(ctx, operand),
        },
        NodeKind::PostfixExpression { operand, .. } => expression_ty(ctx, operand),

        NodeKind::AssignmentExpression { target, .. } => expression_ty(ctx, target),
        NodeKind::ParenthesizedExpression { expression } => expression_ty(ctx, expression),
        NodeKind::QualifiedExpression { selector, .. } => expression_ty(ctx, selector),

        NodeKind::MethodCallExpression { symbol, .. }
        | NodeKind::FieldAccessExpression { symbol } => {
            declared_ty(ctx, symbol).unwrap_or(Ty::NoType)
        }

        NodeKind::ArrayAccessExpression { array, .. } => match expression_ty(ctx, array) {
            Ty::Array { elem, .. } => *elem,
            _ => Ty::NoType,
        },

        NodeKind::NewExpression { symbol, .. } => {
            if ctx.symbols.symbol(symbol).is_unresolved() {
                Ty::NoType
            } else {
                Ty::class(symbol, Vec::new(), Nullability::NotNull)
            }
        }

        NodeKind::JavaNewArray { type_element, .. }
        | NodeKind::JavaNewEmptyArray { type_element, .. } => {
            match ctx.tree.kind(type_element) {
                NodeKind::TypeElement { ty } => Ty::array(ty.clone(), Nullability::NotNull),
                _ => Ty::NoType,
            }
        }

        NodeKind::TypeCastExpression { type_element, .. } => match ctx.tree.kind(type_element) {
            NodeKind::TypeElement { ty } => ty.clone(),
            _ => Ty::NoType,
        },

        NodeKind::IfElseExpression { then_branch, .. } => expression_ty(ctx, then_branch),

        _ => Ty::NoType,
    }
}
