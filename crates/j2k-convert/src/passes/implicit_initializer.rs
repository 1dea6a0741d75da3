//! Fields without an initializer receive the Java default value explicitly.
//!
//! Kotlin properties must be initialized; the Java language default (`0`,
//! `false`, `'\u0000'`, `null`) is spelled out so the converted property
//! keeps the original runtime value.

use j2k_core::NodeId;
use j2k_tree::{InvalidTreeState, LiteralKind, NodeKind};
use j2k_types::{PrimitiveKind, Ty};

use crate::context::ConversionContext;
use crate::engine::Conversion;
use crate::passes::collect_nodes;

pub struct ImplicitInitializerConversion;

impl Conversion for ImplicitInitializerConversion {
    fn name(&self) -> &'static str {
        "implicit-initializer"
    }

    fn run(
        &self,
        ctx: &mut ConversionContext<'_>,
        root: NodeId,
    ) -> Result<(), InvalidTreeState> {
        let fields = collect_nodes(&ctx.tree, root, &|k| matches!(k, NodeKind::JavaField(_)))?;
        for field in fields {
            let NodeKind::JavaField(decl) = ctx.tree.kind(field).clone() else {
                continue;
            };
            if !matches!(ctx.tree.kind(decl.initializer), NodeKind::StubExpression) {
                continue;
            }
            let NodeKind::TypeElement { ty } = ctx.tree.kind(decl.type_element).clone() else {
                continue;
            };
            let default = default_value(&mut ctx.tree, &ty);
            ctx.tree.replace_child(field, decl.initializer, default)?;
        }
        Ok(())
    }
}

fn default_value(tree: &mut j2k_tree::Tree, ty: &Ty) -> NodeId {
    match ty {
        Ty::Primitive(kind) => match kind {
            PrimitiveKind::Boolean => tree.bool_literal(false),
            PrimitiveKind::Char => tree.new_literal(LiteralKind::Char, "\\u0000"),
            PrimitiveKind::Byte | PrimitiveKind::Short | PrimitiveKind::Int => {
                tree.int_literal(0)
            }
            PrimitiveKind::Long => tree.new_literal(LiteralKind::Long, "0L"),
            PrimitiveKind::Float => tree.new_literal(LiteralKind::Float, "0.0f"),
            PrimitiveKind::Double => tree.new_literal(LiteralKind::Double, "0.0"),
        },
        _ => tree.null_literal(),
    }
}
