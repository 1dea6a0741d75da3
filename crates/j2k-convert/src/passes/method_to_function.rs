//! Java methods become Kotlin functions.

use j2k_core::NodeId;
use j2k_tree::{InvalidTreeState, NodeKind};

use crate::context::ConversionContext;
use crate::engine::Conversion;
use crate::passes::collect_nodes;

pub struct MethodToFunctionConversion;

impl Conversion for MethodToFunctionConversion {
    fn name(&self) -> &'static str {
        "method-to-function"
    }

    fn run(
        &self,
        ctx: &mut ConversionContext<'_>,
        root: NodeId,
    ) -> Result<(), InvalidTreeState> {
        let methods = collect_nodes(&ctx.tree, root, &|k| matches!(k, NodeKind::JavaMethod(_)))?;
        for node in methods {
            let NodeKind::JavaMethod(decl) = ctx.tree.kind(node).clone() else {
                continue;
            };
            ctx.tree.set_kind(node, NodeKind::Function(decl))?;
        }
        Ok(())
    }
}
