//! Java constructors become secondary constructors.
//!
//! A straight reshaping: payloads are identical, only the kind changes.
//! Primary-constructor detection runs later and promotes one of them where
//! the delegation structure allows it.

use j2k_core::NodeId;
use j2k_tree::{InvalidTreeState, NodeKind};

use crate::context::ConversionContext;
use crate::engine::Conversion;
use crate::passes::collect_nodes;

pub struct ConstructorConversion;

impl Conversion for ConstructorConversion {
    fn name(&self) -> &'static str {
        "constructor"
    }

    fn run(
        &self,
        ctx: &mut ConversionContext<'_>,
        root: NodeId,
    ) -> Result<(), InvalidTreeState> {
        let constructors =
            collect_nodes(&ctx.tree, root, &|k| matches!(k, NodeKind::JavaConstructor(_)))?;
        for node in constructors {
            let NodeKind::JavaConstructor(decl) = ctx.tree.kind(node).clone() else {
                continue;
            };
            ctx.tree.set_kind(node, NodeKind::SecondaryConstructor(decl))?;
        }
        Ok(())
    }
}
