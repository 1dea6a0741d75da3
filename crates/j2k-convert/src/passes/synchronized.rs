//! `synchronized (lock) { ... }` becomes `synchronized(lock) { ... }`.
//!
//! The statement form maps onto the `kotlin.synchronized` inline function
//! with the body as a trailing lambda.

use j2k_core::NodeId;
use j2k_symbols::SymbolKind;
use j2k_tree::{InvalidTreeState, NodeKind};
use j2k_types::mapping::SYNCHRONIZED_FQ_NAME;

use crate::context::ConversionContext;
use crate::engine::{rewrite_recursively, Conversion};

pub struct SynchronizedConversion;

impl Conversion for SynchronizedConversion {
    fn name(&self) -> &'static str {
        "synchronized"
    }

    fn run(
        &self,
        ctx: &mut ConversionContext<'_>,
        root: NodeId,
    ) -> Result<(), InvalidTreeState> {
        rewrite_recursively(ctx, root, &mut |ctx: &mut ConversionContext<'_>, node| {
            let NodeKind::JavaSynchronizedStatement { lock, body } = *ctx.tree.kind(node) else {
                return Ok(None);
            };
            ctx.tree.invalidate(node)?;
            let symbol = ctx
                .symbols
                .resolve_by_name(SYNCHRONIZED_FQ_NAME, SymbolKind::Method);
            let lambda = ctx.tree.alloc(NodeKind::LambdaExpression {
                parameters: Vec::new(),
                statement: body,
            })?;
            let call = ctx.tree.method_call(symbol, vec![lock, lambda])?;
            let stmt = ctx.tree.expression_statement(call)?;
            ctx.tree.replace(node, stmt)?;
            Ok(Some(stmt))
        })?;
        Ok(())
    }
}
