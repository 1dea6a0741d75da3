//! The ordered pass runner.
//!
//! Passes run strictly in sequence over every root; there is no rollback. A
//! tree-invariant violation is a bug in a pass and aborts the whole run with
//! the active pass named in the error. Per-node skips are not errors: a pass
//! that does not recognize a node leaves it alone.

use j2k_core::NodeId;
use j2k_tree::InvalidTreeState;
use thiserror::Error;
use tracing::debug;

use crate::context::ConversionContext;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("conversion pass `{pass}` corrupted the tree: {source}")]
    Pass {
        pass: &'static str,
        source: InvalidTreeState,
    },
    #[error("conversion cancelled")]
    Cancelled,
}

/// One rewrite pass over a tree.
pub trait Conversion {
    fn name(&self) -> &'static str;

    fn run(&self, ctx: &mut ConversionContext<'_>, root: NodeId)
        -> Result<(), InvalidTreeState>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running { pass: &'static str },
    Done,
}

pub struct ConversionEngine {
    passes: Vec<Box<dyn Conversion>>,
    state: RunState,
}

impl ConversionEngine {
    #[must_use]
    pub fn new(passes: Vec<Box<dyn Conversion>>) -> Self {
        Self {
            passes,
            state: RunState::Idle,
        }
    }

    #[must_use]
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Runs every pass, in order, over every root.
    ///
    /// Cancellation is cooperative: the flag is checked between passes and
    /// between roots, never mid-pass, and a cancelled run yields no usable
    /// output.
    pub fn run(
        &mut self,
        ctx: &mut ConversionContext<'_>,
        roots: &[NodeId],
    ) -> Result<(), EngineError> {
        for pass in &self.passes {
            if ctx.cancel.is_cancelled() {
                self.state = RunState::Idle;
                return Err(EngineError::Cancelled);
            }
            self.state = RunState::Running { pass: pass.name() };
            debug!(pass = pass.name(), "running conversion pass");
            for &root in roots {
                if ctx.cancel.is_cancelled() {
                    self.state = RunState::Idle;
                    return Err(EngineError::Cancelled);
                }
                pass.run(ctx, root).map_err(|source| EngineError::Pass {
                    pass: pass.name(),
                    source,
                })?;
            }
        }
        self.state = RunState::Done;
        Ok(())
    }
}

/// The recursive-rewrite pass shape: `rewrite` inspects one node and either
/// replaces it in the tree (returning the replacement's id) or declines
/// (`None`). The walk then continues into the children of whatever now
/// occupies the position, so a rewrite is re-applied inside its own output.
pub fn rewrite_recursively(
    ctx: &mut ConversionContext<'_>,
    node: NodeId,
    rewrite: &mut impl FnMut(
        &mut ConversionContext<'_>,
        NodeId,
    ) -> Result<Option<NodeId>, InvalidTreeState>,
) -> Result<NodeId, InvalidTreeState> {
    let current = match rewrite(ctx, node)? {
        Some(replacement) => replacement,
        None => node,
    };
    for child in ctx.tree.children(current)? {
        rewrite_recursively(ctx, child, rewrite)?;
    }
    Ok(current)
}
