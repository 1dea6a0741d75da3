//! `switch` becomes `when`.
//!
//! Kotlin `when` branches do not fall through, so the Java cases need
//! restructuring:
//! - a run of empty cases merges its labels into the next non-empty case;
//! - a case whose body runs off its end (per the host's completion facts)
//!   gets the following case bodies inlined as fresh copies, up to and
//!   including the first one that terminates;
//! - a trailing unlabeled `break` disappears;
//! - the `default` case becomes `else` and moves last.

use j2k_core::NodeId;
use j2k_tree::{InvalidTreeState, NodeKind};

use crate::context::ConversionContext;
use crate::engine::{rewrite_recursively, Conversion};

pub struct SwitchToWhenConversion;

impl Conversion for SwitchToWhenConversion {
    fn name(&self) -> &'static str {
        "switch-to-when"
    }

    fn run(
        &self,
        ctx: &mut ConversionContext<'_>,
        root: NodeId,
    ) -> Result<(), InvalidTreeState> {
        rewrite_recursively(ctx, root, &mut |ctx: &mut ConversionContext<'_>, node| {
            let NodeKind::JavaSwitch { expression, cases } = ctx.tree.kind(node).clone() else {
                return Ok(None);
            };
            convert(ctx, node, expression, &cases).map(Some)
        })?;
        Ok(())
    }
}

struct CaseInfo {
    node: NodeId,
    /// `None` marks the `default:` label.
    label: Option<NodeId>,
    statements: Vec<NodeId>,
    falls_through: bool,
}

struct BranchPlan {
    /// Original label expressions; `None` among them means `else`.
    labels: Vec<Option<NodeId>>,
    /// Own statements followed by inlined copies.
    statements: Vec<NodeId>,
}

fn convert(
    ctx: &mut ConversionContext<'_>,
    node: NodeId,
    expression: NodeId,
    cases: &[NodeId],
) -> Result<NodeId, InvalidTreeState> {
    let infos: Vec<CaseInfo> = cases
        .iter()
        .map(|&case| {
            let NodeKind::JavaSwitchCase { label, statements } = ctx.tree.kind(case).clone()
            else {
                return CaseInfo {
                    node: case,
                    label: None,
                    statements: Vec::new(),
                    falls_through: false,
                };
            };
            let falls_through = ctx
                .symbols
                .resolver()
                .completes_normally(case)
                .unwrap_or_else(|| falls_through_syntactically(ctx, &statements));
            CaseInfo {
                node: case,
                label,
                statements,
                falls_through,
            }
        })
        .collect();

    // Plan branches while the tree is intact: fallthrough inlining needs
    // deep copies of the following cases' statements.
    let mut plan: Vec<BranchPlan> = Vec::new();
    let mut pending_labels: Vec<Option<NodeId>> = Vec::new();
    for (i, info) in infos.iter().enumerate() {
        pending_labels.push(info.label);
        if info.statements.is_empty() {
            // Labels accumulate onto the next non-empty case; a trailing
            // empty case still becomes its own (empty) branch.
            if i + 1 < infos.len() {
                continue;
            }
        }
        let mut statements = info.statements.clone();
        if info.falls_through {
            for next in &infos[i + 1..] {
                for &stmt in &next.statements {
                    statements.push(ctx.tree.copy_subtree_detached(stmt)?);
                }
                if !next.falls_through {
                    break;
                }
            }
        }
        strip_trailing_break(ctx, &mut statements);
        plan.push(BranchPlan {
            labels: std::mem::take(&mut pending_labels),
            statements,
        });
    }

    // `else` last.
    if let Some(pos) = plan
        .iter()
        .position(|b| b.labels.iter().any(Option::is_none))
    {
        let branch = plan.remove(pos);
        plan.push(branch);
    }

    // Release the original structure; planned statement ids stay valid
    // because invalidation only severs edges.
    ctx.tree.invalidate(node)?;
    for info in &infos {
        ctx.tree.invalidate(info.node)?;
    }

    let mut when_cases = Vec::with_capacity(plan.len());
    for branch in plan {
        let mut labels = Vec::with_capacity(branch.labels.len());
        for label in branch.labels {
            let node = match label {
                Some(expr) => ctx.tree.alloc(NodeKind::WhenValueLabel { expression: expr })?,
                None => ctx.tree.alloc(NodeKind::WhenElseLabel)?,
            };
            labels.push(node);
        }
        let block = ctx.tree.block(branch.statements)?;
        let body = ctx.tree.alloc(NodeKind::BlockStatement { block })?;
        when_cases.push(ctx.tree.alloc(NodeKind::WhenCase { labels, body })?);
    }

    let when = ctx.tree.alloc(NodeKind::When {
        expression,
        cases: when_cases,
    })?;
    ctx.tree.replace(node, when)?;
    Ok(when)
}

/// Fallback when the host supplies no completion fact: a case falls through
/// unless its last statement is an unconditional jump. Coarser than real
/// control-flow analysis (an `if` where both arms return still counts as
/// falling through), erring toward inlining.
fn falls_through_syntactically(ctx: &ConversionContext<'_>, statements: &[NodeId]) -> bool {
    match statements.last() {
        Some(&last) => !matches!(
            ctx.tree.kind(last),
            NodeKind::BreakStatement { .. }
                | NodeKind::ContinueStatement { .. }
                | NodeKind::ReturnStatement { .. }
                | NodeKind::ThrowStatement { .. }
        ),
        None => true,
    }
}

/// Drops a trailing unlabeled `break`; labeled breaks target something else
/// and must survive.
fn strip_trailing_break(ctx: &ConversionContext<'_>, statements: &mut Vec<NodeId>) {
    if let Some(&last) = statements.last() {
        if matches!(
            ctx.tree.kind(last),
            NodeKind::BreakStatement { label: None }
        ) {
            statements.pop();
        }
    }
}
