//! Label checking for `break`/`continue`.
//!
//! The labeled-statement shape itself survives (Kotlin has the same
//! construct); what needs checking is that every labeled jump still targets
//! an enclosing label, since other rewrites may have restructured the loops
//! in between.

use j2k_core::{Diagnostic, NodeId};
use j2k_tree::{InvalidTreeState, NodeKind, Tree};

use crate::context::ConversionContext;
use crate::engine::Conversion;
use crate::passes::collect_nodes;

pub struct LabelConversion;

impl Conversion for LabelConversion {
    fn name(&self) -> &'static str {
        "labels"
    }

    fn run(
        &self,
        ctx: &mut ConversionContext<'_>,
        root: NodeId,
    ) -> Result<(), InvalidTreeState> {
        let jumps = collect_nodes(&ctx.tree, root, &|k| {
            matches!(
                k,
                NodeKind::BreakStatement { label: Some(_) }
                    | NodeKind::ContinueStatement { label: Some(_) }
            )
        })?;
        for jump in jumps {
            let label = match ctx.tree.kind(jump) {
                NodeKind::BreakStatement { label: Some(l) }
                | NodeKind::ContinueStatement { label: Some(l) } => *l,
                _ => continue,
            };
            let NodeKind::NameIdentifier { name } = ctx.tree.kind(label).clone() else {
                continue;
            };
            if !has_enclosing_label(&ctx.tree, jump, &name) {
                ctx.report(Diagnostic::warning(
                    "unresolved-label",
                    format!("label `{name}` does not resolve to an enclosing statement"),
                    Some(jump),
                ));
            }
        }
        Ok(())
    }
}

fn has_enclosing_label(tree: &Tree, jump: NodeId, name: &str) -> bool {
    tree.ancestors(jump).any(|ancestor| {
        let NodeKind::LabeledStatement { labels, .. } = tree.kind(ancestor) else {
            return false;
        };
        labels.iter().any(|l| {
            matches!(tree.kind(*l), NodeKind::NameIdentifier { name: n } if n == name)
        })
    })
}
