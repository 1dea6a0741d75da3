//! Java modifier keywords that change meaning or disappear in Kotlin.
//!
//! Package-private becomes `internal` (the closest Kotlin scope, not an exact
//! match), explicit `public` is dropped as the default, and the JVM-flag
//! modifiers that Kotlin expresses as annotations are dropped with a
//! diagnostic so the caller knows to review them.

use j2k_core::{Diagnostic, NodeId};
use j2k_tree::node::{OtherModifier, Visibility};
use j2k_tree::{InvalidTreeState, NodeKind};

use crate::context::ConversionContext;
use crate::engine::Conversion;
use crate::passes::collect_nodes;

pub struct JavaModifierConversion;

impl Conversion for JavaModifierConversion {
    fn name(&self) -> &'static str {
        "java-modifiers"
    }

    fn run(
        &self,
        ctx: &mut ConversionContext<'_>,
        root: NodeId,
    ) -> Result<(), InvalidTreeState> {
        let modifiers = collect_nodes(&ctx.tree, root, &|k| {
            matches!(
                k,
                NodeKind::VisibilityModifier(_) | NodeKind::ExtraModifier(_)
            )
        })?;
        for node in modifiers {
            match *ctx.tree.kind(node) {
                NodeKind::VisibilityModifier(Visibility::PackagePrivate) => {
                    ctx.tree
                        .set_kind(node, NodeKind::VisibilityModifier(Visibility::Internal))?;
                    ctx.report(Diagnostic::warning(
                        "visibility-widened",
                        "package-private has no Kotlin equivalent; widened to `internal`",
                        Some(node),
                    ));
                }
                NodeKind::VisibilityModifier(Visibility::Public) => {
                    // Kotlin default.
                    ctx.tree.detach(node)?;
                }
                NodeKind::ExtraModifier(OtherModifier::Synchronized) => {
                    ctx.tree.detach(node)?;
                    ctx.report(Diagnostic::warning(
                        "modifier-dropped",
                        "`synchronized` dropped; annotate with @Synchronized manually",
                        Some(node),
                    ));
                }
                NodeKind::ExtraModifier(OtherModifier::Transient) => {
                    ctx.tree.detach(node)?;
                    ctx.report(Diagnostic::warning(
                        "modifier-dropped",
                        "`transient` dropped; annotate with @Transient manually",
                        Some(node),
                    ));
                }
                NodeKind::ExtraModifier(OtherModifier::Volatile) => {
                    ctx.tree.detach(node)?;
                    ctx.report(Diagnostic::warning(
                        "modifier-dropped",
                        "`volatile` dropped; annotate with @Volatile manually",
                        Some(node),
                    ));
                }
                NodeKind::ExtraModifier(OtherModifier::Strictfp) => {
                    ctx.tree.detach(node)?;
                    ctx.report(Diagnostic::warning(
                        "modifier-dropped",
                        "`strictfp` has no Kotlin equivalent",
                        Some(node),
                    ));
                }
                NodeKind::ExtraModifier(OtherModifier::Static) => {
                    ctx.report(Diagnostic::warning(
                        "static-member",
                        "static member kept in place; move to a companion object manually",
                        Some(node),
                    ));
                }
                _ => {}
            }
        }
        Ok(())
    }
}
