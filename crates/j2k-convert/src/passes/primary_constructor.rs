//! Primary constructor detection.
//!
//! A class gets a primary constructor when one constructor is the delegation
//! root: every other constructor delegates to it with `this(...)`, and it
//! delegates only upward (`super(...)` or nothing). The promoted
//! constructor's body becomes an `init { }` block, and its symbol is
//! re-targeted so call sites follow the promotion.

use j2k_core::NodeId;
use j2k_tree::{ClassDecl, ConstructorDecl, InvalidTreeState, NodeKind};
use tracing::debug;

use crate::context::ConversionContext;
use crate::engine::Conversion;
use crate::passes::collect_nodes;

pub struct PrimaryConstructorConversion;

impl Conversion for PrimaryConstructorConversion {
    fn name(&self) -> &'static str {
        "primary-constructor"
    }

    fn run(
        &self,
        ctx: &mut ConversionContext<'_>,
        root: NodeId,
    ) -> Result<(), InvalidTreeState> {
        let classes = collect_nodes(&ctx.tree, root, &|k| matches!(k, NodeKind::Class(_)))?;
        for class in classes {
            let NodeKind::Class(decl) = ctx.tree.kind(class).clone() else {
                continue;
            };
            if let Some(candidate) = promotion_candidate(ctx, &decl) {
                promote(ctx, class, decl, candidate)?;
            }
        }
        Ok(())
    }
}

/// The constructor all siblings delegate to, if the class has one.
fn promotion_candidate(ctx: &ConversionContext<'_>, class: &ClassDecl) -> Option<NodeId> {
    let mut roots = Vec::new();
    let mut delegating = 0usize;
    let mut total = 0usize;
    for &member in &class.declarations {
        let NodeKind::SecondaryConstructor(c) = ctx.tree.kind(member) else {
            continue;
        };
        total += 1;
        if matches!(ctx.tree.kind(c.delegation.target), NodeKind::ThisExpression) {
            delegating += 1;
        } else {
            roots.push(member);
        }
    }
    // Exactly one root, everyone else points at it.
    let [candidate] = roots.as_slice() else {
        return None;
    };
    (delegating + 1 == total).then_some(*candidate)
}

fn promote(
    ctx: &mut ConversionContext<'_>,
    class: NodeId,
    class_decl: ClassDecl,
    ctor: NodeId,
) -> Result<(), InvalidTreeState> {
    let NodeKind::SecondaryConstructor(c) = ctx.tree.kind(ctor).clone() else {
        return Ok(());
    };
    let ConstructorDecl {
        modifiers,
        name,
        parameters,
        delegation,
        body,
    } = c;

    let body_statements = match ctx.tree.kind(body) {
        NodeKind::Block { statements } => statements.clone(),
        _ => Vec::new(),
    };

    ctx.tree.invalidate(ctor)?;
    let primary = ctx.tree.alloc(NodeKind::PrimaryConstructor {
        modifiers,
        name,
        parameters,
        delegation,
    })?;
    let init = if body_statements.is_empty() {
        None
    } else {
        Some(ctx.tree.alloc(NodeKind::InitDeclaration { block: body })?)
    };

    if let Some(symbol) = ctx.symbols.universe_symbol_of(ctor) {
        if let Err(err) = ctx.symbols.transfer_symbol(symbol, primary) {
            debug!(?err, "constructor symbol not transferred");
        }
    }

    let mut declarations = Vec::with_capacity(class_decl.declarations.len() + 1);
    for member in class_decl.declarations {
        if member == ctor {
            declarations.push(primary);
            if let Some(init) = init {
                declarations.push(init);
            }
        } else {
            declarations.push(member);
        }
    }
    ctx.tree.set_kind(
        class,
        NodeKind::Class(ClassDecl {
            declarations,
            ..class_decl
        }),
    )
}
