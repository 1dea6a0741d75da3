//! C-style `for` loops become `for (x in range)` where the shape allows,
//! and a `while` loop otherwise.
//!
//! The range shapes recognized, all over a single counter declared in the
//! loop header with a unit step and no other write to the counter in the
//! body or condition:
//! - `for (int i = a; i < b; i++)`        → `for (i in a until b)`
//! - `for (int i = a; i != b; i++)`       → `for (i in a until b)`
//! - `for (int i = a; i <= b; i++)`       → `for (i in a..b)`
//! - `for (int i = b; i >= a; i--)`       → `for (i in b downTo a)`
//! - `for (int i = b; i > a; i--)`        → `for (i in b downTo a + 1)`
//! - `for (int i = 0; i < arr.length; i++)`      → `for (i in arr.indices)`
//! - `for (int i = arr.length - 1; i >= 0; i--)` → `for (i in arr.indices.reversed())`
//!
//! Mirrored conditions (`b > i` for `i < b`) are recognized too. Anything
//! else (non-unit step, counter writes in the body, multiple initializers)
//! falls back to an equivalent while loop.

use j2k_core::{Diagnostic, NodeId, SymbolId};
use j2k_symbols::SymbolKind;
use j2k_tree::node::{BinaryOp, UnaryOp};
use j2k_tree::{AssignmentOp, InvalidTreeState, LiteralKind, NodeKind};
use j2k_types::mapping::{
    DOWN_TO_FQ_NAME, INDICES_FQ_NAME, RANGE_TO_FQ_NAME, REVERSED_FQ_NAME, UNTIL_FQ_NAME,
};

use crate::context::ConversionContext;
use crate::engine::{rewrite_recursively, Conversion};
use crate::passes::collect_nodes;

pub struct ForConversion;

impl Conversion for ForConversion {
    fn name(&self) -> &'static str {
        "for-loop"
    }

    fn run(
        &self,
        ctx: &mut ConversionContext<'_>,
        root: NodeId,
    ) -> Result<(), InvalidTreeState> {
        rewrite_recursively(ctx, root, &mut |ctx: &mut ConversionContext<'_>, node| {
            let NodeKind::JavaForLoop {
                initializers,
                condition,
                updaters,
                body,
            } = ctx.tree.kind(node).clone()
            else {
                return Ok(None);
            };
            if let Some(range) = match_range(ctx, &initializers, condition, &updaters, body) {
                return to_for_in(ctx, node, range, body).map(Some);
            }
            to_while(ctx, node, initializers, condition, updaters, body).map(Some)
        })?;
        Ok(())
    }
}

struct RangeLoop {
    decl_stmt: NodeId,
    var_decl: NodeId,
    start: NodeId,
    condition: NodeId,
    bound: NodeId,
    inclusive: bool,
    reversed: bool,
}

/// Counter reference: a field access resolving to the given local's symbol.
fn is_counter(ctx: &ConversionContext<'_>, node: NodeId, counter: SymbolId) -> bool {
    matches!(
        ctx.tree.kind(node),
        NodeKind::FieldAccessExpression { symbol } if *symbol == counter
    )
}

fn is_int_literal(ctx: &ConversionContext<'_>, node: NodeId, value: &str) -> bool {
    matches!(
        ctx.tree.kind(node),
        NodeKind::Literal { kind: LiteralKind::Int, text } if text == value
    )
}

/// Any assignment or increment/decrement targeting the counter.
fn writes_counter(ctx: &ConversionContext<'_>, root: NodeId, counter: SymbolId) -> bool {
    let Ok(sites) = collect_nodes(&ctx.tree, root, &|k| {
        matches!(
            k,
            NodeKind::AssignmentExpression { .. }
                | NodeKind::PrefixExpression { .. }
                | NodeKind::PostfixExpression { .. }
        )
    }) else {
        return true;
    };
    sites.into_iter().any(|site| match *ctx.tree.kind(site) {
        NodeKind::AssignmentExpression { target, .. } => is_counter(ctx, target, counter),
        NodeKind::PrefixExpression { operand, op }
        | NodeKind::PostfixExpression { operand, op } => {
            matches!(op, UnaryOp::Increment | UnaryOp::Decrement)
                && is_counter(ctx, operand, counter)
        }
        _ => false,
    })
}

/// `i < b` with the counter on the right becomes `b > i`; normalize to the
/// counter-on-the-left operator.
fn mirrored(op: BinaryOp) -> Option<BinaryOp> {
    Some(match op {
        BinaryOp::Less => BinaryOp::Greater,
        BinaryOp::Greater => BinaryOp::Less,
        BinaryOp::LessOrEq => BinaryOp::GreaterOrEq,
        BinaryOp::GreaterOrEq => BinaryOp::LessOrEq,
        BinaryOp::NotEq => BinaryOp::NotEq,
        _ => return None,
    })
}

fn match_range(
    ctx: &ConversionContext<'_>,
    initializers: &[NodeId],
    condition: NodeId,
    updaters: &[NodeId],
    body: NodeId,
) -> Option<RangeLoop> {
    let [decl_stmt] = initializers else {
        return None;
    };
    let NodeKind::DeclarationStatement { declarations } = ctx.tree.kind(*decl_stmt) else {
        return None;
    };
    let [var_decl] = declarations.as_slice() else {
        return None;
    };
    let NodeKind::LocalVariable(v) = ctx.tree.kind(*var_decl) else {
        return None;
    };
    if matches!(ctx.tree.kind(v.initializer), NodeKind::StubExpression) {
        return None;
    }
    let counter = ctx.symbols.universe_symbol_of(*var_decl)?;

    let NodeKind::BinaryExpression { left, right, op } = *ctx.tree.kind(condition) else {
        return None;
    };
    let (bound, op) = if is_counter(ctx, left, counter) {
        (right, op)
    } else if is_counter(ctx, right, counter) {
        (left, mirrored(op)?)
    } else {
        return None;
    };

    let [updater] = updaters else {
        return None;
    };
    let NodeKind::ExpressionStatement { expression } = *ctx.tree.kind(*updater) else {
        return None;
    };
    let step = unit_step(ctx, expression, counter)?;
    let reversed = step < 0;

    let inclusive = match (op, reversed) {
        (BinaryOp::Less, false) | (BinaryOp::Greater, true) | (BinaryOp::NotEq, _) => false,
        (BinaryOp::LessOrEq, false) | (BinaryOp::GreaterOrEq, true) => true,
        _ => return None,
    };

    // The counter must only move through the updater; any other write would
    // be an assignment to the loop `val`.
    if writes_counter(ctx, body, counter) || writes_counter(ctx, condition, counter) {
        return None;
    }

    Some(RangeLoop {
        decl_stmt: *decl_stmt,
        var_decl: *var_decl,
        start: v.initializer,
        condition,
        bound,
        inclusive,
        reversed,
    })
}

/// `i++`, `++i`, `i--`, `--i`, `i += 1`, `i -= 1` over the counter. Returns
/// the signed step, `None` for anything else (non-unit steps fall back to
/// while).
fn unit_step(ctx: &ConversionContext<'_>, expr: NodeId, counter: SymbolId) -> Option<i32> {
    match *ctx.tree.kind(expr) {
        NodeKind::PostfixExpression { operand, op } | NodeKind::PrefixExpression { operand, op }
            if is_counter(ctx, operand, counter) =>
        {
            match op {
                UnaryOp::Increment => Some(1),
                UnaryOp::Decrement => Some(-1),
                _ => None,
            }
        }
        NodeKind::AssignmentExpression { target, value, op }
            if is_counter(ctx, target, counter) && is_int_literal(ctx, value, "1") =>
        {
            match op {
                AssignmentOp::PlusAssign => Some(1),
                AssignmentOp::MinusAssign => Some(-1),
                _ => None,
            }
        }
        _ => None,
    }
}

/// `receiver.length` where `length` resolves to a field named "length".
fn array_length_receiver(ctx: &ConversionContext<'_>, node: NodeId) -> Option<NodeId> {
    let NodeKind::QualifiedExpression { receiver, selector } = *ctx.tree.kind(node) else {
        return None;
    };
    let NodeKind::FieldAccessExpression { symbol } = *ctx.tree.kind(selector) else {
        return None;
    };
    (ctx.symbols.symbol(symbol).name == "length").then_some(receiver)
}

enum Iteration {
    Until,
    RangeTo,
    DownTo,
    /// `b downTo a + 1`, from an exclusive descending comparison.
    DownToExclusive,
    /// `arr.indices`; the receiver is the array expression.
    Indices(NodeId),
    /// `arr.indices.reversed()`; `minuend` is the `arr.length - 1` start
    /// expression's left operand, released during the rewrite.
    IndicesReversed { arr: NodeId, minuend: NodeId },
}

fn classify(ctx: &ConversionContext<'_>, range: &RangeLoop) -> Iteration {
    match (range.reversed, range.inclusive) {
        (false, false) => {
            if is_int_literal(ctx, range.start, "0") {
                if let Some(arr) = array_length_receiver(ctx, range.bound) {
                    return Iteration::Indices(arr);
                }
            }
            Iteration::Until
        }
        (false, true) => Iteration::RangeTo,
        (true, true) => {
            if is_int_literal(ctx, range.bound, "0") {
                if let NodeKind::BinaryExpression {
                    left,
                    right,
                    op: BinaryOp::Minus,
                } = *ctx.tree.kind(range.start)
                {
                    if is_int_literal(ctx, right, "1") {
                        if let Some(arr) = array_length_receiver(ctx, left) {
                            return Iteration::IndicesReversed { arr, minuend: left };
                        }
                    }
                }
            }
            Iteration::DownTo
        }
        (true, false) => Iteration::DownToExclusive,
    }
}

fn to_for_in(
    ctx: &mut ConversionContext<'_>,
    node: NodeId,
    range: RangeLoop,
    body: NodeId,
) -> Result<NodeId, InvalidTreeState> {
    let shape = classify(ctx, &range);

    // Release everything the replacement reuses. The counter declaration
    // survives as the for-in variable, with its initializer stubbed out.
    let stub = ctx.tree.stub();
    ctx.tree.replace_child(range.var_decl, range.start, stub)?;
    ctx.tree.invalidate(node)?;
    ctx.tree.invalidate(range.decl_stmt)?;
    ctx.tree.invalidate(range.condition)?;

    let iteration = match shape {
        Iteration::Until | Iteration::RangeTo | Iteration::DownTo | Iteration::DownToExclusive => {
            let fq_name = match shape {
                Iteration::Until => UNTIL_FQ_NAME,
                Iteration::RangeTo => RANGE_TO_FQ_NAME,
                _ => DOWN_TO_FQ_NAME,
            };
            let bound = if matches!(shape, Iteration::DownToExclusive) {
                // `i > a` stops at `a + 1`.
                let one = ctx.tree.int_literal(1);
                ctx.tree.alloc(NodeKind::BinaryExpression {
                    left: range.bound,
                    right: one,
                    op: BinaryOp::Plus,
                })?
            } else {
                range.bound
            };
            let symbol = ctx.symbols.resolve_by_name(fq_name, SymbolKind::Method);
            let call = ctx.tree.method_call(symbol, vec![bound])?;
            ctx.tree.qualified(range.start, call)?
        }
        Iteration::Indices(arr) => {
            // The bound owned the array expression.
            ctx.tree.invalidate(range.bound)?;
            indices_of(ctx, arr)?
        }
        Iteration::IndicesReversed { arr, minuend } => {
            ctx.tree.invalidate(range.start)?;
            ctx.tree.invalidate(minuend)?;
            let indices = indices_of(ctx, arr)?;
            let reversed = ctx.symbols.resolve_by_name(REVERSED_FQ_NAME, SymbolKind::Method);
            let call = ctx.tree.method_call(reversed, Vec::new())?;
            ctx.tree.qualified(indices, call)?
        }
    };

    let for_in = ctx.tree.alloc(NodeKind::ForIn {
        variable: range.var_decl,
        iteration,
        body,
    })?;
    ctx.tree.replace(node, for_in)?;
    Ok(for_in)
}

fn indices_of(
    ctx: &mut ConversionContext<'_>,
    arr: NodeId,
) -> Result<NodeId, InvalidTreeState> {
    let indices = ctx.symbols.resolve_by_name(INDICES_FQ_NAME, SymbolKind::Field);
    let selector = ctx.tree.field_access(indices);
    ctx.tree.qualified(arr, selector)
}

/// The general fallback: header declarations, then a while loop with the
/// updaters appended to the body.
fn to_while(
    ctx: &mut ConversionContext<'_>,
    node: NodeId,
    initializers: Vec<NodeId>,
    condition: NodeId,
    updaters: Vec<NodeId>,
    body: NodeId,
) -> Result<NodeId, InvalidTreeState> {
    // `continue` would skip the appended updaters.
    if !collect_nodes(&ctx.tree, body, &|k| {
        matches!(k, NodeKind::ContinueStatement { .. })
    })?
    .is_empty()
    {
        ctx.report(Diagnostic::warning(
            "for-continue",
            "`continue` inside a converted for loop skips the loop updaters",
            Some(node),
        ));
    }

    ctx.tree.invalidate(node)?;
    let cond = if matches!(ctx.tree.kind(condition), NodeKind::StubExpression) {
        ctx.tree.bool_literal(true)
    } else {
        condition
    };

    let mut loop_stmts = vec![body];
    loop_stmts.extend(updaters);
    let loop_block = ctx.tree.block(loop_stmts)?;
    let loop_body = ctx.tree.alloc(NodeKind::BlockStatement { block: loop_block })?;
    let while_stmt = ctx.tree.alloc(NodeKind::WhileStatement {
        condition: cond,
        body: loop_body,
    })?;

    let mut outer = initializers;
    outer.push(while_stmt);
    let outer_block = ctx.tree.block(outer)?;
    let replacement = ctx.tree.alloc(NodeKind::BlockStatement { block: outer_block })?;
    ctx.tree.replace(node, replacement)?;
    Ok(replacement)
}
