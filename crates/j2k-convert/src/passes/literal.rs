//! Literal spellings Java accepts but Kotlin does not.
//!
//! Octal integer literals become decimal, the lowercase `l` long suffix
//! becomes `L`, the `d`/`D` double suffix disappears, float literals keep an
//! explicit `f`, and bare-dot decimals (`1.`, `.5`) gain their missing digit.
//!
//! Runs as a tree visitor: literals are leaves, so the rewrite is a payload
//! swap with no structural work.

use j2k_core::{NodeId, SmolStr};
use j2k_tree::{walk, InvalidTreeState, LiteralKind, NodeKind, Tree, Visitor};

use crate::context::ConversionContext;
use crate::engine::Conversion;

pub struct LiteralConversion;

impl Conversion for LiteralConversion {
    fn name(&self) -> &'static str {
        "literal"
    }

    fn run(
        &self,
        ctx: &mut ConversionContext<'_>,
        root: NodeId,
    ) -> Result<(), InvalidTreeState> {
        let mut result = Ok(());
        walk(&mut LiteralVisitor, &mut ctx.tree, root, &mut result)?;
        result
    }
}

struct LiteralVisitor;

impl Visitor<Result<(), InvalidTreeState>> for LiteralVisitor {
    fn visit_literal(
        &mut self,
        tree: &mut Tree,
        id: NodeId,
        result: &mut Result<(), InvalidTreeState>,
    ) {
        if result.is_err() {
            return;
        }
        let NodeKind::Literal { kind, text } = tree.kind(id).clone() else {
            return;
        };
        if let Some(fixed) = fix_literal(kind, &text) {
            *result = tree.set_kind(
                id,
                NodeKind::Literal {
                    kind,
                    text: SmolStr::new(&fixed),
                },
            );
        }
    }
}

fn fix_literal(kind: LiteralKind, text: &str) -> Option<String> {
    let fixed = match kind {
        LiteralKind::Int => fix_integer(text)?,
        LiteralKind::Long => {
            let base = text.trim_end_matches(['l', 'L']);
            let digits = fix_integer(base).unwrap_or_else(|| base.to_string());
            format!("{digits}L")
        }
        LiteralKind::Float => {
            let base = text.trim_end_matches(['f', 'F']);
            format!("{}f", fix_decimal(base))
        }
        LiteralKind::Double => fix_decimal(text.trim_end_matches(['d', 'D'])),
        _ => return None,
    };
    (fixed != text).then_some(fixed)
}

/// Octal to decimal; hex and binary pass through.
fn fix_integer(text: &str) -> Option<String> {
    let digits = text.strip_prefix('0')?;
    if digits.is_empty() || digits.starts_with(['x', 'X', 'b', 'B']) {
        return None;
    }
    let value = i64::from_str_radix(digits, 8).ok()?;
    Some(value.to_string())
}

fn fix_decimal(text: &str) -> String {
    let mut out = text.to_string();
    if out.starts_with('.') {
        out.insert(0, '0');
    }
    if out.ends_with('.') {
        out.push('0');
    }
    out
}
