//! Java array creation becomes the Kotlin factory calls.
//!
//! `new int[] {1, 2, 3}` → `intArrayOf(1, 2, 3)`, `new T[] {...}` →
//! `arrayOf(...)`, `new int[n]` → `IntArray(n)`, and `new T[n]` →
//! `arrayOfNulls<T>(n)`. Multi-dimensional creation nests: each additional
//! sized dimension becomes an `Array(n) { ... }` constructor with the inner
//! creation in the lambda, and trailing unsized dimensions fold into the
//! `arrayOfNulls` type argument.

use j2k_core::{Diagnostic, NodeId};
use j2k_symbols::SymbolKind;
use j2k_tree::{InvalidTreeState, NodeKind};
use j2k_types::mapping::{
    primitive_array_factory_fq_name, primitive_array_fq_name, ARRAY_FQ_NAME, ARRAY_OF_FQ_NAME,
    ARRAY_OF_NULLS_FQ_NAME,
};
use j2k_types::{Nullability, Ty};

use crate::context::ConversionContext;
use crate::engine::{rewrite_recursively, Conversion};

pub struct ArrayInitializerConversion;

impl Conversion for ArrayInitializerConversion {
    fn name(&self) -> &'static str {
        "array-initializer"
    }

    fn run(
        &self,
        ctx: &mut ConversionContext<'_>,
        root: NodeId,
    ) -> Result<(), InvalidTreeState> {
        rewrite_recursively(ctx, root, &mut |ctx: &mut ConversionContext<'_>, node| {
            match ctx.tree.kind(node).clone() {
                NodeKind::JavaNewArray {
                    type_element,
                    initializer,
                } => convert_filled(ctx, node, type_element, initializer).map(Some),
                NodeKind::JavaNewEmptyArray {
                    type_element,
                    dimensions,
                } => convert_sized(ctx, node, type_element, dimensions),
                _ => Ok(None),
            }
        })?;
        Ok(())
    }
}

fn element_ty(ctx: &ConversionContext<'_>, type_element: NodeId) -> Ty {
    match ctx.tree.kind(type_element) {
        NodeKind::TypeElement { ty } => ty.clone(),
        _ => Ty::NoType,
    }
}

/// `new T[] { ... }` — elements present, factory call by element type.
fn convert_filled(
    ctx: &mut ConversionContext<'_>,
    node: NodeId,
    type_element: NodeId,
    initializer: Vec<NodeId>,
) -> Result<NodeId, InvalidTreeState> {
    let elem = element_ty(ctx, type_element);
    let factory = match elem.as_primitive() {
        Some(kind) => primitive_array_factory_fq_name(kind),
        None => ARRAY_OF_FQ_NAME,
    };
    let symbol = ctx.symbols.resolve_by_name(factory, SymbolKind::Method);
    ctx.tree.invalidate(node)?;
    let call = ctx.tree.method_call(symbol, initializer)?;
    ctx.tree.replace(node, call)?;
    Ok(call)
}

/// `new T[n]...` — sized dimensions form a prefix; the rest must be empty
/// brackets.
fn convert_sized(
    ctx: &mut ConversionContext<'_>,
    node: NodeId,
    type_element: NodeId,
    dimensions: Vec<NodeId>,
) -> Result<Option<NodeId>, InvalidTreeState> {
    let sized = dimensions
        .iter()
        .take_while(|d| !matches!(ctx.tree.kind(**d), NodeKind::StubExpression))
        .count();
    let prefix_only = dimensions[sized..]
        .iter()
        .all(|d| matches!(ctx.tree.kind(*d), NodeKind::StubExpression));
    if sized == 0 || !prefix_only {
        ctx.report(Diagnostic::warning(
            "array-dimensions",
            "array creation with a size after an empty dimension is not converted",
            Some(node),
        ));
        return Ok(None);
    }
    let trailing = dimensions.len() - sized;
    let elem = element_ty(ctx, type_element);

    ctx.tree.invalidate(node)?;
    let replacement = build_creation(ctx, &elem, &dimensions[..sized], trailing, type_element)?;
    ctx.tree.replace(node, replacement)?;
    Ok(Some(replacement))
}

/// One factory call per sized dimension, innermost first:
/// `new int[a][b]` → `Array(a) { IntArray(b) }`,
/// `new int[a][]` → `arrayOfNulls<IntArray>(a)`.
fn build_creation(
    ctx: &mut ConversionContext<'_>,
    elem: &Ty,
    sized: &[NodeId],
    trailing: usize,
    type_element: NodeId,
) -> Result<NodeId, InvalidTreeState> {
    let length = sized[0];

    if sized.len() > 1 {
        // Array(n) { <inner creation> }.
        let inner = build_creation(ctx, elem, &sized[1..], trailing, type_element)?;
        let statement = ctx.tree.expression_statement(inner)?;
        let lambda = ctx.tree.alloc(NodeKind::LambdaExpression {
            parameters: Vec::new(),
            statement,
        })?;
        let class = ctx.symbols.resolve_by_name(ARRAY_FQ_NAME, SymbolKind::Class);
        return ctx.tree.alloc(NodeKind::NewExpression {
            symbol: class,
            arguments: vec![length, lambda],
        });
    }

    match (elem.as_primitive(), trailing) {
        (Some(kind), 0) => {
            // IntArray(n) and friends zero-fill like Java.
            let class = ctx
                .symbols
                .resolve_by_name(primitive_array_fq_name(kind), SymbolKind::Class);
            ctx.tree.alloc(NodeKind::NewExpression {
                symbol: class,
                arguments: vec![length],
            })
        }
        _ => {
            let mut ty = elem.clone();
            for _ in 0..trailing {
                ty = Ty::array(ty, Nullability::Default);
            }
            let symbol = ctx
                .symbols
                .resolve_by_name(ARRAY_OF_NULLS_FQ_NAME, SymbolKind::Method);
            ctx.tree.set_kind(type_element, NodeKind::TypeElement { ty })?;
            ctx.tree.alloc(NodeKind::MethodCallExpression {
                symbol,
                type_arguments: vec![type_element],
                arguments: vec![length],
            })
        }
    }
}
