//! End-to-end checks of the pass catalog over hand-built trees.

use j2k_convert::passes::array_initializer::ArrayInitializerConversion;
use j2k_convert::passes::constructor::ConstructorConversion;
use j2k_convert::passes::for_loop::ForConversion;
use j2k_convert::passes::nullability::NullabilityResolutionConversion;
use j2k_convert::passes::operators::OperatorConversion;
use j2k_convert::passes::primary_constructor::PrimaryConstructorConversion;
use j2k_convert::passes::switch_to_when::SwitchToWhenConversion;
use j2k_convert::{
    default_conversions, Conversion, ConversionContext, ConversionEngine, ConverterSettings,
    EngineError, RunState,
};
use j2k_core::{NodeId, SymbolId};
use j2k_symbols::{StaticResolver, SymbolKind, SymbolProvider};
use j2k_tree::{
    AssignmentOp, BinaryOp, ClassDecl, ClassKind, ConstructorDecl, DelegationCall, Mutability,
    NodeKind, Tree, UnaryOp, VariableDecl,
};
use j2k_types::mapping::{DOWN_TO_FQ_NAME, INDICES_FQ_NAME, UNTIL_FQ_NAME};
use j2k_types::{Nullability, PrimitiveKind, Ty};
use pretty_assertions::assert_eq;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn context(resolver: &StaticResolver) -> ConversionContext<'_> {
    ConversionContext::new(
        Tree::new(),
        SymbolProvider::new(resolver),
        ConverterSettings::default(),
    )
}

/// `for (int i = <start>; i <op> <bound>; <update>) { <body> }`, wrapped in
/// a block so the loop has a parent to be replaced under.
fn build_counter_loop(
    ctx: &mut ConversionContext<'_>,
    start: NodeId,
    op: BinaryOp,
    bound: NodeId,
    update: impl FnOnce(&mut ConversionContext<'_>, SymbolId) -> NodeId,
    body: impl FnOnce(&mut ConversionContext<'_>, SymbolId) -> Vec<NodeId>,
) -> (NodeId, NodeId, NodeId) {
    let var_decl = ctx
        .tree
        .local_variable(
            Mutability::Var,
            Ty::Primitive(PrimitiveKind::Int),
            "i",
            start,
        )
        .unwrap();
    let counter = ctx
        .symbols
        .provide_universe_symbol(var_decl, SymbolKind::Field, "i");
    let decl_stmt = ctx
        .tree
        .alloc(NodeKind::DeclarationStatement {
            declarations: vec![var_decl],
        })
        .unwrap();
    let counter_ref = ctx.tree.field_access(counter);
    let condition = ctx
        .tree
        .alloc(NodeKind::BinaryExpression {
            left: counter_ref,
            right: bound,
            op,
        })
        .unwrap();
    let update_expr = update(ctx, counter);
    let updater = ctx.tree.expression_statement(update_expr).unwrap();
    let body_stmts = body(ctx, counter);
    let body = ctx.tree.block(body_stmts).unwrap();
    let for_node = ctx
        .tree
        .alloc(NodeKind::JavaForLoop {
            initializers: vec![decl_stmt],
            condition,
            updaters: vec![updater],
            body,
        })
        .unwrap();
    let outer = ctx.tree.block(vec![for_node]).unwrap();
    (outer, for_node, var_decl)
}

fn increment(ctx: &mut ConversionContext<'_>, counter: SymbolId) -> NodeId {
    let operand = ctx.tree.field_access(counter);
    ctx.tree
        .alloc(NodeKind::PostfixExpression {
            operand,
            op: UnaryOp::Increment,
        })
        .unwrap()
}

fn decrement(ctx: &mut ConversionContext<'_>, counter: SymbolId) -> NodeId {
    let operand = ctx.tree.field_access(counter);
    ctx.tree
        .alloc(NodeKind::PostfixExpression {
            operand,
            op: UnaryOp::Decrement,
        })
        .unwrap()
}

fn empty_body(_: &mut ConversionContext<'_>, _: SymbolId) -> Vec<NodeId> {
    Vec::new()
}

#[test]
fn for_over_array_length_becomes_indices() {
    let resolver = StaticResolver::new();
    let mut ctx = context(&resolver);

    let arr = ctx.symbols.resolve_by_name("arr", SymbolKind::Field);
    let length = ctx.symbols.resolve_by_name("length", SymbolKind::Field);
    let start = ctx.tree.int_literal(0);
    let arr_ref = ctx.tree.field_access(arr);
    let length_ref = ctx.tree.field_access(length);
    let bound = ctx.tree.qualified(arr_ref, length_ref).unwrap();
    let (outer, _, var_decl) =
        build_counter_loop(&mut ctx, start, BinaryOp::Less, bound, increment, empty_body);

    ForConversion.run(&mut ctx, outer).unwrap();

    let children = ctx.tree.children(outer).unwrap();
    assert_eq!(children.len(), 1);
    let NodeKind::ForIn {
        variable,
        iteration,
        ..
    } = *ctx.tree.kind(children[0])
    else {
        panic!("expected a for-in loop, got {:?}", ctx.tree.kind(children[0]));
    };
    assert_eq!(variable, var_decl);

    let NodeKind::QualifiedExpression { receiver, selector } = *ctx.tree.kind(iteration) else {
        panic!("expected arr.indices");
    };
    assert!(matches!(
        ctx.tree.kind(receiver),
        NodeKind::FieldAccessExpression { symbol } if *symbol == arr
    ));
    let NodeKind::FieldAccessExpression { symbol } = *ctx.tree.kind(selector) else {
        panic!("expected a field selector");
    };
    assert_eq!(ctx.symbols.symbol(symbol).fq_name, INDICES_FQ_NAME);
}

#[test]
fn non_unit_step_falls_back_to_while() {
    let resolver = StaticResolver::new();
    let mut ctx = context(&resolver);

    let start = ctx.tree.int_literal(0);
    let bound = ctx.tree.int_literal(10);
    let (outer, _, _) = build_counter_loop(
        &mut ctx,
        start,
        BinaryOp::Less,
        bound,
        |ctx, counter| {
            let target = ctx.tree.field_access(counter);
            let two = ctx.tree.int_literal(2);
            ctx.tree
                .alloc(NodeKind::AssignmentExpression {
                    target,
                    value: two,
                    op: AssignmentOp::PlusAssign,
                })
                .unwrap()
        },
        empty_body,
    );

    ForConversion.run(&mut ctx, outer).unwrap();

    let children = ctx.tree.children(outer).unwrap();
    let NodeKind::BlockStatement { block } = *ctx.tree.kind(children[0]) else {
        panic!("expected the while fallback block");
    };
    let statements = ctx.tree.children(block).unwrap();
    assert_eq!(statements.len(), 2);
    assert!(matches!(
        ctx.tree.kind(statements[0]),
        NodeKind::DeclarationStatement { .. }
    ));
    let NodeKind::WhileStatement { body, .. } = *ctx.tree.kind(statements[1]) else {
        panic!("expected a while loop");
    };
    // Loop body carries the original body plus the updater.
    let NodeKind::BlockStatement { block } = *ctx.tree.kind(body) else {
        panic!("expected a block body");
    };
    assert_eq!(ctx.tree.children(block).unwrap().len(), 2);
}

#[test]
fn counter_write_in_body_falls_back_to_while() {
    let resolver = StaticResolver::new();
    let mut ctx = context(&resolver);

    let start = ctx.tree.int_literal(0);
    let bound = ctx.tree.int_literal(10);
    let (outer, _, _) = build_counter_loop(
        &mut ctx,
        start,
        BinaryOp::Less,
        bound,
        increment,
        |ctx, counter| {
            // `i = 5` in the body: a for-in `val` could not absorb it.
            let target = ctx.tree.field_access(counter);
            let five = ctx.tree.int_literal(5);
            let assign = ctx
                .tree
                .alloc(NodeKind::AssignmentExpression {
                    target,
                    value: five,
                    op: AssignmentOp::Assign,
                })
                .unwrap();
            vec![ctx.tree.expression_statement(assign).unwrap()]
        },
    );

    ForConversion.run(&mut ctx, outer).unwrap();

    let children = ctx.tree.children(outer).unwrap();
    let NodeKind::BlockStatement { block } = *ctx.tree.kind(children[0]) else {
        panic!(
            "loop with a counter write must stay a while loop, got {:?}",
            ctx.tree.kind(children[0])
        );
    };
    let statements = ctx.tree.children(block).unwrap();
    assert!(matches!(
        ctx.tree.kind(statements[1]),
        NodeKind::WhileStatement { .. }
    ));
}

#[test]
fn not_equal_bound_becomes_until() {
    let resolver = StaticResolver::new();
    let mut ctx = context(&resolver);

    let start = ctx.tree.int_literal(0);
    let bound = ctx.tree.int_literal(10);
    let (outer, _, _) =
        build_counter_loop(&mut ctx, start, BinaryOp::NotEq, bound, increment, empty_body);

    ForConversion.run(&mut ctx, outer).unwrap();

    let children = ctx.tree.children(outer).unwrap();
    let NodeKind::ForIn { iteration, .. } = *ctx.tree.kind(children[0]) else {
        panic!("expected a for-in loop, got {:?}", ctx.tree.kind(children[0]));
    };
    let NodeKind::QualifiedExpression { receiver, selector } = *ctx.tree.kind(iteration) else {
        panic!("expected a range expression");
    };
    assert_eq!(receiver, start);
    let NodeKind::MethodCallExpression {
        symbol, arguments, ..
    } = ctx.tree.kind(selector).clone()
    else {
        panic!("expected a range call");
    };
    assert_eq!(ctx.symbols.symbol(symbol).fq_name, UNTIL_FQ_NAME);
    assert_eq!(arguments, vec![bound]);
}

#[test]
fn exclusive_descending_loop_stops_above_the_bound() {
    let resolver = StaticResolver::new();
    let mut ctx = context(&resolver);

    let start = ctx.tree.int_literal(10);
    let bound = ctx.tree.int_literal(0);
    let (outer, _, _) =
        build_counter_loop(&mut ctx, start, BinaryOp::Greater, bound, decrement, empty_body);

    ForConversion.run(&mut ctx, outer).unwrap();

    let children = ctx.tree.children(outer).unwrap();
    let NodeKind::ForIn { iteration, .. } = *ctx.tree.kind(children[0]) else {
        panic!("expected a for-in loop, got {:?}", ctx.tree.kind(children[0]));
    };
    let NodeKind::QualifiedExpression { receiver, selector } = *ctx.tree.kind(iteration) else {
        panic!("expected a range expression");
    };
    assert_eq!(receiver, start);
    let NodeKind::MethodCallExpression {
        symbol, arguments, ..
    } = ctx.tree.kind(selector).clone()
    else {
        panic!("expected a range call");
    };
    assert_eq!(ctx.symbols.symbol(symbol).fq_name, DOWN_TO_FQ_NAME);
    // `i > 0` stops at `0 + 1`.
    assert_eq!(arguments.len(), 1);
    let NodeKind::BinaryExpression { left, right, op } = *ctx.tree.kind(arguments[0]) else {
        panic!("expected the adjusted bound");
    };
    assert_eq!(op, BinaryOp::Plus);
    assert_eq!(left, bound);
    assert!(matches!(
        ctx.tree.kind(right),
        NodeKind::Literal { text, .. } if text == "1"
    ));
}

#[test]
fn mirrored_condition_is_recognized() {
    let resolver = StaticResolver::new();
    let mut ctx = context(&resolver);

    let start = ctx.tree.int_literal(0);
    let var_decl = ctx
        .tree
        .local_variable(
            Mutability::Var,
            Ty::Primitive(PrimitiveKind::Int),
            "i",
            start,
        )
        .unwrap();
    let counter = ctx
        .symbols
        .provide_universe_symbol(var_decl, SymbolKind::Field, "i");
    let decl_stmt = ctx
        .tree
        .alloc(NodeKind::DeclarationStatement {
            declarations: vec![var_decl],
        })
        .unwrap();
    // `10 > i`, the counter on the right.
    let bound = ctx.tree.int_literal(10);
    let counter_ref = ctx.tree.field_access(counter);
    let condition = ctx
        .tree
        .alloc(NodeKind::BinaryExpression {
            left: bound,
            right: counter_ref,
            op: BinaryOp::Greater,
        })
        .unwrap();
    let update_expr = increment(&mut ctx, counter);
    let updater = ctx.tree.expression_statement(update_expr).unwrap();
    let body = ctx.tree.block(vec![]).unwrap();
    let for_node = ctx
        .tree
        .alloc(NodeKind::JavaForLoop {
            initializers: vec![decl_stmt],
            condition,
            updaters: vec![updater],
            body,
        })
        .unwrap();
    let outer = ctx.tree.block(vec![for_node]).unwrap();

    ForConversion.run(&mut ctx, outer).unwrap();

    let children = ctx.tree.children(outer).unwrap();
    let NodeKind::ForIn { iteration, .. } = *ctx.tree.kind(children[0]) else {
        panic!("expected a for-in loop, got {:?}", ctx.tree.kind(children[0]));
    };
    let NodeKind::QualifiedExpression { receiver, selector } = *ctx.tree.kind(iteration) else {
        panic!("expected a range expression");
    };
    assert_eq!(receiver, start);
    let NodeKind::MethodCallExpression {
        symbol, arguments, ..
    } = ctx.tree.kind(selector).clone()
    else {
        panic!("expected a range call");
    };
    assert_eq!(ctx.symbols.symbol(symbol).fq_name, UNTIL_FQ_NAME);
    assert_eq!(arguments, vec![bound]);
}

#[test]
fn switch_merges_empty_case_labels() {
    let mut tree = Tree::new();
    let subject = tree.int_literal(7);
    let one = tree.int_literal(1);
    let case_one = tree
        .alloc(NodeKind::JavaSwitchCase {
            label: Some(one),
            statements: vec![],
        })
        .unwrap();
    let two = tree.int_literal(2);
    let payload = tree.int_literal(42);
    let stmt = tree.expression_statement(payload).unwrap();
    let brk = tree.alloc(NodeKind::BreakStatement { label: None }).unwrap();
    let case_two = tree
        .alloc(NodeKind::JavaSwitchCase {
            label: Some(two),
            statements: vec![stmt, brk],
        })
        .unwrap();
    let switch = tree
        .alloc(NodeKind::JavaSwitch {
            expression: subject,
            cases: vec![case_one, case_two],
        })
        .unwrap();
    let outer = tree.block(vec![switch]).unwrap();

    let resolver = StaticResolver::new();
    let mut ctx = ConversionContext::new(
        tree,
        SymbolProvider::new(&resolver),
        ConverterSettings::default(),
    );
    SwitchToWhenConversion.run(&mut ctx, outer).unwrap();

    let children = ctx.tree.children(outer).unwrap();
    let NodeKind::When { cases, .. } = ctx.tree.kind(children[0]).clone() else {
        panic!("expected a when");
    };
    assert_eq!(cases.len(), 1);
    let NodeKind::WhenCase { labels, body } = ctx.tree.kind(cases[0]).clone() else {
        panic!("expected a when case");
    };
    // Both labels merged onto the single branch.
    assert_eq!(labels.len(), 2);
    for label in &labels {
        assert!(matches!(
            ctx.tree.kind(*label),
            NodeKind::WhenValueLabel { .. }
        ));
    }
    // Trailing break stripped.
    let NodeKind::BlockStatement { block } = *ctx.tree.kind(body) else {
        panic!("expected a block body");
    };
    assert_eq!(ctx.tree.children(block).unwrap(), vec![stmt]);
}

#[test]
fn switch_fallthrough_inlines_following_case() {
    let mut tree = Tree::new();
    let subject = tree.int_literal(0);
    let ten = tree.int_literal(10);
    let a = tree.int_literal(1);
    let stmt_a = tree.expression_statement(a).unwrap();
    let case_a = tree
        .alloc(NodeKind::JavaSwitchCase {
            label: Some(ten),
            statements: vec![stmt_a],
        })
        .unwrap();
    let twenty = tree.int_literal(20);
    let b = tree.int_literal(2);
    let stmt_b = tree.expression_statement(b).unwrap();
    let brk = tree.alloc(NodeKind::BreakStatement { label: None }).unwrap();
    let case_b = tree
        .alloc(NodeKind::JavaSwitchCase {
            label: Some(twenty),
            statements: vec![stmt_b, brk],
        })
        .unwrap();
    let switch = tree
        .alloc(NodeKind::JavaSwitch {
            expression: subject,
            cases: vec![case_a, case_b],
        })
        .unwrap();
    let outer = tree.block(vec![switch]).unwrap();

    let mut resolver = StaticResolver::new();
    // Case A runs off its end into case B.
    resolver.set_completes_normally(case_a, true);
    let mut ctx = ConversionContext::new(
        tree,
        SymbolProvider::new(&resolver),
        ConverterSettings::default(),
    );
    SwitchToWhenConversion.run(&mut ctx, outer).unwrap();

    let children = ctx.tree.children(outer).unwrap();
    let NodeKind::When { cases, .. } = ctx.tree.kind(children[0]).clone() else {
        panic!("expected a when");
    };
    assert_eq!(cases.len(), 2);

    let NodeKind::WhenCase { body, .. } = *ctx.tree.kind(cases[0]) else {
        panic!("expected a when case");
    };
    let NodeKind::BlockStatement { block } = *ctx.tree.kind(body) else {
        panic!("expected a block body");
    };
    let branch_a = ctx.tree.children(block).unwrap();
    // Own statement plus a fresh copy of case B's payload, break stripped.
    assert_eq!(branch_a.len(), 2);
    assert_eq!(branch_a[0], stmt_a);
    assert_ne!(branch_a[1], stmt_b);
    assert!(matches!(
        ctx.tree.kind(branch_a[1]),
        NodeKind::ExpressionStatement { .. }
    ));

    let NodeKind::WhenCase { body, .. } = *ctx.tree.kind(cases[1]) else {
        panic!("expected a when case");
    };
    let NodeKind::BlockStatement { block } = *ctx.tree.kind(body) else {
        panic!("expected a block body");
    };
    assert_eq!(ctx.tree.children(block).unwrap(), vec![stmt_b]);
}

fn empty_constructor_parts(ctx: &mut ConversionContext<'_>, name: &str) -> (NodeId, NodeId) {
    let modifiers = ctx.tree.empty_modifier_list();
    let name = ctx.tree.new_name(name);
    (modifiers, name)
}

#[test]
fn primary_constructor_promotion_with_delegating_sibling() {
    let resolver = StaticResolver::new();
    let mut ctx = context(&resolver);

    // Root constructor: delegates nowhere, has a body.
    let (mods_a, name_a) = empty_constructor_parts(&mut ctx, "Widget");
    let target_a = ctx.tree.stub();
    let payload = ctx.tree.int_literal(1);
    let body_stmt = ctx.tree.expression_statement(payload).unwrap();
    let body_a = ctx.tree.block(vec![body_stmt]).unwrap();
    let ctor_a = ctx
        .tree
        .alloc(NodeKind::JavaConstructor(ConstructorDecl {
            modifiers: mods_a,
            name: name_a,
            parameters: vec![],
            delegation: DelegationCall {
                target: target_a,
                arguments: vec![],
            },
            body: body_a,
        }))
        .unwrap();
    let ctor_symbol = ctx
        .symbols
        .provide_universe_symbol(ctor_a, SymbolKind::Method, "Widget");

    // Sibling delegating with this().
    let (mods_b, name_b) = empty_constructor_parts(&mut ctx, "Widget");
    let target_b = ctx.tree.this_expression();
    let body_b = ctx.tree.block(vec![]).unwrap();
    let ctor_b = ctx
        .tree
        .alloc(NodeKind::JavaConstructor(ConstructorDecl {
            modifiers: mods_b,
            name: name_b,
            parameters: vec![],
            delegation: DelegationCall {
                target: target_b,
                arguments: vec![],
            },
            body: body_b,
        }))
        .unwrap();

    let (mods_c, name_c) = empty_constructor_parts(&mut ctx, "Widget");
    let class = ctx
        .tree
        .alloc(NodeKind::Class(ClassDecl {
            modifiers: mods_c,
            name: name_c,
            kind: ClassKind::Class,
            inheritance: vec![],
            declarations: vec![ctor_a, ctor_b],
        }))
        .unwrap();

    ConstructorConversion.run(&mut ctx, class).unwrap();
    PrimaryConstructorConversion.run(&mut ctx, class).unwrap();

    let NodeKind::Class(decl) = ctx.tree.kind(class).clone() else {
        panic!("expected the class");
    };
    assert_eq!(decl.declarations.len(), 3);
    let NodeKind::PrimaryConstructor { .. } = ctx.tree.kind(decl.declarations[0]) else {
        panic!("expected a primary constructor");
    };
    let NodeKind::InitDeclaration { block } = *ctx.tree.kind(decl.declarations[1]) else {
        panic!("expected an init block");
    };
    assert_eq!(ctx.tree.children(block).unwrap(), vec![body_stmt]);
    assert!(matches!(
        ctx.tree.kind(decl.declarations[2]),
        NodeKind::SecondaryConstructor(_)
    ));

    // Call sites follow the promotion.
    assert_eq!(
        ctx.symbols.symbol(ctor_symbol).node_target(),
        Some(decl.declarations[0])
    );
}

#[test]
fn filled_array_becomes_int_array_of() {
    let resolver = StaticResolver::new();
    let mut ctx = context(&resolver);

    let type_element = ctx.tree.new_type_element(Ty::Primitive(PrimitiveKind::Int));
    let elems: Vec<NodeId> = (1..=3).map(|i| ctx.tree.int_literal(i)).collect();
    let new_array = ctx
        .tree
        .alloc(NodeKind::JavaNewArray {
            type_element,
            initializer: elems,
        })
        .unwrap();
    let stmt = ctx.tree.expression_statement(new_array).unwrap();
    let outer = ctx.tree.block(vec![stmt]).unwrap();

    ArrayInitializerConversion.run(&mut ctx, outer).unwrap();

    let NodeKind::ExpressionStatement { expression } = *ctx.tree.kind(stmt) else {
        panic!("statement shape changed");
    };
    let NodeKind::MethodCallExpression {
        symbol, arguments, ..
    } = ctx.tree.kind(expression).clone()
    else {
        panic!("expected a factory call");
    };
    assert_eq!(ctx.symbols.symbol(symbol).fq_name, "kotlin.intArrayOf");
    assert_eq!(arguments.len(), 3);
}

#[test]
fn sized_object_array_becomes_array_of_nulls() {
    let resolver = StaticResolver::new();
    let mut ctx = context(&resolver);

    let string = ctx
        .symbols
        .resolve_by_name("java.lang.String", SymbolKind::Class);
    let type_element = ctx
        .tree
        .new_type_element(Ty::class(string, vec![], Nullability::Default));
    let size = ctx.tree.int_literal(5);
    let new_array = ctx
        .tree
        .alloc(NodeKind::JavaNewEmptyArray {
            type_element,
            dimensions: vec![size],
        })
        .unwrap();
    let stmt = ctx.tree.expression_statement(new_array).unwrap();
    let outer = ctx.tree.block(vec![stmt]).unwrap();

    ArrayInitializerConversion.run(&mut ctx, outer).unwrap();

    let NodeKind::ExpressionStatement { expression } = *ctx.tree.kind(stmt) else {
        panic!("statement shape changed");
    };
    let NodeKind::MethodCallExpression {
        symbol,
        type_arguments,
        arguments,
    } = ctx.tree.kind(expression).clone()
    else {
        panic!("expected arrayOfNulls");
    };
    assert_eq!(ctx.symbols.symbol(symbol).fq_name, "kotlin.arrayOfNulls");
    assert_eq!(type_arguments, vec![type_element]);
    assert_eq!(arguments, vec![size]);
}

#[test]
fn nested_sized_array_becomes_array_factory() {
    let resolver = StaticResolver::new();
    let mut ctx = context(&resolver);

    let type_element = ctx.tree.new_type_element(Ty::Primitive(PrimitiveKind::Int));
    let two = ctx.tree.int_literal(2);
    let three = ctx.tree.int_literal(3);
    let new_array = ctx
        .tree
        .alloc(NodeKind::JavaNewEmptyArray {
            type_element,
            dimensions: vec![two, three],
        })
        .unwrap();
    let stmt = ctx.tree.expression_statement(new_array).unwrap();
    let outer = ctx.tree.block(vec![stmt]).unwrap();

    ArrayInitializerConversion.run(&mut ctx, outer).unwrap();

    // new int[2][3] → Array(2) { IntArray(3) }
    let NodeKind::ExpressionStatement { expression } = *ctx.tree.kind(stmt) else {
        panic!("statement shape changed");
    };
    let NodeKind::NewExpression { symbol, arguments } = ctx.tree.kind(expression).clone() else {
        panic!(
            "expected the Array constructor, got {:?}",
            ctx.tree.kind(expression)
        );
    };
    assert_eq!(ctx.symbols.symbol(symbol).fq_name, "kotlin.Array");
    assert_eq!(arguments.len(), 2);
    assert_eq!(arguments[0], two);
    let NodeKind::LambdaExpression { statement, .. } = *ctx.tree.kind(arguments[1]) else {
        panic!("expected the element lambda");
    };
    let NodeKind::ExpressionStatement { expression: inner } = *ctx.tree.kind(statement) else {
        panic!("expected the lambda body expression");
    };
    let NodeKind::NewExpression { symbol, arguments } = ctx.tree.kind(inner).clone() else {
        panic!("expected the inner creation");
    };
    assert_eq!(ctx.symbols.symbol(symbol).fq_name, "kotlin.IntArray");
    assert_eq!(arguments, vec![three]);
}

#[test]
fn trailing_empty_dimension_becomes_array_of_nulls() {
    let resolver = StaticResolver::new();
    let mut ctx = context(&resolver);

    let type_element = ctx.tree.new_type_element(Ty::Primitive(PrimitiveKind::Int));
    let size = ctx.tree.int_literal(5);
    let empty = ctx.tree.stub();
    let new_array = ctx
        .tree
        .alloc(NodeKind::JavaNewEmptyArray {
            type_element,
            dimensions: vec![size, empty],
        })
        .unwrap();
    let stmt = ctx.tree.expression_statement(new_array).unwrap();
    let outer = ctx.tree.block(vec![stmt]).unwrap();

    ArrayInitializerConversion.run(&mut ctx, outer).unwrap();

    // new int[5][] → arrayOfNulls<IntArray>(5), written here as the
    // still-unmapped element array type.
    let NodeKind::ExpressionStatement { expression } = *ctx.tree.kind(stmt) else {
        panic!("statement shape changed");
    };
    let NodeKind::MethodCallExpression {
        symbol,
        type_arguments,
        arguments,
    } = ctx.tree.kind(expression).clone()
    else {
        panic!("expected arrayOfNulls");
    };
    assert_eq!(ctx.symbols.symbol(symbol).fq_name, "kotlin.arrayOfNulls");
    assert_eq!(arguments, vec![size]);
    assert_eq!(type_arguments, vec![type_element]);
    assert_eq!(
        ctx.tree.kind(type_element),
        &NodeKind::TypeElement {
            ty: Ty::array(Ty::Primitive(PrimitiveKind::Int), Nullability::Default)
        }
    );
}

#[test]
fn compound_bitwise_assignment_unfolds() {
    let resolver = StaticResolver::new();
    let mut ctx = context(&resolver);

    let target = ctx.symbols.resolve_by_name("mask", SymbolKind::Field);
    let target_ref = ctx.tree.field_access(target);
    let two = ctx.tree.int_literal(2);
    let assign = ctx
        .tree
        .alloc(NodeKind::AssignmentExpression {
            target: target_ref,
            value: two,
            op: AssignmentOp::ShlAssign,
        })
        .unwrap();
    let stmt = ctx.tree.expression_statement(assign).unwrap();
    let outer = ctx.tree.block(vec![stmt]).unwrap();

    OperatorConversion.run(&mut ctx, outer).unwrap();

    let NodeKind::ExpressionStatement { expression } = *ctx.tree.kind(stmt) else {
        panic!("statement shape changed");
    };
    let NodeKind::AssignmentExpression { target, value, op } = *ctx.tree.kind(expression) else {
        panic!("expected an assignment");
    };
    assert_eq!(op, AssignmentOp::Assign);
    assert_eq!(target, target_ref);
    let NodeKind::BinaryExpression { left, right, op } = *ctx.tree.kind(value) else {
        panic!("expected the unfolded operation");
    };
    assert_eq!(op, BinaryOp::KtShl);
    assert_eq!(right, two);
    // Fresh copy of the target on the left.
    assert_ne!(left, target_ref);
}

#[test]
fn default_nullability_resolves_to_nullable() {
    let resolver = StaticResolver::new();
    let mut ctx = context(&resolver);

    let widget = ctx.symbols.resolve_by_name("Widget", SymbolKind::Class);
    let modifiers = ctx.tree.empty_modifier_list();
    let type_element = ctx
        .tree
        .new_type_element(Ty::class(widget, vec![], Nullability::Default));
    let name = ctx.tree.new_name("w");
    let initializer = ctx.tree.null_literal();
    let var = ctx
        .tree
        .alloc(NodeKind::LocalVariable(VariableDecl {
            modifiers,
            type_element,
            name,
            initializer,
        }))
        .unwrap();
    let stmt = ctx
        .tree
        .alloc(NodeKind::DeclarationStatement {
            declarations: vec![var],
        })
        .unwrap();

    NullabilityResolutionConversion.run(&mut ctx, stmt).unwrap();

    let NodeKind::TypeElement { ty } = ctx.tree.kind(type_element).clone() else {
        panic!("expected the type element");
    };
    assert_eq!(ty.nullability(), Nullability::Nullable);
    assert!(!ty.has_default_nullability());
}

#[test]
fn local_variable_type_is_omitted_when_inferable() {
    let resolver = StaticResolver::new();
    let mut ctx = context(&resolver);

    let init = ctx.tree.int_literal(3);
    let var = ctx
        .tree
        .local_variable(Mutability::Val, Ty::Primitive(PrimitiveKind::Int), "n", init)
        .unwrap();
    let stmt = ctx
        .tree
        .alloc(NodeKind::DeclarationStatement {
            declarations: vec![var],
        })
        .unwrap();

    j2k_convert::passes::field_to_property::FieldToPropertyConversion
        .run(&mut ctx, stmt)
        .unwrap();

    let NodeKind::LocalVariable(decl) = ctx.tree.kind(var).clone() else {
        panic!("declaration shape changed");
    };
    assert_eq!(
        ctx.tree.kind(decl.type_element),
        &NodeKind::TypeElement { ty: Ty::NoType }
    );
}

#[test]
fn settings_round_trip_through_json() {
    let settings = ConverterSettings {
        specify_local_variable_type_by_default: true,
        specify_field_type_by_default: false,
    };
    let json = serde_json::to_string(&settings).unwrap();
    let back: ConverterSettings = serde_json::from_str(&json).unwrap();
    assert_eq!(back, settings);
}

#[test]
fn engine_runs_the_default_pipeline() {
    init_tracing();
    let resolver = StaticResolver::new();
    let mut ctx = ConversionContext::new(
        Tree::new(),
        SymbolProvider::new(&resolver),
        ConverterSettings {
            specify_field_type_by_default: true,
            specify_local_variable_type_by_default: false,
        },
    );

    let modifiers = ctx.tree.empty_modifier_list();
    let type_element = ctx.tree.new_type_element(Ty::Primitive(PrimitiveKind::Int));
    let name = ctx.tree.new_name("count");
    let initializer = ctx.tree.stub();
    let field = ctx
        .tree
        .alloc(NodeKind::JavaField(VariableDecl {
            modifiers,
            type_element,
            name,
            initializer,
        }))
        .unwrap();
    let (class_mods, class_name) = {
        let m = ctx.tree.empty_modifier_list();
        let n = ctx.tree.new_name("Counter");
        (m, n)
    };
    let class = ctx
        .tree
        .alloc(NodeKind::Class(ClassDecl {
            modifiers: class_mods,
            name: class_name,
            kind: ClassKind::Class,
            inheritance: vec![],
            declarations: vec![field],
        }))
        .unwrap();
    let file = ctx
        .tree
        .alloc(NodeKind::File {
            declarations: vec![class],
        })
        .unwrap();

    let mut engine = ConversionEngine::new(default_conversions());
    assert_eq!(engine.state(), RunState::Idle);
    engine.run(&mut ctx, &[file]).unwrap();
    assert_eq!(engine.state(), RunState::Done);

    // The field is now a property with an explicit default initializer and a
    // mapped, nullability-resolved type.
    let NodeKind::Property(decl) = ctx.tree.kind(field).clone() else {
        panic!("expected a property, got {:?}", ctx.tree.kind(field));
    };
    assert!(matches!(
        ctx.tree.kind(decl.initializer),
        NodeKind::Literal { .. }
    ));
    let NodeKind::TypeElement { ty } = ctx.tree.kind(decl.type_element).clone() else {
        panic!("expected the type element");
    };
    let class_ty = ty.as_class().expect("primitive should be mapped");
    assert_eq!(ctx.symbols.symbol(class_ty.symbol).fq_name, "kotlin.Int");
    assert_eq!(ty.nullability(), Nullability::NotNull);
}

#[test]
fn cancellation_stops_the_run() {
    init_tracing();
    let resolver = StaticResolver::new();
    let mut ctx = context(&resolver);
    let file = ctx
        .tree
        .alloc(NodeKind::File {
            declarations: vec![],
        })
        .unwrap();
    ctx.cancel.cancel();

    let mut engine = ConversionEngine::new(default_conversions());
    assert_eq!(engine.run(&mut ctx, &[file]), Err(EngineError::Cancelled));
}
