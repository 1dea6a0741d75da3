use pretty_assertions::assert_eq;

use j2k_core::NodeId;

use crate::node::{LiteralKind, NodeKind};
use crate::visitor::{walk, Visitor};
use crate::{InvalidTreeState, Tree};

fn small_if(tree: &mut Tree) -> NodeId {
    let condition = tree.bool_literal(true);
    let then_expr = tree.int_literal(1);
    let then_branch = tree
        .expression_statement(then_expr)
        .and_then(|s| tree.block(vec![s]))
        .unwrap();
    tree.alloc(NodeKind::IfStatement {
        condition,
        then_branch,
        else_branch: None,
    })
    .unwrap()
}

#[test]
fn alloc_attaches_children() {
    let mut tree = Tree::new();
    let stmt = small_if(&mut tree);
    let children = tree.children(stmt).unwrap();
    assert_eq!(children.len(), 2);
    for child in children {
        assert_eq!(tree.parent(child), Some(stmt));
    }
    assert_eq!(tree.parent(stmt), None);
}

#[test]
fn attaching_an_attached_node_is_an_error() {
    let mut tree = Tree::new();
    let expr = tree.int_literal(7);
    let _stmt = tree.expression_statement(expr).unwrap();
    // `expr` already has a parent; wrapping it again must fail loudly.
    let err = tree.expression_statement(expr).unwrap_err();
    assert!(matches!(
        err,
        InvalidTreeState::AlreadyAttached { node, .. } if node == expr
    ));
}

#[test]
fn same_node_twice_in_one_payload_is_an_error() {
    let mut tree = Tree::new();
    let expr = tree.int_literal(7);
    let stmt = tree.expression_statement(expr).unwrap();
    let err = tree.block(vec![stmt, stmt]).unwrap_err();
    assert!(matches!(err, InvalidTreeState::AlreadyAttached { .. }));
}

#[test]
fn invalidate_releases_children() {
    let mut tree = Tree::new();
    let stmt = small_if(&mut tree);
    let children = tree.children(stmt).unwrap();
    tree.invalidate(stmt).unwrap();

    for child in &children {
        assert_eq!(tree.parent(*child), None);
    }
    // The released condition can be reused in a replacement subtree.
    let condition = children[0];
    let reused = tree.expression_statement(condition).unwrap();
    assert_eq!(tree.parent(condition), Some(reused));

    // Reading through the invalidated node is an error.
    assert_eq!(
        tree.children(stmt),
        Err(InvalidTreeState::Invalidated { node: stmt })
    );
    // Double invalidation too.
    assert_eq!(
        tree.invalidate(stmt),
        Err(InvalidTreeState::Invalidated { node: stmt })
    );
}

#[test]
fn replace_child_swaps_slot_and_parents() {
    let mut tree = Tree::new();
    let old = tree.int_literal(1);
    let stmt = tree.expression_statement(old).unwrap();
    let new = tree.int_literal(2);

    tree.replace_child(stmt, old, new).unwrap();
    assert_eq!(tree.parent(old), None);
    assert_eq!(tree.parent(new), Some(stmt));
    assert_eq!(tree.children(stmt).unwrap(), vec![new]);
}

#[test]
fn replace_locates_the_parent_slot() {
    let mut tree = Tree::new();
    let old = tree.int_literal(1);
    let stmt = tree.expression_statement(old).unwrap();
    let new = tree.int_literal(2);

    tree.replace(old, new).unwrap();
    assert_eq!(tree.children(stmt).unwrap(), vec![new]);

    // A root has no slot to rewrite.
    let root = tree.int_literal(3);
    let other = tree.int_literal(4);
    assert!(tree.replace(root, other).is_err());
}

#[test]
fn set_kind_diffs_children() {
    let mut tree = Tree::new();
    let a = tree.int_literal(1);
    let b = tree.int_literal(2);
    let sa = tree.expression_statement(a).unwrap();
    let sb = tree.expression_statement(b).unwrap();
    let block = tree.block(vec![sa, sb]).unwrap();

    // Keep sa, drop sb, add sc.
    let c = tree.int_literal(3);
    let sc = tree.expression_statement(c).unwrap();
    tree.set_kind(
        block,
        NodeKind::Block {
            statements: vec![sc, sa],
        },
    )
    .unwrap();

    assert_eq!(tree.parent(sa), Some(block));
    assert_eq!(tree.parent(sb), None);
    assert_eq!(tree.parent(sc), Some(block));
}

#[test]
fn set_kind_rejects_attached_additions() {
    let mut tree = Tree::new();
    let a = tree.int_literal(1);
    let sa = tree.expression_statement(a).unwrap();
    let block = tree.block(vec![sa]).unwrap();
    let other = tree.block(vec![]).unwrap();

    // `sa` still belongs to `block`.
    let err = tree
        .set_kind(
            other,
            NodeKind::Block {
                statements: vec![sa],
            },
        )
        .unwrap_err();
    assert!(matches!(err, InvalidTreeState::AlreadyAttached { .. }));
    // Nothing was rebound.
    assert_eq!(tree.parent(sa), Some(block));
    assert_eq!(tree.children(other).unwrap(), vec![]);
}

#[test]
fn detach_from_list_and_required_slots() {
    let mut tree = Tree::new();
    let a = tree.int_literal(1);
    let sa = tree.expression_statement(a).unwrap();
    let block = tree.block(vec![sa]).unwrap();

    tree.detach(sa).unwrap();
    assert_eq!(tree.parent(sa), None);
    assert_eq!(tree.children(block).unwrap(), vec![]);

    // The expression fills a required single slot of its statement.
    assert_eq!(
        tree.detach(a),
        Err(InvalidTreeState::RequiredSlot { node: a, parent: sa })
    );

    // Detaching a node with no parent is a no-op.
    tree.detach(sa).unwrap();
}

#[test]
fn attach_ancestor_is_a_cycle() {
    let mut tree = Tree::new();
    let expr = tree.int_literal(1);
    let stmt = tree.expression_statement(expr).unwrap();
    let block = tree.block(vec![stmt]).unwrap();

    // `block` is an ancestor of `stmt`.
    let err = tree
        .set_kind(
            stmt,
            NodeKind::ExpressionStatement { expression: block },
        )
        .unwrap_err();
    assert!(matches!(err, InvalidTreeState::Cycle { .. }));
    // Transactional failure: the old child is still attached.
    assert_eq!(tree.parent(expr), Some(stmt));

    // Direct self-attachment.
    let list = tree.block(vec![]).unwrap();
    let err = tree
        .set_kind(
            list,
            NodeKind::Block {
                statements: vec![list],
            },
        )
        .unwrap_err();
    assert!(matches!(err, InvalidTreeState::Cycle { .. }));
}

#[test]
fn copy_subtree_is_deep_and_detached() {
    let mut tree = Tree::new();
    let stmt = small_if(&mut tree);
    let before = tree.len();

    let copy = tree.copy_subtree_detached(stmt).unwrap();
    assert_eq!(tree.parent(copy), None);
    assert_ne!(copy, stmt);
    // Every node of the subtree was duplicated: if, condition, block,
    // expression statement, literal.
    assert_eq!(tree.len(), before + 5);

    // Structure matches, ids do not overlap.
    let originals = tree.children(stmt).unwrap();
    let copies = tree.children(copy).unwrap();
    assert_eq!(originals.len(), copies.len());
    for (orig, copied) in originals.iter().zip(&copies) {
        assert_ne!(orig, copied);
        assert_eq!(
            std::mem::discriminant(tree.kind(*orig)),
            std::mem::discriminant(tree.kind(*copied))
        );
    }
}

#[test]
fn visitor_falls_back_through_the_supertype_chain() {
    #[derive(Default)]
    struct Recorder;

    #[derive(Default)]
    struct Log {
        literals: usize,
        expressions: usize,
        statements: usize,
        elements: usize,
    }

    impl Visitor<Log> for Recorder {
        fn visit_literal(&mut self, tree: &mut Tree, id: NodeId, data: &mut Log) {
            data.literals += 1;
            self.visit_expression(tree, id, data);
        }
        fn visit_expression(&mut self, tree: &mut Tree, id: NodeId, data: &mut Log) {
            data.expressions += 1;
            self.visit_statement(tree, id, data);
        }
        fn visit_statement(&mut self, tree: &mut Tree, id: NodeId, data: &mut Log) {
            data.statements += 1;
            self.visit_element(tree, id, data);
        }
        fn visit_element(&mut self, _tree: &mut Tree, _id: NodeId, data: &mut Log) {
            data.elements += 1;
        }
    }

    let mut tree = Tree::new();
    let stmt = small_if(&mut tree);

    let mut log = Log::default();
    walk(&mut Recorder, &mut tree, stmt, &mut log).unwrap();

    // if-statement, block, expression-statement, two literals.
    assert_eq!(log.literals, 2);
    // Default handlers thread the two literals through visit_expression.
    assert_eq!(log.expressions, 2);
    // Literals count as statements via the chain; plus the three real ones.
    assert_eq!(log.statements, 5);
    assert_eq!(log.elements, 5);
}

#[test]
fn visitor_sees_rewritten_children() {
    // A pre-order rewrite that replaces every int literal with a bool must
    // leave no int literals behind after one walk.
    struct Rewriter;
    impl Visitor<()> for Rewriter {
        fn visit_expression_statement(&mut self, tree: &mut Tree, id: NodeId, _data: &mut ()) {
            let NodeKind::ExpressionStatement { expression } = *tree.kind(id) else {
                return;
            };
            if matches!(
                tree.kind(expression),
                NodeKind::Literal {
                    kind: LiteralKind::Int,
                    ..
                }
            ) {
                let replacement = tree.bool_literal(false);
                tree.replace_child(id, expression, replacement).unwrap();
            }
        }
    }

    let mut tree = Tree::new();
    let expr = tree.int_literal(1);
    let stmt = tree.expression_statement(expr).unwrap();
    let block = tree.block(vec![stmt]).unwrap();

    walk(&mut Rewriter, &mut tree, block, &mut ()).unwrap();
    let NodeKind::ExpressionStatement { expression } = *tree.kind(stmt) else {
        panic!("statement shape changed");
    };
    assert!(matches!(
        tree.kind(expression),
        NodeKind::Literal {
            kind: LiteralKind::Boolean,
            ..
        }
    ));
}
