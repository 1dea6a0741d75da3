//! Visitor dispatch over the node catalog.
//!
//! Every kind has a dedicated handler whose default implementation delegates
//! to its documented supertype handler: expressions fall back to
//! `visit_expression`, then `visit_statement`, then `visit_element`;
//! statements to `visit_statement` then `visit_element`; declarations to
//! `visit_declaration`; modifiers to `visit_modifier`; leaves directly to
//! `visit_element`. A new node kind must be wired into [`accept`] and given a
//! handler with the same fallback shape.

use j2k_core::NodeId;

use crate::node::NodeKind;
use crate::{InvalidTreeState, Tree};

/// Pre-order visitor. `D` is pass-local state threaded through the walk.
#[allow(unused_variables)]
pub trait Visitor<D> {
    // === Supertype handlers ===
    fn visit_element(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {}
    fn visit_declaration(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_element(tree, id, data);
    }
    fn visit_statement(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_element(tree, id, data);
    }
    fn visit_expression(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_statement(tree, id, data);
    }
    fn visit_modifier(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_element(tree, id, data);
    }

    // === Declarations ===
    fn visit_file(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_declaration(tree, id, data);
    }
    fn visit_class(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_declaration(tree, id, data);
    }
    fn visit_java_method(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_declaration(tree, id, data);
    }
    fn visit_function(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_declaration(tree, id, data);
    }
    fn visit_java_field(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_declaration(tree, id, data);
    }
    fn visit_property(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_declaration(tree, id, data);
    }
    fn visit_parameter(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_declaration(tree, id, data);
    }
    fn visit_local_variable(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_declaration(tree, id, data);
    }
    fn visit_java_constructor(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_declaration(tree, id, data);
    }
    fn visit_secondary_constructor(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_declaration(tree, id, data);
    }
    fn visit_primary_constructor(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_declaration(tree, id, data);
    }
    fn visit_init_declaration(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_declaration(tree, id, data);
    }
    fn visit_enum_constant(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_declaration(tree, id, data);
    }

    // === Statements ===
    fn visit_block(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_statement(tree, id, data);
    }
    fn visit_block_statement(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_statement(tree, id, data);
    }
    fn visit_expression_statement(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_statement(tree, id, data);
    }
    fn visit_declaration_statement(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_statement(tree, id, data);
    }
    fn visit_if_statement(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_statement(tree, id, data);
    }
    fn visit_while_statement(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_statement(tree, id, data);
    }
    fn visit_do_while_statement(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_statement(tree, id, data);
    }
    fn visit_java_for_loop(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_statement(tree, id, data);
    }
    fn visit_for_in(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_statement(tree, id, data);
    }
    fn visit_java_switch(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_statement(tree, id, data);
    }
    fn visit_java_switch_case(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_statement(tree, id, data);
    }
    fn visit_when(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_statement(tree, id, data);
    }
    fn visit_when_case(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_statement(tree, id, data);
    }
    fn visit_when_label(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_statement(tree, id, data);
    }
    fn visit_break_statement(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_statement(tree, id, data);
    }
    fn visit_continue_statement(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_statement(tree, id, data);
    }
    fn visit_return_statement(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_statement(tree, id, data);
    }
    fn visit_throw_statement(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_statement(tree, id, data);
    }
    fn visit_java_synchronized_statement(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_statement(tree, id, data);
    }
    fn visit_labeled_statement(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_statement(tree, id, data);
    }
    fn visit_empty_statement(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_statement(tree, id, data);
    }

    // === Expressions ===
    fn visit_literal(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_expression(tree, id, data);
    }
    fn visit_binary_expression(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_expression(tree, id, data);
    }
    fn visit_prefix_expression(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_expression(tree, id, data);
    }
    fn visit_postfix_expression(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_expression(tree, id, data);
    }
    fn visit_assignment_expression(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_expression(tree, id, data);
    }
    fn visit_parenthesized_expression(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_expression(tree, id, data);
    }
    fn visit_qualified_expression(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_expression(tree, id, data);
    }
    fn visit_method_call_expression(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_expression(tree, id, data);
    }
    fn visit_field_access_expression(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_expression(tree, id, data);
    }
    fn visit_array_access_expression(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_expression(tree, id, data);
    }
    fn visit_class_access_expression(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_expression(tree, id, data);
    }
    fn visit_new_expression(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_expression(tree, id, data);
    }
    fn visit_java_new_array(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_expression(tree, id, data);
    }
    fn visit_java_new_empty_array(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_expression(tree, id, data);
    }
    fn visit_type_cast_expression(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_expression(tree, id, data);
    }
    fn visit_if_else_expression(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_expression(tree, id, data);
    }
    fn visit_lambda_expression(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_expression(tree, id, data);
    }
    fn visit_this_expression(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_expression(tree, id, data);
    }
    fn visit_super_expression(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_expression(tree, id, data);
    }
    fn visit_stub_expression(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_expression(tree, id, data);
    }

    // === Modifiers and leaves ===
    fn visit_modifier_list(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_modifier(tree, id, data);
    }
    fn visit_modality_modifier(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_modifier(tree, id, data);
    }
    fn visit_visibility_modifier(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_modifier(tree, id, data);
    }
    fn visit_mutability_modifier(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_modifier(tree, id, data);
    }
    fn visit_extra_modifier(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_modifier(tree, id, data);
    }
    fn visit_name_identifier(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_element(tree, id, data);
    }
    fn visit_type_element(&mut self, tree: &mut Tree, id: NodeId, data: &mut D) {
        self.visit_element(tree, id, data);
    }
}

/// Dispatches `id` to the most specific handler for its kind.
pub fn accept<D, V: Visitor<D>>(visitor: &mut V, tree: &mut Tree, id: NodeId, data: &mut D) {
    use NodeKind::*;
    // Matching a borrowed kind would pin `tree` for the arm body; the visitor
    // needs it mutably, so dispatch on a snapshot.
    let kind = tree.kind(id).clone();
    match kind {
        File { .. } => visitor.visit_file(tree, id, data),
        Class(_) => visitor.visit_class(tree, id, data),
        JavaMethod(_) => visitor.visit_java_method(tree, id, data),
        Function(_) => visitor.visit_function(tree, id, data),
        JavaField(_) => visitor.visit_java_field(tree, id, data),
        Property(_) => visitor.visit_property(tree, id, data),
        Parameter(_) => visitor.visit_parameter(tree, id, data),
        LocalVariable(_) => visitor.visit_local_variable(tree, id, data),
        JavaConstructor(_) => visitor.visit_java_constructor(tree, id, data),
        SecondaryConstructor(_) => visitor.visit_secondary_constructor(tree, id, data),
        PrimaryConstructor { .. } => visitor.visit_primary_constructor(tree, id, data),
        InitDeclaration { .. } => visitor.visit_init_declaration(tree, id, data),
        EnumConstant { .. } => visitor.visit_enum_constant(tree, id, data),
        Block { .. } => visitor.visit_block(tree, id, data),
        BlockStatement { .. } => visitor.visit_block_statement(tree, id, data),
        ExpressionStatement { .. } => visitor.visit_expression_statement(tree, id, data),
        DeclarationStatement { .. } => visitor.visit_declaration_statement(tree, id, data),
        IfStatement { .. } => visitor.visit_if_statement(tree, id, data),
        WhileStatement { .. } => visitor.visit_while_statement(tree, id, data),
        DoWhileStatement { .. } => visitor.visit_do_while_statement(tree, id, data),
        JavaForLoop { .. } => visitor.visit_java_for_loop(tree, id, data),
        ForIn { .. } => visitor.visit_for_in(tree, id, data),
        JavaSwitch { .. } => visitor.visit_java_switch(tree, id, data),
        JavaSwitchCase { .. } => visitor.visit_java_switch_case(tree, id, data),
        When { .. } => visitor.visit_when(tree, id, data),
        WhenCase { .. } => visitor.visit_when_case(tree, id, data),
        WhenValueLabel { .. } | WhenElseLabel => visitor.visit_when_label(tree, id, data),
        BreakStatement { .. } => visitor.visit_break_statement(tree, id, data),
        ContinueStatement { .. } => visitor.visit_continue_statement(tree, id, data),
        ReturnStatement { .. } => visitor.visit_return_statement(tree, id, data),
        ThrowStatement { .. } => visitor.visit_throw_statement(tree, id, data),
        JavaSynchronizedStatement { .. } => {
            visitor.visit_java_synchronized_statement(tree, id, data)
        }
        LabeledStatement { .. } => visitor.visit_labeled_statement(tree, id, data),
        EmptyStatement => visitor.visit_empty_statement(tree, id, data),
        Literal { .. } => visitor.visit_literal(tree, id, data),
        BinaryExpression { .. } => visitor.visit_binary_expression(tree, id, data),
        PrefixExpression { .. } => visitor.visit_prefix_expression(tree, id, data),
        PostfixExpression { .. } => visitor.visit_postfix_expression(tree, id, data),
        AssignmentExpression { .. } => visitor.visit_assignment_expression(tree, id, data),
        ParenthesizedExpression { .. } => {
            visitor.visit_parenthesized_expression(tree, id, data)
        }
        QualifiedExpression { .. } => visitor.visit_qualified_expression(tree, id, data),
        MethodCallExpression { .. } => visitor.visit_method_call_expression(tree, id, data),
        FieldAccessExpression { .. } => visitor.visit_field_access_expression(tree, id, data),
        ArrayAccessExpression { .. } => visitor.visit_array_access_expression(tree, id, data),
        ClassAccessExpression { .. } => visitor.visit_class_access_expression(tree, id, data),
        NewExpression { .. } => visitor.visit_new_expression(tree, id, data),
        JavaNewArray { .. } => visitor.visit_java_new_array(tree, id, data),
        JavaNewEmptyArray { .. } => visitor.visit_java_new_empty_array(tree, id, data),
        TypeCastExpression { .. } => visitor.visit_type_cast_expression(tree, id, data),
        IfElseExpression { .. } => visitor.visit_if_else_expression(tree, id, data),
        LambdaExpression { .. } => visitor.visit_lambda_expression(tree, id, data),
        ThisExpression => visitor.visit_this_expression(tree, id, data),
        SuperExpression => visitor.visit_super_expression(tree, id, data),
        StubExpression => visitor.visit_stub_expression(tree, id, data),
        ModifierList { .. } => visitor.visit_modifier_list(tree, id, data),
        ModalityModifier(_) => visitor.visit_modality_modifier(tree, id, data),
        VisibilityModifier(_) => visitor.visit_visibility_modifier(tree, id, data),
        MutabilityModifier(_) => visitor.visit_mutability_modifier(tree, id, data),
        ExtraModifier(_) => visitor.visit_extra_modifier(tree, id, data),
        NameIdentifier { .. } => visitor.visit_name_identifier(tree, id, data),
        TypeElement { .. } => visitor.visit_type_element(tree, id, data),
    }
}

/// Drives a pre-order traversal: dispatches `id`, then walks the node's
/// (possibly just rewritten) children.
pub fn walk<D, V: Visitor<D>>(
    visitor: &mut V,
    tree: &mut Tree,
    id: NodeId,
    data: &mut D,
) -> Result<(), InvalidTreeState> {
    accept(visitor, tree, id, data);
    for child in tree.children(id)? {
        walk(visitor, tree, child, data)?;
    }
    Ok(())
}
