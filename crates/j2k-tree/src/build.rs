//! Allocation shorthands for the node shapes passes create most often.
//!
//! Leaf builders are infallible (a leaf has no children to attach); composite
//! builders go through [`Tree::alloc`] and surface its attachment errors.

use j2k_core::{NodeId, SmolStr, SymbolId};
use j2k_types::Ty;

use crate::node::{LiteralKind, Modality, Mutability, NodeKind, OtherModifier, VariableDecl, Visibility};
use crate::{InvalidTreeState, NodeData, Tree};

impl Tree {
    fn alloc_leaf(&mut self, kind: NodeKind) -> NodeId {
        debug_assert!(kind.child_ids().is_empty());
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            kind,
            parent: None,
            invalidated: false,
        });
        id
    }

    pub fn new_name(&mut self, name: impl Into<SmolStr>) -> NodeId {
        self.alloc_leaf(NodeKind::NameIdentifier { name: name.into() })
    }

    pub fn new_type_element(&mut self, ty: Ty) -> NodeId {
        self.alloc_leaf(NodeKind::TypeElement { ty })
    }

    pub fn new_literal(&mut self, kind: LiteralKind, text: impl Into<SmolStr>) -> NodeId {
        self.alloc_leaf(NodeKind::Literal {
            kind,
            text: text.into(),
        })
    }

    pub fn int_literal(&mut self, value: i64) -> NodeId {
        self.new_literal(LiteralKind::Int, value.to_string())
    }

    pub fn bool_literal(&mut self, value: bool) -> NodeId {
        self.new_literal(LiteralKind::Boolean, if value { "true" } else { "false" })
    }

    pub fn null_literal(&mut self) -> NodeId {
        self.new_literal(LiteralKind::Null, "null")
    }

    /// Placeholder expression for an intentionally absent slot.
    pub fn stub(&mut self) -> NodeId {
        self.alloc_leaf(NodeKind::StubExpression)
    }

    pub fn this_expression(&mut self) -> NodeId {
        self.alloc_leaf(NodeKind::ThisExpression)
    }

    pub fn field_access(&mut self, symbol: SymbolId) -> NodeId {
        self.alloc_leaf(NodeKind::FieldAccessExpression { symbol })
    }

    pub fn empty_modifier_list(&mut self) -> NodeId {
        self.alloc_leaf(NodeKind::ModifierList { modifiers: Vec::new() })
    }

    pub fn modality_modifier(&mut self, modality: Modality) -> NodeId {
        self.alloc_leaf(NodeKind::ModalityModifier(modality))
    }

    pub fn visibility_modifier(&mut self, visibility: Visibility) -> NodeId {
        self.alloc_leaf(NodeKind::VisibilityModifier(visibility))
    }

    pub fn mutability_modifier(&mut self, mutability: Mutability) -> NodeId {
        self.alloc_leaf(NodeKind::MutabilityModifier(mutability))
    }

    pub fn extra_modifier(&mut self, modifier: OtherModifier) -> NodeId {
        self.alloc_leaf(NodeKind::ExtraModifier(modifier))
    }

    pub fn modifier_list(&mut self, modifiers: Vec<NodeId>) -> Result<NodeId, InvalidTreeState> {
        self.alloc(NodeKind::ModifierList { modifiers })
    }

    pub fn block(&mut self, statements: Vec<NodeId>) -> Result<NodeId, InvalidTreeState> {
        self.alloc(NodeKind::Block { statements })
    }

    pub fn expression_statement(&mut self, expression: NodeId) -> Result<NodeId, InvalidTreeState> {
        self.alloc(NodeKind::ExpressionStatement { expression })
    }

    pub fn method_call(
        &mut self,
        symbol: SymbolId,
        arguments: Vec<NodeId>,
    ) -> Result<NodeId, InvalidTreeState> {
        self.alloc(NodeKind::MethodCallExpression {
            symbol,
            type_arguments: Vec::new(),
            arguments,
        })
    }

    /// `receiver.selector`.
    pub fn qualified(
        &mut self,
        receiver: NodeId,
        selector: NodeId,
    ) -> Result<NodeId, InvalidTreeState> {
        self.alloc(NodeKind::QualifiedExpression { receiver, selector })
    }

    /// Local variable with a fresh modifier list; `initializer` may be a stub.
    pub fn local_variable(
        &mut self,
        mutability: Mutability,
        ty: Ty,
        name: impl Into<SmolStr>,
        initializer: NodeId,
    ) -> Result<NodeId, InvalidTreeState> {
        let modifier = self.mutability_modifier(mutability);
        let modifiers = self.modifier_list(vec![modifier])?;
        let type_element = self.new_type_element(ty);
        let name = self.new_name(name);
        self.alloc(NodeKind::LocalVariable(VariableDecl {
            modifiers,
            type_element,
            name,
            initializer,
        }))
    }
}
