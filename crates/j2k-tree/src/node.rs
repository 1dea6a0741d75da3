//! The node catalog of the intermediate tree.
//!
//! One tagged union over every node kind: declarations, statements,
//! expressions, modifiers, and type-bearing leaves. Child references are
//! `NodeId`s into the owning [`Tree`](crate::Tree) arena; the arena, not the
//! payload, is responsible for parent bookkeeping.
//!
//! Kinds are split along the source axis where the two languages genuinely
//! differ in shape: `JavaForLoop` vs `ForIn`, `JavaSwitch` vs `When`,
//! `JavaMethod` vs `Function`, and so on. Conversion passes replace the
//! Java-shaped kinds until only Kotlin-shaped (or shared) kinds remain.

use j2k_core::{NodeId, SmolStr, SymbolId};
use j2k_types::Ty;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Annotation,
    Object,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiteralKind {
    Boolean,
    Char,
    Int,
    Long,
    Float,
    Double,
    String,
    Null,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Plus,
    Minus,
    Mul,
    Div,
    Rem,
    Less,
    LessOrEq,
    Greater,
    GreaterOrEq,
    /// Java `==`. On reference operands this is identity and must be
    /// rewritten to [`BinaryOp::RefEq`] by the operator conversion.
    Eq,
    NotEq,
    /// Kotlin `===`.
    RefEq,
    /// Kotlin `!==`.
    RefNotEq,
    LogicAnd,
    LogicOr,
    /// Java `&` on integral operands; becomes the Kotlin infix `and`.
    BitAnd,
    BitOr,
    BitXor,
    /// Java `<<` / `>>` / `>>>`; become `shl` / `shr` / `ushr`.
    Shl,
    Shr,
    Ushr,
    /// Kotlin named infix operators produced by the operator conversion.
    KtAnd,
    KtOr,
    KtXor,
    KtShl,
    KtShr,
    KtUshr,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Plus,
    Minus,
    Not,
    BitNot,
    Increment,
    Decrement,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentOp {
    Assign,
    PlusAssign,
    MinusAssign,
    MulAssign,
    DivAssign,
    RemAssign,
    /// Java `&=`, `|=`, `^=`, `<<=`, `>>=`, `>>>=`; Kotlin has no compound
    /// form for these, the operator conversion unfolds them.
    AndAssign,
    OrAssign,
    XorAssign,
    ShlAssign,
    ShrAssign,
    UshrAssign,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Modality {
    Final,
    Open,
    Abstract,
    Override,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Public,
    Internal,
    Protected,
    Private,
    /// Java package-private; remapped by the modifier conversion.
    PackagePrivate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mutability {
    Val,
    Var,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OtherModifier {
    Static,
    Native,
    Synchronized,
    Transient,
    Volatile,
    Strictfp,
    Inner,
    Const,
}

/// Delegation target of a constructor's explicit `this(...)`/`super(...)`
/// call. The `target` child is a `This`, `Super` or `Stub` expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DelegationCall {
    pub target: NodeId,
    pub arguments: Vec<NodeId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassDecl {
    pub modifiers: NodeId,
    pub name: NodeId,
    pub kind: ClassKind,
    pub inheritance: Vec<NodeId>,
    pub declarations: Vec<NodeId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodDecl {
    pub modifiers: NodeId,
    pub name: NodeId,
    pub return_type: NodeId,
    pub parameters: Vec<NodeId>,
    pub body: NodeId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstructorDecl {
    pub modifiers: NodeId,
    pub name: NodeId,
    pub parameters: Vec<NodeId>,
    pub delegation: DelegationCall,
    pub body: NodeId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariableDecl {
    pub modifiers: NodeId,
    pub type_element: NodeId,
    pub name: NodeId,
    /// `Stub` expression when the declaration has no initializer.
    pub initializer: NodeId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    // === Declarations ===
    File {
        declarations: Vec<NodeId>,
    },
    Class(ClassDecl),
    JavaMethod(MethodDecl),
    /// Kotlin `fun`.
    Function(MethodDecl),
    JavaField(VariableDecl),
    /// Kotlin property.
    Property(VariableDecl),
    Parameter(VariableDecl),
    LocalVariable(VariableDecl),
    JavaConstructor(ConstructorDecl),
    SecondaryConstructor(ConstructorDecl),
    PrimaryConstructor {
        modifiers: NodeId,
        name: NodeId,
        parameters: Vec<NodeId>,
        delegation: DelegationCall,
    },
    /// Kotlin `init { ... }`.
    InitDeclaration {
        block: NodeId,
    },
    EnumConstant {
        name: NodeId,
        arguments: Vec<NodeId>,
    },

    // === Statements ===
    Block {
        statements: Vec<NodeId>,
    },
    BlockStatement {
        block: NodeId,
    },
    ExpressionStatement {
        expression: NodeId,
    },
    DeclarationStatement {
        declarations: Vec<NodeId>,
    },
    IfStatement {
        condition: NodeId,
        then_branch: NodeId,
        else_branch: Option<NodeId>,
    },
    WhileStatement {
        condition: NodeId,
        body: NodeId,
    },
    DoWhileStatement {
        body: NodeId,
        condition: NodeId,
    },
    JavaForLoop {
        initializers: Vec<NodeId>,
        /// `Stub` expression when the loop has no condition.
        condition: NodeId,
        updaters: Vec<NodeId>,
        body: NodeId,
    },
    /// Kotlin `for (variable in iteration)`.
    ForIn {
        variable: NodeId,
        iteration: NodeId,
        body: NodeId,
    },
    JavaSwitch {
        expression: NodeId,
        cases: Vec<NodeId>,
    },
    /// `label: None` is the `default:` case.
    JavaSwitchCase {
        label: Option<NodeId>,
        statements: Vec<NodeId>,
    },
    When {
        expression: NodeId,
        cases: Vec<NodeId>,
    },
    WhenCase {
        labels: Vec<NodeId>,
        body: NodeId,
    },
    WhenValueLabel {
        expression: NodeId,
    },
    WhenElseLabel,
    BreakStatement {
        label: Option<NodeId>,
    },
    ContinueStatement {
        label: Option<NodeId>,
    },
    ReturnStatement {
        /// `Stub` expression for a bare `return;`.
        expression: NodeId,
    },
    ThrowStatement {
        expression: NodeId,
    },
    JavaSynchronizedStatement {
        lock: NodeId,
        body: NodeId,
    },
    LabeledStatement {
        labels: Vec<NodeId>,
        statement: NodeId,
    },
    EmptyStatement,

    // === Expressions ===
    Literal {
        kind: LiteralKind,
        text: SmolStr,
    },
    BinaryExpression {
        left: NodeId,
        right: NodeId,
        op: BinaryOp,
    },
    PrefixExpression {
        operand: NodeId,
        op: UnaryOp,
    },
    PostfixExpression {
        operand: NodeId,
        op: UnaryOp,
    },
    AssignmentExpression {
        target: NodeId,
        value: NodeId,
        op: AssignmentOp,
    },
    ParenthesizedExpression {
        expression: NodeId,
    },
    /// `receiver.selector`.
    QualifiedExpression {
        receiver: NodeId,
        selector: NodeId,
    },
    MethodCallExpression {
        symbol: SymbolId,
        type_arguments: Vec<NodeId>,
        arguments: Vec<NodeId>,
    },
    FieldAccessExpression {
        symbol: SymbolId,
    },
    ArrayAccessExpression {
        array: NodeId,
        index: NodeId,
    },
    ClassAccessExpression {
        symbol: SymbolId,
    },
    NewExpression {
        symbol: SymbolId,
        arguments: Vec<NodeId>,
    },
    /// Java `new T[] { ... }`.
    JavaNewArray {
        type_element: NodeId,
        initializer: Vec<NodeId>,
    },
    /// Java `new T[n][m]...`; unspecified trailing dimensions are `Stub`s.
    JavaNewEmptyArray {
        type_element: NodeId,
        dimensions: Vec<NodeId>,
    },
    TypeCastExpression {
        expression: NodeId,
        type_element: NodeId,
    },
    IfElseExpression {
        condition: NodeId,
        then_branch: NodeId,
        else_branch: NodeId,
    },
    LambdaExpression {
        parameters: Vec<NodeId>,
        statement: NodeId,
    },
    ThisExpression,
    SuperExpression,
    /// Placeholder for an intentionally absent expression.
    StubExpression,

    // === Modifiers ===
    ModifierList {
        modifiers: Vec<NodeId>,
    },
    ModalityModifier(Modality),
    VisibilityModifier(Visibility),
    MutabilityModifier(Mutability),
    ExtraModifier(OtherModifier),

    // === Leaves ===
    NameIdentifier {
        name: SmolStr,
    },
    TypeElement {
        ty: Ty,
    },
}

/// Supertype category used by the visitor fallback chain
/// (expression → statement → element; everything else → element).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeCategory {
    Expression,
    Statement,
    Declaration,
    Modifier,
    Element,
}

impl NodeKind {
    #[must_use]
    pub fn category(&self) -> NodeCategory {
        use NodeKind::*;
        match self {
            Literal { .. }
            | BinaryExpression { .. }
            | PrefixExpression { .. }
            | PostfixExpression { .. }
            | AssignmentExpression { .. }
            | ParenthesizedExpression { .. }
            | QualifiedExpression { .. }
            | MethodCallExpression { .. }
            | FieldAccessExpression { .. }
            | ArrayAccessExpression { .. }
            | ClassAccessExpression { .. }
            | NewExpression { .. }
            | JavaNewArray { .. }
            | JavaNewEmptyArray { .. }
            | TypeCastExpression { .. }
            | IfElseExpression { .. }
            | LambdaExpression { .. }
            | ThisExpression
            | SuperExpression
            | StubExpression => NodeCategory::Expression,

            Block { .. }
            | BlockStatement { .. }
            | ExpressionStatement { .. }
            | DeclarationStatement { .. }
            | IfStatement { .. }
            | WhileStatement { .. }
            | DoWhileStatement { .. }
            | JavaForLoop { .. }
            | ForIn { .. }
            | JavaSwitch { .. }
            | JavaSwitchCase { .. }
            | When { .. }
            | WhenCase { .. }
            | WhenValueLabel { .. }
            | WhenElseLabel
            | BreakStatement { .. }
            | ContinueStatement { .. }
            | ReturnStatement { .. }
            | ThrowStatement { .. }
            | JavaSynchronizedStatement { .. }
            | LabeledStatement { .. }
            | EmptyStatement => NodeCategory::Statement,

            File { .. }
            | Class(_)
            | JavaMethod(_)
            | Function(_)
            | JavaField(_)
            | Property(_)
            | Parameter(_)
            | LocalVariable(_)
            | JavaConstructor(_)
            | SecondaryConstructor(_)
            | PrimaryConstructor { .. }
            | InitDeclaration { .. }
            | EnumConstant { .. } => NodeCategory::Declaration,

            ModifierList { .. }
            | ModalityModifier(_)
            | VisibilityModifier(_)
            | MutabilityModifier(_)
            | ExtraModifier(_) => NodeCategory::Modifier,

            NameIdentifier { .. } | TypeElement { .. } => NodeCategory::Element,
        }
    }

    #[must_use]
    pub fn is_expression(&self) -> bool {
        self.category() == NodeCategory::Expression
    }

    #[must_use]
    pub fn is_statement(&self) -> bool {
        // Expressions are statements, matching the supertype chain.
        matches!(
            self.category(),
            NodeCategory::Statement | NodeCategory::Expression
        )
    }

    /// Visits every child slot in source order, allowing replacement.
    pub fn for_each_child_mut(&mut self, f: &mut impl FnMut(&mut NodeId)) {
        use NodeKind::*;

        fn each(ids: &mut [NodeId], f: &mut impl FnMut(&mut NodeId)) {
            for id in ids {
                f(id);
            }
        }
        fn opt(id: &mut Option<NodeId>, f: &mut impl FnMut(&mut NodeId)) {
            if let Some(id) = id {
                f(id);
            }
        }

        match self {
            File { declarations } => each(declarations, f),
            Class(c) => {
                f(&mut c.modifiers);
                f(&mut c.name);
                each(&mut c.inheritance, f);
                each(&mut c.declarations, f);
            }
            JavaMethod(m) | Function(m) => {
                f(&mut m.modifiers);
                f(&mut m.name);
                f(&mut m.return_type);
                each(&mut m.parameters, f);
                f(&mut m.body);
            }
            JavaField(v) | Property(v) | Parameter(v) | LocalVariable(v) => {
                f(&mut v.modifiers);
                f(&mut v.type_element);
                f(&mut v.name);
                f(&mut v.initializer);
            }
            JavaConstructor(c) | SecondaryConstructor(c) => {
                f(&mut c.modifiers);
                f(&mut c.name);
                each(&mut c.parameters, f);
                f(&mut c.delegation.target);
                each(&mut c.delegation.arguments, f);
                f(&mut c.body);
            }
            PrimaryConstructor {
                modifiers,
                name,
                parameters,
                delegation,
            } => {
                f(modifiers);
                f(name);
                each(parameters, f);
                f(&mut delegation.target);
                each(&mut delegation.arguments, f);
            }
            InitDeclaration { block } => f(block),
            EnumConstant { name, arguments } => {
                f(name);
                each(arguments, f);
            }

            Block { statements } => each(statements, f),
            BlockStatement { block } => f(block),
            ExpressionStatement { expression } => f(expression),
            DeclarationStatement { declarations } => each(declarations, f),
            IfStatement {
                condition,
                then_branch,
                else_branch,
            } => {
                f(condition);
                f(then_branch);
                opt(else_branch, f);
            }
            WhileStatement { condition, body } => {
                f(condition);
                f(body);
            }
            DoWhileStatement { body, condition } => {
                f(body);
                f(condition);
            }
            JavaForLoop {
                initializers,
                condition,
                updaters,
                body,
            } => {
                each(initializers, f);
                f(condition);
                each(updaters, f);
                f(body);
            }
            ForIn {
                variable,
                iteration,
                body,
            } => {
                f(variable);
                f(iteration);
                f(body);
            }
            JavaSwitch { expression, cases } => {
                f(expression);
                each(cases, f);
            }
            JavaSwitchCase { label, statements } => {
                opt(label, f);
                each(statements, f);
            }
            When { expression, cases } => {
                f(expression);
                each(cases, f);
            }
            WhenCase { labels, body } => {
                each(labels, f);
                f(body);
            }
            WhenValueLabel { expression } => f(expression),
            BreakStatement { label } | ContinueStatement { label } => opt(label, f),
            ReturnStatement { expression } | ThrowStatement { expression } => f(expression),
            JavaSynchronizedStatement { lock, body } => {
                f(lock);
                f(body);
            }
            LabeledStatement { labels, statement } => {
                each(labels, f);
                f(statement);
            }

            BinaryExpression { left, right, .. } => {
                f(left);
                f(right);
            }
            PrefixExpression { operand, .. } | PostfixExpression { operand, .. } => f(operand),
            AssignmentExpression { target, value, .. } => {
                f(target);
                f(value);
            }
            ParenthesizedExpression { expression } => f(expression),
            QualifiedExpression { receiver, selector } => {
                f(receiver);
                f(selector);
            }
            MethodCallExpression {
                type_arguments,
                arguments,
                ..
            } => {
                each(type_arguments, f);
                each(arguments, f);
            }
            ArrayAccessExpression { array, index } => {
                f(array);
                f(index);
            }
            NewExpression { arguments, .. } => each(arguments, f),
            JavaNewArray {
                type_element,
                initializer,
            } => {
                f(type_element);
                each(initializer, f);
            }
            JavaNewEmptyArray {
                type_element,
                dimensions,
            } => {
                f(type_element);
                each(dimensions, f);
            }
            TypeCastExpression {
                expression,
                type_element,
            } => {
                f(expression);
                f(type_element);
            }
            IfElseExpression {
                condition,
                then_branch,
                else_branch,
            } => {
                f(condition);
                f(then_branch);
                f(else_branch);
            }
            LambdaExpression {
                parameters,
                statement,
            } => {
                each(parameters, f);
                f(statement);
            }

            ModifierList { modifiers } => each(modifiers, f),

            WhenElseLabel
            | EmptyStatement
            | Literal { .. }
            | FieldAccessExpression { .. }
            | ClassAccessExpression { .. }
            | ThisExpression
            | SuperExpression
            | StubExpression
            | ModalityModifier(_)
            | VisibilityModifier(_)
            | MutabilityModifier(_)
            | ExtraModifier(_)
            | NameIdentifier { .. }
            | TypeElement { .. } => {}
        }
    }

    /// Collects the child slots in source order.
    #[must_use]
    pub fn child_ids(&self) -> Vec<NodeId> {
        let mut copy = self.clone();
        let mut out = Vec::new();
        copy.for_each_child_mut(&mut |id| out.push(*id));
        out
    }

    /// Replaces the first slot holding `old` with `new`. Returns `false` when
    /// `old` is not a direct child.
    pub fn replace_child(&mut self, old: NodeId, new: NodeId) -> bool {
        let mut replaced = false;
        self.for_each_child_mut(&mut |id| {
            if !replaced && *id == old {
                *id = new;
                replaced = true;
            }
        });
        replaced
    }

    /// Removes `child` from an ordered-list slot or clears an optional slot.
    /// Returns `false` when `child` only occurs in required single slots
    /// (those cannot be emptied, only replaced).
    pub fn remove_child(&mut self, child: NodeId) -> bool {
        use NodeKind::*;

        fn from_list(ids: &mut Vec<NodeId>, child: NodeId) -> bool {
            let before = ids.len();
            ids.retain(|id| *id != child);
            ids.len() != before
        }
        fn from_opt(id: &mut Option<NodeId>, child: NodeId) -> bool {
            if *id == Some(child) {
                *id = None;
                true
            } else {
                false
            }
        }

        match self {
            File { declarations }
            | DeclarationStatement { declarations }
            | Class(ClassDecl { declarations, .. }) => from_list(declarations, child),
            Block { statements } => from_list(statements, child),
            JavaSwitchCase { label, statements } => {
                from_opt(label, child) || from_list(statements, child)
            }
            JavaForLoop {
                initializers,
                updaters,
                ..
            } => from_list(initializers, child) || from_list(updaters, child),
            JavaSwitch { cases, .. } | When { cases, .. } => from_list(cases, child),
            WhenCase { labels, .. } | LabeledStatement { labels, .. } => from_list(labels, child),
            MethodCallExpression {
                type_arguments,
                arguments,
                ..
            } => from_list(type_arguments, child) || from_list(arguments, child),
            NewExpression { arguments, .. } | EnumConstant { arguments, .. } => {
                from_list(arguments, child)
            }
            JavaNewArray { initializer, .. } => from_list(initializer, child),
            JavaNewEmptyArray { dimensions, .. } => from_list(dimensions, child),
            LambdaExpression { parameters, .. } => from_list(parameters, child),
            JavaMethod(m) | Function(m) => from_list(&mut m.parameters, child),
            JavaConstructor(c) | SecondaryConstructor(c) => {
                from_list(&mut c.parameters, child)
                    || from_list(&mut c.delegation.arguments, child)
            }
            PrimaryConstructor {
                parameters,
                delegation,
                ..
            } => from_list(parameters, child) || from_list(&mut delegation.arguments, child),
            ModifierList { modifiers } => from_list(modifiers, child),
            IfStatement { else_branch, .. } => from_opt(else_branch, child),
            BreakStatement { label } | ContinueStatement { label } => from_opt(label, child),
            _ => false,
        }
    }
}
