//! Programmatic AST construction.
//!
//! The external parser is the usual producer of trees; this builder exists for embedders that synthesize code and
//! for tests. Every constructor pushes one node and returns its id, so ids are assigned in creation order.

use polyglot_core::lang::operators::{BinaryOp, PostfixOp, PrefixOp};

use crate::ast::{Ast, Comments, DeclarationKind, Modifiers, Node, NodeId, NodeKind, Span, TypeAnnotation};

/// Incremental arena builder.
#[derive(Debug, Default)]
pub struct AstBuilder {
    nodes: Vec<Node>,
}

impl AstBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a node with an empty span.
    pub fn push(&mut self, kind: NodeKind) -> NodeId {
        self.push_spanned(kind, Span::default())
    }

    pub fn push_spanned(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            span,
            comments: Comments::default(),
        });
        id
    }

    /// Set the source span of an existing node.
    pub fn set_span(&mut self, id: NodeId, span: Span) {
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.span = span;
        }
    }

    /// Attach a leading comment line (including its `//` marker).
    pub fn leading_comment(&mut self, id: NodeId, text: impl Into<String>) {
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.comments.leading.push(text.into());
        }
    }

    pub fn trailing_comment(&mut self, id: NodeId, text: impl Into<String>) {
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.comments.trailing = Some(text.into());
        }
    }

    /// Wrap `statements` in a `SourceFile` root and produce the tree.
    pub fn finish(mut self, statements: Vec<NodeId>) -> Ast {
        let root = self.push(NodeKind::SourceFile { statements });
        Ast::from_parts(self.nodes, Some(root))
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    pub fn ident(&mut self, name: impl Into<String>) -> NodeId {
        self.push(NodeKind::Identifier { name: name.into() })
    }

    pub fn num(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeKind::NumericLiteral { text: text.into() })
    }

    pub fn string(&mut self, value: impl Into<String>) -> NodeId {
        self.push(NodeKind::StringLiteral { value: value.into() })
    }

    pub fn boolean(&mut self, value: bool) -> NodeId {
        self.push(NodeKind::BooleanLiteral { value })
    }

    pub fn null(&mut self) -> NodeId {
        self.push(NodeKind::NullLiteral)
    }

    pub fn undefined(&mut self) -> NodeId {
        self.push(NodeKind::Undefined)
    }

    pub fn this(&mut self) -> NodeId {
        self.push(NodeKind::This)
    }

    pub fn super_(&mut self) -> NodeId {
        self.push(NodeKind::Super)
    }

    pub fn array(&mut self, elements: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::ArrayLiteral { elements })
    }

    /// Object literal from `(key, value)` pairs.
    pub fn object(&mut self, properties: Vec<(&str, NodeId)>) -> NodeId {
        let properties = properties
            .into_iter()
            .map(|(key, value)| {
                self.push(NodeKind::PropertyAssignment {
                    key: key.to_string(),
                    value,
                })
            })
            .collect();
        self.push(NodeKind::ObjectLiteral { properties })
    }

    pub fn binary(&mut self, op: BinaryOp, left: NodeId, right: NodeId) -> NodeId {
        self.push(NodeKind::Binary { op, left, right })
    }

    pub fn assign(&mut self, left: NodeId, right: NodeId) -> NodeId {
        self.binary(BinaryOp::Assign, left, right)
    }

    pub fn prefix(&mut self, op: PrefixOp, operand: NodeId) -> NodeId {
        self.push(NodeKind::PrefixUnary { op, operand })
    }

    pub fn postfix(&mut self, op: PostfixOp, operand: NodeId) -> NodeId {
        self.push(NodeKind::PostfixUnary { op, operand })
    }

    pub fn call(&mut self, callee: NodeId, args: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::Call { callee, args })
    }

    /// `object.name(args)`
    pub fn method_call(&mut self, object: NodeId, name: &str, args: Vec<NodeId>) -> NodeId {
        let callee = self.prop(object, name);
        self.call(callee, args)
    }

    /// `new Class(args)`
    pub fn new_(&mut self, class: &str, args: Vec<NodeId>) -> NodeId {
        let callee = self.ident(class);
        self.push(NodeKind::New { callee, args })
    }

    pub fn prop(&mut self, object: NodeId, name: impl Into<String>) -> NodeId {
        self.push(NodeKind::PropertyAccess {
            object,
            name: name.into(),
        })
    }

    pub fn elem(&mut self, object: NodeId, index: NodeId) -> NodeId {
        self.push(NodeKind::ElementAccess { object, index })
    }

    pub fn conditional(&mut self, condition: NodeId, when_true: NodeId, when_false: NodeId) -> NodeId {
        self.push(NodeKind::Conditional {
            condition,
            when_true,
            when_false,
        })
    }

    pub fn paren(&mut self, expression: NodeId) -> NodeId {
        self.push(NodeKind::Parenthesized { expression })
    }

    pub fn await_(&mut self, expression: NodeId) -> NodeId {
        self.push(NodeKind::Await { expression })
    }

    pub fn typeof_(&mut self, expression: NodeId) -> NodeId {
        self.push(NodeKind::TypeOf { expression })
    }

    pub fn as_(&mut self, expression: NodeId, ty: TypeAnnotation) -> NodeId {
        self.push(NodeKind::As { expression, ty })
    }

    pub fn delete(&mut self, expression: NodeId) -> NodeId {
        self.push(NodeKind::Delete { expression })
    }

    pub fn spread(&mut self, expression: NodeId) -> NodeId {
        self.push(NodeKind::Spread { expression })
    }

    pub fn arrow(&mut self, params: Vec<NodeId>, body: NodeId, modifiers: Modifiers) -> NodeId {
        self.push(NodeKind::ArrowFunction { params, body, modifiers })
    }

    // ========================================================================
    // Statements
    // ========================================================================

    /// Single-declaration variable statement.
    pub fn var_stmt(
        &mut self,
        declaration_kind: DeclarationKind,
        name: &str,
        ty: Option<TypeAnnotation>,
        initializer: Option<NodeId>,
    ) -> NodeId {
        let decl = self.push(NodeKind::VariableDeclaration {
            name: name.to_string(),
            ty,
            initializer,
        });
        self.push(NodeKind::VariableStatement {
            declaration_kind,
            declarations: vec![decl],
        })
    }

    pub fn let_(&mut self, name: &str, initializer: Option<NodeId>) -> NodeId {
        self.var_stmt(DeclarationKind::Let, name, None, initializer)
    }

    pub fn const_(&mut self, name: &str, initializer: Option<NodeId>) -> NodeId {
        self.var_stmt(DeclarationKind::Const, name, None, initializer)
    }

    pub fn expr_stmt(&mut self, expression: NodeId) -> NodeId {
        self.push(NodeKind::ExpressionStatement { expression })
    }

    /// `left = right;` as a statement.
    pub fn assign_stmt(&mut self, left: NodeId, right: NodeId) -> NodeId {
        let assign = self.assign(left, right);
        self.expr_stmt(assign)
    }

    pub fn block(&mut self, statements: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::Block { statements })
    }

    pub fn if_(&mut self, condition: NodeId, then_branch: NodeId, else_branch: Option<NodeId>) -> NodeId {
        self.push(NodeKind::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    pub fn for_(
        &mut self,
        initializer: Option<NodeId>,
        condition: Option<NodeId>,
        incrementor: Option<NodeId>,
        body: NodeId,
    ) -> NodeId {
        self.push(NodeKind::For {
            initializer,
            condition,
            incrementor,
            body,
        })
    }

    pub fn while_(&mut self, condition: NodeId, body: NodeId) -> NodeId {
        self.push(NodeKind::While { condition, body })
    }

    pub fn ret(&mut self, expression: Option<NodeId>) -> NodeId {
        self.push(NodeKind::Return { expression })
    }

    pub fn break_(&mut self) -> NodeId {
        self.push(NodeKind::Break)
    }

    pub fn continue_(&mut self) -> NodeId {
        self.push(NodeKind::Continue)
    }

    pub fn throw(&mut self, expression: NodeId) -> NodeId {
        self.push(NodeKind::Throw { expression })
    }

    pub fn try_(
        &mut self,
        block: NodeId,
        catch_param: Option<&str>,
        catch_block: Option<NodeId>,
        finally_block: Option<NodeId>,
    ) -> NodeId {
        self.push(NodeKind::Try {
            block,
            catch_param: catch_param.map(str::to_string),
            catch_block,
            finally_block,
        })
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    pub fn param(&mut self, name: &str) -> NodeId {
        self.param_full(name, None, None, false)
    }

    pub fn param_typed(&mut self, name: &str, ty: TypeAnnotation) -> NodeId {
        self.param_full(name, Some(ty), None, false)
    }

    pub fn param_default(&mut self, name: &str, initializer: NodeId) -> NodeId {
        self.param_full(name, None, Some(initializer), false)
    }

    /// `name?` without a default value.
    pub fn param_optional(&mut self, name: &str) -> NodeId {
        self.param_full(name, None, None, true)
    }

    pub fn param_full(
        &mut self,
        name: &str,
        ty: Option<TypeAnnotation>,
        initializer: Option<NodeId>,
        optional: bool,
    ) -> NodeId {
        self.push(NodeKind::Parameter {
            name: name.to_string(),
            ty,
            initializer,
            optional,
        })
    }

    pub fn property(&mut self, name: &str, ty: Option<TypeAnnotation>, initializer: Option<NodeId>) -> NodeId {
        self.push(NodeKind::PropertyDeclaration {
            name: name.to_string(),
            ty,
            initializer,
            modifiers: Modifiers::default(),
        })
    }

    /// Method with a block body built from `statements`.
    pub fn method(&mut self, name: &str, params: Vec<NodeId>, statements: Vec<NodeId>) -> NodeId {
        self.method_full(name, params, None, statements, Modifiers::default())
    }

    pub fn method_full(
        &mut self,
        name: &str,
        params: Vec<NodeId>,
        return_type: Option<TypeAnnotation>,
        statements: Vec<NodeId>,
        modifiers: Modifiers,
    ) -> NodeId {
        let body = self.block(statements);
        self.push(NodeKind::MethodDeclaration {
            name: name.to_string(),
            params,
            return_type,
            body: Some(body),
            modifiers,
        })
    }

    pub fn constructor(&mut self, params: Vec<NodeId>, statements: Vec<NodeId>) -> NodeId {
        let body = self.block(statements);
        self.push(NodeKind::Constructor {
            params,
            body: Some(body),
        })
    }

    pub fn class(&mut self, name: &str, extends: Option<&str>, members: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::ClassDeclaration {
            name: name.to_string(),
            extends: extends.map(str::to_string),
            members,
        })
    }

    pub fn function(
        &mut self,
        name: &str,
        params: Vec<NodeId>,
        return_type: Option<TypeAnnotation>,
        statements: Vec<NodeId>,
        modifiers: Modifiers,
    ) -> NodeId {
        let body = self.block(statements);
        self.push(NodeKind::FunctionDeclaration {
            name: name.to_string(),
            params,
            return_type,
            body,
            modifiers,
        })
    }
}
