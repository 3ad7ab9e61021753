//! Arena AST for the source language.
//!
//! Nodes live in a flat `Vec` owned by [`Ast`]; children are referenced by [`NodeId`]. The id is the node's stable
//! identity: engine caches key on it, so rewriting a node's text never invalidates a cache entry.
//!
//! ## Notes
//! - [`NodeKind`] carries the data of each node, [`SyntaxKind`] is its fieldless tag. The set of kinds is closed.
//! - The only in-place rewrite supported is [`Ast::rename_identifier`]; it never changes a node's kind.

use std::fmt;

use polyglot_core::lang::operators::{BinaryOp, PostfixOp, PrefixOp};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Identity and positions
// ============================================================================

/// Stable arena index of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Byte range of a node in the original source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Comments attached to a statement or member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comments {
    /// Full comment lines (including the `//` marker) printed before the node.
    #[serde(default)]
    pub leading: Vec<String>,
    /// A comment printed after the node on the same line.
    #[serde(default)]
    pub trailing: Option<String>,
}

impl Comments {
    pub fn is_empty(&self) -> bool {
        self.leading.is_empty() && self.trailing.is_none()
    }
}

// ============================================================================
// Type annotations and modifiers
// ============================================================================

/// Declared type annotation as written in the source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TypeAnnotation {
    /// `number`, `string`, `Promise<T>`, `MyClass`, ...
    Named {
        name: String,
        #[serde(default)]
        args: Vec<TypeAnnotation>,
    },
    /// `T[]`
    Array { element: Box<TypeAnnotation> },
    /// `A | B`
    Union { members: Vec<TypeAnnotation> },
}

impl TypeAnnotation {
    pub fn named(name: impl Into<String>) -> Self {
        TypeAnnotation::Named {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn generic(name: impl Into<String>, args: Vec<TypeAnnotation>) -> Self {
        TypeAnnotation::Named {
            name: name.into(),
            args,
        }
    }

    pub fn array(element: TypeAnnotation) -> Self {
        TypeAnnotation::Array {
            element: Box::new(element),
        }
    }

    /// Name of a `Named` annotation.
    pub fn name(&self) -> Option<&str> {
        match self {
            TypeAnnotation::Named { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Inner type of `Promise<T>`, if this is one.
    pub fn promise_inner(&self) -> Option<Option<&TypeAnnotation>> {
        match self {
            TypeAnnotation::Named { name, args } if name == "Promise" => Some(args.first()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Default,
    Public,
    Private,
    Protected,
}

/// Modifiers on functions, methods and properties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub is_async: bool,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub visibility: Visibility,
}

impl Modifiers {
    pub fn asynchronous() -> Self {
        Self {
            is_async: true,
            ..Self::default()
        }
    }

    pub fn static_() -> Self {
        Self {
            is_static: true,
            ..Self::default()
        }
    }
}

/// `var`, `let` or `const`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    Var,
    Let,
    Const,
}

// ============================================================================
// Nodes
// ============================================================================

/// One arena entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(default)]
    pub span: Span,
    #[serde(default, skip_serializing_if = "Comments::is_empty")]
    pub comments: Comments,
}

/// Node data, one variant per node kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum NodeKind {
    // ---- Declarations ----
    SourceFile {
        statements: Vec<NodeId>,
    },
    ClassDeclaration {
        name: String,
        #[serde(default)]
        extends: Option<String>,
        members: Vec<NodeId>,
    },
    PropertyDeclaration {
        name: String,
        #[serde(default)]
        ty: Option<TypeAnnotation>,
        #[serde(default)]
        initializer: Option<NodeId>,
        #[serde(default)]
        modifiers: Modifiers,
    },
    MethodDeclaration {
        name: String,
        params: Vec<NodeId>,
        #[serde(default)]
        return_type: Option<TypeAnnotation>,
        #[serde(default)]
        body: Option<NodeId>,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Constructor {
        params: Vec<NodeId>,
        #[serde(default)]
        body: Option<NodeId>,
    },
    FunctionDeclaration {
        name: String,
        params: Vec<NodeId>,
        #[serde(default)]
        return_type: Option<TypeAnnotation>,
        body: NodeId,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Parameter {
        name: String,
        #[serde(default)]
        ty: Option<TypeAnnotation>,
        #[serde(default)]
        initializer: Option<NodeId>,
        #[serde(default)]
        optional: bool,
    },

    // ---- Statements ----
    VariableStatement {
        declaration_kind: DeclarationKind,
        declarations: Vec<NodeId>,
    },
    VariableDeclaration {
        name: String,
        #[serde(default)]
        ty: Option<TypeAnnotation>,
        #[serde(default)]
        initializer: Option<NodeId>,
    },
    ExpressionStatement {
        expression: NodeId,
    },
    Block {
        statements: Vec<NodeId>,
    },
    If {
        condition: NodeId,
        then_branch: NodeId,
        #[serde(default)]
        else_branch: Option<NodeId>,
    },
    For {
        #[serde(default)]
        initializer: Option<NodeId>,
        #[serde(default)]
        condition: Option<NodeId>,
        #[serde(default)]
        incrementor: Option<NodeId>,
        body: NodeId,
    },
    While {
        condition: NodeId,
        body: NodeId,
    },
    Return {
        #[serde(default)]
        expression: Option<NodeId>,
    },
    Break,
    Continue,
    Throw {
        expression: NodeId,
    },
    Try {
        block: NodeId,
        #[serde(default)]
        catch_param: Option<String>,
        #[serde(default)]
        catch_block: Option<NodeId>,
        #[serde(default)]
        finally_block: Option<NodeId>,
    },

    // ---- Expressions ----
    Identifier {
        name: String,
    },
    NumericLiteral {
        text: String,
    },
    StringLiteral {
        value: String,
    },
    BooleanLiteral {
        value: bool,
    },
    NullLiteral,
    Undefined,
    This,
    Super,
    ArrayLiteral {
        elements: Vec<NodeId>,
    },
    ObjectLiteral {
        properties: Vec<NodeId>,
    },
    PropertyAssignment {
        key: String,
        value: NodeId,
    },
    Binary {
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
    },
    PrefixUnary {
        op: PrefixOp,
        operand: NodeId,
    },
    PostfixUnary {
        op: PostfixOp,
        operand: NodeId,
    },
    Call {
        callee: NodeId,
        args: Vec<NodeId>,
    },
    New {
        callee: NodeId,
        args: Vec<NodeId>,
    },
    PropertyAccess {
        object: NodeId,
        name: String,
    },
    ElementAccess {
        object: NodeId,
        index: NodeId,
    },
    Conditional {
        condition: NodeId,
        when_true: NodeId,
        when_false: NodeId,
    },
    ArrowFunction {
        params: Vec<NodeId>,
        body: NodeId,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Await {
        expression: NodeId,
    },
    Parenthesized {
        expression: NodeId,
    },
    TypeOf {
        expression: NodeId,
    },
    As {
        expression: NodeId,
        ty: TypeAnnotation,
    },
    Delete {
        expression: NodeId,
    },
    Spread {
        expression: NodeId,
    },
}

/// Fieldless kind tag of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SyntaxKind {
    SourceFile,
    ClassDeclaration,
    PropertyDeclaration,
    MethodDeclaration,
    Constructor,
    FunctionDeclaration,
    Parameter,
    VariableStatement,
    VariableDeclaration,
    ExpressionStatement,
    Block,
    If,
    For,
    While,
    Return,
    Break,
    Continue,
    Throw,
    Try,
    Identifier,
    NumericLiteral,
    StringLiteral,
    BooleanLiteral,
    NullLiteral,
    Undefined,
    This,
    Super,
    ArrayLiteral,
    ObjectLiteral,
    PropertyAssignment,
    Binary,
    PrefixUnary,
    PostfixUnary,
    Call,
    New,
    PropertyAccess,
    ElementAccess,
    Conditional,
    ArrowFunction,
    Await,
    Parenthesized,
    TypeOf,
    As,
    Delete,
    Spread,
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl NodeKind {
    /// Kind tag of this node.
    pub fn tag(&self) -> SyntaxKind {
        match self {
            NodeKind::SourceFile { .. } => SyntaxKind::SourceFile,
            NodeKind::ClassDeclaration { .. } => SyntaxKind::ClassDeclaration,
            NodeKind::PropertyDeclaration { .. } => SyntaxKind::PropertyDeclaration,
            NodeKind::MethodDeclaration { .. } => SyntaxKind::MethodDeclaration,
            NodeKind::Constructor { .. } => SyntaxKind::Constructor,
            NodeKind::FunctionDeclaration { .. } => SyntaxKind::FunctionDeclaration,
            NodeKind::Parameter { .. } => SyntaxKind::Parameter,
            NodeKind::VariableStatement { .. } => SyntaxKind::VariableStatement,
            NodeKind::VariableDeclaration { .. } => SyntaxKind::VariableDeclaration,
            NodeKind::ExpressionStatement { .. } => SyntaxKind::ExpressionStatement,
            NodeKind::Block { .. } => SyntaxKind::Block,
            NodeKind::If { .. } => SyntaxKind::If,
            NodeKind::For { .. } => SyntaxKind::For,
            NodeKind::While { .. } => SyntaxKind::While,
            NodeKind::Return { .. } => SyntaxKind::Return,
            NodeKind::Break => SyntaxKind::Break,
            NodeKind::Continue => SyntaxKind::Continue,
            NodeKind::Throw { .. } => SyntaxKind::Throw,
            NodeKind::Try { .. } => SyntaxKind::Try,
            NodeKind::Identifier { .. } => SyntaxKind::Identifier,
            NodeKind::NumericLiteral { .. } => SyntaxKind::NumericLiteral,
            NodeKind::StringLiteral { .. } => SyntaxKind::StringLiteral,
            NodeKind::BooleanLiteral { .. } => SyntaxKind::BooleanLiteral,
            NodeKind::NullLiteral => SyntaxKind::NullLiteral,
            NodeKind::Undefined => SyntaxKind::Undefined,
            NodeKind::This => SyntaxKind::This,
            NodeKind::Super => SyntaxKind::Super,
            NodeKind::ArrayLiteral { .. } => SyntaxKind::ArrayLiteral,
            NodeKind::ObjectLiteral { .. } => SyntaxKind::ObjectLiteral,
            NodeKind::PropertyAssignment { .. } => SyntaxKind::PropertyAssignment,
            NodeKind::Binary { .. } => SyntaxKind::Binary,
            NodeKind::PrefixUnary { .. } => SyntaxKind::PrefixUnary,
            NodeKind::PostfixUnary { .. } => SyntaxKind::PostfixUnary,
            NodeKind::Call { .. } => SyntaxKind::Call,
            NodeKind::New { .. } => SyntaxKind::New,
            NodeKind::PropertyAccess { .. } => SyntaxKind::PropertyAccess,
            NodeKind::ElementAccess { .. } => SyntaxKind::ElementAccess,
            NodeKind::Conditional { .. } => SyntaxKind::Conditional,
            NodeKind::ArrowFunction { .. } => SyntaxKind::ArrowFunction,
            NodeKind::Await { .. } => SyntaxKind::Await,
            NodeKind::Parenthesized { .. } => SyntaxKind::Parenthesized,
            NodeKind::TypeOf { .. } => SyntaxKind::TypeOf,
            NodeKind::As { .. } => SyntaxKind::As,
            NodeKind::Delete { .. } => SyntaxKind::Delete,
            NodeKind::Spread { .. } => SyntaxKind::Spread,
        }
    }

    /// Direct children, in source order.
    pub fn children(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        match self {
            NodeKind::SourceFile { statements } | NodeKind::Block { statements } => out.extend(statements),
            NodeKind::ClassDeclaration { members, .. } => out.extend(members),
            NodeKind::PropertyDeclaration { initializer, .. }
            | NodeKind::VariableDeclaration { initializer, .. }
            | NodeKind::Parameter { initializer, .. } => out.extend(*initializer),
            NodeKind::MethodDeclaration { params, body, .. } | NodeKind::Constructor { params, body } => {
                out.extend(params);
                out.extend(*body);
            }
            NodeKind::FunctionDeclaration { params, body, .. } | NodeKind::ArrowFunction { params, body, .. } => {
                out.extend(params);
                out.push(*body);
            }
            NodeKind::VariableStatement { declarations, .. } => out.extend(declarations),
            NodeKind::ExpressionStatement { expression }
            | NodeKind::Throw { expression }
            | NodeKind::Await { expression }
            | NodeKind::Parenthesized { expression }
            | NodeKind::TypeOf { expression }
            | NodeKind::As { expression, .. }
            | NodeKind::Delete { expression }
            | NodeKind::Spread { expression } => out.push(*expression),
            NodeKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                out.push(*condition);
                out.push(*then_branch);
                out.extend(*else_branch);
            }
            NodeKind::For {
                initializer,
                condition,
                incrementor,
                body,
            } => {
                out.extend(*initializer);
                out.extend(*condition);
                out.extend(*incrementor);
                out.push(*body);
            }
            NodeKind::While { condition, body } => {
                out.push(*condition);
                out.push(*body);
            }
            NodeKind::Return { expression } => out.extend(*expression),
            NodeKind::Try {
                block,
                catch_block,
                finally_block,
                ..
            } => {
                out.push(*block);
                out.extend(*catch_block);
                out.extend(*finally_block);
            }
            NodeKind::ArrayLiteral { elements } => out.extend(elements),
            NodeKind::ObjectLiteral { properties } => out.extend(properties),
            NodeKind::PropertyAssignment { value, .. } => out.push(*value),
            NodeKind::Binary { left, right, .. } => {
                out.push(*left);
                out.push(*right);
            }
            NodeKind::PrefixUnary { operand, .. } | NodeKind::PostfixUnary { operand, .. } => out.push(*operand),
            NodeKind::Call { callee, args } | NodeKind::New { callee, args } => {
                out.push(*callee);
                out.extend(args);
            }
            NodeKind::PropertyAccess { object, .. } => out.push(*object),
            NodeKind::ElementAccess { object, index } => {
                out.push(*object);
                out.push(*index);
            }
            NodeKind::Conditional {
                condition,
                when_true,
                when_false,
            } => {
                out.push(*condition);
                out.push(*when_true);
                out.push(*when_false);
            }
            NodeKind::Break
            | NodeKind::Continue
            | NodeKind::Identifier { .. }
            | NodeKind::NumericLiteral { .. }
            | NodeKind::StringLiteral { .. }
            | NodeKind::BooleanLiteral { .. }
            | NodeKind::NullLiteral
            | NodeKind::Undefined
            | NodeKind::This
            | NodeKind::Super => {}
        }
        out
    }
}

// ============================================================================
// Arena
// ============================================================================

/// Structural problems in a deserialized tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AstError {
    #[error("node {parent} references missing node {child}")]
    DanglingNode { parent: NodeId, child: NodeId },
    #[error("root {0} is not a node of this tree")]
    MissingRoot(NodeId),
    #[error("root {0} is not a SourceFile")]
    RootNotSourceFile(NodeId),
}

/// A source file's syntax tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ast {
    nodes: Vec<Node>,
    #[serde(default)]
    root: Option<NodeId>,
    /// Original source text, used to render diagnostics with a snippet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source_text: Option<String>,
}

impl Ast {
    pub(crate) fn from_parts(nodes: Vec<Node>, root: Option<NodeId>) -> Self {
        Self {
            nodes,
            root,
            source_text: None,
        }
    }

    pub fn with_source_text(mut self, text: impl Into<String>) -> Self {
        self.source_text = Some(text.into());
        self
    }

    pub fn source_text(&self) -> Option<&str> {
        self.source_text.as_deref()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.get(id).map(|n| &n.kind)
    }

    pub fn tag(&self, id: NodeId) -> Option<SyntaxKind> {
        self.kind(id).map(NodeKind::tag)
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.get(id).map(|n| n.span).unwrap_or_default()
    }

    /// Name of an identifier node.
    pub fn identifier_name(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            Some(NodeKind::Identifier { name }) => Some(name),
            _ => None,
        }
    }

    /// Replace an identifier's text in place.
    ///
    /// ## Returns
    /// - `true` if `id` is an identifier and was renamed; `false` otherwise (the tree is left untouched).
    pub fn rename_identifier(&mut self, id: NodeId, new_name: impl Into<String>) -> bool {
        match self.nodes.get_mut(id.index()).map(|n| &mut n.kind) {
            Some(NodeKind::Identifier { name }) => {
                *name = new_name.into();
                true
            }
            _ => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i as u32), n))
    }

    /// Check that every child reference and the root point into the arena.
    pub fn validate(&self) -> Result<(), AstError> {
        for (id, node) in self.iter() {
            for child in node.kind.children() {
                if child.index() >= self.nodes.len() {
                    return Err(AstError::DanglingNode { parent: id, child });
                }
            }
        }
        if let Some(root) = self.root {
            match self.kind(root) {
                None => return Err(AstError::MissingRoot(root)),
                Some(NodeKind::SourceFile { .. }) => {}
                Some(_) => return Err(AstError::RootNotSourceFile(root)),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::builder::AstBuilder;

    #[test]
    fn rename_keeps_kind() {
        let mut b = AstBuilder::new();
        let y = b.ident("y");
        let one = b.num("1");
        let mut ast = b.finish(vec![]);
        assert!(ast.rename_identifier(y, "finalY"));
        assert_eq!(ast.identifier_name(y), Some("finalY"));
        assert_eq!(ast.tag(y), Some(SyntaxKind::Identifier));
        assert!(!ast.rename_identifier(one, "oops"));
        assert_eq!(ast.tag(one), Some(SyntaxKind::NumericLiteral));
    }

    #[test]
    fn validate_reports_dangling_children() {
        let nodes = vec![Node {
            kind: NodeKind::ExpressionStatement {
                expression: NodeId(7),
            },
            span: Span::default(),
            comments: Comments::default(),
        }];
        let ast = Ast::from_parts(nodes, None);
        assert_eq!(
            ast.validate(),
            Err(AstError::DanglingNode {
                parent: NodeId(0),
                child: NodeId(7)
            })
        );
    }

    #[test]
    fn json_uses_flat_kind_tags() {
        let mut b = AstBuilder::new();
        let x = b.ident("x");
        let stmt = b.expr_stmt(x);
        let ast = b.finish(vec![stmt]);
        let json = serde_json::to_string(&ast).unwrap();
        assert!(json.contains(r#""kind":"Identifier","name":"x""#), "{json}");
        let back: Ast = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ast);
        back.validate().unwrap();
    }
}
