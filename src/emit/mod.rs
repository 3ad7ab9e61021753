//! Node-dispatch printer.
//!
//! This module defines [`Printer`] and wires together the submodules that implement printing. `mod.rs` holds the
//! state and the small accessors every handler uses; the handlers themselves live in the submodules.
//!
//! ## Notes
//! - The printer owns a private copy of the tree. Capture analysis renames identifiers in that copy, never in the
//!   caller's tree, so repeated runs over the same input are byte-identical.
//! - Statement handlers return text that starts with its own indentation; expression handlers ignore `indent` except
//!   to pass it to nested blocks (lambda bodies, object literals).
//! - Blocks are returned starting at their opening token, so callers append them directly after a header.
//!
//! ## See also
//! - [`dispatch`]: override lookup and the default handler table
//! - [`statements`]: statements, blocks and comments
//! - [`decls`]: classes, functions, methods and properties
//! - [`expressions`]: operators, calls, access and literals
//! - [`crate::passes`]: type resolution, capture analysis, default emulation, async lowering and overrides

pub mod context;
mod decls;
mod dispatch;
pub mod errors;
mod expressions;
mod statements;

pub use context::{Capture, CompilationContext, Scope, VarKey};
pub use decls::{FunctionParts, FunctionSpec};
pub use errors::{EmitResult, TranspileError, Warning, WarningKind};

use std::collections::HashMap;

use polyglot_core::lang::tokens::Token;
use polyglot_syntax::ast::Comments;
use polyglot_syntax::{Ast, NodeId, NodeKind, Span, SyntaxKind, TypeQuery};

use crate::backend::{BackendConfig, BackendSpec, Capabilities};

/// Printer for one transpilation run.
///
/// Handlers (default and backend overrides) are methods or free functions taking `&mut Printer`; they call back into
/// [`Printer::print`] for children.
pub struct Printer<'a> {
    ast: Ast,
    backend: &'a BackendSpec,
    pub ctx: CompilationContext<'a>,
    /// Class name → declaration, for override lookup and class references.
    classes: HashMap<String, NodeId>,
}

impl<'a> Printer<'a> {
    pub fn new(ast: Ast, backend: &'a BackendSpec, types: &'a dyn TypeQuery) -> Self {
        let classes = ast
            .iter()
            .filter_map(|(id, node)| match &node.kind {
                NodeKind::ClassDeclaration { name, .. } => Some((name.clone(), id)),
                _ => None,
            })
            .collect();
        Self {
            ast,
            backend,
            ctx: CompilationContext::new(types),
            classes,
        }
    }

    /// Print the whole tree and hand back the accumulated warnings.
    pub fn print_file(mut self) -> EmitResult<(String, Vec<Warning>)> {
        let root = self.ast.root().ok_or(TranspileError::MissingRoot)?;
        if self.tag(root)? != SyntaxKind::SourceFile {
            return Err(TranspileError::MissingRoot);
        }
        let text = self.print(root, 0)?;
        Ok((text, self.ctx.take_warnings()))
    }

    // ========================================================================
    // Backend accessors
    // ========================================================================

    pub fn backend(&self) -> &'a BackendSpec {
        self.backend
    }

    pub fn config(&self) -> &'a BackendConfig {
        &self.backend.config
    }

    pub fn caps(&self) -> Capabilities {
        self.backend.config.capabilities
    }

    /// Literal text of `token` in the active backend.
    pub fn tok(&self, token: Token) -> &'a str {
        self.backend.config.token(token)
    }

    /// Indentation for `level`.
    pub fn ind(&self, level: usize) -> String {
        self.tok(Token::Indent).repeat(level)
    }

    // ========================================================================
    // Tree accessors
    // ========================================================================

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    pub(crate) fn ast_mut(&mut self) -> &mut Ast {
        &mut self.ast
    }

    /// Owned copy of a node's data, so handlers can recurse while holding it.
    pub fn kind(&self, id: NodeId) -> EmitResult<NodeKind> {
        self.ast.kind(id).cloned().ok_or(TranspileError::DanglingNode(id))
    }

    pub fn tag(&self, id: NodeId) -> EmitResult<SyntaxKind> {
        self.ast.tag(id).ok_or(TranspileError::DanglingNode(id))
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.ast.span(id)
    }

    pub fn comments(&self, id: NodeId) -> Comments {
        self.ast.get(id).map(|n| n.comments.clone()).unwrap_or_default()
    }

    pub fn types(&self) -> &'a dyn TypeQuery {
        self.ctx.types()
    }

    /// Declaration of an in-file class.
    pub fn class_decl(&self, name: &str) -> Option<NodeId> {
        self.classes.get(name).copied()
    }

    /// Parent class name of an in-file class.
    pub fn class_parent(&self, name: &str) -> Option<String> {
        match self.class_decl(name).and_then(|id| self.ast.kind(id)) {
            Some(NodeKind::ClassDeclaration { extends, .. }) => extends.clone(),
            _ => None,
        }
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    pub fn warn(&mut self, kind: WarningKind, id: NodeId, message: impl Into<String>) {
        let span = self.span(id);
        self.ctx.warn(kind, message, id, span);
    }

    /// Fatal "cannot print" error for `id`.
    pub fn unsupported(&self, id: NodeId, detail: Option<String>) -> TranspileError {
        match self.ast.tag(id) {
            Some(kind) => TranspileError::unsupported(kind, self.backend.id(), id, self.span(id), detail),
            None => TranspileError::DanglingNode(id),
        }
    }

    /// Run `f` inside `scope`, restoring the previous scope afterwards.
    pub fn in_scope<T>(&mut self, scope: Scope, f: impl FnOnce(&mut Self) -> EmitResult<T>) -> EmitResult<T> {
        self.ctx.push_scope(scope);
        let result = f(self);
        self.ctx.pop_scope();
        result
    }
}

/// Join the non-empty `parts` with single spaces.
pub(crate) fn join_words<'s>(parts: impl IntoIterator<Item = &'s str>) -> String {
    parts.into_iter().filter(|p| !p.is_empty()).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use polyglot_syntax::NoTypeInfo;
    use polyglot_syntax::builder::AstBuilder;

    use super::*;
    use crate::backend::BackendId;

    #[test]
    fn printer_reports_missing_root() {
        let spec = BackendSpec::for_id(BackendId::Java);
        let printer = Printer::new(Ast::default(), &spec, &NoTypeInfo);
        assert_eq!(printer.print_file().unwrap_err(), TranspileError::MissingRoot);
    }

    #[test]
    fn class_index_is_built_up_front() {
        let mut b = AstBuilder::new();
        let base = b.class("Base", None, vec![]);
        let derived = b.class("Derived", Some("Base"), vec![]);
        let ast = b.finish(vec![base, derived]);
        let spec = BackendSpec::for_id(BackendId::Java);
        let printer = Printer::new(ast, &spec, &NoTypeInfo);
        assert_eq!(printer.class_decl("Derived"), Some(derived));
        assert_eq!(printer.class_parent("Derived").as_deref(), Some("Base"));
        assert_eq!(printer.class_parent("Base"), None);
    }

    #[test]
    fn join_words_skips_empty_parts() {
        assert_eq!(join_words(["public", "", "static", "void"]), "public static void");
        assert_eq!(join_words(["", ""]), "");
    }
}
