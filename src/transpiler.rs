//! Top-level entry point: one syntax tree in, one generated source out.
//!
//! A [`Transpiler`] owns a fully configured [`BackendSpec`]. Each call to [`Transpiler::transpile`] validates the
//! tree, prints a private copy of it and returns the text together with the non-fatal warnings raised on the way.
//!
//! ## Notes
//! - Runs share nothing but the read-only backend spec, so one `Transpiler` can serve many files (and threads).
//! - Package headers, imports and runtime helper sources are the caller's concern.
//!
//! ## Examples
//! ```rust
//! use polyglot::backend::BackendId;
//! use polyglot::transpiler::Transpiler;
//! use polyglot_syntax::NoTypeInfo;
//! use polyglot_syntax::builder::AstBuilder;
//!
//! let mut b = AstBuilder::new();
//! let one = b.num("1");
//! let decl = b.let_("x", Some(one));
//! let ast = b.finish(vec![decl]);
//!
//! let output = Transpiler::new(BackendId::Python).transpile(&ast, &NoTypeInfo).unwrap();
//! assert_eq!(output.content, "x = 1");
//! assert!(output.warnings.is_empty());
//! ```

use polyglot_syntax::{Ast, TypeQuery};

use crate::backend::{BackendId, BackendSpec};
use crate::config::EngineOptions;
use crate::emit::{Printer, TranspileError, Warning};

/// Generated source for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranspileOutput {
    pub content: String,
    pub warnings: Vec<Warning>,
}

/// Transpiler for a single backend.
#[derive(Debug, Clone)]
pub struct Transpiler {
    spec: BackendSpec,
}

impl Transpiler {
    /// Transpiler with the backend's default configuration.
    pub fn new(backend: BackendId) -> Self {
        Self {
            spec: BackendSpec::for_id(backend),
        }
    }

    /// Transpiler with a prepared spec, e.g. one composed with [`crate::backend::BackendConfig::merged`].
    pub fn from_spec(spec: BackendSpec) -> Self {
        Self { spec }
    }

    /// Apply the user options addressed to this backend.
    pub fn with_options(mut self, options: &EngineOptions) -> Self {
        let backend_options = options.for_backend(self.spec.id());
        self.spec = self.spec.with_options(&backend_options);
        self
    }

    pub fn backend(&self) -> BackendId {
        self.spec.id()
    }

    pub fn spec(&self) -> &BackendSpec {
        &self.spec
    }

    /// Transpile `ast`, answering type questions through `types`.
    ///
    /// ## Errors
    /// - [`TranspileError::InvalidTree`] when `ast` references missing nodes or has no `SourceFile` root.
    /// - [`TranspileError::UnsupportedConstruct`] for the first node the backend cannot print.
    #[tracing::instrument(skip_all, fields(backend = %self.spec.id()))]
    pub fn transpile(&self, ast: &Ast, types: &dyn TypeQuery) -> Result<TranspileOutput, TranspileError> {
        ast.validate()?;
        let printer = Printer::new(ast.clone(), &self.spec, types);
        let (content, warnings) = printer.print_file()?;
        tracing::debug!(bytes = content.len(), warnings = warnings.len(), "transpiled");
        Ok(TranspileOutput { content, warnings })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use polyglot_core::lang::operators::BinaryOp;
    use polyglot_syntax::ast::Modifiers;
    use polyglot_syntax::builder::AstBuilder;
    use polyglot_syntax::{NoTypeInfo, NodeId};

    use super::*;
    use crate::backend::ALL_BACKENDS;
    use crate::config::BackendOptions;

    fn reassigned_capture() -> Ast {
        let mut b = AstBuilder::new();
        let zero = b.num("0");
        let decl = b.let_("y", Some(zero));
        let y = b.ident("y");
        let one = b.num("1");
        let y_read = b.ident("y");
        let sum = b.binary(BinaryOp::Plus, y_read, one);
        let bump = b.assign_stmt(y, sum);
        let y_captured = b.ident("y");
        let obj = b.object(vec![("a", y_captured)]);
        let x = b.const_("x", Some(obj));
        let main = b.function("main", vec![], None, vec![decl, bump, x], Modifiers::default());
        b.finish(vec![main])
    }

    #[test]
    fn callers_tree_is_left_untouched() {
        let ast = reassigned_capture();
        let before = ast.clone();
        let transpiler = Transpiler::new(BackendId::Java);
        let first = transpiler.transpile(&ast, &NoTypeInfo).unwrap();
        let second = transpiler.transpile(&ast, &NoTypeInfo).unwrap();
        assert_eq!(ast, before);
        assert_eq!(first, second);
        assert!(first.content.contains("finalY"), "{}", first.content);
    }

    #[test]
    fn every_backend_prints_a_declaration() {
        let mut b = AstBuilder::new();
        let one = b.num("1");
        let decl = b.let_("x", Some(one));
        let ast = b.finish(vec![decl]);
        for &id in ALL_BACKENDS {
            let out = Transpiler::new(id).transpile(&ast, &NoTypeInfo).unwrap();
            assert!(out.content.contains('1'), "{id}: {}", out.content);
        }
    }

    #[test]
    fn options_are_applied_per_backend() {
        let mut b = AstBuilder::new();
        let one = b.num("1");
        let decl = b.let_("itemCount", Some(one));
        let ast = b.finish(vec![decl]);
        let options = EngineOptions::new().with_backend(BackendId::Python, BackendOptions::new().with_uncamel_case(true));

        let python = Transpiler::new(BackendId::Python).with_options(&options);
        assert_eq!(python.transpile(&ast, &NoTypeInfo).unwrap().content, "item_count = 1");
        let php = Transpiler::new(BackendId::Php).with_options(&options);
        assert_eq!(php.transpile(&ast, &NoTypeInfo).unwrap().content, "$itemCount = 1;");
    }

    #[test]
    fn invalid_trees_are_rejected_before_printing() {
        let mut b = AstBuilder::new();
        let stmt = b.expr_stmt(NodeId(999));
        let ast = b.finish(vec![stmt]);
        let err = Transpiler::new(BackendId::Go).transpile(&ast, &NoTypeInfo).unwrap_err();
        assert!(matches!(err, TranspileError::InvalidTree(_)), "{err:?}");
    }
}
