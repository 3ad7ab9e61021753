//! Async lowering.
//!
//! `await expr` is configuration only (`AWAIT_TOKEN` / `AWAIT_CLOSE`: a prefix keyword, a `.await` suffix or a
//! blocking `.join()`). Async *functions* on targets without native async become ordinary functions whose whole
//! body runs inside a future-producing closure:
//!
//! ```text
//! async fetch(x) {                 public CompletableFuture<Object> fetch(Object finalX) {
//!     x = x + 1;           ==>         return CompletableFuture.supplyAsync(() -> {
//!     return x;                            Object x = finalX;
//! }                                        x = Helpers.add(x, 1);
//!                                          return x;
//!                                      });
//!                                  }
//! ```
//!
//! Parameters reassigned inside the body are renamed in the signature and rebound inside the closure (see
//! [`Printer::print_parameters`]), so the closure only captures effectively-final values.

use polyglot_core::lang::tokens::Token;
use polyglot_syntax::{NodeId, SyntaxKind};

use crate::emit::Printer;

/// Pieces of a wrapped async body, each a list of raw lines.
#[derive(Debug, Clone, Default)]
pub struct AsyncBody<'s> {
    pub rebinds: &'s [String],
    pub prologue: &'s [String],
    /// Printed body statements, as `"\n"`-prefixed lines.
    pub printed: &'s str,
    pub epilogue: &'s [String],
}

impl Printer<'_> {
    /// Whether an async callable's body must be wrapped in the backend's future-producing closure.
    pub fn lowers_async(&self, is_async: bool) -> bool {
        is_async && !self.caps().native_async && !self.tok(Token::AsyncBodyOpen).is_empty()
    }

    /// Inner lines of a wrapped async body, for a callable opened at `indent`.
    pub fn wrap_async_body(&self, statements: &[NodeId], body: AsyncBody<'_>, indent: usize) -> String {
        let body_indent = indent + 2;
        let mut inner = self.lines(&[self.tok(Token::AsyncBodyOpen).to_string()], indent + 1);
        inner.push_str(&self.lines(body.rebinds, body_indent));
        inner.push_str(&self.lines(body.prologue, body_indent));
        inner.push_str(body.printed);
        let epilogue = self.tok(Token::AsyncBodyEpilogue);
        if !epilogue.is_empty() && !self.ends_with_return(statements) {
            inner.push_str(&self.lines(&[epilogue.to_string()], body_indent));
        }
        inner.push_str(&self.lines(body.epilogue, body_indent));
        inner.push_str(&self.lines(&[self.tok(Token::AsyncBodyClose).to_string()], indent + 1));
        inner
    }

    fn ends_with_return(&self, statements: &[NodeId]) -> bool {
        statements
            .last()
            .is_some_and(|&last| self.ast().tag(last) == Some(SyntaxKind::Return))
    }
}
