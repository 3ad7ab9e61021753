//! Error and warning types for emission.
//!
//! Emission failures are either fatal ([`TranspileError`], aborts the file) or non-fatal ([`Warning`], collected and
//! returned next to the output).
//!
//! ## Notes
//! - Prefer actionable messages: say which construct is unsupported and for which backend.
//! - Spans are byte offsets into the original source; the CLI attaches the source text when rendering.

use std::fmt;

use miette::{Diagnostic, SourceSpan};
use polyglot_syntax::{AstError, NodeId, Span, SyntaxKind};
use thiserror::Error;

use crate::backend::BackendId;

/// Fatal emission error.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum TranspileError {
    /// No handler (default or override) can print this node for the active backend.
    #[error("{kind} is not supported by the {backend} backend")]
    #[diagnostic(code(polyglot::unsupported_construct))]
    UnsupportedConstruct {
        kind: SyntaxKind,
        backend: BackendId,
        node: NodeId,
        #[label("cannot be printed for {backend}")]
        span: SourceSpan,
        #[help]
        detail: Option<String>,
    },

    /// A node referenced a child that is not in the tree.
    #[error("node {0} is not part of the tree")]
    #[diagnostic(code(polyglot::dangling_node))]
    DanglingNode(NodeId),

    #[error("malformed syntax tree: {0}")]
    #[diagnostic(code(polyglot::invalid_tree))]
    InvalidTree(#[from] AstError),

    #[error("syntax tree has no root SourceFile")]
    #[diagnostic(code(polyglot::missing_root))]
    MissingRoot,
}

impl TranspileError {
    pub fn unsupported(kind: SyntaxKind, backend: BackendId, node: NodeId, span: Span, detail: Option<String>) -> Self {
        TranspileError::UnsupportedConstruct {
            kind,
            backend,
            node,
            span: to_source_span(span),
            detail,
        }
    }
}

pub type EmitResult<T> = Result<T, TranspileError>;

pub(crate) fn to_source_span(span: Span) -> SourceSpan {
    SourceSpan::new(span.start.into(), span.len())
}

// ============================================================================
// Warnings
// ============================================================================

/// Category of a non-fatal degradation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    /// No annotation or literal shape resolved the type; the default type was printed.
    AmbiguousType,
    /// An override's parameters could not be backfilled from the parent method.
    MalformedOverride,
    /// A call on a well-known namespace matched no built-in rule and was printed as written.
    UnrecognizedBuiltinCall,
}

impl WarningKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            WarningKind::AmbiguousType => "ambiguous-type",
            WarningKind::MalformedOverride => "malformed-override",
            WarningKind::UnrecognizedBuiltinCall => "unrecognized-builtin-call",
        }
    }
}

/// A non-fatal degradation attached to the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
    pub node: NodeId,
    pub span: Span,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}..{}: {}",
            self.kind.as_str(),
            self.span.start,
            self.span.end,
            self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_message_names_kind_and_backend() {
        let err = TranspileError::unsupported(
            SyntaxKind::Spread,
            BackendId::Java,
            NodeId(4),
            Span::new(10, 16),
            None,
        );
        assert_eq!(err.to_string(), "Spread is not supported by the java backend");
        assert_eq!(
            err.code().map(|c| c.to_string()).as_deref(),
            Some("polyglot::unsupported_construct")
        );
    }

    #[test]
    fn warning_display_includes_span() {
        let warning = Warning {
            kind: WarningKind::AmbiguousType,
            message: "defaulted to Object".into(),
            node: NodeId(1),
            span: Span::new(3, 9),
        };
        assert_eq!(warning.to_string(), "ambiguous-type at 3..9: defaulted to Object");
    }
}
