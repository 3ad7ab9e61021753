//! Target backends.
//!
//! A backend is data plus a handful of functions: a [`BackendConfig`] (tokens, capabilities, type table), a map of
//! handler overrides for the node kinds configuration cannot express, and a printer for recognized built-in calls.
//! There is no backend inheritance; variants are produced by merging configuration.
//!
//! ## Modules
//!
//! - `config` - the Configuration Table and template rendering
//! - `java`, `rust`, `csharp`, `go`, `php`, `python` - one module per target language

pub mod config;
pub mod csharp;
pub mod go;
pub mod java;
pub mod php;
pub mod python;
pub mod rust;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use polyglot_core::lang::builtins::BuiltinCall;
use polyglot_syntax::{NodeId, SyntaxKind};

pub use config::{BackendConfig, Capabilities, TypePosition};

use crate::config::BackendOptions;
use crate::emit::Printer;
use crate::emit::errors::EmitResult;

/// Supported target languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, clap::ValueEnum)]
pub enum BackendId {
    Java,
    Rust,
    #[value(name = "csharp")]
    CSharp,
    Go,
    Php,
    Python,
}

/// All backends, in a stable order.
pub const ALL_BACKENDS: &[BackendId] = &[
    BackendId::Java,
    BackendId::Rust,
    BackendId::CSharp,
    BackendId::Go,
    BackendId::Php,
    BackendId::Python,
];

impl BackendId {
    pub const fn as_str(self) -> &'static str {
        match self {
            BackendId::Java => "java",
            BackendId::Rust => "rust",
            BackendId::CSharp => "csharp",
            BackendId::Go => "go",
            BackendId::Php => "php",
            BackendId::Python => "python",
        }
    }

    /// Conventional file extension of generated sources.
    pub const fn extension(self) -> &'static str {
        match self {
            BackendId::Java => "java",
            BackendId::Rust => "rs",
            BackendId::CSharp => "cs",
            BackendId::Go => "go",
            BackendId::Php => "php",
            BackendId::Python => "py",
        }
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unknown backend name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown backend `{0}` (expected one of: java, rust, csharp, go, php, python)")]
pub struct UnknownBackend(pub String);

impl FromStr for BackendId {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_BACKENDS
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownBackend(s.to_string()))
    }
}

/// Handler override for one node kind.
///
/// Returns `Ok(None)` when it cannot classify the node; the dispatcher then uses the default handler.
pub type Handler = fn(&mut Printer<'_>, NodeId, usize) -> EmitResult<Option<String>>;

/// Printed operands of a recognized built-in call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltinArgs<'a> {
    /// Printed receiver for member calls (`arr` in `arr.push(x)`).
    pub receiver: Option<&'a str>,
    pub args: &'a [String],
}

impl BuiltinArgs<'_> {
    /// Printed argument `i`, or the empty string.
    pub fn arg(&self, i: usize) -> &str {
        self.args.get(i).map(String::as_str).unwrap_or("")
    }

    pub fn receiver(&self) -> &str {
        self.receiver.unwrap_or("")
    }

    pub fn joined(&self) -> String {
        self.args.join(", ")
    }
}

/// Rewrites a recognized built-in call, or returns `None` to print it as written.
pub type BuiltinPrinter = fn(&BackendConfig, BuiltinCall, &BuiltinArgs<'_>) -> Option<String>;

/// A complete backend: configuration, handler overrides and built-in printer.
#[derive(Clone)]
pub struct BackendSpec {
    pub config: BackendConfig,
    handlers: HashMap<SyntaxKind, Handler>,
    builtins: BuiltinPrinter,
}

impl fmt::Debug for BackendSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut overridden: Vec<_> = self.handlers.keys().collect();
        overridden.sort();
        f.debug_struct("BackendSpec")
            .field("id", &self.config.id)
            .field("overrides", &overridden)
            .finish()
    }
}

impl BackendSpec {
    pub fn new(config: BackendConfig, builtins: BuiltinPrinter) -> Self {
        Self {
            config,
            handlers: HashMap::new(),
            builtins,
        }
    }

    /// Register a handler override for `kind`, replacing any earlier one.
    pub fn with_handler(mut self, kind: SyntaxKind, handler: Handler) -> Self {
        self.handlers.insert(kind, handler);
        self
    }

    pub fn handler(&self, kind: SyntaxKind) -> Option<Handler> {
        self.handlers.get(&kind).copied()
    }

    pub fn id(&self) -> BackendId {
        self.config.id
    }

    pub fn print_builtin(&self, call: BuiltinCall, args: &BuiltinArgs<'_>) -> Option<String> {
        (self.builtins)(&self.config, call, args)
    }

    /// Default spec for `id`.
    pub fn for_id(id: BackendId) -> Self {
        match id {
            BackendId::Java => java::backend(),
            BackendId::Rust => rust::backend(),
            BackendId::CSharp => csharp::backend(),
            BackendId::Go => go::backend(),
            BackendId::Php => php::backend(),
            BackendId::Python => python::backend(),
        }
    }

    /// Merge user options over this spec's configuration.
    pub fn with_options(mut self, options: &BackendOptions) -> Self {
        self.config = self.config.with_options(options);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_parse_and_print() {
        for &id in ALL_BACKENDS {
            assert_eq!(id.as_str().parse::<BackendId>(), Ok(id));
            assert_eq!(BackendSpec::for_id(id).id(), id);
        }
        assert!("cobol".parse::<BackendId>().is_err());
    }

    #[test]
    fn handler_overrides_keep_kind_association() {
        let spec = BackendSpec::for_id(BackendId::Rust);
        assert!(spec.handler(SyntaxKind::ClassDeclaration).is_some());
        assert!(spec.handler(SyntaxKind::Spread).is_none());
    }
}
