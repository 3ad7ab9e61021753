#![forbid(unsafe_code)]
//! Polyglot: a multi-backend transpiler
//!
//! Takes the syntax tree of a TypeScript-like program (built by an external parser and type checker) and prints it
//! as Java, Rust, C#, Go, PHP or Python source. One generic printer is parameterized by per-backend configuration and
//! a small set of handler overrides.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **Generated code**: Backends emit `.unwrap()`-like calls as *string literals* in generated sources. These are
//!   output strings, not method calls in the transpiler.
//!
//! ## Modules
//!
//! - `transpiler` - the [`Transpiler`] entry point
//! - `emit` - the node-dispatch printer
//! - `passes` - type resolution, capture analysis, default emulation, async lowering, override backfill
//! - `backend` - the six target backends and their Configuration Table
//! - `config` - user-facing options
//! - `cli` - the `polyglot` command-line driver

pub mod backend;
pub mod cli;
pub mod config;
pub mod emit;
pub mod passes;
pub mod transpiler;

pub use backend::{BackendConfig, BackendId, BackendSpec};
pub use config::{BackendOptions, EngineOptions};
pub use emit::{TranspileError, Warning, WarningKind};
pub use transpiler::{TranspileOutput, Transpiler};
