//! Provide the shared, pure vocabulary of the polyglot transpiler.
//!
//! This crate is intentionally small and dependency-light. It holds the closed sets every other layer agrees on:
//! - source operators and their spellings ([`lang::operators`]),
//! - the configuration token names each backend fills in ([`lang::tokens`]),
//! - the exhaustive registry of well-known built-in calls ([`lang::builtins`]),
//! - the runtime-helper namespace generated code calls into ([`lang::helpers`]).
//!
//! ## Notes
//!
//! - This is a “vocabulary” crate: **no IO**, no global state, and no engine-specific types.
//! - Identifier casing helpers live in [`casing`] so backends and tests share one definition.

pub mod casing;
pub mod lang;
