//! Registry-first vocabularies shared by the syntax crate and the engine.
//!
//! ## See also
//! - [`operators`] for source operator ids
//! - [`tokens`] for configuration token names
//! - [`builtins`] for recognized built-in calls
//! - [`helpers`] for the runtime-helper namespace

pub mod builtins;
pub mod helpers;
pub mod operators;
pub mod tokens;
