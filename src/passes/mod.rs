//! Semantic passes.
//!
//! Passes are not separate tree walks: each one is a set of `Printer` methods that the handlers call while printing,
//! so they observe the tree in the same left-to-right order the output is produced.
//!
//! ## Modules
//!
//! - `types` - type resolution: annotation mapping, literal-shape inference and numeric promotion
//! - `captures` - closure-capture analysis and effectively-final aliases
//! - `defaults` - parameter lists and default-parameter emulation
//! - `async_lowering` - wrapping async bodies for targets without native async functions
//! - `overrides` - parameter/return type backfill for overriding methods

pub mod async_lowering;
pub mod captures;
pub mod defaults;
pub mod overrides;
pub mod types;

pub use captures::alias_name;
pub use defaults::ParameterList;
pub use overrides::OverrideDescriptor;
pub use types::{integral_value, is_long_literal};
