//! Input contract of the polyglot transpiler: the arena AST and the type-query interface.
//!
//! The source parser and type checker are external collaborators. They hand the engine a fully-built [`ast::Ast`]
//! per source file plus an implementation of [`types::TypeQuery`]. This crate only defines those shapes, a
//! programmatic [`builder::AstBuilder`], and serde support so bundles can be exchanged as JSON.
//!
//! ## Notes
//! - Node identity is the arena index ([`ast::NodeId`]), assigned once at construction and never derived from text.
//! - Operator ids come from `polyglot_core::lang::operators`.
//!
//! ## Examples
//! ```rust
//! use polyglot_syntax::builder::AstBuilder;
//!
//! let mut b = AstBuilder::new();
//! let one = b.num("1");
//! let decl = b.let_("x", Some(one));
//! let ast = b.finish(vec![decl]);
//! assert!(ast.root().is_some());
//! ```

pub mod ast;
pub mod builder;
pub mod types;

pub use ast::{Ast, AstError, Node, NodeId, NodeKind, Span, SyntaxKind};
pub use types::{NoTypeInfo, TypeQuery, TypeTable};
