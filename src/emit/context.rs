//! Per-run compilation context.
//!
//! Everything that is mutable during one transpilation run lives here and is threaded through the printer
//! explicitly: the type-query collaborator, the reassignment registry, the capture cache and declared aliases,
//! accumulated warnings and the current class/function scope. A fresh context is created for every run, so
//! concurrent runs never share state.

use std::collections::{HashMap, HashSet};

use polyglot_syntax::{NodeId, Span, TypeQuery};

use super::errors::{Warning, WarningKind};

/// Scope-qualified variable key: `(class, function, name)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarKey {
    pub class: Option<String>,
    pub function: Option<String>,
    pub name: String,
}

/// Enclosing class and function of the node being printed.
///
/// Arrow functions do not open a scope: a reassignment inside a lambda is attributed to the enclosing function.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    pub class: Option<String>,
    pub function: Option<String>,
}

impl Scope {
    pub fn function(name: impl Into<String>) -> Self {
        Self {
            class: None,
            function: Some(name.into()),
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self {
            class: Some(name.into()),
            function: None,
        }
    }

    /// Same class, new function.
    pub fn method(&self, name: impl Into<String>) -> Self {
        Self {
            class: self.class.clone(),
            function: Some(name.into()),
        }
    }
}

/// A variable read through an effectively-final alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    pub name: String,
    pub alias: String,
    /// The alias is new and must be declared before the capturing statement.
    pub declare: bool,
}

/// Alias already declared for a variable.
#[derive(Debug, Clone)]
struct DeclaredAlias {
    alias: String,
    /// Reassignment count of the variable when the alias was declared.
    generation: u32,
    /// Block path at the declaration; the alias is visible in this block and its descendants.
    blocks: Vec<u32>,
}

/// Mutable state of one transpilation run.
pub struct CompilationContext<'a> {
    types: &'a dyn TypeQuery,
    /// Append-only within a run.
    reassigned: HashSet<VarKey>,
    /// Number of reassignments seen per variable.
    generations: HashMap<VarKey, u32>,
    /// Closure id → variables captured through an alias.
    captures: HashMap<NodeId, Vec<Capture>>,
    aliases: HashMap<VarKey, DeclaredAlias>,
    /// Alias names taken per scope (`VarKey::name` holds the alias).
    alias_names: HashSet<VarKey>,
    blocks: Vec<u32>,
    next_block: u32,
    warnings: Vec<Warning>,
    scopes: Vec<Scope>,
    /// Nesting depth of object literals currently being printed.
    pub literal_depth: usize,
}

impl<'a> CompilationContext<'a> {
    pub fn new(types: &'a dyn TypeQuery) -> Self {
        Self {
            types,
            reassigned: HashSet::new(),
            generations: HashMap::new(),
            captures: HashMap::new(),
            aliases: HashMap::new(),
            alias_names: HashSet::new(),
            blocks: Vec::new(),
            next_block: 0,
            warnings: Vec::new(),
            scopes: Vec::new(),
            literal_depth: 0,
        }
    }

    pub fn types(&self) -> &'a dyn TypeQuery {
        self.types
    }

    // ---- Scope ----

    pub fn push_scope(&mut self, scope: Scope) {
        self.scopes.push(scope);
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    pub fn scope(&self) -> Scope {
        self.scopes.last().cloned().unwrap_or_default()
    }

    pub fn current_class(&self) -> Option<&str> {
        self.scopes.last().and_then(|s| s.class.as_deref())
    }

    pub fn current_function(&self) -> Option<&str> {
        self.scopes.last().and_then(|s| s.function.as_deref())
    }

    pub fn key_for(&self, name: &str) -> VarKey {
        VarKey {
            class: self.current_class().map(str::to_string),
            function: self.current_function().map(str::to_string),
            name: name.to_string(),
        }
    }

    // ---- Reassignment registry ----

    /// Record that `name` is written after its declaration in the current scope.
    pub fn mark_reassigned(&mut self, name: &str) {
        let key = self.key_for(name);
        *self.generations.entry(key.clone()).or_default() += 1;
        self.reassigned.insert(key);
    }

    pub fn is_reassigned(&self, name: &str) -> bool {
        self.reassigned.contains(&self.key_for(name))
    }

    // ---- Capture cache ----

    pub fn cached_captures(&self, closure: NodeId) -> Option<&[Capture]> {
        self.captures.get(&closure).map(Vec::as_slice)
    }

    pub fn cache_captures(&mut self, closure: NodeId, captures: Vec<Capture>) {
        self.captures.insert(closure, captures);
    }

    // ---- Declared aliases ----

    /// Enter a statement list. Aliases declared inside are not reused after [`Self::exit_block`].
    pub fn enter_block(&mut self) {
        self.next_block += 1;
        self.blocks.push(self.next_block);
    }

    pub fn exit_block(&mut self) {
        self.blocks.pop();
    }

    /// Alias through which `name` is read at this point.
    ///
    /// An alias declared earlier is reused while it is visible and `name` has not been reassigned since; otherwise a
    /// new alias is taken, starting from `base` and numbered on collision within the scope.
    pub fn capture_alias(&mut self, name: &str, base: &str) -> Capture {
        let key = self.key_for(name);
        let generation = self.generations.get(&key).copied().unwrap_or(0);
        if let Some(declared) = self.aliases.get(&key)
            && declared.generation == generation
            && self.blocks.starts_with(&declared.blocks)
        {
            return Capture {
                name: name.to_string(),
                alias: declared.alias.clone(),
                declare: false,
            };
        }
        let alias = self.fresh_alias(base);
        self.aliases.insert(
            key,
            DeclaredAlias {
                alias: alias.clone(),
                generation,
                blocks: self.blocks.clone(),
            },
        );
        Capture {
            name: name.to_string(),
            alias,
            declare: true,
        }
    }

    /// Reserve an alias name not yet used in the current scope: `base`, `base2`, `base3`, ...
    pub fn fresh_alias(&mut self, base: &str) -> String {
        let mut candidate = base.to_string();
        let mut n = 1;
        while self.alias_names.contains(&self.key_for(&candidate)) {
            n += 1;
            candidate = format!("{base}{n}");
        }
        let key = self.key_for(&candidate);
        self.alias_names.insert(key);
        candidate
    }

    // ---- Warnings ----

    pub fn warn(&mut self, kind: WarningKind, message: impl Into<String>, node: NodeId, span: Span) {
        let message = message.into();
        tracing::debug!(kind = kind.as_str(), %node, message = %message, "recorded warning");
        self.warnings.push(Warning {
            kind,
            message,
            node,
            span,
        });
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }
}

#[cfg(test)]
mod tests {
    use polyglot_syntax::NoTypeInfo;

    use super::*;

    #[test]
    fn registry_is_scope_qualified() {
        let mut ctx = CompilationContext::new(&NoTypeInfo);
        ctx.push_scope(Scope::class("Exchange").method("fetch"));
        ctx.mark_reassigned("y");
        assert!(ctx.is_reassigned("y"));
        ctx.pop_scope();

        ctx.push_scope(Scope::class("Exchange").method("parse"));
        assert!(!ctx.is_reassigned("y"));
        ctx.pop_scope();

        ctx.push_scope(Scope::function("fetch"));
        assert!(!ctx.is_reassigned("y"), "same method name outside the class is a different key");
    }

    #[test]
    fn aliases_are_reused_until_reassigned() {
        let mut ctx = CompilationContext::new(&NoTypeInfo);
        ctx.push_scope(Scope::function("main"));
        ctx.enter_block();
        ctx.mark_reassigned("y");

        let first = ctx.capture_alias("y", "finalY");
        assert_eq!((first.alias.as_str(), first.declare), ("finalY", true));
        let again = ctx.capture_alias("y", "finalY");
        assert_eq!((again.alias.as_str(), again.declare), ("finalY", false));

        ctx.mark_reassigned("y");
        let after = ctx.capture_alias("y", "finalY");
        assert_eq!((after.alias.as_str(), after.declare), ("finalY2", true));
    }

    #[test]
    fn aliases_declared_in_a_closed_block_are_not_reused() {
        let mut ctx = CompilationContext::new(&NoTypeInfo);
        ctx.push_scope(Scope::function("main"));
        ctx.enter_block();
        ctx.mark_reassigned("y");
        ctx.enter_block();
        assert!(ctx.capture_alias("y", "finalY").declare);
        ctx.exit_block();

        let outer = ctx.capture_alias("y", "finalY");
        assert_eq!((outer.alias.as_str(), outer.declare), ("finalY2", true));
        ctx.enter_block();
        let inner = ctx.capture_alias("y", "finalY");
        assert_eq!((inner.alias.as_str(), inner.declare), ("finalY2", false));
    }

    #[test]
    fn warnings_accumulate_and_drain() {
        let mut ctx = CompilationContext::new(&NoTypeInfo);
        ctx.warn(WarningKind::AmbiguousType, "x", NodeId(1), Span::default());
        assert_eq!(ctx.warnings().len(), 1);
        assert_eq!(ctx.take_warnings().len(), 1);
        assert!(ctx.warnings().is_empty());
    }
}
