//! Closure-capture analysis.
//!
//! Targets such as Java only let a closure (an anonymous map subclass, a lambda) read locals that are effectively
//! final. A variable reassigned earlier in the same scope and then read inside an object literal or a lambda is
//! therefore captured through an alias: the reference is renamed in the printer's copy of the tree, and an immutable
//! alias declaration is printed just before the statement.
//!
//! ## Notes
//! - Detection is order-sensitive: only reassignments already printed (textual order) are known.
//! - An alias is declared once and reused by later captures in the same or a nested block, until the variable is
//!   reassigned again. A later alias of the same variable is numbered (`finalY2`).
//! - Names bound inside a lambda (its parameters and locals) are never aliased.
//! - Results are memoized per closure node. A second scan of the same node returns the cached captures, which
//!   matters because the first scan renamed the references it would otherwise look for.
//!
//! ## Examples
//! ```text
//! y = y + 1;                        y = Helpers.add(y, 1);
//! const x = {'a': y};      ==>      final Object finalY = y;
//!                                   Object x = new java.util.HashMap<String, Object>() {{ put("a", finalY); }};
//! ```

use polyglot_core::casing::capitalize;
use polyglot_core::lang::tokens::Token;
use polyglot_syntax::{NodeId, NodeKind};

use crate::emit::errors::EmitResult;
use crate::emit::{Capture, Printer};

/// Effectively-final alias of `name` (`y` → `finalY`).
pub fn alias_name(name: &str) -> String {
    format!("final{}", capitalize(name))
}

fn is_alias(name: &str) -> bool {
    name.strip_prefix("final")
        .and_then(|rest| rest.chars().next())
        .is_some_and(char::is_uppercase)
}

impl Printer<'_> {
    /// Alias declarations to print before `stmt`.
    pub fn capture_alias_lines(&mut self, stmt: NodeId) -> EmitResult<Vec<String>> {
        if !self.caps().requires_capture_immutability {
            return Ok(Vec::new());
        }
        let roots = match self.kind(stmt)? {
            NodeKind::VariableStatement { declarations, .. } => {
                let mut roots = Vec::new();
                for decl in declarations {
                    if let NodeKind::VariableDeclaration {
                        initializer: Some(init), ..
                    } = self.kind(decl)?
                    {
                        roots.push(init);
                    }
                }
                roots
            }
            NodeKind::ExpressionStatement { expression } => vec![expression],
            NodeKind::Return {
                expression: Some(expression),
            } => vec![expression],
            _ => return Ok(Vec::new()),
        };

        let mut closures = Vec::new();
        for root in roots {
            self.find_closures(root, &mut closures)?;
        }
        let mut declared: Vec<Capture> = Vec::new();
        for closure in closures {
            for capture in self.collect_captures(closure)? {
                if capture.declare && !declared.iter().any(|d| d.alias == capture.alias) {
                    declared.push(capture);
                }
            }
        }
        Ok(declared
            .iter()
            .map(|capture| {
                let alias = self.variable_name(&capture.alias);
                let original = self.variable_name(&capture.name);
                self.config()
                    .render(Token::CaptureAlias, &[("alias", &alias), ("name", &original)])
            })
            .collect())
    }

    /// Closure-like nodes under `id` that are not nested in another closure.
    fn find_closures(&self, id: NodeId, out: &mut Vec<NodeId>) -> EmitResult<()> {
        match self.kind(id)? {
            NodeKind::ObjectLiteral { .. } | NodeKind::ArrowFunction { .. } => out.push(id),
            NodeKind::Call { callee, args } | NodeKind::New { callee, args } => {
                self.find_closures(callee, out)?;
                for arg in args {
                    self.find_closures(arg, out)?;
                }
            }
            NodeKind::Binary { left, right, .. } => {
                self.find_closures(left, out)?;
                self.find_closures(right, out)?;
            }
            NodeKind::ArrayLiteral { elements } => {
                for element in elements {
                    self.find_closures(element, out)?;
                }
            }
            NodeKind::Conditional {
                condition,
                when_true,
                when_false,
            } => {
                self.find_closures(condition, out)?;
                self.find_closures(when_true, out)?;
                self.find_closures(when_false, out)?;
            }
            NodeKind::Await { expression }
            | NodeKind::Parenthesized { expression }
            | NodeKind::As { expression, .. }
            | NodeKind::Spread { expression } => self.find_closures(expression, out)?,
            _ => {}
        }
        Ok(())
    }

    /// Names captured by `closure`, renaming each captured reference to its alias.
    ///
    /// Memoized by node id: repeated calls return the same names and rename nothing further.
    pub fn collect_captured_vars(&mut self, closure: NodeId) -> EmitResult<Vec<String>> {
        Ok(self.collect_captures(closure)?.into_iter().map(|c| c.name).collect())
    }

    fn collect_captures(&mut self, closure: NodeId) -> EmitResult<Vec<Capture>> {
        if let Some(cached) = self.ctx.cached_captures(closure) {
            return Ok(cached.to_vec());
        }
        let mut captures = Vec::new();
        self.capture_walk(closure, &[], &mut captures)?;
        if !captures.is_empty() {
            let aliases: Vec<&str> = captures.iter().map(|c| c.alias.as_str()).collect();
            tracing::debug!(closure = %closure, aliases = ?aliases, "synthesized capture aliases");
        }
        self.ctx.cache_captures(closure, captures.clone());
        Ok(captures)
    }

    fn capture_walk(&mut self, id: NodeId, bound: &[String], captures: &mut Vec<Capture>) -> EmitResult<()> {
        match self.kind(id)? {
            NodeKind::Identifier { name } => {
                if !is_alias(&name) && !bound.contains(&name) && self.ctx.is_reassigned(&name) {
                    let alias = match captures.iter().find(|c| c.name == name) {
                        Some(capture) => capture.alias.clone(),
                        None => {
                            let capture = self.ctx.capture_alias(&name, &alias_name(&name));
                            let alias = capture.alias.clone();
                            captures.push(capture);
                            alias
                        }
                    };
                    self.ast_mut().rename_identifier(id, alias);
                }
            }
            NodeKind::ObjectLiteral { properties } => {
                for property in properties {
                    self.capture_walk(property, bound, captures)?;
                }
            }
            NodeKind::PropertyAssignment { value, .. } => self.capture_walk(value, bound, captures)?,
            NodeKind::ArrayLiteral { elements } => {
                for element in elements {
                    self.capture_walk(element, bound, captures)?;
                }
            }
            NodeKind::ArrowFunction { params, body, .. } => {
                let mut inner = bound.to_vec();
                for param in params {
                    if let NodeKind::Parameter { name, .. } = self.kind(param)? {
                        inner.push(name);
                    }
                }
                self.declared_names(body, &mut inner)?;
                self.capture_walk(body, &inner, captures)?;
            }
            NodeKind::Call { callee, args } | NodeKind::New { callee, args } => {
                if let NodeKind::PropertyAccess { object, .. } | NodeKind::ElementAccess { object, .. } =
                    self.kind(callee)?
                {
                    self.capture_walk(object, bound, captures)?;
                }
                for arg in args {
                    self.capture_walk(arg, bound, captures)?;
                }
            }
            NodeKind::Binary { left, right, .. } => {
                self.capture_walk(left, bound, captures)?;
                self.capture_walk(right, bound, captures)?;
            }
            NodeKind::PropertyAccess { object, .. } => self.capture_walk(object, bound, captures)?,
            NodeKind::ElementAccess { object, index } => {
                self.capture_walk(object, bound, captures)?;
                self.capture_walk(index, bound, captures)?;
            }
            NodeKind::Conditional {
                condition,
                when_true,
                when_false,
            } => {
                self.capture_walk(condition, bound, captures)?;
                self.capture_walk(when_true, bound, captures)?;
                self.capture_walk(when_false, bound, captures)?;
            }
            NodeKind::PrefixUnary { operand, .. } => self.capture_walk(operand, bound, captures)?,
            NodeKind::Await { expression }
            | NodeKind::Parenthesized { expression }
            | NodeKind::TypeOf { expression }
            | NodeKind::As { expression, .. }
            | NodeKind::Spread { expression }
            | NodeKind::ExpressionStatement { expression }
            | NodeKind::Throw { expression }
            | NodeKind::Return {
                expression: Some(expression),
            } => self.capture_walk(expression, bound, captures)?,

            // statements of a block-bodied lambda
            NodeKind::Block { statements } => {
                for stmt in statements {
                    self.capture_walk(stmt, bound, captures)?;
                }
            }
            NodeKind::VariableStatement { declarations, .. } => {
                for decl in declarations {
                    self.capture_walk(decl, bound, captures)?;
                }
            }
            NodeKind::VariableDeclaration {
                initializer: Some(init), ..
            } => self.capture_walk(init, bound, captures)?,
            NodeKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.capture_walk(condition, bound, captures)?;
                self.capture_walk(then_branch, bound, captures)?;
                if let Some(else_branch) = else_branch {
                    self.capture_walk(else_branch, bound, captures)?;
                }
            }
            NodeKind::While { condition, body } => {
                self.capture_walk(condition, bound, captures)?;
                self.capture_walk(body, bound, captures)?;
            }
            NodeKind::For {
                initializer,
                condition,
                incrementor,
                body,
            } => {
                for part in [initializer, condition, incrementor].into_iter().flatten() {
                    self.capture_walk(part, bound, captures)?;
                }
                self.capture_walk(body, bound, captures)?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Variables declared by the statements under `id`, nested lambdas excluded.
    fn declared_names(&self, id: NodeId, out: &mut Vec<String>) -> EmitResult<()> {
        match self.kind(id)? {
            NodeKind::Block { statements } => {
                for stmt in statements {
                    self.declared_names(stmt, out)?;
                }
            }
            NodeKind::VariableStatement { declarations, .. } => {
                for decl in declarations {
                    if let NodeKind::VariableDeclaration { name, .. } = self.kind(decl)? {
                        out.push(name);
                    }
                }
            }
            NodeKind::If {
                then_branch,
                else_branch,
                ..
            } => {
                self.declared_names(then_branch, out)?;
                if let Some(else_branch) = else_branch {
                    self.declared_names(else_branch, out)?;
                }
            }
            NodeKind::While { body, .. } => self.declared_names(body, out)?,
            NodeKind::For { initializer, body, .. } => {
                if let Some(initializer) = initializer {
                    self.declared_names(initializer, out)?;
                }
                self.declared_names(body, out)?;
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use polyglot_core::lang::operators::BinaryOp;
    use polyglot_syntax::ast::Modifiers;
    use polyglot_syntax::builder::AstBuilder;
    use polyglot_syntax::{Ast, NoTypeInfo};

    use super::*;
    use crate::backend::{BackendId, BackendSpec};
    use crate::emit::Scope;

    #[test]
    fn alias_names() {
        assert_eq!(alias_name("y"), "finalY");
        assert!(is_alias("finalY"));
        assert!(!is_alias("finally"));
        assert!(!is_alias("y"));
    }

    #[test]
    fn collection_is_idempotent() {
        let mut b = AstBuilder::new();
        let y = b.ident("y");
        let z = b.ident("z");
        let sum = b.binary(BinaryOp::Plus, y, z);
        let obj = b.object(vec![("a", sum)]);
        let stmt = b.const_("x", Some(obj));
        let ast = b.finish(vec![stmt]);
        let spec = BackendSpec::for_id(BackendId::Java);
        let mut printer = Printer::new(ast, &spec, &NoTypeInfo);
        printer.ctx.push_scope(Scope::function("main"));
        printer.ctx.mark_reassigned("y");

        let first = printer.collect_captured_vars(obj).unwrap();
        let second = printer.collect_captured_vars(obj).unwrap();
        assert_eq!(first, vec!["y".to_string()]);
        assert_eq!(first, second);
        assert_eq!(printer.ast().identifier_name(y), Some("finalY"));
        assert_eq!(printer.ast().identifier_name(z), Some("z"));

        let lines = printer.capture_alias_lines(stmt).unwrap();
        let again = printer.capture_alias_lines(stmt).unwrap();
        assert_eq!(lines, vec!["final Object finalY = y;".to_string()]);
        assert_eq!(lines, again);
    }

    #[test]
    fn backends_without_the_rule_capture_nothing() {
        let mut b = AstBuilder::new();
        let y = b.ident("y");
        let obj = b.object(vec![("a", y)]);
        let stmt = b.const_("x", Some(obj));
        let ast = b.finish(vec![stmt]);
        let spec = BackendSpec::for_id(BackendId::Python);
        let mut printer = Printer::new(ast, &spec, &NoTypeInfo);
        printer.ctx.mark_reassigned("y");
        assert!(printer.capture_alias_lines(stmt).unwrap().is_empty());
        assert_eq!(printer.ast().identifier_name(y), Some("y"));
    }

    /// `name = name + 1;`
    fn bump(b: &mut AstBuilder, name: &str) -> NodeId {
        let target = b.ident(name);
        let read = b.ident(name);
        let one = b.num("1");
        let sum = b.binary(BinaryOp::Plus, read, one);
        b.assign_stmt(target, sum)
    }

    /// `function main() { let y = 0; y = y + 1; <rest> }`
    fn in_main(mut b: AstBuilder, prefix: (NodeId, NodeId), rest: Vec<NodeId>) -> Ast {
        let mut statements = vec![prefix.0, prefix.1];
        statements.extend(rest);
        let main = b.function("main", vec![], None, statements, Modifiers::default());
        b.finish(vec![main])
    }

    fn java(ast: Ast) -> String {
        let spec = BackendSpec::for_id(BackendId::Java);
        Printer::new(ast, &spec, &NoTypeInfo).print_file().unwrap().0
    }

    fn reassigned_y(b: &mut AstBuilder) -> (NodeId, NodeId) {
        let zero = b.num("0");
        let decl = b.let_("y", Some(zero));
        (decl, bump(b, "y"))
    }

    #[test]
    fn block_lambda_reads_reassigned_variable_through_alias() {
        let mut b = AstBuilder::new();
        let prefix = reassigned_y(&mut b);
        let y = b.ident("y");
        let ret = b.ret(Some(y));
        let body = b.block(vec![ret]);
        let arrow = b.arrow(vec![], body, Modifiers::default());
        let f = b.const_("f", Some(arrow));
        let out = java(in_main(b, prefix, vec![f]));

        assert_eq!(out.matches("final Object finalY = y;").count(), 1, "{out}");
        let alias = out.find("final Object finalY = y;").unwrap();
        let lambda = out.find(" f = ").unwrap();
        assert!(alias < lambda, "{out}");
        assert!(out.contains("return finalY;"), "{out}");
        assert!(!out.contains("return y;"), "{out}");
    }

    #[test]
    fn block_lambda_locals_are_not_aliased() {
        let mut b = AstBuilder::new();
        let prefix = reassigned_y(&mut b);
        let y = b.ident("y");
        let local = b.let_("z", Some(y));
        let z = b.ident("z");
        let ret = b.ret(Some(z));
        let body = b.block(vec![local, ret]);
        let arrow = b.arrow(vec![], body, Modifiers::default());
        let f = b.const_("f", Some(arrow));
        let out = java(in_main(b, prefix, vec![f]));

        assert!(out.contains("Object z = finalY;"), "{out}");
        assert!(out.contains("return z;"), "{out}");
        assert!(!out.contains("finalZ"), "{out}");
    }

    #[test]
    fn repeated_capture_reuses_the_alias() {
        let mut b = AstBuilder::new();
        let prefix = reassigned_y(&mut b);
        let y1 = b.ident("y");
        let first = b.object(vec![("a", y1)]);
        let a = b.const_("a", Some(first));
        let y2 = b.ident("y");
        let second = b.object(vec![("c", y2)]);
        let c = b.const_("c", Some(second));
        let out = java(in_main(b, prefix, vec![a, c]));

        assert_eq!(out.matches("final Object finalY = y;").count(), 1, "{out}");
        assert!(out.contains("put(\"a\", finalY)"), "{out}");
        assert!(out.contains("put(\"c\", finalY)"), "{out}");
    }

    #[test]
    fn capture_after_reassignment_takes_a_fresh_alias() {
        let mut b = AstBuilder::new();
        let prefix = reassigned_y(&mut b);
        let y1 = b.ident("y");
        let first = b.object(vec![("a", y1)]);
        let a = b.const_("a", Some(first));
        let again = bump(&mut b, "y");
        let y2 = b.ident("y");
        let second = b.object(vec![("c", y2)]);
        let c = b.const_("c", Some(second));
        let out = java(in_main(b, prefix, vec![a, again, c]));

        assert_eq!(out.matches("final Object finalY = y;").count(), 1, "{out}");
        assert_eq!(out.matches("final Object finalY2 = y;").count(), 1, "{out}");
        assert!(out.contains("put(\"a\", finalY)"), "{out}");
        assert!(out.contains("put(\"c\", finalY2)"), "{out}");
        let first_literal = out.find("put(\"a\", finalY)").unwrap();
        assert!(first_literal < out.find("finalY2 = y").unwrap(), "{out}");
    }
}
