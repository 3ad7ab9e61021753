//! Operator lowering: binary and unary operators, assignments and conditions.
//!
//! ## Notes
//! - Under `requires_call_expression_cast` an operator prints as its helper wrapper (`Helpers.add(a, b)`) unless
//!   both operands are literals or both are known numbers. `!=` and `!==` share one wrapper, so they always lower to
//!   the same call shape.
//! - Conditions go through [`Printer::print_condition`]; on targets without truthy values it descends `&&`, `||`,
//!   `!` and parentheses and wraps the leaves in the falsy helper.

use polyglot_core::lang::operators::{BinaryOp, OperatorCategory, PrefixOp};
use polyglot_core::lang::tokens::Token;
use polyglot_syntax::{NodeId, NodeKind, SyntaxKind};

use crate::emit::Printer;
use crate::emit::errors::EmitResult;

impl Printer<'_> {
    pub(crate) fn print_binary(&mut self, op: BinaryOp, left: NodeId, right: NodeId, indent: usize) -> EmitResult<String> {
        if op.is_assignment() {
            return self.print_assignment(op, left, right, indent);
        }
        if op.is_equality()
            && let Some(check) = self.print_typeof_check(op, left, right, indent)?
        {
            return Ok(check);
        }
        let l = self.print(left, indent)?;
        let r = self.print(right, indent)?;
        match op {
            BinaryOp::In => {
                let (open, close) = (self.tok(Token::InWrapperOpen), self.tok(Token::InWrapperClose));
                if open.is_empty() {
                    Ok(format!("{} {} {}", l, self.tok(Token::In), r))
                } else {
                    Ok(format!("{open}{r}, {l}{close}"))
                }
            }
            BinaryOp::InstanceOf => Ok(format!(
                "{}{}{}{}{}",
                self.tok(Token::InstanceOfOpen),
                l,
                self.tok(Token::InstanceOf),
                r,
                self.tok(Token::InstanceOfClose)
            )),
            BinaryOp::And | BinaryOp::Or => Ok(format!("{} {} {}", l, self.tok(Token::for_binary(op)), r)),
            _ => {
                let concat = self.tok(Token::StringConcat);
                if op == BinaryOp::Plus && !concat.is_empty() && (self.is_stringy(left) || self.is_stringy(right)) {
                    return Ok(format!("{l} {concat} {r}"));
                }
                if let Some(wrapped) = self.wrap_operator(op, left, right, &l, &r) {
                    return Ok(wrapped);
                }
                Ok(format!("{} {} {}", l, self.tok(Token::for_binary(op)), r))
            }
        }
    }

    /// Helper-call form of `l op r`, when the backend requires it for these operands.
    fn wrap_operator(&self, op: BinaryOp, left: NodeId, right: NodeId, l: &str, r: &str) -> Option<String> {
        if !self.caps().requires_call_expression_cast {
            return None;
        }
        let (open, close) = Token::wrapper_for(op)?;
        let (open, close) = (self.tok(open), self.tok(close));
        if open.is_empty() {
            return None;
        }
        let both_literal = self.is_literal(left) && self.is_literal(right);
        let both_numeric = self.types().is_numeric(left) && self.types().is_numeric(right);
        if both_literal || both_numeric {
            return None;
        }
        Some(format!("{open}{l}, {r}{close}"))
    }

    fn is_literal(&self, id: NodeId) -> bool {
        matches!(
            self.ast().tag(id),
            Some(
                SyntaxKind::NumericLiteral
                    | SyntaxKind::StringLiteral
                    | SyntaxKind::BooleanLiteral
                    | SyntaxKind::NullLiteral
            )
        )
    }

    fn is_stringy(&self, id: NodeId) -> bool {
        self.ast().tag(id) == Some(SyntaxKind::StringLiteral) || self.types().is_string(id)
    }

    /// `typeof x === "string"` through the backend's type-check templates.
    fn print_typeof_check(
        &mut self,
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
        indent: usize,
    ) -> EmitResult<Option<String>> {
        let (subject, type_name) = match (self.kind(left)?, self.kind(right)?) {
            (NodeKind::TypeOf { expression }, NodeKind::StringLiteral { value })
            | (NodeKind::StringLiteral { value }, NodeKind::TypeOf { expression }) => (expression, value),
            _ => return Ok(None),
        };
        let Some(template) = self.config().typeof_checks.get(&type_name) else {
            return Ok(None);
        };
        let expr = self.print(subject, indent)?;
        let check = crate::backend::config::render_template(template, &[("expr", &expr)]);
        if op.is_negated_equality() {
            Ok(Some(format!("{}({})", self.tok(Token::Not), check)))
        } else {
            Ok(Some(check))
        }
    }

    // ========================================================================
    // Assignment
    // ========================================================================

    fn print_assignment(&mut self, op: BinaryOp, left: NodeId, right: NodeId, indent: usize) -> EmitResult<String> {
        self.mark_assignment_target(left);
        let value = self.print(right, indent)?;

        if let NodeKind::ElementAccess { object, index } = self.kind(left)? {
            if self.caps().element_set_lowering && !self.tok(Token::ElementSetOpen).is_empty() {
                return self.print_element_set(op, left, &value, indent);
            }
            let container = self.print(object, indent)?;
            let key = self.print(index, indent)?;
            let cast_open = self.tok(Token::ElementAssignCastOpen);
            let target = if cast_open.is_empty() {
                format!("{container}[{key}]")
            } else {
                format!("{}{}{}[{}]", cast_open, container, self.tok(Token::ElementAssignCastClose), key)
            };
            let current = self.element_get(&container, &key);
            return Ok(self.assignment_text(op, &target, &current, &value));
        }

        let target = self.print(left, indent)?;
        Ok(self.assignment_text(op, &target, &target, &value))
    }

    /// `target op value`, or `target = helper(current, value)` for compound operators under call casts.
    fn assignment_text(&self, op: BinaryOp, target: &str, current: &str, value: &str) -> String {
        if self.caps().requires_call_expression_cast
            && let Some(base) = op.compound_base()
            && let Some((open, close)) = Token::wrapper_for(base)
            && !self.tok(open).is_empty()
        {
            return format!(
                "{} {} {}{}, {}{}",
                target,
                self.tok(Token::Assign),
                self.tok(open),
                current,
                value,
                self.tok(close)
            );
        }
        format!("{} {} {}", target, self.tok(Token::for_binary(op)), value)
    }

    /// `a[b][c] = d` as `set(get(a, b), c, d)`.
    fn print_element_set(&mut self, op: BinaryOp, target: NodeId, value: &str, indent: usize) -> EmitResult<String> {
        let mut keys = Vec::new();
        let mut base = target;
        while let NodeKind::ElementAccess { object, index } = self.kind(base)? {
            keys.push(index);
            base = object;
        }
        keys.reverse();
        let mut container = self.print(base, indent)?;
        let Some((&last, path)) = keys.split_last() else {
            return Err(self.unsupported(target, Some("element assignment without an index".into())));
        };
        for &key in path {
            let key = self.print(key, indent)?;
            container = self.element_get(&container, &key);
        }
        let last = self.print(last, indent)?;
        let value = match op.compound_base().and_then(Token::wrapper_for) {
            Some((open, close)) if !self.tok(open).is_empty() => {
                let current = self.element_get(&container, &last);
                format!("{}{}, {}{}", self.tok(open), current, value, self.tok(close))
            }
            _ => value.to_string(),
        };
        Ok(format!(
            "{}{}, {}, {}{}",
            self.tok(Token::ElementSetOpen),
            container,
            last,
            value,
            self.tok(Token::ElementSetClose)
        ))
    }

    // ========================================================================
    // Unary
    // ========================================================================

    pub(crate) fn print_prefix(&mut self, op: PrefixOp, operand: NodeId, indent: usize) -> EmitResult<String> {
        match op {
            PrefixOp::Not => {
                let inner = self.print_condition(operand, indent)?;
                Ok(format!("{}{}", self.tok(Token::Not), inner))
            }
            PrefixOp::Negate => {
                let inner = self.print(operand, indent)?;
                let open = self.tok(Token::NegWrapperOpen);
                if self.caps().requires_call_expression_cast && !open.is_empty() && !self.is_literal(operand) {
                    Ok(format!("{}{}{}", open, inner, self.tok(Token::NegWrapperClose)))
                } else {
                    Ok(format!("-{inner}"))
                }
            }
            PrefixOp::Plus => Ok(format!("+{}", self.print(operand, indent)?)),
            PrefixOp::Increment => self.print_update(operand, Token::Increment, true, indent),
            PrefixOp::Decrement => self.print_update(operand, Token::Decrement, true, indent),
        }
    }

    // ========================================================================
    // Conditions
    // ========================================================================

    /// Print an expression used as a condition.
    pub fn print_condition(&mut self, id: NodeId, indent: usize) -> EmitResult<String> {
        if self.caps().supports_truthy_values {
            return self.print(id, indent);
        }
        match self.kind(id)? {
            NodeKind::Binary {
                op: op @ (BinaryOp::And | BinaryOp::Or),
                left,
                right,
            } => {
                let l = self.print_condition(left, indent)?;
                let r = self.print_condition(right, indent)?;
                Ok(format!("{} {} {}", l, self.tok(Token::for_binary(op)), r))
            }
            NodeKind::PrefixUnary {
                op: PrefixOp::Not,
                operand,
            } => {
                let inner = self.print_condition(operand, indent)?;
                Ok(format!("{}{}", self.tok(Token::Not), inner))
            }
            NodeKind::Parenthesized { expression } => Ok(format!("({})", self.print_condition(expression, indent)?)),
            NodeKind::Binary { op, .. }
                if matches!(
                    op.category(),
                    OperatorCategory::Equality | OperatorCategory::Relational | OperatorCategory::Membership
                ) =>
            {
                self.print(id, indent)
            }
            NodeKind::BooleanLiteral { .. } => self.print(id, indent),
            _ if self.types().is_boolean(id) => self.print(id, indent),
            _ => {
                let inner = self.print(id, indent)?;
                let open = self.tok(Token::FalsyWrapperOpen);
                if open.is_empty() {
                    Ok(inner)
                } else {
                    Ok(format!("{}{}{}", open, inner, self.tok(Token::FalsyWrapperClose)))
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use polyglot_core::lang::operators::{BinaryOp, PrefixOp};
    use polyglot_syntax::builder::AstBuilder;
    use polyglot_syntax::types::{TypeCategory, TypeInfo};
    use polyglot_syntax::{Ast, NoTypeInfo, TypeQuery, TypeTable};

    use crate::backend::{BackendId, BackendSpec};
    use crate::emit::Printer;

    fn print_with(ast: Ast, id: BackendId, types: &dyn TypeQuery) -> String {
        let spec = BackendSpec::for_id(id);
        Printer::new(ast, &spec, types).print_file().unwrap().0
    }

    fn print(ast: Ast, id: BackendId) -> String {
        print_with(ast, id, &NoTypeInfo)
    }

    fn binary_stmt(op: BinaryOp) -> Ast {
        let mut b = AstBuilder::new();
        let a = b.ident("a");
        let c = b.ident("b");
        let expr = b.binary(op, a, c);
        let stmt = b.expr_stmt(expr);
        b.finish(vec![stmt])
    }

    #[test]
    fn inequalities_lower_to_one_helper_shape() {
        let loose = print(binary_stmt(BinaryOp::NotEquals), BackendId::Java);
        let strict = print(binary_stmt(BinaryOp::StrictNotEquals), BackendId::Java);
        assert_eq!(loose, "!Helpers.isEqual(a, b);");
        assert_eq!(loose, strict);
    }

    #[test]
    fn literal_operands_stay_native() {
        let mut b = AstBuilder::new();
        let one = b.num("1");
        let two = b.num("2");
        let sum = b.binary(BinaryOp::Plus, one, two);
        let stmt = b.expr_stmt(sum);
        assert_eq!(print(b.finish(vec![stmt]), BackendId::Java), "1 + 2;");
    }

    #[test]
    fn numeric_operands_stay_native() {
        let mut b = AstBuilder::new();
        let a = b.ident("a");
        let c = b.ident("b");
        let expr = b.binary(BinaryOp::Multiply, a, c);
        let stmt = b.expr_stmt(expr);
        let ast = b.finish(vec![stmt]);
        let number = TypeInfo::new("number", TypeCategory::Number);
        let types = TypeTable::new().with_type(a, number.clone()).with_type(c, number);
        assert_eq!(print_with(ast, BackendId::Java, &types), "a * b;");
    }

    #[test]
    fn compound_assignment_under_casts() {
        let mut b = AstBuilder::new();
        let x = b.ident("x");
        let y = b.ident("y");
        let expr = b.binary(BinaryOp::PlusAssign, x, y);
        let stmt = b.expr_stmt(expr);
        let ast = b.finish(vec![stmt]);
        assert_eq!(print(ast.clone(), BackendId::Java), "x = Helpers.add(x, y);");
        assert_eq!(print(ast, BackendId::Python), "x += y");
    }

    #[test]
    fn chained_element_assignment_lowers_to_set_of_get() {
        let mut b = AstBuilder::new();
        let a = b.ident("a");
        let key_b = b.ident("b");
        let key_c = b.ident("c");
        let d = b.ident("d");
        let inner = b.elem(a, key_b);
        let outer = b.elem(inner, key_c);
        let stmt = b.assign_stmt(outer, d);
        let out = print(b.finish(vec![stmt]), BackendId::Java);
        assert_eq!(out, "Helpers.addElementToObject(Helpers.getValue(a, b), c, d);");
    }

    #[test]
    fn native_element_assignment() {
        let mut b = AstBuilder::new();
        let a = b.ident("a");
        let k = b.string("k");
        let v = b.num("1");
        let target = b.elem(a, k);
        let stmt = b.assign_stmt(target, v);
        assert_eq!(print(b.finish(vec![stmt]), BackendId::Python), "a[\"k\"] = 1");
    }

    #[test]
    fn conditions_without_truthiness_wrap_leaves() {
        let mut b = AstBuilder::new();
        let a = b.ident("a");
        let c = b.ident("c");
        let not_c = b.prefix(PrefixOp::Not, c);
        let both = b.binary(BinaryOp::And, a, not_c);
        let body = b.block(vec![]);
        let stmt = b.if_(both, body, None);
        let out = print(b.finish(vec![stmt]), BackendId::Java);
        assert_eq!(out, "if (Helpers.isTrue(a) && !Helpers.isTrue(c)) {}");
    }

    #[test]
    fn typeof_comparison_uses_check_template() {
        let mut b = AstBuilder::new();
        let x = b.ident("x");
        let t = b.typeof_(x);
        let s = b.string("string");
        let check = b.binary(BinaryOp::StrictNotEquals, t, s);
        let stmt = b.expr_stmt(check);
        let ast = b.finish(vec![stmt]);
        assert_eq!(print(ast.clone(), BackendId::Python), "not (isinstance(x, str))");
        assert_eq!(print(ast, BackendId::Java), "!(x instanceof String);");
    }

    #[test]
    fn php_concatenates_strings_with_dot() {
        let mut b = AstBuilder::new();
        let greeting = b.string("hi ");
        let name = b.ident("name");
        let expr = b.binary(BinaryOp::Plus, greeting, name);
        let stmt = b.expr_stmt(expr);
        assert_eq!(print(b.finish(vec![stmt]), BackendId::Php), "'hi ' . $name;");
    }

    #[test]
    fn membership_uses_wrapper_with_container_first() {
        let mut b = AstBuilder::new();
        let key = b.string("a");
        let obj = b.ident("obj");
        let expr = b.binary(BinaryOp::In, key, obj);
        let stmt = b.expr_stmt(expr);
        let ast = b.finish(vec![stmt]);
        assert_eq!(print(ast.clone(), BackendId::Java), "Helpers.inOp(obj, \"a\");");
        assert_eq!(print(ast, BackendId::Python), "\"a\" in obj");
    }

    #[test]
    fn element_assignment_prints_container_before_key() {
        let mut b = AstBuilder::new();
        let math = b.ident("Math");
        let a = b.ident("a");
        let container = b.method_call(math, "sqrt", vec![a]);
        let math2 = b.ident("Math");
        let c = b.ident("b");
        let key = b.method_call(math2, "cbrt", vec![c]);
        let target = b.elem(container, key);
        let one = b.num("1");
        let stmt = b.assign_stmt(target, one);
        let spec = BackendSpec::for_id(BackendId::Python);
        let (out, warnings) = Printer::new(b.finish(vec![stmt]), &spec, &NoTypeInfo).print_file().unwrap();

        assert_eq!(out, "Math.sqrt(a)[Math.cbrt(b)] = 1");
        let nodes: Vec<_> = warnings.iter().map(|w| w.node).collect();
        assert_eq!(nodes, vec![container, key]);
    }
}
