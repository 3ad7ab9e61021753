//! Override lookup and the default handler table.
//!
//! [`Printer::print`] is the single entry point for every node. Resolution order:
//!
//! 1. the active backend's override for the node's kind, if any; `Ok(None)` from an override falls through,
//! 2. the default handler for the kind,
//! 3. `UnsupportedConstruct` when the default handler has nothing either.
//!
//! ## Notes
//! - Spread, Delete and a standalone `typeof` have no default rendering; they print only when the backend configures
//!   a template for them. `try` is unsupported when the backend clears the `try` keyword.

use polyglot_core::lang::tokens::Token;
use polyglot_syntax::{NodeId, NodeKind};

use super::Printer;
use super::errors::EmitResult;

impl Printer<'_> {
    /// Print `id` at `indent`.
    pub fn print(&mut self, id: NodeId, indent: usize) -> EmitResult<String> {
        let tag = self.tag(id)?;
        if let Some(handler) = self.backend().handler(tag)
            && let Some(out) = handler(self, id, indent)?
        {
            return Ok(out);
        }
        match self.print_default(id, indent)? {
            Some(out) => Ok(out),
            None => Err(self.unsupported(id, None)),
        }
    }

    /// Default rendering of `id`, ignoring backend overrides.
    ///
    /// Overrides call this to decorate the default output.
    pub fn print_default(&mut self, id: NodeId, indent: usize) -> EmitResult<Option<String>> {
        let out = match self.kind(id)? {
            // ---- Declarations ----
            NodeKind::SourceFile { statements } => self.print_source_file(&statements)?,
            NodeKind::ClassDeclaration { name, extends, members } => {
                self.print_class(&name, extends.as_deref(), &members, indent)?
            }
            NodeKind::PropertyDeclaration {
                name,
                ty,
                initializer,
                modifiers,
            } => self.print_property(id, &name, ty.as_ref(), initializer, modifiers, indent)?,
            NodeKind::MethodDeclaration {
                name,
                params,
                return_type,
                body,
                modifiers,
            } => self.print_method(id, &name, &params, return_type.as_ref(), body, modifiers, indent)?,
            NodeKind::Constructor { params, body } => self.print_constructor(id, &params, body, indent)?,
            NodeKind::FunctionDeclaration {
                name,
                params,
                return_type,
                body,
                modifiers,
            } => self.print_function(id, &name, &params, return_type.as_ref(), body, modifiers, indent)?,
            NodeKind::Parameter { name, .. } => self.variable_name(&name),

            // ---- Statements ----
            NodeKind::VariableStatement {
                declaration_kind,
                declarations,
            } => self.print_variable_statement(declaration_kind, &declarations, indent)?,
            NodeKind::VariableDeclaration { name, ty, initializer } => {
                let decl = self.print_variable_declaration(
                    id,
                    polyglot_syntax::ast::DeclarationKind::Let,
                    &name,
                    ty.as_ref(),
                    initializer,
                    indent,
                )?;
                format!("{}{}", self.ind(indent), decl)
            }
            NodeKind::ExpressionStatement { expression } => {
                let expr = self.print(expression, indent)?;
                format!("{}{}{}", self.ind(indent), expr, self.tok(Token::LineTerminator))
            }
            NodeKind::Block { statements } => self.print_standalone_block(&statements, indent)?,
            NodeKind::If {
                condition,
                then_branch,
                else_branch,
            } => self.print_if(condition, then_branch, else_branch, indent)?,
            NodeKind::For {
                initializer,
                condition,
                incrementor,
                body,
            } => self.print_for(initializer, condition, incrementor, body, indent)?,
            NodeKind::While { condition, body } => self.print_while(condition, body, indent)?,
            NodeKind::Return { expression } => self.print_return(expression, indent)?,
            NodeKind::Break => self.simple_statement(Token::Break, indent),
            NodeKind::Continue => self.simple_statement(Token::Continue, indent),
            NodeKind::Throw { expression } => self.print_throw(expression, indent)?,
            NodeKind::Try {
                block,
                catch_param,
                catch_block,
                finally_block,
            } => match self.print_try(block, catch_param.as_deref(), catch_block, finally_block, indent)? {
                Some(out) => out,
                None => return Ok(None),
            },

            // ---- Expressions ----
            NodeKind::Identifier { name } => self.print_identifier(id, &name),
            NodeKind::NumericLiteral { text } => self.print_numeric_literal(&text),
            NodeKind::StringLiteral { value } => self.quote(&value),
            NodeKind::BooleanLiteral { value } => {
                let token = if value { Token::True } else { Token::False };
                self.tok(token).to_string()
            }
            NodeKind::NullLiteral => self.tok(Token::Null).to_string(),
            NodeKind::Undefined => self.tok(Token::Undefined).to_string(),
            NodeKind::This => self.tok(Token::This).to_string(),
            NodeKind::Super => self.tok(Token::Super).to_string(),
            NodeKind::ArrayLiteral { elements } => self.print_array_literal(&elements, indent)?,
            NodeKind::ObjectLiteral { properties } => self.print_object_literal(&properties, indent)?,
            NodeKind::PropertyAssignment { key, value } => self.print_property_assignment(&key, value, indent)?,
            NodeKind::Binary { op, left, right } => self.print_binary(op, left, right, indent)?,
            NodeKind::PrefixUnary { op, operand } => self.print_prefix(op, operand, indent)?,
            NodeKind::PostfixUnary { op, operand } => self.print_postfix(op, operand, indent)?,
            NodeKind::Call { callee, args } => self.print_call(id, callee, &args, indent)?,
            NodeKind::New { callee, args } => self.print_new(callee, &args, indent)?,
            NodeKind::PropertyAccess { object, name } => self.print_property_access(id, object, &name, indent)?,
            NodeKind::ElementAccess { object, index } => {
                let object = self.print(object, indent)?;
                let index = self.print(index, indent)?;
                self.element_get(&object, &index)
            }
            NodeKind::Conditional {
                condition,
                when_true,
                when_false,
            } => self.print_conditional(condition, when_true, when_false, indent)?,
            NodeKind::ArrowFunction {
                params,
                body,
                modifiers,
            } => self.print_arrow(&params, body, modifiers, indent)?,
            NodeKind::Await { expression } => {
                let inner = self.print(expression, indent)?;
                format!("{}{}{}", self.tok(Token::AwaitOpen), inner, self.tok(Token::AwaitClose))
            }
            NodeKind::Parenthesized { expression } => format!("({})", self.print(expression, indent)?),
            NodeKind::TypeOf { expression } => {
                if self.tok(Token::TypeOfTemplate).is_empty() {
                    return Ok(None);
                }
                let expr = self.print(expression, indent)?;
                self.config().render(Token::TypeOfTemplate, &[("expr", &expr)])
            }
            NodeKind::As { expression, ty } => self.print_cast(expression, &ty, indent)?,
            NodeKind::Delete { expression } => match self.print_delete(expression, indent)? {
                Some(out) => out,
                None => return Ok(None),
            },
            NodeKind::Spread { expression } => {
                let (open, close) = (self.tok(Token::SpreadOpen), self.tok(Token::SpreadClose));
                if open.is_empty() && close.is_empty() {
                    return Ok(None);
                }
                format!("{}{}{}", open, self.print(expression, indent)?, close)
            }
        };
        Ok(Some(out))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use polyglot_syntax::builder::AstBuilder;
    use polyglot_syntax::{NoTypeInfo, SyntaxKind};

    use crate::backend::{BackendId, BackendSpec};
    use crate::emit::{Printer, TranspileError};

    #[test]
    fn spread_without_template_is_unsupported() {
        let mut b = AstBuilder::new();
        let xs = b.ident("xs");
        let spread = b.spread(xs);
        let stmt = b.expr_stmt(spread);
        let ast = b.finish(vec![stmt]);
        let spec = BackendSpec::for_id(BackendId::Java);
        let err = Printer::new(ast, &spec, &NoTypeInfo).print_file().unwrap_err();
        match err {
            TranspileError::UnsupportedConstruct { kind, backend, node, .. } => {
                assert_eq!(kind, SyntaxKind::Spread);
                assert_eq!(backend, BackendId::Java);
                assert_eq!(node, spread);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn spread_prints_where_configured() {
        let mut b = AstBuilder::new();
        let xs = b.ident("xs");
        let spread = b.spread(xs);
        let stmt = b.expr_stmt(spread);
        let ast = b.finish(vec![stmt]);
        let spec = BackendSpec::for_id(BackendId::Python);
        let (out, _) = Printer::new(ast, &spec, &NoTypeInfo).print_file().unwrap();
        assert_eq!(out, "*xs");
    }

    #[test]
    fn try_is_unsupported_when_keyword_is_cleared() {
        let mut b = AstBuilder::new();
        let body = b.block(vec![]);
        let stmt = b.try_(body, None, None, None);
        let ast = b.finish(vec![stmt]);
        let spec = BackendSpec::for_id(BackendId::Go);
        let err = Printer::new(ast, &spec, &NoTypeInfo).print_file().unwrap_err();
        assert!(matches!(err, TranspileError::UnsupportedConstruct { kind: SyntaxKind::Try, .. }));
    }
}
