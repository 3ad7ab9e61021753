//! Expression emission.
//!
//! Naming rules (reserved words, un-camel-casing, member capitalization, variable prefixes) live here because every
//! other expression handler goes through them.
//!
//! ## See also
//! - [`operators`]: binary/unary operators, assignment and condition lowering
//! - [`calls`]: calls, built-in rewrites and `new`
//! - [`indexing`]: property and element access
//! - [`literals`]: numeric, string, array and object literals

mod calls;
mod indexing;
mod literals;
mod operators;

use polyglot_core::casing::{capitalize, un_camel_case};
use polyglot_core::lang::tokens::Token;
use polyglot_syntax::ast::{Modifiers, TypeAnnotation};
use polyglot_syntax::types::SymbolKind;
use polyglot_syntax::{NodeId, NodeKind};

use super::Printer;
use super::errors::EmitResult;

impl Printer<'_> {
    // ========================================================================
    // Naming
    // ========================================================================

    /// Identifier text after reserved-word replacement and casing, without prefix.
    pub fn name_text(&self, name: &str) -> String {
        let name = self.config().reserved_words.get(name).map_or(name, String::as_str);
        if self.caps().uncamel_case {
            un_camel_case(name)
        } else {
            name.to_string()
        }
    }

    /// Variable reference text: prefix plus [`Printer::name_text`].
    pub fn variable_name(&self, name: &str) -> String {
        format!("{}{}", self.tok(Token::VariablePrefix), self.name_text(name))
    }

    /// Member (method or property) name.
    pub fn member_name(&self, name: &str) -> String {
        let name = if self.caps().uncamel_case {
            un_camel_case(name)
        } else {
            name.to_string()
        };
        if self.caps().capitalize_members {
            capitalize(&name)
        } else {
            name
        }
    }

    pub(crate) fn print_identifier(&self, id: NodeId, name: &str) -> String {
        if name == "undefined" {
            return self.tok(Token::Undefined).to_string();
        }
        if self.class_decl(name).is_some() {
            return name.to_string();
        }
        match self.types().symbol_at(id).map(|s| s.kind) {
            Some(SymbolKind::Class) => name.to_string(),
            Some(SymbolKind::Function | SymbolKind::Import) => self.name_text(name),
            _ => self.variable_name(name),
        }
    }

    /// Record a write to `target` when it is a plain identifier.
    pub fn mark_assignment_target(&mut self, target: NodeId) {
        if let Some(name) = self.ast().identifier_name(target).map(str::to_string) {
            self.ctx.mark_reassigned(&name);
        }
    }

    /// Dotted source path of a callee or property access (`console.log`), when it is made of identifiers only.
    pub fn dotted_path(&self, id: NodeId) -> Option<String> {
        match self.ast().kind(id)? {
            NodeKind::Identifier { name } => Some(name.clone()),
            NodeKind::PropertyAccess { object, name } => Some(format!("{}.{}", self.dotted_path(*object)?, name)),
            _ => None,
        }
    }

    pub(crate) fn print_args(&mut self, args: &[NodeId], indent: usize) -> EmitResult<Vec<String>> {
        args.iter().map(|&arg| self.print(arg, indent)).collect()
    }

    // ========================================================================
    // Misc expressions
    // ========================================================================

    pub(crate) fn print_new(&mut self, callee: NodeId, args: &[NodeId], indent: usize) -> EmitResult<String> {
        let class = match self.ast().identifier_name(callee) {
            Some(name) => name.to_string(),
            None => self.print(callee, indent)?,
        };
        let args = self.print_args(args, indent)?;
        Ok(format!(
            "{}{}{}({})",
            self.tok(Token::New),
            class,
            self.tok(Token::NewCallSuffix),
            args.join(", ")
        ))
    }

    pub(crate) fn print_conditional(
        &mut self,
        condition: NodeId,
        when_true: NodeId,
        when_false: NodeId,
        indent: usize,
    ) -> EmitResult<String> {
        let cond = self.print_condition(condition, indent)?;
        let then = self.print(when_true, indent)?;
        let otherwise = self.print(when_false, indent)?;
        Ok(self.config().render(
            Token::ConditionalTemplate,
            &[("cond", &cond), ("then", &then), ("else", &otherwise)],
        ))
    }

    /// Lambda from an arrow function. Arrows do not open a scope of their own.
    pub(crate) fn print_arrow(
        &mut self,
        params: &[NodeId],
        body: NodeId,
        modifiers: Modifiers,
        indent: usize,
    ) -> EmitResult<String> {
        let names = self.print_args(params, indent)?;
        let mut head = String::new();
        let keyword = self.async_keyword(modifiers.is_async);
        if !keyword.is_empty() {
            head.push_str(keyword);
            head.push(' ');
        }
        head.push_str(self.tok(Token::LambdaOpen));
        head.push_str(&names.join(", "));
        head.push_str(self.tok(Token::LambdaClose));
        match self.kind(body)? {
            NodeKind::Block { statements } => {
                let inner = self.print_statements(&statements, indent + 1)?;
                Ok(format!(
                    "{}{}{}",
                    head,
                    self.tok(Token::LambdaArrow).trim_end(),
                    self.wrap_block(indent, &inner)
                ))
            }
            _ => {
                let expr = self.print(body, indent)?;
                Ok(format!("{}{}{}", head, self.tok(Token::LambdaArrow), expr))
            }
        }
    }

    pub(crate) fn print_cast(&mut self, expression: NodeId, ty: &TypeAnnotation, indent: usize) -> EmitResult<String> {
        let expr = self.print(expression, indent)?;
        if self.tok(Token::CastTemplate).is_empty() {
            return Ok(expr);
        }
        let target = self
            .map_annotation(ty)
            .unwrap_or_else(|| self.tok(Token::DefaultType).to_string());
        Ok(self
            .config()
            .render(Token::CastTemplate, &[("type", &target), ("expr", &expr)]))
    }

    /// `None` when the backend has no delete template or the operand is not a member access.
    pub(crate) fn print_delete(&mut self, expression: NodeId, indent: usize) -> EmitResult<Option<String>> {
        if self.tok(Token::DeleteTemplate).is_empty() {
            return Ok(None);
        }
        let (object, key) = match self.kind(expression)? {
            NodeKind::ElementAccess { object, index } => (self.print(object, indent)?, self.print(index, indent)?),
            NodeKind::PropertyAccess { object, name } => (self.print(object, indent)?, self.quote(&name)),
            _ => return Ok(None),
        };
        Ok(Some(
            self.config()
                .render(Token::DeleteTemplate, &[("object", &object), ("key", &key)]),
        ))
    }
}
