//! Statement emission: blocks, control flow, variable declarations and comments.
//!
//! ## Notes
//! - Every statement goes through [`Printer::print_statement`], which emits leading comments and capture aliases
//!   before the statement itself. Aliases must be collected before the statement is printed because collection
//!   rewrites the identifiers the statement then prints.
//! - Block layout is driven by tokens: `BlockClose` empty means an indentation-scoped target, `brace_on_new_line`
//!   moves the opening token to its own line.

use polyglot_core::lang::operators::PostfixOp;
use polyglot_core::lang::tokens::Token;
use polyglot_syntax::ast::{DeclarationKind, TypeAnnotation};
use polyglot_syntax::{NodeId, NodeKind, SyntaxKind};

use super::Printer;
use super::errors::EmitResult;
use crate::backend::TypePosition;

impl<'a> Printer<'a> {
    pub(crate) fn print_source_file(&mut self, statements: &[NodeId]) -> EmitResult<String> {
        let mut out = String::new();
        let mut previous_was_decl = false;
        for (i, &stmt) in statements.iter().enumerate() {
            let is_decl = matches!(
                self.tag(stmt)?,
                SyntaxKind::ClassDeclaration | SyntaxKind::FunctionDeclaration
            );
            if i > 0 {
                out.push('\n');
                if is_decl || previous_was_decl {
                    out.push('\n');
                }
            }
            out.push_str(&self.print_statement(stmt, 0)?);
            previous_was_decl = is_decl;
        }
        Ok(out)
    }

    /// Print a statement with its comments and any capture aliases it needs.
    pub fn print_statement(&mut self, id: NodeId, indent: usize) -> EmitResult<String> {
        let comments = self.comments(id);
        let pad = self.ind(indent);
        let mut lines: Vec<String> = comments
            .leading
            .iter()
            .map(|c| format!("{}{}", pad, self.comment_text(c)))
            .collect();
        for alias in self.capture_alias_lines(id)? {
            lines.push(format!("{pad}{alias}"));
        }
        let mut body = self.print(id, indent)?;
        if let Some(trailing) = &comments.trailing {
            body.push(' ');
            body.push_str(&self.comment_text(trailing));
        }
        lines.push(body);
        Ok(lines.join("\n"))
    }

    /// Translate a `//` comment to the backend's line-comment token.
    fn comment_text(&self, comment: &str) -> String {
        match comment.strip_prefix("//") {
            Some(rest) => format!("{}{}", self.tok(Token::LineComment), rest),
            None => comment.to_string(),
        }
    }

    // ========================================================================
    // Blocks
    // ========================================================================

    pub fn block_open(&self, indent: usize) -> String {
        if self.caps().brace_on_new_line {
            format!("\n{}{}", self.ind(indent), self.tok(Token::BlockOpen))
        } else {
            format!("{}{}", self.tok(Token::SpaceBeforeBlockOpen), self.tok(Token::BlockOpen))
        }
    }

    pub fn block_close(&self, indent: usize) -> String {
        let close = self.tok(Token::BlockClose);
        if close.is_empty() {
            String::new()
        } else {
            format!("\n{}{}", self.ind(indent), close)
        }
    }

    /// Wrap already-printed lines in a block opened at `indent`.
    ///
    /// `inner` is a sequence of `"\n"`-prefixed lines indented one level deeper.
    pub fn wrap_block(&self, indent: usize, inner: &str) -> String {
        let mut out = self.block_open(indent);
        if inner.is_empty() {
            let empty = self.tok(Token::EmptyBlockBody);
            if empty.is_empty() {
                out.push_str(self.tok(Token::BlockClose));
                return out;
            }
            out.push('\n');
            out.push_str(&self.ind(indent + 1));
            out.push_str(empty);
        } else {
            out.push_str(inner);
        }
        out.push_str(&self.block_close(indent));
        out
    }

    /// Print statements as `"\n"`-prefixed lines at `indent`.
    pub fn print_statements(&mut self, statements: &[NodeId], indent: usize) -> EmitResult<String> {
        self.ctx.enter_block();
        let out = statements
            .iter()
            .map(|&stmt| self.print_statement(stmt, indent).map(|line| format!("\n{line}")))
            .collect::<EmitResult<String>>();
        self.ctx.exit_block();
        out
    }

    /// Indent raw lines as `"\n"`-prefixed lines at `indent`.
    pub fn lines(&self, lines: &[String], indent: usize) -> String {
        let pad = self.ind(indent);
        lines.iter().map(|line| format!("\n{pad}{line}")).collect()
    }

    /// Statements of a body: the block's statements, or the node itself when it is not a block.
    pub fn body_statements(&self, body: NodeId) -> EmitResult<Vec<NodeId>> {
        Ok(match self.kind(body)? {
            NodeKind::Block { statements } => statements,
            _ => vec![body],
        })
    }

    /// Print a block (or a single statement used as one) opened at `indent`.
    pub fn print_block(&mut self, id: NodeId, indent: usize) -> EmitResult<String> {
        let statements = self.body_statements(id)?;
        let inner = self.print_statements(&statements, indent + 1)?;
        Ok(self.wrap_block(indent, &inner))
    }

    pub(crate) fn print_standalone_block(&mut self, statements: &[NodeId], indent: usize) -> EmitResult<String> {
        if self.tok(Token::BlockClose).is_empty() {
            // indentation-scoped targets have no anonymous blocks
            let inner = self.print_statements(statements, indent)?;
            return Ok(inner.trim_start_matches('\n').to_string());
        }
        let inner = self.print_statements(statements, indent + 1)?;
        Ok(format!(
            "{}{}{}{}",
            self.ind(indent),
            self.tok(Token::BlockOpen),
            inner,
            self.block_close(indent)
        ))
    }

    /// Separator between a closed block and a following `else`/`catch`/`finally`.
    fn continuation(&self, indent: usize) -> String {
        if self.tok(Token::BlockClose).is_empty() || self.caps().brace_on_new_line {
            format!("\n{}", self.ind(indent))
        } else {
            " ".to_string()
        }
    }

    pub(crate) fn simple_statement(&self, token: Token, indent: usize) -> String {
        format!("{}{}{}", self.ind(indent), self.tok(token), self.tok(Token::LineTerminator))
    }

    // ========================================================================
    // Control flow
    // ========================================================================

    fn condition_head(&mut self, keyword: Token, condition: NodeId, indent: usize) -> EmitResult<String> {
        let cond = self.print_condition(condition, indent)?;
        Ok(format!(
            "{} {}{}{}",
            self.tok(keyword),
            self.tok(Token::ConditionOpen),
            cond,
            self.tok(Token::ConditionClose)
        ))
    }

    pub(crate) fn print_if(
        &mut self,
        condition: NodeId,
        then_branch: NodeId,
        else_branch: Option<NodeId>,
        indent: usize,
    ) -> EmitResult<String> {
        let mut out = self.ind(indent);
        out.push_str(&self.condition_head(Token::If, condition, indent)?);
        out.push_str(&self.print_block(then_branch, indent)?);
        let mut next = else_branch;
        while let Some(branch) = next {
            out.push_str(&self.continuation(indent));
            match self.kind(branch)? {
                NodeKind::If {
                    condition,
                    then_branch,
                    else_branch,
                } => {
                    out.push_str(&self.condition_head(Token::ElseIf, condition, indent)?);
                    out.push_str(&self.print_block(then_branch, indent)?);
                    next = else_branch;
                }
                _ => {
                    out.push_str(self.tok(Token::Else));
                    out.push_str(&self.print_block(branch, indent)?);
                    next = None;
                }
            }
        }
        Ok(out)
    }

    fn is_true_literal(&self, id: NodeId) -> bool {
        matches!(self.ast().kind(id), Some(NodeKind::BooleanLiteral { value: true }))
    }

    /// `while (cond)` header, or the infinite-loop keyword for `while (true)` where the backend has one.
    fn loop_head(&mut self, condition: Option<NodeId>, indent: usize) -> EmitResult<String> {
        let infinite = self.tok(Token::InfiniteLoop);
        let is_infinite = condition.is_none_or(|c| self.is_true_literal(c));
        if is_infinite && !infinite.is_empty() {
            return Ok(infinite.to_string());
        }
        match condition {
            Some(cond) => self.condition_head(Token::While, cond, indent),
            None => Ok(format!(
                "{} {}{}{}",
                self.tok(Token::While),
                self.tok(Token::ConditionOpen),
                self.tok(Token::True),
                self.tok(Token::ConditionClose)
            )),
        }
    }

    pub(crate) fn print_while(&mut self, condition: NodeId, body: NodeId, indent: usize) -> EmitResult<String> {
        let head = self.loop_head(Some(condition), indent)?;
        let block = self.print_block(body, indent)?;
        Ok(format!("{}{}{}", self.ind(indent), head, block))
    }

    pub(crate) fn print_for(
        &mut self,
        initializer: Option<NodeId>,
        condition: Option<NodeId>,
        incrementor: Option<NodeId>,
        body: NodeId,
        indent: usize,
    ) -> EmitResult<String> {
        if self.caps().native_for_loops {
            let init = match initializer {
                Some(init) => self.print_for_initializer(init, indent)?,
                None => String::new(),
            };
            let cond = match condition {
                Some(cond) => self.print_condition(cond, indent)?,
                None => String::new(),
            };
            let incr = match incrementor {
                Some(incr) => self.print(incr, indent)?,
                None => String::new(),
            };
            let block = self.print_block(body, indent)?;
            return Ok(format!(
                "{}{} {}{}; {}; {}{}{}",
                self.ind(indent),
                self.tok(Token::For),
                self.tok(Token::ConditionOpen),
                init,
                cond,
                incr,
                self.tok(Token::ConditionClose),
                block
            ));
        }

        // initializer; while (cond) { body; incrementor; }
        let mut out = String::new();
        if let Some(init) = initializer {
            out.push_str(&self.print_loose_statement(init, indent)?);
            out.push('\n');
        }
        out.push_str(&self.ind(indent));
        out.push_str(&self.loop_head(condition, indent)?);
        let statements = self.body_statements(body)?;
        let mut inner = self.print_statements(&statements, indent + 1)?;
        if let Some(incr) = incrementor {
            let line = self.print_loose_statement(incr, indent + 1)?;
            inner.push('\n');
            inner.push_str(&line);
        }
        out.push_str(&self.wrap_block(indent, &inner));
        Ok(out)
    }

    /// Print a node that may be a statement or a bare expression as a full statement line.
    fn print_loose_statement(&mut self, id: NodeId, indent: usize) -> EmitResult<String> {
        match self.tag(id)? {
            SyntaxKind::VariableStatement | SyntaxKind::ExpressionStatement => self.print_statement(id, indent),
            _ => {
                let expr = self.print(id, indent)?;
                Ok(format!("{}{}{}", self.ind(indent), expr, self.tok(Token::LineTerminator)))
            }
        }
    }

    /// Initializer clause of a native `for` header, without terminator.
    fn print_for_initializer(&mut self, init: NodeId, indent: usize) -> EmitResult<String> {
        let NodeKind::VariableStatement { declarations, .. } = self.kind(init)? else {
            return self.print(init, indent);
        };
        let mut parts = Vec::with_capacity(declarations.len());
        for decl in declarations {
            let NodeKind::VariableDeclaration { name, initializer, .. } = self.kind(decl)? else {
                return Err(self.unsupported(decl, Some("expected a variable declaration".into())));
            };
            let value = match initializer {
                Some(value) => self.print(value, indent)?,
                None => self.tok(Token::Undefined).to_string(),
            };
            parts.push(format!(
                "{}{}{}{}",
                self.tok(Token::ForInitKeyword),
                self.variable_name(&name),
                self.tok(Token::ForInitAssign),
                value
            ));
        }
        Ok(parts.join(", "))
    }

    pub(crate) fn print_return(&mut self, expression: Option<NodeId>, indent: usize) -> EmitResult<String> {
        let value = match expression {
            Some(expr) => format!(" {}", self.print(expr, indent)?),
            None => String::new(),
        };
        Ok(format!(
            "{}{}{}{}",
            self.ind(indent),
            self.tok(Token::Return),
            value,
            self.tok(Token::LineTerminator)
        ))
    }

    pub(crate) fn print_throw(&mut self, expression: NodeId, indent: usize) -> EmitResult<String> {
        let value = self.print(expression, indent)?;
        Ok(format!(
            "{}{}{}{}{}",
            self.ind(indent),
            self.tok(Token::ThrowOpen),
            value,
            self.tok(Token::ThrowClose),
            self.tok(Token::LineTerminator)
        ))
    }

    /// `None` when the backend has no exception handling.
    pub(crate) fn print_try(
        &mut self,
        block: NodeId,
        catch_param: Option<&str>,
        catch_block: Option<NodeId>,
        finally_block: Option<NodeId>,
        indent: usize,
    ) -> EmitResult<Option<String>> {
        if self.tok(Token::Try).is_empty() {
            return Ok(None);
        }
        let mut out = format!("{}{}", self.ind(indent), self.tok(Token::Try));
        out.push_str(&self.print_block(block, indent)?);
        if let Some(catch_block) = catch_block {
            let name = self.variable_name(catch_param.unwrap_or("e"));
            out.push_str(&self.continuation(indent));
            out.push_str(&self.config().render(Token::CatchClause, &[("name", &name)]));
            out.push_str(&self.print_block(catch_block, indent)?);
        }
        if let Some(finally_block) = finally_block {
            out.push_str(&self.continuation(indent));
            out.push_str(self.tok(Token::Finally));
            out.push_str(&self.print_block(finally_block, indent)?);
        }
        Ok(Some(out))
    }

    // ========================================================================
    // Variables
    // ========================================================================

    pub(crate) fn print_variable_statement(
        &mut self,
        kind: DeclarationKind,
        declarations: &[NodeId],
        indent: usize,
    ) -> EmitResult<String> {
        let mut lines = Vec::with_capacity(declarations.len());
        for &decl in declarations {
            let NodeKind::VariableDeclaration { name, ty, initializer } = self.kind(decl)? else {
                return Err(self.unsupported(decl, Some("expected a variable declaration".into())));
            };
            let text = self.print_variable_declaration(decl, kind, &name, ty.as_ref(), initializer, indent)?;
            lines.push(format!("{}{}", self.ind(indent), text));
        }
        Ok(lines.join("\n"))
    }

    /// One declaration with its terminator, without indentation.
    pub fn print_variable_declaration(
        &mut self,
        id: NodeId,
        kind: DeclarationKind,
        name: &str,
        ty: Option<&TypeAnnotation>,
        initializer: Option<NodeId>,
        indent: usize,
    ) -> EmitResult<String> {
        let target = self.variable_name(name);
        let value = match initializer {
            Some(init) => self.print(init, indent)?,
            None => self.tok(Token::Undefined).to_string(),
        };
        let terminator = self.tok(Token::LineTerminator);
        let is_new = match initializer {
            Some(init) => self.tag(init)? == SyntaxKind::New,
            None => false,
        };
        let head = match self.caps().type_position {
            TypePosition::Prefix => {
                let inferred = self.tok(Token::InferredVarKeyword);
                if is_new && !inferred.is_empty() {
                    format!("{inferred} {target}")
                } else {
                    let ty = self.variable_type(id, ty, initializer);
                    if ty.is_empty() { target } else { format!("{ty} {target}") }
                }
            }
            TypePosition::Suffix => {
                let keyword = self.declaration_keyword(kind);
                let ty = self.variable_type(id, ty, initializer);
                let annotated = if ty.is_empty() {
                    target
                } else {
                    format!("{}{}{}", target, self.tok(Token::ParamTypeSeparator), ty)
                };
                super::join_words([keyword, annotated.as_str()])
            }
            TypePosition::Omitted => super::join_words([self.declaration_keyword(kind), target.as_str()]),
        };
        Ok(format!("{head} = {value}{terminator}"))
    }

    fn declaration_keyword(&self, kind: DeclarationKind) -> &'a str {
        match kind {
            DeclarationKind::Const => self.tok(Token::ConstKeyword),
            DeclarationKind::Let | DeclarationKind::Var => self.tok(Token::VarKeyword),
        }
    }

    /// Print an update expression (`i++`), marking the operand as reassigned.
    pub(crate) fn print_update(
        &mut self,
        operand: NodeId,
        token: Token,
        prefix: bool,
        indent: usize,
    ) -> EmitResult<String> {
        self.mark_assignment_target(operand);
        let target = self.print(operand, indent)?;
        let op = self.tok(token);
        // assignment-form tokens (" += 1") always follow the operand
        if !prefix || op.starts_with(char::is_whitespace) {
            Ok(format!("{target}{op}"))
        } else {
            Ok(format!("{op}{target}"))
        }
    }

    pub(crate) fn print_postfix(&mut self, op: PostfixOp, operand: NodeId, indent: usize) -> EmitResult<String> {
        let token = match op {
            PostfixOp::Increment => Token::Increment,
            PostfixOp::Decrement => Token::Decrement,
        };
        self.print_update(operand, token, false, indent)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use polyglot_core::lang::operators::{BinaryOp, PostfixOp};
    use polyglot_syntax::builder::AstBuilder;
    use polyglot_syntax::{Ast, NoTypeInfo};

    use crate::backend::{BackendId, BackendSpec};
    use crate::emit::Printer;

    fn print(ast: Ast, id: BackendId) -> String {
        let spec = BackendSpec::for_id(id);
        Printer::new(ast, &spec, &NoTypeInfo).print_file().unwrap().0
    }

    fn counting_loop(b: &mut AstBuilder) -> polyglot_syntax::NodeId {
        let zero = b.num("0");
        let init = b.let_("i", Some(zero));
        let i = b.ident("i");
        let ten = b.num("10");
        let cond = b.binary(BinaryOp::LessThan, i, ten);
        let i2 = b.ident("i");
        let incr = b.postfix(PostfixOp::Increment, i2);
        let brk = b.break_();
        let body = b.block(vec![brk]);
        b.for_(Some(init), Some(cond), Some(incr), body)
    }

    #[test]
    fn non_native_for_becomes_initializer_and_while() {
        let mut b = AstBuilder::new();
        let stmt = counting_loop(&mut b);
        let out = print(b.finish(vec![stmt]), BackendId::Python);
        assert_eq!(out, "i = 0\nwhile i < 10:\n    break\n    i += 1");
    }

    #[test]
    fn native_for_keeps_header() {
        let mut b = AstBuilder::new();
        let stmt = counting_loop(&mut b);
        let out = print(b.finish(vec![stmt]), BackendId::Php);
        assert_eq!(out, "for ($i = 0; $i < 10; $i++) {\n    break;\n}");
    }

    #[test]
    fn else_if_chains_and_empty_blocks() {
        let mut b = AstBuilder::new();
        let a = b.ident("a");
        let c = b.ident("c");
        let then_a = b.block(vec![]);
        let then_c = b.block(vec![]);
        let brk = b.break_();
        let otherwise = b.block(vec![brk]);
        let inner = b.if_(c, then_c, Some(otherwise));
        let stmt = b.if_(a, then_a, Some(inner));
        let ast = b.finish(vec![stmt]);
        assert_eq!(
            print(ast.clone(), BackendId::Python),
            "if a:\n    pass\nelif c:\n    pass\nelse:\n    break"
        );
        assert_eq!(print(ast, BackendId::Php), "if ($a) {} elseif ($c) {} else {\n    break;\n}");
    }

    #[test]
    fn comments_are_translated() {
        let mut b = AstBuilder::new();
        let one = b.num("1");
        let stmt = b.let_("x", Some(one));
        b.leading_comment(stmt, "// first");
        b.trailing_comment(stmt, "// trailing");
        let out = print(b.finish(vec![stmt]), BackendId::Python);
        assert_eq!(out, "# first\nx = 1 # trailing");
    }

    #[test]
    fn while_true_uses_infinite_loop_keyword() {
        let mut b = AstBuilder::new();
        let t = b.boolean(true);
        let brk = b.break_();
        let body = b.block(vec![brk]);
        let stmt = b.while_(t, body);
        let ast = b.finish(vec![stmt]);
        assert_eq!(print(ast.clone(), BackendId::Rust), "loop {\n    break;\n}");
        assert_eq!(print(ast, BackendId::Go), "for {\n    break\n}");
    }
}
