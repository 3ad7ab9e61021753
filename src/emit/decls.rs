//! Declaration emission: classes, properties, methods, constructors and free functions.
//!
//! All callables go through [`Printer::function_parts`], which prints the parameter list, the resolved return type
//! and the body (applying default-parameter emulation and async lowering). Handlers only assemble the header around
//! those parts, which is also how backend overrides reuse the machinery for their own class layouts.

use polyglot_core::lang::tokens::Token;
use polyglot_syntax::ast::{Modifiers, TypeAnnotation, Visibility};
use polyglot_syntax::{NodeId, NodeKind, SyntaxKind};

use super::errors::EmitResult;
use super::{Printer, Scope, join_words};
use crate::backend::TypePosition;
use crate::passes::async_lowering::AsyncBody;
use crate::passes::overrides::OverrideDescriptor;

/// Input to [`Printer::function_parts`].
#[derive(Debug, Clone, Default)]
pub struct FunctionSpec<'n> {
    pub node: NodeId,
    pub params: &'n [NodeId],
    pub return_type: Option<&'n TypeAnnotation>,
    /// Body statements; `None` for a declaration without body.
    pub body: Option<Vec<NodeId>>,
    pub is_async: bool,
    pub overrides: Option<&'n OverrideDescriptor>,
    /// Extra raw lines printed before the body.
    pub prologue: Vec<String>,
    /// Extra raw lines printed after the body.
    pub epilogue: Vec<String>,
}

/// Printed pieces of a callable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionParts {
    pub params: Vec<String>,
    /// Resolved return type; empty when the target omits it.
    pub return_type: String,
    /// Body starting at the block opening token (or the terminator of a bodiless declaration).
    pub body: String,
}

impl<'a> Printer<'a> {
    /// Print the parameter list, return type and body of a callable.
    ///
    /// ## Notes
    /// - The caller owns the scope: push the function's scope before calling.
    /// - For wrapped async bodies the body is printed before the parameters, so parameters reassigned anywhere in
    ///   the body are known when the signature is printed.
    pub fn function_parts(&mut self, spec: FunctionSpec<'_>, indent: usize) -> EmitResult<FunctionParts> {
        let lowering = self.lowers_async(spec.is_async);
        let body_indent = if lowering { indent + 2 } else { indent + 1 };

        let mut printed = None;
        if lowering && let Some(statements) = &spec.body {
            printed = Some(self.print_statements(statements, body_indent)?);
        }
        let params = self.print_parameters(spec.params, spec.overrides, lowering, indent)?;
        if printed.is_none()
            && let Some(statements) = &spec.body
        {
            printed = Some(self.print_statements(statements, body_indent)?);
        }

        let declared = spec
            .return_type
            .or_else(|| spec.overrides.and_then(|o| o.return_type.as_ref()));
        let return_type = self.return_type_text(declared, spec.body.as_deref(), spec.is_async);

        let (Some(statements), Some(printed)) = (&spec.body, printed) else {
            return Ok(FunctionParts {
                params: params.signature,
                return_type,
                body: self.tok(Token::LineTerminator).to_string(),
            });
        };

        let mut prologue = params.prologue;
        prologue.extend(spec.prologue);
        let inner = if lowering {
            let body = AsyncBody {
                rebinds: &params.rebinds,
                prologue: &prologue,
                printed: &printed,
                epilogue: &spec.epilogue,
            };
            self.wrap_async_body(statements, body, indent)
        } else {
            let mut inner = self.lines(&prologue, body_indent);
            inner.push_str(&printed);
            inner.push_str(&self.lines(&spec.epilogue, body_indent));
            inner
        };
        Ok(FunctionParts {
            params: params.signature,
            return_type,
            body: self.wrap_block(indent, &inner),
        })
    }

    /// Return-type text placed before and after the parameter list.
    pub fn return_type_slots(&self, return_type: &str) -> (String, String) {
        if return_type.is_empty() {
            return (String::new(), String::new());
        }
        match self.caps().type_position {
            TypePosition::Prefix => (return_type.to_string(), String::new()),
            TypePosition::Suffix => (
                String::new(),
                format!("{}{}", self.tok(Token::ReturnTypeSeparator), return_type),
            ),
            TypePosition::Omitted => (String::new(), String::new()),
        }
    }

    pub fn visibility_token(&self, visibility: Visibility, default: Token) -> &'a str {
        match visibility {
            Visibility::Default | Visibility::Public => self.tok(default),
            Visibility::Private => self.tok(Token::Private),
            Visibility::Protected => self.tok(Token::Protected),
        }
    }

    /// Async keyword for natively async targets; empty otherwise.
    pub fn async_keyword(&self, is_async: bool) -> &'a str {
        if is_async && self.caps().native_async {
            self.tok(Token::Async)
        } else {
            ""
        }
    }

    /// Body statements of an optional body node.
    pub fn optional_body(&self, body: Option<NodeId>) -> EmitResult<Option<Vec<NodeId>>> {
        body.map(|b| self.body_statements(b)).transpose()
    }

    // ========================================================================
    // Classes
    // ========================================================================

    pub(crate) fn print_class(
        &mut self,
        name: &str,
        extends: Option<&str>,
        members: &[NodeId],
        indent: usize,
    ) -> EmitResult<String> {
        let mut header = format!("{}{} {}", self.ind(indent), self.tok(Token::Class), name);
        if let Some(parent) = extends {
            header.push_str(self.tok(Token::ExtendsOpen));
            header.push_str(parent);
            header.push_str(self.tok(Token::ExtendsClose));
        }
        let inner = self.in_scope(Scope::class(name), |p| p.print_members(members, indent + 1))?;
        Ok(format!("{}{}", header, self.wrap_block(indent, &inner)))
    }

    /// Print class members as `"\n"`-prefixed lines, with a blank line around callables.
    pub fn print_members(&mut self, members: &[NodeId], indent: usize) -> EmitResult<String> {
        let mut out = String::new();
        let mut previous_callable = false;
        for (i, &member) in members.iter().enumerate() {
            let callable = matches!(
                self.tag(member)?,
                SyntaxKind::MethodDeclaration | SyntaxKind::Constructor
            );
            if i > 0 && (callable || previous_callable) {
                out.push('\n');
            }
            out.push('\n');
            out.push_str(&self.print_statement(member, indent)?);
            previous_callable = callable;
        }
        Ok(out)
    }

    pub(crate) fn print_property(
        &mut self,
        id: NodeId,
        name: &str,
        ty: Option<&TypeAnnotation>,
        initializer: Option<NodeId>,
        modifiers: Modifiers,
        indent: usize,
    ) -> EmitResult<String> {
        let access = self.visibility_token(modifiers.visibility, Token::PropertyAccessModifier);
        let stat = if modifiers.is_static { self.tok(Token::Static) } else { "" };
        let target = format!("{}{}", self.tok(Token::VariablePrefix), self.member_name(name));
        let value = match initializer {
            Some(init) => self.print(init, indent)?,
            None => self.tok(Token::Undefined).to_string(),
        };
        let declared = match self.caps().type_position {
            TypePosition::Prefix => {
                let ty = self.variable_type(id, ty, initializer);
                join_words([ty.as_str(), target.as_str()])
            }
            TypePosition::Suffix => {
                let ty = self.variable_type(id, ty, initializer);
                if ty.is_empty() {
                    target
                } else {
                    format!("{}{}{}", target, self.tok(Token::ParamTypeSeparator), ty)
                }
            }
            TypePosition::Omitted => target,
        };
        Ok(format!(
            "{}{} = {}{}",
            self.ind(indent),
            join_words([access, stat, declared.as_str()]),
            value,
            self.tok(Token::LineTerminator)
        ))
    }

    // ========================================================================
    // Callables
    // ========================================================================

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn print_method(
        &mut self,
        id: NodeId,
        name: &str,
        params: &[NodeId],
        return_type: Option<&TypeAnnotation>,
        body: Option<NodeId>,
        modifiers: Modifiers,
        indent: usize,
    ) -> EmitResult<String> {
        let scope = self.ctx.scope().method(name);
        self.in_scope(scope, |p| {
            let descriptor = p.override_descriptor(id, name, params, return_type)?;
            let parts = p.function_parts(
                FunctionSpec {
                    node: id,
                    params,
                    return_type,
                    body: p.optional_body(body)?,
                    is_async: modifiers.is_async,
                    overrides: descriptor.as_ref(),
                    ..FunctionSpec::default()
                },
                indent,
            )?;
            let (before, after) = p.return_type_slots(&parts.return_type);
            let method_name = p.member_name(name);
            let header = join_words([
                p.visibility_token(modifiers.visibility, Token::MethodAccess),
                if modifiers.is_static { p.tok(Token::Static) } else { "" },
                p.async_keyword(modifiers.is_async),
                before.as_str(),
                p.tok(Token::MethodKeyword),
                method_name.as_str(),
            ]);
            let mut params = parts.params;
            let receiver = p.tok(Token::SelfParam);
            if !modifiers.is_static && !receiver.is_empty() {
                params.insert(0, receiver.to_string());
            }
            Ok(format!(
                "{}{}({}){}{}",
                p.ind(indent),
                header,
                params.join(", "),
                after,
                parts.body
            ))
        })
    }

    pub(crate) fn print_constructor(
        &mut self,
        id: NodeId,
        params: &[NodeId],
        body: Option<NodeId>,
        indent: usize,
    ) -> EmitResult<String> {
        let statements = self.optional_body(body)?;
        self.print_constructor_with(id, params, statements, "", indent)
    }

    /// Print a constructor with explicit body statements and a suffix appended to its header (`: base(x)`).
    pub fn print_constructor_with(
        &mut self,
        id: NodeId,
        params: &[NodeId],
        statements: Option<Vec<NodeId>>,
        header_suffix: &str,
        indent: usize,
    ) -> EmitResult<String> {
        let class = self.ctx.current_class().unwrap_or_default().to_string();
        let scope = self.ctx.scope().method("constructor");
        self.in_scope(scope, |p| {
            let parts = p.function_parts(
                FunctionSpec {
                    node: id,
                    params,
                    body: statements,
                    ..FunctionSpec::default()
                },
                indent,
            )?;
            let name = p.config().render(Token::ConstructorName, &[("class", &class)]);
            let header = join_words([p.tok(Token::MethodAccess), name.as_str()]);
            let mut params = parts.params;
            let receiver = p.tok(Token::SelfParam);
            if !receiver.is_empty() {
                params.insert(0, receiver.to_string());
            }
            Ok(format!(
                "{}{}({}){}{}",
                p.ind(indent),
                header,
                params.join(", "),
                header_suffix,
                parts.body
            ))
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn print_function(
        &mut self,
        id: NodeId,
        name: &str,
        params: &[NodeId],
        return_type: Option<&TypeAnnotation>,
        body: NodeId,
        modifiers: Modifiers,
        indent: usize,
    ) -> EmitResult<String> {
        let scope = self.ctx.scope().method(name);
        self.in_scope(scope, |p| {
            let parts = p.function_parts(
                FunctionSpec {
                    node: id,
                    params,
                    return_type,
                    body: Some(p.body_statements(body)?),
                    is_async: modifiers.is_async,
                    ..FunctionSpec::default()
                },
                indent,
            )?;
            let (before, after) = p.return_type_slots(&parts.return_type);
            let function_name = p.name_text(name);
            let header = join_words([
                p.tok(Token::FunctionModifier),
                p.async_keyword(modifiers.is_async),
                before.as_str(),
                p.tok(Token::FunctionKeyword),
                function_name.as_str(),
            ]);
            Ok(format!(
                "{}{}({}){}{}",
                p.ind(indent),
                header,
                parts.params.join(", "),
                after,
                parts.body
            ))
        })
    }

    /// Super-constructor call statement among `statements`, with its arguments.
    pub fn find_super_call(&self, statements: &[NodeId]) -> Option<(usize, Vec<NodeId>)> {
        statements.iter().enumerate().find_map(|(i, &stmt)| {
            let Some(NodeKind::ExpressionStatement { expression }) = self.ast().kind(stmt) else {
                return None;
            };
            match self.ast().kind(*expression) {
                Some(NodeKind::Call { callee, args }) if self.ast().tag(*callee) == Some(SyntaxKind::Super) => {
                    Some((i, args.clone()))
                }
                _ => None,
            }
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use polyglot_core::lang::operators::BinaryOp;
    use polyglot_syntax::ast::Modifiers;
    use polyglot_syntax::builder::AstBuilder;
    use polyglot_syntax::{Ast, NoTypeInfo};

    use crate::backend::{BackendId, BackendSpec};
    use crate::emit::Printer;

    fn print(ast: Ast, id: BackendId) -> String {
        let spec = BackendSpec::for_id(id);
        Printer::new(ast, &spec, &NoTypeInfo).print_file().unwrap().0
    }

    #[test]
    fn python_class_with_constructor_and_method() {
        let mut b = AstBuilder::new();
        let a = b.param("a");
        let this = b.this();
        let target = b.prop(this, "a");
        let a_ref = b.ident("a");
        let assign = b.assign_stmt(target, a_ref);
        let ctor = b.constructor(vec![a], vec![assign]);
        let this2 = b.this();
        let field = b.prop(this2, "a");
        let ret = b.ret(Some(field));
        let method = b.method("get", vec![], vec![ret]);
        let class = b.class("Box", None, vec![ctor, method]);
        let out = print(b.finish(vec![class]), BackendId::Python);
        assert_eq!(
            out,
            "class Box:\n    def __init__(self, a):\n        self.a = a\n\n    def get(self):\n        return self.a"
        );
    }

    #[test]
    fn php_property_and_function() {
        let mut b = AstBuilder::new();
        let one = b.num("1");
        let prop = b.property("count", None, Some(one));
        let class = b.class("Counter", None, vec![prop]);
        let x = b.param("x");
        let x_ref = b.ident("x");
        let two = b.num("2");
        let sum = b.binary(BinaryOp::Multiply, x_ref, two);
        let ret = b.ret(Some(sum));
        let func = b.function("double", vec![x], None, vec![ret], Modifiers::default());
        let out = print(b.finish(vec![class, func]), BackendId::Php);
        assert_eq!(
            out,
            "class Counter {\n    public $count = 1;\n}\n\nfunction double($x) {\n    return $x * 2;\n}"
        );
    }
}
