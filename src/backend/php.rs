//! PHP backend.
//!
//! Untyped output with `$`-prefixed variables, `->` member access and `.` string concatenation. Object literals
//! become `array(...)` with `=>` pairs; expression arrows become `fn(...) =>` arrow functions.
//!
//! ## Notes
//! - PHP has no async functions: `async` and `await` are erased.
//! - Block-bodied arrows print as anonymous functions with an explicit `use (...)` capture list, since only `fn`
//!   arrows capture their environment implicitly.

use std::collections::BTreeSet;

use polyglot_core::lang::builtins::BuiltinCall;
use polyglot_core::lang::helpers::RuntimeHelper;
use polyglot_core::lang::tokens::Token;
use polyglot_syntax::{NodeId, NodeKind, SyntaxKind};

use super::{BackendConfig, BackendId, BackendSpec, BuiltinArgs, Capabilities, TypePosition};
use crate::emit::Printer;
use crate::emit::errors::EmitResult;

pub fn config() -> BackendConfig {
    BackendConfig::new(BackendId::Php)
        .with_capabilities(Capabilities {
            native_async: false,
            type_position: TypePosition::Omitted,
            ..Capabilities::default()
        })
        .with_tokens([
            (Token::VariablePrefix, "$"),
            (Token::PropertyAccess, "->"),
            (Token::StringQuote, "'"),
            (Token::StringConcat, "."),
            (Token::This, "$this"),
            (Token::Super, "parent"),
            (Token::SuperAccess, "::"),
            (Token::SuperCallOpen, "parent::__construct("),
            (Token::Null, "null"),
            (Token::Undefined, "null"),
            (Token::VarKeyword, ""),
            (Token::ConstKeyword, ""),
            (Token::ForInitKeyword, ""),
            (Token::ElseIf, "elseif"),
            (Token::CatchClause, "catch (\\Exception {name})"),
            (Token::AwaitOpen, ""),
            // callables
            (Token::FunctionKeyword, "function"),
            (Token::MethodKeyword, "function"),
            (Token::ConstructorName, "function __construct"),
            (Token::LambdaOpen, "fn("),
            (Token::LambdaClose, ")"),
            (Token::LambdaArrow, " => "),
            (Token::OptionalArgsParam, "...$optionalArgs"),
            (
                Token::OptionalArgAccessor,
                "{name} = getArg($optionalArgs, {index}, {default});",
            ),
            // literals
            (Token::ObjectOpen, "array("),
            (Token::ObjectClose, ")"),
            (Token::PropertyAssignment, " => "),
            (Token::SpreadOpen, "..."),
            // operators
            (Token::InWrapperOpen, "inOp("),
            (Token::InWrapperClose, ")"),
            (Token::StringLengthOpen, "strlen("),
            (Token::StringLengthClose, ")"),
            (Token::ArrayLengthOpen, "count("),
            (Token::ArrayLengthClose, ")"),
            (Token::TypeOfTemplate, "gettype({expr})"),
            (Token::DeleteTemplate, "unset({object}[{key}])"),
            (Token::ConditionalTemplate, "({cond}) ? {then} : {else}"),
        ])
        .with_reserved_words([
            ("list", "list_"),
            ("array", "array_"),
            ("echo", "echo_"),
            ("empty", "empty_"),
            ("isset", "isset_"),
            ("unset", "unset_"),
        ])
        .with_call_replacements([("console.log", "var_dump")])
        .with_property_replacements([("Number.MAX_SAFE_INTEGER", "PHP_INT_MAX")])
        .with_typeof_checks([
            ("string", "is_string({expr})"),
            ("number", "(is_int({expr}) || is_float({expr}))"),
            ("boolean", "is_bool({expr})"),
            ("object", "is_array({expr})"),
            ("function", "is_callable({expr})"),
        ])
}

pub fn backend() -> BackendSpec {
    BackendSpec::new(config(), print_builtin)
        .with_handler(SyntaxKind::PropertyAccess, print_property_access)
        .with_handler(SyntaxKind::ArrowFunction, print_arrow)
}

/// `Class::member` for members of a class declared in this file; static properties keep their `$`.
fn print_property_access(p: &mut Printer<'_>, id: NodeId, _indent: usize) -> EmitResult<Option<String>> {
    let NodeKind::PropertyAccess { object, name } = p.kind(id)? else {
        return Ok(None);
    };
    let Some(class) = p.ast().identifier_name(object).map(str::to_string) else {
        return Ok(None);
    };
    let Some(decl) = p.class_decl(&class) else {
        return Ok(None);
    };
    let member = p.member_name(&name);
    if is_static_property(p, decl, &name)? {
        return Ok(Some(format!("{class}::${member}")));
    }
    Ok(Some(format!("{class}::{member}")))
}

fn is_static_property(p: &Printer<'_>, class: NodeId, name: &str) -> EmitResult<bool> {
    let NodeKind::ClassDeclaration { members, .. } = p.kind(class)? else {
        return Ok(false);
    };
    for member in members {
        if let NodeKind::PropertyDeclaration {
            name: field, modifiers, ..
        } = p.kind(member)?
            && field == name
        {
            return Ok(modifiers.is_static);
        }
    }
    Ok(false)
}

/// Block-bodied arrows become `function (..) use (..) { .. }`.
fn print_arrow(p: &mut Printer<'_>, id: NodeId, indent: usize) -> EmitResult<Option<String>> {
    let NodeKind::ArrowFunction { params, body, .. } = p.kind(id)? else {
        return Ok(None);
    };
    if p.tag(body)? != SyntaxKind::Block {
        return Ok(None);
    }
    let list = p.print_parameters(&params, None, false, indent)?;
    let captures = captured_variables(p, &params, body)?;
    let mut head = format!("function ({})", list.signature.join(", "));
    if !captures.is_empty() {
        head.push_str(&format!(" use ({})", captures.join(", ")));
    }
    let statements = p.body_statements(body)?;
    let mut inner = p.lines(&list.prologue, indent + 1);
    inner.push_str(&p.print_statements(&statements, indent + 1)?);
    Ok(Some(format!("{head}{}", p.wrap_block(indent, &inner))))
}

/// Printed names of the variables a closure body reads from its enclosing scope, in name order.
fn captured_variables(p: &Printer<'_>, params: &[NodeId], body: NodeId) -> EmitResult<Vec<String>> {
    let mut bound = BTreeSet::new();
    for &param in params {
        if let NodeKind::Parameter { name, .. } = p.kind(param)? {
            bound.insert(name);
        }
    }
    let mut referenced = Vec::new();
    let mut stack = vec![body];
    while let Some(node) = stack.pop() {
        let kind = p.kind(node)?;
        match &kind {
            NodeKind::VariableDeclaration { name, .. } => {
                bound.insert(name.clone());
            }
            NodeKind::Identifier { name } => referenced.push((node, name.clone())),
            _ => {}
        }
        stack.extend(kind.children());
    }
    let mut names = BTreeSet::new();
    for (node, name) in referenced {
        if bound.contains(&name) {
            continue;
        }
        let printed = p.print_identifier(node, &name);
        if printed.starts_with('$') {
            names.insert(printed);
        }
    }
    Ok(names.into_iter().collect())
}

fn print_builtin(config: &BackendConfig, call: BuiltinCall, args: &BuiltinArgs<'_>) -> Option<String> {
    let (r, a, b) = (args.receiver(), args.arg(0), args.arg(1));
    let out = match call {
        BuiltinCall::DateNow => "(int) (microtime(true) * 1000)".to_string(),
        BuiltinCall::JsonParse => format!("json_decode({a}, true)"),
        BuiltinCall::JsonStringify => format!("json_encode({a})"),
        BuiltinCall::ArrayIsArray => format!("is_array({a})"),
        BuiltinCall::ObjectKeys => format!("array_keys({a})"),
        BuiltinCall::ObjectValues => format!("array_values({a})"),
        BuiltinCall::PromiseAll => a.to_string(),
        BuiltinCall::MathRound => format!("round({a})"),
        BuiltinCall::MathFloor => format!("floor({a})"),
        BuiltinCall::MathCeil => format!("ceil({a})"),
        BuiltinCall::MathAbs => format!("abs({a})"),
        BuiltinCall::MathMin => format!("min({})", args.joined()),
        BuiltinCall::MathMax => format!("max({})", args.joined()),
        BuiltinCall::MathPow => format!("pow({a}, {b})"),
        BuiltinCall::NumberIsInteger => format!("is_int({a})"),
        BuiltinCall::ParseInt => format!("intval({a})"),
        BuiltinCall::ParseFloat => format!("floatval({a})"),
        BuiltinCall::ToString => format!("strval({r})"),
        BuiltinCall::ToUpperCase => format!("strtoupper({r})"),
        BuiltinCall::ToLowerCase => format!("strtolower({r})"),
        BuiltinCall::Trim => format!("trim({r})"),
        BuiltinCall::Shift => format!("array_shift({r})"),
        BuiltinCall::Pop => format!("array_pop({r})"),
        BuiltinCall::Reverse => format!("{r} = array_reverse({r})"),
        BuiltinCall::Push if args.args.len() == 1 => format!("{r}[] = {a}"),
        BuiltinCall::Push => format!("array_push({r}, {})", args.joined()),
        BuiltinCall::Includes => format!("in_array({a}, {r})"),
        BuiltinCall::IndexOf => config.helper_call(RuntimeHelper::GetIndexOf, &[r, a]),
        BuiltinCall::Search => format!("strpos({r}, {a})"),
        BuiltinCall::Join => format!("implode({a}, {r})"),
        BuiltinCall::Split => format!("explode({a}, {r})"),
        BuiltinCall::StartsWith => format!("str_starts_with({r}, {a})"),
        BuiltinCall::EndsWith => format!("str_ends_with({r}, {a})"),
        BuiltinCall::Concat => format!("array_merge({r}, {a})"),
        BuiltinCall::ToFixed => format!("number_format({r}, {a}, '.', '')"),
        BuiltinCall::Slice => {
            let end = if args.args.len() > 1 { b } else { "null" };
            config.helper_call(RuntimeHelper::Slice, &[r, a, end])
        }
        BuiltinCall::Replace => format!("preg_replace('/' . preg_quote({a}, '/') . '/', {b}, {r}, 1)"),
        BuiltinCall::ReplaceAll => format!("str_replace({a}, {b}, {r})"),
        BuiltinCall::PadStart => format!("str_pad({r}, {a}, {b}, STR_PAD_LEFT)"),
        BuiltinCall::PadEnd => format!("str_pad({r}, {a}, {b}, STR_PAD_RIGHT)"),
    };
    Some(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use polyglot_core::lang::operators::BinaryOp;
    use polyglot_syntax::ast::Modifiers;
    use polyglot_syntax::builder::AstBuilder;
    use polyglot_syntax::{Ast, NoTypeInfo};

    use super::*;

    fn print(ast: Ast) -> String {
        let spec = backend();
        Printer::new(ast, &spec, &NoTypeInfo).print_file().unwrap().0
    }

    #[test]
    fn class_members_use_scope_resolution() {
        let mut b = AstBuilder::new();
        let class = b.class("Registry", None, vec![]);
        let class_ref = b.ident("Registry");
        let access = b.prop(class_ref, "create");
        let call = b.call(access, vec![]);
        let stmt = b.expr_stmt(call);
        let out = print(b.finish(vec![class, stmt]));
        assert!(out.ends_with("Registry::create();"), "{out}");
    }

    #[test]
    fn static_properties_keep_their_sigil() {
        let mut b = AstBuilder::new();
        let zero = b.num("0");
        let count = b.push(NodeKind::PropertyDeclaration {
            name: "count".into(),
            ty: None,
            initializer: Some(zero),
            modifiers: Modifiers::static_(),
        });
        let class = b.class("Registry", None, vec![count]);
        let class_ref = b.ident("Registry");
        let access = b.prop(class_ref, "count");
        let stmt = b.expr_stmt(access);
        let out = print(b.finish(vec![class, stmt]));
        assert!(out.contains("public static $count = 0;"), "{out}");
        assert!(out.ends_with("Registry::$count;"), "{out}");
    }

    #[test]
    fn block_arrows_list_their_captures() {
        let mut b = AstBuilder::new();
        let x = b.param("x");
        let x_ref = b.ident("x");
        let offset = b.ident("offset");
        let sum = b.binary(BinaryOp::Plus, x_ref, offset);
        let ret = b.ret(Some(sum));
        let body = b.block(vec![ret]);
        let arrow = b.arrow(vec![x], body, Modifiers::default());
        let stmt = b.const_("f", Some(arrow));
        assert_eq!(
            print(b.finish(vec![stmt])),
            "$f = function ($x) use ($offset) {\n    return $x + $offset;\n};"
        );
    }
}
