//! Python backend.
//!
//! Indentation-scoped blocks (an empty closing token), no type annotations, native defaults and native
//! `async`/`await`. Most of the work is token spelling; the overrides cover what tokens cannot express.

use polyglot_core::lang::builtins::BuiltinCall;
use polyglot_core::lang::tokens::Token;
use polyglot_syntax::{NodeId, NodeKind, SyntaxKind};

use super::{BackendConfig, BackendId, BackendSpec, BuiltinArgs, Capabilities, TypePosition};
use crate::emit::Printer;
use crate::emit::errors::EmitResult;

pub fn config() -> BackendConfig {
    BackendConfig::new(BackendId::Python)
        .with_capabilities(Capabilities {
            native_for_loops: false,
            type_position: TypePosition::Omitted,
            ..Capabilities::default()
        })
        .with_tokens([
            // layout
            (Token::BlockOpen, ":"),
            (Token::BlockClose, ""),
            (Token::SpaceBeforeBlockOpen, ""),
            (Token::EmptyBlockBody, "pass"),
            (Token::LineTerminator, ""),
            (Token::LineComment, "#"),
            (Token::ConditionOpen, ""),
            (Token::ConditionClose, ""),
            (Token::ElseIf, "elif"),
            // expressions
            (Token::Not, "not "),
            (Token::And, "and"),
            (Token::Or, "or"),
            (Token::True, "True"),
            (Token::False, "False"),
            (Token::Null, "None"),
            (Token::Undefined, "None"),
            (Token::This, "self"),
            (Token::Super, "super()"),
            (Token::SuperCallOpen, "super().__init__("),
            (Token::New, ""),
            (Token::Increment, " += 1"),
            (Token::Decrement, " -= 1"),
            (Token::StrictEquals, "=="),
            (Token::StrictNotEquals, "!="),
            (Token::InstanceOfOpen, "isinstance("),
            (Token::InstanceOf, ", "),
            (Token::InstanceOfClose, ")"),
            (Token::ConditionalTemplate, "{then} if {cond} else {else}"),
            (Token::DeleteTemplate, "del {object}[{key}]"),
            (Token::TypeOfTemplate, "type({expr}).__name__"),
            (Token::SpreadOpen, "*"),
            (Token::LambdaOpen, "lambda "),
            (Token::LambdaClose, ""),
            (Token::LambdaArrow, ": "),
            (Token::StringLengthOpen, "len("),
            (Token::StringLengthClose, ")"),
            (Token::ArrayLengthOpen, "len("),
            (Token::ArrayLengthClose, ")"),
            // statements
            (Token::ThrowOpen, "raise "),
            (Token::CatchClause, "except Exception as {name}"),
            // declarations
            (Token::VarKeyword, ""),
            (Token::ConstKeyword, ""),
            (Token::Class, "class"),
            (Token::ExtendsOpen, "("),
            (Token::ExtendsClose, ")"),
            (Token::ConstructorName, "def __init__"),
            (Token::MethodKeyword, "def"),
            (Token::FunctionKeyword, "def"),
            (Token::MethodAccess, ""),
            (Token::PropertyAccessModifier, ""),
            (Token::Private, ""),
            (Token::Protected, ""),
            (Token::Static, ""),
            (Token::SelfParam, "self"),
            (Token::DefaultValueSeparator, "="),
            (Token::OptionalArgsParam, "*optional_args"),
            (
                Token::OptionalArgAccessor,
                "{name} = optional_args[{index}] if len(optional_args) > {index} else {default}",
            ),
        ])
        .with_reserved_words([
            ("lambda", "lambda_"),
            ("pass", "pass_"),
            ("def", "def_"),
            ("type", "type_"),
            ("id", "id_"),
        ])
        .with_call_replacements([("console.log", "print")])
        .with_property_replacements([("Number.MAX_SAFE_INTEGER", "sys.maxsize")])
        .with_typeof_checks([
            ("string", "isinstance({expr}, str)"),
            ("number", "isinstance({expr}, (int, float))"),
            ("boolean", "isinstance({expr}, bool)"),
            ("object", "isinstance({expr}, dict)"),
            ("function", "callable({expr})"),
        ])
}

pub fn backend() -> BackendSpec {
    BackendSpec::new(config(), print_builtin)
        .with_handler(SyntaxKind::ArrowFunction, print_arrow)
        .with_handler(SyntaxKind::MethodDeclaration, print_method)
}

/// Lambdas are single expressions; a block body cannot be expressed.
fn print_arrow(p: &mut Printer<'_>, id: NodeId, _indent: usize) -> EmitResult<Option<String>> {
    let NodeKind::ArrowFunction { body, .. } = p.kind(id)? else {
        return Ok(None);
    };
    if p.tag(body)? == SyntaxKind::Block {
        return Err(p.unsupported(id, Some("Python lambdas cannot contain statements".into())));
    }
    Ok(None)
}

fn print_method(p: &mut Printer<'_>, id: NodeId, indent: usize) -> EmitResult<Option<String>> {
    let NodeKind::MethodDeclaration { modifiers, .. } = p.kind(id)? else {
        return Ok(None);
    };
    if !modifiers.is_static {
        return Ok(None);
    }
    let Some(method) = p.print_default(id, indent)? else {
        return Ok(None);
    };
    Ok(Some(format!("{}@staticmethod\n{}", p.ind(indent), method)))
}

fn print_builtin(_config: &BackendConfig, call: BuiltinCall, args: &BuiltinArgs<'_>) -> Option<String> {
    let (r, a, b) = (args.receiver(), args.arg(0), args.arg(1));
    let out = match call {
        BuiltinCall::DateNow => "int(time.time() * 1000)".to_string(),
        BuiltinCall::JsonParse => format!("json.loads({a})"),
        BuiltinCall::JsonStringify => format!("json.dumps({a})"),
        BuiltinCall::ArrayIsArray => format!("isinstance({a}, list)"),
        BuiltinCall::ObjectKeys => format!("list({a}.keys())"),
        BuiltinCall::ObjectValues => format!("list({a}.values())"),
        BuiltinCall::PromiseAll => format!("asyncio.gather(*{a})"),
        BuiltinCall::MathRound => format!("round({a})"),
        BuiltinCall::MathFloor => format!("math.floor({a})"),
        BuiltinCall::MathCeil => format!("math.ceil({a})"),
        BuiltinCall::MathAbs => format!("abs({a})"),
        BuiltinCall::MathMin => format!("min({})", args.joined()),
        BuiltinCall::MathMax => format!("max({})", args.joined()),
        BuiltinCall::MathPow => format!("math.pow({a}, {b})"),
        BuiltinCall::NumberIsInteger => format!("isinstance({a}, int)"),
        BuiltinCall::ParseInt => format!("int({a})"),
        BuiltinCall::ParseFloat => format!("float({a})"),
        BuiltinCall::ToString => format!("str({r})"),
        BuiltinCall::ToUpperCase => format!("{r}.upper()"),
        BuiltinCall::ToLowerCase => format!("{r}.lower()"),
        BuiltinCall::Trim => format!("{r}.strip()"),
        BuiltinCall::Shift => format!("{r}.pop(0)"),
        BuiltinCall::Pop => format!("{r}.pop()"),
        BuiltinCall::Reverse => format!("{r}.reverse()"),
        BuiltinCall::Push => format!("{r}.append({})", args.joined()),
        BuiltinCall::Includes => format!("({a} in {r})"),
        BuiltinCall::IndexOf | BuiltinCall::Search => format!("{r}.find({a})"),
        BuiltinCall::Join => format!("{a}.join({r})"),
        BuiltinCall::Split => format!("{r}.split({a})"),
        BuiltinCall::StartsWith => format!("{r}.startswith({a})"),
        BuiltinCall::EndsWith => format!("{r}.endswith({a})"),
        BuiltinCall::Concat => format!("{r} + {a}"),
        BuiltinCall::ToFixed => format!("round({r}, {a})"),
        BuiltinCall::Slice if args.args.len() > 1 => format!("{r}[{a}:{b}]"),
        BuiltinCall::Slice => format!("{r}[{a}:]"),
        BuiltinCall::Replace => format!("{r}.replace({a}, {b}, 1)"),
        BuiltinCall::ReplaceAll => format!("{r}.replace({a}, {b})"),
        BuiltinCall::PadStart => format!("{r}.rjust({a}, {b})"),
        BuiltinCall::PadEnd => format!("{r}.ljust({a}, {b})"),
    };
    Some(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use polyglot_syntax::ast::Modifiers;
    use polyglot_syntax::builder::AstBuilder;
    use polyglot_syntax::{NoTypeInfo, SyntaxKind};

    use super::*;
    use crate::emit::TranspileError;

    #[test]
    fn static_methods_are_decorated() {
        let mut b = AstBuilder::new();
        let x = b.param("x");
        let x_ref = b.ident("x");
        let ret = b.ret(Some(x_ref));
        let method = b.method_full("identity", vec![x], None, vec![ret], Modifiers::static_());
        let class = b.class("Util", None, vec![method]);
        let spec = backend();
        let (out, _) = Printer::new(b.finish(vec![class]), &spec, &NoTypeInfo)
            .print_file()
            .unwrap();
        assert_eq!(out, "class Util:\n    @staticmethod\n    def identity(x):\n        return x");
    }

    #[test]
    fn block_lambdas_are_unsupported() {
        let mut b = AstBuilder::new();
        let ret = b.ret(None);
        let body = b.block(vec![ret]);
        let arrow = b.arrow(vec![], body, Modifiers::default());
        let stmt = b.const_("f", Some(arrow));
        let spec = backend();
        let err = Printer::new(b.finish(vec![stmt]), &spec, &NoTypeInfo)
            .print_file()
            .unwrap_err();
        assert!(matches!(
            err,
            TranspileError::UnsupportedConstruct {
                kind: SyntaxKind::ArrowFunction,
                ..
            }
        ));
    }
}
