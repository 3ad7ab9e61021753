//! Java backend.
//!
//! Generated code is dynamically typed through `Object` and leans on a `Helpers` runtime class for operators,
//! truthiness, element access and optional arguments. Async functions return `CompletableFuture`s built with
//! `supplyAsync`.
//!
//! ## Notes
//! - Object literals are anonymous `HashMap` subclasses (`new HashMap<>() {{ put(..); }}`), so every value they read
//!   must be effectively final; capture analysis is enabled for this backend.
//! - Inside such a literal `this` is the anonymous map, hence the `<Class>.this` override.

use polyglot_core::lang::builtins::BuiltinCall;
use polyglot_core::lang::helpers::{HelperCase, HelperNaming, RuntimeHelper};
use polyglot_core::lang::tokens::Token;
use polyglot_syntax::{NodeId, NodeKind, SyntaxKind};

use super::{BackendConfig, BackendId, BackendSpec, BuiltinArgs, Capabilities, TypePosition};
use crate::emit::Printer;
use crate::emit::errors::EmitResult;

const HELPERS: HelperNaming = HelperNaming {
    prefix: "Helpers.",
    case: HelperCase::Camel,
};

const LIST: &str = "java.util.List<Object>";
const MAP: &str = "java.util.Map<String, Object>";

pub fn config() -> BackendConfig {
    BackendConfig::new(BackendId::Java)
        .with_helper_wrappers(HELPERS)
        .with_capabilities(Capabilities {
            requires_call_expression_cast: true,
            native_default_params: false,
            native_for_loops: true,
            requires_capture_immutability: true,
            supports_truthy_values: false,
            native_async: false,
            element_set_lowering: true,
            infer_variable_types: false,
            infer_parameter_types: false,
            type_position: TypePosition::Prefix,
            brace_on_new_line: false,
            capitalize_members: false,
            uncamel_case: false,
        })
        .with_tokens([
            // declarations
            (Token::Class, "public class"),
            (Token::ConstructorName, "{class}"),
            (Token::FunctionModifier, "public static"),
            (Token::FunctionKeyword, ""),
            (Token::MethodKeyword, ""),
            (Token::InferredVarKeyword, "var"),
            (Token::ForInitKeyword, "var "),
            // types
            (Token::DefaultType, "Object"),
            (Token::DefaultParameterType, "Object"),
            (Token::DefaultReturnType, "Object"),
            (Token::VoidKeyword, "void"),
            (Token::StringKeyword, "String"),
            (Token::BooleanKeyword, "boolean"),
            (Token::IntegerKeyword, "int"),
            (Token::LongKeyword, "long"),
            (Token::FloatKeyword, "double"),
            (Token::ArrayKeyword, LIST),
            (Token::ObjectKeyword, MAP),
            (Token::PromiseOpen, "java.util.concurrent.CompletableFuture<"),
            (Token::PromiseClose, ">"),
            (Token::PromiseVoid, "java.util.concurrent.CompletableFuture<Void>"),
            (Token::LongLiteralSuffix, "L"),
            (Token::CastTemplate, "(({type}){expr})"),
            // literals
            (Token::Undefined, "null"),
            (Token::ObjectOpen, "new java.util.HashMap<String, Object>() {{"),
            (Token::ObjectClose, "}}"),
            (Token::PropertyAssignmentOpen, "put("),
            (Token::PropertyAssignment, ", "),
            (Token::PropertyAssignmentClose, ");"),
            (Token::PropertySeparator, ""),
            (Token::ArrayOpen, "new java.util.ArrayList<Object>(java.util.Arrays.asList("),
            (Token::ArrayClose, "))"),
            (Token::LambdaArrow, " -> "),
            // statements
            (Token::CatchClause, "catch (Exception {name})"),
            (Token::DeleteTemplate, "((java.util.Map<String, Object>){object}).remove((String){key})"),
            // helpers
            (Token::StringLengthOpen, "((String)"),
            (Token::StringLengthClose, ").length()"),
            (Token::ElementSetOpen, "Helpers.addElementToObject("),
            (Token::ElementSetClose, ")"),
            (Token::DynamicCallOpen, "Helpers.callDynamically("),
            (Token::ArgsArrayOpen, "new Object[] { "),
            (Token::ArgsArrayClose, " }"),
            // async lowering
            (Token::AwaitOpen, ""),
            (Token::AwaitClose, ".join()"),
            (
                Token::AsyncBodyOpen,
                "return java.util.concurrent.CompletableFuture.supplyAsync(() -> {",
            ),
            (Token::AsyncBodyEpilogue, "return null;"),
            (Token::AsyncBodyClose, "});"),
            (Token::CaptureAlias, "final Object {alias} = {name};"),
            (Token::ParamRebind, "Object {name} = {alias};"),
            // default parameters
            (Token::OptionalArgsParam, "Object... optionalArgs"),
            (
                Token::OptionalArgAccessor,
                "Object {name} = Helpers.getArg(optionalArgs, {index}, {default});",
            ),
        ])
        .with_types([("Dict", MAP), ("List", LIST), ("Num", "Double"), ("Int", "long"), ("Str", "String")])
        .with_reserved_words([("string", "str"), ("final", "finalValue"), ("package", "pkg")])
        .with_call_replacements([("console.log", "System.out.println")])
        .with_property_replacements([("Number.MAX_SAFE_INTEGER", "Long.MAX_VALUE")])
        .with_typeof_checks([
            ("string", "{expr} instanceof String"),
            (
                "number",
                "({expr} instanceof Long || {expr} instanceof Integer || {expr} instanceof Double)",
            ),
            ("boolean", "{expr} instanceof Boolean"),
            ("object", "{expr} instanceof java.util.Map"),
        ])
}

pub fn backend() -> BackendSpec {
    BackendSpec::new(config(), print_builtin)
        .with_handler(SyntaxKind::Constructor, print_constructor)
        .with_handler(SyntaxKind::This, print_this)
}

/// Constructors must call `super(...)` first.
fn print_constructor(p: &mut Printer<'_>, id: NodeId, indent: usize) -> EmitResult<Option<String>> {
    let NodeKind::Constructor { params, body } = p.kind(id)? else {
        return Ok(None);
    };
    let Some(mut statements) = p.optional_body(body)? else {
        return Ok(None);
    };
    if let Some((index, _)) = p.find_super_call(&statements)
        && index > 0
    {
        let call = statements.remove(index);
        statements.insert(0, call);
    }
    p.print_constructor_with(id, &params, Some(statements), "", indent).map(Some)
}

fn print_this(p: &mut Printer<'_>, _id: NodeId, _indent: usize) -> EmitResult<Option<String>> {
    if p.ctx.literal_depth == 0 {
        return Ok(None);
    }
    Ok(p.ctx.current_class().map(|class| format!("{class}.this")))
}

fn print_builtin(config: &BackendConfig, call: BuiltinCall, args: &BuiltinArgs<'_>) -> Option<String> {
    let (r, a, b) = (args.receiver(), args.arg(0), args.arg(1));
    let number = |v: &str| format!("Double.parseDouble(Helpers.toString({v}))");
    let out = match call {
        BuiltinCall::DateNow => "System.currentTimeMillis()".to_string(),
        BuiltinCall::JsonParse => config.helper_call(RuntimeHelper::ParseJson, &[a]),
        BuiltinCall::JsonStringify => config.helper_call(RuntimeHelper::Stringify, &[a]),
        BuiltinCall::ArrayIsArray => format!("({a} instanceof java.util.List)"),
        BuiltinCall::ObjectKeys => format!("new java.util.ArrayList<Object>((({MAP}){a}).keySet())"),
        BuiltinCall::ObjectValues => format!("new java.util.ArrayList<Object>((({MAP}){a}).values())"),
        BuiltinCall::PromiseAll => config.helper_call(RuntimeHelper::PromiseAll, &[a]),
        BuiltinCall::MathRound => format!("Math.round({})", number(a)),
        BuiltinCall::MathFloor => format!("Math.floor({})", number(a)),
        BuiltinCall::MathCeil => format!("Math.ceil({})", number(a)),
        BuiltinCall::MathAbs => format!("Math.abs({})", number(a)),
        BuiltinCall::MathMin => format!("Math.min({}, {})", number(a), number(b)),
        BuiltinCall::MathMax => format!("Math.max({}, {})", number(a), number(b)),
        BuiltinCall::MathPow => format!("Math.pow({}, {})", number(a), number(b)),
        BuiltinCall::NumberIsInteger => config.helper_call(RuntimeHelper::IsInteger, &[a]),
        BuiltinCall::ParseInt => format!("Long.parseLong(Helpers.toString({a}))"),
        BuiltinCall::ParseFloat => number(a),
        BuiltinCall::ToString => format!("String.valueOf({r})"),
        BuiltinCall::ToUpperCase => format!("((String){r}).toUpperCase()"),
        BuiltinCall::ToLowerCase => format!("((String){r}).toLowerCase()"),
        BuiltinCall::Trim => format!("((String){r}).trim()"),
        BuiltinCall::Shift => format!("(({LIST}){r}).remove(0)"),
        BuiltinCall::Pop => format!("(({LIST}){r}).remove((({LIST}){r}).size() - 1)"),
        BuiltinCall::Reverse => format!("java.util.Collections.reverse(({LIST}){r})"),
        BuiltinCall::Push => format!("(({LIST}){r}).add({})", args.joined()),
        BuiltinCall::Includes => format!("(({LIST}){r}).contains({a})"),
        BuiltinCall::IndexOf => config.helper_call(RuntimeHelper::GetIndexOf, &[r, a]),
        BuiltinCall::Join => format!("String.join((String){a}, (java.util.List<String>){r})"),
        BuiltinCall::Split => format!(
            "new java.util.ArrayList<Object>(java.util.Arrays.asList(((String){r}).split((String){a})))"
        ),
        BuiltinCall::StartsWith => format!("((String){r}).startsWith((String){a})"),
        BuiltinCall::EndsWith => format!("((String){r}).endsWith((String){a})"),
        BuiltinCall::Concat => config.helper_call(RuntimeHelper::Concat, &[r, a]),
        BuiltinCall::ToFixed => config.helper_call(RuntimeHelper::ToFixed, &[r, a]),
        BuiltinCall::Search => config.helper_call(RuntimeHelper::Search, &[r, a]),
        BuiltinCall::Slice => {
            let end = if args.args.len() > 1 { b } else { "null" };
            config.helper_call(RuntimeHelper::Slice, &[r, a, end])
        }
        BuiltinCall::Replace => config.helper_call(RuntimeHelper::Replace, &[r, a, b]),
        BuiltinCall::ReplaceAll => config.helper_call(RuntimeHelper::ReplaceAll, &[r, a, b]),
        BuiltinCall::PadStart => config.helper_call(RuntimeHelper::PadStart, &[r, a, b]),
        BuiltinCall::PadEnd => config.helper_call(RuntimeHelper::PadEnd, &[r, a, b]),
    };
    Some(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use polyglot_syntax::builder::AstBuilder;
    use polyglot_syntax::{Ast, NoTypeInfo};

    use super::*;

    fn print(ast: Ast) -> String {
        let spec = backend();
        Printer::new(ast, &spec, &NoTypeInfo).print_file().unwrap().0
    }

    #[test]
    fn super_call_is_hoisted_to_the_top() {
        let mut b = AstBuilder::new();
        let a = b.param("a");
        let one = b.num("1");
        let first = b.let_("x", Some(one));
        let sup = b.super_();
        let a_ref = b.ident("a");
        let call = b.call(sup, vec![a_ref]);
        let super_stmt = b.expr_stmt(call);
        let ctor = b.constructor(vec![a], vec![first, super_stmt]);
        let base = b.class("Base", None, vec![]);
        let derived = b.class("Derived", Some("Base"), vec![ctor]);
        let out = print(b.finish(vec![base, derived]));
        assert!(
            out.contains("public Derived(Object a) {\n        super(a);\n        Object x = 1;\n    }"),
            "{out}"
        );
    }

    #[test]
    fn this_inside_object_literal_names_the_class() {
        let mut b = AstBuilder::new();
        let this = b.this();
        let obj = b.object(vec![("owner", this)]);
        let ret = b.ret(Some(obj));
        let method = b.method("snapshot", vec![], vec![ret]);
        let class = b.class("Market", None, vec![method]);
        let out = print(b.finish(vec![class]));
        assert!(out.contains("put(\"owner\", Market.this);"), "{out}");
    }

    #[test]
    fn builtins_cast_through_helpers() {
        let config = config();
        let printed = ["x".to_string()];
        let args = BuiltinArgs {
            receiver: Some("name"),
            args: &printed,
        };
        assert_eq!(
            print_builtin(&config, BuiltinCall::StartsWith, &args).as_deref(),
            Some("((String)name).startsWith((String)x)")
        );
        assert_eq!(
            print_builtin(&config, BuiltinCall::IndexOf, &args).as_deref(),
            Some("Helpers.getIndexOf(name, x)")
        );
    }
}
