//! C# backend.
//!
//! Like Java, values are `object` and operators go through helper methods, but C# has native optional parameters,
//! native `async`/`await` and `var`. Declarations print the type inferred from their initializer where one is
//! evident.
//!
//! ## Notes
//! - Optional parameters must have compile-time constant defaults. An object or array default becomes `= null`
//!   with a `??=` assignment at the top of the body.
//! - A constructor's `super(...)` call moves into the `: base(...)` initializer.

use polyglot_core::lang::builtins::BuiltinCall;
use polyglot_core::lang::helpers::{HelperCase, HelperNaming, RuntimeHelper};
use polyglot_core::lang::tokens::Token;
use polyglot_syntax::{NodeId, NodeKind, SyntaxKind};

use super::{BackendConfig, BackendId, BackendSpec, BuiltinArgs, Capabilities, TypePosition};
use crate::emit::Printer;
use crate::emit::errors::EmitResult;

const HELPERS: HelperNaming = HelperNaming {
    prefix: "",
    case: HelperCase::Camel,
};

const DICT: &str = "Dictionary<string, object>";
const LIST: &str = "List<object>";

pub fn config() -> BackendConfig {
    BackendConfig::new(BackendId::CSharp)
        .with_helper_wrappers(HELPERS)
        .with_capabilities(Capabilities {
            requires_call_expression_cast: true,
            native_default_params: true,
            native_for_loops: true,
            requires_capture_immutability: false,
            supports_truthy_values: false,
            native_async: true,
            element_set_lowering: false,
            infer_variable_types: true,
            infer_parameter_types: false,
            type_position: TypePosition::Prefix,
            brace_on_new_line: true,
            capitalize_members: false,
            uncamel_case: false,
        })
        .with_tokens([
            (Token::Class, "public class"),
            (Token::ExtendsOpen, " : "),
            (Token::ConstructorName, "{class}"),
            (Token::FunctionModifier, "public static"),
            (Token::FunctionKeyword, ""),
            (Token::MethodKeyword, ""),
            (Token::InferredVarKeyword, "var"),
            (Token::ForInitKeyword, "var "),
            (Token::Super, "base"),
            (Token::SuperCallOpen, "base("),
            (Token::DefaultType, "object"),
            (Token::DefaultParameterType, "object"),
            (Token::DefaultReturnType, "object"),
            (Token::VoidKeyword, "void"),
            (Token::StringKeyword, "string"),
            (Token::BooleanKeyword, "bool"),
            (Token::IntegerKeyword, "int"),
            (Token::LongKeyword, "long"),
            (Token::FloatKeyword, "double"),
            (Token::ArrayKeyword, LIST),
            (Token::ObjectKeyword, DICT),
            (Token::PromiseOpen, "Task<"),
            (Token::PromiseClose, ">"),
            (Token::PromiseVoid, "Task"),
            (Token::LongLiteralSuffix, ""),
            (Token::CastTemplate, "(({type}){expr})"),
            (Token::Undefined, "null"),
            (Token::ObjectOpen, "new Dictionary<string, object>() {"),
            (Token::ObjectClose, "}"),
            (Token::PropertyAssignmentOpen, "{ "),
            (Token::PropertyAssignment, ", "),
            (Token::PropertyAssignmentClose, " }"),
            (Token::ArrayOpen, "new List<object>() {"),
            (Token::ArrayClose, "}"),
            (Token::CatchClause, "catch (System.Exception {name})"),
            (Token::DeleteTemplate, "((IDictionary<string, object>){object}).Remove((string){key})"),
            (Token::ElementAssignCastOpen, "((IDictionary<string, object>)"),
            (Token::ElementAssignCastClose, ")"),
            (Token::StringLengthOpen, "((string)"),
            (Token::StringLengthClose, ").Length"),
            (Token::DynamicCallOpen, "callDynamically("),
            (Token::ArgsArrayOpen, "new object[] { "),
            (Token::ArgsArrayClose, " }"),
            (Token::NonConstantDefaultPrologue, "{name} ??= {default};"),
        ])
        .with_types([("Dict", DICT), ("List", LIST), ("Int", "long"), ("Str", "string")])
        .with_reserved_words([
            ("params", "parameters"),
            ("base", "baseValue"),
            ("object", "obj"),
            ("string", "str"),
            ("event", "eventValue"),
        ])
        .with_call_replacements([("console.log", "Console.WriteLine")])
        .with_property_replacements([("Number.MAX_SAFE_INTEGER", "Int64.MaxValue")])
        .with_typeof_checks([
            ("string", "({expr} is string)"),
            ("number", "({expr} is long || {expr} is int || {expr} is double)"),
            ("boolean", "({expr} is bool)"),
            ("object", "({expr} is IDictionary<string, object>)"),
        ])
}

pub fn backend() -> BackendSpec {
    BackendSpec::new(config(), print_builtin).with_handler(SyntaxKind::Constructor, print_constructor)
}

/// `Derived(a) : base(a)`; the super call leaves the body.
fn print_constructor(p: &mut Printer<'_>, id: NodeId, indent: usize) -> EmitResult<Option<String>> {
    let NodeKind::Constructor { params, body } = p.kind(id)? else {
        return Ok(None);
    };
    let Some(mut statements) = p.optional_body(body)? else {
        return Ok(None);
    };
    let Some((index, args)) = p.find_super_call(&statements) else {
        return Ok(None);
    };
    statements.remove(index);
    let args = p.print_args(&args, indent)?;
    let suffix = format!(" : base({})", args.join(", "));
    p.print_constructor_with(id, &params, Some(statements), &suffix, indent)
        .map(Some)
}

fn print_builtin(config: &BackendConfig, call: BuiltinCall, args: &BuiltinArgs<'_>) -> Option<String> {
    let (r, a, b) = (args.receiver(), args.arg(0), args.arg(1));
    let out = match call {
        BuiltinCall::DateNow => "DateTimeOffset.UtcNow.ToUnixTimeMilliseconds()".to_string(),
        BuiltinCall::JsonParse => config.helper_call(RuntimeHelper::ParseJson, &[a]),
        BuiltinCall::JsonStringify => config.helper_call(RuntimeHelper::Stringify, &[a]),
        BuiltinCall::ArrayIsArray => format!("({a} is IList<object>)"),
        BuiltinCall::ObjectKeys => format!("new List<object>(((IDictionary<string, object>){a}).Keys)"),
        BuiltinCall::ObjectValues => format!("new List<object>(((IDictionary<string, object>){a}).Values)"),
        BuiltinCall::PromiseAll => format!("await Task.WhenAll({a})"),
        BuiltinCall::MathRound => format!("Math.Round(Convert.ToDouble({a}))"),
        BuiltinCall::MathFloor => format!("Math.Floor(Convert.ToDouble({a}))"),
        BuiltinCall::MathCeil => format!("Math.Ceiling(Convert.ToDouble({a}))"),
        BuiltinCall::MathAbs => format!("Math.Abs(Convert.ToDouble({a}))"),
        BuiltinCall::MathMin => format!("Math.Min(Convert.ToDouble({a}), Convert.ToDouble({b}))"),
        BuiltinCall::MathMax => format!("Math.Max(Convert.ToDouble({a}), Convert.ToDouble({b}))"),
        BuiltinCall::MathPow => format!("Math.Pow(Convert.ToDouble({a}), Convert.ToDouble({b}))"),
        BuiltinCall::NumberIsInteger => config.helper_call(RuntimeHelper::IsInteger, &[a]),
        BuiltinCall::ParseInt => format!("Convert.ToInt64({a})"),
        BuiltinCall::ParseFloat => format!("Convert.ToDouble({a})"),
        BuiltinCall::ToString => format!("Convert.ToString({r})"),
        BuiltinCall::ToUpperCase => format!("((string){r}).ToUpper()"),
        BuiltinCall::ToLowerCase => format!("((string){r}).ToLower()"),
        BuiltinCall::Trim => format!("((string){r}).Trim()"),
        BuiltinCall::Push => format!("((IList<object>){r}).Add({})", args.joined()),
        BuiltinCall::Includes => format!("((IList<object>){r}).Contains({a})"),
        BuiltinCall::IndexOf => config.helper_call(RuntimeHelper::GetIndexOf, &[r, a]),
        BuiltinCall::Join => format!("string.Join((string){a}, (IList<object>){r})"),
        BuiltinCall::Split => format!("new List<object>(((string){r}).Split((string){a}))"),
        BuiltinCall::StartsWith => format!("((string){r}).StartsWith((string){a})"),
        BuiltinCall::EndsWith => format!("((string){r}).EndsWith((string){a})"),
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
        BuiltinCall::Shift | BuiltinCall::Pop | BuiltinCall::Reverse => return None,
    };
    Some(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use polyglot_syntax::NoTypeInfo;
    use polyglot_syntax::builder::AstBuilder;

    use super::*;

    #[test]
    fn super_call_moves_to_base_initializer() {
        let mut b = AstBuilder::new();
        let a = b.param("a");
        let sup = b.super_();
        let a_ref = b.ident("a");
        let call = b.call(sup, vec![a_ref]);
        let super_stmt = b.expr_stmt(call);
        let ctor = b.constructor(vec![a], vec![super_stmt]);
        let base = b.class("Base", None, vec![]);
        let derived = b.class("Derived", Some("Base"), vec![ctor]);
        let spec = backend();
        let (out, _) = Printer::new(b.finish(vec![base, derived]), &spec, &NoTypeInfo)
            .print_file()
            .unwrap();
        assert_eq!(
            out,
            "public class Base\n{}\n\npublic class Derived : Base\n{\n    public Derived(object a) : base(a)\n    {}\n}"
        );
    }
}
