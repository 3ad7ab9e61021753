//! Go backend.
//!
//! Values are `interface{}` and operators go through exported helper functions (`Add`, `IsTrue`, `GetValue`).
//! Classes print as a struct embedding its parent, a `New<Class>` constructor function and methods with a pointer
//! receiver named `this`, so member access reads the same as in the source.
//!
//! ## Notes
//! - Async functions return a `<-chan interface{}` produced by `PromiseFrom`; `await x` receives from it.
//! - Exceptions do not exist: `try` is unsupported and `throw` panics.

use polyglot_core::lang::builtins::BuiltinCall;
use polyglot_core::lang::helpers::{HelperCase, HelperNaming, RuntimeHelper};
use polyglot_core::lang::tokens::Token;
use polyglot_syntax::{NodeId, NodeKind, SyntaxKind};

use super::{BackendConfig, BackendId, BackendSpec, BuiltinArgs, Capabilities, TypePosition};
use crate::emit::errors::EmitResult;
use crate::emit::{FunctionSpec, Printer, Scope};

const HELPERS: HelperNaming = HelperNaming {
    prefix: "",
    case: HelperCase::Pascal,
};

const ANY: &str = "interface{}";
const MAP: &str = "map[string]interface{}";
const LIST: &str = "[]interface{}";

pub fn config() -> BackendConfig {
    BackendConfig::new(BackendId::Go)
        .with_helper_wrappers(HELPERS)
        .with_capabilities(Capabilities {
            requires_call_expression_cast: true,
            native_default_params: false,
            native_for_loops: true,
            requires_capture_immutability: false,
            supports_truthy_values: false,
            native_async: false,
            element_set_lowering: true,
            infer_variable_types: false,
            infer_parameter_types: false,
            type_position: TypePosition::Suffix,
            brace_on_new_line: false,
            capitalize_members: true,
            uncamel_case: false,
        })
        .with_tokens([
            // statements
            (Token::LineTerminator, ""),
            (Token::ConditionOpen, ""),
            (Token::ConditionClose, ""),
            (Token::While, "for"),
            (Token::InfiniteLoop, "for"),
            (Token::ForInitKeyword, ""),
            (Token::ForInitAssign, " := "),
            (Token::ThrowOpen, "panic("),
            (Token::ThrowClose, ")"),
            (Token::Try, ""),
            // expressions
            (Token::New, "New"),
            (Token::Null, "nil"),
            (Token::Undefined, "nil"),
            (Token::StrictEquals, "=="),
            (Token::StrictNotEquals, "!="),
            (Token::ConditionalTemplate, "Ternary({cond}, {then}, {else})"),
            (Token::DeleteTemplate, "Remove({object}, {key})"),
            (Token::TypeOfTemplate, "TypeOf({expr})"),
            (Token::InstanceOfOpen, "InstanceOf("),
            (Token::InstanceOf, ", "),
            (Token::InstanceOfClose, ")"),
            (Token::AwaitOpen, "<-"),
            (Token::AwaitClose, ""),
            (Token::StringLengthOpen, "len("),
            (Token::StringLengthClose, ".(string))"),
            (Token::ElementSetOpen, "AddElementToObject("),
            (Token::ElementSetClose, ")"),
            (Token::DynamicCallOpen, "CallDynamically("),
            (Token::ArgsArrayOpen, "[]interface{}{"),
            (Token::ArgsArrayClose, "}"),
            // declarations
            (Token::VarKeyword, "var"),
            (Token::ConstKeyword, "var"),
            (Token::FunctionKeyword, "func"),
            (Token::ParamTypeSeparator, " "),
            (Token::ReturnTypeSeparator, " "),
            (Token::ParamRebind, ""),
            (Token::OptionalArgsParam, "optionalArgs ...interface{}"),
            (
                Token::OptionalArgAccessor,
                "{name} := GetArg(optionalArgs, {index}, {default})",
            ),
            // async
            (Token::AsyncBodyOpen, "return PromiseFrom(func() interface{} {"),
            (Token::AsyncBodyEpilogue, "return nil"),
            (Token::AsyncBodyClose, "})"),
            // types
            (Token::DefaultType, ANY),
            (Token::DefaultParameterType, ANY),
            (Token::DefaultReturnType, ANY),
            (Token::VoidKeyword, ""),
            (Token::StringKeyword, "string"),
            (Token::BooleanKeyword, "bool"),
            (Token::IntegerKeyword, "int"),
            (Token::LongKeyword, "int64"),
            (Token::FloatKeyword, "float64"),
            (Token::ArrayKeyword, LIST),
            (Token::ObjectKeyword, MAP),
            (Token::PromiseOpen, "<-chan "),
            (Token::PromiseClose, ""),
            (Token::PromiseVoid, "<-chan interface{}"),
            // literals
            (Token::ObjectOpen, "map[string]interface{}{"),
            (Token::ObjectClose, "}"),
            (Token::PropertyAssignmentClose, ","),
            (Token::PropertySeparator, ""),
            (Token::ArrayOpen, "[]interface{}{"),
            (Token::ArrayClose, "}"),
        ])
        .with_types([("Dict", MAP), ("List", LIST), ("Int", "int64"), ("Str", "string")])
        .with_reserved_words([
            ("type", "typeVar"),
            ("func", "funcVar"),
            ("range", "rangeVar"),
            ("map", "mapVar"),
            ("chan", "chanVar"),
            ("go", "goVar"),
            ("select", "selectVar"),
            ("package", "packageVar"),
            ("interface", "interfaceVar"),
            ("default", "defaultVar"),
        ])
        .with_call_replacements([("console.log", "fmt.Println")])
        .with_property_replacements([("Number.MAX_SAFE_INTEGER", "math.MaxInt64")])
        .with_typeof_checks([
            ("string", "IsString({expr})"),
            ("number", "IsNumber({expr})"),
            ("boolean", "IsBool({expr})"),
            ("object", "IsObject({expr})"),
        ])
}

pub fn backend() -> BackendSpec {
    BackendSpec::new(config(), print_builtin)
        .with_handler(SyntaxKind::ClassDeclaration, print_class)
        .with_handler(SyntaxKind::MethodDeclaration, print_method)
        .with_handler(SyntaxKind::Super, print_super)
        .with_handler(SyntaxKind::Call, print_call)
        .with_handler(SyntaxKind::ArrowFunction, print_arrow)
}

// ============================================================================
// Classes
// ============================================================================

/// Struct, constructor function and top-level methods, separated by blank lines.
fn print_class(p: &mut Printer<'_>, id: NodeId, indent: usize) -> EmitResult<Option<String>> {
    let NodeKind::ClassDeclaration { name, extends, members } = p.kind(id)? else {
        return Ok(None);
    };
    p.in_scope(Scope::class(&name), |p| {
        let pad = p.ind(indent);
        let field_pad = p.ind(indent + 1);
        let mut fields = Vec::new();
        let mut initializers = Vec::new();
        let mut constructor = None;
        let mut methods = Vec::new();

        if let Some(parent) = &extends {
            fields.push(format!("{field_pad}{parent}"));
        }
        for &member in &members {
            match p.kind(member)? {
                NodeKind::PropertyDeclaration {
                    name: field,
                    ty,
                    initializer,
                    ..
                } => {
                    let field = p.member_name(&field);
                    let ty = p.variable_type(member, ty.as_ref(), initializer);
                    fields.push(format!("{field_pad}{field} {ty}"));
                    if let Some(init) = initializer {
                        let value = p.print(init, indent + 1)?;
                        initializers.push(format!("this.{field} = {value}"));
                    }
                }
                NodeKind::Constructor { params, body } => constructor = Some((member, params, body)),
                _ => methods.push(p.print(member, indent)?),
            }
        }

        let mut out = format!("{pad}type {name} struct");
        if fields.is_empty() {
            out.push_str(" {}");
        } else {
            out.push_str(&format!(" {{\n{}\n{pad}}}", fields.join("\n")));
        }

        let mut prologue = vec![format!("this := &{name}{{}}")];
        prologue.extend(initializers);
        let (node, params, body) = match constructor {
            Some((node, params, body)) => (node, params, p.optional_body(body)?.unwrap_or_default()),
            None => (id, Vec::new(), Vec::new()),
        };
        let scope = p.ctx.scope().method("constructor");
        let parts = p.in_scope(scope, |p| {
            p.function_parts(
                FunctionSpec {
                    node,
                    params: &params,
                    body: Some(body),
                    prologue,
                    epilogue: vec!["return this".to_string()],
                    ..FunctionSpec::default()
                },
                indent,
            )
        })?;
        out.push_str(&format!(
            "\n\n{pad}func New{name}({}) *{name}{}",
            parts.params.join(", "),
            parts.body
        ));

        for method in methods {
            out.push_str("\n\n");
            out.push_str(&method);
        }
        Ok(Some(out))
    })
}

/// `func (this *Class) Name(..)`; static methods become `func ClassName(..)`.
fn print_method(p: &mut Printer<'_>, id: NodeId, indent: usize) -> EmitResult<Option<String>> {
    let NodeKind::MethodDeclaration {
        name,
        params,
        return_type,
        body,
        modifiers,
    } = p.kind(id)?
    else {
        return Ok(None);
    };
    let Some(class) = p.ctx.current_class().map(str::to_string) else {
        return Ok(None);
    };
    let scope = p.ctx.scope().method(&name);
    p.in_scope(scope, |p| {
        let descriptor = p.override_descriptor(id, &name, &params, return_type.as_ref())?;
        let parts = p.function_parts(
            FunctionSpec {
                node: id,
                params: &params,
                return_type: return_type.as_ref(),
                body: p.optional_body(body)?,
                is_async: modifiers.is_async,
                overrides: descriptor.as_ref(),
                ..FunctionSpec::default()
            },
            indent,
        )?;
        let (_, after) = p.return_type_slots(&parts.return_type);
        let method = p.member_name(&name);
        let head = if modifiers.is_static {
            format!("func {class}{method}")
        } else {
            format!("func (this *{class}) {method}")
        };
        Ok(Some(format!(
            "{}{}({}){}{}",
            p.ind(indent),
            head,
            parts.params.join(", "),
            after,
            parts.body
        )))
    })
}

/// The embedded parent struct.
fn print_super(p: &mut Printer<'_>, _id: NodeId, _indent: usize) -> EmitResult<Option<String>> {
    let parent = p.ctx.current_class().and_then(|class| p.class_parent(class));
    Ok(parent.map(|parent| format!("this.{parent}")))
}

/// `super(args)` re-initializes the embedded parent.
fn print_call(p: &mut Printer<'_>, id: NodeId, indent: usize) -> EmitResult<Option<String>> {
    let NodeKind::Call { callee, args } = p.kind(id)? else {
        return Ok(None);
    };
    if p.tag(callee)? != SyntaxKind::Super {
        return Ok(None);
    }
    let Some(parent) = p.ctx.current_class().and_then(|class| p.class_parent(class)) else {
        return Err(p.unsupported(id, Some("`super(...)` outside a derived class".into())));
    };
    let args = p.print_args(&args, indent)?;
    Ok(Some(format!("this.{parent} = *New{parent}({})", args.join(", "))))
}

/// Function literals need full signatures.
fn print_arrow(p: &mut Printer<'_>, id: NodeId, indent: usize) -> EmitResult<Option<String>> {
    let NodeKind::ArrowFunction { params, body, modifiers } = p.kind(id)? else {
        return Ok(None);
    };
    let list = p.print_parameters(&params, None, false, indent)?;
    let head = format!("func({})", list.signature.join(", "));
    if p.tag(body)? != SyntaxKind::Block {
        let expr = p.print(body, indent)?;
        return Ok(Some(format!("{head} {ANY} {{ return {expr} }}")));
    }
    let statements = p.body_statements(body)?;
    let return_type = p.return_type_text(None, Some(&statements), modifiers.is_async);
    let (_, after) = p.return_type_slots(&return_type);
    let mut inner = p.lines(&list.prologue, indent + 1);
    inner.push_str(&p.print_statements(&statements, indent + 1)?);
    Ok(Some(format!("{head}{after}{}", p.wrap_block(indent, &inner))))
}

fn print_builtin(config: &BackendConfig, call: BuiltinCall, args: &BuiltinArgs<'_>) -> Option<String> {
    let (r, a, b) = (args.receiver(), args.arg(0), args.arg(1));
    let out = match call {
        BuiltinCall::DateNow => "time.Now().UnixMilli()".to_string(),
        BuiltinCall::JsonParse => config.helper_call(RuntimeHelper::ParseJson, &[a]),
        BuiltinCall::JsonStringify => config.helper_call(RuntimeHelper::Stringify, &[a]),
        BuiltinCall::ArrayIsArray => format!("IsArray({a})"),
        BuiltinCall::ObjectKeys => format!("ObjectKeys({a})"),
        BuiltinCall::ObjectValues => format!("ObjectValues({a})"),
        BuiltinCall::PromiseAll => format!("<-{}", config.helper_call(RuntimeHelper::PromiseAll, &[a])),
        BuiltinCall::MathRound => format!("math.Round(ToFloat64({a}))"),
        BuiltinCall::MathFloor => format!("math.Floor(ToFloat64({a}))"),
        BuiltinCall::MathCeil => format!("math.Ceil(ToFloat64({a}))"),
        BuiltinCall::MathAbs => format!("math.Abs(ToFloat64({a}))"),
        BuiltinCall::MathMin => format!("math.Min(ToFloat64({a}), ToFloat64({b}))"),
        BuiltinCall::MathMax => format!("math.Max(ToFloat64({a}), ToFloat64({b}))"),
        BuiltinCall::MathPow => format!("math.Pow(ToFloat64({a}), ToFloat64({b}))"),
        BuiltinCall::NumberIsInteger => config.helper_call(RuntimeHelper::IsInteger, &[a]),
        BuiltinCall::ParseInt => format!("ParseInt({a})"),
        BuiltinCall::ParseFloat => format!("ParseFloat({a})"),
        BuiltinCall::ToString => format!("ToString({r})"),
        BuiltinCall::ToUpperCase => format!("strings.ToUpper(ToString({r}))"),
        BuiltinCall::ToLowerCase => format!("strings.ToLower(ToString({r}))"),
        BuiltinCall::Trim => format!("strings.TrimSpace(ToString({r}))"),
        BuiltinCall::Push => format!("{r} = append({r}.([]interface{{}}), {})", args.joined()),
        BuiltinCall::Includes => format!("Contains({r}, {a})"),
        BuiltinCall::IndexOf => config.helper_call(RuntimeHelper::GetIndexOf, &[r, a]),
        BuiltinCall::Join => format!("Join({r}, {a})"),
        BuiltinCall::Split => format!("strings.Split(ToString({r}), ToString({a}))"),
        BuiltinCall::StartsWith => format!("strings.HasPrefix(ToString({r}), ToString({a}))"),
        BuiltinCall::EndsWith => format!("strings.HasSuffix(ToString({r}), ToString({a}))"),
        BuiltinCall::Concat => config.helper_call(RuntimeHelper::Concat, &[r, a]),
        BuiltinCall::ToFixed => config.helper_call(RuntimeHelper::ToFixed, &[r, a]),
        BuiltinCall::Search => config.helper_call(RuntimeHelper::Search, &[r, a]),
        BuiltinCall::Slice => {
            let end = if args.args.len() > 1 { b } else { "nil" };
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
    fn classes_become_struct_constructor_and_methods() {
        let mut b = AstBuilder::new();
        let one = b.num("1");
        let count = b.property("count", None, Some(one));
        let this = b.this();
        let field = b.prop(this, "count");
        let ret = b.ret(Some(field));
        let get = b.method("get", vec![], vec![ret]);
        let base = b.class("Base", None, vec![]);
        let counter = b.class("Counter", Some("Base"), vec![count, get]);
        let out = print(b.finish(vec![base, counter]));
        assert!(out.contains("type Counter struct {\n    Base\n    Count interface{}\n}"), "{out}");
        assert!(
            out.contains("func NewCounter() *Counter {\n    this := &Counter{}\n    this.Count = 1\n    return this\n}"),
            "{out}"
        );
        assert!(
            out.contains("func (this *Counter) Get() interface{} {\n    return this.Count\n}"),
            "{out}"
        );
    }

    #[test]
    fn super_call_reinitializes_parent() {
        let mut b = AstBuilder::new();
        let a = b.param("a");
        let sup = b.super_();
        let a_ref = b.ident("a");
        let call = b.call(sup, vec![a_ref]);
        let stmt = b.expr_stmt(call);
        let ctor = b.constructor(vec![a], vec![stmt]);
        let base = b.class("Base", None, vec![]);
        let derived = b.class("Derived", Some("Base"), vec![ctor]);
        let out = print(b.finish(vec![base, derived]));
        assert!(
            out.contains(
                "func NewDerived(a interface{}) *Derived {\n    this := &Derived{}\n    \
                 this.Base = *NewBase(a)\n    return this\n}"
            ),
            "{out}"
        );
    }

    #[test]
    fn async_functions_return_channels() {
        let mut b = AstBuilder::new();
        let x = b.ident("x");
        let one = b.num("1");
        let sum = b.binary(BinaryOp::Plus, x, one);
        let ret = b.ret(Some(sum));
        let func = b.function("next", vec![], None, vec![ret], Modifiers::asynchronous());
        assert_eq!(
            print(b.finish(vec![func])),
            "func next() <-chan interface{} {\n    return PromiseFrom(func() interface{} {\n        \
             return Add(x, 1)\n    })\n}"
        );
    }

    #[test]
    fn arrows_print_as_function_literals() {
        let mut b = AstBuilder::new();
        let a = b.param("a");
        let a_ref = b.ident("a");
        let arrow = b.arrow(vec![a], a_ref, Modifiers::default());
        let stmt = b.const_("f", Some(arrow));
        assert_eq!(
            print(b.finish(vec![stmt])),
            "var f interface{} = func(a interface{}) interface{} { return a }"
        );
    }
}
