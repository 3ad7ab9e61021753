//! Rust backend.
//!
//! Dynamic values are `serde_json::Value`; object and array literals become `json!` and `vec!`. Classes have no
//! direct counterpart, so a class declaration prints as a struct, a `Default` impl carrying the property
//! initializers, and an inherent impl with a `new` constructor.
//!
//! ## Notes
//! - The source constructor body becomes `init(&mut self, ..)`; `new` builds a default instance and calls it.
//! - A superclass is embedded as a `base` field; `super.x` and `super(..)` go through it.
//! - Methods that assign to a field of `this` take `&mut self`.

use polyglot_core::lang::builtins::BuiltinCall;
use polyglot_core::lang::helpers::{HelperCase, HelperNaming, RuntimeHelper};
use polyglot_core::lang::operators::PrefixOp;
use polyglot_core::lang::tokens::Token;
use polyglot_syntax::ast::{Modifiers, TypeAnnotation};
use polyglot_syntax::{NodeId, NodeKind, SyntaxKind};

use super::{BackendConfig, BackendId, BackendSpec, BuiltinArgs, Capabilities, TypePosition};
use crate::emit::errors::EmitResult;
use crate::emit::{FunctionSpec, Printer, Scope};

const HELPERS: HelperNaming = HelperNaming {
    prefix: "",
    case: HelperCase::Snake,
};

const VALUE: &str = "serde_json::Value";

pub fn config() -> BackendConfig {
    let mut config = BackendConfig::new(BackendId::Rust)
        .with_capabilities(Capabilities {
            native_default_params: false,
            native_for_loops: false,
            native_async: true,
            type_position: TypePosition::Suffix,
            ..Capabilities::default()
        })
        .with_tokens([
            // statements
            (Token::ConditionOpen, ""),
            (Token::ConditionClose, ""),
            (Token::InfiniteLoop, "loop"),
            (Token::ThrowOpen, "panic!(\"{:?}\", "),
            (Token::ThrowClose, ")"),
            (Token::Try, ""),
            // expressions
            (Token::New, ""),
            (Token::NewCallSuffix, "::new"),
            (Token::This, "self"),
            (Token::Super, "self.base"),
            (Token::SuperCallOpen, "self.base.init("),
            (Token::Null, "serde_json::Value::Null"),
            (Token::Undefined, "serde_json::Value::Null"),
            (Token::StrictEquals, "=="),
            (Token::StrictNotEquals, "!="),
            (Token::Increment, " += 1"),
            (Token::Decrement, " -= 1"),
            (Token::InWrapperOpen, "in_op("),
            (Token::InWrapperClose, ")"),
            (Token::ConditionalTemplate, "if {cond} { {then} } else { {else} }"),
            (Token::AwaitOpen, ""),
            (Token::AwaitClose, ".await"),
            (Token::LambdaOpen, "|"),
            (Token::LambdaClose, "|"),
            (Token::LambdaArrow, " "),
            (Token::ArrayLengthOpen, ""),
            (Token::ArrayLengthClose, ".len()"),
            (Token::StringLengthOpen, ""),
            (Token::StringLengthClose, ".len()"),
            // declarations
            (Token::VarKeyword, "let mut"),
            (Token::ConstKeyword, "let"),
            (Token::FunctionModifier, "pub"),
            (Token::FunctionKeyword, "fn"),
            (Token::MethodKeyword, "fn"),
            (Token::MethodAccess, "pub"),
            (Token::PropertyAccessModifier, "pub"),
            (Token::Private, ""),
            (Token::Protected, "pub(crate)"),
            (Token::Static, ""),
            (Token::SelfParam, "&self"),
            (Token::ReturnTypeSeparator, " -> "),
            (Token::OptionalArgsParam, "optional_args: &[serde_json::Value]"),
            (
                Token::OptionalArgAccessor,
                "let {name} = get_arg(optional_args, {index}, {default});",
            ),
            // types
            (Token::DefaultType, ""),
            (Token::DefaultParameterType, VALUE),
            (Token::DefaultReturnType, VALUE),
            (Token::VoidKeyword, ""),
            (Token::StringKeyword, "String"),
            (Token::BooleanKeyword, "bool"),
            (Token::IntegerKeyword, "i32"),
            (Token::LongKeyword, "i64"),
            (Token::FloatKeyword, "f64"),
            (Token::ArrayKeyword, "Vec<serde_json::Value>"),
            (Token::ObjectKeyword, VALUE),
            (Token::PromiseOpen, ""),
            (Token::PromiseClose, ""),
            (Token::PromiseVoid, ""),
            // literals
            (Token::ObjectOpen, "serde_json::json!({"),
            (Token::ObjectClose, "})"),
            (Token::ArrayOpen, "vec!["),
            (Token::ArrayClose, "]"),
        ])
        .with_types([("Dict", VALUE), ("List", "Vec<serde_json::Value>"), ("Int", "i64"), ("Str", "String")])
        .with_reserved_words([
            ("type", "r#type"),
            ("match", "r#match"),
            ("move", "r#move"),
            ("ref", "r#ref"),
            ("impl", "r#impl"),
            ("mod", "r#mod"),
            ("fn", "r#fn"),
            ("loop", "r#loop"),
        ])
        .with_property_replacements([("Number.MAX_SAFE_INTEGER", "i64::MAX")])
        .with_typeof_checks([
            ("string", "{expr}.is_string()"),
            ("number", "{expr}.is_number()"),
            ("boolean", "{expr}.is_boolean()"),
            ("object", "{expr}.is_object()"),
        ]);
    config.helpers = HELPERS;
    config
}

pub fn backend() -> BackendSpec {
    BackendSpec::new(config(), print_builtin)
        .with_handler(SyntaxKind::ClassDeclaration, print_class)
        .with_handler(SyntaxKind::MethodDeclaration, print_method)
        .with_handler(SyntaxKind::Constructor, print_constructor)
        .with_handler(SyntaxKind::Call, print_call)
}

// ============================================================================
// Classes
// ============================================================================

fn print_class(p: &mut Printer<'_>, id: NodeId, indent: usize) -> EmitResult<Option<String>> {
    let NodeKind::ClassDeclaration { name, extends, members } = p.kind(id)? else {
        return Ok(None);
    };
    p.in_scope(Scope::class(&name), |p| {
        let pad = p.ind(indent);
        let field_pad = p.ind(indent + 1);
        let mut fields = Vec::new();
        let mut defaults = Vec::new();
        let mut consts = Vec::new();
        let mut methods = Vec::new();
        let mut has_constructor = false;

        if let Some(parent) = &extends {
            fields.push(format!("{field_pad}pub base: {parent},"));
            defaults.push(format!("{}base: Default::default(),", p.ind(indent + 3)));
        }
        for &member in &members {
            match p.kind(member)? {
                NodeKind::PropertyDeclaration {
                    name: field,
                    ty,
                    initializer,
                    modifiers,
                } => {
                    let ty = field_type(p, member, ty.as_ref(), initializer);
                    let value = field_value(p, initializer, &ty, indent + 3)?;
                    let field = p.member_name(&field);
                    let vis = p.visibility_token(modifiers.visibility, Token::PropertyAccessModifier);
                    if modifiers.is_static {
                        let decl = crate::emit::join_words([vis, "const"]);
                        consts.push(format!("{field_pad}{decl} {field}: {ty} = {value};"));
                    } else {
                        let decl = crate::emit::join_words([vis, field.as_str()]);
                        fields.push(format!("{field_pad}{decl}: {ty},"));
                        defaults.push(format!("{}{field}: {value},", p.ind(indent + 3)));
                    }
                }
                NodeKind::Constructor { params, .. } => {
                    has_constructor = true;
                    methods.push(print_new(p, &params, indent + 1)?);
                    methods.push(p.print(member, indent + 1)?);
                }
                _ => methods.push(p.print(member, indent + 1)?),
            }
        }
        if !has_constructor {
            methods.insert(
                0,
                format!("{field_pad}pub fn new() -> Self {{\n{}Self::default()\n{field_pad}}}", p.ind(indent + 2)),
            );
        }

        let mut out = format!("{pad}#[derive(Debug, Clone)]\n{pad}pub struct {name}");
        if fields.is_empty() {
            out.push(';');
        } else {
            out.push_str(&format!(" {{\n{}\n{pad}}}", fields.join("\n")));
        }

        let body_pad = p.ind(indent + 2);
        out.push_str(&format!("\n\n{pad}impl Default for {name} {{\n{field_pad}fn default() -> Self {{\n"));
        if defaults.is_empty() {
            out.push_str(&format!("{body_pad}Self {{}}\n"));
        } else {
            out.push_str(&format!("{body_pad}Self {{\n{}\n{body_pad}}}\n", defaults.join("\n")));
        }
        out.push_str(&format!("{field_pad}}}\n{pad}}}"));

        let mut items = consts;
        items.extend(methods);
        out.push_str(&format!("\n\n{pad}impl {name} {{\n{}\n{pad}}}", items.join("\n\n")));
        Ok(Some(out))
    })
}

fn field_type(p: &mut Printer<'_>, id: NodeId, ty: Option<&TypeAnnotation>, initializer: Option<NodeId>) -> String {
    let ty = p.variable_type(id, ty, initializer);
    if ty.is_empty() { VALUE.to_string() } else { ty }
}

/// Field initializer; scalar literals stored in a `Value` go through `json!`.
fn field_value(p: &mut Printer<'_>, initializer: Option<NodeId>, ty: &str, indent: usize) -> EmitResult<String> {
    let Some(init) = initializer else {
        return Ok("Default::default()".to_string());
    };
    let value = p.print(init, indent)?;
    let scalar = match p.kind(init)? {
        NodeKind::NumericLiteral { .. } | NodeKind::StringLiteral { .. } | NodeKind::BooleanLiteral { .. } => true,
        NodeKind::PrefixUnary {
            op: PrefixOp::Negate, ..
        } => true,
        _ => false,
    };
    Ok(if scalar && ty == VALUE {
        format!("serde_json::json!({value})")
    } else if ty == "String" && matches!(p.kind(init)?, NodeKind::StringLiteral { .. }) {
        format!("{value}.to_string()")
    } else {
        value
    })
}

/// `new` builds a default instance and runs the source constructor on it.
fn print_new(p: &mut Printer<'_>, params: &[NodeId], indent: usize) -> EmitResult<String> {
    let mut names = Vec::with_capacity(params.len());
    let mut typed = Vec::with_capacity(params.len());
    for &param in params {
        let NodeKind::Parameter { name, ty, .. } = p.kind(param)? else {
            return Err(p.unsupported(param, Some("expected a parameter".into())));
        };
        let name = p.variable_name(&name);
        let ty = p.parameter_type(param, ty.as_ref());
        typed.push(p.typed_name(&name, &ty));
        names.push(name);
    }
    let pad = p.ind(indent);
    let body = p.ind(indent + 1);
    Ok(format!(
        "{pad}pub fn new({}) -> Self {{\n{body}let mut instance = Self::default();\n{body}instance.init({});\n{body}instance\n{pad}}}",
        typed.join(", "),
        names.join(", ")
    ))
}

// ============================================================================
// Callables
// ============================================================================

struct Callable<'n> {
    id: NodeId,
    name: &'n str,
    receiver: Option<&'n str>,
    params: &'n [NodeId],
    return_type: Option<&'n TypeAnnotation>,
    body: Option<NodeId>,
    modifiers: Modifiers,
}

fn print_callable(p: &mut Printer<'_>, callable: Callable<'_>, indent: usize) -> EmitResult<String> {
    let scope = p.ctx.scope().method(callable.name);
    p.in_scope(scope, |p| {
        let descriptor = p.override_descriptor(callable.id, callable.name, callable.params, callable.return_type)?;
        let parts = p.function_parts(
            FunctionSpec {
                node: callable.id,
                params: callable.params,
                return_type: callable.return_type,
                body: p.optional_body(callable.body)?,
                is_async: callable.modifiers.is_async,
                overrides: descriptor.as_ref(),
                ..FunctionSpec::default()
            },
            indent,
        )?;
        let (_, after) = p.return_type_slots(&parts.return_type);
        let name = p.member_name(callable.name);
        let header = crate::emit::join_words([
            p.visibility_token(callable.modifiers.visibility, Token::MethodAccess),
            p.async_keyword(callable.modifiers.is_async),
            "fn",
            name.as_str(),
        ]);
        let mut params = parts.params;
        if let Some(receiver) = callable.receiver {
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
    let receiver = match (modifiers.is_static, body) {
        (true, _) => None,
        (false, Some(body)) if assigns_to_self(p, body) => Some("&mut self"),
        (false, _) => Some("&self"),
    };
    let callable = Callable {
        id,
        name: &name,
        receiver,
        params: &params,
        return_type: return_type.as_ref(),
        body,
        modifiers,
    };
    print_callable(p, callable, indent).map(Some)
}

fn print_constructor(p: &mut Printer<'_>, id: NodeId, indent: usize) -> EmitResult<Option<String>> {
    let NodeKind::Constructor { params, body } = p.kind(id)? else {
        return Ok(None);
    };
    let callable = Callable {
        id,
        name: "init",
        receiver: Some("&mut self"),
        params: &params,
        return_type: None,
        body,
        modifiers: Modifiers::default(),
    };
    print_callable(p, callable, indent).map(Some)
}

/// Whether the subtree at `id` writes to a field of `this`, outside nested lambdas.
fn assigns_to_self(p: &Printer<'_>, id: NodeId) -> bool {
    let ast = p.ast();
    let targets_self = |target: NodeId| match ast.kind(target) {
        Some(NodeKind::PropertyAccess { object, .. } | NodeKind::ElementAccess { object, .. }) => {
            ast.tag(*object) == Some(SyntaxKind::This)
        }
        _ => false,
    };
    match ast.kind(id) {
        Some(NodeKind::Binary { op, left, .. }) if op.is_assignment() && targets_self(*left) => true,
        Some(NodeKind::PostfixUnary { operand, .. }) if targets_self(*operand) => true,
        Some(NodeKind::PrefixUnary { op, operand }) if op.is_update() && targets_self(*operand) => true,
        Some(NodeKind::ArrowFunction { .. }) | None => false,
        Some(kind) => kind.children().into_iter().any(|child| assigns_to_self(p, child)),
    }
}

// ============================================================================
// Calls
// ============================================================================

/// `console.log(a, b)` → `println!("{:?} {:?}", a, b)`.
fn print_call(p: &mut Printer<'_>, id: NodeId, indent: usize) -> EmitResult<Option<String>> {
    let NodeKind::Call { callee, args } = p.kind(id)? else {
        return Ok(None);
    };
    if p.dotted_path(callee).as_deref() != Some("console.log") {
        return Ok(None);
    }
    let args = p.print_args(&args, indent)?;
    let format = vec!["{:?}"; args.len()].join(" ");
    let mut out = format!("println!(\"{format}\"");
    for arg in args {
        out.push_str(", ");
        out.push_str(&arg);
    }
    out.push(')');
    Ok(Some(out))
}

fn print_builtin(config: &BackendConfig, call: BuiltinCall, args: &BuiltinArgs<'_>) -> Option<String> {
    let (r, a, b) = (args.receiver(), args.arg(0), args.arg(1));
    let out = match call {
        BuiltinCall::DateNow => "std::time::SystemTime::now()\
            .duration_since(std::time::UNIX_EPOCH)\
            .map(|d| d.as_millis() as i64)\
            .unwrap_or_default()"
            .to_string(),
        BuiltinCall::JsonParse => format!("serde_json::from_str::<serde_json::Value>(&{a}).unwrap_or_default()"),
        BuiltinCall::JsonStringify => format!("serde_json::to_string(&{a}).unwrap_or_default()"),
        BuiltinCall::ArrayIsArray => format!("{a}.is_array()"),
        BuiltinCall::ObjectKeys => {
            format!("{a}.as_object().map(|o| o.keys().cloned().collect::<Vec<_>>()).unwrap_or_default()")
        }
        BuiltinCall::ObjectValues => {
            format!("{a}.as_object().map(|o| o.values().cloned().collect::<Vec<_>>()).unwrap_or_default()")
        }
        BuiltinCall::PromiseAll => format!("futures::future::join_all({a}).await"),
        BuiltinCall::MathRound => format!("f64::round({a})"),
        BuiltinCall::MathFloor => format!("f64::floor({a})"),
        BuiltinCall::MathCeil => format!("f64::ceil({a})"),
        BuiltinCall::MathAbs => format!("f64::abs({a})"),
        BuiltinCall::MathMin => format!("f64::min({a}, {b})"),
        BuiltinCall::MathMax => format!("f64::max({a}, {b})"),
        BuiltinCall::MathPow => format!("f64::powf({a}, {b})"),
        BuiltinCall::NumberIsInteger => config.helper_call(RuntimeHelper::IsInteger, &[a]),
        BuiltinCall::ParseInt => format!("{a}.parse::<i64>().unwrap_or_default()"),
        BuiltinCall::ParseFloat => format!("{a}.parse::<f64>().unwrap_or_default()"),
        BuiltinCall::ToString => format!("{r}.to_string()"),
        BuiltinCall::ToUpperCase => format!("{r}.to_uppercase()"),
        BuiltinCall::ToLowerCase => format!("{r}.to_lowercase()"),
        BuiltinCall::Trim => format!("{r}.trim().to_string()"),
        BuiltinCall::Shift => format!("{r}.remove(0)"),
        BuiltinCall::Pop => format!("{r}.pop()"),
        BuiltinCall::Reverse => format!("{r}.reverse()"),
        BuiltinCall::Push if args.args.len() == 1 => format!("{r}.push({a})"),
        BuiltinCall::Push => format!("{r}.extend([{}])", args.joined()),
        BuiltinCall::Includes => format!("{r}.contains(&{a})"),
        BuiltinCall::IndexOf => config.helper_call(RuntimeHelper::GetIndexOf, &[r, a]),
        BuiltinCall::Join => format!("{r}.join({a})"),
        BuiltinCall::Split => format!("{r}.split({a}).collect::<Vec<_>>()"),
        BuiltinCall::StartsWith => format!("{r}.starts_with({a})"),
        BuiltinCall::EndsWith => format!("{r}.ends_with({a})"),
        BuiltinCall::Concat => format!("[{r}, {a}].concat()"),
        BuiltinCall::ToFixed => format!("format!(\"{{:.1$}}\", {r}, {a})"),
        BuiltinCall::Search => config.helper_call(RuntimeHelper::Search, &[r, a]),
        BuiltinCall::Slice if args.args.len() > 1 => format!("{r}[{a}..{b}].to_vec()"),
        BuiltinCall::Slice => format!("{r}[{a}..].to_vec()"),
        BuiltinCall::Replace => format!("{r}.replacen({a}, {b}, 1)"),
        BuiltinCall::ReplaceAll => format!("{r}.replace({a}, {b})"),
        BuiltinCall::PadStart => config.helper_call(RuntimeHelper::PadStart, &[r, a, b]),
        BuiltinCall::PadEnd => config.helper_call(RuntimeHelper::PadEnd, &[r, a, b]),
    };
    Some(out)
}
