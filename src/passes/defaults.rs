//! Parameter lists and default-parameter emulation.
//!
//! Targets with native defaults print `name = default` inline. Targets without them replace the defaulted suffix of
//! the parameter list with one variadic parameter and read each defaulted value back in the prologue:
//!
//! ```text
//! fetch(a, b = 1, c = 2)   ==>   fetch(Object a, Object... optionalArgs) {
//!                                    Object b = Helpers.getArg(optionalArgs, 0, 1);
//!                                    Object c = Helpers.getArg(optionalArgs, 1, 2);
//! ```
//!
//! ## Notes
//! - Defaulted parameters (an initializer or a `?` marker) are contiguous at the end of the list, as in the source
//!   language. A required parameter after a defaulted one is still printed in the signature.
//! - Accessor indices count from the first defaulted parameter.

use polyglot_core::lang::tokens::Token;
use polyglot_syntax::ast::TypeAnnotation;
use polyglot_syntax::{NodeId, NodeKind};

use super::captures::alias_name;
use super::overrides::OverrideDescriptor;
use crate::backend::TypePosition;
use crate::emit::Printer;
use crate::emit::errors::EmitResult;

/// Printed parameter list of one callable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterList {
    /// Parameters as they appear in the signature.
    pub signature: Vec<String>,
    /// Statements that must run before the body (default accessors, null-coalescing assignments).
    pub prologue: Vec<String>,
    /// Rebinds of renamed parameters, printed inside a wrapped async body.
    pub rebinds: Vec<String>,
}

struct ParamInfo {
    id: NodeId,
    name: String,
    ty: Option<TypeAnnotation>,
    initializer: Option<NodeId>,
    optional: bool,
}

impl ParamInfo {
    fn is_defaulted(&self) -> bool {
        self.initializer.is_some() || self.optional
    }
}

impl Printer<'_> {
    /// Print a parameter list.
    ///
    /// With `rename_reassigned`, parameters reassigned in the (already printed) body are renamed to their alias in
    /// the signature and rebound under their own name inside the body.
    pub fn print_parameters(
        &mut self,
        params: &[NodeId],
        overrides: Option<&OverrideDescriptor>,
        rename_reassigned: bool,
        indent: usize,
    ) -> EmitResult<ParameterList> {
        let mut infos = Vec::with_capacity(params.len());
        for (i, &id) in params.iter().enumerate() {
            let NodeKind::Parameter {
                name,
                ty,
                initializer,
                optional,
            } = self.kind(id)?
            else {
                return Err(self.unsupported(id, Some("expected a parameter".into())));
            };
            let ty = ty.or_else(|| overrides.and_then(|o| o.params.get(i).cloned().flatten()));
            infos.push(ParamInfo {
                id,
                name,
                ty,
                initializer,
                optional,
            });
        }

        let mut list = ParameterList::default();
        let emulate = !self.caps().native_default_params && infos.iter().any(ParamInfo::is_defaulted);
        let rebind_template = self.tok(Token::ParamRebind);
        let mut defaulted_index = 0usize;

        for info in &infos {
            let emulated = emulate && info.is_defaulted();
            let mut name = self.variable_name(&info.name);
            // an emulated default is already a fresh local declared by its accessor
            if rename_reassigned && !emulated && !rebind_template.is_empty() && self.ctx.is_reassigned(&info.name) {
                let alias = self.ctx.fresh_alias(&alias_name(&info.name));
                let alias = self.variable_name(&alias);
                list.rebinds.push(
                    self.config()
                        .render(Token::ParamRebind, &[("name", &name), ("alias", &alias)]),
                );
                name = alias;
            }
            let ty = self.parameter_type(info.id, info.ty.as_ref());

            if emulated {
                let default = match info.initializer {
                    Some(init) => self.print(init, indent)?,
                    None => self.tok(Token::Undefined).to_string(),
                };
                let index = defaulted_index.to_string();
                list.prologue.push(self.config().render(
                    Token::OptionalArgAccessor,
                    &[("name", &name), ("index", &index), ("default", &default)],
                ));
                defaulted_index += 1;
                continue;
            }

            let mut printed = self.typed_name(&name, &ty);
            if info.is_defaulted() {
                let default = self.print_native_default(info, &name, &mut list.prologue, indent)?;
                printed.push_str(self.tok(Token::DefaultValueSeparator));
                printed.push_str(&default);
            }
            list.signature.push(printed);
        }

        if emulate {
            list.signature.push(self.tok(Token::OptionalArgsParam).to_string());
        }
        Ok(list)
    }

    /// `Type name`, `name: Type` or `name`, by the backend's type position.
    pub fn typed_name(&self, name: &str, ty: &str) -> String {
        if ty.is_empty() {
            return name.to_string();
        }
        match self.caps().type_position {
            TypePosition::Prefix => format!("{ty} {name}"),
            TypePosition::Suffix => format!("{}{}{}", name, self.tok(Token::ParamTypeSeparator), ty),
            TypePosition::Omitted => name.to_string(),
        }
    }

    /// Inline default text. Non-constant defaults move to the prologue where the backend asks for it.
    fn print_native_default(
        &mut self,
        info: &ParamInfo,
        name: &str,
        prologue: &mut Vec<String>,
        indent: usize,
    ) -> EmitResult<String> {
        let Some(init) = info.initializer else {
            return Ok(self.tok(Token::Null).to_string());
        };
        let default = self.print(init, indent)?;
        let non_constant = matches!(
            self.kind(init)?,
            NodeKind::ObjectLiteral { .. } | NodeKind::ArrayLiteral { .. } | NodeKind::New { .. }
        );
        if non_constant && !self.tok(Token::NonConstantDefaultPrologue).is_empty() {
            prologue.push(self.config().render(
                Token::NonConstantDefaultPrologue,
                &[("name", name), ("default", &default)],
            ));
            return Ok(self.tok(Token::Null).to_string());
        }
        Ok(default)
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
    use crate::config::BackendOptions;
    use crate::emit::Printer;

    fn fetch() -> Ast {
        let mut b = AstBuilder::new();
        let a = b.param("a");
        let one = b.num("1");
        let bp = b.param_default("b", one);
        let two = b.num("2");
        let cp = b.param_default("c", two);
        let a_ref = b.ident("a");
        let b_ref = b.ident("b");
        let sum = b.binary(BinaryOp::Plus, a_ref, b_ref);
        let ret = b.ret(Some(sum));
        let func = b.function("fetch", vec![a, bp, cp], None, vec![ret], Modifiers::default());
        b.finish(vec![func])
    }

    fn print(ast: Ast, spec: &BackendSpec) -> String {
        Printer::new(ast, spec, &NoTypeInfo).print_file().unwrap().0
    }

    #[test]
    fn java_emulates_trailing_defaults() {
        let ast = fetch();
        let out = print(ast, &BackendSpec::for_id(BackendId::Java));
        assert_eq!(
            out,
            "public static Object fetch(Object a, Object... optionalArgs) {\n    \
             Object b = Helpers.getArg(optionalArgs, 0, 1);\n    \
             Object c = Helpers.getArg(optionalArgs, 1, 2);\n    \
             return Helpers.add(a, b);\n}"
        );
    }

    #[test]
    fn native_defaults_print_inline() {
        let ast = fetch();
        assert_eq!(
            print(ast.clone(), &BackendSpec::for_id(BackendId::Python)),
            "def fetch(a, b=1, c=2):\n    return a + b"
        );
        assert_eq!(
            print(ast, &BackendSpec::for_id(BackendId::Php)),
            "function fetch($a, $b = 1, $c = 2) {\n    return $a + $b;\n}"
        );
    }

    #[test]
    fn emulation_can_be_forced() {
        let ast = fetch();
        let spec = BackendSpec::for_id(BackendId::Php)
            .with_options(&BackendOptions::new().with_forced_optional_emulation(true));
        assert_eq!(
            print(ast, &spec),
            "function fetch($a, ...$optionalArgs) {\n    \
             $b = getArg($optionalArgs, 0, 1);\n    \
             $c = getArg($optionalArgs, 1, 2);\n    \
             return $a + $b;\n}"
        );
    }

    #[test]
    fn csharp_moves_non_constant_defaults_to_prologue() {
        let mut b = AstBuilder::new();
        let empty = b.object(vec![]);
        let params = b.param_default("params", empty);
        let p_ref = b.ident("params");
        let ret = b.ret(Some(p_ref));
        let func = b.function("request", vec![params], None, vec![ret], Modifiers::default());
        let out = print(b.finish(vec![func]), &BackendSpec::for_id(BackendId::CSharp));
        assert_eq!(
            out,
            "public static object request(object parameters = null)\n{\n    parameters ??= new Dictionary<string, object>() {};\n    return parameters;\n}"
        );
    }
}
