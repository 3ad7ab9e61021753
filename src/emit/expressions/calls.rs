//! Call lowering.
//!
//! Resolution order for `callee(args)`:
//!
//! 1. `super(...)` prints as the backend's super-constructor call,
//! 2. a recognized built-in (by callee shape and argument count) goes to the backend's built-in printer,
//! 3. a dotted callee listed in the call replacements is renamed,
//! 4. `obj[name](...)`, and `this.name(...)` resolved to a signature without declaration, go through the dynamic
//!    call helper when the backend has one,
//! 5. anything else prints as written.

use polyglot_core::lang::builtins::{CallShape, classify, is_well_known_namespace};
use polyglot_core::lang::tokens::Token;
use polyglot_syntax::{NodeId, NodeKind, SyntaxKind};

use crate::backend::BuiltinArgs;
use crate::emit::errors::{EmitResult, WarningKind};
use crate::emit::Printer;

impl Printer<'_> {
    pub(crate) fn print_call(&mut self, id: NodeId, callee: NodeId, args: &[NodeId], indent: usize) -> EmitResult<String> {
        let callee_kind = self.kind(callee)?;
        if matches!(callee_kind, NodeKind::Super) {
            let args = self.print_args(args, indent)?;
            return Ok(format!("{}{})", self.tok(Token::SuperCallOpen), args.join(", ")));
        }

        if let Some(out) = self.print_builtin_call(id, &callee_kind, args, indent)? {
            return Ok(out);
        }

        if let Some(path) = self.dotted_path(callee)
            && let Some(replacement) = self.config().call_replacements.get(&path)
        {
            let args = self.print_args(args, indent)?;
            return Ok(format!("{}({})", replacement, args.join(", ")));
        }

        if let Some(out) = self.print_dynamic_call(id, &callee_kind, args, indent)? {
            return Ok(out);
        }

        let callee_text = self.print(callee, indent)?;
        let args = self.print_args(args, indent)?;
        Ok(format!("{}({})", callee_text, args.join(", ")))
    }

    fn print_builtin_call(
        &mut self,
        id: NodeId,
        callee: &NodeKind,
        args: &[NodeId],
        indent: usize,
    ) -> EmitResult<Option<String>> {
        let (shape, object) = match callee {
            NodeKind::Identifier { name } => (CallShape::Free(name), None),
            NodeKind::PropertyAccess { object, name } => (
                CallShape::Member {
                    receiver: self.ast().identifier_name(*object),
                    member: name,
                },
                Some(*object),
            ),
            _ => return Ok(None),
        };
        let Some(builtin) = classify(shape, args.len()) else {
            if let CallShape::Member {
                receiver: Some(namespace),
                member,
            } = shape
                && is_well_known_namespace(namespace)
                && self.class_decl(namespace).is_none()
            {
                let dotted = format!("{namespace}.{member}");
                if !self.config().call_replacements.contains_key(&dotted) {
                    self.warn(
                        WarningKind::UnrecognizedBuiltinCall,
                        id,
                        format!("`{dotted}` with {} argument(s) has no rewrite rule", args.len()),
                    );
                }
            }
            return Ok(None);
        };
        let receiver = match object {
            Some(object) => Some(self.print(object, indent)?),
            None => None,
        };
        let printed = self.print_args(args, indent)?;
        let call = BuiltinArgs {
            receiver: receiver.as_deref(),
            args: &printed,
        };
        Ok(self.backend().print_builtin(builtin, &call))
    }

    fn print_dynamic_call(
        &mut self,
        id: NodeId,
        callee: &NodeKind,
        args: &[NodeId],
        indent: usize,
    ) -> EmitResult<Option<String>> {
        let open = self.tok(Token::DynamicCallOpen);
        if open.is_empty() {
            return Ok(None);
        }
        let (object, key) = match callee {
            NodeKind::ElementAccess { object, index } => (self.print(*object, indent)?, self.print(*index, indent)?),
            NodeKind::PropertyAccess { object, name } if self.ast().tag(*object) == Some(SyntaxKind::This) => {
                let undeclared = self
                    .types()
                    .resolved_signature(id)
                    .is_some_and(|signature| signature.declaration.is_none());
                if !undeclared {
                    return Ok(None);
                }
                (self.print(*object, indent)?, self.quote(name))
            }
            _ => return Ok(None),
        };
        let args = self.print_args(args, indent)?;
        Ok(Some(format!(
            "{}{}, {}, {}{}{})",
            open,
            object,
            key,
            self.tok(Token::ArgsArrayOpen),
            args.join(", "),
            self.tok(Token::ArgsArrayClose)
        )))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use polyglot_syntax::builder::AstBuilder;
    use polyglot_syntax::types::SignatureInfo;
    use polyglot_syntax::{Ast, NoTypeInfo, TypeQuery, TypeTable};

    use crate::backend::{BackendId, BackendSpec};
    use crate::emit::{Printer, Warning, WarningKind};

    fn run(ast: Ast, id: BackendId, types: &dyn TypeQuery) -> (String, Vec<Warning>) {
        let spec = BackendSpec::for_id(id);
        Printer::new(ast, &spec, types).print_file().unwrap()
    }

    #[test]
    fn builtins_are_rewritten_per_backend() {
        let mut b = AstBuilder::new();
        let items = b.ident("items");
        let x = b.ident("x");
        let push = b.method_call(items, "push", vec![x]);
        let stmt = b.expr_stmt(push);
        let ast = b.finish(vec![stmt]);
        assert_eq!(run(ast.clone(), BackendId::Python, &NoTypeInfo).0, "items.append(x)");
        assert_eq!(run(ast, BackendId::Php, &NoTypeInfo).0, "$items[] = $x;");
    }

    #[test]
    fn argument_count_selects_rewrite() {
        let mut b = AstBuilder::new();
        let math = b.ident("Math");
        let a = b.ident("a");
        let c = b.ident("b");
        let min = b.method_call(math, "min", vec![a, c]);
        let stmt = b.expr_stmt(min);
        assert_eq!(run(b.finish(vec![stmt]), BackendId::Python, &NoTypeInfo).0, "min(a, b)");
    }

    #[test]
    fn unknown_namespace_member_warns_and_passes_through() {
        let mut b = AstBuilder::new();
        let math = b.ident("Math");
        let x = b.ident("x");
        let call = b.method_call(math, "sqrt", vec![x]);
        let stmt = b.expr_stmt(call);
        let (out, warnings) = run(b.finish(vec![stmt]), BackendId::Python, &NoTypeInfo);
        assert_eq!(out, "Math.sqrt(x)");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::UnrecognizedBuiltinCall);
        assert_eq!(warnings[0].node, call);
    }

    #[test]
    fn call_replacements_rename_callee() {
        let mut b = AstBuilder::new();
        let console = b.ident("console");
        let msg = b.string("hi");
        let call = b.method_call(console, "log", vec![msg]);
        let stmt = b.expr_stmt(call);
        let ast = b.finish(vec![stmt]);
        assert_eq!(run(ast.clone(), BackendId::Java, &NoTypeInfo).0, "System.out.println(\"hi\");");
        assert_eq!(run(ast, BackendId::Python, &NoTypeInfo).0, "print(\"hi\")");
    }

    #[test]
    fn super_constructor_call() {
        let mut b = AstBuilder::new();
        let sup = b.super_();
        let a = b.ident("a");
        let call = b.call(sup, vec![a]);
        let stmt = b.expr_stmt(call);
        let ast = b.finish(vec![stmt]);
        assert_eq!(run(ast.clone(), BackendId::Python, &NoTypeInfo).0, "super().__init__(a)");
        assert_eq!(run(ast, BackendId::Php, &NoTypeInfo).0, "parent::__construct($a);");
    }

    #[test]
    fn dynamic_calls_use_helper() {
        let mut b = AstBuilder::new();
        let this = b.this();
        let callee = b.prop(this, "fetchTicker");
        let sym = b.string("BTC");
        let call = b.call(callee, vec![sym]);
        let stmt = b.expr_stmt(call);
        let ast = b.finish(vec![stmt]);
        let types = TypeTable::new().with_signature(call, SignatureInfo::default());
        assert_eq!(
            run(ast.clone(), BackendId::Java, &types).0,
            "Helpers.callDynamically(this, \"fetchTicker\", new Object[] { \"BTC\" });"
        );
        assert_eq!(run(ast, BackendId::Java, &NoTypeInfo).0, "this.fetchTicker(\"BTC\");");
    }
}
