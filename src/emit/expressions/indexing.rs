//! Property and element access.

use polyglot_core::lang::tokens::Token;
use polyglot_syntax::{NodeId, NodeKind, SyntaxKind};

use crate::emit::Printer;
use crate::emit::errors::EmitResult;

impl<'a> Printer<'a> {
    pub(crate) fn print_property_access(
        &mut self,
        id: NodeId,
        object: NodeId,
        name: &str,
        indent: usize,
    ) -> EmitResult<String> {
        if let Some(path) = self.dotted_path(id)
            && let Some(replacement) = self.config().property_replacements.get(&path)
        {
            return Ok(replacement.clone());
        }

        if name == "length"
            && let Some((open, close)) = self.length_wrapper(object)
        {
            let inner = self.print(object, indent)?;
            return Ok(format!("{open}{inner}{close}"));
        }

        if self.ast().tag(object) == Some(SyntaxKind::Super) {
            let receiver = self.print(object, indent)?;
            return Ok(format!(
                "{}{}{}",
                receiver,
                self.tok(Token::SuperAccess),
                self.member_name(name)
            ));
        }

        let receiver = self.print(object, indent)?;
        Ok(format!("{}{}{}", receiver, self.tok(Token::PropertyAccess), self.member_name(name)))
    }

    /// Length wrapper for `object.length`: the string wrapper for strings, the array wrapper otherwise.
    fn length_wrapper(&self, object: NodeId) -> Option<(&'a str, &'a str)> {
        let is_string = matches!(self.ast().kind(object), Some(NodeKind::StringLiteral { .. }))
            || self.types().is_string(object);
        let (open, close) = if is_string {
            (Token::StringLengthOpen, Token::StringLengthClose)
        } else {
            (Token::ArrayLengthOpen, Token::ArrayLengthClose)
        };
        let (open, close) = (self.tok(open), self.tok(close));
        (!open.is_empty() || !close.is_empty()).then_some((open, close))
    }

    /// Read `container[key]` through the element-access wrapper, or natively.
    pub fn element_get(&self, container: &str, key: &str) -> String {
        let open = self.tok(Token::ElementGetOpen);
        if open.is_empty() {
            format!("{container}[{key}]")
        } else {
            format!("{}{}, {}{}", open, container, key, self.tok(Token::ElementGetClose))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use polyglot_syntax::builder::AstBuilder;
    use polyglot_syntax::types::{TypeCategory, TypeInfo};
    use polyglot_syntax::{Ast, NoTypeInfo, TypeQuery, TypeTable};

    use crate::backend::{BackendId, BackendSpec};
    use crate::emit::Printer;

    fn print_with(ast: Ast, id: BackendId, types: &dyn TypeQuery) -> String {
        let spec = BackendSpec::for_id(id);
        Printer::new(ast, &spec, types).print_file().unwrap().0
    }

    #[test]
    fn length_picks_string_or_array_wrapper() {
        let mut b = AstBuilder::new();
        let name = b.ident("name");
        let len = b.prop(name, "length");
        let stmt = b.expr_stmt(len);
        let ast = b.finish(vec![stmt]);
        let strings = TypeTable::new().with_type(name, TypeInfo::new("string", TypeCategory::String));
        assert_eq!(print_with(ast.clone(), BackendId::Php, &strings), "strlen($name);");
        assert_eq!(print_with(ast.clone(), BackendId::Php, &NoTypeInfo), "count($name);");
        assert_eq!(print_with(ast.clone(), BackendId::Python, &NoTypeInfo), "len(name)");
        assert_eq!(print_with(ast, BackendId::Rust, &NoTypeInfo), "name.len();");
    }

    #[test]
    fn element_reads_use_wrapper_under_casts() {
        let mut b = AstBuilder::new();
        let obj = b.ident("data");
        let key = b.string("id");
        let get = b.elem(obj, key);
        let stmt = b.expr_stmt(get);
        let ast = b.finish(vec![stmt]);
        assert_eq!(print_with(ast.clone(), BackendId::Java, &NoTypeInfo), "Helpers.getValue(data, \"id\");");
        assert_eq!(print_with(ast, BackendId::Python, &NoTypeInfo), "data[\"id\"]");
    }

    #[test]
    fn property_replacements_apply_to_full_path() {
        let mut b = AstBuilder::new();
        let number = b.ident("Number");
        let max = b.prop(number, "MAX_SAFE_INTEGER");
        let stmt = b.expr_stmt(max);
        let ast = b.finish(vec![stmt]);
        assert_eq!(print_with(ast, BackendId::Java, &NoTypeInfo), "Long.MAX_VALUE;");
    }

    #[test]
    fn super_member_access() {
        let mut b = AstBuilder::new();
        let sup = b.super_();
        let describe = b.prop(sup, "describe");
        let call = b.call(describe, vec![]);
        let stmt = b.expr_stmt(call);
        let ast = b.finish(vec![stmt]);
        assert_eq!(print_with(ast.clone(), BackendId::Php, &NoTypeInfo), "parent::describe();");
        assert_eq!(print_with(ast, BackendId::Python, &NoTypeInfo), "super().describe()");
    }
}
