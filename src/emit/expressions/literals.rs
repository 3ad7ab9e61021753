//! Literal emission.

use polyglot_core::lang::tokens::Token;
use polyglot_syntax::NodeId;

use crate::emit::Printer;
use crate::emit::errors::EmitResult;
use crate::passes::types::is_long_literal;

impl Printer<'_> {
    pub(crate) fn print_numeric_literal(&self, text: &str) -> String {
        if is_long_literal(text) {
            format!("{}{}", text, self.tok(Token::LongLiteralSuffix))
        } else {
            text.to_string()
        }
    }

    /// Quote `value` with the backend's string delimiter.
    pub fn quote(&self, value: &str) -> String {
        let quote = self.tok(Token::StringQuote);
        let mut out = String::with_capacity(value.len() + 2);
        out.push_str(quote);
        for c in value.chars() {
            match c {
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if quote.starts_with(c) => {
                    out.push('\\');
                    out.push(c);
                }
                c => out.push(c),
            }
        }
        out.push_str(quote);
        out
    }

    pub(crate) fn print_array_literal(&mut self, elements: &[NodeId], indent: usize) -> EmitResult<String> {
        let elements = self.print_args(elements, indent)?;
        Ok(format!(
            "{}{}{}",
            self.tok(Token::ArrayOpen),
            elements.join(", "),
            self.tok(Token::ArrayClose)
        ))
    }

    /// Object literal, one property per line.
    pub(crate) fn print_object_literal(&mut self, properties: &[NodeId], indent: usize) -> EmitResult<String> {
        let (open, close) = (self.tok(Token::ObjectOpen), self.tok(Token::ObjectClose));
        if properties.is_empty() {
            return Ok(format!("{open}{close}"));
        }
        self.ctx.literal_depth += 1;
        let printed: EmitResult<Vec<String>> = properties.iter().map(|&p| self.print(p, indent + 1)).collect();
        self.ctx.literal_depth -= 1;
        let pad = self.ind(indent + 1);
        let separator = format!("{}\n{}", self.tok(Token::PropertySeparator), pad);
        Ok(format!(
            "{}\n{}{}\n{}{}",
            open,
            pad,
            printed?.join(&separator),
            self.ind(indent),
            close
        ))
    }

    pub(crate) fn print_property_assignment(&mut self, key: &str, value: NodeId, indent: usize) -> EmitResult<String> {
        let value = self.print(value, indent)?;
        Ok(format!(
            "{}{}{}{}{}",
            self.tok(Token::PropertyAssignmentOpen),
            self.quote(key),
            self.tok(Token::PropertyAssignment),
            value,
            self.tok(Token::PropertyAssignmentClose)
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use polyglot_syntax::builder::AstBuilder;
    use polyglot_syntax::{Ast, NoTypeInfo};

    use crate::backend::{BackendId, BackendSpec};
    use crate::emit::Printer;

    fn print(ast: Ast, id: BackendId) -> String {
        let spec = BackendSpec::for_id(id);
        Printer::new(ast, &spec, &NoTypeInfo).print_file().unwrap().0
    }

    #[test]
    fn quotes_escape_the_delimiter() {
        let spec = BackendSpec::for_id(BackendId::Php);
        let printer = Printer::new(Ast::default(), &spec, &NoTypeInfo);
        assert_eq!(printer.quote("it's"), "'it\\'s'");
        let spec = BackendSpec::for_id(BackendId::Java);
        let printer = Printer::new(Ast::default(), &spec, &NoTypeInfo);
        assert_eq!(printer.quote("a\"b\nc"), "\"a\\\"b\\nc\"");
    }

    #[test]
    fn long_literals_get_suffix_where_configured() {
        let mut b = AstBuilder::new();
        let big = b.num("2147483648");
        let small = b.num("7");
        let s1 = b.expr_stmt(big);
        let s2 = b.expr_stmt(small);
        let ast = b.finish(vec![s1, s2]);
        assert_eq!(print(ast.clone(), BackendId::Java), "2147483648L;\n7;");
        assert_eq!(print(ast, BackendId::Python), "2147483648\n7");
    }

    #[test]
    fn object_literals_print_one_property_per_line() {
        let mut b = AstBuilder::new();
        let one = b.num("1");
        let two = b.string("x");
        let obj = b.object(vec![("a", one), ("b", two)]);
        let stmt = b.let_("o", Some(obj));
        let ast = b.finish(vec![stmt]);
        assert_eq!(print(ast.clone(), BackendId::Python), "o = {\n    \"a\": 1,\n    \"b\": \"x\"\n}");
        assert_eq!(
            print(ast, BackendId::Php),
            "$o = array(\n    'a' => 1,\n    'b' => 'x'\n);"
        );
    }

    #[test]
    fn empty_containers() {
        let mut b = AstBuilder::new();
        let obj = b.object(vec![]);
        let arr = b.array(vec![]);
        let s1 = b.let_("o", Some(obj));
        let s2 = b.let_("a", Some(arr));
        let ast = b.finish(vec![s1, s2]);
        assert_eq!(print(ast, BackendId::Python), "o = {}\na = []");
    }
}
