//! Type resolution.
//!
//! Resolution order for a declaration:
//!
//! 1. a numeric initializer outside the 32-bit signed range always resolves to the 64-bit integer type,
//! 2. an explicit annotation, mapped through the backend's type table and keyword tokens,
//! 3. for backends that print inferred types, the initializer's literal shape,
//! 4. the backend's default type. Reaching this step on an inferring backend records one `AmbiguousType` warning.
//!
//! An empty type string means "print no annotation".

use polyglot_core::lang::tokens::Token;
use polyglot_syntax::ast::TypeAnnotation;
use polyglot_syntax::{NodeId, NodeKind};

use crate::backend::TypePosition;
use crate::emit::{Printer, WarningKind};

/// Value of an integral numeric literal (`42`, `0x1F`, `1_000`); `None` for fractional or malformed text.
pub fn integral_value(text: &str) -> Option<i128> {
    let cleaned: String = text.chars().filter(|&c| c != '_').collect();
    let lower = cleaned.to_ascii_lowercase();
    if let Some(hex) = lower.strip_prefix("0x") {
        return i128::from_str_radix(hex, 16).ok();
    }
    if let Some(bin) = lower.strip_prefix("0b") {
        return i128::from_str_radix(bin, 2).ok();
    }
    if let Some(oct) = lower.strip_prefix("0o") {
        return i128::from_str_radix(oct, 8).ok();
    }
    if let Some((mantissa, exponent)) = lower.split_once('e') {
        // 1e10 is integral when the mantissa has no fraction and the exponent is non-negative
        let mantissa: i128 = mantissa.parse().ok()?;
        let exponent: u32 = exponent.parse().ok()?;
        return mantissa.checked_mul(10i128.checked_pow(exponent)?);
    }
    lower.parse().ok()
}

/// Whether a numeric literal needs a 64-bit integer type.
pub fn is_long_literal(text: &str) -> bool {
    integral_value(text).is_some_and(|v| v < i128::from(i32::MIN) || v > i128::from(i32::MAX))
}

impl Printer<'_> {
    /// Map a source annotation to the target spelling; `None` when nothing maps it.
    pub fn map_annotation(&self, ty: &TypeAnnotation) -> Option<String> {
        if let Some(inner) = ty.promise_inner() {
            return Some(match inner.filter(|t| t.name() != Some("void")) {
                Some(inner) => {
                    let inner = self
                        .map_annotation(inner)
                        .unwrap_or_else(|| self.tok(Token::DefaultType).to_string());
                    format!("{}{}{}", self.tok(Token::PromiseOpen), inner, self.tok(Token::PromiseClose))
                }
                None => self.tok(Token::PromiseVoid).to_string(),
            });
        }
        match ty {
            TypeAnnotation::Array { .. } => Some(self.tok(Token::ArrayKeyword).to_string()),
            TypeAnnotation::Union { members } => {
                // `T | undefined` resolves as `T`; anything wider is ambiguous
                let mut mapped = members
                    .iter()
                    .filter(|m| !matches!(m.name(), Some("undefined" | "null")))
                    .map(|m| self.map_annotation(m));
                let first = mapped.next()??;
                mapped.all(|m| m.as_deref() == Some(first.as_str())).then_some(first)
            }
            TypeAnnotation::Named { name, .. } => {
                if let Some(mapped) = self.config().map_type(name) {
                    return Some(mapped.to_string());
                }
                let keyword = match name.as_str() {
                    "string" => Token::StringKeyword,
                    "boolean" => Token::BooleanKeyword,
                    "number" => Token::FloatKeyword,
                    "void" => Token::VoidKeyword,
                    "object" => Token::ObjectKeyword,
                    "any" | "unknown" => Token::DefaultType,
                    _ if name.starts_with(char::is_uppercase) => return Some(name.clone()),
                    _ => return None,
                };
                Some(self.tok(keyword).to_string())
            }
        }
    }

    /// Type implied by an initializer's literal shape.
    pub fn literal_type(&self, initializer: NodeId) -> Option<String> {
        let token = match self.ast().kind(initializer)? {
            NodeKind::ArrayLiteral { .. } => Token::ArrayKeyword,
            NodeKind::ObjectLiteral { .. } => Token::ObjectKeyword,
            NodeKind::BooleanLiteral { .. } => Token::BooleanKeyword,
            NodeKind::StringLiteral { .. } => Token::StringKeyword,
            NodeKind::NumericLiteral { text } => match integral_value(text) {
                Some(_) if is_long_literal(text) => Token::LongKeyword,
                Some(_) => Token::IntegerKeyword,
                None => Token::FloatKeyword,
            },
            NodeKind::PrefixUnary { operand, .. } => return self.literal_type(*operand),
            NodeKind::Parenthesized { expression } => return self.literal_type(*expression),
            NodeKind::New { callee, .. } => return self.ast().identifier_name(*callee).map(str::to_string),
            _ => return None,
        };
        Some(self.tok(token).to_string())
    }

    /// 64-bit integer type for initializers that overflow 32 bits.
    fn promoted_type(&self, initializer: Option<NodeId>) -> Option<String> {
        let mut node = initializer?;
        // -2147483649 is a negation of a literal
        while let Some(NodeKind::PrefixUnary { operand, .. } | NodeKind::Parenthesized { expression: operand }) =
            self.ast().kind(node)
        {
            node = *operand;
        }
        match self.ast().kind(node)? {
            NodeKind::NumericLiteral { text } if is_long_literal(text) => Some(self.tok(Token::LongKeyword).to_string()),
            _ => None,
        }
    }

    /// Resolved type of a variable or property declaration.
    pub fn variable_type(&mut self, id: NodeId, ty: Option<&TypeAnnotation>, initializer: Option<NodeId>) -> String {
        if self.caps().type_position == TypePosition::Omitted {
            return String::new();
        }
        if let Some(promoted) = self.promoted_type(initializer) {
            return promoted;
        }
        if let Some(mapped) = ty.and_then(|t| self.map_annotation(t)) {
            return mapped;
        }
        if self.caps().infer_variable_types {
            if let Some(inferred) = initializer.and_then(|init| self.literal_type(init)) {
                return inferred;
            }
            let default = self.tok(Token::DefaultType);
            self.warn(
                WarningKind::AmbiguousType,
                id,
                format!("no annotation or literal shape resolves this type; using `{default}`"),
            );
        }
        self.tok(Token::DefaultType).to_string()
    }

    /// Resolved type of a parameter; `declared` may come from an override descriptor.
    pub fn parameter_type(&self, id: NodeId, declared: Option<&TypeAnnotation>) -> String {
        if self.caps().type_position == TypePosition::Omitted {
            return String::new();
        }
        if let Some(mapped) = declared.and_then(|t| self.map_annotation(t)) {
            return mapped;
        }
        if self.caps().infer_parameter_types
            && let Some(inferred) = self.types().type_at(id)
            && let Some(mapped) = self.map_annotation(&TypeAnnotation::named(inferred.name))
        {
            return mapped;
        }
        self.tok(Token::DefaultParameterType).to_string()
    }

    /// Resolved return type of a callable; empty when the target omits it.
    ///
    /// ## Notes
    /// - Without an annotation, a body that returns no value resolves to the void keyword (or the void promise for
    ///   async callables); any other body resolves to the default return type.
    pub fn return_type_text(&self, declared: Option<&TypeAnnotation>, body: Option<&[NodeId]>, is_async: bool) -> String {
        if self.caps().type_position == TypePosition::Omitted {
            return String::new();
        }
        if let Some(ty) = declared {
            let ty = match (is_async, ty.promise_inner()) {
                (true, None) => TypeAnnotation::generic("Promise", vec![ty.clone()]),
                _ => ty.clone(),
            };
            if let Some(mapped) = self.map_annotation(&ty) {
                return mapped;
            }
        }
        let returns_value = body.is_some_and(|statements| statements.iter().any(|&s| self.returns_value(s)));
        match (is_async, returns_value) {
            (true, true) => format!(
                "{}{}{}",
                self.tok(Token::PromiseOpen),
                self.tok(Token::DefaultType),
                self.tok(Token::PromiseClose)
            ),
            (true, false) => self.tok(Token::PromiseVoid).to_string(),
            (false, true) => self.tok(Token::DefaultReturnType).to_string(),
            (false, false) => self.tok(Token::VoidKeyword).to_string(),
        }
    }

    /// Whether `stmt` contains a `return <value>` outside nested callables.
    fn returns_value(&self, stmt: NodeId) -> bool {
        match self.ast().kind(stmt) {
            Some(NodeKind::Return { expression }) => expression.is_some(),
            Some(NodeKind::Block { statements }) => statements.iter().any(|&s| self.returns_value(s)),
            Some(NodeKind::If {
                then_branch,
                else_branch,
                ..
            }) => self.returns_value(*then_branch) || else_branch.is_some_and(|e| self.returns_value(e)),
            Some(NodeKind::For { body, .. } | NodeKind::While { body, .. }) => self.returns_value(*body),
            Some(NodeKind::Try {
                block,
                catch_block,
                finally_block,
                ..
            }) => {
                self.returns_value(*block)
                    || catch_block.is_some_and(|b| self.returns_value(b))
                    || finally_block.is_some_and(|b| self.returns_value(b))
            }
            _ => false,
        }
    }
}
