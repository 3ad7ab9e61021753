//! Backend Configuration Table.
//!
//! A [`BackendConfig`] is pure data: a token table, capability flags, a type mapping table and a few replacement
//! maps. It is built once per backend, optionally merged with user options, and then shared read-only by every
//! handler of a transpilation run.
//!
//! ## Notes
//! - Token lookups fall back to [`Token::default_text`], so a fresh table prints source-like text.
//! - Merging is shallow: a user override replaces a whole token string or flag, never part of one.

use std::collections::BTreeMap;

use polyglot_core::lang::helpers::{HelperCase, HelperNaming, RuntimeHelper};
use polyglot_core::lang::tokens::Token;

use super::BackendId;
use crate::config::BackendOptions;

/// Where a backend writes type annotations relative to the name they annotate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypePosition {
    /// `Object name`
    Prefix,
    /// `name: T`, `name T`
    Suffix,
    /// No annotations at all.
    Omitted,
}

/// Capability flags that select between lowering strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Operators on dynamic values must become runtime-helper calls.
    pub requires_call_expression_cast: bool,
    /// Parameters may carry default values natively.
    pub native_default_params: bool,
    /// `for (init; cond; incr)` exists natively.
    pub native_for_loops: bool,
    /// Values referenced from an object literal must be effectively final.
    pub requires_capture_immutability: bool,
    /// Any value may be used as a condition.
    pub supports_truthy_values: bool,
    /// `async` functions exist natively; otherwise bodies are wrapped in a future-producing closure.
    pub native_async: bool,
    /// `a[b] = c` on dynamic containers needs the set-element helper.
    pub element_set_lowering: bool,
    /// Variable declarations print a resolved type instead of the default type.
    pub infer_variable_types: bool,
    /// Parameters print their resolved type instead of the default parameter type.
    pub infer_parameter_types: bool,
    pub type_position: TypePosition,
    /// Opening braces go on their own line.
    pub brace_on_new_line: bool,
    /// Member names are capitalized (exported).
    pub capitalize_members: bool,
    /// Identifiers and member names are converted to snake_case.
    pub uncamel_case: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            requires_call_expression_cast: false,
            native_default_params: true,
            native_for_loops: true,
            requires_capture_immutability: false,
            supports_truthy_values: true,
            native_async: true,
            element_set_lowering: false,
            infer_variable_types: false,
            infer_parameter_types: false,
            type_position: TypePosition::Suffix,
            brace_on_new_line: false,
            capitalize_members: false,
            uncamel_case: false,
        }
    }
}

/// Per-backend configuration record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub id: BackendId,
    tokens: BTreeMap<Token, String>,
    pub capabilities: Capabilities,
    pub helpers: HelperNaming,
    /// Source type name → target type string.
    pub type_map: BTreeMap<String, String>,
    /// Identifiers that are reserved in the target, with their replacement.
    pub reserved_words: BTreeMap<String, String>,
    /// Dotted callee (`console.log`) → target callee.
    pub call_replacements: BTreeMap<String, String>,
    /// Dotted property (`Number.MAX_SAFE_INTEGER`) → target expression.
    pub property_replacements: BTreeMap<String, String>,
    /// `typeof` result name (`"string"`) → check template with an `{expr}` slot.
    pub typeof_checks: BTreeMap<String, String>,
}

impl BackendConfig {
    /// Create a source-like table for `id`.
    pub fn new(id: BackendId) -> Self {
        Self {
            id,
            tokens: BTreeMap::new(),
            capabilities: Capabilities::default(),
            helpers: HelperNaming {
                prefix: "",
                case: HelperCase::Camel,
            },
            type_map: BTreeMap::new(),
            reserved_words: BTreeMap::new(),
            call_replacements: BTreeMap::new(),
            property_replacements: BTreeMap::new(),
            typeof_checks: BTreeMap::new(),
        }
    }

    /// Literal string for `token`.
    pub fn token(&self, token: Token) -> &str {
        self.tokens
            .get(&token)
            .map(String::as_str)
            .unwrap_or_else(|| token.default_text())
    }

    pub fn set(&mut self, token: Token, value: impl Into<String>) {
        self.tokens.insert(token, value.into());
    }

    pub fn with_token(mut self, token: Token, value: impl Into<String>) -> Self {
        self.set(token, value);
        self
    }

    pub fn with_tokens<'s>(mut self, tokens: impl IntoIterator<Item = (Token, &'s str)>) -> Self {
        for (token, value) in tokens {
            self.set(token, value);
        }
        self
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_types<'s>(mut self, pairs: impl IntoIterator<Item = (&'s str, &'s str)>) -> Self {
        self.type_map
            .extend(pairs.into_iter().map(|(k, v)| (k.to_string(), v.to_string())));
        self
    }

    pub fn with_reserved_words<'s>(mut self, pairs: impl IntoIterator<Item = (&'s str, &'s str)>) -> Self {
        self.reserved_words
            .extend(pairs.into_iter().map(|(k, v)| (k.to_string(), v.to_string())));
        self
    }

    pub fn with_call_replacements<'s>(mut self, pairs: impl IntoIterator<Item = (&'s str, &'s str)>) -> Self {
        self.call_replacements
            .extend(pairs.into_iter().map(|(k, v)| (k.to_string(), v.to_string())));
        self
    }

    pub fn with_property_replacements<'s>(mut self, pairs: impl IntoIterator<Item = (&'s str, &'s str)>) -> Self {
        self.property_replacements
            .extend(pairs.into_iter().map(|(k, v)| (k.to_string(), v.to_string())));
        self
    }

    pub fn with_typeof_checks<'s>(mut self, pairs: impl IntoIterator<Item = (&'s str, &'s str)>) -> Self {
        self.typeof_checks
            .extend(pairs.into_iter().map(|(k, v)| (k.to_string(), v.to_string())));
        self
    }

    /// Set the helper naming convention and derive the operator and access wrappers from it.
    ///
    /// ## Notes
    /// - Only wrappers for helpers the backend actually needs are derived: callers set the remaining tokens
    ///   explicitly afterwards if they differ.
    pub fn with_helper_wrappers(mut self, naming: HelperNaming) -> Self {
        self.helpers = naming;
        let wrappers = [
            (Token::EqualsWrapperOpen, Token::EqualsWrapperClose, RuntimeHelper::IsEqual),
            (
                Token::GreaterThanWrapperOpen,
                Token::GreaterThanWrapperClose,
                RuntimeHelper::IsGreaterThan,
            ),
            (
                Token::GreaterThanEqualsWrapperOpen,
                Token::GreaterThanEqualsWrapperClose,
                RuntimeHelper::IsGreaterThanOrEqual,
            ),
            (Token::LessThanWrapperOpen, Token::LessThanWrapperClose, RuntimeHelper::IsLessThan),
            (
                Token::LessThanEqualsWrapperOpen,
                Token::LessThanEqualsWrapperClose,
                RuntimeHelper::IsLessThanOrEqual,
            ),
            (Token::PlusWrapperOpen, Token::PlusWrapperClose, RuntimeHelper::Add),
            (Token::MinusWrapperOpen, Token::MinusWrapperClose, RuntimeHelper::Subtract),
            (Token::MultiplyWrapperOpen, Token::MultiplyWrapperClose, RuntimeHelper::Multiply),
            (Token::DivideWrapperOpen, Token::DivideWrapperClose, RuntimeHelper::Divide),
            (Token::ModWrapperOpen, Token::ModWrapperClose, RuntimeHelper::Mod),
            (Token::NegWrapperOpen, Token::NegWrapperClose, RuntimeHelper::OpNeg),
            (Token::InWrapperOpen, Token::InWrapperClose, RuntimeHelper::InOp),
            (Token::FalsyWrapperOpen, Token::FalsyWrapperClose, RuntimeHelper::IsTrue),
            (Token::ElementGetOpen, Token::ElementGetClose, RuntimeHelper::GetValue),
            (
                Token::ArrayLengthOpen,
                Token::ArrayLengthClose,
                RuntimeHelper::GetArrayLength,
            ),
        ];
        for (open, close, helper) in wrappers {
            let call = naming.open(helper);
            self.set(open, call);
            self.set(close, ")");
        }
        let different = format!("!{}", naming.open(RuntimeHelper::IsEqual));
        self.set(Token::DifferentWrapperOpen, different);
        self.set(Token::DifferentWrapperClose, ")");
        self
    }

    /// Render a helper call `name(args)` in this backend's helper namespace.
    pub fn helper_call(&self, helper: RuntimeHelper, args: &[&str]) -> String {
        format!("{}{})", self.helpers.open(helper), args.join(", "))
    }

    /// Fill a template token's `{slot}` placeholders.
    pub fn render(&self, token: Token, slots: &[(&str, &str)]) -> String {
        render_template(self.token(token), slots)
    }

    /// Map a source type name through the type table.
    pub fn map_type(&self, source: &str) -> Option<&str> {
        self.type_map.get(source).map(String::as_str)
    }

    /// Layer `overlay`'s explicit entries over this table.
    ///
    /// ## Notes
    /// - Tokens and table entries set on `overlay` win; entries it never set keep this table's values.
    /// - Capabilities, helper naming and the id stay with `self`; variants that change them do so explicitly.
    pub fn merged(mut self, overlay: &BackendConfig) -> Self {
        self.tokens
            .extend(overlay.tokens.iter().map(|(token, text)| (*token, text.clone())));
        for (ours, theirs) in [
            (&mut self.type_map, &overlay.type_map),
            (&mut self.reserved_words, &overlay.reserved_words),
            (&mut self.call_replacements, &overlay.call_replacements),
            (&mut self.property_replacements, &overlay.property_replacements),
            (&mut self.typeof_checks, &overlay.typeof_checks),
        ] {
            ours.extend(theirs.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        self
    }

    /// Shallow-merge user options over this table.
    ///
    /// ## Notes
    /// - Unknown token keys and non-string values are ignored.
    pub fn with_options(mut self, options: &BackendOptions) -> Self {
        for (key, value) in &options.parser {
            match (Token::from_key(key), value.as_str()) {
                (Some(token), Some(text)) => self.set(token, text),
                _ => tracing::debug!(backend = %self.id, key = %key, "ignoring unrecognized token override"),
            }
        }
        if let Some(flag) = options.uncamel_case {
            self.capabilities.uncamel_case = flag;
        }
        if options.force_optional_emulation == Some(true) {
            self.capabilities.native_default_params = false;
        }
        self
    }
}

/// Substitute `{name}` slots in `template`.
///
/// ## Notes
/// - A `{` not followed by an identifier and a closing `}` is copied literally, so target braces survive.
/// - Unknown slots are left as written.
/// - Substituted text is never rescanned.
pub fn render_template(template: &str, slots: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() + 16);
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) if is_slot_name(&after[..end]) => {
                let name = &after[..end];
                match slots.iter().find(|(slot, _)| *slot == name) {
                    Some((_, value)) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn is_slot_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_fall_back_to_source_spelling() {
        let config = BackendConfig::new(BackendId::Java);
        assert_eq!(config.token(Token::BlockOpen), "{");
        let config = config.with_token(Token::BlockOpen, "begin");
        assert_eq!(config.token(Token::BlockOpen), "begin");
    }

    #[test]
    fn render_keeps_target_braces() {
        let out = render_template("if {cond} { {then} } else { {else} }", &[("cond", "x"), ("then", "1"), ("else", "2")]);
        assert_eq!(out, "if x { 1 } else { 2 }");
    }

    #[test]
    fn render_does_not_rescan_inserted_text() {
        let out = render_template("{a}-{b}", &[("a", "{b}"), ("b", "B")]);
        assert_eq!(out, "{b}-B");
        assert_eq!(render_template("{missing}", &[]), "{missing}");
    }

    #[test]
    fn helper_wrappers_follow_naming() {
        let config = BackendConfig::new(BackendId::Java).with_helper_wrappers(HelperNaming {
            prefix: "Helpers.",
            case: HelperCase::Camel,
        });
        assert_eq!(config.token(Token::PlusWrapperOpen), "Helpers.add(");
        assert_eq!(config.token(Token::DifferentWrapperOpen), "!Helpers.isEqual(");
        assert_eq!(config.helper_call(RuntimeHelper::GetArg, &["a", "0"]), "Helpers.getArg(a, 0)");
    }

    #[test]
    fn merged_layers_explicit_entries_only() {
        let base = BackendConfig::new(BackendId::Php)
            .with_token(Token::LineTerminator, ";")
            .with_token(Token::VariablePrefix, "$")
            .with_types([("string", "string")]);
        let overlay = BackendConfig::new(BackendId::Php)
            .with_token(Token::LineTerminator, "")
            .with_types([("number", "float")]);
        let merged = base.merged(&overlay);
        assert_eq!(merged.token(Token::LineTerminator), "");
        assert_eq!(merged.token(Token::VariablePrefix), "$");
        assert_eq!(merged.map_type("string"), Some("string"));
        assert_eq!(merged.map_type("number"), Some("float"));
    }

    #[test]
    fn options_merge_shallowly() {
        let mut options = BackendOptions::default();
        options
            .parser
            .insert("BLOCK_OPENING_TOKEN".into(), serde_json::Value::from("{{"));
        options.parser.insert("NOT_A_TOKEN".into(), serde_json::Value::from("x"));
        options
            .parser
            .insert("LINE_TERMINATOR".into(), serde_json::Value::from(3));
        options.force_optional_emulation = Some(true);
        let config = BackendConfig::new(BackendId::Python).with_options(&options);
        assert_eq!(config.token(Token::BlockOpen), "{{");
        assert_eq!(config.token(Token::LineTerminator), ";");
        assert!(!config.capabilities.native_default_params);
    }
}
