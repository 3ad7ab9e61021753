//! Property-based tests for the polyglot transpiler
//!
//! These tests use proptest to verify invariants across many randomly
//! generated inputs, catching edge cases that hand-written tests might miss.

use polyglot::Transpiler;
use polyglot::backend::{ALL_BACKENDS, BackendId};
use polyglot_core::lang::operators::BinaryOp;
use polyglot_syntax::ast::Modifiers;
use polyglot_syntax::builder::AstBuilder;
use polyglot_syntax::{Ast, NoTypeInfo};
use proptest::prelude::*;

fn transpile(ast: &Ast, id: BackendId) -> String {
    Transpiler::new(id).transpile(ast, &NoTypeInfo).unwrap().content
}

/// `let v<i> = <n>;` declarations, each followed by `v<i> = v<i> + 1;`, then an object literal reading all of them.
fn declarations(values: &[u32]) -> Ast {
    let mut b = AstBuilder::new();
    let mut statements = Vec::new();
    let mut properties = Vec::new();
    for (i, value) in values.iter().enumerate() {
        let name = format!("v{i}");
        let init = b.num(value.to_string());
        statements.push(b.let_(&name, Some(init)));
        let target = b.ident(&name);
        let read = b.ident(&name);
        let one = b.num("1");
        let sum = b.binary(BinaryOp::Plus, read, one);
        statements.push(b.assign_stmt(target, sum));
        properties.push((name, b.ident(format!("v{i}"))));
    }
    let props = properties.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    let obj = b.object(props);
    statements.push(b.const_("all", Some(obj)));
    let main = b.function("main", vec![], None, statements, Modifiers::default());
    b.finish(vec![main])
}

// =============================================================================
// Determinism
// =============================================================================

proptest! {
    /// Property: the same tree and backend always produce byte-identical output.
    #[test]
    fn transpilation_is_deterministic(values in prop::collection::vec(any::<u32>(), 1..6)) {
        let ast = declarations(&values);
        for &id in ALL_BACKENDS {
            let first = Transpiler::new(id).transpile(&ast, &NoTypeInfo).unwrap();
            let second = Transpiler::new(id).transpile(&ast, &NoTypeInfo).unwrap();
            prop_assert_eq!(first, second);
        }
    }

    /// Property: every reassigned variable read by the literal gets exactly one alias declaration.
    #[test]
    fn each_captured_variable_is_aliased_once(values in prop::collection::vec(0u32..100, 1..6)) {
        let java = transpile(&declarations(&values), BackendId::Java);
        for i in 0..values.len() {
            let alias = format!("final Object finalV{i} = v{i};");
            prop_assert_eq!(java.matches(alias.as_str()).count(), 1, "{}", java);
        }
    }
}

// =============================================================================
// Numeric promotion
// =============================================================================

proptest! {
    /// Property: 32-bit literals keep their plain form.
    #[test]
    fn int_range_literals_are_not_promoted(n in 0u64..=i32::MAX as u64) {
        let mut b = AstBuilder::new();
        let lit = b.num(n.to_string());
        let decl = b.let_("x", Some(lit));
        let ast = b.finish(vec![decl]);
        prop_assert_eq!(transpile(&ast, BackendId::CSharp), format!("int x = {n};"));
    }

    /// Property: literals beyond the signed 32-bit range always get the 64-bit type.
    #[test]
    fn overflowing_literals_are_promoted(n in (i32::MAX as u64 + 1)..=i64::MAX as u64) {
        let mut b = AstBuilder::new();
        let lit = b.num(n.to_string());
        let stmt = b.expr_stmt(lit);
        let ast = b.finish(vec![stmt]);
        prop_assert_eq!(transpile(&ast, BackendId::Java), format!("{n}L;"));

        let mut b = AstBuilder::new();
        let lit = b.num(n.to_string());
        let decl = b.let_("x", Some(lit));
        let ast = b.finish(vec![decl]);
        prop_assert_eq!(transpile(&ast, BackendId::CSharp), format!("long x = {n};"));
    }
}

// =============================================================================
// Default-parameter emulation
// =============================================================================

proptest! {
    /// Property: N trailing defaults become one variadic parameter and N accessors in positional order.
    #[test]
    fn trailing_defaults_become_one_variadic(required in 0usize..3, defaults in prop::collection::vec(0u32..1000, 1..5)) {
        let mut b = AstBuilder::new();
        let mut params = Vec::new();
        for i in 0..required {
            params.push(b.param(&format!("r{i}")));
        }
        for (i, value) in defaults.iter().enumerate() {
            let init = b.num(value.to_string());
            params.push(b.param_default(&format!("d{i}"), init));
        }
        let ret = b.ret(None);
        let func = b.function("fetch", params, None, vec![ret], Modifiers::default());
        let java = transpile(&b.finish(vec![func]), BackendId::Java);

        prop_assert_eq!(java.matches("Object... optionalArgs").count(), 1, "{}", java);
        let signature = java.lines().next().unwrap_or_default();
        prop_assert!(signature.ends_with("Object... optionalArgs) {"), "{}", signature);
        for i in 0..defaults.len() {
            prop_assert!(!signature.contains(&format!("d{i}")), "{}", signature);
        }

        let mut last = 0;
        for (i, value) in defaults.iter().enumerate() {
            let accessor = format!("Object d{i} = Helpers.getArg(optionalArgs, {i}, {value});");
            let at = java.find(&accessor);
            prop_assert!(at.is_some(), "missing {} in {}", accessor, java);
            let at = at.unwrap_or_default();
            prop_assert!(at > last, "{}", java);
            last = at;
        }
    }
}
