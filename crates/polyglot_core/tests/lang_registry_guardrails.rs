use std::collections::HashMap;

use polyglot_core::lang::builtins::{self, CallShape};
use polyglot_core::lang::helpers;
use polyglot_core::lang::operators::{self, BinaryOp};
use polyglot_core::lang::tokens::{self, Token};

#[test]
fn token_keys_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, Token> = HashMap::new();
    for &token in tokens::TOKENS {
        assert_eq!(Token::from_key(token.key()), Some(token));
        if let Some(prev) = seen.insert(token.key(), token) {
            panic!("duplicate token key {:?}: {:?} and {:?}", token.key(), prev, token);
        }
    }
}

#[test]
fn placeholder_templates_use_known_slots() {
    let templates = [
        (Token::CatchClause, &["name"][..]),
        (Token::ConditionalTemplate, &["cond", "then", "else"][..]),
        (Token::CaptureAlias, &["alias", "name"][..]),
        (Token::ParamRebind, &["name", "alias"][..]),
        (Token::OptionalArgAccessor, &["name", "index", "default"][..]),
    ];
    for (token, slots) in templates {
        for slot in slots {
            assert!(
                token.default_text().contains(&format!("{{{slot}}}")),
                "{:?} default is missing {{{slot}}}",
                token
            );
        }
    }
}

#[test]
fn builtin_rules_do_not_overlap() {
    for (i, a) in builtins::BUILTIN_CALLS.iter().enumerate() {
        for b in &builtins::BUILTIN_CALLS[i + 1..] {
            let same_callee = a.receiver == b.receiver && a.member == b.member && a.free == b.free;
            assert!(!same_callee, "duplicate built-in rule for {}", a.member);
        }
    }
}

#[test]
fn every_static_builtin_is_reachable() {
    for info in builtins::BUILTIN_CALLS {
        let argc = match info.arity {
            builtins::Arity::Exact(n) | builtins::Arity::AtLeast(n) | builtins::Arity::Range(n, _) => n,
        };
        let shape = if info.free {
            CallShape::Free(info.member)
        } else {
            CallShape::Member {
                receiver: info.receiver,
                member: info.member,
            }
        };
        assert_eq!(builtins::classify(shape, argc), Some(info.id), "{}", info.member);
    }
}

#[test]
fn operators_with_helpers_have_wrappers() {
    for &op in operators::BINARY_OPERATORS {
        if op.helper().is_some() {
            assert!(Token::wrapper_for(op).is_some(), "{op:?} has a helper but no wrapper tokens");
        }
    }
    assert!(BinaryOp::from_str("instanceof").is_some());
}

#[test]
fn helper_names_are_camel_case() {
    for &helper in helpers::RUNTIME_HELPERS {
        let name = helper.name();
        assert!(name.chars().next().is_some_and(|c| c.is_ascii_lowercase()), "{name}");
        assert!(!name.contains('_'), "{name}");
    }
}
