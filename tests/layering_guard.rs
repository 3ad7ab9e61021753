//! Layering guardrails to keep the lower crates independent of the engine.
//!
//! `polyglot_core` (vocabulary tables) depends on nothing in the workspace; `polyglot_syntax` (the input contract)
//! may only depend on `polyglot_core`. These tests scan each crate's `[dependencies]` table and fail on a violation.

fn dependency_names(manifest: &str) -> Vec<String> {
    let mut in_dependencies = false;
    let mut names = Vec::new();

    for raw_line in manifest.lines() {
        let line = raw_line.trim();
        // Track when we enter/exit the `[dependencies]` table.
        if line.starts_with('[') {
            in_dependencies = line == "[dependencies]";
            continue;
        }
        if !in_dependencies || line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line_no_comment = line.split('#').next().unwrap_or("").trim();
        if let Some((name, _)) = line_no_comment.split_once('=') {
            names.push(name.trim().to_string());
        }
    }
    names
}

#[test]
fn core_does_not_depend_on_workspace_crates() {
    let names = dependency_names(include_str!("../crates/polyglot_core/Cargo.toml"));
    for name in &names {
        assert!(
            !name.starts_with("polyglot"),
            "`{name}` must not appear in polyglot_core [dependencies]"
        );
    }
}

#[test]
fn syntax_depends_only_on_core() {
    let names = dependency_names(include_str!("../crates/polyglot_syntax/Cargo.toml"));
    assert!(names.iter().any(|n| n == "polyglot_core"), "{names:?}");
    for name in names.iter().filter(|n| n.starts_with("polyglot")) {
        assert_eq!(name, "polyglot_core", "polyglot_syntax must not depend on `{name}`");
    }
}
