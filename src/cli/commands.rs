//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::path::Path;

use miette::{NamedSource, Report};
use polyglot_syntax::{Ast, TypeTable};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{CliError, CliResult, ExitCode};
use crate::backend::{ALL_BACKENDS, BackendId};
use crate::config::EngineOptions;
use crate::emit::TranspileError;
use crate::transpiler::Transpiler;

/// Input bundle: the tree plus the type checker's precomputed answers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AstBundle {
    pub ast: Ast,
    #[serde(default)]
    pub types: TypeTable,
}

// ============================================================================
// Commands
// ============================================================================

/// Transpile the bundle at `input` and write the result to `output` (stdout when `None`).
pub fn transpile_file(
    input: &Path,
    target: BackendId,
    options: Option<&Path>,
    output: Option<&Path>,
) -> CliResult<ExitCode> {
    let bundle: AstBundle = read_json(input, "syntax tree bundle")?;
    let options = match options {
        Some(path) => read_options(path)?,
        None => EngineOptions::default(),
    };

    let transpiler = Transpiler::new(target).with_options(&options);
    let result = transpiler
        .transpile(&bundle.ast, &bundle.types)
        .map_err(|err| CliError::Transpile(render_error(err, input, &bundle.ast)))?;

    for warning in &result.warnings {
        warn!(kind = warning.kind.as_str(), "{}", warning);
    }

    match output {
        Some(path) => {
            let mut content = result.content;
            content.push('\n');
            fs::write(path, content).map_err(|source| CliError::Write {
                path: path.to_path_buf(),
                source,
            })?;
            info!(backend = %target, output = %path.display(), "wrote transpiled source");
        }
        None => println!("{}", result.content),
    }
    Ok(ExitCode::SUCCESS)
}

/// Print every backend name with its file extension.
pub fn list_targets() -> CliResult<ExitCode> {
    for id in ALL_BACKENDS {
        println!("{:<8} .{}", id.as_str(), id.extension());
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// Helpers
// ============================================================================

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path, what: &'static str) -> CliResult<T> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        what,
        source,
    })
}

fn read_options(path: &Path) -> CliResult<EngineOptions> {
    read_json(path, "options file")
}

/// Render a fatal error as a miette report, with the source snippet when the tree carries it.
fn render_error(err: TranspileError, input: &Path, ast: &Ast) -> String {
    let report = Report::new(err);
    let report = match ast.source_text() {
        Some(text) => report.with_source_code(NamedSource::new(input.display().to_string(), text.to_string())),
        None => report,
    };
    format!("{report:?}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use polyglot_syntax::builder::AstBuilder;

    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("polyglot_cli_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    fn write_bundle(name: &str, ast: Ast) -> PathBuf {
        let path = scratch(name);
        let bundle = AstBundle {
            ast,
            types: TypeTable::default(),
        };
        fs::write(&path, serde_json::to_string(&bundle).unwrap()).unwrap();
        path
    }

    #[test]
    fn transpiles_bundle_to_output_file() {
        let mut b = AstBuilder::new();
        let one = b.num("1");
        let decl = b.let_("itemCount", Some(one));
        let input = write_bundle("ok.json", b.finish(vec![decl]));
        let options = scratch("options.json");
        fs::write(&options, r#"{ "python": { "uncamelcase": true } }"#).unwrap();
        let output = scratch("ok.py");

        let code = transpile_file(&input, BackendId::Python, Some(&options), Some(&output)).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
        assert_eq!(fs::read_to_string(&output).unwrap(), "item_count = 1\n");
    }

    #[test]
    fn unsupported_constructs_render_a_diagnostic() {
        let mut b = AstBuilder::new();
        let ret = b.ret(None);
        let block = b.block(vec![ret]);
        let stmt = b.try_(block, Some("e"), None, None);
        let input = write_bundle("unsupported.json", b.finish(vec![stmt]));

        let err = transpile_file(&input, BackendId::Go, None, None).unwrap_err();
        assert_eq!(err.exit_code(), ExitCode::UNSUPPORTED);
        assert!(err.to_string().contains("go"), "{err}");
    }

    #[test]
    fn missing_and_malformed_inputs_fail() {
        let missing = scratch("does-not-exist.json");
        let err = transpile_file(&missing, BackendId::Java, None, None).unwrap_err();
        assert!(matches!(err, CliError::Read { .. }));

        let garbage = scratch("garbage.json");
        fs::write(&garbage, "{ not json").unwrap();
        let err = transpile_file(&garbage, BackendId::Java, None, None).unwrap_err();
        assert!(matches!(err, CliError::Parse { .. }));
    }
}
