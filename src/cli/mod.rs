//! CLI module for the polyglot transpiler
//!
//! A thin driver around [`crate::transpiler::Transpiler`]: it reads a serialized tree bundle produced by the external
//! parser/type checker, transpiles it and writes the result.
//!
//! ## Commands
//!
//! - `transpile <input.json> --target <backend>` - Transpile one bundle
//! - `targets` - List the supported backends
//!
//! ## Modules
//!
//! - `commands` - Command implementations
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::io;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::backend::BackendId;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
    /// The input was read but could not be transpiled.
    pub const UNSUPPORTED: ExitCode = ExitCode(2);
}

/// Error type for CLI operations.
///
/// The CLI entry point catches these errors, prints them, and exits with [`CliError::exit_code`].
#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read `{}`: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write `{}`: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("`{}` is not a valid {what}: {source}", path.display())]
    Parse {
        path: PathBuf,
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Already rendered diagnostic (with source snippet when the bundle carries the source text).
    #[error("{0}")]
    Transpile(String),
}

impl CliError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CliError::Transpile(_) => ExitCode::UNSUPPORTED,
            CliError::Read { .. } | CliError::Write { .. } | CliError::Parse { .. } => ExitCode::FAILURE,
        }
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Multi-backend transpiler
#[derive(Parser, Debug)]
#[command(name = "polyglot")]
#[command(version = VERSION)]
#[command(about = "Transpile a TypeScript-like syntax tree to Java, Rust, C#, Go, PHP or Python", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Transpile a serialized `{ "ast": ..., "types": ... }` bundle
    Transpile {
        /// Bundle produced by the parser/type checker
        #[arg(value_name = "INPUT")]
        input: PathBuf,
        /// Target language
        #[arg(short, long, value_enum)]
        target: BackendId,
        /// JSON options keyed by backend name
        #[arg(long, value_name = "FILE")]
        options: Option<PathBuf>,
        /// Write the output here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
        /// Debug-level logging
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the supported backends
    Targets,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();
    let verbose = matches!(cli.command, Command::Transpile { verbose: true, .. });
    init_tracing(verbose);

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            eprintln!("{e}");
            process::exit(e.exit_code().0);
        }
    }
}

/// Structured logging with env-based filter, defaulting to info (debug with `--verbose`).
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .try_init();
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Transpile {
            input,
            target,
            options,
            output,
            verbose: _,
        } => commands::transpile_file(&input, target, options.as_deref(), output.as_deref()),
        Command::Targets => commands::list_targets(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_transpile() {
        let cli = Cli::try_parse_from(["polyglot", "transpile", "bundle.json", "--target", "csharp", "-v"]).unwrap();
        if let Command::Transpile {
            input,
            target,
            options,
            verbose,
            ..
        } = cli.command
        {
            assert_eq!(input, PathBuf::from("bundle.json"));
            assert_eq!(target, BackendId::CSharp);
            assert!(options.is_none());
            assert!(verbose);
        } else {
            panic!("Expected Transpile command");
        }
    }

    #[test]
    fn test_cli_requires_known_target() {
        assert!(Cli::try_parse_from(["polyglot", "transpile", "bundle.json", "--target", "cobol"]).is_err());
        assert!(Cli::try_parse_from(["polyglot", "transpile", "bundle.json"]).is_err());
    }

    #[test]
    fn test_cli_parse_targets() {
        let cli = Cli::try_parse_from(["polyglot", "targets"]).unwrap();
        assert!(matches!(cli.command, Command::Targets));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::Transpile("x".into()).exit_code(), ExitCode::UNSUPPORTED);
        let read = CliError::Read {
            path: PathBuf::from("missing.json"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(read.exit_code(), ExitCode::FAILURE);
        assert!(read.to_string().contains("missing.json"));
    }
}
