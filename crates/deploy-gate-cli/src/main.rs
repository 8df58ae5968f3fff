// crates/deploy-gate-cli/src/main.rs
// ============================================================================
// Module: Deploy Gate CLI Entry Point
// Description: Command dispatcher for the access-gate build lifecycle.
// Purpose: Expose the validate and apply hooks to any host build pipeline.
// Dependencies: clap, deploy-gate-core, thiserror
// ============================================================================

//! ## Overview
//! The Deploy Gate CLI wires the two lifecycle entry points into whatever
//! build pipeline hosts the static site: `validate` runs before the build
//! produces output and may abort it; `apply` runs after the build and
//! rewrites the routing manifest plus companion pages. `apply` re-runs
//! validation first, so hosts that skip the validate hook still cannot ship
//! a weak gate.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use deploy_gate_core::BuildContext;
use deploy_gate_core::GateConfig;
use deploy_gate_core::PolicyWarning;
use deploy_gate_core::post_build;
use deploy_gate_core::resolve_manifest_path;
use deploy_gate_core::validate_build;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "deploy-gate", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate the gate configuration before the build produces output.
    Validate(ValidateCommand),
    /// Apply the access gate after the build has produced output.
    Apply(ApplyCommand),
}

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
struct ValidateCommand {
    /// Path to the gate configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Source directory the manifest path resolves against.
    #[arg(long, value_name = "DIR", default_value = "docs")]
    docs_dir: PathBuf,
}

/// Arguments for the apply subcommand.
#[derive(Args, Debug)]
struct ApplyCommand {
    /// Path to the gate configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Source directory the manifest path resolves against.
    #[arg(long, value_name = "DIR", default_value = "docs")]
    docs_dir: PathBuf,
    /// Built site output directory receiving the companion pages.
    #[arg(long, value_name = "DIR", default_value = "site")]
    site_dir: PathBuf,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for operator-facing messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&format!("deploy-gate {version}"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Validate(command) => command_validate(&command),
        Commands::Apply(command) => command_apply(&command),
    }
}

/// Prints top-level help when no subcommand is given.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Executes the validate command.
fn command_validate(command: &ValidateCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let warnings =
        validate_build(&config, &command.docs_dir).map_err(|err| CliError::new(err.to_string()))?;
    emit_warnings(&warnings)?;
    let manifest = resolve_manifest_path(&config, &command.docs_dir);
    write_stdout_line(&format!("gate configuration ok: manifest {}", manifest.display()))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the apply command.
fn command_apply(command: &ApplyCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let warnings =
        validate_build(&config, &command.docs_dir).map_err(|err| CliError::new(err.to_string()))?;
    emit_warnings(&warnings)?;

    let context = BuildContext {
        docs_dir: command.docs_dir.clone(),
        site_dir: command.site_dir.clone(),
    };
    let report = post_build(&config, &context).map_err(|err| CliError::new(err.to_string()))?;

    write_stdout_line(&format!("routes merged into {}", report.manifest_path.display()))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    for page in &report.provisioned_pages {
        write_stdout_line(&format!("provisioned {page}"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Loads gate configuration for a command.
fn load_config(path: Option<&Path>) -> CliResult<GateConfig> {
    GateConfig::load(path).map_err(|err| CliError::new(err.to_string()))
}

/// Writes non-fatal policy warnings to stderr.
fn emit_warnings(warnings: &[PolicyWarning]) -> CliResult<()> {
    for warning in warnings {
        write_stderr_line(&format!("warning: {warning}"))
            .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    }
    Ok(())
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output-stream failure message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed writing to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
