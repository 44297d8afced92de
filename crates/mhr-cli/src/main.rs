//! # mhr CLI entry point
//!
//! Parses command-line arguments, initialises logging and dispatches to
//! the subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mhr_cli::validate::{run_validate, ValidateArgs};

/// Manufactured home registry change-validation tool.
///
/// Decides whether a proposed change to a registered home is permitted
/// and explains every rule it breaks.
#[derive(Parser, Debug)]
#[command(name = "mhr", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Write logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a change request against an asset history.
    Validate(ValidateArgs),
}

/// Logs go to stderr so a JSON report on stdout stays parseable.
/// `RUST_LOG` overrides the verbosity flags.
fn init_tracing(verbose: u8, json: bool) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mhr_cli::validate::{OutputFormat, RequestKind};
    use mhr_validation::RoleGroup;
    use std::path::PathBuf;

    #[test]
    fn test_parse_transfer_defaults() {
        let cli = Cli::try_parse_from([
            "mhr", "validate", "transfer", "--payload", "trand.json", "--history", "102345.json",
        ])
        .unwrap();
        let Commands::Validate(args) = cli.command;
        assert_eq!(args.kind, RequestKind::Transfer);
        assert_eq!(args.payload, PathBuf::from("trand.json"));
        assert_eq!(args.history, Some(PathBuf::from("102345.json")));
        assert!(!args.legacy);
        assert!(!args.staff);
        assert_eq!(args.role, RoleGroup::General);
        assert_eq!(args.format, OutputFormat::Text);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_parse_all_flags() {
        let cli = Cli::try_parse_from([
            "mhr",
            "-vv",
            "--log-json",
            "validate",
            "exemption",
            "--payload",
            "exnr.json",
            "--history",
            "legacy.json",
            "--legacy",
            "--staff",
            "--role",
            "lawyer_notary",
            "--as-of",
            "2026-06-01T00:00:00Z",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.log_json);
        let Commands::Validate(args) = cli.command;
        assert_eq!(args.kind, RequestKind::Exemption);
        assert!(args.legacy && args.staff);
        assert_eq!(args.role, RoleGroup::LawyerNotary);
        assert_eq!(args.as_of.as_deref(), Some("2026-06-01T00:00:00Z"));
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn test_legacy_requires_history() {
        assert!(Cli::try_parse_from([
            "mhr", "validate", "transfer", "--payload", "p.json", "--legacy",
        ])
        .is_err());
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert!(Cli::try_parse_from([
            "mhr", "validate", "transfer", "--payload", "p.json", "--role", "notary",
        ])
        .is_err());
    }
}
