//! # Validate Subcommand
//!
//! Loads a change request and its context from disk, runs the matching
//! [`Validator`] entry point and reports the diagnostics as text or JSON.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde::de::DeserializeOwned;
use serde::Serialize;

use mhr_core::Timestamp;
use mhr_state::{AssetHistory, CurrentHistory, LegacyAssetRecord, LegacyHistory, Registration};
use mhr_validation::{
    CallerContext, CorrectionRequest, Diagnostics, EngineConfig, ExemptionRequest,
    NewRegistrationRequest, PermitRequest, RoleGroup, StaticLookups, TransferRequest, Validator,
};

/// Kind of change request in the payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RequestKind {
    /// Registration of a new home.
    Registration,
    /// Sale or death transfer.
    Transfer,
    /// Residential or non-residential exemption, or its rescission.
    Exemption,
    /// Transport permit, amendment or cancellation.
    Permit,
    /// Registrar correction or public amendment.
    Correction,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Registration => "registration",
            Self::Transfer => "transfer",
            Self::Exemption => "exemption",
            Self::Permit => "permit",
            Self::Correction => "correction",
        }
    }
}

/// Report format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per diagnostic.
    #[default]
    Text,
    /// A JSON report on stdout.
    Json,
}

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Kind of request in the payload.
    #[arg(value_enum)]
    pub kind: RequestKind,

    /// Request payload (JSON).
    #[arg(long)]
    pub payload: PathBuf,

    /// Asset history (JSON): a base registration with its change chain.
    #[arg(long)]
    pub history: Option<PathBuf>,

    /// Read --history as a legacy single-record snapshot.
    #[arg(long, requires = "history")]
    pub legacy: bool,

    /// Lookup fixtures (JSON): used document ids, parcels, liens.
    #[arg(long)]
    pub lookups: Option<PathBuf>,

    /// Engine configuration (YAML). Statutory defaults when omitted.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Evaluate as registry staff.
    #[arg(long)]
    pub staff: bool,

    /// Account role group.
    #[arg(long, default_value = "general")]
    pub role: RoleGroup,

    /// Evaluation instant (RFC 3339). Defaults to now.
    #[arg(long)]
    pub as_of: Option<String>,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// JSON report written with `--format json`.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub kind: &'static str,
    pub passed: bool,
    pub diagnostics: &'a Diagnostics,
}

/// A history loaded from disk.
#[derive(Debug)]
pub enum LoadedHistory {
    Current(Registration),
    Legacy(LegacyHistory),
}

impl LoadedHistory {
    /// Run `f` against the history through the `AssetHistory` view.
    pub fn with<R>(&self, f: impl FnOnce(&dyn AssetHistory) -> R) -> R {
        match self {
            Self::Current(registration) => f(&CurrentHistory::new(registration)),
            Self::Legacy(history) => f(history),
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {what}: {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {what}: {}", path.display()))
}

/// Load an asset history file.
pub fn load_history(path: &Path, legacy: bool) -> Result<LoadedHistory> {
    if legacy {
        let record: LegacyAssetRecord = read_json(path, "legacy record")?;
        let history = LegacyHistory::from_record(&record)
            .with_context(|| format!("failed to decode legacy record: {}", path.display()))?;
        Ok(LoadedHistory::Legacy(history))
    } else {
        Ok(LoadedHistory::Current(read_json(path, "asset history")?))
    }
}

/// Build the caller context from the flags.
pub fn caller_context(args: &ValidateArgs) -> Result<CallerContext> {
    let as_of = match &args.as_of {
        Some(s) => Timestamp::parse(s).with_context(|| format!("invalid --as-of: {s}"))?,
        None => Timestamp::now(),
    };
    let ctx = if args.staff {
        CallerContext::staff(as_of)
    } else {
        CallerContext::general(as_of)
    };
    Ok(ctx.with_role(args.role))
}

/// Load everything and run the engine; no output.
pub fn evaluate(args: &ValidateArgs) -> Result<Diagnostics> {
    let config = match &args.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("failed to load config: {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let lookups: StaticLookups = match &args.lookups {
        Some(path) => read_json(path, "lookup fixtures")?,
        None => StaticLookups::new(),
    };
    let validator = Validator::new(config, lookups);
    let ctx = caller_context(args)?;
    let history = args
        .history
        .as_deref()
        .map(|p| load_history(p, args.legacy))
        .transpose()?;

    tracing::debug!(
        kind = args.kind.as_str(),
        staff = ctx.privileged,
        role = %ctx.role,
        as_of = %ctx.as_of,
        history = history.is_some(),
        "evaluating request"
    );

    match &history {
        Some(loaded) => loaded.with(|h| dispatch(args, &validator, Some(h), &ctx)),
        None => dispatch(args, &validator, None, &ctx),
    }
}

fn dispatch(
    args: &ValidateArgs,
    validator: &Validator<StaticLookups>,
    history: Option<&dyn AssetHistory>,
    ctx: &CallerContext,
) -> Result<Diagnostics> {
    let payload = args.payload.as_path();
    let diags = match args.kind {
        RequestKind::Registration => {
            if history.is_some() {
                tracing::warn!("--history is ignored for a new registration");
            }
            let request: NewRegistrationRequest = read_json(payload, "registration request")?;
            validator.validate_registration(&request, ctx)
        }
        RequestKind::Transfer => {
            let request: TransferRequest = read_json(payload, "transfer request")?;
            validator.validate_transfer(history, &request, ctx)?
        }
        RequestKind::Exemption => {
            let request: ExemptionRequest = read_json(payload, "exemption request")?;
            validator.validate_exemption(history, &request, ctx)?
        }
        RequestKind::Permit => {
            let request: PermitRequest = read_json(payload, "permit request")?;
            validator.validate_permit(history, &request, ctx)?
        }
        RequestKind::Correction => {
            let request: CorrectionRequest = read_json(payload, "correction request")?;
            validator.validate_correction(history, &request, ctx)?
        }
    };
    Ok(diags)
}

/// Render the report.
pub fn render(kind: RequestKind, diags: &Diagnostics, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let report = Report {
                kind: kind.as_str(),
                passed: diags.is_empty(),
                diagnostics: diags,
            };
            Ok(serde_json::to_string_pretty(&report)?)
        }
        OutputFormat::Text if diags.is_empty() => Ok(format!("PASS  {} request", kind.as_str())),
        OutputFormat::Text => {
            let mut out = format!(
                "FAIL  {} request: {} violation(s)",
                kind.as_str(),
                diags.len()
            );
            for d in diags {
                out.push_str("\n  ");
                out.push_str(&d.to_string());
            }
            Ok(out)
        }
    }
}

/// Execute the validate subcommand. Returns the process exit code.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let diags = evaluate(args)?;
    println!("{}", render(args.kind, &diags, args.format)?);
    Ok(if diags.is_empty() { 0 } else { 1 })
}
