//! # mhr-cli — Registry Validation Command-Line Driver
//!
//! Provides the `mhr` command-line interface over the validation engine.
//! Everything the engine needs is read from files: the request payload,
//! the asset history (current aggregate or legacy record), lookup
//! fixtures and the engine configuration.
//!
//! ```bash
//! mhr validate transfer --payload trand.json --history 102345.json
//! mhr validate exemption --payload exnr.json --history 102345.json --legacy
//! mhr validate registration --payload new.json --staff --lookups lookups.json --format json
//! ```
//!
//! ## Exit Status
//!
//! - `0` — the request passes every rule.
//! - `1` — the request violates one or more rules.
//! - `2` — the request could not be evaluated (unreadable input, missing
//!   or mismatched history, bad configuration).
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handler.
//! - Handlers delegate to `mhr-validation`; no rule logic lives here.

pub mod validate;
