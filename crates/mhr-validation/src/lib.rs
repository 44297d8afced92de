//! # mhr-validation — Change-Validation Engine
//!
//! Decides whether a proposed change to a registered manufactured home is
//! permitted, given the home's current and historical state. The engine
//! never writes anything: it reads an [`mhr_state::AssetHistory`], consults
//! its external lookups and returns [`Diagnostics`]. An empty list means
//! the request may be filed.
//!
//! ## Modules
//!
//! - **Field** (`field.rs`): character set, document id check digit,
//!   year of manufacture window, document id uniqueness.
//! - **Location / Description** (`location.rs`, `description.rs`).
//! - **Owners** (`owners.rs`, `interest.rs`): owner identity, tenancy
//!   shape, deletion bookkeeping and interest fractions.
//! - **Gate** (`gate.rs`): the registration state gate.
//! - **Death** (`death.rs`): survivorship, administration, affidavit and
//!   will transfers.
//! - **Liens** (`lien.rs`) and **Lookups** (`lookup.rs`): external checks.
//! - **Orchestrator** (`orchestrator.rs`): [`Validator`], one entry point
//!   per request kind.
//!
//! ## Crate Policy
//!
//! - Rule violations are values ([`Diagnostic`]), never errors.
//! - [`EngineError`] is reserved for requests that cannot be evaluated.
//! - Sub-validators are pure functions of their inputs; the same request
//!   against the same history always yields the same diagnostics.

pub mod config;
pub mod context;
pub mod death;
pub mod description;
pub mod diagnostic;
pub mod error;
pub mod field;
pub mod gate;
pub mod interest;
pub mod lien;
pub mod location;
pub mod lookup;
pub mod orchestrator;
pub mod owners;
pub mod request;

pub use config::{EngineConfig, InterestRescaling, RestrictedLiens};
pub use context::{CallerContext, RoleGroup};
pub use diagnostic::{Diagnostic, DiagnosticKind, Diagnostics, Rule};
pub use error::{EngineError, LookupError};
pub use lookup::{DocumentIdLookup, LienLookup, ParcelLookup, RegistryLookups, StaticLookups};
pub use orchestrator::Validator;
pub use request::{
    CorrectionRequest, DeleteGroupInput, ExemptionRequest, NewRegistrationRequest,
    OwnerGroupInput, PermitRequest, TransferRequest,
};
