//! # mhr-state — Registration Aggregate
//!
//! The persisted shape of a manufactured home as the validation engine
//! sees it: a base registration, its append-only chain of change
//! registrations, and the child records each registration contributed.
//!
//! ## Modules
//!
//! - **Registration** (`registration.rs`): registration status lifecycle
//!   (`Active`, `Exempt`, `Cancelled`, `Historical`) with validated
//!   transitions and an ordered transition log.
//!
//! - **Owners** (`owner.rs`): owner groups, owners, owner names and the
//!   death details carried by a deceased owner.
//!
//! - **Notes** (`note.rs`): unit notes and the "in effect" test.
//!
//! - **Location / Description** (`location.rs`, `description.rs`):
//!   versioned structural records with normalized comparison.
//!
//! - **History** (`history.rs`, `legacy.rs`): the `AssetHistory`
//!   capability the rule sets read through, with one adapter over the
//!   current aggregate and one over the legacy single-record store.
//!
//! ## Design
//!
//! The engine never branches on where an asset was loaded from. Callers
//! hand it a `&dyn AssetHistory`; the adapters do all representation
//! conversion up front.

pub mod description;
pub mod history;
pub mod legacy;
pub mod location;
pub mod note;
pub mod owner;
pub mod registration;

// ─── Registration re-exports ────────────────────────────────────────

pub use registration::{
    Registration, RegistrationError, RegistrationStatus, RegistrationTransitionRecord,
};

// ─── Child record re-exports ────────────────────────────────────────

pub use description::{Description, Section};
pub use location::{Address, Location, LocationField, RecordStatus};
pub use note::{Note, NoteStatus};
pub use owner::{
    DeathDetails, IndividualName, Owner, OwnerGroup, OwnerGroupStatus, OwnerName,
};

// ─── History re-exports ─────────────────────────────────────────────

pub use history::{AssetHistory, CurrentHistory};
pub use legacy::{
    LegacyAssetRecord, LegacyDocument, LegacyHistory, LegacyNote, LegacyOwner, LegacyOwnerGroup,
};
