//! # mhr-core — Foundational Types for the Manufactured Home Registry
//!
//! This crate defines the type-system primitives shared by every other
//! crate in the workspace. It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for registry identifiers.** `MhrNumber`,
//!    `DocumentId`, `GroupId`, `RegistrationId`. No bare strings or
//!    integers cross a crate boundary.
//!
//! 2. **Closed sum types for document and party vocabularies.** Every
//!    document type, transfer sub-type, tenancy type and party type is an
//!    enum variant. Adding a death-transfer sub-type forces every rule set
//!    that matches on it to handle the new case.
//!
//! 3. **UTC-only timestamps.** `Timestamp` normalizes to UTC with seconds
//!    precision, so "is the death date in the future" comparisons are
//!    independent of the submitter's offset.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `mhr-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod domain;
pub mod error;
pub mod identity;
pub mod temporal;

pub use domain::{
    DeathTransferKind, DocumentType, LocationType, NoteDocumentType, PartyType, TenancyType,
    TransferDocumentType,
};
pub use error::MhrError;
pub use identity::{DocumentId, GroupId, MhrNumber, RegistrationId};
pub use temporal::Timestamp;
