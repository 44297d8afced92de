//! # External Lookups
//!
//! The engine asks three questions of systems it does not own: has this
//! document id been used, does this land parcel exist, and which liens
//! are outstanding against this home. Each is a synchronous black-box
//! call behind a trait; a failure comes back as [`LookupError`] and is
//! reported by the engine as an `External` diagnostic, never retried.
//!
//! [`StaticLookups`] answers all three from in-memory tables. Tests use it
//! directly and the CLI loads it from a JSON fixture file.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use mhr_core::{DocumentId, MhrNumber};

use crate::error::LookupError;

/// Document id usage lookup.
pub trait DocumentIdLookup: Send + Sync {
    /// How many existing registrations carry `id`.
    fn document_id_count(&self, id: &DocumentId) -> Result<u64, LookupError>;
}

/// Land title parcel lookup.
pub trait ParcelLookup: Send + Sync {
    /// Whether a parcel with this PID exists.
    fn parcel_exists(&self, pid: &str) -> Result<bool, LookupError>;
}

/// Personal property registry lien lookup.
pub trait LienLookup: Send + Sync {
    /// Lien type codes of the unresolved liens registered against the home.
    fn outstanding_lien_types(&self, mhr_number: &MhrNumber) -> Result<Vec<String>, LookupError>;
}

/// Everything the orchestrator consults.
pub trait RegistryLookups: DocumentIdLookup + ParcelLookup + LienLookup {}

impl<T: DocumentIdLookup + ParcelLookup + LienLookup> RegistryLookups for T {}

/// Parcel identifiers are compared by their digits only.
pub fn normalize_pid(pid: &str) -> String {
    pid.chars().filter(char::is_ascii_digit).collect()
}

// ─── In-memory implementation ────────────────────────────────────────

/// In-memory lookup tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticLookups {
    /// Document ids already on file.
    pub used_document_ids: BTreeSet<String>,
    /// PIDs of existing parcels, in any punctuation.
    pub parcels: BTreeSet<String>,
    /// Outstanding lien type codes per MHR number.
    pub liens: BTreeMap<String, Vec<String>>,
    /// Answer every call with `LookupError::Unavailable`.
    pub unavailable: bool,
}

impl StaticLookups {
    /// Empty tables: no ids used, no parcels, no liens.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_used_document_id(mut self, id: &str) -> Self {
        self.used_document_ids.insert(id.trim().to_string());
        self
    }

    pub fn with_parcel(mut self, pid: &str) -> Self {
        self.parcels.insert(normalize_pid(pid));
        self
    }

    pub fn with_lien(mut self, mhr_number: &str, lien_type: &str) -> Self {
        self.liens
            .entry(mhr_number.to_string())
            .or_default()
            .push(lien_type.to_string());
        self
    }

    /// Simulate an outage of every backing service.
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    fn reachable(&self, lookup: &str) -> Result<(), LookupError> {
        if self.unavailable {
            return Err(LookupError::Unavailable(lookup.to_string()));
        }
        Ok(())
    }
}

impl DocumentIdLookup for StaticLookups {
    fn document_id_count(&self, id: &DocumentId) -> Result<u64, LookupError> {
        self.reachable("document id")?;
        Ok(u64::from(self.used_document_ids.contains(id.as_str())))
    }
}

impl ParcelLookup for StaticLookups {
    fn parcel_exists(&self, pid: &str) -> Result<bool, LookupError> {
        self.reachable("parcel")?;
        let wanted = normalize_pid(pid);
        Ok(self.parcels.iter().any(|p| normalize_pid(p) == wanted))
    }
}

impl LienLookup for StaticLookups {
    fn outstanding_lien_types(&self, mhr_number: &MhrNumber) -> Result<Vec<String>, LookupError> {
        self.reachable("lien")?;
        Ok(self.liens.get(mhr_number.as_str()).cloned().unwrap_or_default())
    }
}
