//! # Registration Status Lifecycle
//!
//! Models the status of a manufactured home registration and the chain of
//! change registrations filed against it.
//!
//! ## States
//!
//! ```text
//!            ┌──── rescind exemption ────┐
//!            ▼                           │
//!         Active ──── exempt ────▶ Exempt
//!          │  ▲
//!   cancel │  │ re-register
//!          ▼  │
//!        Cancelled
//!
//!   Active | Exempt | Cancelled ──── retire ────▶ Historical (terminal)
//! ```
//!
//! ## Design Decision
//!
//! A registration is immutable once filed except for its status. Status
//! changes go through the transition methods below, which reject
//! transitions the lifecycle does not allow and append a record to the
//! transition log. The change chain is append-only: a change registration
//! may only be pushed after the newest one already in the chain.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use mhr_core::{DocumentId, DocumentType, MhrNumber, RegistrationId, Timestamp};

use crate::description::Description;
use crate::location::Location;
use crate::note::Note;
use crate::owner::OwnerGroup;

// ─── Registration Status ─────────────────────────────────────────────

/// The lifecycle status of a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegistrationStatus {
    /// The home is registered and changes are allowed subject to notes.
    Active,
    /// The home has been exempted from the registry.
    Exempt,
    /// The registration has been cancelled.
    Cancelled,
    /// The registration is retained for history only (terminal).
    Historical,
}

impl RegistrationStatus {
    /// Whether this state is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Historical)
    }
}

impl std::fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Active => "ACTIVE",
            Self::Exempt => "EXEMPT",
            Self::Cancelled => "CANCELLED",
            Self::Historical => "HISTORICAL",
        };
        f.write_str(s)
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors that can occur while mutating a registration.
#[derive(Error, Debug)]
pub enum RegistrationError {
    /// Attempted transition is not valid from the current state.
    #[error("invalid registration transition: {from} -> {to}")]
    InvalidTransition {
        /// Current state.
        from: String,
        /// Attempted target state.
        to: String,
    },

    /// Registration is in a terminal state.
    #[error("registration {registration_id} is in terminal state {state}")]
    TerminalState {
        /// The registration identifier.
        registration_id: String,
        /// The terminal state.
        state: String,
    },

    /// A change registration belongs to a different asset.
    #[error("change registration for MHR {actual} cannot be appended to MHR {expected}")]
    AssetMismatch {
        /// The MHR number of the base registration.
        expected: String,
        /// The MHR number carried by the change.
        actual: String,
    },

    /// A change registration predates the newest change already in the chain.
    #[error("change registration created at {created_at} predates chain head at {head_at}")]
    OutOfOrder {
        /// Creation time of the rejected change.
        created_at: String,
        /// Creation time of the newest change in the chain.
        head_at: String,
    },
}

// ─── Transition Record ───────────────────────────────────────────────

/// Record of a registration status transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationTransitionRecord {
    /// State before the transition.
    pub from_state: RegistrationStatus,
    /// State after the transition.
    pub to_state: RegistrationStatus,
    /// When the transition occurred.
    pub timestamp: Timestamp,
    /// Reason for the transition.
    pub reason: String,
}

// ─── Registration ────────────────────────────────────────────────────

/// One legal filing against an asset, with the child records it created.
///
/// The base registration of an asset additionally carries the ordered
/// chain of change registrations filed after it (newest last).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    /// Registration identifier.
    pub id: RegistrationId,
    /// The asset this registration was filed against.
    pub mhr_number: MhrNumber,
    /// Document id printed on the filing.
    pub document_id: DocumentId,
    /// Document type of the filing.
    pub document_type: DocumentType,
    /// Current lifecycle status.
    pub status: RegistrationStatus,
    /// When the registration was filed.
    pub created_at: Timestamp,
    /// Owner groups created or modified by this registration.
    #[serde(default)]
    pub owner_groups: Vec<OwnerGroup>,
    /// Notes filed by this registration.
    #[serde(default)]
    pub notes: Vec<Note>,
    /// Location version created by this registration.
    #[serde(default)]
    pub location: Option<Location>,
    /// Description version created by this registration.
    #[serde(default)]
    pub description: Option<Description>,
    /// Change registrations filed after this one (base registration only).
    #[serde(default)]
    pub changes: Vec<Registration>,
    /// Ordered log of all status transitions.
    #[serde(default)]
    pub transitions: Vec<RegistrationTransitionRecord>,
}

impl Registration {
    /// Create a new, active registration with no child records.
    pub fn new(
        id: RegistrationId,
        mhr_number: MhrNumber,
        document_id: DocumentId,
        document_type: DocumentType,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            mhr_number,
            document_id,
            document_type,
            status: RegistrationStatus::Active,
            created_at,
            owner_groups: Vec::new(),
            notes: Vec::new(),
            location: None,
            description: None,
            changes: Vec::new(),
            transitions: Vec::new(),
        }
    }

    /// Attach owner groups.
    pub fn with_owner_groups(mut self, groups: Vec<OwnerGroup>) -> Self {
        self.owner_groups = groups;
        self
    }

    /// Attach notes.
    pub fn with_notes(mut self, notes: Vec<Note>) -> Self {
        self.notes = notes;
        self
    }

    /// Attach a location version.
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Attach a description version.
    pub fn with_description(mut self, description: Description) -> Self {
        self.description = Some(description);
        self
    }

    /// Append a change registration to the chain.
    ///
    /// The change must be for the same asset and must not predate the
    /// newest change already in the chain.
    pub fn append_change(&mut self, change: Registration) -> Result<(), RegistrationError> {
        if change.mhr_number != self.mhr_number {
            return Err(RegistrationError::AssetMismatch {
                expected: self.mhr_number.to_string(),
                actual: change.mhr_number.to_string(),
            });
        }
        let head_at = self
            .changes
            .last()
            .map(|c| c.created_at)
            .unwrap_or(self.created_at);
        if change.created_at < head_at {
            return Err(RegistrationError::OutOfOrder {
                created_at: change.created_at.to_string(),
                head_at: head_at.to_string(),
            });
        }
        self.changes.push(change);
        Ok(())
    }

    /// The newest change registration, if any.
    pub fn last_change(&self) -> Option<&Registration> {
        self.changes.last()
    }

    /// Exempt the home (ACTIVE → EXEMPT).
    pub fn exempt(&mut self, reason: &str) -> Result<(), RegistrationError> {
        self.require_state(RegistrationStatus::Active, RegistrationStatus::Exempt)?;
        self.do_transition(RegistrationStatus::Exempt, reason);
        Ok(())
    }

    /// Rescind an exemption (EXEMPT → ACTIVE).
    pub fn rescind_exemption(&mut self, reason: &str) -> Result<(), RegistrationError> {
        self.require_state(RegistrationStatus::Exempt, RegistrationStatus::Active)?;
        self.do_transition(RegistrationStatus::Active, reason);
        Ok(())
    }

    /// Cancel the registration (ACTIVE → CANCELLED).
    pub fn cancel(&mut self, reason: &str) -> Result<(), RegistrationError> {
        self.require_state(RegistrationStatus::Active, RegistrationStatus::Cancelled)?;
        self.do_transition(RegistrationStatus::Cancelled, reason);
        Ok(())
    }

    /// Re-register a cancelled home (CANCELLED → ACTIVE).
    pub fn reregister(&mut self, reason: &str) -> Result<(), RegistrationError> {
        self.require_state(RegistrationStatus::Cancelled, RegistrationStatus::Active)?;
        self.do_transition(RegistrationStatus::Active, reason);
        Ok(())
    }

    /// Retire the registration to history (any non-terminal → HISTORICAL).
    pub fn retire(&mut self, reason: &str) -> Result<(), RegistrationError> {
        self.reject_terminal()?;
        self.do_transition(RegistrationStatus::Historical, reason);
        Ok(())
    }

    fn reject_terminal(&self) -> Result<(), RegistrationError> {
        if self.status.is_terminal() {
            return Err(RegistrationError::TerminalState {
                registration_id: self.id.to_string(),
                state: self.status.to_string(),
            });
        }
        Ok(())
    }

    /// Validate that the registration is in the expected state.
    fn require_state(
        &self,
        expected: RegistrationStatus,
        target: RegistrationStatus,
    ) -> Result<(), RegistrationError> {
        self.reject_terminal()?;
        if self.status != expected {
            return Err(RegistrationError::InvalidTransition {
                from: self.status.to_string(),
                to: target.to_string(),
            });
        }
        Ok(())
    }

    /// Record a status transition.
    fn do_transition(&mut self, to: RegistrationStatus, reason: &str) {
        self.transitions.push(RegistrationTransitionRecord {
            from_state: self.status,
            to_state: to,
            timestamp: Timestamp::now(),
            reason: reason.to_string(),
        });
        self.status = to;
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    fn make_registration() -> Registration {
        Registration::new(
            RegistrationId(1),
            MhrNumber::new("000900").unwrap(),
            DocumentId::new("80048709"),
            DocumentType::NewRegistration,
            ts("2020-01-01T00:00:00Z"),
        )
    }

    fn make_change(id: u64, doc: DocumentType, at: &str) -> Registration {
        Registration::new(
            RegistrationId(id),
            MhrNumber::new("000900").unwrap(),
            DocumentId::new("80048717"),
            doc,
            ts(at),
        )
    }

    #[test]
    fn test_new_registration_is_active() {
        let r = make_registration();
        assert_eq!(r.status, RegistrationStatus::Active);
        assert!(r.transitions.is_empty());
        assert!(r.last_change().is_none());
    }

    #[test]
    fn test_active_to_exempt_and_back() {
        let mut r = make_registration();
        r.exempt("residential exemption").unwrap();
        assert_eq!(r.status, RegistrationStatus::Exempt);
        r.rescind_exemption("exemption rescinded").unwrap();
        assert_eq!(r.status, RegistrationStatus::Active);
        assert_eq!(r.transitions.len(), 2);
    }

    #[test]
    fn test_cancel_and_reregister() {
        let mut r = make_registration();
        r.cancel("cancelled").unwrap();
        assert_eq!(r.status, RegistrationStatus::Cancelled);
        r.reregister("re-registered").unwrap();
        assert_eq!(r.status, RegistrationStatus::Active);
    }

    #[test]
    fn test_cannot_exempt_cancelled() {
        let mut r = make_registration();
        r.cancel("cancelled").unwrap();
        assert!(matches!(
            r.exempt("test"),
            Err(RegistrationError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_cannot_reregister_active() {
        let mut r = make_registration();
        assert!(r.reregister("test").is_err());
    }

    #[test]
    fn test_historical_is_terminal() {
        let mut r = make_registration();
        r.retire("superseded").unwrap();
        assert!(r.status.is_terminal());
        match r.exempt("should fail").unwrap_err() {
            RegistrationError::TerminalState { .. } => {}
            other => panic!("Expected TerminalState, got: {other:?}"),
        }
        assert!(r.retire("again").is_err());
    }

    #[test]
    fn test_transition_log_records_all_changes() {
        let mut r = make_registration();
        r.exempt("exempt").unwrap();
        r.rescind_exemption("rescind").unwrap();
        r.cancel("cancel").unwrap();

        assert_eq!(r.transitions.len(), 3);
        assert_eq!(r.transitions[0].from_state, RegistrationStatus::Active);
        assert_eq!(r.transitions[0].to_state, RegistrationStatus::Exempt);
        assert_eq!(r.transitions[2].to_state, RegistrationStatus::Cancelled);
        assert_eq!(r.transitions[2].reason, "cancel");
    }

    #[test]
    fn test_append_change_keeps_order() {
        let mut r = make_registration();
        r.append_change(make_change(2, DocumentType::TransferSale, "2021-01-01T00:00:00Z"))
            .unwrap();
        r.append_change(make_change(3, DocumentType::TransferAffidavit, "2022-01-01T00:00:00Z"))
            .unwrap();
        assert_eq!(
            r.last_change().map(|c| c.document_type),
            Some(DocumentType::TransferAffidavit)
        );
    }

    #[test]
    fn test_append_change_rejects_out_of_order() {
        let mut r = make_registration();
        r.append_change(make_change(2, DocumentType::TransferSale, "2022-01-01T00:00:00Z"))
            .unwrap();
        let result =
            r.append_change(make_change(3, DocumentType::TransferSale, "2021-01-01T00:00:00Z"));
        assert!(matches!(result, Err(RegistrationError::OutOfOrder { .. })));
        assert_eq!(r.changes.len(), 1);
    }

    #[test]
    fn test_append_change_rejects_other_asset() {
        let mut r = make_registration();
        let mut other = make_change(2, DocumentType::TransferSale, "2022-01-01T00:00:00Z");
        other.mhr_number = MhrNumber::new("000901").unwrap();
        assert!(matches!(
            r.append_change(other),
            Err(RegistrationError::AssetMismatch { .. })
        ));
    }

    #[test]
    fn test_status_display() {
        assert_eq!(RegistrationStatus::Active.to_string(), "ACTIVE");
        assert_eq!(RegistrationStatus::Historical.to_string(), "HISTORICAL");
    }

    #[test]
    fn test_registration_serialization() {
        let mut r = make_registration();
        r.exempt("exempt").unwrap();
        let json = serde_json::to_string(&r).unwrap();
        let parsed: Registration = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.status, RegistrationStatus::Exempt);
        assert_eq!(parsed.mhr_number, r.mhr_number);
        assert_eq!(parsed.transitions.len(), 1);
    }
}
