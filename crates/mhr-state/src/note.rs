//! # Unit Notes
//!
//! Notes are filed against an asset by change registrations. Some note
//! types freeze the asset while they are in effect; a transport permit
//! note blocks a narrower set of changes.

use serde::{Deserialize, Serialize};

use mhr_core::{NoteDocumentType, RegistrationId, Timestamp};

/// Status of a unit note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoteStatus {
    /// The note is in force until its expiry, if any.
    Active,
    /// The note ran past its expiry.
    Expired,
    /// The note was cancelled by a later registration.
    Cancelled,
}

/// A unit note attached to an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Note document type.
    pub document_type: NoteDocumentType,
    /// Note status.
    pub status: NoteStatus,
    /// When the note stops applying; `None` means it never expires.
    #[serde(default)]
    pub expires_at: Option<Timestamp>,
    /// Registration that filed the note.
    #[serde(default)]
    pub registration_id: Option<RegistrationId>,
}

impl Note {
    /// An active note with an optional expiry.
    pub fn active(document_type: NoteDocumentType, expires_at: Option<Timestamp>) -> Self {
        Self {
            document_type,
            status: NoteStatus::Active,
            expires_at,
            registration_id: None,
        }
    }

    /// Whether the note applies at `as_of`: active and not past its expiry.
    pub fn is_in_effect(&self, as_of: Timestamp) -> bool {
        self.status == NoteStatus::Active && self.expires_at.map_or(true, |at| at > as_of)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    #[test]
    fn test_note_without_expiry_is_in_effect() {
        let note = Note::active(NoteDocumentType::TaxArrears, None);
        assert!(note.is_in_effect(ts("2030-01-01T00:00:00Z")));
    }

    #[test]
    fn test_note_past_expiry_is_not_in_effect() {
        let note = Note::active(
            NoteDocumentType::TransportPermit,
            Some(ts("2026-01-01T00:00:00Z")),
        );
        assert!(note.is_in_effect(ts("2025-12-31T23:59:59Z")));
        assert!(!note.is_in_effect(ts("2026-01-01T00:00:00Z")));
    }

    #[test]
    fn test_cancelled_note_is_not_in_effect() {
        let mut note = Note::active(NoteDocumentType::Caution, None);
        note.status = NoteStatus::Cancelled;
        assert!(!note.is_in_effect(ts("2026-01-01T00:00:00Z")));
    }
}
