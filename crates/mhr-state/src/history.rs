//! # Asset History Capability
//!
//! The read-only view of an asset the validation engine works against.
//! Two adapters implement it:
//!
//! - [`CurrentHistory`] — over a loaded [`Registration`] aggregate (base
//!   registration plus its change chain).
//! - [`crate::legacy::LegacyHistory`] — over a legacy single-record store
//!   snapshot with code-based statuses.
//!
//! Rule code depends only on this trait, never on which store an asset
//! came from.

use mhr_core::{DocumentType, GroupId, MhrNumber, Timestamp};

use crate::description::Description;
use crate::location::{Location, RecordStatus};
use crate::note::Note;
use crate::owner::OwnerGroup;
use crate::registration::{Registration, RegistrationStatus};

/// Read-only view of an asset's current and historical state.
///
/// Implementations are snapshots: every method is a pure read, so the
/// same history always produces the same answers.
pub trait AssetHistory {
    /// The asset's registry number.
    fn mhr_number(&self) -> &MhrNumber;

    /// Current status of the asset.
    fn status(&self) -> RegistrationStatus;

    /// Document types of the change registrations, oldest first.
    fn change_document_types(&self) -> Vec<DocumentType>;

    /// Every owner group version in the asset's history, in filing order.
    fn owner_groups(&self) -> Vec<OwnerGroup>;

    /// Every note filed against the asset.
    fn notes(&self) -> Vec<Note>;

    /// The active location version, if any.
    fn current_location(&self) -> Option<Location>;

    /// The active description version, if any.
    fn current_description(&self) -> Option<Description>;

    /// Document type of the most recent change registration.
    fn last_change_document_type(&self) -> Option<DocumentType> {
        self.change_document_types().last().copied()
    }

    /// Owner groups currently holding an interest: the newest version of
    /// each group id, when that version is active.
    fn active_owner_groups(&self) -> Vec<OwnerGroup> {
        let mut newest: Vec<OwnerGroup> = Vec::new();
        for group in self.owner_groups().into_iter().rev() {
            if !newest.iter().any(|g| g.group_id == group.group_id) {
                newest.push(group);
            }
        }
        newest.reverse();
        newest.retain(OwnerGroup::is_active);
        newest
    }

    /// The newest version of the owner group with this id.
    fn find_owner_group(&self, group_id: GroupId) -> Option<OwnerGroup> {
        self.owner_groups()
            .into_iter()
            .rev()
            .find(|g| g.group_id == group_id)
    }

    /// Notes in effect at `as_of`.
    fn notes_in_effect(&self, as_of: Timestamp) -> Vec<Note> {
        self.notes()
            .into_iter()
            .filter(|n| n.is_in_effect(as_of))
            .collect()
    }
}

/// [`AssetHistory`] over the current registration aggregate.
#[derive(Debug, Clone, Copy)]
pub struct CurrentHistory<'a> {
    base: &'a Registration,
}

impl<'a> CurrentHistory<'a> {
    /// Wrap a base registration with its change chain loaded.
    pub fn new(base: &'a Registration) -> Self {
        Self { base }
    }

    /// The base registration followed by its changes, oldest first.
    fn filings(&self) -> impl DoubleEndedIterator<Item = &'a Registration> + 'a {
        std::iter::once(self.base).chain(self.base.changes.iter())
    }
}

impl AssetHistory for CurrentHistory<'_> {
    fn mhr_number(&self) -> &MhrNumber {
        &self.base.mhr_number
    }

    fn status(&self) -> RegistrationStatus {
        self.base.status
    }

    fn change_document_types(&self) -> Vec<DocumentType> {
        self.base.changes.iter().map(|c| c.document_type).collect()
    }

    fn owner_groups(&self) -> Vec<OwnerGroup> {
        self.filings()
            .flat_map(|r| r.owner_groups.iter().cloned())
            .collect()
    }

    fn notes(&self) -> Vec<Note> {
        self.filings().flat_map(|r| r.notes.iter().cloned()).collect()
    }

    fn current_location(&self) -> Option<Location> {
        self.filings()
            .rev()
            .filter_map(|r| r.location.as_ref())
            .find(|l| l.status == RecordStatus::Active)
            .cloned()
    }

    fn current_description(&self) -> Option<Description> {
        self.filings()
            .rev()
            .filter_map(|r| r.description.as_ref())
            .find(|d| d.status == RecordStatus::Active)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Address;
    use crate::owner::{Owner, OwnerGroupStatus, OwnerName};
    use mhr_core::{DocumentId, LocationType, NoteDocumentType, RegistrationId, TenancyType};

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    fn aggregate() -> Registration {
        let mhr = MhrNumber::new("000900").unwrap();
        let sole = OwnerGroup::new(
            GroupId(1),
            TenancyType::Sole,
            vec![Owner::new(OwnerName::individual("Jane", "Smith"))],
        )
        .with_status(OwnerGroupStatus::Previous);
        let mut base = Registration::new(
            RegistrationId(1),
            mhr.clone(),
            DocumentId::new("80048709"),
            DocumentType::NewRegistration,
            ts("2020-01-01T00:00:00Z"),
        )
        .with_owner_groups(vec![sole])
        .with_location(Location {
            status: RecordStatus::Historical,
            ..Location::new(LocationType::Other, Address::default())
        });

        let joint = OwnerGroup::new(
            GroupId(2),
            TenancyType::Joint,
            vec![
                Owner::new(OwnerName::individual("Jane", "Smith")),
                Owner::new(OwnerName::individual("John", "Smith")),
            ],
        );
        let transfer = Registration::new(
            RegistrationId(2),
            mhr.clone(),
            DocumentId::new("80048717"),
            DocumentType::TransferSale,
            ts("2021-01-01T00:00:00Z"),
        )
        .with_owner_groups(vec![joint])
        .with_notes(vec![Note::active(NoteDocumentType::PublicNote, None)])
        .with_location(Location::new(LocationType::MhPark, Address::default()));
        base.append_change(transfer).unwrap();
        base
    }

    #[test]
    fn test_active_owner_groups() {
        let base = aggregate();
        let history = CurrentHistory::new(&base);
        let active = history.active_owner_groups();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].group_id, GroupId(2));
        assert_eq!(history.owner_groups().len(), 2);
    }

    #[test]
    fn test_superseded_group_version_is_not_active() {
        let mut base = aggregate();
        let ended = OwnerGroup::new(GroupId(2), TenancyType::Joint, Vec::new())
            .with_status(OwnerGroupStatus::Previous);
        let change = Registration::new(
            RegistrationId(3),
            base.mhr_number.clone(),
            DocumentId::new("80048725"),
            DocumentType::TransferSale,
            ts("2022-01-01T00:00:00Z"),
        )
        .with_owner_groups(vec![ended]);
        base.append_change(change).unwrap();
        assert!(CurrentHistory::new(&base).active_owner_groups().is_empty());
    }

    #[test]
    fn test_find_owner_group_includes_inactive() {
        let base = aggregate();
        let history = CurrentHistory::new(&base);
        let g = history.find_owner_group(GroupId(1)).unwrap();
        assert!(!g.is_active());
        assert!(history.find_owner_group(GroupId(9)).is_none());
    }

    #[test]
    fn test_current_location_is_newest_active() {
        let base = aggregate();
        let history = CurrentHistory::new(&base);
        assert_eq!(
            history.current_location().map(|l| l.location_type),
            Some(LocationType::MhPark)
        );
        assert!(history.current_description().is_none());
    }

    #[test]
    fn test_change_document_types_oldest_first() {
        let base = aggregate();
        let history = CurrentHistory::new(&base);
        assert_eq!(history.change_document_types(), vec![DocumentType::TransferSale]);
        assert_eq!(
            history.last_change_document_type(),
            Some(DocumentType::TransferSale)
        );
    }

    #[test]
    fn test_notes_in_effect() {
        let base = aggregate();
        let history = CurrentHistory::new(&base);
        assert_eq!(history.notes_in_effect(ts("2026-01-01T00:00:00Z")).len(), 1);
    }
}
