//! # Legacy Store Adapter
//!
//! Assets registered before the current data model live in a legacy
//! store: one flat record per home, fixed-width padded code columns, a
//! single owner-name column, and interest stored as text such as
//! `"UNDIVIDED 1/2"`.
//!
//! [`LegacyHistory`] decodes such a record once, at construction, into the
//! same owned types the current model uses. Unknown codes are rejected
//! there, so the rule sets never see a half-decoded legacy value.

use serde::{Deserialize, Serialize};

use mhr_core::{
    DocumentType, GroupId, MhrError, MhrNumber, NoteDocumentType, PartyType, TenancyType,
    Timestamp,
};

use crate::description::Description;
use crate::history::AssetHistory;
use crate::location::Location;
use crate::note::{Note, NoteStatus};
use crate::owner::{IndividualName, Owner, OwnerGroup, OwnerGroupStatus, OwnerName};
use crate::registration::RegistrationStatus;

// ─── Legacy Record Shape ─────────────────────────────────────────────

/// One filed document in the legacy store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyDocument {
    /// Document id as printed.
    pub document_id: String,
    /// Padded legacy document type code, e.g. `"TRAN"`, `"103 "`.
    pub document_type_code: String,
    /// When the document was registered.
    pub registered_at: Timestamp,
}

/// One owner in the legacy store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyOwner {
    /// Name column. Individuals are stored surname first: `"SMITH JANE Q"`.
    pub name: String,
    /// `"I"` for an individual, `"B"` for a business.
    pub owner_type_code: String,
    /// Representative capacity code, if any.
    #[serde(default)]
    pub party_type_code: Option<String>,
    /// Representative authority description.
    #[serde(default)]
    pub description: Option<String>,
}

/// One owner group in the legacy store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyOwnerGroup {
    /// Group number.
    pub group_id: u32,
    /// `"3"` active, `"5"` previous, `"7"` exempt.
    pub status_code: String,
    /// `"SO"`, `"JT"`, `"TC"` or `"NA"`.
    pub tenancy_code: String,
    /// Interest text, e.g. `"UNDIVIDED 1/2"`; blank when not declared.
    #[serde(default)]
    pub interest: String,
    /// Owners in the group.
    pub owners: Vec<LegacyOwner>,
}

/// One unit note in the legacy store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyNote {
    /// Padded legacy note type code.
    pub document_type_code: String,
    /// `"A"` active, `"E"` expired, `"C"` cancelled.
    pub status_code: String,
    /// Expiry, if any.
    #[serde(default)]
    pub expires_at: Option<Timestamp>,
}

/// A legacy single-record snapshot of an asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyAssetRecord {
    /// Asset number.
    pub mhr_number: MhrNumber,
    /// `"R"` registered, `"E"` exempt, `"C"` cancelled, `"H"` historical.
    pub status_code: String,
    /// Every document filed against the asset, base registration included.
    #[serde(default)]
    pub documents: Vec<LegacyDocument>,
    #[serde(default)]
    pub owner_groups: Vec<LegacyOwnerGroup>,
    #[serde(default)]
    pub notes: Vec<LegacyNote>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub description: Option<Description>,
}

// ─── Adapter ─────────────────────────────────────────────────────────

/// [`AssetHistory`] over a decoded legacy record.
#[derive(Debug, Clone)]
pub struct LegacyHistory {
    mhr_number: MhrNumber,
    status: RegistrationStatus,
    change_types: Vec<DocumentType>,
    groups: Vec<OwnerGroup>,
    notes: Vec<Note>,
    location: Option<Location>,
    description: Option<Description>,
}

impl LegacyHistory {
    /// Decode a legacy record.
    ///
    /// # Errors
    ///
    /// Returns `MhrError::UnknownCode` for any status, tenancy, party,
    /// document or note code the legacy store never used, and for an
    /// interest column that is not blank or `"<words> n/d"`. Returns
    /// `MhrError::InvalidIdentifier` when the record has no documents.
    pub fn from_record(record: &LegacyAssetRecord) -> Result<Self, MhrError> {
        let mut documents: Vec<&LegacyDocument> = record.documents.iter().collect();
        if documents.is_empty() {
            return Err(MhrError::InvalidIdentifier(format!(
                "legacy record {} has no base registration document",
                record.mhr_number
            )));
        }
        documents.sort_by_key(|d| d.registered_at);
        let change_types = documents[1..]
            .iter()
            .map(|d| legacy_document_type(&d.document_type_code))
            .collect::<Result<Vec<_>, _>>()?;

        let groups = record
            .owner_groups
            .iter()
            .map(decode_group)
            .collect::<Result<Vec<_>, _>>()?;

        let notes = record
            .notes
            .iter()
            .map(|n| {
                Ok(Note {
                    document_type: legacy_note_type(&n.document_type_code)?,
                    status: legacy_note_status(&n.status_code)?,
                    expires_at: n.expires_at,
                    registration_id: None,
                })
            })
            .collect::<Result<Vec<_>, MhrError>>()?;

        Ok(Self {
            mhr_number: record.mhr_number.clone(),
            status: legacy_status(&record.status_code)?,
            change_types,
            groups,
            notes,
            location: record.location.clone(),
            description: record.description.clone(),
        })
    }
}

impl AssetHistory for LegacyHistory {
    fn mhr_number(&self) -> &MhrNumber {
        &self.mhr_number
    }

    fn status(&self) -> RegistrationStatus {
        self.status
    }

    fn change_document_types(&self) -> Vec<DocumentType> {
        self.change_types.clone()
    }

    fn owner_groups(&self) -> Vec<OwnerGroup> {
        self.groups.clone()
    }

    fn notes(&self) -> Vec<Note> {
        self.notes.clone()
    }

    fn current_location(&self) -> Option<Location> {
        self.location.clone()
    }

    fn current_description(&self) -> Option<Description> {
        self.description.clone()
    }
}

// ─── Code Tables ─────────────────────────────────────────────────────

fn unknown(what: &str, code: &str) -> MhrError {
    MhrError::UnknownCode(format!("legacy {what} code {code:?}"))
}

fn legacy_status(code: &str) -> Result<RegistrationStatus, MhrError> {
    match code.trim() {
        "R" => Ok(RegistrationStatus::Active),
        "E" => Ok(RegistrationStatus::Exempt),
        "C" => Ok(RegistrationStatus::Cancelled),
        "H" => Ok(RegistrationStatus::Historical),
        other => Err(unknown("registration status", other)),
    }
}

fn legacy_group_status(code: &str) -> Result<OwnerGroupStatus, MhrError> {
    match code.trim() {
        "3" => Ok(OwnerGroupStatus::Active),
        "5" => Ok(OwnerGroupStatus::Previous),
        "7" => Ok(OwnerGroupStatus::Exempt),
        other => Err(unknown("owner group status", other)),
    }
}

fn legacy_tenancy(code: &str) -> Result<TenancyType, MhrError> {
    match code.trim() {
        "SO" => Ok(TenancyType::Sole),
        "JT" => Ok(TenancyType::Joint),
        "TC" => Ok(TenancyType::Common),
        "NA" => Ok(TenancyType::Na),
        other => Err(unknown("tenancy", other)),
    }
}

fn legacy_note_status(code: &str) -> Result<NoteStatus, MhrError> {
    match code.trim() {
        "A" => Ok(NoteStatus::Active),
        "E" => Ok(NoteStatus::Expired),
        "C" => Ok(NoteStatus::Cancelled),
        other => Err(unknown("note status", other)),
    }
}

/// Legacy document codes that differ from the current vocabulary; any
/// other code is read with the current vocabulary.
fn legacy_document_type(code: &str) -> Result<DocumentType, MhrError> {
    match code.trim() {
        "101" => Ok(DocumentType::NewRegistration),
        "TRAN" => Ok(DocumentType::TransferSale),
        "DEAT" => Ok(DocumentType::TransferSurvivingJointTenant),
        "AFFE" => Ok(DocumentType::TransferAffidavit),
        "LETA" => Ok(DocumentType::TransferAdministration),
        "WILL" => Ok(DocumentType::TransferWill),
        "103" => Ok(DocumentType::TransportPermit),
        "103E" => Ok(DocumentType::AmendedPermit),
        other => other.parse().map_err(|_| unknown("document type", other)),
    }
}

fn legacy_note_type(code: &str) -> Result<NoteDocumentType, MhrError> {
    match code.trim() {
        "103" => Ok(NoteDocumentType::TransportPermit),
        other => other.parse().map_err(|_| unknown("note type", other)),
    }
}

fn legacy_party_type(code: Option<&str>, business: bool) -> Result<PartyType, MhrError> {
    match code.map(str::trim).filter(|c| !c.is_empty()) {
        None if business => Ok(PartyType::OwnerBusiness),
        None => Ok(PartyType::OwnerIndividual),
        Some("E") => Ok(PartyType::Executor),
        Some("A") => Ok(PartyType::Administrator),
        Some("T") => Ok(PartyType::Trustee),
        Some(other) => other.parse().map_err(|_| unknown("party type", other)),
    }
}

/// Parse `"UNDIVIDED 1/2"` (or `"1/2"`) into `(1, 2)`; blank is `(0, 0)`.
fn legacy_interest(text: &str) -> Result<(u32, u32), MhrError> {
    let Some(fraction) = text.split_whitespace().last() else {
        return Ok((0, 0));
    };
    let (num, den) = fraction
        .split_once('/')
        .ok_or_else(|| unknown("interest", text))?;
    let num = num.parse().map_err(|_| unknown("interest", text))?;
    let den = den.parse().map_err(|_| unknown("interest", text))?;
    Ok((num, den))
}

fn decode_owner(owner: &LegacyOwner) -> Result<Owner, MhrError> {
    let business = match owner.owner_type_code.trim() {
        "B" => true,
        "I" => false,
        other => return Err(unknown("owner type", other)),
    };
    let name = if business {
        OwnerName::Organization(owner.name.trim().to_string())
    } else {
        let mut parts = owner.name.split_whitespace();
        let last = parts.next().unwrap_or_default().to_string();
        let first = parts.next().unwrap_or_default().to_string();
        let middle = parts.collect::<Vec<_>>().join(" ");
        OwnerName::Individual(IndividualName {
            first,
            middle: (!middle.is_empty()).then_some(middle),
            last,
        })
    };
    Ok(Owner {
        name,
        party_type: legacy_party_type(owner.party_type_code.as_deref(), business)?,
        description: owner.description.clone(),
        death: None,
    })
}

fn decode_group(group: &LegacyOwnerGroup) -> Result<OwnerGroup, MhrError> {
    let (interest_numerator, interest_denominator) = legacy_interest(&group.interest)?;
    Ok(OwnerGroup {
        group_id: GroupId(group.group_id),
        registration_id: None,
        tenancy: legacy_tenancy(&group.tenancy_code)?,
        status: legacy_group_status(&group.status_code)?,
        interest_numerator,
        interest_denominator,
        owners: group
            .owners
            .iter()
            .map(decode_owner)
            .collect::<Result<Vec<_>, _>>()?,
    })
}
