//! # Requests
//!
//! Schema-valid change requests, as deserialized from a submission. Shape
//! and presence of required JSON properties are the schema layer's
//! business; these types only carry the values the rule sets read.

use serde::{Deserialize, Serialize};

use mhr_core::{DocumentId, DocumentType, GroupId, MhrNumber, TenancyType, TransferDocumentType};
use mhr_state::{Description, Location, Owner};

/// An owner group being added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerGroupInput {
    /// Group id proposed by the submitter, if any.
    #[serde(default)]
    pub group_id: Option<GroupId>,
    pub tenancy: TenancyType,
    /// 0 when not declared.
    #[serde(default)]
    pub interest_numerator: u32,
    /// 0 when not declared.
    #[serde(default)]
    pub interest_denominator: u32,
    #[serde(default)]
    pub owners: Vec<Owner>,
}

impl OwnerGroupInput {
    pub fn new(tenancy: TenancyType, owners: Vec<Owner>) -> Self {
        Self {
            group_id: None,
            tenancy,
            interest_numerator: 0,
            interest_denominator: 0,
            owners,
        }
    }

    pub fn with_interest(mut self, numerator: u32, denominator: u32) -> Self {
        self.interest_numerator = numerator;
        self.interest_denominator = denominator;
        self
    }
}

/// An existing owner group being removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteGroupInput {
    pub group_id: GroupId,
    /// Tenancy the submitter believes the group has.
    #[serde(default)]
    pub tenancy: Option<TenancyType>,
    /// The group's owners as submitted; a death transfer marks the
    /// deceased among them with death details.
    #[serde(default)]
    pub owners: Vec<Owner>,
}

impl DeleteGroupInput {
    pub fn new(group_id: GroupId) -> Self {
        Self {
            group_id,
            tenancy: None,
            owners: Vec::new(),
        }
    }

    pub fn with_tenancy(mut self, tenancy: TenancyType) -> Self {
        self.tenancy = Some(tenancy);
        self
    }

    pub fn with_owners(mut self, owners: Vec<Owner>) -> Self {
        self.owners = owners;
        self
    }
}

/// Registration of a new home.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRegistrationRequest {
    /// Document id; supplied by registry staff only.
    #[serde(default)]
    pub document_id: Option<DocumentId>,
    #[serde(default)]
    pub owner_groups: Vec<OwnerGroupInput>,
    pub location: Location,
    pub description: Description,
}

/// Transfer of ownership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub mhr_number: MhrNumber,
    /// Sale transfer or one of the death-transfer sub-types.
    pub document_type: DocumentType,
    #[serde(default)]
    pub document_id: Option<DocumentId>,
    /// Statutory basis of a staff-filed sale transfer.
    #[serde(default)]
    pub transfer_document_type: Option<TransferDocumentType>,
    /// Declared value of the home, in whole dollars.
    #[serde(default)]
    pub declared_value: Option<u64>,
    #[serde(default)]
    pub add_owner_groups: Vec<OwnerGroupInput>,
    #[serde(default)]
    pub delete_owner_groups: Vec<DeleteGroupInput>,
}

/// Residential or non-residential exemption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExemptionRequest {
    pub mhr_number: MhrNumber,
    pub document_type: DocumentType,
    #[serde(default)]
    pub document_id: Option<DocumentId>,
    /// Why a non-residential exemption is sought (destroyed, converted,
    /// moved out of province).
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
}

/// Transport permit, permit amendment or permit cancellation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermitRequest {
    pub mhr_number: MhrNumber,
    pub document_type: DocumentType,
    #[serde(default)]
    pub document_id: Option<DocumentId>,
    /// Destination; required except for a cancellation.
    #[serde(default)]
    pub new_location: Option<Location>,
}

/// Registrar correction or public amendment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionRequest {
    pub mhr_number: MhrNumber,
    pub document_type: DocumentType,
    #[serde(default)]
    pub document_id: Option<DocumentId>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub description: Option<Description>,
    #[serde(default)]
    pub add_owner_groups: Vec<OwnerGroupInput>,
    #[serde(default)]
    pub delete_owner_groups: Vec<DeleteGroupInput>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_request_from_json() {
        let json = r#"{
            "mhr_number": "000900",
            "document_type": "TRAND",
            "add_owner_groups": [{
                "tenancy": "SOLE",
                "owners": [{"name": {"individual": {"first": "John", "last": "Smith"}}, "party_type": "OWNER_IND"}]
            }],
            "delete_owner_groups": [{"group_id": 1, "tenancy": "JOINT"}]
        }"#;
        let request: TransferRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.document_type, DocumentType::TransferSurvivingJointTenant);
        assert_eq!(request.add_owner_groups[0].tenancy, TenancyType::Sole);
        assert_eq!(request.add_owner_groups[0].interest_denominator, 0);
        assert_eq!(request.delete_owner_groups[0].group_id, GroupId(1));
        assert_eq!(request.delete_owner_groups[0].tenancy, Some(TenancyType::Joint));
        assert!(request.declared_value.is_none());
    }

    #[test]
    fn test_bad_mhr_number_rejected() {
        let json = r#"{"mhr_number": "9", "document_type": "TRANS"}"#;
        assert!(serde_json::from_str::<TransferRequest>(json).is_err());
    }
}
