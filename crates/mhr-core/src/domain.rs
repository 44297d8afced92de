//! # Registry Vocabularies — Closed Sum Types
//!
//! Every registry code the rule sets branch on is a variant of one of the
//! enums in this module: document types, transfer sub-types, note types,
//! tenancy types, party types and location types. Rule code uses
//! exhaustive `match` so that introducing a new variant is a compile error
//! everywhere it has not been handled.
//!
//! Each enum serializes to (and parses from) the registry's wire code,
//! e.g. `DocumentType::TransferAffidavit` ⇔ `"TRANS_AFFIDAVIT"`.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::MhrError;

/// Declares a registry code enum with `as_str`, `all`, `Display` and
/// `FromStr` implementations that agree with its serde representation.
macro_rules! registry_codes {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $code:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $code)] $variant, )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub fn all() -> &'static [$name] {
                &[$( Self::$variant, )+]
            }

            /// The registry wire code for this variant.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $code, )+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = MhrError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $code => Ok(Self::$variant), )+
                    other => Err(MhrError::UnknownCode(format!(
                        concat!("unknown ", stringify!($name), ": {:?}"),
                        other
                    ))),
                }
            }
        }
    };
}

registry_codes! {
    /// The document type of a registration filed against an asset.
    pub enum DocumentType {
        /// New manufactured home registration.
        NewRegistration => "REG_101",
        /// Standard transfer due to sale or gift.
        TransferSale => "TRANS",
        /// Transfer to a surviving joint tenant.
        TransferSurvivingJointTenant => "TRAND",
        /// Transfer to an executor under an affidavit (small estate).
        TransferAffidavit => "TRANS_AFFIDAVIT",
        /// Transfer to an administrator under a grant of administration.
        TransferAdministration => "TRANS_ADMIN",
        /// Transfer to an executor under a grant of probate with will.
        TransferWill => "TRANS_WILL",
        /// Residential exemption.
        ExemptionResidential => "EXRS",
        /// Non-residential exemption (destroyed, converted, moved out of province).
        ExemptionNonResidential => "EXNR",
        /// Rescission of an exemption, returning the home to the registry.
        ExemptionRescission => "EXRE",
        /// Transport permit.
        TransportPermit => "REG_103",
        /// Amendment or extension of an active transport permit.
        AmendedPermit => "REG_103E",
        /// Cancellation of an active transport permit.
        CancelPermit => "CANCEL_PERMIT",
        /// Re-registration of a cancelled home.
        ReRegistration => "REREGISTER_C",
        /// Cancellation of a unit note by public notice.
        NoteCancellation => "NCAN",
        /// Correction made by the registrar.
        RegistrarCorrection => "REGC",
        /// Amendment made in the public interest.
        PublicAmendment => "PUBA",
    }
}

impl DocumentType {
    /// Whether this document transfers ownership.
    pub fn is_transfer(&self) -> bool {
        matches!(
            self,
            Self::TransferSale
                | Self::TransferSurvivingJointTenant
                | Self::TransferAffidavit
                | Self::TransferAdministration
                | Self::TransferWill
        )
    }

    /// The death-transfer sub-type selected by this document, if any.
    pub fn death_transfer_kind(&self) -> Option<DeathTransferKind> {
        match self {
            Self::TransferSurvivingJointTenant => Some(DeathTransferKind::Survivorship),
            Self::TransferAdministration => Some(DeathTransferKind::Administration),
            Self::TransferAffidavit => Some(DeathTransferKind::Affidavit),
            Self::TransferWill => Some(DeathTransferKind::Will),
            _ => None,
        }
    }

    /// Whether this document creates, amends or cancels a transport permit.
    pub fn is_permit_related(&self) -> bool {
        matches!(
            self,
            Self::TransportPermit | Self::AmendedPermit | Self::CancelPermit
        )
    }

    /// Whether this document exempts the home from the registry.
    pub fn is_exemption(&self) -> bool {
        matches!(self, Self::ExemptionResidential | Self::ExemptionNonResidential)
    }
}

/// Sub-type of a transfer triggered by the death of an owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathTransferKind {
    /// A joint tenant died; the surviving joint tenants take the interest.
    Survivorship,
    /// The estate is transferred to an administrator under a grant.
    Administration,
    /// The estate is transferred to an executor by affidavit.
    Affidavit,
    /// The estate is transferred to an executor under probate.
    Will,
}

impl DeathTransferKind {
    /// The document type that declares this sub-type.
    pub fn document_type(&self) -> DocumentType {
        match self {
            Self::Survivorship => DocumentType::TransferSurvivingJointTenant,
            Self::Administration => DocumentType::TransferAdministration,
            Self::Affidavit => DocumentType::TransferAffidavit,
            Self::Will => DocumentType::TransferWill,
        }
    }

    /// Whether the new owners must be estate representatives.
    pub fn requires_representative(&self) -> bool {
        !matches!(self, Self::Survivorship)
    }
}

registry_codes! {
    /// Statutory basis of a staff-filed standard transfer.
    pub enum TransferDocumentType {
        /// Transfer following a land title transfer.
        LandTitle => "TRANS_LAND_TITLE",
        /// Transfer under a family law order.
        FamilyAct => "TRANS_FAMILY_ACT",
        /// Quit claim.
        QuitClaim => "TRANS_QUIT_CLAIM",
        /// Severing of a joint tenancy.
        SeverGrant => "TRANS_SEVER_GRANT",
        /// Transfer by a receiver.
        Receivership => "TRANS_RECEIVERSHIP",
        /// Transfer following a writ of seizure and sale.
        WritSeizure => "TRANS_WRIT_SEIZURE",
    }
}

registry_codes! {
    /// Document type of a unit note attached to an asset.
    pub enum NoteDocumentType {
        /// Notice of tax arrears.
        TaxArrears => "TAXN",
        /// Caution on the title.
        Caution => "CAU",
        /// Continued caution.
        CautionContinued => "CAUC",
        /// Extended caution.
        CautionExtended => "CAUE",
        /// Restraining notice.
        RestrainingNotice => "REST",
        /// Transport permit.
        TransportPermit => "REG_103",
        /// Public note.
        PublicNote => "NPUB",
        /// Confidential note.
        ConfidentialNote => "NCON",
    }
}

impl NoteDocumentType {
    /// Whether an in-effect note of this type freezes the asset.
    pub fn freezes(&self) -> bool {
        match self {
            Self::TaxArrears
            | Self::Caution
            | Self::CautionContinued
            | Self::CautionExtended
            | Self::RestrainingNotice => true,
            Self::TransportPermit | Self::PublicNote | Self::ConfidentialNote => false,
        }
    }
}

registry_codes! {
    /// Tenancy of an owner group.
    pub enum TenancyType {
        /// A single owner.
        Sole => "SOLE",
        /// Joint tenants with right of survivorship.
        Joint => "JOINT",
        /// One slice of a tenants-in-common ownership.
        Common => "COMMON",
        /// Not applicable: the group holds as estate representatives.
        Na => "NA",
    }
}

registry_codes! {
    /// Capacity in which an owner holds their interest.
    pub enum PartyType {
        /// An individual owner.
        OwnerIndividual => "OWNER_IND",
        /// A business owner.
        OwnerBusiness => "OWNER_BUS",
        /// Executor of an estate.
        Executor => "EXECUTOR",
        /// Administrator of an estate.
        Administrator => "ADMINISTRATOR",
        /// Trustee.
        Trustee => "TRUSTEE",
    }
}

impl PartyType {
    /// Whether this party holds on behalf of someone else and must
    /// describe their authority.
    pub fn is_representative(&self) -> bool {
        match self {
            Self::Executor | Self::Administrator | Self::Trustee => true,
            Self::OwnerIndividual | Self::OwnerBusiness => false,
        }
    }
}

registry_codes! {
    /// Kind of physical location a home is registered at.
    pub enum LocationType {
        /// On a dealer's or manufacturer's lot.
        Manufacturer => "MANUFACTURER",
        /// In a manufactured home park.
        MhPark => "MH_PARK",
        /// On a First Nations reserve.
        Reserve => "RESERVE",
        /// On a strata lot.
        Strata => "STRATA",
        /// Any other land parcel.
        Other => "OTHER",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_type_codes_roundtrip() {
        for dt in DocumentType::all() {
            let parsed: DocumentType = dt.as_str().parse().unwrap();
            assert_eq!(*dt, parsed);
            let json = serde_json::to_string(dt).unwrap();
            assert_eq!(json, format!("\"{}\"", dt.as_str()));
        }
    }

    #[test]
    fn test_unknown_code_rejected() {
        assert!("TRANSFER".parse::<DocumentType>().is_err());
        assert!("sole".parse::<TenancyType>().is_err());
        assert!("".parse::<PartyType>().is_err());
    }

    #[test]
    fn test_death_transfer_kind_selection() {
        assert_eq!(
            DocumentType::TransferSurvivingJointTenant.death_transfer_kind(),
            Some(DeathTransferKind::Survivorship)
        );
        assert_eq!(DocumentType::TransferSale.death_transfer_kind(), None);
        for kind in [
            DeathTransferKind::Survivorship,
            DeathTransferKind::Administration,
            DeathTransferKind::Affidavit,
            DeathTransferKind::Will,
        ] {
            assert_eq!(kind.document_type().death_transfer_kind(), Some(kind));
            assert!(kind.document_type().is_transfer());
        }
    }

    #[test]
    fn test_freezing_notes() {
        let freezing: Vec<_> = NoteDocumentType::all()
            .iter()
            .filter(|n| n.freezes())
            .map(|n| n.as_str())
            .collect();
        assert_eq!(freezing, vec!["TAXN", "CAU", "CAUC", "CAUE", "REST"]);
    }

    #[test]
    fn test_permit_related() {
        assert!(DocumentType::CancelPermit.is_permit_related());
        assert!(!DocumentType::ExemptionResidential.is_permit_related());
    }

    #[test]
    fn test_representative_party_types() {
        assert!(PartyType::Executor.is_representative());
        assert!(PartyType::Trustee.is_representative());
        assert!(!PartyType::OwnerBusiness.is_representative());
    }
}
