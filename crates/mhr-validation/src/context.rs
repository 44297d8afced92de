//! # Caller Context
//!
//! Who is asking and when. Built once per request by the caller and
//! passed into the orchestrator; sub-validators read it, never re-derive
//! it.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use mhr_core::{DocumentType, MhrError, Timestamp};

/// Role group of the submitting account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleGroup {
    /// Any registered account.
    #[default]
    General,
    /// Lawyer or notary account.
    LawyerNotary,
    /// Qualified dealer account.
    Dealer,
    /// Qualified manufacturer account.
    Manufacturer,
}

impl RoleGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::LawyerNotary => "lawyer_notary",
            Self::Dealer => "dealer",
            Self::Manufacturer => "manufacturer",
        }
    }

    /// Whether an account in this role group may file `document_type`
    /// as a transfer. Dealers and manufacturers file sale transfers only.
    pub fn may_file_transfer(&self, document_type: DocumentType) -> bool {
        match self {
            Self::General | Self::LawyerNotary => true,
            Self::Dealer | Self::Manufacturer => document_type == DocumentType::TransferSale,
        }
    }
}

impl std::fmt::Display for RoleGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleGroup {
    type Err = MhrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "general" => Ok(Self::General),
            "lawyer_notary" => Ok(Self::LawyerNotary),
            "dealer" => Ok(Self::Dealer),
            "manufacturer" => Ok(Self::Manufacturer),
            other => Err(MhrError::UnknownCode(format!("unknown RoleGroup: {other:?}"))),
        }
    }
}

/// The caller of one validation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerContext {
    /// Registry staff with elevated rights.
    pub privileged: bool,
    /// Account role group.
    pub role: RoleGroup,
    /// Evaluation instant: "now" for date rules and note expiry.
    pub as_of: Timestamp,
}

impl CallerContext {
    /// A general, unprivileged caller.
    pub fn general(as_of: Timestamp) -> Self {
        Self {
            privileged: false,
            role: RoleGroup::General,
            as_of,
        }
    }

    /// Registry staff.
    pub fn staff(as_of: Timestamp) -> Self {
        Self {
            privileged: true,
            role: RoleGroup::General,
            as_of,
        }
    }

    /// Same caller with another role group.
    pub fn with_role(mut self, role: RoleGroup) -> Self {
        self.role = role;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dealer_files_sale_only() {
        assert!(RoleGroup::Dealer.may_file_transfer(DocumentType::TransferSale));
        assert!(!RoleGroup::Dealer.may_file_transfer(DocumentType::TransferWill));
        assert!(!RoleGroup::Manufacturer.may_file_transfer(DocumentType::TransferSurvivingJointTenant));
        assert!(RoleGroup::LawyerNotary.may_file_transfer(DocumentType::TransferAffidavit));
    }

    #[test]
    fn test_role_group_parse() {
        for role in [
            RoleGroup::General,
            RoleGroup::LawyerNotary,
            RoleGroup::Dealer,
            RoleGroup::Manufacturer,
        ] {
            assert_eq!(role.as_str().parse::<RoleGroup>().unwrap(), role);
        }
        assert!("staff".parse::<RoleGroup>().is_err());
    }

    #[test]
    fn test_staff_context() {
        let now = Timestamp::now();
        let ctx = CallerContext::staff(now).with_role(RoleGroup::Dealer);
        assert!(ctx.privileged);
        assert_eq!(ctx.role, RoleGroup::Dealer);
        assert!(!CallerContext::general(now).privileged);
    }
}
