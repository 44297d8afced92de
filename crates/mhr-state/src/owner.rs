//! # Owner Groups and Owners
//!
//! An owner group is a bundle of one or more owners sharing a tenancy
//! type and, for tenants in common, an interest fraction. Groups are
//! never edited in place: a transfer marks the old group `Previous` and
//! creates a new one with a fresh group id.

use serde::{Deserialize, Serialize};

use mhr_core::{GroupId, PartyType, RegistrationId, TenancyType, Timestamp};

/// Status of an owner group version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OwnerGroupStatus {
    /// The group currently holds an interest in the home.
    Active,
    /// The group held the interest when the home was exempted.
    Exempt,
    /// The group was replaced by a later registration.
    Previous,
}

/// Name of an individual owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndividualName {
    /// Given name.
    pub first: String,
    /// Middle name(s).
    #[serde(default)]
    pub middle: Option<String>,
    /// Family name.
    pub last: String,
}

/// Identity of an owner: a business or an individual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerName {
    /// A business entity, by its registered name.
    Organization(String),
    /// An individual.
    Individual(IndividualName),
}

impl OwnerName {
    /// Individual name without a middle name.
    pub fn individual(first: &str, last: &str) -> Self {
        Self::Individual(IndividualName {
            first: first.to_string(),
            middle: None,
            last: last.to_string(),
        })
    }

    /// Business name.
    pub fn organization(name: &str) -> Self {
        Self::Organization(name.to_string())
    }

    /// Whether this owner is a business entity.
    pub fn is_business(&self) -> bool {
        matches!(self, Self::Organization(_))
    }

    /// Case- and whitespace-insensitive key identifying the same person
    /// or business across registrations.
    pub fn identity_key(&self) -> String {
        match self {
            Self::Organization(name) => format!("ORG:{}", normalize(name)),
            Self::Individual(n) => format!(
                "IND:{}|{}|{}",
                normalize(&n.last),
                normalize(&n.first),
                n.middle.as_deref().map(normalize).unwrap_or_default()
            ),
        }
    }

    /// The free-text parts of the name, labelled for diagnostics.
    pub fn text_fields(&self) -> Vec<(&'static str, &str)> {
        match self {
            Self::Organization(name) => vec![("organization name", name.as_str())],
            Self::Individual(n) => {
                let mut fields = vec![("first name", n.first.as_str()), ("last name", n.last.as_str())];
                if let Some(middle) = n.middle.as_deref() {
                    fields.push(("middle name", middle));
                }
                fields
            }
        }
    }
}

impl std::fmt::Display for OwnerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Organization(name) => f.write_str(name.trim()),
            Self::Individual(n) => match n.middle.as_deref() {
                Some(middle) if !middle.trim().is_empty() => {
                    write!(f, "{} {} {}", n.first.trim(), middle.trim(), n.last.trim())
                }
                _ => write!(f, "{} {}", n.first.trim(), n.last.trim()),
            },
        }
    }
}

fn normalize(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Death evidence carried by a deceased owner in a death transfer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathDetails {
    /// Death certificate number.
    #[serde(default)]
    pub certificate_number: Option<String>,
    /// Date and time of death.
    #[serde(default)]
    pub died_at: Option<Timestamp>,
    /// Reference to a grant of administration.
    #[serde(default)]
    pub grant_reference: Option<String>,
    /// Reference to a grant of probate.
    #[serde(default)]
    pub probate_reference: Option<String>,
}

/// One owner within an owner group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    /// Owner identity.
    pub name: OwnerName,
    /// Capacity the owner holds in.
    pub party_type: PartyType,
    /// Authority description for executors, administrators and trustees.
    #[serde(default)]
    pub description: Option<String>,
    /// Death details when this owner is deceased within a death transfer.
    #[serde(default)]
    pub death: Option<DeathDetails>,
}

impl Owner {
    /// A plain owner; the party type follows the kind of name.
    pub fn new(name: OwnerName) -> Self {
        let party_type = if name.is_business() {
            PartyType::OwnerBusiness
        } else {
            PartyType::OwnerIndividual
        };
        Self {
            name,
            party_type,
            description: None,
            death: None,
        }
    }

    /// Set a representative party type with its authority description.
    pub fn as_representative(mut self, party_type: PartyType, description: &str) -> Self {
        self.party_type = party_type;
        self.description = Some(description.to_string());
        self
    }

    /// Mark the owner deceased.
    pub fn with_death(mut self, death: DeathDetails) -> Self {
        self.death = Some(death);
        self
    }

    /// Whether this owner is recorded as deceased.
    pub fn is_deceased(&self) -> bool {
        self.death.is_some()
    }
}

/// A versioned owner group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerGroup {
    /// Group identifier, unique across the asset's history.
    pub group_id: GroupId,
    /// Registration that created this group version.
    #[serde(default)]
    pub registration_id: Option<RegistrationId>,
    /// Tenancy type.
    pub tenancy: TenancyType,
    /// Version status.
    pub status: OwnerGroupStatus,
    /// Interest numerator; 0 when not declared.
    #[serde(default)]
    pub interest_numerator: u32,
    /// Interest denominator; 0 when not declared.
    #[serde(default)]
    pub interest_denominator: u32,
    /// Owners in the group.
    pub owners: Vec<Owner>,
}

impl OwnerGroup {
    /// An active group without a declared interest.
    pub fn new(group_id: GroupId, tenancy: TenancyType, owners: Vec<Owner>) -> Self {
        Self {
            group_id,
            registration_id: None,
            tenancy,
            status: OwnerGroupStatus::Active,
            interest_numerator: 0,
            interest_denominator: 0,
            owners,
        }
    }

    /// Declare an interest fraction.
    pub fn with_interest(mut self, numerator: u32, denominator: u32) -> Self {
        self.interest_numerator = numerator;
        self.interest_denominator = denominator;
        self
    }

    /// Set the version status.
    pub fn with_status(mut self, status: OwnerGroupStatus) -> Self {
        self.status = status;
        self
    }

    /// Whether this group version currently holds an interest.
    pub fn is_active(&self) -> bool {
        self.status == OwnerGroupStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_key_ignores_case_and_spacing() {
        let a = OwnerName::individual("Jane", "Smith");
        let b = OwnerName::individual(" JANE ", "smith");
        assert_eq!(a.identity_key(), b.identity_key());
        assert_ne!(a.identity_key(), OwnerName::organization("JANE SMITH").identity_key());
    }

    #[test]
    fn test_owner_party_type_follows_name() {
        assert_eq!(
            Owner::new(OwnerName::organization("ACME HOMES LTD")).party_type,
            PartyType::OwnerBusiness
        );
        assert_eq!(
            Owner::new(OwnerName::individual("Jane", "Smith")).party_type,
            PartyType::OwnerIndividual
        );
    }

    #[test]
    fn test_display_name() {
        let n = OwnerName::Individual(IndividualName {
            first: "Jane".into(),
            middle: Some("Q".into()),
            last: "Smith".into(),
        });
        assert_eq!(n.to_string(), "Jane Q Smith");
        assert_eq!(n.text_fields().len(), 3);
    }

    #[test]
    fn test_owner_group_serde_defaults() {
        let json = r#"{
            "group_id": 1,
            "tenancy": "SOLE",
            "status": "ACTIVE",
            "owners": [{"name": {"organization": "ACME"}, "party_type": "OWNER_BUS"}]
        }"#;
        let g: OwnerGroup = serde_json::from_str(json).unwrap();
        assert_eq!(g.interest_denominator, 0);
        assert!(g.is_active());
        assert!(g.owners[0].name.is_business());
        assert!(!g.owners[0].is_deceased());
    }
}
