//! # Registry Identity Newtypes
//!
//! Newtype wrappers for the identifiers of the manufactured home registry.
//! These prevent accidental identifier confusion: an owner group id
//! cannot be passed where a registration id is expected.

use serde::{Deserialize, Serialize};

use crate::error::MhrError;

/// Six-digit manufactured home registration number identifying an asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MhrNumber(String);

impl MhrNumber {
    /// Required length of an MHR number.
    pub const LEN: usize = 6;

    /// Create an MHR number, rejecting anything but exactly six ASCII digits.
    pub fn new(value: impl Into<String>) -> Result<Self, MhrError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.len() != Self::LEN || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(MhrError::InvalidIdentifier(format!(
                "MHR number must be {} digits, got {value:?}",
                Self::LEN
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Access the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for MhrNumber {
    type Error = MhrError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MhrNumber> for String {
    fn from(value: MhrNumber) -> Self {
        value.0
    }
}

/// Registry document identifier printed on a filed document.
///
/// Construction does not validate the check digit: a submitted document
/// id is checked by the field validators so that a bad value becomes a
/// diagnostic rather than a parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub String);

impl DocumentId {
    /// Create a document id, trimming surrounding whitespace.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_string())
    }

    /// Access the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Owner group identifier, unique within an asset's full history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(pub u32);

/// Registration identifier assigned by the persistence layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegistrationId(pub u64);

impl std::fmt::Display for MhrNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "registration:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mhr_number_accepts_six_digits() {
        let n = MhrNumber::new("102345").unwrap();
        assert_eq!(n.as_str(), "102345");
        assert_eq!(n.to_string(), "102345");
    }

    #[test]
    fn test_mhr_number_trims() {
        assert_eq!(MhrNumber::new(" 000900 ").unwrap().as_str(), "000900");
    }

    #[test]
    fn test_mhr_number_rejects_bad_values() {
        assert!(MhrNumber::new("12345").is_err());
        assert!(MhrNumber::new("1234567").is_err());
        assert!(MhrNumber::new("12A456").is_err());
        assert!(MhrNumber::new("").is_err());
    }

    #[test]
    fn test_mhr_number_serde_validates() {
        let ok: MhrNumber = serde_json::from_str("\"000900\"").unwrap();
        assert_eq!(ok.as_str(), "000900");
        assert!(serde_json::from_str::<MhrNumber>("\"abc\"").is_err());
        assert_eq!(serde_json::to_string(&ok).unwrap(), "\"000900\"");
    }

    #[test]
    fn test_document_id_trims() {
        assert_eq!(DocumentId::new(" 80048709 ").as_str(), "80048709");
    }
}
