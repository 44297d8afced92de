//! # Engine Configuration
//!
//! Statutory constants and rule switches, loaded from YAML. Every field
//! has a default, so an empty document (or no file at all) yields
//! [`EngineConfig::default()`]:
//!
//! ```yaml
//! declared_value_ceiling: 25000
//! reserved_document_id_prefixes: ["1", "8", "9", "REG"]
//! privileged_year_floor: 1900
//! max_sections: 4
//! registry_region: BC
//! interest_rescaling: legacy     # or: exact
//! restricted_liens:
//!   transfer: [SA, TA, TG, TM]
//!   exemption: [SA, TA, TG, TM, LT, MH]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// How interest fractions are brought to a common denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterestRescaling {
    /// Rescale to the largest denominator with integer division, as the
    /// registry always has. Rejects some sets that do total one.
    #[default]
    Legacy,
    /// Rescale to the least common multiple; accepts exactly the sets
    /// that total one.
    Exact,
}

/// Lien type codes that block a change while outstanding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestrictedLiens {
    /// Codes that block transfers.
    pub transfer: Vec<String>,
    /// Codes that block exemptions.
    pub exemption: Vec<String>,
}

impl Default for RestrictedLiens {
    fn default() -> Self {
        let codes = |c: &[&str]| c.iter().map(|s| s.to_string()).collect();
        Self {
            transfer: codes(&["SA", "TA", "TG", "TM"]),
            exemption: codes(&["SA", "TA", "TG", "TM", "LT", "MH"]),
        }
    }
}

/// Validation engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Largest declared value an affidavit transfer may carry.
    pub declared_value_ceiling: u64,
    /// Document id prefixes accepted without a check digit.
    pub reserved_document_id_prefixes: Vec<String>,
    /// Earliest year of manufacture staff may record.
    pub privileged_year_floor: i32,
    /// Most sections a home may declare.
    pub max_sections: u32,
    /// Region code every registered address must carry.
    pub registry_region: String,
    pub interest_rescaling: InterestRescaling,
    pub restricted_liens: RestrictedLiens,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            declared_value_ceiling: 25_000,
            reserved_document_id_prefixes: ["1", "8", "9", "REG"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            privileged_year_floor: 1900,
            max_sections: 4,
            registry_region: "BC".to_string(),
            interest_rescaling: InterestRescaling::Legacy,
            restricted_liens: RestrictedLiens::default(),
        }
    }
}

impl EngineConfig {
    /// Parse configuration from a YAML document.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Config` if the YAML is malformed or the
    /// values are inconsistent.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, EngineError> {
        // An empty document is YAML null, not an empty mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| EngineError::Config(format!("invalid YAML: {e}")))?;
        config.check()?;
        Ok(config)
    }

    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Io` if the file cannot be read and
    /// `EngineError::Config` if it does not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    fn check(&self) -> Result<(), EngineError> {
        if self.max_sections == 0 {
            return Err(EngineError::Config("max_sections must be at least 1".into()));
        }
        if self.registry_region.trim().is_empty() {
            return Err(EngineError::Config("registry_region must not be blank".into()));
        }
        if self
            .reserved_document_id_prefixes
            .iter()
            .any(|p| p.is_empty() || p.len() >= 8)
        {
            return Err(EngineError::Config(
                "reserved document id prefixes must be 1 to 7 characters".into(),
            ));
        }
        Ok(())
    }
}
