//! # Description Versions
//!
//! The structural description of a home: manufacturer, year, and the
//! serial number and dimensions of each section.

use serde::{Deserialize, Serialize};

use mhr_core::RegistrationId;

use crate::location::RecordStatus;

/// One transportable section of a home.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Serial number stamped on the section.
    pub serial_number: String,
    #[serde(default)]
    pub length_feet: u32,
    #[serde(default)]
    pub length_inches: u32,
    #[serde(default)]
    pub width_feet: u32,
    #[serde(default)]
    pub width_inches: u32,
}

/// A description version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    /// Version status.
    #[serde(default)]
    pub status: RecordStatus,
    /// Registration that created this version.
    #[serde(default)]
    pub registration_id: Option<RegistrationId>,
    /// Manufacturer name.
    #[serde(default)]
    pub manufacturer: String,
    /// Year the home was built.
    pub year_made: i32,
    #[serde(default)]
    pub make: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    /// Declared number of sections.
    pub section_count: u32,
    /// Section details; length must agree with `section_count`.
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub rebuilt_remarks: Option<String>,
    #[serde(default)]
    pub other_remarks: Option<String>,
}

impl Description {
    /// A copy with volatile fields cleared and text normalized.
    pub fn normalized(&self) -> Description {
        let plain = |s: &str| s.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase();
        let text = |v: &Option<String>| v.as_deref().map(plain).filter(|s| !s.is_empty());
        Description {
            status: RecordStatus::Active,
            registration_id: None,
            manufacturer: plain(&self.manufacturer),
            year_made: self.year_made,
            make: text(&self.make),
            model: text(&self.model),
            section_count: self.section_count,
            sections: self
                .sections
                .iter()
                .map(|s| Section {
                    serial_number: plain(&s.serial_number),
                    ..s.clone()
                })
                .collect(),
            rebuilt_remarks: text(&self.rebuilt_remarks),
            other_remarks: text(&self.other_remarks),
        }
    }

    /// Whether two versions describe the same home.
    pub fn same_home(&self, other: &Description) -> bool {
        self.normalized() == other.normalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn description() -> Description {
        Description {
            status: RecordStatus::Active,
            registration_id: None,
            manufacturer: "Moduline Industries".into(),
            year_made: 2015,
            make: Some("Sierra".into()),
            model: None,
            section_count: 1,
            sections: vec![Section {
                serial_number: "52D70556".into(),
                length_feet: 52,
                length_inches: 0,
                width_feet: 14,
                width_inches: 0,
            }],
            rebuilt_remarks: None,
            other_remarks: Some(" ".into()),
        }
    }

    #[test]
    fn test_same_home_ignores_case_and_status() {
        let a = description();
        let mut b = description();
        b.status = RecordStatus::Historical;
        b.manufacturer = "MODULINE  INDUSTRIES".into();
        b.other_remarks = None;
        assert!(a.same_home(&b));
    }

    #[test]
    fn test_changed_serial_is_different_home() {
        let a = description();
        let mut b = description();
        b.sections[0].serial_number = "52D70557".into();
        assert!(!a.same_home(&b));
    }
}
