//! # Location Versions
//!
//! The legal land location and civic address of a home. Each change of
//! location creates a new version; the previous one becomes historical.

use serde::{Deserialize, Serialize};

use mhr_core::{LocationType, RegistrationId};

/// Status of a location or description version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordStatus {
    /// The current version.
    #[default]
    Active,
    /// Superseded by a later version.
    Historical,
}

/// Civic address of a home.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Street line.
    #[serde(default)]
    pub street: String,
    /// City.
    #[serde(default)]
    pub city: String,
    /// Province or state code.
    #[serde(default)]
    pub region: String,
    /// Postal code; blank and absent are equivalent.
    #[serde(default)]
    pub postal_code: Option<String>,
    /// Country code.
    #[serde(default)]
    pub country: String,
}

/// Optional location attributes whose presence depends on the location type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationField {
    /// Name of the dealer or manufacturer holding the home.
    DealerName,
    /// Manufactured home park name.
    ParkName,
    /// Pad within the park.
    Pad,
    /// First Nations band name.
    BandName,
    /// Reserve number.
    ReserveNumber,
    /// Parcel identifier.
    Pid,
    /// Legal description lot.
    Lot,
    /// Legal description plan.
    Plan,
    /// Legal description land district.
    LandDistrict,
}

impl LocationField {
    /// Serialized name of the field, used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DealerName => "dealer_name",
            Self::ParkName => "park_name",
            Self::Pad => "pad",
            Self::BandName => "band_name",
            Self::ReserveNumber => "reserve_number",
            Self::Pid => "pid",
            Self::Lot => "lot",
            Self::Plan => "plan",
            Self::LandDistrict => "land_district",
        }
    }
}

/// A location version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Kind of location.
    pub location_type: LocationType,
    /// Version status.
    #[serde(default)]
    pub status: RecordStatus,
    /// Registration that created this version.
    #[serde(default)]
    pub registration_id: Option<RegistrationId>,
    #[serde(default)]
    pub dealer_name: Option<String>,
    #[serde(default)]
    pub park_name: Option<String>,
    #[serde(default)]
    pub pad: Option<String>,
    #[serde(default)]
    pub band_name: Option<String>,
    #[serde(default)]
    pub reserve_number: Option<String>,
    #[serde(default)]
    pub pid: Option<String>,
    #[serde(default)]
    pub lot: Option<String>,
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default)]
    pub land_district: Option<String>,
    /// Free-text legal description supplement.
    #[serde(default)]
    pub additional_description: Option<String>,
    /// Civic address.
    #[serde(default)]
    pub address: Address,
}

impl Location {
    /// An active location of the given type with no attributes set.
    pub fn new(location_type: LocationType, address: Address) -> Self {
        Self {
            location_type,
            status: RecordStatus::Active,
            registration_id: None,
            dealer_name: None,
            park_name: None,
            pad: None,
            band_name: None,
            reserve_number: None,
            pid: None,
            lot: None,
            plan: None,
            land_district: None,
            additional_description: None,
            address,
        }
    }

    /// The value of an optional attribute, treating blank as absent.
    pub fn field(&self, field: LocationField) -> Option<&str> {
        let value = match field {
            LocationField::DealerName => &self.dealer_name,
            LocationField::ParkName => &self.park_name,
            LocationField::Pad => &self.pad,
            LocationField::BandName => &self.band_name,
            LocationField::ReserveNumber => &self.reserve_number,
            LocationField::Pid => &self.pid,
            LocationField::Lot => &self.lot,
            LocationField::Plan => &self.plan,
            LocationField::LandDistrict => &self.land_district,
        };
        value.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }

    /// A copy with volatile fields cleared and text normalized, for
    /// deciding whether two versions describe the same place.
    pub fn normalized(&self) -> Location {
        let text = |v: &Option<String>| {
            v.as_deref()
                .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase())
                .filter(|s| !s.is_empty())
        };
        let plain = |s: &str| s.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase();
        Location {
            location_type: self.location_type,
            status: RecordStatus::Active,
            registration_id: None,
            dealer_name: text(&self.dealer_name),
            park_name: text(&self.park_name),
            pad: text(&self.pad),
            band_name: text(&self.band_name),
            reserve_number: text(&self.reserve_number),
            pid: text(&self.pid).map(|p| p.replace('-', "")),
            lot: text(&self.lot),
            plan: text(&self.plan),
            land_district: text(&self.land_district),
            additional_description: text(&self.additional_description),
            address: Address {
                street: plain(&self.address.street),
                city: plain(&self.address.city),
                region: plain(&self.address.region),
                postal_code: text(&self.address.postal_code).map(|p| p.replace(' ', "")),
                country: plain(&self.address.country),
            },
        }
    }

    /// Whether two versions describe the same place.
    pub fn same_place(&self, other: &Location) -> bool {
        self.normalized() == other.normalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn park() -> Location {
        let mut loc = Location::new(
            LocationType::MhPark,
            Address {
                street: "1234 Main St".into(),
                city: "Kamloops".into(),
                region: "BC".into(),
                postal_code: Some("V2C 1A1".into()),
                country: "CA".into(),
            },
        );
        loc.park_name = Some("Sunnyside Park".into());
        loc.pad = Some("12".into());
        loc
    }

    #[test]
    fn test_blank_field_is_absent() {
        let mut loc = park();
        loc.band_name = Some("   ".into());
        assert_eq!(loc.field(LocationField::BandName), None);
        assert_eq!(loc.field(LocationField::Pad), Some("12"));
    }

    #[test]
    fn test_same_place_ignores_volatile_fields() {
        let a = park();
        let mut b = park();
        b.status = RecordStatus::Historical;
        b.registration_id = Some(RegistrationId(7));
        b.park_name = Some("  SUNNYSIDE   park ".into());
        b.address.postal_code = Some("v2c1a1".into());
        assert!(a.same_place(&b));
    }

    #[test]
    fn test_blank_postal_code_equals_absent() {
        let mut a = park();
        let mut b = park();
        a.address.postal_code = Some(" ".into());
        b.address.postal_code = None;
        assert!(a.same_place(&b));
    }

    #[test]
    fn test_different_pad_is_different_place() {
        let a = park();
        let mut b = park();
        b.pad = Some("14".into());
        assert!(!a.same_place(&b));
    }
}
