//! # Location Validation
//!
//! Which optional location attributes a home's location type requires
//! and which it forbids, the civic address, and the parcel existence check
//! when a PID is given.

use mhr_core::LocationType;
use mhr_state::{Location, LocationField};

use crate::config::EngineConfig;
use crate::diagnostic::{Diagnostic, Rule};
use crate::field::validate_text;
use crate::lookup::ParcelLookup;

/// Attributes that must be present for a location type. `Strata` and
/// `Other` are handled separately: they need a PID or a full legal
/// description.
fn required(location_type: LocationType) -> &'static [LocationField] {
    match location_type {
        LocationType::Manufacturer => &[LocationField::DealerName],
        LocationType::MhPark => &[LocationField::ParkName, LocationField::Pad],
        LocationType::Reserve => &[LocationField::BandName, LocationField::ReserveNumber],
        LocationType::Strata | LocationType::Other => &[],
    }
}

/// Attributes that must be absent for a location type.
fn disallowed(location_type: LocationType) -> &'static [LocationField] {
    use LocationField::*;
    match location_type {
        LocationType::Manufacturer => &[
            ParkName,
            Pad,
            BandName,
            ReserveNumber,
            Pid,
            Lot,
            Plan,
            LandDistrict,
        ],
        LocationType::MhPark => &[DealerName, BandName, ReserveNumber],
        LocationType::Reserve => &[DealerName, ParkName, Pad],
        LocationType::Strata | LocationType::Other => {
            &[DealerName, ParkName, Pad, BandName, ReserveNumber]
        }
    }
}

const LEGAL_DESCRIPTION: [LocationField; 3] =
    [LocationField::Lot, LocationField::Plan, LocationField::LandDistrict];

/// Structural checks on a location: type-dependent attributes, address
/// and character set. No lookups.
pub fn location_rules(location: &Location, config: &EngineConfig, field: &str) -> Vec<Diagnostic> {
    let mut diags = Vec::new();
    let lt = location.location_type;

    for f in required(lt) {
        if location.field(*f).is_none() {
            diags.push(
                Diagnostic::new(
                    Rule::LocationFieldRequired,
                    format!("{} is required for a {lt} location", f.as_str()),
                )
                .with_field(format!("{field}.{}", f.as_str())),
            );
        }
    }
    if matches!(lt, LocationType::Strata | LocationType::Other) {
        let has_pid = location.field(LocationField::Pid).is_some();
        let has_legal = LEGAL_DESCRIPTION.iter().all(|f| location.field(*f).is_some());
        if !has_pid && !has_legal {
            diags.push(
                Diagnostic::new(
                    Rule::LocationFieldRequired,
                    format!("a {lt} location requires a PID or a lot, plan and land district"),
                )
                .with_field(format!("{field}.pid")),
            );
        }
    }
    for f in disallowed(lt) {
        if location.field(*f).is_some() {
            diags.push(
                Diagnostic::new(
                    Rule::LocationFieldNotAllowed,
                    format!("{} is not allowed for a {lt} location", f.as_str()),
                )
                .with_field(format!("{field}.{}", f.as_str())),
            );
        }
    }

    let address = &location.address;
    for (name, value) in [("street", &address.street), ("city", &address.city)] {
        if value.trim().is_empty() {
            diags.push(
                Diagnostic::new(Rule::LocationFieldRequired, format!("address {name} is required"))
                    .with_field(format!("{field}.address.{name}")),
            );
        }
    }
    if !address
        .region
        .trim()
        .eq_ignore_ascii_case(config.registry_region.trim())
    {
        diags.push(
            Diagnostic::new(
                Rule::AddressInvalid,
                format!(
                    "the home must be located in {}, not {:?}",
                    config.registry_region, address.region
                ),
            )
            .with_field(format!("{field}.address.region")),
        );
    }

    let texts = [
        ("dealer_name", location.dealer_name.as_deref()),
        ("park_name", location.park_name.as_deref()),
        ("band_name", location.band_name.as_deref()),
        ("additional_description", location.additional_description.as_deref()),
        ("address.street", Some(address.street.as_str())),
        ("address.city", Some(address.city.as_str())),
    ];
    diags.extend(
        texts
            .into_iter()
            .filter_map(|(name, value)| validate_text(&format!("{field}.{name}"), value?)),
    );
    diags
}

/// Full location validation: [`location_rules`] plus the parcel lookup
/// when a PID is present.
pub fn validate_location(
    location: &Location,
    config: &EngineConfig,
    parcels: &dyn ParcelLookup,
    field: &str,
) -> Vec<Diagnostic> {
    let mut diags = location_rules(location, config, field);
    if let Some(pid) = location.field(LocationField::Pid) {
        match parcels.parcel_exists(pid) {
            Ok(true) => {}
            Ok(false) => diags.push(
                Diagnostic::new(Rule::ParcelNotFound, format!("no land title parcel with PID {pid}"))
                    .with_field(format!("{field}.pid")),
            ),
            Err(e) => {
                tracing::warn!(pid, error = %e, "parcel lookup failed");
                diags.push(
                    Diagnostic::new(
                        Rule::LookupFailed,
                        format!("could not confirm parcel {pid} exists: {e}"),
                    )
                    .with_field(format!("{field}.pid")),
                );
            }
        }
    }
    tracing::debug!(location_type = %location.location_type, violations = diags.len(), "location validated");
    diags
}

/// Reject a proposed location identical to the current one.
pub fn validate_location_different(
    current: Option<&Location>,
    proposed: &Location,
    field: &str,
) -> Option<Diagnostic> {
    let current = current?;
    if !current.same_place(proposed) {
        return None;
    }
    Some(
        Diagnostic::new(
            Rule::LocationUnchanged,
            "the new location is the same as the current location",
        )
        .with_field(field),
    )
}
