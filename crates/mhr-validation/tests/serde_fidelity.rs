//! # Wire Format Fidelity
//!
//! Requests, lookup fixtures and diagnostics as the CLI reads and writes
//! them.

use serde_json::json;

use mhr_core::{DocumentType, GroupId, PartyType, TenancyType};
use mhr_validation::{
    Diagnostic, DiagnosticKind, Diagnostics, EngineConfig, InterestRescaling, Rule, StaticLookups,
    TransferRequest,
};

#[test]
fn test_death_transfer_request_from_json() {
    let request: TransferRequest = serde_json::from_value(json!({
        "mhr_number": "102345",
        "document_type": "TRANS_WILL",
        "add_owner_groups": [{
            "tenancy": "NA",
            "owners": [{
                "name": {"individual": {"first": "Ann", "last": "Lee"}},
                "party_type": "EXECUTOR",
                "description": "Executor of the estate of John Smith"
            }]
        }],
        "delete_owner_groups": [{
            "group_id": 1,
            "owners": [{
                "name": {"individual": {"first": "John", "last": "Smith"}},
                "party_type": "OWNER_IND",
                "death": {
                    "certificate_number": "202612345",
                    "died_at": "2026-03-01T12:00:00-08:00",
                    "probate_reference": "P-9876"
                }
            }]
        }]
    }))
    .unwrap();

    assert_eq!(request.document_type, DocumentType::TransferWill);
    assert_eq!(request.declared_value, None);
    let added = &request.add_owner_groups[0];
    assert_eq!(added.tenancy, TenancyType::Na);
    assert_eq!(added.interest_denominator, 0);
    assert_eq!(added.owners[0].party_type, PartyType::Executor);
    let deleted = &request.delete_owner_groups[0];
    assert_eq!(deleted.group_id, GroupId(1));
    assert!(deleted.owners[0].is_deceased());
    assert_eq!(
        deleted.owners[0].death.as_ref().unwrap().died_at.unwrap().to_iso8601(),
        "2026-03-01T20:00:00Z"
    );
}

#[test]
fn test_unknown_document_type_rejected() {
    let result: Result<TransferRequest, _> = serde_json::from_value(json!({
        "mhr_number": "102345",
        "document_type": "TRANS_GIFT"
    }));
    assert!(result.is_err());
}

#[test]
fn test_diagnostics_json_shape() {
    let diags: Diagnostics = vec![
        Diagnostic::new(Rule::FrozenNote, "home 102345 is frozen by a unit note in effect (TAXN)"),
        Diagnostic::new(Rule::DeclaredValueExceeded, "the declared value 25001 exceeds the affidavit limit of 25000")
            .with_field("declared_value"),
    ]
    .into_iter()
    .collect();

    let value = serde_json::to_value(&diags).unwrap();
    assert_eq!(value[0]["code"], "FROZEN_NOTE");
    assert_eq!(value[0]["kind"], "STATE_GATE");
    assert!(value[0]["field"].is_null());
    assert_eq!(value[1]["kind"], "AUTHORITY");
    assert_eq!(value[1]["field"], "declared_value");

    let back: Diagnostics = serde_json::from_value(value).unwrap();
    assert_eq!(back, diags);
    assert_eq!(back.as_slice()[1].kind, DiagnosticKind::Authority);
}

#[test]
fn test_message_string_concatenates_details() {
    let diags: Diagnostics = vec![
        Diagnostic::new(Rule::GroupRequired, "a transfer must add at least one owner group "),
        Diagnostic::new(Rule::LienOutstanding, "home 102345 has outstanding liens"),
    ]
    .into_iter()
    .collect();
    assert_eq!(
        diags.to_message_string(),
        "a transfer must add at least one owner group home 102345 has outstanding liens"
    );
}

#[test]
fn test_lookup_fixture_file_shape() {
    let lookups: StaticLookups = serde_json::from_value(json!({
        "used_document_ids": ["80048709"],
        "liens": {"102345": ["SA", "LT"]}
    }))
    .unwrap();
    assert!(lookups.used_document_ids.contains("80048709"));
    assert!(lookups.parcels.is_empty());
    assert_eq!(lookups.liens["102345"], vec!["SA", "LT"]);
}

#[test]
fn test_engine_config_yaml() {
    let config = EngineConfig::from_yaml_str(
        "interest_rescaling: exact\nrestricted_liens:\n  transfer: [SA]\n",
    )
    .unwrap();
    assert_eq!(config.interest_rescaling, InterestRescaling::Exact);
    assert_eq!(config.restricted_liens.transfer, vec!["SA"]);
    assert_eq!(config.restricted_liens.exemption.len(), 6);
    assert_eq!(config.declared_value_ceiling, 25_000);
}
