//! # Validation Orchestrator
//!
//! [`Validator`] composes the rule sets for each request kind. Every
//! sub-validator runs and its diagnostics are appended in a fixed order:
//!
//! ```text
//! state gate → authority → document id → location / description
//!            → owner groups (death rules for death transfers) → liens
//! ```
//!
//! Only a missing history or a history for a different home aborts the
//! evaluation with an [`EngineError`]. Collaborator failures are reported
//! as `LOOKUP_FAILED` diagnostics.

use mhr_core::{DocumentType, MhrNumber};
use mhr_state::AssetHistory;

use crate::config::EngineConfig;
use crate::context::CallerContext;
use crate::death::validate_death_transfer;
use crate::description::{validate_description, validate_description_different};
use crate::diagnostic::{Diagnostic, Diagnostics, Rule};
use crate::error::EngineError;
use crate::field::{validate_document_id, validate_text};
use crate::gate;
use crate::lien::validate_liens;
use crate::location::{validate_location, validate_location_different};
use crate::lookup::RegistryLookups;
use crate::owners::validate_owner_groups;
use crate::request::{
    CorrectionRequest, ExemptionRequest, NewRegistrationRequest, PermitRequest, TransferRequest,
};

/// Resolve the history a change request is evaluated against.
fn resolve<'h>(
    history: Option<&'h dyn AssetHistory>,
    mhr_number: &MhrNumber,
) -> Result<&'h dyn AssetHistory, EngineError> {
    let history = history.ok_or_else(|| EngineError::AssetNotFound(mhr_number.clone()))?;
    if history.mhr_number() != mhr_number {
        return Err(EngineError::AssetMismatch {
            expected: mhr_number.clone(),
            actual: history.mhr_number().clone(),
        });
    }
    Ok(history)
}

fn document_type_invalid(document_type: DocumentType, expected: &str) -> Diagnostic {
    Diagnostic::new(
        Rule::DocumentTypeInvalid,
        format!("{document_type} is not {expected}"),
    )
    .with_field("document_type")
}

fn log_verdict(request: &str, mhr_number: Option<&MhrNumber>, document_type: DocumentType, diags: &Diagnostics) {
    let mhr_number = mhr_number.map(MhrNumber::as_str).unwrap_or("new");
    if diags.is_empty() {
        tracing::info!(request, mhr_number, document_type = %document_type, "request passed validation");
    } else {
        tracing::info!(
            request,
            mhr_number,
            document_type = %document_type,
            violations = diags.len(),
            codes = ?diags.codes(),
            "request failed validation"
        );
    }
}

/// The change-validation engine.
///
/// Holds the configuration and the external lookups; each `validate_*`
/// call is independent, so one validator can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct Validator<L> {
    config: EngineConfig,
    lookups: L,
}

impl<L: RegistryLookups> Validator<L> {
    pub fn new(config: EngineConfig, lookups: L) -> Self {
        Self { config, lookups }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn lookups(&self) -> &L {
        &self.lookups
    }

    /// Validate the registration of a new home. There is no history, so
    /// the state gate and lien check do not apply.
    pub fn validate_registration(
        &self,
        request: &NewRegistrationRequest,
        ctx: &CallerContext,
    ) -> Diagnostics {
        let mut diags = Diagnostics::new();
        diags.extend(validate_document_id(
            request.document_id.as_ref(),
            ctx,
            &self.config,
            &self.lookups,
        ));
        diags.extend(validate_location(&request.location, &self.config, &self.lookups, "location"));
        diags.extend(validate_description(&request.description, ctx, &self.config, "description"));
        if request.owner_groups.is_empty() {
            diags.push(
                Diagnostic::new(Rule::GroupRequired, "a new registration needs at least one owner group")
                    .with_field("owner_groups"),
            );
        } else {
            diags.extend(validate_owner_groups(
                None,
                &request.owner_groups,
                &[],
                &self.config,
                "owner_groups",
            ));
        }
        log_verdict("registration", None, DocumentType::NewRegistration, &diags);
        diags
    }

    /// Validate a sale transfer or a death transfer.
    ///
    /// # Errors
    ///
    /// `AssetNotFound` without a history, `AssetMismatch` when the
    /// history is for another home.
    pub fn validate_transfer(
        &self,
        history: Option<&dyn AssetHistory>,
        request: &TransferRequest,
        ctx: &CallerContext,
    ) -> Result<Diagnostics, EngineError> {
        let history = resolve(history, &request.mhr_number)?;
        let document_type = request.document_type;
        let mut diags = Diagnostics::new();

        diags.extend(gate::evaluate(history, document_type, ctx));

        if !document_type.is_transfer() {
            diags.push(document_type_invalid(document_type, "a transfer"));
        } else if !ctx.role.may_file_transfer(document_type) {
            diags.push(
                Diagnostic::new(
                    Rule::DocumentTypeNotAllowed,
                    format!("{} accounts may not file a {document_type}", ctx.role),
                )
                .with_field("document_type"),
            );
        }
        if let Some(transfer_type) = request.transfer_document_type {
            if !ctx.privileged {
                diags.push(
                    Diagnostic::new(
                        Rule::TransferDocumentTypePrivileged,
                        format!("only registry staff may file a {transfer_type} transfer"),
                    )
                    .with_field("transfer_document_type"),
                );
            } else if document_type != DocumentType::TransferSale {
                diags.push(
                    Diagnostic::new(
                        Rule::DocumentTypeInvalid,
                        format!("a {transfer_type} basis only applies to a sale transfer, not {document_type}"),
                    )
                    .with_field("transfer_document_type"),
                );
            }
        }

        diags.extend(validate_document_id(
            request.document_id.as_ref(),
            ctx,
            &self.config,
            &self.lookups,
        ));

        let death_kind = document_type.death_transfer_kind();
        if death_kind.is_none() {
            if request.add_owner_groups.is_empty() {
                diags.push(
                    Diagnostic::new(Rule::GroupRequired, "a transfer must add at least one owner group")
                        .with_field("add_owner_groups"),
                );
            }
            if request.delete_owner_groups.is_empty() {
                diags.push(
                    Diagnostic::new(Rule::GroupRequired, "a transfer must delete at least one owner group")
                        .with_field("delete_owner_groups"),
                );
            }
        }
        diags.extend(validate_owner_groups(
            Some(history),
            &request.add_owner_groups,
            &request.delete_owner_groups,
            &self.config,
            "add_owner_groups",
        ));
        if let Some(kind) = death_kind {
            diags.extend(validate_death_transfer(kind, history, request, ctx, &self.config));
        }

        diags.extend(validate_liens(
            &request.mhr_number,
            &self.config.restricted_liens.transfer,
            &self.lookups,
        ));

        log_verdict("transfer", Some(&request.mhr_number), document_type, &diags);
        Ok(diags)
    }

    /// Validate a residential or non-residential exemption, or the
    /// rescission of one.
    ///
    /// # Errors
    ///
    /// As for [`Validator::validate_transfer`].
    pub fn validate_exemption(
        &self,
        history: Option<&dyn AssetHistory>,
        request: &ExemptionRequest,
        ctx: &CallerContext,
    ) -> Result<Diagnostics, EngineError> {
        let history = resolve(history, &request.mhr_number)?;
        let document_type = request.document_type;
        let mut diags = Diagnostics::new();

        diags.extend(gate::evaluate(history, document_type, ctx));

        let rescission = document_type == DocumentType::ExemptionRescission;
        if !document_type.is_exemption() && !rescission {
            diags.push(document_type_invalid(document_type, "an exemption"));
        }
        if document_type == DocumentType::ExemptionNonResidential
            && request.reason.as_deref().map_or(true, |r| r.trim().is_empty())
        {
            diags.push(
                Diagnostic::new(
                    Rule::ExemptionReasonRequired,
                    "a non-residential exemption must state why the home is no longer residential",
                )
                .with_field("reason"),
            );
        }
        for (field, value) in [("reason", &request.reason), ("remarks", &request.remarks)] {
            if let Some(d) = value.as_deref().and_then(|v| validate_text(field, v)) {
                diags.push(d);
            }
        }

        diags.extend(validate_document_id(
            request.document_id.as_ref(),
            ctx,
            &self.config,
            &self.lookups,
        ));

        if !rescission {
            diags.extend(validate_liens(
                &request.mhr_number,
                &self.config.restricted_liens.exemption,
                &self.lookups,
            ));
        }

        log_verdict("exemption", Some(&request.mhr_number), document_type, &diags);
        Ok(diags)
    }

    /// Validate a transport permit, an amended permit or a permit
    /// cancellation.
    ///
    /// # Errors
    ///
    /// As for [`Validator::validate_transfer`].
    pub fn validate_permit(
        &self,
        history: Option<&dyn AssetHistory>,
        request: &PermitRequest,
        ctx: &CallerContext,
    ) -> Result<Diagnostics, EngineError> {
        let history = resolve(history, &request.mhr_number)?;
        let document_type = request.document_type;
        let mut diags = Diagnostics::new();

        diags.extend(gate::evaluate(history, document_type, ctx));
        if !document_type.is_permit_related() {
            diags.push(document_type_invalid(document_type, "a transport permit document"));
        }

        diags.extend(validate_document_id(
            request.document_id.as_ref(),
            ctx,
            &self.config,
            &self.lookups,
        ));

        if matches!(document_type, DocumentType::TransportPermit | DocumentType::AmendedPermit) {
            match &request.new_location {
                None => diags.push(
                    Diagnostic::new(
                        Rule::LocationFieldRequired,
                        format!("a {document_type} needs the location the home is moving to"),
                    )
                    .with_field("new_location"),
                ),
                Some(location) => {
                    diags.extend(validate_location(location, &self.config, &self.lookups, "new_location"));
                    let current = history.current_location();
                    diags.extend(validate_location_different(current.as_ref(), location, "new_location"));
                }
            }
        }

        log_verdict("permit", Some(&request.mhr_number), document_type, &diags);
        Ok(diags)
    }

    /// Validate a registrar correction or a public amendment. Location,
    /// description and owner changes are each optional; any supplied must
    /// differ from what is on file.
    ///
    /// # Errors
    ///
    /// As for [`Validator::validate_transfer`].
    pub fn validate_correction(
        &self,
        history: Option<&dyn AssetHistory>,
        request: &CorrectionRequest,
        ctx: &CallerContext,
    ) -> Result<Diagnostics, EngineError> {
        let history = resolve(history, &request.mhr_number)?;
        let document_type = request.document_type;
        let mut diags = Diagnostics::new();

        diags.extend(gate::evaluate(history, document_type, ctx));
        if !matches!(
            document_type,
            DocumentType::RegistrarCorrection | DocumentType::PublicAmendment
        ) {
            diags.push(document_type_invalid(document_type, "a correction or amendment"));
        } else if !ctx.privileged {
            diags.push(
                Diagnostic::new(
                    Rule::DocumentTypeNotAllowed,
                    format!("only registry staff may file a {document_type}"),
                )
                .with_field("document_type"),
            );
        }

        diags.extend(validate_document_id(
            request.document_id.as_ref(),
            ctx,
            &self.config,
            &self.lookups,
        ));

        if let Some(location) = &request.location {
            diags.extend(validate_location(location, &self.config, &self.lookups, "location"));
            let current = history.current_location();
            diags.extend(validate_location_different(current.as_ref(), location, "location"));
        }
        if let Some(description) = &request.description {
            diags.extend(validate_description(description, ctx, &self.config, "description"));
            let current = history.current_description();
            diags.extend(validate_description_different(current.as_ref(), description, "description"));
        }
        if !request.add_owner_groups.is_empty() || !request.delete_owner_groups.is_empty() {
            diags.extend(validate_owner_groups(
                Some(history),
                &request.add_owner_groups,
                &request.delete_owner_groups,
                &self.config,
                "add_owner_groups",
            ));
        }

        log_verdict("correction", Some(&request.mhr_number), document_type, &diags);
        Ok(diags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::StaticLookups;
    use crate::request::{DeleteGroupInput, OwnerGroupInput};
    use mhr_core::{DocumentId, GroupId, LocationType, RegistrationId, TenancyType, Timestamp};
    use mhr_state::{Address, CurrentHistory, Location, Owner, OwnerGroup, OwnerName, Registration};

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    fn ctx() -> CallerContext {
        CallerContext::general(ts("2026-06-01T00:00:00Z"))
    }

    fn mhr() -> MhrNumber {
        MhrNumber::new("000900").unwrap()
    }

    fn person(first: &str, last: &str) -> Owner {
        Owner::new(OwnerName::individual(first, last))
    }

    fn park(pad: &str) -> Location {
        let mut location = Location::new(
            LocationType::MhPark,
            Address {
                street: "1234 Main St".into(),
                city: "Kamloops".into(),
                region: "BC".into(),
                postal_code: None,
                country: "CA".into(),
            },
        );
        location.park_name = Some("Riverside Estates".into());
        location.pad = Some(pad.into());
        location
    }

    fn asset() -> Registration {
        Registration::new(
            RegistrationId(1),
            mhr(),
            DocumentId::new("80048709"),
            DocumentType::NewRegistration,
            ts("2020-01-01T00:00:00Z"),
        )
        .with_owner_groups(vec![OwnerGroup::new(
            GroupId(1),
            TenancyType::Sole,
            vec![person("Jane", "Smith")],
        )])
        .with_location(park("12"))
    }

    fn sale() -> TransferRequest {
        TransferRequest {
            mhr_number: mhr(),
            document_type: DocumentType::TransferSale,
            document_id: None,
            transfer_document_type: None,
            declared_value: None,
            add_owner_groups: vec![OwnerGroupInput::new(TenancyType::Sole, vec![person("Ann", "Lee")])],
            delete_owner_groups: vec![DeleteGroupInput::new(GroupId(1))],
        }
    }

    fn validator() -> Validator<StaticLookups> {
        Validator::new(EngineConfig::default(), StaticLookups::new())
    }

    #[test]
    fn test_sale_transfer_passes() {
        let reg = asset();
        let diags = validator()
            .validate_transfer(Some(&CurrentHistory::new(&reg)), &sale(), &ctx())
            .unwrap();
        assert!(diags.is_empty(), "{diags}");
    }

    #[test]
    fn test_missing_and_mismatched_history_abort() {
        let v = validator();
        assert!(matches!(
            v.validate_transfer(None, &sale(), &ctx()),
            Err(EngineError::AssetNotFound(_))
        ));
        let mut request = sale();
        request.mhr_number = MhrNumber::new("000901").unwrap();
        let reg = asset();
        assert!(matches!(
            v.validate_transfer(Some(&CurrentHistory::new(&reg)), &request, &ctx()),
            Err(EngineError::AssetMismatch { .. })
        ));
    }

    #[test]
    fn test_transfer_authority() {
        let reg = asset();
        let history = CurrentHistory::new(&reg);
        let mut request = sale();
        request.transfer_document_type = Some(mhr_core::TransferDocumentType::QuitClaim);
        let diags = validator().validate_transfer(Some(&history), &request, &ctx()).unwrap();
        assert_eq!(diags.codes(), vec![Rule::TransferDocumentTypePrivileged]);

        let dealer = ctx().with_role(crate::context::RoleGroup::Dealer);
        let mut request = sale();
        request.document_type = DocumentType::TransferWill;
        let diags = validator().validate_transfer(Some(&history), &request, &dealer).unwrap();
        assert!(diags.contains(Rule::DocumentTypeNotAllowed));
    }

    #[test]
    fn test_sale_requires_both_sides() {
        let reg = asset();
        let mut request = sale();
        request.delete_owner_groups.clear();
        let diags = validator()
            .validate_transfer(Some(&CurrentHistory::new(&reg)), &request, &ctx())
            .unwrap();
        assert!(diags.contains(Rule::GroupRequired));
    }

    #[test]
    fn test_lien_blocks_transfer() {
        let reg = asset();
        let v = Validator::new(EngineConfig::default(), StaticLookups::new().with_lien("000900", "TA"));
        let diags = v
            .validate_transfer(Some(&CurrentHistory::new(&reg)), &sale(), &ctx())
            .unwrap();
        assert_eq!(diags.codes(), vec![Rule::LienOutstanding]);
    }

    #[test]
    fn test_non_residential_exemption_needs_reason() {
        let reg = asset();
        let request = ExemptionRequest {
            mhr_number: mhr(),
            document_type: DocumentType::ExemptionNonResidential,
            document_id: None,
            reason: None,
            remarks: None,
        };
        let diags = validator()
            .validate_exemption(Some(&CurrentHistory::new(&reg)), &request, &ctx())
            .unwrap();
        assert_eq!(diags.codes(), vec![Rule::ExemptionReasonRequired]);
    }

    #[test]
    fn test_permit_location_must_change() {
        let reg = asset();
        let history = CurrentHistory::new(&reg);
        let mut request = PermitRequest {
            mhr_number: mhr(),
            document_type: DocumentType::TransportPermit,
            document_id: None,
            new_location: None,
        };
        let diags = validator().validate_permit(Some(&history), &request, &ctx()).unwrap();
        assert_eq!(diags.codes(), vec![Rule::LocationFieldRequired]);

        request.new_location = Some(park("12"));
        let diags = validator().validate_permit(Some(&history), &request, &ctx()).unwrap();
        assert_eq!(diags.codes(), vec![Rule::LocationUnchanged]);

        request.new_location = Some(park("14"));
        assert!(validator().validate_permit(Some(&history), &request, &ctx()).unwrap().is_empty());
    }

    #[test]
    fn test_correction_is_staff_only() {
        let reg = asset();
        let history = CurrentHistory::new(&reg);
        let request = CorrectionRequest {
            mhr_number: mhr(),
            document_type: DocumentType::RegistrarCorrection,
            document_id: None,
            location: Some(park("14")),
            description: None,
            add_owner_groups: Vec::new(),
            delete_owner_groups: Vec::new(),
        };
        let diags = validator().validate_correction(Some(&history), &request, &ctx()).unwrap();
        assert_eq!(diags.codes(), vec![Rule::DocumentTypeNotAllowed]);

        let mut staff_request = request.clone();
        staff_request.document_id = Some(DocumentId::new("80048717"));
        let staff = CallerContext::staff(ctx().as_of);
        let diags = validator().validate_correction(Some(&history), &staff_request, &staff).unwrap();
        assert!(diags.is_empty(), "{diags}");
    }
}
