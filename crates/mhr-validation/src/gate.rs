//! # Registration State Gate
//!
//! Whether the asset's status, its notes in effect and its most recent
//! change permit the requested document type at all.
//!
//! ```text
//! CANCELLED   only REREGISTER_C
//! HISTORICAL  nothing
//! EXEMPT      NCAN, REGC, PUBA, EXRE; CANCEL_PERMIT while a permit is in effect
//! ACTIVE      anything, except:
//!               freezing note in effect   -> only CANCEL_PERMIT, REREGISTER_C
//!               permit note in effect     -> only REG_103, REG_103E, CANCEL_PERMIT, EXRS
//!               last change affidavit     -> staff TRANS only
//! ```
//!
//! The gate only reads the history, so evaluating it twice gives the same
//! diagnostics.

use mhr_core::{DocumentType, NoteDocumentType};
use mhr_state::{AssetHistory, Note, RegistrationStatus};

use crate::context::CallerContext;
use crate::diagnostic::{Diagnostic, Rule};

/// Evaluate the state gate for `request` against `history`.
pub fn evaluate(history: &dyn AssetHistory, request: DocumentType, ctx: &CallerContext) -> Vec<Diagnostic> {
    let notes = history.notes_in_effect(ctx.as_of);
    let permit_in_effect = notes
        .iter()
        .any(|n| n.document_type == NoteDocumentType::TransportPermit);
    let mhr = history.mhr_number();

    let diags = match history.status() {
        RegistrationStatus::Cancelled => {
            if request == DocumentType::ReRegistration {
                Vec::new()
            } else {
                vec![Diagnostic::new(
                    Rule::RegistrationCancelled,
                    format!("home {mhr} is cancelled; only a re-registration may be filed"),
                )]
            }
        }
        RegistrationStatus::Historical => vec![Diagnostic::new(
            Rule::RegistrationHistorical,
            format!("home {mhr} is historical; no changes may be filed"),
        )],
        RegistrationStatus::Exempt => exempt_gate(request, permit_in_effect, mhr.as_str()),
        RegistrationStatus::Active => active_gate(history, request, ctx, &notes, permit_in_effect),
    };

    tracing::debug!(
        mhr_number = %mhr,
        status = ?history.status(),
        request = %request,
        violations = diags.len(),
        "state gate evaluated"
    );
    diags
}

fn exempt_gate(request: DocumentType, permit_in_effect: bool, mhr: &str) -> Vec<Diagnostic> {
    match request {
        DocumentType::NoteCancellation
        | DocumentType::RegistrarCorrection
        | DocumentType::PublicAmendment
        | DocumentType::ExemptionRescission => Vec::new(),
        DocumentType::CancelPermit if permit_in_effect => Vec::new(),
        DocumentType::ExemptionResidential => vec![Diagnostic::new(
            Rule::AlreadyExempt,
            format!("home {mhr} is already exempt"),
        )],
        _ => vec![Diagnostic::new(
            Rule::RegistrationExempt,
            format!("home {mhr} is exempt; a {request} may not be filed"),
        )],
    }
}

fn active_gate(
    history: &dyn AssetHistory,
    request: DocumentType,
    ctx: &CallerContext,
    notes: &[Note],
    permit_in_effect: bool,
) -> Vec<Diagnostic> {
    let mhr = history.mhr_number();
    let mut diags = Vec::new();

    match request {
        DocumentType::ReRegistration => diags.push(Diagnostic::new(
            Rule::AlreadyActive,
            format!("home {mhr} is already active"),
        )),
        DocumentType::ExemptionRescission => diags.push(Diagnostic::new(
            Rule::NotExempt,
            format!("home {mhr} is not exempt"),
        )),
        DocumentType::AmendedPermit | DocumentType::CancelPermit if !permit_in_effect => {
            diags.push(Diagnostic::new(
                Rule::NoPermitInEffect,
                format!("home {mhr} has no transport permit in effect"),
            ))
        }
        _ => {}
    }

    let freezing: Vec<&str> = notes
        .iter()
        .filter(|n| n.document_type.freezes())
        .map(|n| n.document_type.as_str())
        .collect();
    if !freezing.is_empty()
        && !matches!(request, DocumentType::CancelPermit | DocumentType::ReRegistration)
    {
        diags.push(Diagnostic::new(
            Rule::FrozenNote,
            format!(
                "home {mhr} is frozen by a unit note in effect ({})",
                freezing.join(", ")
            ),
        ));
    }

    if permit_in_effect
        && !(request.is_permit_related() || request == DocumentType::ExemptionResidential)
    {
        diags.push(Diagnostic::new(
            Rule::FrozenPermit,
            format!("home {mhr} has a transport permit in effect; a {request} may not be filed"),
        ));
    }

    if history.last_change_document_type() == Some(DocumentType::TransferAffidavit) {
        let blocked = !ctx.privileged || request != DocumentType::TransferSale;
        if blocked {
            diags.push(Diagnostic::new(
                Rule::FrozenAffidavit,
                format!(
                    "home {mhr} was last transferred by affidavit; only a registry staff sale transfer may follow"
                ),
            ));
        }
    }

    diags
}

#[cfg(test)]
mod tests {
    use super::*;
    use mhr_core::{DocumentId, MhrNumber, RegistrationId, Timestamp};
    use mhr_state::{CurrentHistory, NoteStatus, Registration};

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    fn ctx() -> CallerContext {
        CallerContext::general(ts("2026-06-01T00:00:00Z"))
    }

    fn base() -> Registration {
        Registration::new(
            RegistrationId(1),
            MhrNumber::new("000900").unwrap(),
            DocumentId::new("80048709"),
            DocumentType::NewRegistration,
            ts("2020-01-01T00:00:00Z"),
        )
    }

    fn with_change(mut reg: Registration, doc: DocumentType, notes: Vec<Note>) -> Registration {
        let change = Registration::new(
            RegistrationId(2),
            reg.mhr_number.clone(),
            DocumentId::new("80048717"),
            doc,
            ts("2021-01-01T00:00:00Z"),
        )
        .with_notes(notes);
        reg.append_change(change).unwrap();
        reg
    }

    fn codes(diags: &[Diagnostic]) -> Vec<Rule> {
        diags.iter().map(|d| d.code).collect()
    }

    fn gate(reg: &Registration, request: DocumentType, ctx: &CallerContext) -> Vec<Rule> {
        codes(&evaluate(&CurrentHistory::new(reg), request, ctx))
    }

    #[test]
    fn test_active_without_notes_allows_transfer() {
        assert!(gate(&base(), DocumentType::TransferSale, &ctx()).is_empty());
    }

    #[test]
    fn test_cancelled_allows_only_reregistration() {
        let mut reg = base();
        reg.cancel("cancelled by registrar").unwrap();
        assert_eq!(gate(&reg, DocumentType::TransferSale, &ctx()), vec![Rule::RegistrationCancelled]);
        assert!(gate(&reg, DocumentType::ReRegistration, &ctx()).is_empty());
    }

    #[test]
    fn test_historical_rejects_everything() {
        let mut reg = base();
        reg.retire("merged").unwrap();
        for doc in DocumentType::all() {
            assert_eq!(gate(&reg, *doc, &ctx()), vec![Rule::RegistrationHistorical]);
        }
    }

    #[test]
    fn test_exempt_allow_list() {
        let mut reg = base();
        reg.exempt("residential exemption").unwrap();
        for doc in [
            DocumentType::NoteCancellation,
            DocumentType::RegistrarCorrection,
            DocumentType::PublicAmendment,
            DocumentType::ExemptionRescission,
        ] {
            assert!(gate(&reg, doc, &ctx()).is_empty(), "{doc}");
        }
        assert_eq!(gate(&reg, DocumentType::ExemptionResidential, &ctx()), vec![Rule::AlreadyExempt]);
        assert_eq!(gate(&reg, DocumentType::TransferSale, &ctx()), vec![Rule::RegistrationExempt]);
        assert_eq!(gate(&reg, DocumentType::CancelPermit, &ctx()), vec![Rule::RegistrationExempt]);
    }

    #[test]
    fn test_exempt_cancel_permit_with_permit_in_effect() {
        let mut reg = with_change(
            base(),
            DocumentType::TransportPermit,
            vec![Note::active(NoteDocumentType::TransportPermit, Some(ts("2026-07-01T00:00:00Z")))],
        );
        reg.exempt("residential exemption").unwrap();
        assert!(gate(&reg, DocumentType::CancelPermit, &ctx()).is_empty());
    }

    #[test]
    fn test_freezing_note_blocks_all_but_permit_cancel_and_reregistration() {
        let reg = with_change(
            base(),
            DocumentType::PublicAmendment,
            vec![Note::active(NoteDocumentType::TaxArrears, None)],
        );
        assert_eq!(gate(&reg, DocumentType::TransferSale, &ctx()), vec![Rule::FrozenNote]);
        assert_eq!(gate(&reg, DocumentType::ExemptionNonResidential, &ctx()), vec![Rule::FrozenNote]);
        // Not frozen, but no permit to cancel.
        assert_eq!(gate(&reg, DocumentType::CancelPermit, &ctx()), vec![Rule::NoPermitInEffect]);
    }

    #[test]
    fn test_cancelled_or_expired_notes_do_not_freeze() {
        let mut cancelled = Note::active(NoteDocumentType::Caution, None);
        cancelled.status = NoteStatus::Cancelled;
        let expired = Note::active(NoteDocumentType::Caution, Some(ts("2026-01-01T00:00:00Z")));
        let reg = with_change(base(), DocumentType::PublicAmendment, vec![cancelled, expired]);
        assert!(gate(&reg, DocumentType::TransferSale, &ctx()).is_empty());
    }

    #[test]
    fn test_permit_blocks_non_permit_changes() {
        let reg = with_change(
            base(),
            DocumentType::TransportPermit,
            vec![Note::active(NoteDocumentType::TransportPermit, Some(ts("2026-07-01T00:00:00Z")))],
        );
        assert_eq!(gate(&reg, DocumentType::TransferSale, &ctx()), vec![Rule::FrozenPermit]);
        assert!(gate(&reg, DocumentType::AmendedPermit, &ctx()).is_empty());
        assert!(gate(&reg, DocumentType::CancelPermit, &ctx()).is_empty());
        assert!(gate(&reg, DocumentType::ExemptionResidential, &ctx()).is_empty());
        assert_eq!(gate(&reg, DocumentType::ExemptionNonResidential, &ctx()), vec![Rule::FrozenPermit]);
    }

    #[test]
    fn test_affidavit_freeze() {
        let reg = with_change(base(), DocumentType::TransferAffidavit, Vec::new());
        assert_eq!(gate(&reg, DocumentType::TransferSale, &ctx()), vec![Rule::FrozenAffidavit]);
        let staff = CallerContext::staff(ctx().as_of);
        assert!(gate(&reg, DocumentType::TransferSale, &staff).is_empty());
        assert_eq!(gate(&reg, DocumentType::TransferWill, &staff), vec![Rule::FrozenAffidavit]);
    }

    #[test]
    fn test_active_rejects_reregistration_and_rescission() {
        assert_eq!(gate(&base(), DocumentType::ReRegistration, &ctx()), vec![Rule::AlreadyActive]);
        assert_eq!(gate(&base(), DocumentType::ExemptionRescission, &ctx()), vec![Rule::NotExempt]);
        assert_eq!(gate(&base(), DocumentType::AmendedPermit, &ctx()), vec![Rule::NoPermitInEffect]);
    }

    #[test]
    fn test_gate_is_idempotent() {
        let reg = with_change(
            base(),
            DocumentType::TransferAffidavit,
            vec![Note::active(NoteDocumentType::RestrainingNotice, None)],
        );
        let history = CurrentHistory::new(&reg);
        let first = evaluate(&history, DocumentType::TransferSale, &ctx());
        let second = evaluate(&history, DocumentType::TransferSale, &ctx());
        assert_eq!(first, second);
        assert_eq!(codes(&first), vec![Rule::FrozenNote, Rule::FrozenAffidavit]);
    }
}
