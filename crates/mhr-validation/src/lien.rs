//! # Outstanding Lien Check
//!
//! Some liens registered against a home in the personal property registry
//! block a change until they are discharged. Which lien types block which
//! request kind comes from [`crate::config::RestrictedLiens`].

use mhr_core::MhrNumber;

use crate::diagnostic::{Diagnostic, Rule};
use crate::lookup::LienLookup;

/// Reject the request while a lien of a restricted type is outstanding.
pub fn validate_liens(
    mhr_number: &MhrNumber,
    restricted: &[String],
    lookup: &dyn LienLookup,
) -> Vec<Diagnostic> {
    if restricted.is_empty() {
        return Vec::new();
    }
    let outstanding = match lookup.outstanding_lien_types(mhr_number) {
        Ok(types) => types,
        Err(e) => {
            tracing::warn!(mhr_number = %mhr_number, error = %e, "lien lookup failed");
            return vec![Diagnostic::new(
                Rule::LookupFailed,
                format!("could not check home {mhr_number} for outstanding liens: {e}"),
            )];
        }
    };

    let mut blocking: Vec<&str> = outstanding
        .iter()
        .map(|t| t.trim())
        .filter(|t| restricted.iter().any(|r| r.eq_ignore_ascii_case(t)))
        .collect();
    blocking.sort_unstable();
    blocking.dedup();
    tracing::debug!(mhr_number = %mhr_number, outstanding = outstanding.len(), blocking = blocking.len(), "liens checked");

    if blocking.is_empty() {
        return Vec::new();
    }
    vec![Diagnostic::new(
        Rule::LienOutstanding,
        format!(
            "home {mhr_number} has outstanding liens that must be discharged first ({})",
            blocking.join(", ")
        ),
    )]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RestrictedLiens;
    use crate::lookup::StaticLookups;

    fn mhr() -> MhrNumber {
        MhrNumber::new("000900").unwrap()
    }

    #[test]
    fn test_no_liens() {
        let restricted = RestrictedLiens::default();
        assert!(validate_liens(&mhr(), &restricted.transfer, &StaticLookups::new()).is_empty());
    }

    #[test]
    fn test_restricted_lien_blocks() {
        let lookups = StaticLookups::new().with_lien("000900", "SA").with_lien("000900", "SA");
        let diags = validate_liens(&mhr(), &RestrictedLiens::default().transfer, &lookups);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, Rule::LienOutstanding);
        assert!(diags[0].detail.ends_with("(SA)"));
    }

    #[test]
    fn test_restriction_depends_on_request_kind() {
        let lookups = StaticLookups::new().with_lien("000900", "LT");
        let restricted = RestrictedLiens::default();
        assert!(validate_liens(&mhr(), &restricted.transfer, &lookups).is_empty());
        assert_eq!(validate_liens(&mhr(), &restricted.exemption, &lookups).len(), 1);
    }

    #[test]
    fn test_lookup_failure_is_reported() {
        let diags = validate_liens(
            &mhr(),
            &RestrictedLiens::default().transfer,
            &StaticLookups::new().unavailable(),
        );
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, Rule::LookupFailed);
    }
}
