//! # Interest Fractions
//!
//! When two or more contributing groups hold fractional interests, each
//! must declare a numerator and denominator and the fractions must total
//! one whole interest.
//!
//! ## Rescaling
//!
//! `Legacy` brings every fraction to the largest declared denominator
//! with integer arithmetic:
//!
//! ```text
//! common = max(den)
//! scaled = (common / den) * num   if den <= common && (common % den == 0 || den < common)
//!        = (common * num) / den   otherwise
//! valid  ⇔ Σ scaled == common
//! ```
//!
//! The first branch truncates `common / den` when `den` does not divide
//! `common`, so `2/4 + 3/6` is rejected even though it totals one.
//! Existing registrations were accepted under this rule, so it stays the
//! default. `Exact` scales to the least common multiple and accepts
//! exactly the sets that total one.

use mhr_core::{GroupId, TenancyType};

use crate::config::InterestRescaling;
use crate::diagnostic::{Diagnostic, Rule};

/// A contributing group's share, as the interest rules see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Share {
    /// Where the group came from, for diagnostics.
    pub field: String,
    /// Stored group id, for existing groups.
    pub group_id: Option<GroupId>,
    pub tenancy: TenancyType,
    pub numerator: u32,
    pub denominator: u32,
}

/// Whether the contributing set must declare interests: two or more
/// non-sole groups that are tenants in common or declare a denominator.
pub fn interest_required(shares: &[Share]) -> bool {
    shares
        .iter()
        .filter(|s| {
            s.tenancy != TenancyType::Sole
                && (s.tenancy == TenancyType::Common || s.denominator > 0)
        })
        .count()
        >= 2
}

/// Whether the fractions total one whole interest under `mode`.
///
/// Zero denominators never total one.
pub fn fractions_total_whole(fractions: &[(u32, u32)], mode: InterestRescaling) -> bool {
    if fractions.is_empty() || fractions.iter().any(|&(_, den)| den == 0) {
        return false;
    }
    match mode {
        InterestRescaling::Legacy => {
            let common = fractions.iter().map(|&(_, den)| u128::from(den)).max().unwrap_or(0);
            let mut total: u128 = 0;
            for &(num, den) in fractions {
                let scaled = legacy_rescale(u128::from(num), u128::from(den), common);
                total = match total.checked_add(scaled) {
                    Some(t) => t,
                    None => return false,
                };
            }
            total == common
        }
        InterestRescaling::Exact => exact_total_is_whole(fractions),
    }
}

/// Rescale one fraction to `common` the way the registry always has.
///
/// Callers pass widened `u32` values, so neither product can overflow.
pub fn legacy_rescale(num: u128, den: u128, common: u128) -> u128 {
    if den <= common && (common % den == 0 || den < common) {
        (common / den) * num
    } else {
        (common * num) / den
    }
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

fn exact_total_is_whole(fractions: &[(u32, u32)]) -> bool {
    let mut lcm: u128 = 1;
    for &(_, den) in fractions {
        let den = u128::from(den);
        let Some(next) = (lcm / gcd(lcm, den)).checked_mul(den) else {
            return false;
        };
        lcm = next;
    }
    let mut total: u128 = 0;
    for &(num, den) in fractions {
        let Some(scaled) = (lcm / u128::from(den)).checked_mul(u128::from(num)) else {
            return false;
        };
        total = match total.checked_add(scaled) {
            Some(t) => t,
            None => return false,
        };
    }
    total == lcm
}

/// Interest rules over the contributing set.
pub fn validate_interest(shares: &[Share], mode: InterestRescaling) -> Vec<Diagnostic> {
    if !interest_required(shares) {
        return Vec::new();
    }
    let mut diags = Vec::new();
    for share in shares {
        let name = match share.group_id {
            Some(id) => format!("owner group {id}"),
            None => share.field.clone(),
        };
        if share.numerator == 0 {
            diags.push(
                Diagnostic::new(
                    Rule::InterestNumeratorMissing,
                    format!("{name} must declare an interest numerator"),
                )
                .with_field(share.field.clone()),
            );
        }
        if share.denominator == 0 {
            diags.push(
                Diagnostic::new(
                    Rule::InterestDenominatorMissing,
                    format!("{name} must declare an interest denominator"),
                )
                .with_field(share.field.clone()),
            );
        }
    }
    if !diags.is_empty() {
        return diags;
    }

    let fractions: Vec<(u32, u32)> = shares.iter().map(|s| (s.numerator, s.denominator)).collect();
    if !fractions_total_whole(&fractions, mode) {
        let listed = fractions
            .iter()
            .map(|(n, d)| format!("{n}/{d}"))
            .collect::<Vec<_>>()
            .join(" + ");
        diags.push(Diagnostic::new(
            Rule::InterestMismatch,
            format!("the owner group interests ({listed}) do not total one whole interest"),
        ));
    }
    tracing::debug!(groups = shares.len(), violations = diags.len(), ?mode, "interest validated");
    diags
}
