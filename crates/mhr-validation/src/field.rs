//! # Field Validators
//!
//! Leaf checks on single values: the document id check digit, the
//! approved character set for free text, and the year-of-manufacture
//! window.

use mhr_core::{DocumentId, Timestamp};

use crate::config::EngineConfig;
use crate::context::CallerContext;
use crate::diagnostic::{Diagnostic, Rule};
use crate::lookup::DocumentIdLookup;

/// Length of every document id.
pub const DOCUMENT_ID_LEN: usize = 8;

/// Whether `id` is a well-formed document id.
///
/// The id must be exactly eight characters. Ids starting with a reserved
/// prefix are accepted as they are. Any other id must be eight ASCII
/// digits whose last digit is the check digit of the first seven: digits
/// in positions 2, 4 and 6 are doubled (less 9 when the double exceeds
/// 9), the seven are summed, and the check digit is
/// `(10 - sum % 10) % 10`.
pub fn checksum_valid<S: AsRef<str>>(id: &str, reserved_prefixes: &[S]) -> bool {
    if id.chars().count() != DOCUMENT_ID_LEN {
        return false;
    }
    if reserved_prefixes
        .iter()
        .any(|p| id.starts_with(AsRef::<str>::as_ref(p)))
    {
        return true;
    }
    let Some(digits) = id
        .chars()
        .map(|c| c.to_digit(10))
        .collect::<Option<Vec<u32>>>()
    else {
        return false;
    };
    let sum: u32 = digits[..7]
        .iter()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();
    digits[7] == (10 - sum % 10) % 10
}

/// Whether `c` is in the registry's approved character set: printable
/// ASCII, the Latin-1 supplement, and the typographic apostrophe, en dash
/// and em dash.
pub fn valid_char(c: char) -> bool {
    matches!(c, ' '..='~' | '\u{A0}'..='\u{FF}' | '\u{2019}' | '\u{2013}' | '\u{2014}')
}

/// Check one free-text field against the approved character set.
pub fn validate_text(field: &str, value: &str) -> Option<Diagnostic> {
    if value.chars().all(valid_char) {
        return None;
    }
    Some(
        Diagnostic::new(
            Rule::InvalidCharacters,
            format!("{field} contains characters that are not allowed: {value:?}"),
        )
        .with_field(field),
    )
}

/// Whether `year` is an acceptable year of manufacture.
///
/// Other submitters may only record a home built within a year of
/// `as_of`; registry staff may record any year from `floor` to next year.
pub fn valid_description_year(year: i32, privileged: bool, as_of: Timestamp, floor: i32) -> bool {
    let current = as_of.year();
    if privileged {
        (floor..=current + 1).contains(&year)
    } else {
        (i64::from(year) - i64::from(current)).abs() <= 1
    }
}

/// Validate a submitted document id.
///
/// Only registry staff supply document ids; for them the id is required,
/// must pass [`checksum_valid`], and must not already be on file.
pub fn validate_document_id(
    document_id: Option<&DocumentId>,
    ctx: &CallerContext,
    config: &EngineConfig,
    lookup: &dyn DocumentIdLookup,
) -> Vec<Diagnostic> {
    if !ctx.privileged {
        return Vec::new();
    }
    let Some(id) = document_id.filter(|id| !id.as_str().is_empty()) else {
        return vec![Diagnostic::new(
            Rule::DocumentIdRequired,
            "a document id is required for staff registrations",
        )
        .with_field("document_id")];
    };
    if !checksum_valid(id.as_str(), &config.reserved_document_id_prefixes) {
        return vec![Diagnostic::new(
            Rule::DocumentIdInvalid,
            format!("document id {id} is invalid"),
        )
        .with_field("document_id")];
    }
    match lookup.document_id_count(id) {
        Ok(0) => Vec::new(),
        Ok(_) => vec![Diagnostic::new(
            Rule::DocumentIdInUse,
            format!("document id {id} is already in use"),
        )
        .with_field("document_id")],
        Err(e) => {
            tracing::warn!(document_id = %id, error = %e, "document id lookup failed");
            vec![Diagnostic::new(
                Rule::LookupFailed,
                format!("could not confirm document id {id} is unused: {e}"),
            )
            .with_field("document_id")]
        }
    }
}
