//! # Description Validation

use mhr_state::Description;

use crate::config::EngineConfig;
use crate::context::CallerContext;
use crate::diagnostic::{Diagnostic, Rule};
use crate::field::{valid_description_year, validate_text};

/// Validate a description: manufacturer, section count and section
/// details, year of manufacture, and free-text character set.
pub fn validate_description(
    description: &Description,
    ctx: &CallerContext,
    config: &EngineConfig,
    field: &str,
) -> Vec<Diagnostic> {
    let mut diags = Vec::new();

    if description.manufacturer.trim().is_empty() {
        diags.push(
            Diagnostic::new(Rule::DescriptionFieldRequired, "the manufacturer name is required")
                .with_field(format!("{field}.manufacturer")),
        );
    }

    let count = description.section_count;
    if count == 0 || count > config.max_sections {
        diags.push(
            Diagnostic::new(
                Rule::SectionCountInvalid,
                format!(
                    "the number of sections must be between 1 and {}, not {count}",
                    config.max_sections
                ),
            )
            .with_field(format!("{field}.section_count")),
        );
    } else if count as usize != description.sections.len() {
        diags.push(
            Diagnostic::new(
                Rule::SectionCountInvalid,
                format!(
                    "{count} sections declared but {} described",
                    description.sections.len()
                ),
            )
            .with_field(format!("{field}.sections")),
        );
    }

    for (i, section) in description.sections.iter().enumerate() {
        let at = format!("{field}.sections[{i}]");
        if section.serial_number.trim().is_empty() {
            diags.push(
                Diagnostic::new(Rule::SectionInvalid, format!("section {} needs a serial number", i + 1))
                    .with_field(format!("{at}.serial_number")),
            );
        }
        let length = u64::from(section.length_feet) * 12 + u64::from(section.length_inches);
        let width = u64::from(section.width_feet) * 12 + u64::from(section.width_inches);
        if length == 0 || width == 0 {
            diags.push(
                Diagnostic::new(
                    Rule::SectionInvalid,
                    format!("section {} needs a length and a width", i + 1),
                )
                .with_field(at.clone()),
            );
        }
        diags.extend(validate_text(&format!("{at}.serial_number"), &section.serial_number));
    }

    if !valid_description_year(
        description.year_made,
        ctx.privileged,
        ctx.as_of,
        config.privileged_year_floor,
    ) {
        diags.push(
            Diagnostic::new(
                Rule::YearInvalid,
                format!("year of manufacture {} is out of range", description.year_made),
            )
            .with_field(format!("{field}.year_made")),
        );
    }

    let texts = [
        ("manufacturer", Some(description.manufacturer.as_str())),
        ("make", description.make.as_deref()),
        ("model", description.model.as_deref()),
        ("rebuilt_remarks", description.rebuilt_remarks.as_deref()),
        ("other_remarks", description.other_remarks.as_deref()),
    ];
    diags.extend(
        texts
            .into_iter()
            .filter_map(|(name, value)| validate_text(&format!("{field}.{name}"), value?)),
    );

    tracing::debug!(violations = diags.len(), "description validated");
    diags
}

/// Reject a proposed description identical to the current one.
pub fn validate_description_different(
    current: Option<&Description>,
    proposed: &Description,
    field: &str,
) -> Option<Diagnostic> {
    let current = current?;
    if !current.same_home(proposed) {
        return None;
    }
    Some(
        Diagnostic::new(
            Rule::DescriptionUnchanged,
            "the new description is the same as the current description",
        )
        .with_field(field),
    )
}
