//! # Owner-Group Algebra
//!
//! Rules over the set of owner groups a change leaves in place: the
//! *contributing set*, which is every added group plus every active
//! existing group that is not validly deleted.
//!
//! - owner identity (names, representative descriptions)
//! - deletion bookkeeping against the asset history
//! - tenancy shape (owner counts per group, sole/common combinations)
//! - interests, delegated to [`crate::interest`]

use std::collections::BTreeSet;

use mhr_core::{GroupId, TenancyType};
use mhr_state::{AssetHistory, Owner, OwnerName};

use crate::config::EngineConfig;
use crate::diagnostic::{Diagnostic, Rule};
use crate::field::validate_text;
use crate::interest::{validate_interest, Share};
use crate::request::{DeleteGroupInput, OwnerGroupInput};

// ─── Owner identity ──────────────────────────────────────────────────

/// Name and capacity rules for one owner.
pub fn validate_owner(owner: &Owner, field: &str) -> Vec<Diagnostic> {
    let mut diags = Vec::new();
    match &owner.name {
        OwnerName::Organization(name) if name.trim().is_empty() => diags.push(
            Diagnostic::new(Rule::OwnerNameRequired, "an organization owner needs a name")
                .with_field(format!("{field}.name")),
        ),
        OwnerName::Individual(n) => {
            for (part, value) in [("last", &n.last), ("first", &n.first)] {
                if value.trim().is_empty() {
                    diags.push(
                        Diagnostic::new(
                            Rule::OwnerNameRequired,
                            format!("an individual owner needs a {part} name"),
                        )
                        .with_field(format!("{field}.name.{part}")),
                    );
                }
            }
        }
        OwnerName::Organization(_) => {}
    }
    for (label, value) in owner.name.text_fields() {
        diags.extend(validate_text(&format!("{field} {label}"), value));
    }
    if owner.party_type.is_representative()
        && owner.description.as_deref().map_or(true, |d| d.trim().is_empty())
    {
        diags.push(
            Diagnostic::new(
                Rule::OwnerDescriptionRequired,
                format!(
                    "{} {} must describe their authority",
                    owner.party_type, owner.name
                ),
            )
            .with_field(format!("{field}.description")),
        );
    }
    if let Some(desc) = owner.description.as_deref() {
        diags.extend(validate_text(&format!("{field}.description"), desc));
    }
    diags
}

// ─── Deletions ───────────────────────────────────────────────────────

/// Outcome of checking the deleted groups against the history.
#[derive(Debug, Default)]
pub struct DeletionCheck {
    pub diagnostics: Vec<Diagnostic>,
    /// Ids of groups validly deleted; only these leave the contributing set.
    pub deleted: BTreeSet<GroupId>,
}

/// Each deleted group must exist, be active, and match the tenancy the
/// submitter names for it.
pub fn validate_deletions(history: &dyn AssetHistory, deletes: &[DeleteGroupInput]) -> DeletionCheck {
    let mut check = DeletionCheck::default();
    for (i, delete) in deletes.iter().enumerate() {
        let field = format!("delete_owner_groups[{i}]");
        let id = delete.group_id;
        let Some(stored) = history.find_owner_group(id) else {
            check.diagnostics.push(
                Diagnostic::new(Rule::GroupIdNonexistent, format!("owner group {id} does not exist"))
                    .with_field(field),
            );
            continue;
        };
        if !stored.is_active() {
            check.diagnostics.push(
                Diagnostic::new(Rule::GroupIdInactive, format!("owner group {id} is not active"))
                    .with_field(field),
            );
            continue;
        }
        if let Some(tenancy) = delete.tenancy.filter(|t| *t != stored.tenancy) {
            check.diagnostics.push(
                Diagnostic::new(
                    Rule::DeleteGroupTypeInvalid,
                    format!(
                        "owner group {id} is {}, not {tenancy}",
                        stored.tenancy
                    ),
                )
                .with_field(field),
            );
            continue;
        }
        check.deleted.insert(id);
    }
    check
}

// ─── Contributing set ────────────────────────────────────────────────

/// Added groups followed by the active existing groups that remain.
pub fn contributing_shares(
    history: Option<&dyn AssetHistory>,
    added: &[OwnerGroupInput],
    deleted: &BTreeSet<GroupId>,
    added_field: &str,
) -> Vec<Share> {
    let mut shares: Vec<Share> = added
        .iter()
        .enumerate()
        .map(|(i, g)| Share {
            field: format!("{added_field}[{i}]"),
            group_id: None,
            tenancy: g.tenancy,
            numerator: g.interest_numerator,
            denominator: g.interest_denominator,
        })
        .collect();
    if let Some(history) = history {
        shares.extend(
            history
                .active_owner_groups()
                .into_iter()
                .filter(|g| !deleted.contains(&g.group_id))
                .map(|g| Share {
                    field: format!("owner_groups.{}", g.group_id),
                    group_id: Some(g.group_id),
                    tenancy: g.tenancy,
                    numerator: g.interest_numerator,
                    denominator: g.interest_denominator,
                }),
        );
    }
    shares
}

// ─── Tenancy shape ───────────────────────────────────────────────────

/// Per-group owner counts for the added groups, and the sole/common
/// combination rules over the contributing set.
pub fn validate_tenancy_shape(
    added: &[OwnerGroupInput],
    contributing: &[Share],
    added_field: &str,
) -> Vec<Diagnostic> {
    let mut diags = Vec::new();
    for (i, group) in added.iter().enumerate() {
        let field = format!("{added_field}[{i}]");
        let owners = group.owners.len();
        match group.tenancy {
            TenancyType::Joint if owners < 2 => diags.push(
                Diagnostic::new(
                    Rule::JointOwnerCount,
                    format!("a joint tenancy group needs at least 2 owners, not {owners}"),
                )
                .with_field(field),
            ),
            TenancyType::Common if owners != 1 => diags.push(
                Diagnostic::new(
                    Rule::CommonOwnerCount,
                    format!("a tenants in common group needs exactly 1 owner, not {owners}"),
                )
                .with_field(field),
            ),
            TenancyType::Sole if owners != 1 => diags.push(
                Diagnostic::new(
                    Rule::SoleOwnerCount,
                    format!("a sole ownership group needs exactly 1 owner, not {owners}"),
                )
                .with_field(field),
            ),
            TenancyType::Na if !group.owners.iter().all(|o| o.party_type.is_representative()) => {
                diags.push(
                    Diagnostic::new(
                        Rule::NaOwnerType,
                        "every owner in an NA group must be an executor, administrator or trustee",
                    )
                    .with_field(field),
                )
            }
            _ => {}
        }
    }

    let sole_added = added.iter().filter(|g| g.tenancy == TenancyType::Sole).count();
    if sole_added > 1 {
        diags.push(
            Diagnostic::new(
                Rule::SoleGroupCount,
                format!("only one sole ownership group may be added, not {sole_added}"),
            )
            .with_field(added_field),
        );
    } else if sole_added == 1 && contributing.len() > 1 {
        diags.push(
            Diagnostic::new(
                Rule::SoleGroupCombined,
                "a sole ownership group cannot be combined with other owner groups",
            )
            .with_field(added_field),
        );
    }
    if added.iter().any(|g| g.tenancy == TenancyType::Common) && contributing.len() < 2 {
        diags.push(
            Diagnostic::new(
                Rule::CommonGroupCount,
                "tenants in common needs at least 2 owner groups",
            )
            .with_field(added_field),
        );
    }
    diags
}

// ─── Composition ─────────────────────────────────────────────────────

/// Run every owner-group rule for a request that adds and deletes
/// groups. `history` is `None` for a new registration.
pub fn validate_owner_groups(
    history: Option<&dyn AssetHistory>,
    added: &[OwnerGroupInput],
    deletes: &[DeleteGroupInput],
    config: &EngineConfig,
    added_field: &str,
) -> Vec<Diagnostic> {
    let mut diags = Vec::new();

    for (i, group) in added.iter().enumerate() {
        for (j, owner) in group.owners.iter().enumerate() {
            diags.extend(validate_owner(owner, &format!("{added_field}[{i}].owners[{j}]")));
        }
    }

    let deleted = match history {
        Some(history) => {
            let check = validate_deletions(history, deletes);
            diags.extend(check.diagnostics);
            check.deleted
        }
        None => BTreeSet::new(),
    };

    let contributing = contributing_shares(history, added, &deleted, added_field);
    diags.extend(validate_tenancy_shape(added, &contributing, added_field));
    diags.extend(validate_interest(&contributing, config.interest_rescaling));

    tracing::debug!(
        added = added.len(),
        deleted = deleted.len(),
        contributing = contributing.len(),
        violations = diags.len(),
        "owner groups validated"
    );
    diags
}
