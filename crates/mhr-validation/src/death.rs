//! # Death-Transfer Rules
//!
//! Transfers triggered by an owner's death. The sub-type is fixed by the
//! document type:
//!
//! | document          | sub-type       | new owners         | extra evidence |
//! |-------------------|----------------|--------------------|----------------|
//! | `TRAND`           | survivorship   | surviving tenants  | none |
//! | `TRANS_ADMIN`     | administration | representatives    | grant reference |
//! | `TRANS_AFFIDAVIT` | affidavit      | representatives    | declared value within ceiling |
//! | `TRANS_WILL`      | will           | representatives    | probate or grant reference |
//!
//! Every sub-type deletes exactly one group and adds exactly one, and the
//! deleted group (as submitted) marks its deceased owners with a death
//! certificate number and a time of death no later than `as_of`. Submitted
//! owners are matched against the stored group by identity; survivorship
//! membership always comes from the stored group.

use std::collections::BTreeSet;

use mhr_core::{DeathTransferKind, TenancyType};
use mhr_state::{AssetHistory, Owner};

use crate::config::EngineConfig;
use crate::context::CallerContext;
use crate::diagnostic::{Diagnostic, Rule};
use crate::request::TransferRequest;

fn blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Run the rules for death-transfer `kind`.
pub fn validate_death_transfer(
    kind: DeathTransferKind,
    history: &dyn AssetHistory,
    request: &TransferRequest,
    ctx: &CallerContext,
    config: &EngineConfig,
) -> Vec<Diagnostic> {
    let (deleted, added) = match (
        request.delete_owner_groups.as_slice(),
        request.add_owner_groups.as_slice(),
    ) {
        ([deleted], [added]) => (deleted, added),
        (deleted, added) => {
            return vec![Diagnostic::new(
                Rule::DeathGroupCount,
                format!(
                    "a {} transfer must delete exactly one owner group and add exactly one, not {} and {}",
                    kind.document_type(),
                    deleted.len(),
                    added.len()
                ),
            )];
        }
    };

    let stored = history.find_owner_group(deleted.group_id);
    let mut diags = Vec::new();

    // Submitted owners must be members of the stored group; only matched
    // owners count as deceased. Without submitted owners the stored ones
    // stand in, and without a stored group the submission is all there is.
    let matched: Vec<(usize, &Owner)> = match stored.as_ref() {
        Some(group) if !deleted.owners.is_empty() => {
            let keys: BTreeSet<String> = group.owners.iter().map(|o| o.name.identity_key()).collect();
            let mut matched = Vec::new();
            for (i, owner) in deleted.owners.iter().enumerate() {
                if keys.contains(&owner.name.identity_key()) {
                    matched.push((i, owner));
                } else {
                    diags.push(
                        Diagnostic::new(
                            Rule::OwnerNotInGroup,
                            format!("{} is not an owner in group {}", owner.name, deleted.group_id),
                        )
                        .with_field(format!("delete_owner_groups[0].owners[{i}]")),
                    );
                }
            }
            matched
        }
        Some(group) => group.owners.iter().enumerate().collect(),
        None => deleted.owners.iter().enumerate().collect(),
    };
    let members: Vec<&Owner> = match stored.as_ref() {
        Some(group) => group.owners.iter().collect(),
        None => deleted.owners.iter().collect(),
    };
    let deceased: Vec<(usize, &Owner)> = matched.into_iter().filter(|(_, o)| o.is_deceased()).collect();

    if deceased.is_empty() {
        diags.push(
            Diagnostic::new(
                Rule::DeceasedOwnerRequired,
                format!("owner group {} names no deceased owner", deleted.group_id),
            )
            .with_field("delete_owner_groups[0]"),
        );
    }

    for &(i, owner) in &deceased {
        let Some(death) = owner.death.as_ref() else {
            continue;
        };
        let field = format!("delete_owner_groups[0].owners[{i}].death");
        if blank(death.certificate_number.as_deref()) {
            diags.push(
                Diagnostic::new(
                    Rule::DeathCertificateRequired,
                    format!("a death certificate number is required for {}", owner.name),
                )
                .with_field(format!("{field}.certificate_number")),
            );
        }
        match death.died_at {
            None => diags.push(
                Diagnostic::new(
                    Rule::DeathDateRequired,
                    format!("a date of death is required for {}", owner.name),
                )
                .with_field(format!("{field}.died_at")),
            ),
            Some(at) if at > ctx.as_of => diags.push(
                Diagnostic::new(
                    Rule::DeathDateInvalid,
                    format!("the date of death of {} ({at}) is in the future", owner.name),
                )
                .with_field(format!("{field}.died_at")),
            ),
            Some(_) => {}
        }
    }
    let deceased: Vec<&Owner> = deceased.into_iter().map(|(_, o)| o).collect();

    if kind.requires_representative() {
        for (i, owner) in added.owners.iter().enumerate() {
            if !owner.party_type.is_representative() || blank(owner.description.as_deref()) {
                diags.push(
                    Diagnostic::new(
                        Rule::NewOwnerTypeRequired,
                        format!(
                            "{} must be added as an executor, administrator or trustee with a description of their authority",
                            owner.name
                        ),
                    )
                    .with_field(format!("add_owner_groups[0].owners[{i}]")),
                );
            }
        }
    }

    match kind {
        DeathTransferKind::Affidavit => match request.declared_value {
            None => diags.push(
                Diagnostic::new(
                    Rule::DeclaredValueRequired,
                    "an affidavit transfer requires a declared value",
                )
                .with_field("declared_value"),
            ),
            Some(value) if value > config.declared_value_ceiling => diags.push(
                Diagnostic::new(
                    Rule::DeclaredValueExceeded,
                    format!(
                        "the declared value {value} exceeds the affidavit limit of {}",
                        config.declared_value_ceiling
                    ),
                )
                .with_field("declared_value"),
            ),
            Some(_) => {}
        },
        DeathTransferKind::Will => {
            let evidenced = deceased.iter().any(|o| {
                o.death.as_ref().is_some_and(|d| {
                    !blank(d.probate_reference.as_deref()) || !blank(d.grant_reference.as_deref())
                })
            });
            if !deceased.is_empty() && !evidenced {
                diags.push(
                    Diagnostic::new(
                        Rule::ProbateRequired,
                        "a transfer under a will requires a grant of probate reference",
                    )
                    .with_field("delete_owner_groups[0]"),
                );
            }
        }
        DeathTransferKind::Administration => {
            let evidenced = deceased.iter().any(|o| {
                o.death
                    .as_ref()
                    .is_some_and(|d| !blank(d.grant_reference.as_deref()))
            });
            if !deceased.is_empty() && !evidenced {
                diags.push(
                    Diagnostic::new(
                        Rule::GrantRequired,
                        "a transfer to an administrator requires a grant of administration reference",
                    )
                    .with_field("delete_owner_groups[0]"),
                );
            }
        }
        DeathTransferKind::Survivorship => {
            let deleted_tenancy = stored.as_ref().map(|g| g.tenancy).or(deleted.tenancy);
            diags.extend(survivorship_rules(
                deleted_tenancy,
                &members,
                &deceased,
                &added.owners,
                added.tenancy,
                ctx,
            ));
        }
    }

    tracing::debug!(
        kind = ?kind,
        deceased = deceased.len(),
        violations = diags.len(),
        "death transfer validated"
    );
    diags
}

fn survivorship_rules(
    deleted_tenancy: Option<TenancyType>,
    members: &[&Owner],
    deceased: &[&Owner],
    added_owners: &[Owner],
    added_tenancy: TenancyType,
    ctx: &CallerContext,
) -> Vec<Diagnostic> {
    let mut diags = Vec::new();

    if let Some(tenancy) = deleted_tenancy.filter(|t| *t != TenancyType::Joint) {
        diags.push(
            Diagnostic::new(
                Rule::SurvivorshipTenancy,
                format!("only a joint tenancy passes by survivorship, not {tenancy}"),
            )
            .with_field("delete_owner_groups[0]"),
        );
    }
    if added_tenancy == TenancyType::Common {
        diags.push(
            Diagnostic::new(
                Rule::SurvivorshipTenancy,
                "surviving joint tenants cannot take as tenants in common",
            )
            .with_field("add_owner_groups[0]"),
        );
    }

    let member_keys: BTreeSet<String> = members.iter().map(|o| o.name.identity_key()).collect();
    let dead: BTreeSet<String> = deceased.iter().map(|o| o.name.identity_key()).collect();
    for (i, owner) in added_owners.iter().enumerate() {
        let key = owner.name.identity_key();
        let field = format!("add_owner_groups[0].owners[{i}]");
        if dead.contains(&key) || owner.is_deceased() {
            diags.push(
                Diagnostic::new(
                    Rule::DeceasedOwnerRemains,
                    format!("{} is deceased and cannot remain an owner", owner.name),
                )
                .with_field(field),
            );
        } else if !member_keys.contains(&key) {
            diags.push(
                Diagnostic::new(
                    Rule::SurvivorshipNewBeneficiary,
                    format!(
                        "{} was not a joint tenant; survivorship cannot introduce a new beneficiary",
                        owner.name
                    ),
                )
                .with_field(field),
            );
        }
    }

    if deceased.iter().any(|o| o.name.is_business()) {
        let all_business = members.iter().all(|o| o.name.is_business());
        if !ctx.privileged || all_business {
            diags.push(
                Diagnostic::new(
                    Rule::SurvivorshipBusinessOwner,
                    "a business owner cannot be removed from a joint tenancy by survivorship",
                )
                .with_field("delete_owner_groups[0]"),
            );
        }
    }
    diags
}
