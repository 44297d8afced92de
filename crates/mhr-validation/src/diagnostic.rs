//! # Structured Diagnostics
//!
//! Every rule violation the engine finds is a [`Diagnostic`]: a stable
//! [`Rule`] code, the [`DiagnosticKind`] that code belongs to, the field
//! it concerns (when there is one) and a human-readable detail.
//!
//! Sub-validators return `Vec<Diagnostic>` and never abort; the
//! orchestrator gathers them, in evaluation order, into [`Diagnostics`].
//! An empty collection means the request passed.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Cause category of a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticKind {
    /// The asset is not in a state that permits the change.
    StateGate,
    /// Malformed owner-group shape or location/description content.
    Structural,
    /// Interest fractions missing or not reconciling.
    Arithmetic,
    /// A reference to a group or owner that does not match the history.
    Identity,
    /// Missing evidence or a document type the caller may not file.
    Authority,
    /// A collaborator reported a conflict or could not be reached.
    External,
}

/// Declares the rule catalogue: each rule has a wire code and exactly
/// one kind.
macro_rules! rules {
    (
        $( $(#[$vmeta:meta])* $variant:ident => ($code:literal, $kind:ident), )+
    ) => {
        /// A validation rule, identified by a stable code.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum Rule {
            $( $(#[$vmeta])* #[serde(rename = $code)] $variant, )+
        }

        impl Rule {
            /// The stable wire code.
            pub fn code(&self) -> &'static str {
                match self {
                    $( Self::$variant => $code, )+
                }
            }

            /// The category this rule belongs to.
            pub fn kind(&self) -> DiagnosticKind {
                match self {
                    $( Self::$variant => DiagnosticKind::$kind, )+
                }
            }

            /// Every rule, in catalogue order.
            pub fn all() -> &'static [Rule] {
                &[$( Self::$variant, )+]
            }
        }
    };
}

rules! {
    // ─── State gate ──────────────────────────────────────────────────
    /// Only a re-registration may be filed against a cancelled home.
    RegistrationCancelled => ("REGISTRATION_CANCELLED", StateGate),
    /// Nothing may be filed against a historical registration.
    RegistrationHistorical => ("REGISTRATION_HISTORICAL", StateGate),
    /// The change is not on the exempt allow-list.
    RegistrationExempt => ("REGISTRATION_EXEMPT", StateGate),
    /// Residential exemption of a home that is already exempt.
    AlreadyExempt => ("ALREADY_EXEMPT", StateGate),
    /// Exemption rescission of a home that is not exempt.
    NotExempt => ("NOT_EXEMPT", StateGate),
    /// Re-registration of a home that is already active.
    AlreadyActive => ("ALREADY_ACTIVE", StateGate),
    /// A freezing unit note is in effect.
    FrozenNote => ("FROZEN_NOTE", StateGate),
    /// A transport permit is in effect.
    FrozenPermit => ("FROZEN_PERMIT", StateGate),
    /// The last change was an affidavit transfer.
    FrozenAffidavit => ("FROZEN_AFFIDAVIT", StateGate),
    /// Amending or cancelling a permit when none is in effect.
    NoPermitInEffect => ("NO_PERMIT_IN_EFFECT", StateGate),

    // ─── Structural ──────────────────────────────────────────────────
    /// The request's document type does not fit the request.
    DocumentTypeInvalid => ("DOCUMENT_TYPE_INVALID", Structural),
    /// Free text outside the approved character set.
    InvalidCharacters => ("INVALID_CHARACTERS", Structural),
    LocationFieldRequired => ("LOCATION_FIELD_REQUIRED", Structural),
    LocationFieldNotAllowed => ("LOCATION_FIELD_NOT_ALLOWED", Structural),
    /// The address is outside the registry's region.
    AddressInvalid => ("ADDRESS_INVALID", Structural),
    LocationUnchanged => ("LOCATION_UNCHANGED", Structural),
    DescriptionFieldRequired => ("DESCRIPTION_FIELD_REQUIRED", Structural),
    SectionCountInvalid => ("SECTION_COUNT_INVALID", Structural),
    SectionInvalid => ("SECTION_INVALID", Structural),
    YearInvalid => ("YEAR_INVALID", Structural),
    DescriptionUnchanged => ("DESCRIPTION_UNCHANGED", Structural),
    ExemptionReasonRequired => ("EXEMPTION_REASON_REQUIRED", Structural),
    OwnerNameRequired => ("OWNER_NAME_REQUIRED", Structural),
    OwnerDescriptionRequired => ("OWNER_DESCRIPTION_REQUIRED", Structural),
    /// At least one owner group must be added.
    GroupRequired => ("GROUP_REQUIRED", Structural),
    JointOwnerCount => ("JOINT_OWNER_COUNT", Structural),
    CommonOwnerCount => ("COMMON_OWNER_COUNT", Structural),
    CommonGroupCount => ("COMMON_GROUP_COUNT", Structural),
    SoleOwnerCount => ("SOLE_OWNER_COUNT", Structural),
    /// More than one sole group in one request.
    SoleGroupCount => ("SOLE_GROUP_COUNT", Structural),
    /// A sole group alongside other contributing groups.
    SoleGroupCombined => ("SOLE_GROUP_COMBINED", Structural),
    NaOwnerType => ("NA_OWNER_TYPE", Structural),
    /// A death transfer must delete one group and add one group.
    DeathGroupCount => ("DEATH_GROUP_COUNT", Structural),
    SurvivorshipTenancy => ("SURVIVORSHIP_TENANCY", Structural),

    // ─── Arithmetic ──────────────────────────────────────────────────
    InterestNumeratorMissing => ("INTEREST_NUMERATOR_MISSING", Arithmetic),
    InterestDenominatorMissing => ("INTEREST_DENOMINATOR_MISSING", Arithmetic),
    /// Rescaled interests do not total the common denominator.
    InterestMismatch => ("INTEREST_MISMATCH", Arithmetic),

    // ─── Identity ────────────────────────────────────────────────────
    GroupIdNonexistent => ("GROUP_ID_NONEXISTENT", Identity),
    GroupIdInactive => ("GROUP_ID_INACTIVE", Identity),
    DeleteGroupTypeInvalid => ("DELETE_GROUP_TYPE_INVALID", Identity),
    /// The deleted group names no deceased owner.
    DeceasedOwnerRequired => ("DECEASED_OWNER_REQUIRED", Identity),
    /// Survivorship added an owner who was not a joint tenant.
    SurvivorshipNewBeneficiary => ("SURVIVORSHIP_NEW_BENEFICIARY", Identity),
    DeceasedOwnerRemains => ("DECEASED_OWNER_REMAINS", Identity),
    /// A deleted owner who is not in the stored group.
    OwnerNotInGroup => ("OWNER_NOT_IN_GROUP", Identity),
    DocumentIdRequired => ("DOCUMENT_ID_REQUIRED", Identity),
    /// Check digit mismatch.
    DocumentIdInvalid => ("DOCUMENT_ID_INVALID", Identity),

    // ─── Authority ───────────────────────────────────────────────────
    DeathCertificateRequired => ("DEATH_CERT_REQUIRED", Authority),
    DeathDateRequired => ("DEATH_DATE_REQUIRED", Authority),
    /// Death timestamp after the evaluation instant.
    DeathDateInvalid => ("DEATH_DATE_INVALID", Authority),
    NewOwnerTypeRequired => ("NEW_OWNER_TYPE_REQUIRED", Authority),
    DeclaredValueRequired => ("DECLARED_VALUE_REQUIRED", Authority),
    DeclaredValueExceeded => ("DECLARED_VALUE_EXCEEDED", Authority),
    ProbateRequired => ("PROBATE_REQUIRED", Authority),
    GrantRequired => ("GRANT_REQUIRED", Authority),
    SurvivorshipBusinessOwner => ("SURVIVORSHIP_BUSINESS_OWNER", Authority),
    /// The caller's role may not file this document type.
    DocumentTypeNotAllowed => ("DOCUMENT_TYPE_NOT_ALLOWED", Authority),
    TransferDocumentTypePrivileged => ("TRANSFER_DOCUMENT_TYPE_PRIVILEGED", Authority),

    // ─── External ────────────────────────────────────────────────────
    DocumentIdInUse => ("DOCUMENT_ID_IN_USE", External),
    ParcelNotFound => ("PARCEL_NOT_FOUND", External),
    LienOutstanding => ("LIEN_OUTSTANDING", External),
    LookupFailed => ("LOOKUP_FAILED", External),
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ─── Diagnostic ──────────────────────────────────────────────────────

/// A single rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Rule that was violated.
    pub code: Rule,
    /// Category of the rule.
    pub kind: DiagnosticKind,
    /// Request field the violation concerns, e.g. `add_owner_groups[0]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Human-readable description.
    pub detail: String,
}

impl Diagnostic {
    /// A diagnostic for `rule` with no field.
    pub fn new(rule: Rule, detail: impl Into<String>) -> Self {
        Self {
            code: rule,
            kind: rule.kind(),
            field: None,
            detail: detail.into(),
        }
    }

    /// Attach the field the violation concerns.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "[{}] {}: {}", self.code, field, self.detail),
            None => write!(f, "[{}] {}", self.code, self.detail),
        }
    }
}

// ─── Diagnostics ─────────────────────────────────────────────────────

/// Ordered collection of diagnostics for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    /// An empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    /// Returns the number of diagnostics.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the request passed.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns a slice of all diagnostics.
    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    /// Whether any diagnostic carries `rule`.
    pub fn contains(&self, rule: Rule) -> bool {
        self.items.iter().any(|d| d.code == rule)
    }

    /// Number of diagnostics carrying `rule`.
    pub fn count(&self, rule: Rule) -> usize {
        self.items.iter().filter(|d| d.code == rule).count()
    }

    /// Codes in evaluation order.
    pub fn codes(&self) -> Vec<Rule> {
        self.items.iter().map(|d| d.code).collect()
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Diagnostic> {
        self.items
    }

    /// The single-string form: details separated by a space, empty on
    /// success.
    pub fn to_message_string(&self) -> String {
        self.items
            .iter()
            .map(|d| d.detail.trim())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl FromIterator<Diagnostic> for Diagnostics {
    fn from_iter<I: IntoIterator<Item = Diagnostic>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, d) in self.items.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{d}")?;
        }
        Ok(())
    }
}
