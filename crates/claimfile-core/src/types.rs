use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ── TriState ─────────────────────────────────────────────────────────────

/// Answer to a yes/no question on the form that the filer may leave blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriState {
    Yes,
    No,
    #[default]
    Unanswered,
}

impl TriState {
    /// Condition for the "yes" box of a yes/no pair.
    pub fn yes_box(self) -> Option<bool> {
        match self {
            TriState::Yes => Some(true),
            TriState::No => Some(false),
            TriState::Unanswered => None,
        }
    }

    /// Condition for the "no" box of a yes/no pair.
    pub fn no_box(self) -> Option<bool> {
        self.yes_box().map(|yes| !yes)
    }

    pub fn is_no(self) -> bool {
        self == TriState::No
    }
}

impl From<bool> for TriState {
    fn from(b: bool) -> Self {
        if b {
            TriState::Yes
        } else {
            TriState::No
        }
    }
}

impl Serialize for TriState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TriState::Yes => serializer.serialize_bool(true),
            TriState::No => serializer.serialize_bool(false),
            TriState::Unanswered => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for TriState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Bool(bool),
            Text(String),
        }

        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(TriState::Unanswered),
            Some(Raw::Bool(b)) => Ok(b.into()),
            Some(Raw::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "yes" | "true" => Ok(TriState::Yes),
                "no" | "false" => Ok(TriState::No),
                "" | "unanswered" => Ok(TriState::Unanswered),
                other => Err(serde::de::Error::custom(format!(
                    "expected yes, no or unanswered, got {other:?}"
                ))),
            },
        }
    }
}

// ── Claim types ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClaimType {
    UnpaidDebts,
    BreachContract,
    PropertyDamage,
    SecurityDeposit,
    UnpaidWages,
    Other,
}

/// Display title and drafting context for a claim type.
pub struct ClaimTypeInfo {
    pub claim_type: ClaimType,
    pub slug: &'static str,
    pub title: &'static str,
    pub context: &'static str,
}

const UNPAID_DEBTS: ClaimTypeInfo = ClaimTypeInfo {
    claim_type: ClaimType::UnpaidDebts,
    slug: "unpaid-debts",
    title: "Unpaid Debts or Loans",
    context: "money lending, personal loans, roommate obligations, shared expenses",
};

const BREACH_CONTRACT: ClaimTypeInfo = ClaimTypeInfo {
    claim_type: ClaimType::BreachContract,
    slug: "breach-contract",
    title: "Breach of Contract",
    context: "contractor work, service agreements, written contracts, verbal agreements",
};

const PROPERTY_DAMAGE: ClaimTypeInfo = ClaimTypeInfo {
    claim_type: ClaimType::PropertyDamage,
    slug: "property-damage",
    title: "Property Damage",
    context: "vehicle accidents, rental property damage, personal property damage",
};

const SECURITY_DEPOSIT: ClaimTypeInfo = ClaimTypeInfo {
    claim_type: ClaimType::SecurityDeposit,
    slug: "security-deposit",
    title: "Security Deposit Disputes",
    context: "rental deposits, tenant rights, landlord obligations, property conditions",
};

const UNPAID_WAGES: ClaimTypeInfo = ClaimTypeInfo {
    claim_type: ClaimType::UnpaidWages,
    slug: "unpaid-wages",
    title: "Unpaid Wages",
    context: "final paychecks, overtime pay, commissions, earned compensation",
};

const OTHER: ClaimTypeInfo = ClaimTypeInfo {
    claim_type: ClaimType::Other,
    slug: "other",
    title: "Other Money Claim",
    context: "a money claim that does not fit the listed categories",
};

pub static CLAIM_TYPES: &[ClaimTypeInfo] = &[
    UNPAID_DEBTS,
    BREACH_CONTRACT,
    PROPERTY_DAMAGE,
    SECURITY_DEPOSIT,
    UNPAID_WAGES,
    OTHER,
];

impl ClaimType {
    pub fn info(self) -> &'static ClaimTypeInfo {
        match self {
            ClaimType::UnpaidDebts => &UNPAID_DEBTS,
            ClaimType::BreachContract => &BREACH_CONTRACT,
            ClaimType::PropertyDamage => &PROPERTY_DAMAGE,
            ClaimType::SecurityDeposit => &SECURITY_DEPOSIT,
            ClaimType::UnpaidWages => &UNPAID_WAGES,
            ClaimType::Other => &OTHER,
        }
    }

    pub fn slug(self) -> &'static str {
        self.info().slug
    }

    pub fn title(self) -> &'static str {
        self.info().title
    }

    pub fn context(self) -> &'static str {
        self.info().context
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {:?}", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

impl FromStr for ClaimType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        CLAIM_TYPES
            .iter()
            .find(|i| i.slug == s)
            .map(|i| i.claim_type)
            .ok_or_else(|| UnknownVariant {
                kind: "claim type",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for ClaimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

// ── Jurisdiction reasons ─────────────────────────────────────────────────

/// Why the chosen courthouse has authority over the claim (SC-100 item 5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JurisdictionReason {
    DefendantLives,
    PropertyDamaged,
    PlaintiffInjured,
    ContractLocation,
    BuyerContract,
    RetailInstallment,
    VehicleFinance,
    Other,
}

impl JurisdictionReason {
    pub const ALL: [JurisdictionReason; 8] = [
        JurisdictionReason::DefendantLives,
        JurisdictionReason::PropertyDamaged,
        JurisdictionReason::PlaintiffInjured,
        JurisdictionReason::ContractLocation,
        JurisdictionReason::BuyerContract,
        JurisdictionReason::RetailInstallment,
        JurisdictionReason::VehicleFinance,
        JurisdictionReason::Other,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            JurisdictionReason::DefendantLives => "defendant-lives",
            JurisdictionReason::PropertyDamaged => "property-damaged",
            JurisdictionReason::PlaintiffInjured => "plaintiff-injured",
            JurisdictionReason::ContractLocation => "contract-location",
            JurisdictionReason::BuyerContract => "buyer-contract",
            JurisdictionReason::RetailInstallment => "retail-installment",
            JurisdictionReason::VehicleFinance => "vehicle-finance",
            JurisdictionReason::Other => "other",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            JurisdictionReason::DefendantLives => "Defendant lives or does business",
            JurisdictionReason::PropertyDamaged => "Plaintiff's property was damaged",
            JurisdictionReason::PlaintiffInjured => "Plaintiff was injured",
            JurisdictionReason::ContractLocation => {
                "Contract was made, signed, performed, or broken"
            }
            JurisdictionReason::BuyerContract => {
                "Buyer/lessee signed contract or lives (personal/family goods)"
            }
            JurisdictionReason::RetailInstallment => "Buyer signed retail installment contract",
            JurisdictionReason::VehicleFinance => "Vehicle finance sale location",
            JurisdictionReason::Other => "Other",
        }
    }
}

impl FromStr for JurisdictionReason {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|r| r.slug() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "jurisdiction reason",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for JurisdictionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(default)]
        answer: TriState,
    }

    fn parse(json: &str) -> TriState {
        serde_json::from_str::<Holder>(json).unwrap().answer
    }

    #[test]
    fn tristate_accepts_bools_strings_and_absence() {
        assert_eq!(parse(r#"{"answer": true}"#), TriState::Yes);
        assert_eq!(parse(r#"{"answer": false}"#), TriState::No);
        assert_eq!(parse(r#"{"answer": "Yes"}"#), TriState::Yes);
        assert_eq!(parse(r#"{"answer": "no"}"#), TriState::No);
        assert_eq!(parse(r#"{"answer": null}"#), TriState::Unanswered);
        assert_eq!(parse(r#"{"answer": ""}"#), TriState::Unanswered);
        assert_eq!(parse(r#"{}"#), TriState::Unanswered);
    }

    #[test]
    fn tristate_rejects_garbage() {
        assert!(serde_json::from_str::<Holder>(r#"{"answer": "maybe"}"#).is_err());
    }

    #[test]
    fn tristate_boxes_are_exclusive_or_both_unset() {
        assert_eq!((TriState::Yes.yes_box(), TriState::Yes.no_box()), (Some(true), Some(false)));
        assert_eq!((TriState::No.yes_box(), TriState::No.no_box()), (Some(false), Some(true)));
        assert_eq!(
            (TriState::Unanswered.yes_box(), TriState::Unanswered.no_box()),
            (None, None)
        );
    }

    #[test]
    fn claim_type_round_trips_through_slug() {
        for info in CLAIM_TYPES {
            let parsed: ClaimType = info.slug.parse().unwrap();
            assert_eq!(parsed, info.claim_type);
            assert_eq!(parsed.title(), info.title);
            assert_eq!(info.claim_type.info().slug, info.slug);
        }
        assert!("small-debts".parse::<ClaimType>().is_err());
    }

    #[test]
    fn jurisdiction_reason_parses_known_slugs_only() {
        assert_eq!(
            "contract-location".parse::<JurisdictionReason>().unwrap(),
            JurisdictionReason::ContractLocation
        );
        let err = "where-i-live".parse::<JurisdictionReason>().unwrap_err();
        assert_eq!(err.to_string(), "invalid jurisdiction reason: \"where-i-live\"");
    }
}
