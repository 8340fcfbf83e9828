use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{ClaimType, JurisdictionReason, TriState};

/// Everything the filer entered for one SC-100, exactly as posted by the client.
/// Absent string fields deserialize to `""`; validation decides what is missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormSubmission {
    // Court
    pub court_name: String,
    pub court_address: String,
    pub case_number: String,

    // Plaintiff
    pub plaintiff_name: String,
    pub plaintiff_phone: String,
    pub plaintiff_street: String,
    pub plaintiff_city: String,
    pub plaintiff_state: String,
    pub plaintiff_zip: String,
    pub plaintiff_mailing_street: String,
    pub plaintiff_mailing_city: String,
    pub plaintiff_mailing_state: String,
    pub plaintiff_mailing_zip: String,
    pub plaintiff_email: String,

    // Second plaintiff
    pub has_second_plaintiff: bool,
    pub second_plaintiff_name: String,
    pub second_plaintiff_phone: String,
    pub second_plaintiff_street: String,
    pub second_plaintiff_city: String,
    pub second_plaintiff_state: String,
    pub second_plaintiff_zip: String,
    pub second_plaintiff_mailing_street: String,
    pub second_plaintiff_mailing_city: String,
    pub second_plaintiff_mailing_state: String,
    pub second_plaintiff_mailing_zip: String,
    pub second_plaintiff_email: String,

    pub more_than_two_plaintiffs: bool,
    pub fictitious_business_name: bool,
    pub payday_lender: bool,

    // Defendant
    pub defendant_name: String,
    pub defendant_phone: String,
    pub defendant_street: String,
    pub defendant_city: String,
    pub defendant_state: String,
    pub defendant_zip: String,
    pub defendant_mailing_street: String,
    pub defendant_mailing_city: String,
    pub defendant_mailing_state: String,
    pub defendant_mailing_zip: String,
    pub defendant_is_business: bool,
    pub agent_name: String,
    pub agent_title: String,
    pub agent_street: String,
    pub agent_city: String,
    pub agent_state: String,
    pub agent_zip: String,
    pub more_than_one_defendant: bool,
    pub defendant_on_military_duty: bool,
    pub defendant_military_name: String,

    // Claim
    pub claim_type: String,
    pub claim_amount: String,
    pub claim_reason: String,
    pub incident_date: String,
    pub incident_start_date: String,
    pub incident_end_date: String,
    pub calculation_explanation: String,
    pub need_more_space: bool,

    // Pre-suit demand
    pub asked_for_payment: TriState,
    pub why_not_asked: String,

    // Venue
    pub jurisdiction_reason: String,
    pub jurisdiction_zip: String,
    pub jurisdiction_other_reason: String,

    // Items 6-9
    pub attorney_fee_dispute: TriState,
    pub arbitration_filed: bool,
    pub suing_public_entity: TriState,
    pub public_entity_claim_date: String,
    pub more_than_twelve_claims: TriState,
    pub claim_over_limit_count: TriState,

    // Declaration
    pub agree_to_terms: bool,
    pub signature_date: String,
    pub plaintiff_print_name: String,
    pub second_plaintiff_print_name: String,
    pub second_plaintiff_signature_date: String,

    /// A freshly downloaded blank SC-100 to fill instead of the local template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fresh_pdf_base64: Option<String>,
}

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Missing required fields")]
    MissingFields(Vec<&'static str>),
    #[error("Invalid {field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },
    #[error("Claim amount ${amount:.2} exceeds the small claims limit of ${max:.2}")]
    AmountOutOfRange { amount: f64, max: f64 },
}

impl ValidationError {
    pub fn missing_fields(&self) -> Option<&[&'static str]> {
        match self {
            ValidationError::MissingFields(fields) => Some(fields.as_slice()),
            _ => None,
        }
    }
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Parses a dollar amount as typed by a person: "$1,200.50", "1200", " 75 ".
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    cleaned.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

impl FormSubmission {
    /// Names (as posted) of required fields that are empty, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let required: [(&'static str, &str); 15] = [
            ("plaintiffName", &self.plaintiff_name),
            ("plaintiffStreet", &self.plaintiff_street),
            ("plaintiffCity", &self.plaintiff_city),
            ("plaintiffState", &self.plaintiff_state),
            ("plaintiffZip", &self.plaintiff_zip),
            ("defendantName", &self.defendant_name),
            ("defendantStreet", &self.defendant_street),
            ("defendantCity", &self.defendant_city),
            ("defendantState", &self.defendant_state),
            ("defendantZip", &self.defendant_zip),
            ("claimType", &self.claim_type),
            ("claimAmount", &self.claim_amount),
            ("claimReason", &self.claim_reason),
            ("jurisdictionReason", &self.jurisdiction_reason),
            ("signatureDate", &self.signature_date),
        ];

        let mut missing: Vec<&'static str> = required
            .iter()
            .filter(|(_, value)| blank(value))
            .map(|(name, _)| *name)
            .collect();

        // agreeToTerms belongs between jurisdictionReason and signatureDate.
        if !self.agree_to_terms {
            let at = missing
                .iter()
                .position(|f| *f == "signatureDate")
                .unwrap_or(missing.len());
            missing.insert(at, "agreeToTerms");
        }

        if self.has_second_plaintiff && blank(&self.second_plaintiff_name) {
            missing.push("secondPlaintiffName");
        }
        if self.asked_for_payment.is_no() && blank(&self.why_not_asked) {
            missing.push("whyNotAsked");
        }
        if self.jurisdiction_reason.trim() == JurisdictionReason::Other.slug()
            && blank(&self.jurisdiction_other_reason)
        {
            missing.push("jurisdictionOtherReason");
        }
        missing
    }

    /// Rejects the submission before any PDF work if it cannot be filed.
    pub fn validate(&self, max_claim_amount: f64) -> Result<(), ValidationError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        self.claim_type()?;
        self.jurisdiction()?;

        let amount = parse_amount(&self.claim_amount).ok_or_else(|| {
            ValidationError::InvalidValue {
                field: "claimAmount",
                message: format!("{:?} is not a dollar amount", self.claim_amount),
            }
        })?;
        if amount <= 0.0 {
            return Err(ValidationError::InvalidValue {
                field: "claimAmount",
                message: "must be greater than zero".into(),
            });
        }
        if amount > max_claim_amount {
            return Err(ValidationError::AmountOutOfRange {
                amount,
                max: max_claim_amount,
            });
        }
        Ok(())
    }

    pub fn claim_type(&self) -> Result<ClaimType, ValidationError> {
        self.claim_type
            .parse()
            .map_err(|e: crate::types::UnknownVariant| ValidationError::InvalidValue {
                field: "claimType",
                message: format!("unknown value {:?}", e.value),
            })
    }

    pub fn jurisdiction(&self) -> Result<JurisdictionReason, ValidationError> {
        self.jurisdiction_reason
            .parse()
            .map_err(|e: crate::types::UnknownVariant| ValidationError::InvalidValue {
                field: "jurisdictionReason",
                message: format!("unknown value {:?}", e.value),
            })
    }
}
