use claimfile_core::JurisdictionReason;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::completion::{extract_json, CompletionBackend, CompletionRequest};
use crate::error::EnrichError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JurisdictionRequest {
    pub claim_type: String,
    pub claim_reason: String,
    pub claim_amount: String,
    pub plaintiff_city: String,
    pub plaintiff_state: String,
    pub plaintiff_zip: String,
    pub defendant_city: String,
    pub defendant_state: String,
    pub defendant_zip: String,
    pub defendant_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JurisdictionInfo {
    #[serde(default)]
    pub jurisdiction_reason: String,
    #[serde(default)]
    pub jurisdiction_zip: String,
}

fn system_prompt() -> String {
    let options: Vec<String> = JurisdictionReason::ALL
        .iter()
        .map(|r| format!("- \"{}\": {}", r.slug(), r.description()))
        .collect();
    format!(
        r#"You are a California small claims court jurisdiction expert. Based on claim details and party locations, determine the appropriate jurisdiction reason and relevant zip code.

Always respond with a JSON object in this exact format:
{{
  "jurisdictionReason": "one of the valid options",
  "jurisdictionZip": "relevant zip code"
}}

Valid jurisdiction reason options:
{}

Rules for determining jurisdiction:
1. Default to where defendant lives/does business if no specific incident location
2. For property damage claims, use where the property was damaged
3. For contract disputes, use where contract was made, signed, or performed
4. For injury claims, use where plaintiff was injured
5. Consider the claim type and description to determine the most appropriate reason

For zip code:
- Use the zip code of the location that matches the jurisdiction reason
- If defendant location is chosen, use defendant's zip
- If plaintiff location is chosen, use plaintiff's zip
- If incident location mentioned in claim description, try to determine that zip"#,
        options.join("\n")
    )
}

fn user_prompt(req: &JurisdictionRequest) -> String {
    format!(
        "Determine jurisdiction for this California small claims case:\n\n\
         Claim Type: {}\nClaim Description: {}\nClaim Amount: ${}\n\n\
         Plaintiff Location: {}, {} {}\nDefendant: {}\nDefendant Location: {}, {} {}\n\n\
         Based on this information, determine:\n\
         1. The most appropriate jurisdiction reason from the valid options\n\
         2. The relevant zip code for that jurisdiction reason",
        req.claim_type.trim(),
        req.claim_reason.trim(),
        req.claim_amount.trim(),
        req.plaintiff_city,
        req.plaintiff_state,
        req.plaintiff_zip,
        req.defendant_name,
        req.defendant_city,
        req.defendant_state,
        req.defendant_zip,
    )
}

/// SC-100 item-5 reason and venue ZIP suggested for a claim.
pub async fn generate_jurisdiction(
    backend: &dyn CompletionBackend,
    req: &JurisdictionRequest,
) -> Result<JurisdictionInfo, EnrichError> {
    if req.claim_type.trim().is_empty() || req.claim_reason.trim().is_empty() {
        return Err(EnrichError::invalid_input(
            "Missing required claim information",
        ));
    }

    let content = backend
        .complete(CompletionRequest {
            purpose: "jurisdiction",
            system: system_prompt(),
            user: user_prompt(req),
            temperature: 0.1,
            max_tokens: 150,
            json_mode: false,
        })
        .await?;

    let info: JurisdictionInfo = extract_json(&content)?;
    if info.jurisdiction_reason.trim().is_empty() || info.jurisdiction_zip.trim().is_empty() {
        return Err(EnrichError::invalid_response(
            "Incomplete jurisdiction information from OpenAI",
        ));
    }
    let reason = info
        .jurisdiction_reason
        .parse::<JurisdictionReason>()
        .map_err(|e| {
            warn!(reason = %info.jurisdiction_reason, "model chose an unknown jurisdiction reason");
            EnrichError::invalid_response(e.to_string())
        })?;

    info!(reason = %reason, zip = %info.jurisdiction_zip, "jurisdiction resolved");
    Ok(JurisdictionInfo {
        jurisdiction_reason: reason.slug().to_string(),
        jurisdiction_zip: info.jurisdiction_zip.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_lists_every_reason() {
        let prompt = system_prompt();
        for reason in JurisdictionReason::ALL {
            assert!(prompt.contains(&format!("\"{}\"", reason.slug())));
        }
        assert!(prompt.contains("\"jurisdictionZip\": \"relevant zip code\""));
    }

    #[test]
    fn user_prompt_carries_party_locations() {
        let req = JurisdictionRequest {
            claim_type: "security-deposit".into(),
            claim_reason: "Landlord kept deposit".into(),
            claim_amount: "1800".into(),
            plaintiff_city: "Oakland".into(),
            plaintiff_state: "CA".into(),
            plaintiff_zip: "94607".into(),
            defendant_name: "Acme Rentals".into(),
            defendant_city: "Berkeley".into(),
            defendant_state: "CA".into(),
            defendant_zip: "94704".into(),
        };
        let prompt = user_prompt(&req);
        assert!(prompt.contains("Claim Amount: $1800"));
        assert!(prompt.contains("Plaintiff Location: Oakland, CA 94607"));
        assert!(prompt.contains("Defendant Location: Berkeley, CA 94704"));
    }
}
