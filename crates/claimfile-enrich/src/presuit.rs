use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::completion::{extract_json, CompletionBackend, CompletionRequest};
use crate::error::EnrichError;

pub const MIN_EXPLANATION_CHARS: usize = 10;
pub const MAX_EXPLANATION_CHARS: usize = 500;

const SYSTEM_PROMPT: &str = r#"You are a legal assistant helping with California small claims court filings. Generate a legally valid explanation for why a plaintiff did not ask for payment before filing suit.

The explanation must be:
- Legally acceptable under California small claims court rules
- Professional and formal
- Specific to the claim circumstances
- Under 300 characters to fit form constraints
- One of these valid legal reasons:
  1. Defendant cannot be located/contacted
  2. Demand would be futile (defendant already refused)
  3. Emergency circumstances requiring immediate court action
  4. Defendant is avoiding service or contact
  5. Written demand was sent but ignored
  6. Property damage/injury requiring immediate legal documentation

You MUST respond with valid JSON containing exactly this field:
{
  "whyNotAsked": "Clear legal explanation for not making pre-suit demand"
}"#;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PresuitRequest {
    pub claim_type: String,
    pub claim_reason: String,
    pub defendant_name: String,
    pub claim_amount: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresuitDemand {
    #[serde(default)]
    pub why_not_asked: String,
}

fn user_prompt(req: &PresuitRequest) -> String {
    let defendant = match req.defendant_name.trim() {
        "" => "the defendant",
        name => name,
    };
    let amount = match req.claim_amount.trim() {
        "" => "the amount owed",
        amount => amount,
    };
    format!(
        "Generate a legally acceptable explanation for why the plaintiff did not ask {defendant} \
         for payment before filing this {claim_type} claim.\n\n\
         Claim details:\n- Type: {claim_type}\n- Reason: {reason}\n- Amount: ${amount}\n\n\
         Provide a brief, legally valid explanation that would be acceptable to the court for \
         proceeding without a pre-suit demand. Focus on practical reasons like inability to \
         contact, previous refusal, or urgency.",
        claim_type = req.claim_type.trim(),
        reason = req.claim_reason.trim(),
    )
}

/// SC-100 item 4 explanation for not asking the defendant to pay first.
pub async fn generate_presuit_demand(
    backend: &dyn CompletionBackend,
    req: &PresuitRequest,
) -> Result<PresuitDemand, EnrichError> {
    let mut missing = Vec::new();
    if req.claim_type.trim().is_empty() {
        missing.push("claimType");
    }
    if req.claim_reason.trim().is_empty() {
        missing.push("claimReason");
    }
    if !missing.is_empty() {
        return Err(EnrichError::invalid_input(format!(
            "Invalid request data: {} required",
            missing.join(", ")
        )));
    }

    info!(claim_type = %req.claim_type, "generating pre-suit demand explanation");
    let content = backend
        .complete(CompletionRequest {
            purpose: "presuit-demand",
            system: SYSTEM_PROMPT.to_string(),
            user: user_prompt(req),
            temperature: 0.3,
            max_tokens: 300,
            json_mode: true,
        })
        .await?;

    let demand: PresuitDemand = extract_json(&content)?;
    let why = demand.why_not_asked.trim();
    let len = why.chars().count();
    if !(MIN_EXPLANATION_CHARS..=MAX_EXPLANATION_CHARS).contains(&len) {
        warn!(len, "pre-suit explanation length out of range");
        return Err(EnrichError::invalid_response(format!(
            "whyNotAsked must be {MIN_EXPLANATION_CHARS}-{MAX_EXPLANATION_CHARS} characters, got {len}"
        )));
    }
    Ok(PresuitDemand {
        why_not_asked: why.to_string(),
    })
}
