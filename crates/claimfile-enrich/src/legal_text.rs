use claimfile_core::ClaimType;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::completion::{extract_json, CompletionBackend, CompletionRequest};
use crate::error::EnrichError;

const SYSTEM_PROMPT: &str = r#"You are a legal assistant helping to draft small claims court documents. Generate appropriate legal language for California small claims court forms (SC-100).

Your responses should be:
- Professional and formal legal language
- Specific to California small claims court requirements
- Clear and factual
- Appropriate for the specific claim type
- Under 500 characters per field to fit PDF form constraints

Focus on the two main questions:
1. "Why does the defendant owe you money?" - This should explain the legal basis for the claim
2. "How did you calculate the money owed?" - This should provide a clear breakdown of the calculation

Do not include court costs, filing fees, or service fees in calculations - only the actual damages/amount owed."#;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegalTextRequest {
    pub claim_type: String,
    pub plaintiff_name: String,
    pub defendant_name: String,
    pub claim_amount: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalText {
    #[serde(default)]
    pub claim_reason: String,
    #[serde(default)]
    pub calculation_explanation: String,
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    let value = value.trim();
    if value.is_empty() {
        placeholder
    } else {
        value
    }
}

fn user_prompt(claim_type: ClaimType, req: &LegalTextRequest) -> String {
    format!(
        "Generate legal text for a {title} case with these details:\n\
         - Claim Type: {title}\n\
         - Context: {context}\n\
         - Plaintiff: {plaintiff}\n\
         - Defendant: {defendant}\n\
         - Amount: ${amount}\n\n\
         Please provide:\n\
         1. claimReason: Why the defendant owes the plaintiff money (explain the legal basis)\n\
         2. calculationExplanation: How the amount was calculated (clear breakdown)\n\n\
         Format as JSON with \"claimReason\" and \"calculationExplanation\" fields.",
        title = claim_type.title(),
        context = claim_type.context(),
        plaintiff = or_placeholder(&req.plaintiff_name, "[Plaintiff Name]"),
        defendant = or_placeholder(&req.defendant_name, "[Defendant Name]"),
        amount = or_placeholder(&req.claim_amount, "[Amount]"),
    )
}

/// Draft answers for SC-100 item 3 ("why does the defendant owe you" and
/// "how did you calculate").
pub async fn generate_legal_text(
    backend: &dyn CompletionBackend,
    req: &LegalTextRequest,
) -> Result<LegalText, EnrichError> {
    if req.claim_type.trim().is_empty() {
        return Err(EnrichError::invalid_input("Claim type is required"));
    }
    let claim_type: ClaimType = req
        .claim_type
        .parse()
        .map_err(|_| EnrichError::invalid_input("Invalid claim type"))?;

    let content = backend
        .complete(CompletionRequest {
            purpose: "legal-text",
            system: SYSTEM_PROMPT.to_string(),
            user: user_prompt(claim_type, req),
            temperature: 0.3,
            max_tokens: 1000,
            json_mode: false,
        })
        .await?;

    let text: LegalText = extract_json(&content)?;
    if text.claim_reason.trim().is_empty() || text.calculation_explanation.trim().is_empty() {
        return Err(EnrichError::invalid_response(
            "Invalid response format from OpenAI",
        ));
    }
    info!(claim_type = %claim_type, "legal text generated");
    Ok(text)
}
