use serde::{Deserialize, Serialize};
use tracing::info;

use crate::completion::{extract_json, CompletionBackend, CompletionRequest};
use crate::error::EnrichError;

const SYSTEM_PROMPT: &str = r#"You are a California court jurisdiction expert. Based on an address, determine the correct Superior Court county and provide the main courthouse address for small claims filings.

Always respond with a JSON object in this exact format:
{
  "courtName": "County Name",
  "courtAddress": "Full courthouse address"
}

Rules:
- For courtName, provide only the county name (e.g., "Los Angeles", "San Francisco", "Orange")
- For courtAddress, provide the main courthouse address for small claims court in that county
- Use real, accurate courthouse addresses
- If the location is unclear, use the most likely court based on the ZIP code"#;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CourtInfoRequest {
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourtInfo {
    #[serde(default)]
    pub court_name: String,
    #[serde(default)]
    pub court_address: String,
}

/// Superior Court county and small-claims courthouse for a party's address.
pub async fn generate_court_info(
    backend: &dyn CompletionBackend,
    req: &CourtInfoRequest,
) -> Result<CourtInfo, EnrichError> {
    let fields = [&req.street_address, &req.city, &req.state, &req.zip];
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(EnrichError::invalid_input(
            "Missing required address information",
        ));
    }

    let user = format!(
        "Determine the correct California Superior Court for this address:\n\
         Street: {}\nCity: {}\nState: {}\nZIP: {}\n\n\
         Provide the county name and main courthouse address for small claims filings.",
        req.street_address.trim(),
        req.city.trim(),
        req.state.trim(),
        req.zip.trim()
    );

    let content = backend
        .complete(CompletionRequest {
            purpose: "court-info",
            system: SYSTEM_PROMPT.to_string(),
            user,
            temperature: 0.1,
            max_tokens: 200,
            json_mode: false,
        })
        .await?;

    let info: CourtInfo = extract_json(&content)?;
    if info.court_name.trim().is_empty() || info.court_address.trim().is_empty() {
        return Err(EnrichError::invalid_response(
            "Incomplete court information from OpenAI",
        ));
    }
    info!(court = %info.court_name, "court resolved");
    Ok(info)
}
