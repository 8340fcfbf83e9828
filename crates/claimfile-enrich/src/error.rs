use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum EnrichError {
    /// Caller sent an incomplete or malformed request.
    #[error("{0}")]
    InvalidInput(String),
    /// Upstream credential missing from the environment.
    #[error("{0} not configured")]
    MissingCredential(&'static str),
    #[error("{0}")]
    NotFound(String),
    #[error("upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },
    #[error("invalid upstream response: {0}")]
    InvalidResponse(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl EnrichError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        EnrichError::InvalidInput(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        EnrichError::NotFound(message.into())
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        EnrichError::InvalidResponse(message.into())
    }
}

const MAX_UPSTREAM_MESSAGE: usize = 300;

/// Best human-readable message out of an upstream error body.
fn upstream_message(body: &str, reason: &str) -> String {
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(body) {
        let nested = v
            .get("error")
            .and_then(|e| e.get("message").or(Some(e)))
            .and_then(|m| m.as_str());
        if let Some(msg) = nested.or_else(|| v.get("error_message").and_then(|m| m.as_str())) {
            return msg.to_string();
        }
    }
    let body = body.trim();
    if body.is_empty() {
        return reason.to_string();
    }
    body.chars().take(MAX_UPSTREAM_MESSAGE).collect()
}

/// Passes 2xx responses through; turns anything else into [`EnrichError::Upstream`].
pub(crate) async fn check_status(
    response: reqwest::Response,
    upstream: &'static str,
) -> Result<reqwest::Response, EnrichError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = upstream_message(&body, status.canonical_reason().unwrap_or("request failed"));
    warn!(upstream, status = %status, "upstream returned non-success: {}", message);
    Err(EnrichError::Upstream {
        status: status.as_u16(),
        message,
    })
}

/// Trimmed value of a required input, or an `InvalidInput` naming the problem.
pub(crate) fn require<'a>(value: &'a str, message: &str) -> Result<&'a str, EnrichError> {
    let value = value.trim();
    if value.is_empty() {
        Err(EnrichError::invalid_input(message))
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_nested_openai_message() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        assert_eq!(upstream_message(body, "Unauthorized"), "Incorrect API key provided");
    }

    #[test]
    fn picks_places_error_message() {
        let body = r#"{"status":"REQUEST_DENIED","error_message":"The provided API key is invalid."}"#;
        assert_eq!(upstream_message(body, "OK"), "The provided API key is invalid.");
    }

    #[test]
    fn falls_back_to_body_then_reason() {
        assert_eq!(upstream_message("bad gateway", "Bad Gateway"), "bad gateway");
        assert_eq!(upstream_message("  ", "Bad Gateway"), "Bad Gateway");
        assert_eq!(upstream_message(&"x".repeat(1000), "").len(), MAX_UPSTREAM_MESSAGE);
    }

    #[test]
    fn missing_credential_message() {
        let err = EnrichError::MissingCredential("OpenAI API key");
        assert_eq!(err.to_string(), "OpenAI API key not configured");
    }

    #[test]
    fn require_trims_and_rejects_blank() {
        assert_eq!(require("  94607 ", "zip").unwrap(), "94607");
        assert!(matches!(require(" ", "Address is required"), Err(EnrichError::InvalidInput(m)) if m == "Address is required"));
    }
}
