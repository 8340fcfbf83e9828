//! Locating the blank SC-100 a submission is filled into.

use std::path::Path;

use base64::Engine as _;
use claimfile_core::{
    catalog,
    filler::{self, FillError},
    mapper::build_field_mapping,
    FormSubmission,
};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::AppState;

/// Decodes a client-supplied template. A `data:` URL prefix is tolerated.
pub fn decode_fresh_pdf(encoded: &str) -> Result<Vec<u8>, ApiError> {
    let payload = match encoded.trim().split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => encoded.trim(),
    };
    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| ApiError::BadRequest(format!("freshPdfBase64 is not valid base64: {e}")))
}

/// Request template, then the configured file, then (optionally) a fresh
/// download from the forms catalog that is cached at the configured path.
pub async fn resolve(state: &AppState, fresh_pdf_base64: Option<&str>) -> Result<Vec<u8>, ApiError> {
    if let Some(encoded) = fresh_pdf_base64.filter(|s| !s.trim().is_empty()) {
        let bytes = decode_fresh_pdf(encoded)?;
        info!(len = bytes.len(), "using template supplied with the request");
        return Ok(bytes);
    }

    let path = Path::new(&state.config.template_path);
    if tokio::fs::try_exists(path).await.unwrap_or(false) {
        return tokio::fs::read(path).await.map_err(|e| {
            ApiError::Internal(format!("Failed to read template {}: {e}", path.display()))
        });
    }

    if !state.config.template_auto_fetch {
        return Err(ApiError::Internal(format!(
            "SC-100 template not found at {}",
            path.display()
        )));
    }

    let form = catalog::find(catalog::SC100)
        .ok_or_else(|| ApiError::Internal("SC-100 missing from forms catalog".into()))?;
    info!(url = form.url, "template missing, downloading SC-100");
    let bytes = state
        .forms
        .fetch_pdf(form.url)
        .await
        .map_err(ApiError::enrich("Failed to fetch SC-100 template"))?;

    if let Err(e) = cache(path, &bytes).await {
        warn!(path = %path.display(), "could not cache downloaded template: {e}");
    }
    Ok(bytes)
}

async fn cache(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir).await?;
    }
    tokio::fs::write(path, bytes).await?;
    info!(path = %path.display(), len = bytes.len(), "cached SC-100 template");
    Ok(())
}

/// How many of the mapped SC-100 field names exist in `template`: (found, mapped).
pub fn coverage(template: &[u8]) -> Result<(usize, usize), FillError> {
    let present = filler::form_fields(template)?;
    let mapping = build_field_mapping(&FormSubmission::default());
    let names: Vec<&str> = mapping
        .text
        .iter()
        .map(|(n, _)| *n)
        .chain(mapping.checkboxes.iter().map(|(n, _)| *n))
        .collect();
    let found = names
        .iter()
        .filter(|n| present.iter().any(|(p, _)| p == *n))
        .count();
    Ok((found, names.len()))
}

/// Startup check of the configured template; only ever logs.
pub async fn log_coverage(path: &str) {
    let Ok(bytes) = tokio::fs::read(path).await else {
        info!(path, "no template on disk yet");
        return;
    };
    match coverage(&bytes) {
        Ok((found, mapped)) if found < mapped => {
            warn!(path, found, mapped, "template is missing some mapped fields")
        }
        Ok((found, mapped)) => info!(path, found, mapped, "template covers every mapped field"),
        Err(e) => warn!(path, "template is not usable: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_plain_and_data_url() {
        assert_eq!(decode_fresh_pdf("JVBERi0=").unwrap(), b"%PDF-");
        assert_eq!(
            decode_fresh_pdf("data:application/pdf;base64,JVBERi0=").unwrap(),
            b"%PDF-"
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            decode_fresh_pdf("not base64!!"),
            Err(ApiError::BadRequest(_))
        ));
    }
}
