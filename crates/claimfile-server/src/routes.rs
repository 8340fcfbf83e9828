use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::header,
    response::{IntoResponse, Json, Response},
};
use base64::Engine as _;
use chrono::Utc;
use claimfile_core::{catalog, filler::fill_pdf, mapper::build_field_mapping, FormSubmission};
use claimfile_enrich::{
    court::{self, CourtInfoRequest},
    jurisdiction::{self, JurisdictionRequest},
    legal_text::{self, LegalTextRequest},
    presuit::{self, PresuitRequest},
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::{error::ApiError, template, AppState};

type ApiResult<T> = Result<T, ApiError>;

/// Unwraps a JSON body, turning axum's rejection into a JSON 400.
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    Ok(payload?.0)
}

// ── Request body types ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(crate) struct FormsQuery {
    pub category: Option<String>,
    #[serde(rename = "formId")]
    pub form_id: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct FetchFormBody {
    #[serde(alias = "identifier")]
    pub form_id: Option<String>,
    pub download: bool,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub(crate) struct AddressBody {
    pub address: String,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct BusinessBody {
    pub business_name: String,
}

// ── Health ────────────────────────────────────────────────────────────────

pub(crate) async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

// ── Forms catalog ─────────────────────────────────────────────────────────

pub(crate) async fn list_forms(Query(q): Query<FormsQuery>) -> ApiResult<Json<Value>> {
    if let Some(id) = q.form_id.as_deref().filter(|s| !s.is_empty()) {
        let form =
            catalog::find(id).ok_or_else(|| ApiError::NotFound(format!("Form {id} not found")))?;
        return Ok(Json(json!({ "success": true, "form": form })));
    }

    let forms = catalog::by_category(q.category.as_deref().filter(|s| !s.is_empty()));
    Ok(Json(json!({
        "success": true,
        "total": forms.len(),
        "forms": forms,
        "categories": catalog::CATEGORIES,
    })))
}

pub(crate) async fn fetch_form(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FetchFormBody>, JsonRejection>,
) -> ApiResult<Response> {
    let req = body(payload)?;
    let id = req
        .form_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("formId is required".into()))?;
    let form = catalog::find(id).ok_or_else(|| ApiError::NotFound(format!("Form {id} not found")))?;

    info!(form_id = %form.form_id, name = %form.name, "fetching form");
    let bytes = state
        .forms
        .fetch_pdf(form.url)
        .await
        .map_err(ApiError::enrich("Failed to fetch PDF"))?;

    if req.download {
        let disposition = format!("attachment; filename=\"{}.pdf\"", form.form_id);
        return Ok((
            [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            bytes,
        )
            .into_response());
    }

    Ok(Json(json!({
        "success": true,
        "message": format!("Successfully fetched {}", form.form_id),
        "pdfBase64": base64::engine::general_purpose::STANDARD.encode(&bytes),
        "fileSize": bytes.len(),
        "fetchedAt": Utc::now().to_rfc3339(),
        "metadata": {
            "formId": form.form_id,
            "formName": form.name,
            "formDescription": form.description,
            "category": form.category,
            "sourceUrl": form.url,
        },
    }))
    .into_response())
}

// ── Submission ────────────────────────────────────────────────────────────

fn submission_id() -> String {
    format!(
        "sub_{}_{:04x}",
        Utc::now().timestamp_millis(),
        rand::random::<u16>()
    )
}

pub(crate) async fn submit_form(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FormSubmission>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let submission = body(payload)?;
    submission.validate(state.config.max_claim_amount)?;

    let template_bytes = template::resolve(&state, submission.fresh_pdf_base64.as_deref()).await?;
    let mapping = build_field_mapping(&submission);
    let filled = fill_pdf(&template_bytes, &mapping)?;

    let id = submission_id();
    let report = &filled.report;
    if report.filled == 0 {
        warn!(submission_id = %id, "no fields were filled; template may not be SC-100");
    }
    info!(
        submission_id = %id,
        claim_type = %submission.claim_type,
        filled = report.filled,
        attempted = report.attempted,
        "submission filled"
    );

    Ok(Json(json!({
        "success": true,
        "submissionId": id,
        "pdfBase64": base64::engine::general_purpose::STANDARD.encode(&filled.bytes),
        "fieldsFilled": report.filled,
        "fieldsAttempted": report.attempted,
        "submittedAt": Utc::now().to_rfc3339(),
    })))
}

// ── Enrichment proxies ────────────────────────────────────────────────────

pub(crate) async fn autocomplete_address(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AddressBody>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let req = body(payload)?;
    let info = state
        .places
        .autocomplete_address(&req.address)
        .await
        .map_err(ApiError::enrich("Failed to autocomplete address"))?;
    Ok(Json(json!({ "addressInfo": info })))
}

pub(crate) async fn fetch_business_info(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BusinessBody>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let req = body(payload)?;
    let info = state
        .places
        .business_info(&req.business_name)
        .await
        .map_err(ApiError::enrich("Failed to fetch business information"))?;
    Ok(Json(json!({ "businessInfo": info })))
}

pub(crate) async fn generate_court_info(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CourtInfoRequest>, JsonRejection>,
) -> ApiResult<Json<court::CourtInfo>> {
    let req = body(payload)?;
    let info = court::generate_court_info(state.completion.as_ref(), &req)
        .await
        .map_err(ApiError::enrich("Failed to generate court information"))?;
    Ok(Json(info))
}

pub(crate) async fn generate_jurisdiction(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<JurisdictionRequest>, JsonRejection>,
) -> ApiResult<Json<jurisdiction::JurisdictionInfo>> {
    let req = body(payload)?;
    let info = jurisdiction::generate_jurisdiction(state.completion.as_ref(), &req)
        .await
        .map_err(ApiError::enrich("Failed to generate jurisdiction information"))?;
    Ok(Json(info))
}

pub(crate) async fn generate_legal_text(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LegalTextRequest>, JsonRejection>,
) -> ApiResult<Json<legal_text::LegalText>> {
    let req = body(payload)?;
    let text = legal_text::generate_legal_text(state.completion.as_ref(), &req)
        .await
        .map_err(ApiError::enrich("Failed to generate legal text"))?;
    Ok(Json(text))
}

pub(crate) async fn generate_presuit_demand(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PresuitRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let req = body(payload)?;
    let demand = presuit::generate_presuit_demand(state.completion.as_ref(), &req)
        .await
        .map_err(ApiError::enrich("Failed to generate explanation"))?;
    Ok(Json(json!({ "success": true, "whyNotAsked": demand.why_not_asked })))
}
