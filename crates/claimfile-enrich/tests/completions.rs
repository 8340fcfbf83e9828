use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use claimfile_enrich::court::{generate_court_info, CourtInfo, CourtInfoRequest};
use claimfile_enrich::jurisdiction::{generate_jurisdiction, JurisdictionRequest};
use claimfile_enrich::legal_text::{generate_legal_text, LegalTextRequest};
use claimfile_enrich::presuit::{generate_presuit_demand, PresuitRequest};
use claimfile_enrich::{EnrichError, OpenAiBackend};
use serde_json::{json, Value};
use tracing_test::traced_test;

/// Fake `/chat/completions` that records each request and answers with a canned reply.
#[derive(Clone)]
struct FakeOpenAi {
    status: StatusCode,
    reply: Value,
    seen: Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

impl FakeOpenAi {
    fn content(content: &str) -> Self {
        Self::raw(
            StatusCode::OK,
            json!({"choices": [{"message": {"role": "assistant", "content": content}}]}),
        )
    }

    fn raw(status: StatusCode, reply: Value) -> Self {
        Self {
            status,
            reply,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn last_request(&self) -> (Option<String>, Value) {
        self.seen.lock().unwrap().last().cloned().unwrap()
    }

    fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    async fn start(&self) -> OpenAiBackend {
        async fn handle(
            State(fake): State<FakeOpenAi>,
            headers: HeaderMap,
            Json(body): Json<Value>,
        ) -> Response {
            let auth = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            fake.seen.lock().unwrap().push((auth, body));
            (fake.status, Json(fake.reply.clone())).into_response()
        }

        let app = Router::new()
            .route("/v1/chat/completions", post(handle))
            .with_state(self.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        OpenAiBackend::new("sk-test", &format!("http://{addr}/v1/"), "gpt-4o-mini")
    }
}

fn court_request() -> CourtInfoRequest {
    CourtInfoRequest {
        street_address: "12 Elm St".into(),
        city: "Oakland".into(),
        state: "CA".into(),
        zip: "94607".into(),
    }
}

#[tokio::test]
#[traced_test]
async fn court_info_parses_fenced_reply() {
    let fake = FakeOpenAi::content(
        "```json\n{\"courtName\": \"Alameda\", \"courtAddress\": \"1225 Fallon St, Oakland, CA 94612\"}\n```",
    );
    let backend = fake.start().await;

    let info = generate_court_info(&backend, &court_request()).await.unwrap();
    assert_eq!(
        info,
        CourtInfo {
            court_name: "Alameda".into(),
            court_address: "1225 Fallon St, Oakland, CA 94612".into(),
        }
    );

    let (auth, body) = fake.last_request();
    assert_eq!(auth.as_deref(), Some("Bearer sk-test"));
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["temperature"], 0.1);
    assert_eq!(body["max_tokens"], 200);
    assert_eq!(body["messages"][0]["role"], "system");
    assert!(body["messages"][1]["content"]
        .as_str()
        .unwrap()
        .contains("ZIP: 94607"));
    assert!(body.get("response_format").is_none());
    assert!(logs_contain("calling chat completions"));
}

#[tokio::test]
async fn incomplete_court_info_is_invalid_response() {
    let fake = FakeOpenAi::content(r#"{"courtName": "Alameda"}"#);
    let backend = fake.start().await;
    let err = generate_court_info(&backend, &court_request()).await.unwrap_err();
    assert!(matches!(err, EnrichError::InvalidResponse(_)));
}

#[tokio::test]
async fn validation_runs_before_credential_check() {
    let unconfigured = OpenAiBackend::new("", "http://127.0.0.1:9", "gpt-4o-mini");

    let err = generate_court_info(&unconfigured, &CourtInfoRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Missing required address information");

    let err = generate_court_info(&unconfigured, &court_request())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "OpenAI API key not configured");
}

#[tokio::test]
async fn jurisdiction_reason_must_be_known() {
    let fake = FakeOpenAi::content(
        r#"{"jurisdictionReason": "where-i-live", "jurisdictionZip": "94607"}"#,
    );
    let backend = fake.start().await;
    let req = JurisdictionRequest {
        claim_type: "breach-contract".into(),
        claim_reason: "Contractor walked off the job".into(),
        ..Default::default()
    };
    let err = generate_jurisdiction(&backend, &req).await.unwrap_err();
    assert!(matches!(err, EnrichError::InvalidResponse(_)));

    let (_, body) = fake.last_request();
    assert_eq!(body["temperature"], 0.1);
    assert_eq!(body["max_tokens"], 150);
}

#[tokio::test]
async fn jurisdiction_returns_normalized_reason() {
    let fake = FakeOpenAi::content(
        r#"{"jurisdictionReason": " contract-location ", "jurisdictionZip": " 94704"}"#,
    );
    let backend = fake.start().await;
    let req = JurisdictionRequest {
        claim_type: "breach-contract".into(),
        claim_reason: "Contractor walked off the job".into(),
        defendant_zip: "94704".into(),
        ..Default::default()
    };
    let info = generate_jurisdiction(&backend, &req).await.unwrap();
    assert_eq!(info.jurisdiction_reason, "contract-location");
    assert_eq!(info.jurisdiction_zip, "94704");
}

#[tokio::test]
async fn legal_text_rejects_unknown_claim_type_without_calling_upstream() {
    let fake = FakeOpenAi::content("{}");
    let backend = fake.start().await;
    let req = LegalTextRequest {
        claim_type: "slip-and-fall".into(),
        ..Default::default()
    };
    let err = generate_legal_text(&backend, &req).await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid claim type");
    assert_eq!(fake.calls(), 0);
}

#[tokio::test]
async fn legal_text_round_trip() {
    let fake = FakeOpenAi::content(
        r#"{"claimReason": "Defendant failed to repay a $500 loan.", "calculationExplanation": "Principal of $500."}"#,
    );
    let backend = fake.start().await;
    let req = LegalTextRequest {
        claim_type: "unpaid-debts".into(),
        claim_amount: "500".into(),
        ..Default::default()
    };
    let text = generate_legal_text(&backend, &req).await.unwrap();
    assert_eq!(text.calculation_explanation, "Principal of $500.");

    let (_, body) = fake.last_request();
    assert_eq!(body["temperature"], 0.3);
    assert_eq!(body["max_tokens"], 1000);
    assert!(body["messages"][1]["content"]
        .as_str()
        .unwrap()
        .contains("Unpaid Debts or Loans"));
}

#[tokio::test]
async fn presuit_demand_uses_json_mode_and_checks_length() {
    let fake = FakeOpenAi::content(
        r#"{"whyNotAsked": "Defendant has refused all prior requests and blocked contact."}"#,
    );
    let backend = fake.start().await;
    let req = PresuitRequest {
        claim_type: "unpaid-debts".into(),
        claim_reason: "Loan not repaid".into(),
        ..Default::default()
    };
    let demand = generate_presuit_demand(&backend, &req).await.unwrap();
    assert!(demand.why_not_asked.starts_with("Defendant has refused"));

    let (_, body) = fake.last_request();
    assert_eq!(body["response_format"]["type"], "json_object");
    assert_eq!(body["max_tokens"], 300);

    let short = FakeOpenAi::content(r#"{"whyNotAsked": "Refused."}"#);
    let backend = short.start().await;
    let err = generate_presuit_demand(&backend, &req).await.unwrap_err();
    assert!(matches!(err, EnrichError::InvalidResponse(_)));
}

#[tokio::test]
async fn presuit_demand_names_missing_inputs() {
    let unconfigured = OpenAiBackend::new("", "http://127.0.0.1:9", "gpt-4o-mini");
    let err = generate_presuit_demand(&unconfigured, &PresuitRequest::default())
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid request data: claimType, claimReason required"
    );
}

#[tokio::test]
async fn upstream_error_message_is_passed_through() {
    let fake = FakeOpenAi::raw(
        StatusCode::UNAUTHORIZED,
        json!({"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}),
    );
    let backend = fake.start().await;
    match generate_court_info(&backend, &court_request()).await {
        Err(EnrichError::Upstream { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "Incorrect API key provided");
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_choices_is_invalid_response() {
    let fake = FakeOpenAi::raw(StatusCode::OK, json!({"choices": []}));
    let backend = fake.start().await;
    let err = generate_court_info(&backend, &court_request()).await.unwrap_err();
    assert_eq!(err.to_string(), "invalid upstream response: No response from OpenAI");
}
