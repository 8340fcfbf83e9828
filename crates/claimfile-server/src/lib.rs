use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use claimfile_core::config::Config;
use claimfile_enrich::{
    CompletionBackend, FormFetcher, HttpFormFetcher, OpenAiBackend, PlacesClient,
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

pub mod error;
pub mod logging;
mod routes;
pub mod template;

// ── AppState ──────────────────────────────────────────────────────────────

pub struct AppState {
    pub config: Config,
    pub places: PlacesClient,
    pub completion: Arc<dyn CompletionBackend>,
    pub forms: Arc<dyn FormFetcher>,
}

impl AppState {
    /// Production wiring: Google Places, OpenAI and courts.ca.gov over HTTP.
    pub fn from_config(config: Config) -> Self {
        let places = PlacesClient::new(&config.google_places_api_key, &config.places_base_url);
        let completion = Arc::new(OpenAiBackend::new(
            &config.openai_api_key,
            &config.openai_base_url,
            &config.openai_model,
        ));
        Self {
            config,
            places,
            completion,
            forms: Arc::new(HttpFormFetcher::new()),
        }
    }
}

// ── Router ────────────────────────────────────────────────────────────────

pub fn build_router(state: Arc<AppState>) -> Router {
    let static_dir = state.config.static_dir.clone();

    let mut app = Router::new()
        // Health
        .route("/api/health", get(routes::health))
        // Forms catalog
        .route(
            "/api/fetch-forms",
            get(routes::list_forms).post(routes::fetch_form),
        )
        // Submission
        .route("/api/submit-form", post(routes::submit_form))
        // Enrichment
        .route("/api/autocomplete-address", post(routes::autocomplete_address))
        .route("/api/fetch-business-info", post(routes::fetch_business_info))
        .route("/api/generate-court-info", post(routes::generate_court_info))
        .route("/api/generate-jurisdiction", post(routes::generate_jurisdiction))
        .route("/api/generate-legal-text", post(routes::generate_legal_text))
        .route(
            "/api/generate-presuit-demand",
            post(routes::generate_presuit_demand),
        );

    // Client UI build
    if !static_dir.is_empty() {
        let serve_dir = ServeDir::new(&static_dir)
            .fallback(ServeFile::new(format!("{static_dir}/index.html")));
        app = app.fallback_service(serve_dir);
    }

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
