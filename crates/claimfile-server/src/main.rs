use std::sync::Arc;

use claimfile_core::config::Config;
use claimfile_server::{build_router, logging, template, AppState};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    logging::init(&config.log_format);

    if config.google_places_api_key.is_empty() {
        warn!("GOOGLE_PLACES_API_KEY not set; address and business lookup will fail");
    }
    if config.openai_api_key.is_empty() {
        warn!("OPENAI_API_KEY not set; generated court, jurisdiction and legal text will fail");
    }
    template::log_coverage(&config.template_path).await;

    let addr = config.bind_addr();
    let state = Arc::new(AppState::from_config(config));
    let app = build_router(state);

    info!("Listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
