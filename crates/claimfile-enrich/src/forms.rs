use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::{check_status, EnrichError};

const USER_AGENT: &str = "Mozilla/5.0 (compatible; ClaimFiler/1.0)";

/// Downloads blank court forms.
#[async_trait]
pub trait FormFetcher: Send + Sync {
    async fn fetch_pdf(&self, url: &str) -> Result<Vec<u8>, EnrichError>;
}

pub struct HttpFormFetcher {
    http: reqwest::Client,
}

impl HttpFormFetcher {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }
}

impl Default for HttpFormFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FormFetcher for HttpFormFetcher {
    async fn fetch_pdf(&self, url: &str) -> Result<Vec<u8>, EnrichError> {
        info!(url, "fetching form PDF");
        let response = self
            .http
            .get(url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(reqwest::header::ACCEPT, "application/pdf")
            .send()
            .await?;
        let bytes = check_status(response, "forms").await?.bytes().await?;

        // Court sites answer some missing forms with an HTML page and a 200.
        if !bytes.starts_with(b"%PDF-") {
            warn!(url, len = bytes.len(), "download is not a PDF");
            return Err(EnrichError::invalid_response(format!(
                "{url} did not return a PDF"
            )));
        }
        info!(url, len = bytes.len(), "fetched form PDF");
        Ok(bytes.to_vec())
    }
}
