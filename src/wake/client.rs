// src/wake/client.rs
use std::future::Future;
use std::time::Duration;

use reqwest::{header, redirect};

use crate::utils::error::FetchError;
use crate::wake::models::TabRequest;

const WAKE_USER_AGENT: &str = "wake_extractor/0.1 (public records research)";

/// Default location of the report pages.
pub const DEFAULT_BASE_URL: &str = "https://services.wake.gov/realestate";

/// Anything that can hand back the raw markup of a tab page.
pub trait DocumentSource {
    fn fetch(&self, request: &TabRequest) -> impl Future<Output = Result<String, FetchError>>;
}

/// Fetches tab pages from the county report site.
pub struct WakeClient {
    http: reqwest::Client,
    base_url: String,
    delay: Duration,
}

impl WakeClient {
    pub fn new(base_url: &str, delay: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(WAKE_USER_AGENT)
            // The "Object Moved" placeholder lives in the redirect body; keep it.
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.to_string(),
            delay,
        })
    }
}

impl DocumentSource for WakeClient {
    async fn fetch(&self, request: &TabRequest) -> Result<String, FetchError> {
        let url = request.url(&self.base_url);
        tracing::debug!("Downloading {} page from: {}", request.tab, url);

        // --- Basic Rate Limiting ---
        tokio::time::sleep(self.delay).await;

        let response = self
            .http
            .get(&url)
            .header(header::ACCEPT, "text/html,*/*")
            .send()
            .await?; // Propagates reqwest::Error as FetchError::Network

        let status = response.status();
        if !status.is_success() && !status.is_redirection() {
            tracing::error!("HTTP error status: {} for URL: {}", status, url);
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(FetchError::NotFound(url));
            }
            return Err(FetchError::Http(status));
        }

        let body = response.text().await?;
        tracing::debug!("Downloaded {} bytes from {} ({})", body.len(), url, status);

        Ok(body)
    }
}
