use crate::models::DataSource;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

const RELAY_BASE: &str = "https://api.allorigins.win/get?url=";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("export request returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("relay response is missing the contents field")]
    MissingContents,
}

/// JSON envelope returned by the CORS relay.
#[derive(Debug, Deserialize)]
struct RelayEnvelope {
    contents: Option<String>,
}

pub fn export_url(sheet_id: &str) -> String {
    format!("https://docs.google.com/spreadsheets/d/{sheet_id}/export?format=csv&gid=0")
}

pub fn relay_url(export_url: &str) -> String {
    format!("{RELAY_BASE}{}", urlencoding::encode(export_url))
}

/// Pulls the CSV text out of a relay envelope body.
pub fn relay_contents(body: &str) -> Result<String, FetchError> {
    let envelope: RelayEnvelope =
        serde_json::from_str(body).map_err(|_| FetchError::MissingContents)?;
    envelope.contents.ok_or(FetchError::MissingContents)
}

pub struct Fetcher {
    client: reqwest::Client,
    export_url: String,
    relay_url: String,
}

impl Fetcher {
    pub fn new(sheet_id: &str) -> Self {
        let export_url = export_url(sheet_id);
        let relay_url = relay_url(&export_url);
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            export_url,
            relay_url,
        }
    }

    /// One direct attempt, then one relay attempt. No retries, no backoff.
    pub async fn fetch_csv(&self) -> Result<(String, DataSource), FetchError> {
        match self.fetch_direct().await {
            Ok(text) => {
                info!("sheet export fetched directly");
                Ok((text, DataSource::Live))
            }
            Err(err) => {
                warn!("direct fetch failed, trying relay: {err}");
                let text = self.fetch_via_relay().await?;
                info!("sheet export fetched via relay");
                Ok((text, DataSource::Proxy))
            }
        }
    }

    async fn fetch_direct(&self) -> Result<String, FetchError> {
        let response = self.client.get(&self.export_url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }
        Ok(response.text().await?)
    }

    async fn fetch_via_relay(&self) -> Result<String, FetchError> {
        let response = self.client.get(&self.relay_url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }
        let body = response.text().await?;
        relay_contents(&body)
    }
}
