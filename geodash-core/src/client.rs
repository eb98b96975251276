//! HTTP client for the statistics endpoint and WMS image downloads.
//!
//! Compiles for both native and `wasm32` targets; `reqwest` uses the browser
//! fetch API on the latter.

use crate::error::FetchError;
use crate::stats::{Reducer, ReducerResponse, StatsRequest};
use log::{debug, info, warn};
use reqwest::Client;

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    stats_base_url: String,
}

fn transport(err: reqwest::Error) -> FetchError {
    FetchError::Transport(err.to_string())
}

impl HttpClient {
    pub fn new(stats_base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), stats_base_url)
    }

    pub fn with_client(client: Client, stats_base_url: impl Into<String>) -> Self {
        Self {
            client,
            stats_base_url: stats_base_url.into(),
        }
    }

    pub fn stats_base_url(&self) -> &str {
        &self.stats_base_url
    }

    /// `GET <base>/<reducer>` and decode the per-layer series.
    pub async fn fetch_reducer(
        &self,
        reducer: Reducer,
        request: &StatsRequest,
    ) -> Result<ReducerResponse, FetchError> {
        let url = StatsRequest::endpoint(&self.stats_base_url, reducer);
        info!("Requesting {} statistics from {}", reducer, url);

        let response = self
            .client
            .get(&url)
            .query(&request.query_pairs())
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            warn!("Bad response status for {}: {}", url, status);
            return Err(FetchError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response
            .json::<ReducerResponse>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;
        debug!("{} returned {} layer(s)", url, body.len());
        Ok(body)
    }

    /// Download a rendered image.
    pub async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        info!("Downloading image from {}", url);
        let response = self.client.get(url).send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            warn!("Bad response status for image {}: {}", url, status);
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response.bytes().await.map_err(transport)?;
        debug!("Downloaded {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }
}
