//! Network and clipboard seams used by the panels.
//!
//! With the `api` feature, `geodash_core::client::HttpClient` implements the
//! two network seams.

use geodash_core::error::FetchError;
use geodash_core::stats::{Reducer, ReducerResponse, StatsRequest};

/// One `GET <base>/<reducer>` call against the statistics service.
#[allow(async_fn_in_trait)]
pub trait StatsBackend {
    async fn fetch_reducer(
        &self,
        reducer: Reducer,
        request: &StatsRequest,
    ) -> Result<ReducerResponse, FetchError>;
}

#[allow(async_fn_in_trait)]
pub trait ImageFetcher {
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Where the share action puts the page address.
#[allow(async_fn_in_trait)]
pub trait Clipboard {
    async fn write_text(&self, text: &str) -> Result<(), String>;
}

#[cfg(feature = "api")]
mod http {
    use super::*;
    use geodash_core::client::HttpClient;

    impl StatsBackend for HttpClient {
        async fn fetch_reducer(
            &self,
            reducer: Reducer,
            request: &StatsRequest,
        ) -> Result<ReducerResponse, FetchError> {
            HttpClient::fetch_reducer(self, reducer, request).await
        }
    }

    impl ImageFetcher for HttpClient {
        async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            HttpClient::fetch_image(self, url).await
        }
    }
}
