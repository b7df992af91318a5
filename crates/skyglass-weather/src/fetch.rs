//! HTTP GET with a fixed timeout. Every failure is logged here and collapsed
//! into `None`; callers cannot tell "not found" from "network down".

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use skyglass_core::{NetworkError, ReqwestErrorExt};
use std::sync::Arc;
use std::time::Duration;

pub const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = concat!("skyglass/", env!("CARGO_PKG_VERSION"));

/// Query parameters for a single request
pub type QueryParams<'a> = [(&'a str, String)];

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Arc<Client>,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, NetworkError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(ReqwestErrorExt::into_network_error)?;

        Ok(Self {
            client: Arc::new(client),
        })
    }

    pub fn with_default_timeout() -> Result<Self, NetworkError> {
        Self::new(Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    /// GET `url` with `params` and return the JSON body, or `None` on any failure.
    pub async fn fetch(&self, url: &str, params: &QueryParams<'_>) -> Option<Value> {
        match self.try_fetch(url, params).await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::warn!(%url, "Request failed: {}", e);
                None
            }
        }
    }

    async fn try_fetch(&self, url: &str, params: &QueryParams<'_>) -> Result<Value, NetworkError> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(ReqwestErrorExt::into_network_error)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(NetworkError::ServerError {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| NetworkError::InvalidResponse(e.to_string()))
    }
}

/// Decode a fetched body into a wire type. Shape mismatches count as "no data".
pub(crate) fn decode<T: DeserializeOwned>(body: Value, what: &str) -> Option<T> {
    match serde_json::from_value(body) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::debug!("Unusable {} response: {}", what, e);
            None
        }
    }
}
