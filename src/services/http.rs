//! Shared HTTP plumbing for the upstream clients

use crate::types::{Result, SpotScoutError};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Build the client shared by every upstream call.
///
/// The timeout applies per request, which also bounds each region's share of
/// a global fan-out.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("spotscout/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| SpotScoutError::Config(format!("HTTP client error: {}", e)))
}

/// Send a request and decode a 2xx JSON body.
///
/// Transport failures map to `Network`, non-2xx to `UpstreamStatus` and an
/// undecodable body to `MalformedResponse`.
pub(crate) async fn fetch_json<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T> {
    let response = request.send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(SpotScoutError::UpstreamStatus {
            status: status.as_u16(),
            url: response.url().to_string(),
        });
    }

    let mut body = response.bytes().await?.to_vec();
    simd_json::from_slice(&mut body).map_err(|e| SpotScoutError::MalformedResponse(e.to_string()))
}
