//! Reqwest-backed Steam Community inventory adapter.
//!
//! Owns transport details only: request construction, timeout and HTTP
//! status mapping, and JSON decoding into domain inventory items. Steam's
//! upstream failure modes (private inventory, throttling, outages) are
//! classified into [`InventoryProviderError`] variants so the service layer
//! never inspects status codes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::domain::ports::{InventoryProvider, InventoryProviderError};
use crate::domain::{InventoryItem, SteamId};

use super::dto::InventoryResponseDto;

/// Public Steam Community endpoint.
pub const DEFAULT_STEAM_BASE_URL: &str = "https://steamcommunity.com";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_USER_AGENT: &str = "steam-trade-backend/0.1";
/// Page size requested from Steam; the product never paginates beyond it.
const INVENTORY_COUNT: u32 = 5000;

/// Inventory adapter performing GET requests against one base URL.
pub struct SteamInventoryClient {
    client: Client,
    base_url: String,
}

impl SteamInventoryClient {
    /// Build an adapter against the public Steam endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_base_url(DEFAULT_STEAM_BASE_URL)
    }

    /// Build an adapter against an explicit base URL (tests, proxies).
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        })
    }
}

fn map_transport_error(error: reqwest::Error) -> InventoryProviderError {
    if error.is_timeout() {
        InventoryProviderError::unavailable("request timed out")
    } else {
        InventoryProviderError::unavailable(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &str) -> InventoryProviderError {
    match status {
        StatusCode::BAD_REQUEST => {
            let message = extract_error_message(body)
                .unwrap_or_else(|| "invalid request to steam".to_owned());
            InventoryProviderError::invalid_request(message)
        }
        StatusCode::FORBIDDEN => InventoryProviderError::PrivateInventory,
        StatusCode::NOT_FOUND => InventoryProviderError::NotFound,
        StatusCode::TOO_MANY_REQUESTS => InventoryProviderError::RateLimited,
        other => InventoryProviderError::unavailable(format!("steam returned {other}")),
    }
}

/// Pull `error` or `message` out of a JSON error body, if there is one.
fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .or_else(|| value.get("message"))
        .and_then(|v| v.as_str())
        .map(str::to_owned)
}

#[async_trait]
impl InventoryProvider for SteamInventoryClient {
    async fn fetch(
        &self,
        steam_id: &SteamId,
        app_id: i32,
        context_id: i32,
    ) -> Result<Vec<InventoryItem>, InventoryProviderError> {
        let url = format!(
            "{base}/inventory/{steam_id}/{app_id}/{context_id}?l=english&count={INVENTORY_COUNT}",
            base = self.base_url,
        );
        debug!(%steam_id, app_id, context_id, "fetching steam inventory");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }

        let decoded: InventoryResponseDto = serde_json::from_str(&body).map_err(|err| {
            InventoryProviderError::malformed(format!("invalid inventory JSON: {err}"))
        })?;
        Ok(decoded.into_items(app_id, context_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(StatusCode::FORBIDDEN, InventoryProviderError::PrivateInventory)]
    #[case(StatusCode::NOT_FOUND, InventoryProviderError::NotFound)]
    #[case(StatusCode::TOO_MANY_REQUESTS, InventoryProviderError::RateLimited)]
    fn upstream_statuses_classify(
        #[case] status: StatusCode,
        #[case] expected: InventoryProviderError,
    ) {
        assert_eq!(map_status_error(status, ""), expected);
    }

    #[rstest]
    fn bad_request_surfaces_the_upstream_message() {
        let err = map_status_error(StatusCode::BAD_REQUEST, r#"{"error":"malformed SteamID"}"#);
        assert_eq!(
            err,
            InventoryProviderError::invalid_request("malformed SteamID")
        );
    }

    #[rstest]
    fn bad_request_without_a_message_gets_a_default() {
        let err = map_status_error(StatusCode::BAD_REQUEST, "not json");
        assert_eq!(
            err,
            InventoryProviderError::invalid_request("invalid request to steam")
        );
    }

    #[rstest]
    fn server_errors_are_unavailable() {
        let err = map_status_error(StatusCode::BAD_GATEWAY, "");
        assert!(matches!(err, InventoryProviderError::Unavailable { .. }));
    }

    #[rstest]
    fn base_url_trailing_slashes_are_normalised() {
        let client =
            SteamInventoryClient::with_base_url("http://localhost:9000/").expect("client builds");
        assert_eq!(client.base_url, "http://localhost:9000");
    }
}
