//! Inventory orchestration.
//!
//! Validates the request, asks the provider for the raw inventory, and keeps
//! only what users may actually trade. Upstream failure classes are mapped
//! onto the shared error taxonomy so the HTTP layer answers with specific
//! statuses instead of a generic 500.

use std::sync::Arc;

use async_trait::async_trait;

use super::error::{Error, ValidationError};
use super::ids::SteamId;
use super::inventory::{tradable_only, InventoryItem};
use super::ports::{InventoryProvider, InventoryProviderError, InventoryUseCase};

/// Counter-Strike 2, the app the original product trades in.
pub const DEFAULT_APP_ID: i32 = 730;
/// Steam community inventory context for tradable items.
pub const DEFAULT_CONTEXT_ID: i32 = 2;

/// Inventory read service implementing the driving port.
#[derive(Clone)]
pub struct InventoryService<P> {
    provider: Arc<P>,
}

impl<P> InventoryService<P> {
    /// Create a new service with the given provider.
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }
}

fn map_provider_error(error: InventoryProviderError) -> Error {
    match error {
        InventoryProviderError::InvalidRequest { .. } => Error::invalid_request(error.to_string()),
        InventoryProviderError::PrivateInventory => Error::forbidden(error.to_string()),
        InventoryProviderError::NotFound => Error::not_found(error.to_string()),
        InventoryProviderError::RateLimited => Error::rate_limited(error.to_string()),
        InventoryProviderError::Unavailable { .. } => Error::service_unavailable(error.to_string()),
        InventoryProviderError::Malformed { message } => {
            Error::internal(format!("malformed inventory response: {message}"))
        }
    }
}

#[async_trait]
impl<P> InventoryUseCase for InventoryService<P>
where
    P: InventoryProvider,
{
    async fn tradable_inventory(
        &self,
        steam_id: &str,
        app_id: Option<i32>,
        context_id: Option<i32>,
    ) -> Result<Vec<InventoryItem>, Error> {
        let steam_id = SteamId::from_steam64(steam_id).map_err(Error::from)?;

        let app_id = app_id.unwrap_or(DEFAULT_APP_ID);
        if app_id <= 0 {
            return Err(ValidationError::not_positive("appId").into());
        }
        let context_id = context_id.unwrap_or(DEFAULT_CONTEXT_ID);
        if context_id < 0 {
            return Err(Error::invalid_request("contextId must not be negative"));
        }

        let items = self
            .provider
            .fetch(&steam_id, app_id, context_id)
            .await
            .map_err(map_provider_error)?;

        Ok(tradable_only(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockInventoryProvider;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    const STEAM64: &str = "76561198012345678";

    fn item(asset_id: &str, tradable: Option<i32>) -> InventoryItem {
        InventoryItem {
            asset_id: asset_id.to_owned(),
            class_id: "c".to_owned(),
            instance_id: "i".to_owned(),
            amount: "1".to_owned(),
            app_id: DEFAULT_APP_ID,
            context_id: "2".to_owned(),
            icon_url: None,
            icon_url_large: None,
            name: None,
            market_hash_name: None,
            tradable,
            marketable: None,
        }
    }

    fn service(provider: MockInventoryProvider) -> InventoryService<MockInventoryProvider> {
        InventoryService::new(Arc::new(provider))
    }

    #[tokio::test]
    async fn defaults_are_applied_and_untradable_items_dropped() {
        let mut provider = MockInventoryProvider::new();
        provider
            .expect_fetch()
            .withf(|steam_id, app_id, context_id| {
                steam_id.as_str() == STEAM64
                    && *app_id == DEFAULT_APP_ID
                    && *context_id == DEFAULT_CONTEXT_ID
            })
            .times(1)
            .return_once(|_, _, _| {
                Ok(vec![
                    item("1", Some(1)),
                    item("2", Some(0)),
                    item("3", Some(1)),
                    item("4", None),
                    item("5", Some(1)),
                ])
            });

        let items = service(provider)
            .tradable_inventory(STEAM64, None, None)
            .await
            .expect("fetch succeeds");

        let ids: Vec<&str> = items.iter().map(|i| i.asset_id.as_str()).collect();
        assert_eq!(ids, ["1", "3", "5"]);
    }

    #[tokio::test]
    async fn malformed_steam_ids_are_rejected_before_the_provider_runs() {
        let mut provider = MockInventoryProvider::new();
        provider.expect_fetch().times(0);

        let err = service(provider)
            .tradable_inventory("abc", None, None)
            .await
            .expect_err("malformed id must fail");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn non_positive_app_ids_are_rejected() {
        let mut provider = MockInventoryProvider::new();
        provider.expect_fetch().times(0);

        let err = service(provider)
            .tradable_inventory(STEAM64, Some(0), None)
            .await
            .expect_err("bad app id must fail");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[case(InventoryProviderError::PrivateInventory, ErrorCode::Forbidden)]
    #[case(InventoryProviderError::NotFound, ErrorCode::NotFound)]
    #[case(InventoryProviderError::RateLimited, ErrorCode::RateLimited)]
    #[case(
        InventoryProviderError::unavailable("timeout"),
        ErrorCode::ServiceUnavailable
    )]
    #[case(
        InventoryProviderError::invalid_request("bad params"),
        ErrorCode::InvalidRequest
    )]
    #[case(InventoryProviderError::malformed("not json"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn provider_failures_map_to_specific_codes(
        #[case] failure: InventoryProviderError,
        #[case] expected: ErrorCode,
    ) {
        let mut provider = MockInventoryProvider::new();
        provider
            .expect_fetch()
            .times(1)
            .return_once(move |_, _, _| Err(failure));

        let err = service(provider)
            .tradable_inventory(STEAM64, None, None)
            .await
            .expect_err("provider failure must surface");
        assert_eq!(err.code(), expected);
    }
}
