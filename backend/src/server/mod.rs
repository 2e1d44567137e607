//! Application wiring: adapter construction and route registration.

pub mod config;

use std::sync::Arc;

use actix_web::web;
use thiserror::Error;
use tracing::info;

use crate::domain::{AuthService, InventoryService, TradeOfferService};
use crate::inbound::http::{auth, health, inventory, trade_offers, users, HttpState};
use crate::outbound::persistence::{
    DbPool, DieselTradeOfferRepository, DieselUserRepository, InMemoryTradeOfferRepository,
    InMemoryUserRepository, PoolConfig, PoolError,
};
use crate::outbound::steam::SteamInventoryClient;
use crate::outbound::tokens::JwtTokenService;

pub use self::config::{AppConfig, ConfigError};
pub use crate::inbound::http::health::HealthState;

/// Failures while constructing the adapter graph.
#[derive(Debug, Error)]
pub enum StateBuildError {
    /// The database pool could not be built.
    #[error("failed to build database pool: {0}")]
    Pool(#[from] PoolError),
    /// The Steam HTTP client could not be built.
    #[error("failed to build steam client: {0}")]
    Steam(#[from] reqwest::Error),
}

/// Build the handler state from configuration.
///
/// With a database URL the repositories are Diesel-backed; without one the
/// in-memory twins serve local development.
pub async fn build_http_state(config: &AppConfig) -> Result<HttpState, StateBuildError> {
    let tokens = Arc::new(JwtTokenService::new(&config.jwt_secret));
    let steam = Arc::new(SteamInventoryClient::with_base_url(&config.steam_base_url)?);
    let inventory_service = Arc::new(InventoryService::new(steam));

    match &config.database_url {
        Some(url) => {
            let pool = DbPool::new(PoolConfig::new(url)).await?;
            info!("using postgres persistence");
            let user_repo = Arc::new(DieselUserRepository::new(pool.clone()));
            let offer_repo = Arc::new(DieselTradeOfferRepository::new(pool));
            let auth_service = Arc::new(AuthService::new(user_repo.clone(), tokens.clone()));
            let trade_service = Arc::new(TradeOfferService::new(offer_repo, user_repo));
            Ok(HttpState {
                auth: auth_service.clone(),
                users: auth_service,
                inventory: inventory_service,
                trade_offers: trade_service,
                tokens,
            })
        }
        None => {
            let user_repo = Arc::new(InMemoryUserRepository::new());
            let offer_repo = Arc::new(InMemoryTradeOfferRepository::new());
            let auth_service = Arc::new(AuthService::new(user_repo.clone(), tokens.clone()));
            let trade_service = Arc::new(TradeOfferService::new(offer_repo, user_repo));
            Ok(HttpState {
                auth: auth_service.clone(),
                users: auth_service,
                inventory: inventory_service,
                trade_offers: trade_service,
                tokens,
            })
        }
    }
}

/// Register every route and attach the shared state.
pub fn configure(
    cfg: &mut web::ServiceConfig,
    state: web::Data<HttpState>,
    health_state: web::Data<HealthState>,
) {
    cfg.app_data(state)
        .app_data(health_state)
        .service(
            web::scope("/api")
                .service(auth::steam_callback)
                .service(auth::me)
                .service(auth::logout)
                .service(users::user_by_steam_id)
                .service(inventory::get_inventory)
                .service(trade_offers::create_trade_offer)
                .service(trade_offers::list_trade_offers)
                .service(trade_offers::get_trade_offer)
                .service(trade_offers::accept_trade_offer)
                .service(trade_offers::decline_trade_offer)
                .service(trade_offers::cancel_trade_offer),
        )
        .service(health::ready)
        .service(health::live);
}
