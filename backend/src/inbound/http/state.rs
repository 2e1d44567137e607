//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AuthUseCase, InventoryUseCase, TokenService, TradeOfferUseCase, UsersQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Login flow and current-user resolution.
    pub auth: Arc<dyn AuthUseCase>,
    /// Public user lookups.
    pub users: Arc<dyn UsersQuery>,
    /// Inventory reads.
    pub inventory: Arc<dyn InventoryUseCase>,
    /// Trade offer lifecycle.
    pub trade_offers: Arc<dyn TradeOfferUseCase>,
    /// Credential verification for the bearer extractor.
    pub tokens: Arc<dyn TokenService>,
}
