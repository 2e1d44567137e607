//! Domain primitives, aggregates, and application services.
//!
//! Purpose: keep every trading rule in transport-agnostic types. Value
//! objects validate on construction so "empty id" and "malformed item" are
//! unrepresentable downstream; the [`TradeOffer`] aggregate owns its
//! authorization and state-machine rules; services orchestrate repositories
//! and adapters through the ports in [`ports`].

pub mod auth_service;
pub mod error;
pub mod ids;
pub mod inventory;
pub mod inventory_service;
pub mod ports;
pub mod trade_offer;
pub mod trade_offer_item;
pub mod trade_offer_service;
pub mod trade_offer_status;
pub mod user;

pub use self::auth_service::AuthService;
pub use self::error::{Error, ErrorCode, ValidationError, TRACE_ID_HEADER};
pub use self::ids::{SteamId, TradeOfferId, UserId};
pub use self::inventory::InventoryItem;
pub use self::inventory_service::InventoryService;
pub use self::trade_offer::{Party, TradeOffer, TradeOfferAction, TradeOfferError};
pub use self::trade_offer_item::TradeOfferItem;
pub use self::trade_offer_service::TradeOfferService;
pub use self::trade_offer_status::TradeOfferStatus;
pub use self::user::User;

/// Convenient result alias for domain operations.
pub type DomainResult<T> = Result<T, Error>;
