//! Domain ports defining the edges of the hexagon.
//!
//! Driven ports describe how the domain reaches outward (persistence, the
//! Steam inventory endpoint, credential signing); driving ports describe the
//! use-cases inbound adapters call. Each trait exposes strongly typed errors
//! so adapters map their failures into predictable variants instead of
//! returning `anyhow::Result`.

use async_trait::async_trait;
use thiserror::Error as ThisError;

use super::error::Error;
use super::ids::{SteamId, TradeOfferId, UserId};
use super::inventory::InventoryItem;
use super::trade_offer::TradeOffer;
use super::user::User;

/// Persistence errors raised by [`UserRepository`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum UserPersistenceError {
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query { message: String },
}

impl UserPersistenceError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Persistence errors raised by [`TradeOfferRepository`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum TradeOfferPersistenceError {
    /// Repository connection could not be established.
    #[error("trade offer repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("trade offer repository query failed: {message}")]
    Query { message: String },
    /// A status update found the persisted offer no longer pending.
    ///
    /// Raised by the guarded transition write; two racing resolutions of the
    /// same offer settle to exactly one winner.
    #[error("trade offer {id} was settled by a concurrent update")]
    StaleTransition { id: String },
}

impl TradeOfferPersistenceError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Helper for lost transition races.
    pub fn stale_transition(id: impl Into<String>) -> Self {
        Self::StaleTransition { id: id.into() }
    }
}

/// Failures surfaced by the inventory provider, classified per upstream
/// condition so the HTTP layer can answer with a specific status.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum InventoryProviderError {
    /// The provider rejected the request as malformed.
    #[error("invalid inventory request: {message}")]
    InvalidRequest { message: String },
    /// The inventory is private or access was denied.
    #[error("inventory is private or access denied")]
    PrivateInventory,
    /// The account or inventory does not exist.
    #[error("user not found or inventory does not exist")]
    NotFound,
    /// The provider throttled the request.
    #[error("rate limit exceeded, try again later")]
    RateLimited,
    /// The provider is unreachable or timing out.
    #[error("steam is temporarily unavailable: {message}")]
    Unavailable { message: String },
    /// The response body could not be understood.
    #[error("malformed inventory response: {message}")]
    Malformed { message: String },
}

impl InventoryProviderError {
    /// Helper for malformed-request rejections.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Helper for provider outages and timeouts.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Helper for undecodable responses.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}

/// Failures raised by the credential adapter.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum TokenError {
    /// The token is missing, tampered with, or expired.
    #[error("invalid or expired credential")]
    InvalidCredential,
    /// The credential could not be produced.
    #[error("failed to sign credential: {message}")]
    Signing { message: String },
}

impl TokenError {
    /// Helper for signing failures.
    pub fn signing(message: impl Into<String>) -> Self {
        Self::Signing {
            message: message.into(),
        }
    }
}

/// Identity claims recovered from a verified credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// Application-side user identifier the credential was issued for.
    pub user_id: UserId,
    /// Steam account bound to the credential.
    pub steam_id: SteamId,
}

/// Persistence port for user entities.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by application identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by Steam account.
    async fn find_by_steam_id(
        &self,
        steam_id: &SteamId,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Create a user for a first-seen Steam account. Identifier generation is
    /// the adapter's responsibility.
    async fn create_new(
        &self,
        steam_id: SteamId,
        username: &str,
        avatar: &str,
    ) -> Result<User, UserPersistenceError>;

    /// Insert or update a user record keyed by its identifier.
    async fn save(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Whether a user with this identifier exists.
    async fn exists(&self, id: &UserId) -> Result<bool, UserPersistenceError>;
}

/// Persistence port for trade offer aggregates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TradeOfferRepository: Send + Sync {
    /// Fetch an offer by identifier.
    async fn find_by_id(
        &self,
        id: &TradeOfferId,
    ) -> Result<Option<TradeOffer>, TradeOfferPersistenceError>;

    /// Fetch every offer where the user is either party, newest first.
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<TradeOffer>, TradeOfferPersistenceError>;

    /// Insert a new offer, or update the status of a persisted one.
    ///
    /// Status updates only apply while the persisted row is still pending;
    /// a lost race surfaces as
    /// [`TradeOfferPersistenceError::StaleTransition`].
    async fn save(&self, offer: &TradeOffer) -> Result<(), TradeOfferPersistenceError>;

    /// Remove an offer. Present at the boundary; no documented flow invokes
    /// it.
    async fn delete(&self, id: &TradeOfferId) -> Result<(), TradeOfferPersistenceError>;
}

/// Outbound port for the Steam Community inventory endpoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryProvider: Send + Sync {
    /// Fetch the full inventory for an account, unfiltered.
    async fn fetch(
        &self,
        steam_id: &SteamId,
        app_id: i32,
        context_id: i32,
    ) -> Result<Vec<InventoryItem>, InventoryProviderError>;
}

/// Outbound port for issuing and verifying signed bearer credentials.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Produce a credential binding the user's identity.
    fn issue(&self, user: &User) -> Result<String, TokenError>;

    /// Verify a credential and recover the identity it binds.
    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError>;
}

/// Normalized identity-provider callback payload.
///
/// Carries the raw Steam64 digits plus whatever profile fields the provider
/// included; the auth service decides the fallbacks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IdentityPayload {
    /// Raw external identifier (expected: 17 decimal digits).
    pub steam_id: String,
    /// Preferred display name.
    pub display_name: Option<String>,
    /// Secondary account name.
    pub username: Option<String>,
    /// Profile photo URLs, largest last.
    pub photos: Vec<String>,
    /// Flat avatar URL some provider payloads carry instead of photos.
    pub avatar: Option<String>,
}

/// Result of a completed login: the resolved user and their credential.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedSession {
    /// The created or refreshed user.
    pub user: User,
    /// Signed bearer token for subsequent requests.
    pub token: String,
}

/// Raw item fields accepted from API clients when creating an offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeItemInput {
    /// Asset identifier within the owner's inventory.
    pub asset_id: String,
    /// Steam application the asset belongs to.
    pub app_id: i32,
    /// Inventory context holding the asset.
    pub context_id: String,
    /// Quantity; `None` means one.
    pub amount: Option<i32>,
}

/// Command describing a new trade offer. The creator is the authenticated
/// actor and is supplied separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTradeOfferCommand {
    /// Recipient of the offer.
    pub to_user_id: String,
    /// Items pledged by the creator.
    pub items_from: Vec<TradeItemInput>,
    /// Items requested from the recipient.
    pub items_to: Vec<TradeItemInput>,
}

/// Driving port for the login flow.
#[async_trait]
pub trait AuthUseCase: Send + Sync {
    /// Resolve an identity-provider callback into a user and credential.
    async fn handle_steam_callback(
        &self,
        payload: IdentityPayload,
    ) -> Result<AuthenticatedSession, Error>;

    /// Resolve verified claims to the current user.
    async fn current_user(&self, claims: &TokenClaims) -> Result<User, Error>;
}

/// Driving port for public user lookups.
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Fetch a user's public profile by Steam account.
    async fn find_by_steam_id(&self, steam_id: &str) -> Result<User, Error>;
}

/// Driving port for the trade offer lifecycle.
#[async_trait]
pub trait TradeOfferUseCase: Send + Sync {
    /// Create an offer from the acting user.
    async fn create(
        &self,
        actor: &UserId,
        command: CreateTradeOfferCommand,
    ) -> Result<TradeOffer, Error>;

    /// List offers where the acting user is either party, newest first.
    async fn list_for_user(&self, actor: &UserId) -> Result<Vec<TradeOffer>, Error>;

    /// Fetch a single offer.
    async fn get(&self, id: &str) -> Result<TradeOffer, Error>;

    /// Accept an offer as the acting user.
    async fn accept(&self, id: &str, actor: &UserId) -> Result<TradeOffer, Error>;

    /// Decline an offer as the acting user.
    async fn decline(&self, id: &str, actor: &UserId) -> Result<TradeOffer, Error>;

    /// Withdraw an offer as the acting user.
    async fn cancel(&self, id: &str, actor: &UserId) -> Result<TradeOffer, Error>;
}

/// Driving port for inventory reads.
#[async_trait]
pub trait InventoryUseCase: Send + Sync {
    /// Fetch the tradable subset of an account's inventory.
    async fn tradable_inventory(
        &self,
        steam_id: &str,
        app_id: Option<i32>,
        context_id: Option<i32>,
    ) -> Result<Vec<InventoryItem>, Error>;
}
