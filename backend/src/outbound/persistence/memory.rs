//! In-memory repository adapters.
//!
//! Used by the test suite and by local development when no database URL is
//! configured. Behaviour mirrors the Diesel adapters, including the guarded
//! status transition, so tests exercise the same contract the production
//! store enforces.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{
    TradeOfferPersistenceError, TradeOfferRepository, UserPersistenceError, UserRepository,
};
use crate::domain::{SteamId, TradeOffer, TradeOfferId, User, UserId};

fn poisoned<E>(_: E) -> String {
    "store lock poisoned".to_owned()
}

/// Hash-map backed `UserRepository`.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let users = self
            .users
            .lock()
            .map_err(|e| UserPersistenceError::connection(poisoned(e)))?;
        Ok(users.get(id.as_str()).cloned())
    }

    async fn find_by_steam_id(
        &self,
        steam_id: &SteamId,
    ) -> Result<Option<User>, UserPersistenceError> {
        let users = self
            .users
            .lock()
            .map_err(|e| UserPersistenceError::connection(poisoned(e)))?;
        Ok(users
            .values()
            .find(|user| user.steam_id() == steam_id)
            .cloned())
    }

    async fn create_new(
        &self,
        steam_id: SteamId,
        username: &str,
        avatar: &str,
    ) -> Result<User, UserPersistenceError> {
        let user = User::create(UserId::random(), steam_id, username, avatar)
            .map_err(|err| UserPersistenceError::query(format!("invalid user fields: {err}")))?;
        let mut users = self
            .users
            .lock()
            .map_err(|e| UserPersistenceError::connection(poisoned(e)))?;
        users.insert(user.id().as_str().to_owned(), user.clone());
        Ok(user)
    }

    async fn save(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self
            .users
            .lock()
            .map_err(|e| UserPersistenceError::connection(poisoned(e)))?;
        users.insert(user.id().as_str().to_owned(), user.clone());
        Ok(())
    }

    async fn exists(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let users = self
            .users
            .lock()
            .map_err(|e| UserPersistenceError::connection(poisoned(e)))?;
        Ok(users.contains_key(id.as_str()))
    }
}

/// Hash-map backed `TradeOfferRepository` with the same guarded transition
/// semantics as the Diesel adapter.
#[derive(Default)]
pub struct InMemoryTradeOfferRepository {
    offers: Mutex<HashMap<String, TradeOffer>>,
}

impl InMemoryTradeOfferRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TradeOfferRepository for InMemoryTradeOfferRepository {
    async fn find_by_id(
        &self,
        id: &TradeOfferId,
    ) -> Result<Option<TradeOffer>, TradeOfferPersistenceError> {
        let offers = self
            .offers
            .lock()
            .map_err(|e| TradeOfferPersistenceError::connection(poisoned(e)))?;
        Ok(offers.get(id.as_str()).cloned())
    }

    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<TradeOffer>, TradeOfferPersistenceError> {
        let offers = self
            .offers
            .lock()
            .map_err(|e| TradeOfferPersistenceError::connection(poisoned(e)))?;
        let mut matching: Vec<TradeOffer> = offers
            .values()
            .filter(|offer| offer.is_owned_by(user_id))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(matching)
    }

    async fn save(&self, offer: &TradeOffer) -> Result<(), TradeOfferPersistenceError> {
        let mut offers = self
            .offers
            .lock()
            .map_err(|e| TradeOfferPersistenceError::connection(poisoned(e)))?;
        if let Some(stored) = offers.get(offer.id().as_str()) {
            // Same compare-and-swap the SQL adapter runs: updates only land
            // on offers still pending.
            if !stored.status().can_be_modified() {
                return Err(TradeOfferPersistenceError::stale_transition(
                    offer.id().as_str(),
                ));
            }
        }
        offers.insert(offer.id().as_str().to_owned(), offer.clone());
        Ok(())
    }

    async fn delete(&self, id: &TradeOfferId) -> Result<(), TradeOfferPersistenceError> {
        let mut offers = self
            .offers
            .lock()
            .map_err(|e| TradeOfferPersistenceError::connection(poisoned(e)))?;
        offers.remove(id.as_str());
        Ok(())
    }
}
