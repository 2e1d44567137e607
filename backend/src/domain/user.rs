//! User entity.

use chrono::{DateTime, Utc};

use super::error::ValidationError;
use super::ids::{SteamId, UserId};

/// A registered user bound to one Steam account.
///
/// ## Invariants
/// - `username` is trimmed and never empty.
/// - `id` and `steam_id` never change after creation.
/// - `updated_at` is bumped on every successful mutation.
///
/// Created once per distinct Steam account on first login; the profile is
/// refreshed on every subsequent login. Users are never deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    steam_id: SteamId,
    username: String,
    avatar: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user, validating the profile fields.
    ///
    /// The avatar may be empty; the username may not.
    pub fn create(
        id: UserId,
        steam_id: SteamId,
        username: &str,
        avatar: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ValidationError::empty("username"));
        }
        let now = Utc::now();
        Ok(Self {
            id,
            steam_id,
            username: username.to_owned(),
            avatar: avatar.into(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuild a user from previously-validated persisted state.
    ///
    /// No validation runs; the store is trusted to hold data that satisfied
    /// the invariants when written.
    pub fn reconstitute(
        id: UserId,
        steam_id: SteamId,
        username: String,
        avatar: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            steam_id,
            username,
            avatar,
            created_at,
            updated_at,
        }
    }

    /// Replace the profile fields, re-validating the username.
    ///
    /// On failure the entity is untouched, including `updated_at`.
    pub fn update_profile(
        &mut self,
        username: &str,
        avatar: impl Into<String>,
    ) -> Result<(), ValidationError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ValidationError::empty("username"));
        }
        self.username = username.to_owned();
        self.avatar = avatar.into();
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Stable application-side identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Steam account this user authenticated with.
    pub fn steam_id(&self) -> &SteamId {
        &self.steam_id
    }

    /// Display name shown to other users.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Avatar URL; empty when the provider supplied none.
    pub fn avatar(&self) -> &str {
        self.avatar.as_str()
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Timestamp of the most recent mutation.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
