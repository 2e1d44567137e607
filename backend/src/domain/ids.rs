//! Opaque identifier value objects.
//!
//! Each wrapper enforces a non-empty, non-whitespace value at construction so
//! downstream code never has to re-check "empty id". Equality and display are
//! pure functions of the held string.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValidationError;

/// Stable application-side user identifier.
///
/// ## Invariants
/// - The wrapped string is non-empty once trimmed of whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::empty("userId"));
        }
        Ok(Self(value))
    }

    /// Generate a fresh random identifier (UUID v4).
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Borrow the underlying value.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Steam64 account identifier as reported by the identity provider.
///
/// Construction only requires the value to be non-empty; the strict 17-digit
/// format check lives in [`SteamId::from_steam64`] and runs at the identity
/// boundary where raw provider input first enters the system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SteamId(String);

impl SteamId {
    /// Validate and construct a [`SteamId`] from an already-trusted value.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::empty("steamId"));
        }
        Ok(Self(value))
    }

    /// Construct from raw provider input, enforcing the Steam64 format.
    ///
    /// Steam64 ids are exactly 17 ASCII digits. Surrounding whitespace is
    /// stripped before validation.
    pub fn from_steam64(value: &str) -> Result<Self, ValidationError> {
        let cleaned = value.trim();
        if cleaned.len() == 17 && cleaned.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(cleaned.to_owned()))
        } else {
            Err(ValidationError::MalformedSteamId {
                value: value.to_owned(),
            })
        }
    }

    /// Borrow the underlying value.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for SteamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for SteamId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<SteamId> for String {
    fn from(value: SteamId) -> Self {
        value.0
    }
}

impl TryFrom<String> for SteamId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Identifier of a trade offer aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TradeOfferId(String);

impl TradeOfferId {
    /// Validate and construct a [`TradeOfferId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::empty("tradeOfferId"));
        }
        Ok(Self(value))
    }

    /// Generate a fresh random identifier (UUID v4).
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Borrow the underlying value.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TradeOfferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for TradeOfferId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<TradeOfferId> for String {
    fn from(value: TradeOfferId) -> Self {
        value.0
    }
}

impl TryFrom<String> for TradeOfferId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("76561198000000001")]
    #[case("u-42")]
    fn ids_round_trip_their_value(#[case] value: &str) {
        let user = UserId::new(value).expect("valid user id");
        let steam = SteamId::new(value).expect("valid steam id");
        let offer = TradeOfferId::new(value).expect("valid trade offer id");
        assert_eq!(user.as_str(), value);
        assert_eq!(steam.as_str(), value);
        assert_eq!(offer.to_string(), value);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn blank_ids_are_rejected(#[case] value: &str) {
        assert_eq!(
            UserId::new(value).expect_err("blank rejected"),
            ValidationError::empty("userId")
        );
        assert_eq!(
            SteamId::new(value).expect_err("blank rejected"),
            ValidationError::empty("steamId")
        );
        assert_eq!(
            TradeOfferId::new(value).expect_err("blank rejected"),
            ValidationError::empty("tradeOfferId")
        );
    }

    #[rstest]
    fn random_ids_are_distinct() {
        assert_ne!(UserId::random(), UserId::random());
        assert_ne!(TradeOfferId::random(), TradeOfferId::random());
    }

    #[rstest]
    #[case("76561198012345678", true)]
    #[case("  76561198012345678  ", true)]
    #[case("7656119801234567", false)]
    #[case("765611980123456789", false)]
    #[case("76561198O12345678", false)]
    #[case("not-a-steam-id", false)]
    fn steam64_format_is_enforced(#[case] value: &str, #[case] ok: bool) {
        let result = SteamId::from_steam64(value);
        assert_eq!(result.is_ok(), ok, "value: {value:?}");
        if let Ok(id) = result {
            assert_eq!(id.as_str(), value.trim());
        }
    }

    #[rstest]
    fn equality_is_value_based() {
        let a = UserId::new("same").expect("valid");
        let b = UserId::new("same").expect("valid");
        let c = UserId::new("other").expect("valid");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
