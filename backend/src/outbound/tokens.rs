//! JWT-backed credential adapter.
//!
//! Issues HS256 tokens binding the user id and Steam account, verified on
//! every authenticated request. Tokens are self-contained; there is no
//! server-side session to invalidate.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{TokenClaims, TokenError, TokenService};
use crate::domain::{SteamId, User, UserId};

/// Default credential lifetime.
const DEFAULT_TTL_DAYS: i64 = 7;

/// Serialized JWT claims.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject: the application user id.
    sub: String,
    /// Steam account bound to the credential.
    steam_id: String,
    /// Issued-at, seconds since the epoch.
    iat: i64,
    /// Expiry, seconds since the epoch.
    exp: i64,
}

/// HS256 token service implementing the credential port.
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtTokenService {
    /// Create a service with the default seven-day lifetime.
    pub fn new(secret: &[u8]) -> Self {
        Self::with_ttl(secret, Duration::days(DEFAULT_TTL_DAYS))
    }

    /// Create a service with an explicit credential lifetime.
    pub fn with_ttl(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user: &User) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id().to_string(),
            steam_id: user.steam_id().to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|err| TokenError::signing(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|_| TokenError::InvalidCredential)?;
        // A decoded token can still carry ids the domain rejects; treat that
        // the same as tampering.
        let user_id = UserId::new(data.claims.sub).map_err(|_| TokenError::InvalidCredential)?;
        let steam_id =
            SteamId::new(data.claims.steam_id).map_err(|_| TokenError::InvalidCredential)?;
        Ok(TokenClaims { user_id, steam_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const SECRET: &[u8] = b"test-secret";

    fn user() -> User {
        User::create(
            UserId::random(),
            SteamId::from_steam64("76561198012345678").expect("valid steam id"),
            "gaben",
            "",
        )
        .expect("valid user")
    }

    #[rstest]
    fn issued_tokens_verify_to_the_same_identity() {
        let service = JwtTokenService::new(SECRET);
        let user = user();

        let token = service.issue(&user).expect("issue succeeds");
        let claims = service.verify(&token).expect("verify succeeds");

        assert_eq!(&claims.user_id, user.id());
        assert_eq!(&claims.steam_id, user.steam_id());
    }

    #[rstest]
    fn tampered_tokens_are_rejected() {
        let service = JwtTokenService::new(SECRET);
        let mut token = service.issue(&user()).expect("issue succeeds");
        token.push('x');

        let err = service.verify(&token).expect_err("tampered token must fail");
        assert_eq!(err, TokenError::InvalidCredential);
    }

    #[rstest]
    fn tokens_signed_with_another_secret_are_rejected() {
        let issuer = JwtTokenService::new(b"other-secret");
        let verifier = JwtTokenService::new(SECRET);
        let token = issuer.issue(&user()).expect("issue succeeds");

        let err = verifier.verify(&token).expect_err("foreign token must fail");
        assert_eq!(err, TokenError::InvalidCredential);
    }

    #[rstest]
    fn expired_tokens_are_rejected() {
        // Past the default validation leeway.
        let service = JwtTokenService::with_ttl(SECRET, Duration::seconds(-120));
        let token = service.issue(&user()).expect("issue succeeds");

        let err = service.verify(&token).expect_err("expired token must fail");
        assert_eq!(err, TokenError::InvalidCredential);
    }
}
