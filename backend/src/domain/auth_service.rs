//! Identity resolution and login orchestration.
//!
//! Implements the driving ports for the login flow: resolve the provider
//! callback into a find-or-create on the user repository, refresh the profile
//! on repeat logins, and hand out a signed credential.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use super::error::Error;
use super::ids::SteamId;
use super::ports::{
    AuthUseCase, AuthenticatedSession, IdentityPayload, TokenClaims, TokenError, TokenService,
    UserPersistenceError, UserRepository, UsersQuery,
};
use super::user::User;

/// Fallback display name when the provider supplies none.
const UNKNOWN_USERNAME: &str = "Unknown";

/// Login service backed by the user repository and the credential adapter.
#[derive(Clone)]
pub struct AuthService<R, T> {
    users: Arc<R>,
    tokens: Arc<T>,
}

impl<R, T> AuthService<R, T> {
    /// Create a new service with the given adapters.
    pub fn new(users: Arc<R>, tokens: Arc<T>) -> Self {
        Self { users, tokens }
    }
}

fn map_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

fn map_token_error(error: TokenError) -> Error {
    match error {
        TokenError::InvalidCredential => Error::unauthorized("invalid or expired credential"),
        TokenError::Signing { message } => {
            Error::internal(format!("failed to issue credential: {message}"))
        }
    }
}

/// First photo, falling back to the flat avatar field, falling back to empty.
fn preferred_avatar(payload: &IdentityPayload) -> String {
    payload
        .photos
        .first()
        .cloned()
        .or_else(|| payload.avatar.clone())
        .unwrap_or_default()
}

/// Display name, falling back to the account name, falling back to `last`.
fn preferred_username(payload: &IdentityPayload, last: &str) -> String {
    payload
        .display_name
        .clone()
        .or_else(|| payload.username.clone())
        .unwrap_or_else(|| last.to_owned())
}

impl<R, T> AuthService<R, T>
where
    R: UserRepository,
    T: TokenService,
{
    async fn resolve_user(&self, payload: &IdentityPayload) -> Result<User, Error> {
        let steam_id = SteamId::from_steam64(&payload.steam_id).map_err(Error::from)?;

        let existing = self
            .users
            .find_by_steam_id(&steam_id)
            .await
            .map_err(map_persistence_error)?;

        let avatar = preferred_avatar(payload);

        match existing {
            None => {
                let username = preferred_username(payload, UNKNOWN_USERNAME);
                info!(steam_id = %steam_id, "first steam login, creating user");
                self.users
                    .create_new(steam_id, &username, &avatar)
                    .await
                    .map_err(map_persistence_error)
            }
            Some(mut user) => {
                let username = preferred_username(payload, user.username());
                let avatar = if avatar.is_empty() {
                    user.avatar().to_owned()
                } else {
                    avatar
                };
                user.update_profile(&username, avatar).map_err(Error::from)?;
                self.users.save(&user).await.map_err(map_persistence_error)?;
                debug!(user_id = %user.id(), "refreshed profile on repeat login");
                Ok(user)
            }
        }
    }
}

#[async_trait]
impl<R, T> AuthUseCase for AuthService<R, T>
where
    R: UserRepository,
    T: TokenService,
{
    async fn handle_steam_callback(
        &self,
        payload: IdentityPayload,
    ) -> Result<AuthenticatedSession, Error> {
        let user = self.resolve_user(&payload).await?;
        let token = self.tokens.issue(&user).map_err(map_token_error)?;
        Ok(AuthenticatedSession { user, token })
    }

    async fn current_user(&self, claims: &TokenClaims) -> Result<User, Error> {
        self.users
            .find_by_id(&claims.user_id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }
}

#[async_trait]
impl<R, T> UsersQuery for AuthService<R, T>
where
    R: UserRepository,
    T: TokenService,
{
    async fn find_by_steam_id(&self, steam_id: &str) -> Result<User, Error> {
        let steam_id = SteamId::new(steam_id).map_err(Error::from)?;
        self.users
            .find_by_steam_id(&steam_id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::UserId;
    use crate::domain::ports::{MockTokenService, MockUserRepository};
    use crate::domain::ErrorCode;

    const STEAM64: &str = "76561198012345678";

    fn payload() -> IdentityPayload {
        IdentityPayload {
            steam_id: STEAM64.to_owned(),
            display_name: Some("Gabe".to_owned()),
            username: Some("gaben".to_owned()),
            photos: vec!["http://a/p0.jpg".to_owned(), "http://a/p1.jpg".to_owned()],
            avatar: None,
        }
    }

    fn stored_user() -> User {
        User::create(
            UserId::random(),
            SteamId::from_steam64(STEAM64).expect("valid steam id"),
            "oldname",
            "http://a/old.jpg",
        )
        .expect("valid user")
    }

    fn service(
        users: MockUserRepository,
        tokens: MockTokenService,
    ) -> AuthService<MockUserRepository, MockTokenService> {
        AuthService::new(Arc::new(users), Arc::new(tokens))
    }

    #[tokio::test]
    async fn callback_rejects_malformed_steam_ids() {
        let service = service(MockUserRepository::new(), MockTokenService::new());
        let bad = IdentityPayload {
            steam_id: "not-a-steam64".to_owned(),
            ..IdentityPayload::default()
        };

        let err = service
            .handle_steam_callback(bad)
            .await
            .expect_err("malformed id must fail");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn first_login_creates_a_user_with_the_first_photo() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_steam_id()
            .times(1)
            .return_once(|_| Ok(None));
        users
            .expect_create_new()
            .withf(|_, username, avatar| username == "Gabe" && avatar == "http://a/p0.jpg")
            .times(1)
            .return_once(|steam_id, username, avatar| {
                Ok(User::create(UserId::random(), steam_id, username, avatar)
                    .expect("valid user"))
            });

        let mut tokens = MockTokenService::new();
        tokens
            .expect_issue()
            .times(1)
            .return_once(|_| Ok("tok".to_owned()));

        let session = service(users, tokens)
            .handle_steam_callback(payload())
            .await
            .expect("callback succeeds");
        assert_eq!(session.user.username(), "Gabe");
        assert_eq!(session.token, "tok");
    }

    #[tokio::test]
    async fn missing_names_fall_back_to_unknown() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_steam_id()
            .times(1)
            .return_once(|_| Ok(None));
        users
            .expect_create_new()
            .withf(|_, username, avatar| username == UNKNOWN_USERNAME && avatar.is_empty())
            .times(1)
            .return_once(|steam_id, username, avatar| {
                Ok(User::create(UserId::random(), steam_id, username, avatar)
                    .expect("valid user"))
            });

        let mut tokens = MockTokenService::new();
        tokens
            .expect_issue()
            .times(1)
            .return_once(|_| Ok("tok".to_owned()));

        let anonymous = IdentityPayload {
            steam_id: STEAM64.to_owned(),
            ..IdentityPayload::default()
        };
        let session = service(users, tokens)
            .handle_steam_callback(anonymous)
            .await
            .expect("callback succeeds");
        assert_eq!(session.user.username(), UNKNOWN_USERNAME);
    }

    #[tokio::test]
    async fn repeat_login_refreshes_the_profile() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_steam_id()
            .times(1)
            .return_once(|_| Ok(Some(stored_user())));
        users
            .expect_save()
            .withf(|user: &User| {
                user.username() == "Gabe" && user.avatar() == "http://a/p0.jpg"
            })
            .times(1)
            .return_once(|_| Ok(()));

        let mut tokens = MockTokenService::new();
        tokens
            .expect_issue()
            .times(1)
            .return_once(|_| Ok("tok".to_owned()));

        let session = service(users, tokens)
            .handle_steam_callback(payload())
            .await
            .expect("callback succeeds");
        assert_eq!(session.user.username(), "Gabe");
    }

    #[tokio::test]
    async fn repeat_login_keeps_fields_the_payload_omits() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_steam_id()
            .times(1)
            .return_once(|_| Ok(Some(stored_user())));
        users
            .expect_save()
            .withf(|user: &User| {
                user.username() == "oldname" && user.avatar() == "http://a/old.jpg"
            })
            .times(1)
            .return_once(|_| Ok(()));

        let mut tokens = MockTokenService::new();
        tokens
            .expect_issue()
            .times(1)
            .return_once(|_| Ok("tok".to_owned()));

        let bare = IdentityPayload {
            steam_id: STEAM64.to_owned(),
            ..IdentityPayload::default()
        };
        let session = service(users, tokens)
            .handle_steam_callback(bare)
            .await
            .expect("callback succeeds");
        assert_eq!(session.user.avatar(), "http://a/old.jpg");
    }

    #[tokio::test]
    async fn current_user_maps_missing_to_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().times(1).return_once(|_| Ok(None));

        let service = service(users, MockTokenService::new());
        let claims = TokenClaims {
            user_id: UserId::random(),
            steam_id: SteamId::from_steam64(STEAM64).expect("valid steam id"),
        };

        let err = service
            .current_user(&claims)
            .await
            .expect_err("missing user must fail");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn connection_failures_surface_as_unavailable() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_steam_id()
            .times(1)
            .return_once(|_| Err(UserPersistenceError::connection("refused")));

        let err = service(users, MockTokenService::new())
            .handle_steam_callback(payload())
            .await
            .expect_err("connection failure must surface");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
