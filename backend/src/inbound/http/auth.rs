//! Authentication handlers and the bearer-credential extractor.
//!
//! The OpenID relying-party dance happens in front of this API; the callback
//! endpoint receives the already-verified identity payload and turns it into
//! a user plus a signed bearer token. Subsequent requests present the token
//! in the `Authorization` header, verified here by the [`AuthenticatedUser`]
//! extractor without touching the store.

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{get, post, web, FromRequest, HttpRequest, HttpResponse};
use futures_util::future::{ready, Ready};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::{IdentityPayload, TokenClaims};
use crate::domain::Error;

use super::error::ApiResult;
use super::state::HttpState;
use super::users::UserDto;

/// Verified identity of the acting user, extracted from the bearer token.
pub struct AuthenticatedUser {
    /// Claims recovered from the credential.
    pub claims: TokenClaims,
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("http state not configured"))?;
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| Error::unauthorized("missing bearer credential"))?;
    let claims = state
        .tokens
        .verify(token)
        .map_err(|_| Error::unauthorized("invalid or expired credential"))?;
    Ok(AuthenticatedUser { claims })
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

/// One profile photo entry as sent by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PhotoDto {
    /// Photo URL.
    pub value: String,
}

/// Identity payload delivered by the provider callback.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SteamCallbackRequest {
    /// Raw Steam64 identifier. Providers differ on the field name.
    #[serde(alias = "id")]
    pub steam_id: String,
    /// Preferred display name.
    pub display_name: Option<String>,
    /// Secondary account name.
    pub username: Option<String>,
    /// Profile photos, smallest first.
    #[serde(default)]
    pub photos: Vec<PhotoDto>,
    /// Flat avatar URL some providers send instead of photos.
    pub avatar: Option<String>,
}

impl From<SteamCallbackRequest> for IdentityPayload {
    fn from(value: SteamCallbackRequest) -> Self {
        Self {
            steam_id: value.steam_id,
            display_name: value.display_name,
            username: value.username,
            photos: value.photos.into_iter().map(|photo| photo.value).collect(),
            avatar: value.avatar,
        }
    }
}

/// Completed login: the resolved user plus their bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Signed bearer token for subsequent requests.
    pub token: String,
    /// The created or refreshed user.
    pub user: UserDto,
}

/// Resolve the identity-provider callback into a user and credential.
#[utoipa::path(
    post,
    path = "/api/auth/callback",
    request_body = SteamCallbackRequest,
    responses(
        (status = 200, description = "Login success", body = AuthResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "steamCallback",
    security([])
)]
#[post("/auth/callback")]
pub async fn steam_callback(
    state: web::Data<HttpState>,
    payload: web::Json<SteamCallbackRequest>,
) -> ApiResult<HttpResponse> {
    let session = state
        .auth
        .handle_steam_callback(payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Ok().json(AuthResponse {
        token: session.token,
        user: UserDto::from(&session.user),
    }))
}

/// Resolve the bearer credential to the current user.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserDto),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "User no longer exists", body = Error)
    ),
    tags = ["auth"],
    operation_id = "currentUser"
)]
#[get("/auth/me")]
pub async fn me(state: web::Data<HttpState>, auth: AuthenticatedUser) -> ApiResult<HttpResponse> {
    let user = state.auth.current_user(&auth.claims).await?;
    Ok(HttpResponse::Ok().json(UserDto::from(&user)))
}

/// Log out.
///
/// Credentials are self-contained, so there is no server-side state to
/// clear; clients drop the token. The endpoint exists for API symmetry.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 200, description = "Logged out")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/auth/logout")]
pub async fn logout() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "message": "Logged out" }))
}
