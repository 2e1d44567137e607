//! Public user lookup handlers.

use actix_web::{get, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, User};

use super::error::ApiResult;
use super::state::HttpState;

/// User profile payload returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    /// Stable application identifier.
    #[schema(example = "7b9cc52e-64a3-4dbb-8f3a-9f1d53c6c1f0")]
    pub id: String,
    /// Steam64 account id.
    #[schema(example = "76561198012345678")]
    pub steam_id: String,
    /// Display name.
    #[schema(example = "gaben")]
    pub username: String,
    /// Avatar URL; empty when none is known.
    pub avatar: String,
    /// First-login timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            steam_id: user.steam_id().to_string(),
            username: user.username().to_owned(),
            avatar: user.avatar().to_owned(),
            created_at: user.created_at(),
        }
    }
}

/// Fetch a user's public profile by Steam account.
#[utoipa::path(
    get,
    path = "/api/users/by-steam-id/{steamId}",
    params(("steamId" = String, Path, description = "Steam64 account id")),
    responses(
        (status = 200, description = "User profile", body = UserDto),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUserBySteamId",
    security([])
)]
#[get("/users/by-steam-id/{steam_id}")]
pub async fn user_by_steam_id(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let steam_id = path.into_inner();
    let user = state.users.find_by_steam_id(&steam_id).await?;
    Ok(HttpResponse::Ok().json(UserDto::from(&user)))
}
