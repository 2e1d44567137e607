//! Inventory read handlers.

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{Error, InventoryItem};

use super::auth::AuthenticatedUser;
use super::error::ApiResult;
use super::state::HttpState;

/// Optional overrides for the inventory request.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct InventoryQuery {
    /// Steam application id; defaults to Counter-Strike 2.
    pub app_id: Option<i32>,
    /// Inventory context; defaults to the community context.
    pub context_id: Option<i32>,
}

/// Fetch the tradable subset of an account's inventory.
///
/// Upstream failure classes surface as specific statuses: a private
/// inventory is 403, a throttled request 429, a Steam outage 503.
#[utoipa::path(
    get,
    path = "/api/inventory/{steamId}",
    params(
        ("steamId" = String, Path, description = "Steam64 account id"),
        InventoryQuery
    ),
    responses(
        (status = 200, description = "Tradable items", body = [InventoryItem]),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Inventory is private", body = Error),
        (status = 404, description = "Inventory does not exist", body = Error),
        (status = 429, description = "Rate limited by Steam", body = Error),
        (status = 503, description = "Steam unavailable", body = Error)
    ),
    tags = ["inventory"],
    operation_id = "getInventory"
)]
#[get("/inventory/{steam_id}")]
pub async fn get_inventory(
    state: web::Data<HttpState>,
    _auth: AuthenticatedUser,
    path: web::Path<String>,
    query: web::Query<InventoryQuery>,
) -> ApiResult<web::Json<Vec<InventoryItem>>> {
    let steam_id = path.into_inner();
    let items = state
        .inventory
        .tradable_inventory(&steam_id, query.app_id, query.context_id)
        .await?;
    Ok(web::Json(items))
}
