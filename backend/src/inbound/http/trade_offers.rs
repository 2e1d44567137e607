//! Trade offer lifecycle handlers.
//!
//! All endpoints require a bearer credential; the acting user is always
//! taken from the verified claims, never from the request body, so a client
//! cannot create or settle offers on someone else's behalf.

use actix_web::{get, post, put, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{CreateTradeOfferCommand, TradeItemInput};
use crate::domain::{Error, TradeOffer, TradeOfferItem, TradeOfferStatus};

use super::auth::AuthenticatedUser;
use super::error::ApiResult;
use super::state::HttpState;

/// One item on either side of an offer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TradeOfferItemDto {
    /// Asset identifier within the owner's inventory.
    #[schema(example = "31491156912")]
    pub asset_id: String,
    /// Steam application the asset belongs to.
    #[schema(example = 730)]
    pub app_id: i32,
    /// Inventory context holding the asset.
    #[schema(example = "2")]
    pub context_id: String,
    /// Quantity pledged.
    #[schema(example = 1)]
    pub amount: i32,
}

impl From<&TradeOfferItem> for TradeOfferItemDto {
    fn from(item: &TradeOfferItem) -> Self {
        Self {
            asset_id: item.asset_id().to_owned(),
            app_id: item.app_id(),
            context_id: item.context_id().to_owned(),
            amount: item.amount(),
        }
    }
}

/// Trade offer payload returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TradeOfferDto {
    /// Offer identifier.
    pub id: String,
    /// Creator of the offer.
    pub from_user_id: String,
    /// Recipient of the offer.
    pub to_user_id: String,
    /// Lifecycle status literal.
    pub status: TradeOfferStatus,
    /// Items pledged by the creator.
    pub items_from: Vec<TradeOfferItemDto>,
    /// Items requested from the recipient.
    pub items_to: Vec<TradeOfferItemDto>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the settling transition, or creation.
    pub updated_at: DateTime<Utc>,
}

impl From<&TradeOffer> for TradeOfferDto {
    fn from(offer: &TradeOffer) -> Self {
        Self {
            id: offer.id().to_string(),
            from_user_id: offer.from_user_id().to_string(),
            to_user_id: offer.to_user_id().to_string(),
            status: offer.status(),
            items_from: offer.items_from().iter().map(Into::into).collect(),
            items_to: offer.items_to().iter().map(Into::into).collect(),
            created_at: offer.created_at(),
            updated_at: offer.updated_at(),
        }
    }
}

/// One item in a creation request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewTradeItemDto {
    /// Asset identifier within the owner's inventory.
    pub asset_id: String,
    /// Steam application the asset belongs to.
    pub app_id: i32,
    /// Inventory context holding the asset.
    pub context_id: String,
    /// Quantity; omitted means one.
    pub amount: Option<i32>,
}

impl From<NewTradeItemDto> for TradeItemInput {
    fn from(value: NewTradeItemDto) -> Self {
        Self {
            asset_id: value.asset_id,
            app_id: value.app_id,
            context_id: value.context_id,
            amount: value.amount,
        }
    }
}

/// Request body for creating an offer. The creator is the authenticated
/// caller.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTradeOfferRequest {
    /// Recipient of the offer.
    pub to_user_id: String,
    /// Items pledged by the creator.
    #[serde(default)]
    pub items_from: Vec<NewTradeItemDto>,
    /// Items requested from the recipient.
    #[serde(default)]
    pub items_to: Vec<NewTradeItemDto>,
}

impl From<CreateTradeOfferRequest> for CreateTradeOfferCommand {
    fn from(value: CreateTradeOfferRequest) -> Self {
        Self {
            to_user_id: value.to_user_id,
            items_from: value.items_from.into_iter().map(Into::into).collect(),
            items_to: value.items_to.into_iter().map(Into::into).collect(),
        }
    }
}

/// Create a trade offer from the acting user.
#[utoipa::path(
    post,
    path = "/api/trade-offers",
    request_body = CreateTradeOfferRequest,
    responses(
        (status = 201, description = "Offer created", body = TradeOfferDto),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Counterpart not found", body = Error)
    ),
    tags = ["trade-offers"],
    operation_id = "createTradeOffer"
)]
#[post("/trade-offers")]
pub async fn create_trade_offer(
    state: web::Data<HttpState>,
    auth: AuthenticatedUser,
    payload: web::Json<CreateTradeOfferRequest>,
) -> ApiResult<HttpResponse> {
    let offer = state
        .trade_offers
        .create(&auth.claims.user_id, payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(TradeOfferDto::from(&offer)))
}

/// List offers where the acting user is either party, newest first.
#[utoipa::path(
    get,
    path = "/api/trade-offers",
    responses(
        (status = 200, description = "Offers", body = [TradeOfferDto]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["trade-offers"],
    operation_id = "listTradeOffers"
)]
#[get("/trade-offers")]
pub async fn list_trade_offers(
    state: web::Data<HttpState>,
    auth: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<TradeOfferDto>>> {
    let offers = state
        .trade_offers
        .list_for_user(&auth.claims.user_id)
        .await?;
    Ok(web::Json(offers.iter().map(Into::into).collect()))
}

/// Fetch a single offer.
#[utoipa::path(
    get,
    path = "/api/trade-offers/{id}",
    params(("id" = String, Path, description = "Trade offer id")),
    responses(
        (status = 200, description = "Offer", body = TradeOfferDto),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["trade-offers"],
    operation_id = "getTradeOffer"
)]
#[get("/trade-offers/{id}")]
pub async fn get_trade_offer(
    state: web::Data<HttpState>,
    _auth: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let offer = state.trade_offers.get(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(TradeOfferDto::from(&offer)))
}

/// Accept an offer as its recipient.
#[utoipa::path(
    put,
    path = "/api/trade-offers/{id}/accept",
    params(("id" = String, Path, description = "Trade offer id")),
    responses(
        (status = 200, description = "Offer accepted", body = TradeOfferDto),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the recipient", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Offer already settled", body = Error)
    ),
    tags = ["trade-offers"],
    operation_id = "acceptTradeOffer"
)]
#[put("/trade-offers/{id}/accept")]
pub async fn accept_trade_offer(
    state: web::Data<HttpState>,
    auth: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let offer = state
        .trade_offers
        .accept(&path.into_inner(), &auth.claims.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(TradeOfferDto::from(&offer)))
}

/// Decline an offer as its recipient.
#[utoipa::path(
    put,
    path = "/api/trade-offers/{id}/decline",
    params(("id" = String, Path, description = "Trade offer id")),
    responses(
        (status = 200, description = "Offer declined", body = TradeOfferDto),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the recipient", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Offer already settled", body = Error)
    ),
    tags = ["trade-offers"],
    operation_id = "declineTradeOffer"
)]
#[put("/trade-offers/{id}/decline")]
pub async fn decline_trade_offer(
    state: web::Data<HttpState>,
    auth: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let offer = state
        .trade_offers
        .decline(&path.into_inner(), &auth.claims.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(TradeOfferDto::from(&offer)))
}

/// Withdraw an offer as its creator.
#[utoipa::path(
    put,
    path = "/api/trade-offers/{id}/cancel",
    params(("id" = String, Path, description = "Trade offer id")),
    responses(
        (status = 200, description = "Offer cancelled", body = TradeOfferDto),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the creator", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Offer already settled", body = Error)
    ),
    tags = ["trade-offers"],
    operation_id = "cancelTradeOffer"
)]
#[put("/trade-offers/{id}/cancel")]
pub async fn cancel_trade_offer(
    state: web::Data<HttpState>,
    auth: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let offer = state
        .trade_offers
        .cancel(&path.into_inner(), &auth.claims.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(TradeOfferDto::from(&offer)))
}
