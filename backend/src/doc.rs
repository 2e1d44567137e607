//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint and the schemas their payloads
//! reference. The generated specification backs Swagger UI in debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /api/auth/callback."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Steam trade backend API",
        description = "HTTP interface for Steam-authenticated inventory browsing and peer-to-peer trade offers."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::auth::steam_callback,
        crate::inbound::http::auth::me,
        crate::inbound::http::auth::logout,
        crate::inbound::http::users::user_by_steam_id,
        crate::inbound::http::inventory::get_inventory,
        crate::inbound::http::trade_offers::create_trade_offer,
        crate::inbound::http::trade_offers::list_trade_offers,
        crate::inbound::http::trade_offers::get_trade_offer,
        crate::inbound::http::trade_offers::accept_trade_offer,
        crate::inbound::http::trade_offers::decline_trade_offer,
        crate::inbound::http::trade_offers::cancel_trade_offer,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        crate::domain::Error,
        crate::domain::ErrorCode,
        crate::domain::InventoryItem,
        crate::domain::TradeOfferStatus,
        crate::domain::TradeOfferItem,
        crate::inbound::http::users::UserDto,
        crate::inbound::http::auth::PhotoDto,
        crate::inbound::http::auth::SteamCallbackRequest,
        crate::inbound::http::auth::AuthResponse,
        crate::inbound::http::trade_offers::TradeOfferItemDto,
        crate::inbound::http::trade_offers::TradeOfferDto,
        crate::inbound::http::trade_offers::NewTradeItemDto,
        crate::inbound::http::trade_offers::CreateTradeOfferRequest,
    ))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_includes_every_endpoint() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for expected in [
            "/api/auth/callback",
            "/api/auth/me",
            "/api/auth/logout",
            "/api/users/by-steam-id/{steamId}",
            "/api/inventory/{steamId}",
            "/api/trade-offers",
            "/api/trade-offers/{id}",
            "/api/trade-offers/{id}/accept",
            "/api/trade-offers/{id}/decline",
            "/api/trade-offers/{id}/cancel",
            "/health/ready",
            "/health/live",
        ] {
            assert!(paths.contains(&expected), "missing path: {expected}");
        }
    }
}
