//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{trade_offer_items, trade_offers, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: String,
    pub steam_id: String,
    pub username: String,
    pub avatar: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: &'a str,
    pub steam_id: &'a str,
    pub username: &'a str,
    pub avatar: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset struct for refreshing a user's profile fields.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserProfileChangeset<'a> {
    pub username: &'a str,
    pub avatar: &'a str,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the trade_offers table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = trade_offers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TradeOfferRow {
    pub id: String,
    pub from_user_id: String,
    pub to_user_id: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new trade offer records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = trade_offers)]
pub(crate) struct NewTradeOfferRow<'a> {
    pub id: &'a str,
    pub from_user_id: &'a str,
    pub to_user_id: &'a str,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the trade_offer_items table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = trade_offer_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TradeOfferItemRow {
    #[expect(dead_code, reason = "surrogate key, unused after the join")]
    pub id: i32,
    pub trade_offer_id: String,
    pub asset_id: String,
    pub app_id: i32,
    pub context_id: String,
    pub amount: i32,
    pub is_from: bool,
    #[expect(dead_code, reason = "consumed by the ORDER BY, not the mapping")]
    pub position: i32,
}

/// Insertable struct for creating item rows alongside a new offer.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = trade_offer_items)]
pub(crate) struct NewTradeOfferItemRow<'a> {
    pub trade_offer_id: &'a str,
    pub asset_id: &'a str,
    pub app_id: i32,
    pub context_id: &'a str,
    pub amount: i32,
    pub is_from: bool,
    pub position: i32,
}
