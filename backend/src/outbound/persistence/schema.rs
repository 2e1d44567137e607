//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly; Diesel uses
//! them for compile-time query validation and type-safe SQL generation.
//! Identifier columns are text rather than native UUIDs: the domain treats
//! ids as opaque strings and older rows predate UUID-shaped identifiers.

diesel::table! {
    /// Registered users, one row per Steam account.
    users (id) {
        /// Primary key: opaque application identifier.
        id -> Text,
        /// Steam64 account id (unique).
        steam_id -> Text,
        /// Display name, trimmed, never empty.
        username -> Text,
        /// Avatar URL; empty when the provider supplied none.
        avatar -> Text,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last profile refresh timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Trade offer aggregates; item rows live in `trade_offer_items`.
    trade_offers (id) {
        /// Primary key: opaque offer identifier.
        id -> Text,
        /// Creator of the offer.
        from_user_id -> Text,
        /// Recipient of the offer.
        to_user_id -> Text,
        /// Uppercase status literal (PENDING, ACCEPTED, ...).
        status -> Text,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Timestamp of the settling transition, or creation.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Items pledged on either side of an offer.
    trade_offer_items (id) {
        /// Surrogate key.
        id -> Int4,
        /// Owning trade offer.
        trade_offer_id -> Text,
        /// Asset identifier within the owner's inventory.
        asset_id -> Text,
        /// Steam application the asset belongs to.
        app_id -> Int4,
        /// Inventory context holding the asset.
        context_id -> Text,
        /// Quantity pledged.
        amount -> Int4,
        /// True for the creator's side, false for the recipient's.
        is_from -> Bool,
        /// Zero-based position within its side, preserving offer order.
        position -> Int4,
    }
}

diesel::joinable!(trade_offer_items -> trade_offers (trade_offer_id));

diesel::allow_tables_to_appear_in_same_query!(users, trade_offers, trade_offer_items);
