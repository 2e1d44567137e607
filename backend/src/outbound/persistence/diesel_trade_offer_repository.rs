//! PostgreSQL-backed `TradeOfferRepository` implementation using Diesel ORM.
//!
//! Offers span two tables: the aggregate row and one item row per pledged
//! asset. Saves are write-once for items; only the status and `updated_at`
//! change afterwards, and that update is guarded so it applies exclusively to
//! rows still pending. Two racing settlements therefore settle to exactly one
//! winner, the loser observing `StaleTransition`.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{TradeOfferPersistenceError, TradeOfferRepository};
use crate::domain::{TradeOffer, TradeOfferId, TradeOfferItem, TradeOfferStatus, UserId};

use super::models::{NewTradeOfferItemRow, NewTradeOfferRow, TradeOfferItemRow, TradeOfferRow};
use super::pool::{DbPool, PoolError};
use super::schema::{trade_offer_items, trade_offers};

/// Diesel-backed implementation of the `TradeOfferRepository` port.
#[derive(Clone)]
pub struct DieselTradeOfferRepository {
    pool: DbPool,
}

impl DieselTradeOfferRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain trade offer repository errors.
fn map_pool_error(error: PoolError) -> TradeOfferPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            TradeOfferPersistenceError::connection(message)
        }
    }
}

/// Map Diesel errors to domain trade offer repository errors.
fn map_diesel_error(error: diesel::result::Error) -> TradeOfferPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            TradeOfferPersistenceError::connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => TradeOfferPersistenceError::query("database error"),
        DieselError::NotFound => TradeOfferPersistenceError::query("record not found"),
        _ => TradeOfferPersistenceError::query("database error"),
    }
}

fn corrupt_row(err: impl std::fmt::Display) -> TradeOfferPersistenceError {
    TradeOfferPersistenceError::query(format!("corrupt trade offer row: {err}"))
}

/// Convert item rows (already ordered by position) to domain items, split
/// into the creator's and the recipient's side.
fn split_items(
    rows: Vec<TradeOfferItemRow>,
) -> Result<(Vec<TradeOfferItem>, Vec<TradeOfferItem>), TradeOfferPersistenceError> {
    let mut items_from = Vec::new();
    let mut items_to = Vec::new();
    for row in rows {
        let item = TradeOfferItem::new(row.asset_id, row.app_id, row.context_id, row.amount)
            .map_err(corrupt_row)?;
        if row.is_from {
            items_from.push(item);
        } else {
            items_to.push(item);
        }
    }
    Ok((items_from, items_to))
}

/// Convert an aggregate row plus its ordered item rows to a domain offer.
fn row_to_offer(
    row: TradeOfferRow,
    item_rows: Vec<TradeOfferItemRow>,
) -> Result<TradeOffer, TradeOfferPersistenceError> {
    let id = TradeOfferId::new(row.id).map_err(corrupt_row)?;
    let from_user_id = UserId::new(row.from_user_id).map_err(corrupt_row)?;
    let to_user_id = UserId::new(row.to_user_id).map_err(corrupt_row)?;
    let status = row
        .status
        .parse::<TradeOfferStatus>()
        .map_err(corrupt_row)?;
    let (items_from, items_to) = split_items(item_rows)?;
    Ok(TradeOffer::reconstitute(
        id,
        from_user_id,
        to_user_id,
        status,
        items_from,
        items_to,
        row.created_at,
        row.updated_at,
    ))
}

fn item_rows_for<'a>(
    offer_id: &'a str,
    items: &'a [TradeOfferItem],
    is_from: bool,
) -> Vec<NewTradeOfferItemRow<'a>> {
    items
        .iter()
        .enumerate()
        .map(|(position, item)| NewTradeOfferItemRow {
            trade_offer_id: offer_id,
            asset_id: item.asset_id(),
            app_id: item.app_id(),
            context_id: item.context_id(),
            amount: item.amount(),
            is_from,
            position: position_index(position),
        })
        .collect()
}

fn position_index(position: usize) -> i32 {
    i32::try_from(position).unwrap_or(i32::MAX)
}

/// Result of the insert-or-guarded-update write.
enum SaveOutcome {
    Written,
    Stale,
}

#[async_trait]
impl TradeOfferRepository for DieselTradeOfferRepository {
    async fn find_by_id(
        &self,
        id: &TradeOfferId,
    ) -> Result<Option<TradeOffer>, TradeOfferPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = trade_offers::table
            .filter(trade_offers::id.eq(id.as_str()))
            .select(TradeOfferRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(row) = row else {
            return Ok(None);
        };

        let item_rows = trade_offer_items::table
            .filter(trade_offer_items::trade_offer_id.eq(id.as_str()))
            .order(trade_offer_items::position.asc())
            .select(TradeOfferItemRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_offer(row, item_rows).map(Some)
    }

    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<TradeOffer>, TradeOfferPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = trade_offers::table
            .filter(
                trade_offers::from_user_id
                    .eq(user_id.as_str())
                    .or(trade_offers::to_user_id.eq(user_id.as_str())),
            )
            .order(trade_offers::created_at.desc())
            .select(TradeOfferRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let offer_ids: Vec<&str> = rows.iter().map(|row| row.id.as_str()).collect();
        let item_rows = trade_offer_items::table
            .filter(trade_offer_items::trade_offer_id.eq_any(&offer_ids))
            .order((
                trade_offer_items::trade_offer_id.asc(),
                trade_offer_items::position.asc(),
            ))
            .select(TradeOfferItemRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let mut items_by_offer: HashMap<String, Vec<TradeOfferItemRow>> = HashMap::new();
        for item_row in item_rows {
            items_by_offer
                .entry(item_row.trade_offer_id.clone())
                .or_default()
                .push(item_row);
        }

        rows.into_iter()
            .map(|row| {
                let items = items_by_offer.remove(&row.id).unwrap_or_default();
                row_to_offer(row, items)
            })
            .collect()
    }

    async fn save(&self, offer: &TradeOffer) -> Result<(), TradeOfferPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let offer_id = offer.id().as_str();
        let new_row = NewTradeOfferRow {
            id: offer_id,
            from_user_id: offer.from_user_id().as_str(),
            to_user_id: offer.to_user_id().as_str(),
            status: offer.status().as_str(),
            created_at: offer.created_at(),
            updated_at: offer.updated_at(),
        };
        let mut item_rows = item_rows_for(offer_id, offer.items_from(), true);
        item_rows.extend(item_rows_for(offer_id, offer.items_to(), false));
        let status = offer.status().as_str();
        let updated_at = offer.updated_at();

        let outcome = conn
            .transaction::<SaveOutcome, diesel::result::Error, _>(|conn| {
                async move {
                    let existing: Option<String> = trade_offers::table
                        .filter(trade_offers::id.eq(offer_id))
                        .select(trade_offers::id)
                        .first(conn)
                        .await
                        .optional()?;

                    if existing.is_none() {
                        diesel::insert_into(trade_offers::table)
                            .values(&new_row)
                            .execute(conn)
                            .await?;
                        if !item_rows.is_empty() {
                            diesel::insert_into(trade_offer_items::table)
                                .values(&item_rows)
                                .execute(conn)
                                .await?;
                        }
                        return Ok(SaveOutcome::Written);
                    }

                    // Items are write-once; only the status may change, and
                    // only away from PENDING.
                    let affected = diesel::update(
                        trade_offers::table.filter(trade_offers::id.eq(offer_id)).filter(
                            trade_offers::status.eq(TradeOfferStatus::Pending.as_str()),
                        ),
                    )
                    .set((
                        trade_offers::status.eq(status),
                        trade_offers::updated_at.eq(updated_at),
                    ))
                    .execute(conn)
                    .await?;

                    Ok(if affected == 0 {
                        SaveOutcome::Stale
                    } else {
                        SaveOutcome::Written
                    })
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        match outcome {
            SaveOutcome::Written => Ok(()),
            SaveOutcome::Stale => Err(TradeOfferPersistenceError::stale_transition(offer_id)),
        }
    }

    async fn delete(&self, id: &TradeOfferId) -> Result<(), TradeOfferPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction::<(), diesel::result::Error, _>(|conn| {
            async move {
                diesel::delete(
                    trade_offer_items::table
                        .filter(trade_offer_items::trade_offer_id.eq(id.as_str())),
                )
                .execute(conn)
                .await?;
                diesel::delete(trade_offers::table.filter(trade_offers::id.eq(id.as_str())))
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
