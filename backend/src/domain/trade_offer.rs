//! Trade offer aggregate.
//!
//! The aggregate enforces its own authorization and state rules: only the
//! recipient may resolve an offer, only the creator may withdraw it, and no
//! transition leaves a terminal status. Callers cannot bypass these checks by
//! forgetting to run them upstream.

use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::error::ValidationError;
use super::ids::{TradeOfferId, UserId};
use super::trade_offer_item::TradeOfferItem;
use super::trade_offer_status::TradeOfferStatus;

/// Mutating operations on a trade offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeOfferAction {
    /// Recipient accepts the offer.
    Accept,
    /// Recipient declines the offer.
    Decline,
    /// Creator withdraws the offer.
    Cancel,
}

impl TradeOfferAction {
    /// Party entitled to perform this action.
    pub fn required_party(self) -> Party {
        match self {
            Self::Accept | Self::Decline => Party::Recipient,
            Self::Cancel => Party::Creator,
        }
    }

    fn target_status(self) -> TradeOfferStatus {
        match self {
            Self::Accept => TradeOfferStatus::Accepted,
            Self::Decline => TradeOfferStatus::Declined,
            Self::Cancel => TradeOfferStatus::Cancelled,
        }
    }
}

impl fmt::Display for TradeOfferAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Accept => "accept",
            Self::Decline => "decline",
            Self::Cancel => "cancel",
        })
    }
}

/// The two parties of a trade offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    /// The user who created the offer.
    Creator,
    /// The user the offer is addressed to.
    Recipient,
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Creator => "creator",
            Self::Recipient => "recipient",
        })
    }
}

/// Domain failures raised by [`TradeOffer`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TradeOfferError {
    /// Creator and recipient are the same user.
    #[error("cannot create a trade offer addressed to its creator")]
    SelfTrade,
    /// Both item lists are empty.
    #[error("trade offer must carry at least one item on either side")]
    EmptyTrade,
    /// The acting user is not the party entitled to this action.
    #[error("only the {required_party} may {action} this trade offer")]
    UnauthorizedAction {
        action: TradeOfferAction,
        required_party: Party,
    },
    /// The offer already left the pending state.
    #[error("cannot {action} a trade offer in status {current}")]
    InvalidStateTransition {
        action: TradeOfferAction,
        current: TradeOfferStatus,
    },
    /// A contained value object failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Aggregate root for a peer-to-peer item trade.
///
/// ## Invariants
/// - Creator and recipient differ.
/// - At least one item list is non-empty.
/// - The status changes at most once, out of `Pending`, via
///   [`TradeOffer::accept`], [`TradeOffer::decline`] or
///   [`TradeOffer::cancel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeOffer {
    id: TradeOfferId,
    from_user_id: UserId,
    to_user_id: UserId,
    status: TradeOfferStatus,
    items_from: Vec<TradeOfferItem>,
    items_to: Vec<TradeOfferItem>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TradeOffer {
    /// Create a pending offer from `from_user_id` to `to_user_id`.
    pub fn create(
        id: TradeOfferId,
        from_user_id: UserId,
        to_user_id: UserId,
        items_from: Vec<TradeOfferItem>,
        items_to: Vec<TradeOfferItem>,
    ) -> Result<Self, TradeOfferError> {
        if from_user_id == to_user_id {
            return Err(TradeOfferError::SelfTrade);
        }
        if items_from.is_empty() && items_to.is_empty() {
            return Err(TradeOfferError::EmptyTrade);
        }
        let now = Utc::now();
        Ok(Self {
            id,
            from_user_id,
            to_user_id,
            status: TradeOfferStatus::Pending,
            items_from,
            items_to,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuild an offer from previously-validated persisted state.
    #[expect(clippy::too_many_arguments, reason = "mirrors the persisted record")]
    pub fn reconstitute(
        id: TradeOfferId,
        from_user_id: UserId,
        to_user_id: UserId,
        status: TradeOfferStatus,
        items_from: Vec<TradeOfferItem>,
        items_to: Vec<TradeOfferItem>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            from_user_id,
            to_user_id,
            status,
            items_from,
            items_to,
            created_at,
            updated_at,
        }
    }

    /// Accept the offer; only the recipient may do so.
    pub fn accept(&mut self, actor: &UserId) -> Result<(), TradeOfferError> {
        self.transition(TradeOfferAction::Accept, actor)
    }

    /// Decline the offer; only the recipient may do so.
    pub fn decline(&mut self, actor: &UserId) -> Result<(), TradeOfferError> {
        self.transition(TradeOfferAction::Decline, actor)
    }

    /// Withdraw the offer; only the creator may do so.
    pub fn cancel(&mut self, actor: &UserId) -> Result<(), TradeOfferError> {
        self.transition(TradeOfferAction::Cancel, actor)
    }

    /// Apply `action` for `actor`, checking authorization before state.
    ///
    /// On failure the aggregate is untouched, so rejected repeats of a
    /// settled operation are idempotent.
    fn transition(
        &mut self,
        action: TradeOfferAction,
        actor: &UserId,
    ) -> Result<(), TradeOfferError> {
        let required_party = action.required_party();
        let entitled = match required_party {
            Party::Creator => &self.from_user_id,
            Party::Recipient => &self.to_user_id,
        };
        if actor != entitled {
            return Err(TradeOfferError::UnauthorizedAction {
                action,
                required_party,
            });
        }
        if !self.status.can_be_modified() {
            return Err(TradeOfferError::InvalidStateTransition {
                action,
                current: self.status,
            });
        }
        self.status = action.target_status();
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Whether `user_id` is either party of this offer.
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        self.from_user_id == *user_id || self.to_user_id == *user_id
    }

    /// Offer identifier.
    pub fn id(&self) -> &TradeOfferId {
        &self.id
    }

    /// Creator of the offer.
    pub fn from_user_id(&self) -> &UserId {
        &self.from_user_id
    }

    /// Recipient of the offer.
    pub fn to_user_id(&self) -> &UserId {
        &self.to_user_id
    }

    /// Current lifecycle status.
    pub fn status(&self) -> TradeOfferStatus {
        self.status
    }

    /// Items pledged by the creator. The borrow is immutable, so callers
    /// cannot reach through it to mutate aggregate state.
    pub fn items_from(&self) -> &[TradeOfferItem] {
        &self.items_from
    }

    /// Items requested from the recipient.
    pub fn items_to(&self) -> &[TradeOfferItem] {
        &self.items_to
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Timestamp of the most recent mutation.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
