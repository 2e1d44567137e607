//! Trade offer lifecycle status.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::ValidationError;

/// Closed set of trade offer states.
///
/// Only [`TradeOfferStatus::Pending`] admits a transition; the four remaining
/// states are terminal. `Expired` is reachable solely through an external
/// time-based sweep and has no triggering operation here, so it only appears
/// when reconstituting persisted offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeOfferStatus {
    /// Awaiting a decision by the recipient (or withdrawal by the creator).
    Pending,
    /// Recipient accepted the offer.
    Accepted,
    /// Recipient declined the offer.
    Declined,
    /// Creator withdrew the offer.
    Cancelled,
    /// Offer lapsed without a decision.
    Expired,
}

impl TradeOfferStatus {
    /// Uppercase wire literal for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Accepted => "ACCEPTED",
            Self::Declined => "DECLINED",
            Self::Cancelled => "CANCELLED",
            Self::Expired => "EXPIRED",
        }
    }

    /// Whether a transition out of this status is permitted.
    ///
    /// Every mutating operation on the aggregate consults this before
    /// applying a transition.
    pub fn can_be_modified(self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Whether this status admits no further transition.
    pub fn is_terminal(self) -> bool {
        !self.can_be_modified()
    }
}

impl fmt::Display for TradeOfferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradeOfferStatus {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "PENDING" => Ok(Self::Pending),
            "ACCEPTED" => Ok(Self::Accepted),
            "DECLINED" => Ok(Self::Declined),
            "CANCELLED" => Ok(Self::Cancelled),
            "EXPIRED" => Ok(Self::Expired),
            other => Err(ValidationError::UnknownStatus {
                value: other.to_owned(),
            }),
        }
    }
}
