//! Trade offer item value object.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::ValidationError;

/// Default quantity when a caller does not specify one.
pub const DEFAULT_ITEM_AMOUNT: i32 = 1;

/// A single inventory asset pledged on one side of a trade offer.
///
/// Value object: two items are equal iff all four fields match. Immutable
/// once constructed; invalid construction fails fast.
///
/// ## Invariants
/// - `asset_id` and `context_id` are non-empty once trimmed.
/// - `app_id` and `amount` are positive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TradeOfferItem {
    #[schema(example = "31491156912")]
    asset_id: String,
    #[schema(example = 730)]
    app_id: i32,
    #[schema(example = "2")]
    context_id: String,
    #[schema(example = 1)]
    amount: i32,
}

impl TradeOfferItem {
    /// Validate and construct an item.
    pub fn new(
        asset_id: impl Into<String>,
        app_id: i32,
        context_id: impl Into<String>,
        amount: i32,
    ) -> Result<Self, ValidationError> {
        let asset_id = asset_id.into();
        if asset_id.trim().is_empty() {
            return Err(ValidationError::empty("assetId"));
        }
        if app_id <= 0 {
            return Err(ValidationError::not_positive("appId"));
        }
        let context_id = context_id.into();
        if context_id.trim().is_empty() {
            return Err(ValidationError::empty("contextId"));
        }
        if amount <= 0 {
            return Err(ValidationError::not_positive("amount"));
        }
        Ok(Self {
            asset_id,
            app_id,
            context_id,
            amount,
        })
    }

    /// Construct an item with the default quantity of one.
    pub fn single(
        asset_id: impl Into<String>,
        app_id: i32,
        context_id: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Self::new(asset_id, app_id, context_id, DEFAULT_ITEM_AMOUNT)
    }

    /// Asset identifier within the owner's inventory.
    pub fn asset_id(&self) -> &str {
        self.asset_id.as_str()
    }

    /// Steam application the asset belongs to.
    pub fn app_id(&self) -> i32 {
        self.app_id
    }

    /// Inventory context holding the asset.
    pub fn context_id(&self) -> &str {
        self.context_id.as_str()
    }

    /// Quantity pledged.
    pub fn amount(&self) -> i32 {
        self.amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn item() -> TradeOfferItem {
        TradeOfferItem::new("A1", 730, "2", 1).expect("valid item")
    }

    #[rstest]
    #[case("", 730, "2", 1, ValidationError::empty("assetId"))]
    #[case("  ", 730, "2", 1, ValidationError::empty("assetId"))]
    #[case("A1", 0, "2", 1, ValidationError::not_positive("appId"))]
    #[case("A1", -730, "2", 1, ValidationError::not_positive("appId"))]
    #[case("A1", 730, "", 1, ValidationError::empty("contextId"))]
    #[case("A1", 730, "2", 0, ValidationError::not_positive("amount"))]
    #[case("A1", 730, "2", -3, ValidationError::not_positive("amount"))]
    fn invalid_fields_are_rejected(
        #[case] asset_id: &str,
        #[case] app_id: i32,
        #[case] context_id: &str,
        #[case] amount: i32,
        #[case] expected: ValidationError,
    ) {
        let err =
            TradeOfferItem::new(asset_id, app_id, context_id, amount).expect_err("must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn equality_requires_all_fields_to_match() {
        assert_eq!(item(), TradeOfferItem::new("A1", 730, "2", 1).expect("valid"));
        assert_ne!(item(), TradeOfferItem::new("A2", 730, "2", 1).expect("valid"));
        assert_ne!(item(), TradeOfferItem::new("A1", 570, "2", 1).expect("valid"));
        assert_ne!(item(), TradeOfferItem::new("A1", 730, "6", 1).expect("valid"));
        assert_ne!(item(), TradeOfferItem::new("A1", 730, "2", 2).expect("valid"));
    }

    #[rstest]
    fn single_defaults_the_amount() {
        let item = TradeOfferItem::single("A1", 730, "2").expect("valid item");
        assert_eq!(item.amount(), DEFAULT_ITEM_AMOUNT);
    }
}
