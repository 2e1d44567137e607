//! Steam inventory read model.
//!
//! Items arrive pre-joined from the inventory provider (asset rows matched to
//! their description rows). The serde field names follow the Steam Community
//! wire format so the same shape flows from the provider to API clients
//! unchanged.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One inventory asset together with its display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct InventoryItem {
    /// Asset identifier within the owner's inventory.
    #[serde(rename = "assetid")]
    pub asset_id: String,
    /// Item class (shared by identical items).
    #[serde(rename = "classid")]
    pub class_id: String,
    /// Instance discriminator within the class.
    #[serde(rename = "instanceid")]
    pub instance_id: String,
    /// Stack size as reported by Steam (a decimal string).
    pub amount: String,
    /// Steam application the asset belongs to.
    #[serde(rename = "appid")]
    pub app_id: i32,
    /// Inventory context holding the asset.
    #[serde(rename = "contextid")]
    pub context_id: String,
    /// Icon path fragment, when the description carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    /// Large icon path fragment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url_large: Option<String>,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Market listing name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_hash_name: Option<String>,
    /// 1 when the item can be traded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tradable: Option<i32>,
    /// 1 when the item can be listed on the community market.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marketable: Option<i32>,
}

impl InventoryItem {
    /// Whether Steam reports this item as tradable.
    pub fn is_tradable(&self) -> bool {
        self.tradable == Some(1)
    }
}

/// Keep only tradable items, preserving the upstream order.
pub fn tradable_only(items: Vec<InventoryItem>) -> Vec<InventoryItem> {
    items.into_iter().filter(InventoryItem::is_tradable).collect()
}
