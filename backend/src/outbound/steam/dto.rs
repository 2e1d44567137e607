//! Wire types for the Steam Community inventory endpoint.
//!
//! Steam returns assets and descriptions as parallel arrays; an asset's
//! display metadata lives in the description row sharing its class and
//! instance ids. The join happens here so the client module owns transport
//! concerns only.

use std::collections::HashMap;

use serde::Deserialize;

use crate::domain::InventoryItem;

/// Top-level inventory payload. Both arrays are absent for empty
/// inventories.
#[derive(Debug, Deserialize)]
pub(crate) struct InventoryResponseDto {
    pub assets: Option<Vec<AssetDto>>,
    pub descriptions: Option<Vec<DescriptionDto>>,
}

/// One owned asset.
#[derive(Debug, Deserialize)]
pub(crate) struct AssetDto {
    pub assetid: String,
    pub classid: String,
    pub instanceid: String,
    pub amount: Option<String>,
    pub appid: Option<i32>,
    pub contextid: Option<String>,
}

/// Display metadata shared by all assets of one class/instance pair.
#[derive(Debug, Deserialize)]
pub(crate) struct DescriptionDto {
    pub classid: String,
    pub instanceid: String,
    pub icon_url: Option<String>,
    pub icon_url_large: Option<String>,
    pub name: Option<String>,
    pub market_hash_name: Option<String>,
    pub tradable: Option<i32>,
    pub marketable: Option<i32>,
}

impl InventoryResponseDto {
    /// Join assets to their descriptions, preserving asset order.
    ///
    /// Missing arrays yield an empty inventory; an asset without a matching
    /// description keeps its identity fields and carries no metadata.
    pub(crate) fn into_items(self, app_id: i32, context_id: i32) -> Vec<InventoryItem> {
        let (Some(assets), Some(descriptions)) = (self.assets, self.descriptions) else {
            return Vec::new();
        };

        let by_class: HashMap<(String, String), DescriptionDto> = descriptions
            .into_iter()
            .map(|desc| ((desc.classid.clone(), desc.instanceid.clone()), desc))
            .collect();

        assets
            .into_iter()
            .map(|asset| {
                let desc = by_class.get(&(asset.classid.clone(), asset.instanceid.clone()));
                InventoryItem {
                    asset_id: asset.assetid,
                    class_id: asset.classid,
                    instance_id: asset.instanceid,
                    amount: asset.amount.unwrap_or_else(|| "1".to_owned()),
                    app_id: asset.appid.unwrap_or(app_id),
                    context_id: asset.contextid.unwrap_or_else(|| context_id.to_string()),
                    icon_url: desc.and_then(|d| d.icon_url.clone()),
                    icon_url_large: desc.and_then(|d| d.icon_url_large.clone()),
                    name: desc.and_then(|d| d.name.clone()),
                    market_hash_name: desc.and_then(|d| d.market_hash_name.clone()),
                    tradable: desc.and_then(|d| d.tradable),
                    marketable: desc.and_then(|d| d.marketable),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> InventoryResponseDto {
        serde_json::from_value(value).expect("valid payload")
    }

    #[rstest]
    fn assets_join_their_descriptions_in_order() {
        let dto = parse(json!({
            "assets": [
                { "assetid": "1", "classid": "c1", "instanceid": "i1", "amount": "1" },
                { "assetid": "2", "classid": "c2", "instanceid": "i2", "amount": "1" }
            ],
            "descriptions": [
                { "classid": "c2", "instanceid": "i2", "name": "P250 | Sand Dune", "tradable": 0 },
                { "classid": "c1", "instanceid": "i1", "name": "AK-47 | Redline", "tradable": 1 }
            ]
        }));

        let items = dto.into_items(730, 2);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].asset_id, "1");
        assert_eq!(items[0].name.as_deref(), Some("AK-47 | Redline"));
        assert_eq!(items[0].tradable, Some(1));
        assert_eq!(items[1].name.as_deref(), Some("P250 | Sand Dune"));
    }

    #[rstest]
    fn missing_arrays_mean_an_empty_inventory() {
        let dto = parse(json!({ "total_inventory_count": 0 }));
        assert!(dto.into_items(730, 2).is_empty());
    }

    #[rstest]
    fn absent_fields_fall_back_to_request_parameters() {
        let dto = parse(json!({
            "assets": [ { "assetid": "1", "classid": "c1", "instanceid": "i1" } ],
            "descriptions": []
        }));

        let items = dto.into_items(570, 6);
        assert_eq!(items[0].amount, "1");
        assert_eq!(items[0].app_id, 570);
        assert_eq!(items[0].context_id, "6");
        assert!(items[0].name.is_none());
    }
}
