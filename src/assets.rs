use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::item::Item;

/// A named downloadable file recorded on an item. Never mutated after
/// construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetDescriptor {
    pub href: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Logical asset names mapped to concrete keys, tried in order. Band aliases
/// cover Landsat (B1..B11) and Sentinel-2 (B01..B12) key conventions.
pub const ASSET_ALIASES: &[(&str, &[&str])] = &[
    ("coastal", &["B1", "B01"]),
    ("blue", &["B2", "B02"]),
    ("green", &["B3", "B03"]),
    ("red", &["B4", "B04"]),
    ("nir", &["B5", "B08"]),
    ("swir16", &["B6", "B11"]),
    ("swir22", &["B7", "B12"]),
    ("pan", &["B8"]),
    ("cirrus", &["B9", "B10"]),
    ("lwir11", &["B10"]),
    ("lwir12", &["B11"]),
    ("thumbnail", &["thumbnail", "thumb", "preview"]),
    ("metadata", &["MTL", "mtl", "metadata"]),
];

/// Exact key match wins; otherwise the alias table is consulted and the first
/// candidate present on the item is returned.
pub fn resolve<'a>(item: &'a Item, key: &str) -> Option<&'a AssetDescriptor> {
    if let Some(asset) = item.assets().get(key) {
        return Some(asset);
    }
    let (_, candidates) = ASSET_ALIASES.iter().find(|(alias, _)| *alias == key)?;
    candidates
        .iter()
        .find_map(|candidate| item.assets().get(*candidate))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::item::Item;

    fn item_with_assets(assets: Value) -> Item {
        Item::new(json!({
            "properties": {"id": "scene", "datetime": "2020-06-01T10:00:00Z"},
            "geometry": {"type": "Point", "coordinates": [1.0, 2.0]},
            "assets": assets
        }))
        .unwrap()
    }

    #[test]
    fn exact_key_wins_over_alias() {
        let item = item_with_assets(json!({
            "thumbnail": {"href": "s3://bucket/thumb.png"},
            "thumb": {"href": "s3://bucket/other.png"}
        }));
        assert_eq!(
            resolve(&item, "thumbnail").unwrap().href,
            "s3://bucket/thumb.png"
        );
    }

    #[test]
    fn alias_candidates_tried_in_order() {
        let landsat = item_with_assets(json!({"B1": {"href": "b1.tif"}}));
        assert_eq!(resolve(&landsat, "coastal").unwrap().href, "b1.tif");

        let sentinel = item_with_assets(json!({"B01": {"href": "b01.jp2"}}));
        assert_eq!(resolve(&sentinel, "coastal").unwrap().href, "b01.jp2");
    }

    #[test]
    fn absent_asset_is_none() {
        let item = item_with_assets(json!({}));
        assert!(resolve(&item, "coastal").is_none());
        assert!(resolve(&item, "fake_asset").is_none());
    }
}
