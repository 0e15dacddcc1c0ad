use serde_json::{Value, json};

use stac_asset_manager::item::Item;

/// Landsat-style scene record mirroring what a catalog query returns.
pub fn test_record() -> Value {
    json!({
        "properties": {
            "id": "testscene",
            "collection": "landsat-8-l1",
            "datetime": "2017-01-01T00:00:00.000Z",
            "eo:platform": "landsat-8",
            "c:id": "composite-0"
        },
        "geometry": {
            "type": "Polygon",
            "coordinates": [[
                [-71.46676936182894, 42.338371079679106],
                [-70.09532154452742, 42.338371079679106],
                [-70.09532154452742, 43.347431265475954],
                [-71.46676936182894, 43.347431265475954],
                [-71.46676936182894, 42.338371079679106]
            ]]
        },
        "assets": {
            "B1": {
                "href": "https://landsat.example.com/testscene_B1.TIF",
                "type": "image/vnd.stac.geotiff"
            },
            "MTL": {
                "href": "https://landsat.example.com/testscene_MTL.txt",
                "type": "text/plain"
            },
            "thumbnail": {
                "href": "https://landsat.example.com/testscene_thumb_large.jpg",
                "type": "image/jpeg"
            }
        },
        "links": {
            "self": {"href": "link/to/self"}
        }
    })
}

pub fn test_item() -> Item {
    Item::new(test_record()).expect("valid test record")
}
