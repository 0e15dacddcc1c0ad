use serde_json::{Map, Value, json};
use sha2::{Digest, Sha256};

use crate::error::StacError;
use crate::geom;
use crate::item::Item;

/// Merges source items into one synthetic item for composite products.
///
/// Properties merge first-wins in sequence order; `datetime` therefore comes
/// from the first constituent, so the derived date matches it. The identifier
/// is freshly generated: the first constituent's id plus a SHA-256 digest
/// over the full id sequence with NUL separators, making it deterministic,
/// order-sensitive and collision-resistant. Geometry is the union of all
/// constituent geometries, never a copy of the first.
pub fn create_derived(items: &[Item], min_items: usize) -> Result<Item, StacError> {
    if items.len() < min_items || items.is_empty() {
        return Err(StacError::Validation(format!(
            "derived item requires at least {} source item(s), got {}",
            min_items.max(1),
            items.len()
        )));
    }

    let mut properties = Map::new();
    for item in items {
        for (key, value) in item.properties().iter() {
            properties
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
    }
    properties.insert("id".to_string(), Value::String(derived_id(items)));

    let geometries: Vec<_> = items.iter().map(Item::geometry).collect();
    let geometry = geom::union(&geometries)?;
    let geometry =
        serde_json::to_value(geometry).map_err(|err| StacError::Geometry(err.to_string()))?;

    Item::new(json!({
        "properties": Value::Object(properties),
        "geometry": geometry,
        "assets": {},
        "links": {},
    }))
}

fn derived_id(items: &[Item]) -> String {
    let mut hasher = Sha256::new();
    for item in items {
        hasher.update(item.id().as_bytes());
        hasher.update([0u8]);
    }
    let digest = hasher.finalize();
    let short: String = digest[..8].iter().map(|byte| format!("{byte:02x}")).collect();
    format!("{}_d{short}", items[0].id())
}
