use serde_json::{Map, Value};

use crate::error::StacError;

/// Read-only view over an item's metadata fields. Keys containing a colon
/// (`eo:platform`) are stored verbatim; dotted keys traverse nested objects.
#[derive(Debug, Clone)]
pub struct PropertyStore {
    values: Map<String, Value>,
}

impl PropertyStore {
    pub fn new(values: Map<String, Value>) -> Self {
        Self { values }
    }

    pub fn get(&self, key: &str) -> Result<&Value, StacError> {
        self.find(key)
            .ok_or_else(|| StacError::MissingProperty(key.to_string()))
    }

    /// Exact match first, so namespaced keys and literal dotted keys win over
    /// nested traversal.
    pub fn find(&self, key: &str) -> Option<&Value> {
        if let Some(value) = self.values.get(key) {
            return Some(value);
        }
        let mut parts = key.split('.');
        let mut current = self.values.get(parts.next()?)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }

    pub fn find_str(&self, key: &str) -> Option<&str> {
        self.find(key).and_then(Value::as_str)
    }

    /// Curated display ordering: id, collection, datetime, then any `eo:*`
    /// fields in first-seen order.
    pub fn summary_keys(&self) -> Vec<&str> {
        let mut keys = Vec::new();
        for fixed in ["id", "collection", "datetime"] {
            if let Some((key, _)) = self.values.get_key_value(fixed) {
                keys.push(key.as_str());
            }
        }
        for key in self.values.keys() {
            if key.starts_with("eo:") {
                keys.push(key.as_str());
            }
        }
        keys
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn store() -> PropertyStore {
        let Value::Object(map) = json!({
            "id": "testscene",
            "collection": "landsat-8-l1",
            "datetime": "2017-01-01T00:00:00Z",
            "eo:platform": "landsat-8",
            "eo:cloud_cover": 12,
            "landsat": {"wrs_path": 13, "wrs_row": 30}
        }) else {
            unreachable!()
        };
        PropertyStore::new(map)
    }

    #[test]
    fn exact_and_namespaced_lookup() {
        let store = store();
        assert_eq!(store.find_str("id"), Some("testscene"));
        assert_eq!(store.find_str("eo:platform"), Some("landsat-8"));
    }

    #[test]
    fn dotted_lookup_traverses_nested_objects() {
        let store = store();
        assert_eq!(store.find("landsat.wrs_path"), Some(&json!(13)));
        assert_eq!(store.find("landsat.missing"), None);
    }

    #[test]
    fn get_reports_missing_key() {
        let err = store().get("nope").unwrap_err();
        assert_matches!(err, StacError::MissingProperty(_));
    }

    #[test]
    fn summary_keys_are_ordered() {
        assert_eq!(
            store().summary_keys(),
            vec!["id", "collection", "datetime", "eo:platform", "eo:cloud_cover"]
        );
    }
}
