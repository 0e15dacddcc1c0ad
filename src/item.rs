use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::assets::{self, AssetDescriptor};
use crate::error::StacError;
use crate::geom::{self, Geometry};
use crate::properties::PropertyStore;

/// One catalog metadata record: a scene's properties, footprint geometry and
/// downloadable assets. Read-only after construction; the bounding box is the
/// only memoized state.
#[derive(Debug)]
pub struct Item {
    id: String,
    datetime: String,
    date: NaiveDate,
    properties: PropertyStore,
    geometry: Geometry,
    assets: BTreeMap<String, AssetDescriptor>,
    links: BTreeMap<String, Link>,
    bbox: OnceLock<[f64; 4]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    /// Validates a raw catalog record. `properties.id` and
    /// `properties.datetime` are required, as is a non-empty geometry.
    pub fn new(record: Value) -> Result<Self, StacError> {
        let Value::Object(mut record) = record else {
            return Err(StacError::InvalidItem(
                "item record must be a JSON object".to_string(),
            ));
        };

        let properties = match record.remove("properties") {
            Some(Value::Object(map)) => PropertyStore::new(map),
            _ => {
                return Err(StacError::InvalidItem(
                    "missing properties object".to_string(),
                ));
            }
        };
        let id = properties
            .find_str("id")
            .ok_or_else(|| StacError::InvalidItem("missing required property: id".to_string()))?
            .to_string();
        let datetime = properties
            .find_str("datetime")
            .ok_or_else(|| {
                StacError::InvalidItem("missing required property: datetime".to_string())
            })?
            .to_string();
        let date = parse_date(&datetime)?;

        let geometry: Geometry = match record.remove("geometry") {
            Some(value) => serde_json::from_value(value)
                .map_err(|err| StacError::Geometry(err.to_string()))?,
            None => return Err(StacError::InvalidItem("missing geometry".to_string())),
        };
        if geometry.is_empty() {
            return Err(StacError::Geometry("geometry has no positions".to_string()));
        }

        let assets = match record.remove("assets") {
            Some(value) => serde_json::from_value(value)
                .map_err(|err| StacError::InvalidItem(format!("invalid assets: {err}")))?,
            None => BTreeMap::new(),
        };
        let links = match record.remove("links") {
            Some(value) => serde_json::from_value(value)
                .map_err(|err| StacError::InvalidItem(format!("invalid links: {err}")))?,
            None => BTreeMap::new(),
        };

        Ok(Self {
            id,
            datetime,
            date,
            properties,
            geometry,
            assets,
            links,
            bbox: OnceLock::new(),
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StacError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|err| {
            StacError::Filesystem(format!("read item {}: {err}", path.display()))
        })?;
        let record: Value = serde_json::from_str(&content)
            .map_err(|err| StacError::InvalidItem(err.to_string()))?;
        Self::new(record)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn datetime(&self) -> &str {
        &self.datetime
    }

    /// The day component of `datetime`, fixed for the item's lifetime.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn collection(&self) -> Option<&str> {
        self.properties.find_str("collection")
    }

    pub fn properties(&self) -> &PropertyStore {
        &self.properties
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Lazily computed from the geometry, cached after the first call.
    pub fn bbox(&self) -> [f64; 4] {
        *self.bbox.get_or_init(|| geom::bounds(&self.geometry))
    }

    pub fn assets(&self) -> &BTreeMap<String, AssetDescriptor> {
        &self.assets
    }

    pub fn links(&self) -> &BTreeMap<String, Link> {
        &self.links
    }

    /// Resolves an asset key exactly, then through the band-name alias table.
    /// `None` means no file is available for this key, a routine outcome for
    /// heterogeneous collections.
    pub fn asset(&self, key: &str) -> Option<&AssetDescriptor> {
        assets::resolve(self, key)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

fn parse_date(datetime: &str) -> Result<NaiveDate, StacError> {
    let day = datetime.split('T').next().unwrap_or(datetime);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|_| StacError::InvalidDatetime(datetime.to_string()))
}
