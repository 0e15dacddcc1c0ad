use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::assets::AssetDescriptor;
use crate::error::StacError;
use crate::item::Item;

/// Default filename template. The asset key and extension are appended after
/// expansion, so the resulting name is `${id}_${key}.${ext}`.
pub const DEFAULT_FILENAME: &str = "${id}";

fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid placeholder pattern"))
}

/// Expands `${field}` placeholders left to right. Substituted text is not
/// re-scanned, so property values containing `${...}` stay literal. An empty
/// template yields an empty string.
pub fn resolve(template: &str, item: &Item) -> Result<String, StacError> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;
    for caps in placeholder().captures_iter(template) {
        let matched = caps.get(0).expect("capture group 0 always present");
        out.push_str(&template[last..matched.start()]);
        out.push_str(&resolve_field(&caps[1], item)?);
        last = matched.end();
    }
    out.push_str(&template[last..]);
    Ok(out)
}

/// Destination filename for one asset: the expanded filename template
/// suffixed with the asset key and the file extension derived from the asset.
pub fn filename(
    template: &str,
    item: &Item,
    key: &str,
    asset: &AssetDescriptor,
) -> Result<String, StacError> {
    let template = if template.is_empty() {
        DEFAULT_FILENAME
    } else {
        template
    };
    let base = resolve(template, item)?;
    match extension(asset) {
        Some(ext) => Ok(format!("{base}_{key}.{ext}")),
        None => Ok(format!("{base}_{key}")),
    }
}

/// Derived fields first, then item properties. Only scalar property values
/// can be substituted into a path.
fn resolve_field(name: &str, item: &Item) -> Result<String, StacError> {
    let value = match name {
        "date" => return Ok(item.date().format("%Y-%m-%d").to_string()),
        "year" => return Ok(item.date().format("%Y").to_string()),
        "month" => return Ok(item.date().format("%m").to_string()),
        "day" => return Ok(item.date().format("%d").to_string()),
        _ => item
            .properties()
            .find(name)
            .ok_or_else(|| StacError::UnresolvedPlaceholder(name.to_string()))?,
    };
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        _ => Err(StacError::UnresolvedPlaceholder(name.to_string())),
    }
}

/// Extension from the href basename, falling back to the declared media type.
fn extension(asset: &AssetDescriptor) -> Option<String> {
    let path = asset
        .href
        .split(['?', '#'])
        .next()
        .unwrap_or(asset.href.as_str());
    let name = path.rsplit('/').next().unwrap_or(path);
    if let Some((_, ext)) = name.rsplit_once('.') {
        if !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|ch| ch.is_ascii_alphanumeric()) {
            return Some(ext.to_string());
        }
    }
    asset
        .media_type
        .as_deref()
        .and_then(media_type_extension)
        .map(str::to_string)
}

fn media_type_extension(media_type: &str) -> Option<&'static str> {
    let base = media_type.split(';').next().unwrap_or(media_type).trim();
    match base {
        "text/plain" => Some("txt"),
        "application/json" => Some("json"),
        "application/geo+json" => Some("geojson"),
        "application/xml" | "text/xml" => Some("xml"),
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/tiff" | "image/vnd.stac.geotiff" => Some("tif"),
        "image/jp2" => Some("jp2"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn item() -> Item {
        Item::new(json!({
            "properties": {
                "id": "testscene",
                "collection": "landsat-8-l1",
                "datetime": "2017-01-05T12:30:00Z",
                "eo:platform": "landsat-8",
                "literal": "${id}"
            },
            "geometry": {"type": "Point", "coordinates": [0.0, 0.0]}
        }))
        .unwrap()
    }

    #[test]
    fn expands_derived_fields() {
        let item = item();
        assert_eq!(
            resolve("${year}/${month}/${day}", &item).unwrap(),
            "2017/01/05"
        );
        assert_eq!(resolve("${date}_${id}", &item).unwrap(), "2017-01-05_testscene");
    }

    #[test]
    fn falls_back_to_properties() {
        assert_eq!(
            resolve("${collection}/${eo:platform}", &item()).unwrap(),
            "landsat-8-l1/landsat-8"
        );
    }

    #[test]
    fn unresolved_placeholder_is_fatal() {
        let err = resolve("${nope}", &item()).unwrap_err();
        assert_matches!(err, StacError::UnresolvedPlaceholder(name) if name == "nope");
    }

    #[test]
    fn empty_template_resolves_to_empty_string() {
        assert_eq!(resolve("", &item()).unwrap(), "");
    }

    #[test]
    fn substitution_is_not_recursive() {
        assert_eq!(resolve("${literal}", &item()).unwrap(), "${id}");
    }

    #[test]
    fn filename_appends_key_and_href_extension() {
        let asset: AssetDescriptor =
            serde_json::from_value(json!({"href": "https://host/scene_MTL.txt"})).unwrap();
        assert_eq!(
            filename("${date}_${id}", &item(), "MTL", &asset).unwrap(),
            "2017-01-05_testscene_MTL.txt"
        );
    }

    #[test]
    fn filename_falls_back_to_media_type_extension() {
        let asset: AssetDescriptor = serde_json::from_value(json!({
            "href": "https://host/thumbnail",
            "type": "image/jpeg"
        }))
        .unwrap();
        assert_eq!(
            filename("", &item(), "thumbnail", &asset).unwrap(),
            "testscene_thumbnail.jpg"
        );
    }

    #[test]
    fn filename_without_any_extension_hint() {
        let asset: AssetDescriptor =
            serde_json::from_value(json!({"href": "https://host/blob"})).unwrap();
        assert_eq!(filename("", &item(), "data", &asset).unwrap(), "testscene_data");
    }
}
