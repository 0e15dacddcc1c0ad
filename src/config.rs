use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::StacError;
use crate::store::DownloadConfig;

/// On-disk config file (`stac-am.json`). Both fields are optional; omitted
/// fields fall back to the built-in templates.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub data_dir: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Resolves download templates from an optional config file. An explicit
    /// path must exist; the default `stac-am.json` is only read when present.
    pub fn resolve(path: Option<&str>) -> Result<DownloadConfig, StacError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from("stac-am.json"),
        };

        if path.is_none() && !config_path.exists() {
            return Ok(DownloadConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|_| StacError::ConfigRead(config_path.clone()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| StacError::ConfigParse(err.to_string()))?;

        Ok(Self::resolve_config(config))
    }

    pub fn resolve_config(config: Config) -> DownloadConfig {
        let defaults = DownloadConfig::default();
        DownloadConfig {
            data_dir: config.data_dir.unwrap_or(defaults.data_dir),
            filename: config.filename.unwrap_or(defaults.filename),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_keeps_defaults() {
        let resolved = ConfigLoader::resolve_config(Config::default());
        assert_eq!(resolved, DownloadConfig::default());
    }

    #[test]
    fn config_overrides_templates() {
        let config = Config {
            data_dir: Some("${collection}/${date}".to_string()),
            filename: Some("${date}_${id}".to_string()),
        };
        let resolved = ConfigLoader::resolve_config(config);
        assert_eq!(resolved.data_dir, "${collection}/${date}");
        assert_eq!(resolved.filename, "${date}_${id}");
    }
}
