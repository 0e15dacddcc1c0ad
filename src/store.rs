use std::fs;

use camino::Utf8PathBuf;
use tracing::{debug, info};

use crate::assets;
use crate::error::StacError;
use crate::fetch::Fetcher;
use crate::item::Item;
use crate::template;

/// Path and filename templates consumed at the time of each `download` call.
/// Replacing the config on a store affects only subsequent calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadConfig {
    /// Directory template. Empty means the current directory.
    pub data_dir: String,
    /// Filename template; the asset key and extension are always appended.
    pub filename: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            data_dir: ".".to_string(),
            filename: template::DEFAULT_FILENAME.to_string(),
        }
    }
}

/// Orchestrates asset retrieval: resolve asset, derive the destination path
/// from the item's own properties, and fetch only when the destination does
/// not already exist. The cache is keyed purely by the resulting path.
pub struct DownloadStore<F: Fetcher> {
    config: DownloadConfig,
    fetcher: F,
}

impl<F: Fetcher> DownloadStore<F> {
    pub fn new(config: DownloadConfig, fetcher: F) -> Self {
        Self { config, fetcher }
    }

    pub fn config(&self) -> &DownloadConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: DownloadConfig) {
        self.config = config;
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Returns the local path for `key`, fetching at most once per distinct
    /// (item, key, configured-templates) triple. `Ok(None)` means the item
    /// has no matching asset; no filesystem interaction happens in that case.
    pub fn download(&self, item: &Item, key: &str) -> Result<Option<Utf8PathBuf>, StacError> {
        let Some(asset) = assets::resolve(item, key) else {
            debug!(item = %item, key, "no matching asset");
            return Ok(None);
        };

        let dir = template::resolve(&self.config.data_dir, item)?;
        let name = template::filename(&self.config.filename, item, key, asset)?;
        let destination = if dir.is_empty() {
            Utf8PathBuf::from(name)
        } else {
            Utf8PathBuf::from(dir).join(name)
        };

        if destination.as_std_path().exists() {
            debug!(item = %item, key, path = %destination, "destination exists, skipping fetch");
            return Ok(Some(destination));
        }

        if let Some(parent) = destination.parent().filter(|parent| !parent.as_str().is_empty()) {
            fs::create_dir_all(parent.as_std_path())
                .map_err(|err| StacError::Filesystem(err.to_string()))?;
        }

        info!(item = %item, key, href = %asset.href, path = %destination, "fetching asset");
        self.fetcher.fetch(&asset.href, destination.as_std_path())?;
        Ok(Some(destination))
    }

    /// Downloads every asset recorded on the item, skipping none; keys with
    /// no resolvable file are omitted from the result.
    pub fn download_all(&self, item: &Item) -> Result<Vec<(String, Utf8PathBuf)>, StacError> {
        let mut downloaded = Vec::new();
        for key in item.assets().keys() {
            if let Some(path) = self.download(item, key)? {
                downloaded.push((key.clone(), path));
            }
        }
        Ok(downloaded)
    }
}
