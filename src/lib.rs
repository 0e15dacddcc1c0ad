//! Deterministic retrieval of STAC item assets.
//!
//! An [`item::Item`] wraps one catalog record; a [`store::DownloadStore`]
//! resolves an asset key to a remote href, derives the local destination from
//! configurable `${field}` templates and the item's own properties, and
//! fetches through a [`fetch::Fetcher`] only when that destination does not
//! already exist.

pub mod assets;
pub mod config;
pub mod derive;
pub mod error;
pub mod fetch;
pub mod geom;
pub mod item;
pub mod properties;
pub mod store;
pub mod template;
