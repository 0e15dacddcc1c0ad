use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum StacError {
    #[error("invalid item record: {0}")]
    InvalidItem(String),

    #[error("invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("property not found: {0}")]
    MissingProperty(String),

    #[error("unresolved template placeholder: ${{{0}}}")]
    UnresolvedPlaceholder(String),

    #[error("geometry error: {0}")]
    Geometry(String),

    #[error("{0}")]
    Validation(String),

    #[error("transfer failed: {0}")]
    Transport(String),

    #[error("transfer returned status {status}: {message}")]
    TransportStatus { status: u16, message: String },

    #[error("filesystem error: {0}")]
    Filesystem(String),

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),
}
