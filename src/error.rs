use std::path::PathBuf;

use thiserror::Error;

use crate::types::SceneId;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("scene '{0}' is not registered")]
    UnknownScene(SceneId),
    #[error("failed to load scene asset {path}: {reason}")]
    Asset { path: PathBuf, reason: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("failed to read image {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("failed to decode image {url}: {reason}")]
    Decode { url: String, reason: String },
    #[error("unsupported image location {0}")]
    Unsupported(String),
}

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("failed to read museum metadata {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse museum metadata {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnnotationError {
    /// Slot is not registered in the current scene; stale responses land here
    #[error("unknown annotation slot '{0}'")]
    UnknownSlot(String),
    #[error("annotation surface '{0}' has no geometry")]
    MissingGeometry(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}
