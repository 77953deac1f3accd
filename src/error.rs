use std::path::PathBuf;

/// Errors raised while configuring a machine or loading its assets.
/// The animation core itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid machine config: {0}")]
    Config(String),
    #[error("failed to parse machine config: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to read symbol image {path}: {source}")]
    Asset {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
