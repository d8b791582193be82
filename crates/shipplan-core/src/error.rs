use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ShipplanError {
    #[error("failed to load trip configuration from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("invalid trip configuration: {0}")]
    ConfigInvalid(String),

    #[error("failed to load order lines from {path}: {reason}")]
    InputLoad { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
