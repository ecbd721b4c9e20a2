use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Records snapshot error: {0}")]
    Snapshot(String),

    #[error("Invalid record: {0} is required")]
    InvalidDraft(&'static str),

    #[error("Unknown bucket '{0}' (expected one of: expired, active, expiring1, expiring3, expiring10, all)")]
    UnknownBucket(String),

    #[error("Invalid reference time '{0}': expected an RFC 3339 timestamp")]
    InvalidNow(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
