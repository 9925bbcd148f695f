//! Error types for configuration and region loading

/// Errors raised while reading viewer configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}")]
    InvalidValue(String),
}

/// Errors raised while loading a region file
#[derive(Debug, thiserror::Error)]
pub enum RegionsError {
    #[error("region file parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate shape id {0}")]
    DuplicateId(String),
}
