use thiserror::Error;

/// Errors emitted by the generation engine.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("schema error: {0}")]
    Schema(#[from] xmlseed_core::Error),
    #[error("no usable root element found")]
    NoRootElement,
    #[error("xml output error: {0}")]
    Xml(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
