use thiserror::Error;

/// Core error type shared across xmlseed crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The compiled schema set declares nothing at all.
    #[error("empty schema: the compiled schema set declares no elements, types or attributes")]
    EmptySchema,
    /// The schema violates internal invariants.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
}

/// Convenience alias for results returned by xmlseed crates.
pub type Result<T> = std::result::Result<T, Error>;
