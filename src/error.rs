use thiserror::Error;

/// Failures that can stop the engine from coming up. Once the service is
/// accepting traffic, the status read path never surfaces these; it
/// answers closed instead.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("could not obtain a database connection: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}
