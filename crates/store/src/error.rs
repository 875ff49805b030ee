/// Errors raised while reading samples.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Connection or command failure.
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// The variable reference does not name a known sample source.
    #[error("Invalid variable reference '{0}'")]
    InvalidVariable(String),
}

/// Result alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
