use crate::IntervalError;

/// Error type for this crate.
#[derive(Debug, thiserror::Error)]
pub enum TollgateError {
    /// Redis error.
    #[cfg(any(feature = "redis-tokio", feature = "redis-smol"))]
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
    /// The counter store could not be reached or returned a malformed response.
    #[error("counter store unavailable: {0}")]
    StoreUnavailable(String),
    /// The interval supplier failed. The underlying error is surfaced unchanged;
    /// no default interval is substituted.
    #[error("interval supplier failed: {0}")]
    IntervalSupplier(#[source] IntervalError),
    /// Invalid account id.
    #[error("invalid account id: {0}")]
    InvalidAccountId(String),
    /// Invalid key prefix.
    #[cfg(any(feature = "redis-tokio", feature = "redis-smol"))]
    #[error("invalid key prefix: {0}")]
    InvalidKeyPrefix(String),
}
