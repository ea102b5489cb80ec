//! Cache error taxonomy

use thiserror::Error;

/// Errors surfaced by the cache backends and the typed service on top.
///
/// Callers on the enrichment path treat all of these as soft: a failed
/// read is a miss, a failed write is logged and dropped.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Backend selection or URL problems caught at construction
    #[error("cache configuration invalid: {0}")]
    Config(String),

    /// Backend unreachable (pool construction, PING, connection loss)
    #[error("cache backend unreachable: {0}")]
    Connection(String),

    /// Stored bytes could not be encoded or decoded as MessagePack
    #[error("cache value codec failure: {0}")]
    Serialization(String),

    #[error("redis command failed: {0}")]
    Redis(#[from] deadpool_redis::redis::RedisError),

    #[error("redis pool error: {0}")]
    Pool(#[from] deadpool_redis::PoolError),
}
