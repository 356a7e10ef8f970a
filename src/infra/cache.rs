//! Redis cache.
//!
//! Backs the fixed-window request limiter and the health probe.

use async_trait::async_trait;
use redis::{aio::ConnectionManager, Client, RedisError};

use crate::config::{Config, CACHE_PREFIX_RATE_LIMIT};
use crate::errors::{AppError, AppResult};

/// Counts requests per client key inside fixed windows.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Record one request against `identifier`.
    /// Returns (current_count, is_allowed).
    async fn check_rate_limit(
        &self,
        identifier: &str,
        max_requests: u64,
        window_seconds: u64,
    ) -> AppResult<(u64, bool)>;
}

/// Redis cache wrapper with connection pooling.
#[derive(Clone)]
pub struct Cache {
    connection: ConnectionManager,
}

impl Cache {
    /// Create a new cache instance and connect to Redis.
    ///
    /// # Panics
    /// Panics if Redis connection fails.
    pub async fn connect(config: &Config) -> Self {
        match Self::try_connect(config).await {
            Ok(cache) => {
                tracing::info!("Redis cache connected");
                cache
            }
            Err(e) => panic!("Failed to connect to Redis: {}", e),
        }
    }

    /// Try to connect to Redis, returning an error instead of panicking.
    pub async fn try_connect(config: &Config) -> Result<Self, RedisError> {
        let client = Client::open(config.redis_url.as_str())?;
        let connection = ConnectionManager::new(client).await?;

        Ok(Self { connection })
    }

    /// Round-trip a PING.
    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(cache_error)?;
        Ok(())
    }
}

#[async_trait]
impl RateLimiter for Cache {
    async fn check_rate_limit(
        &self,
        identifier: &str,
        max_requests: u64,
        window_seconds: u64,
    ) -> AppResult<(u64, bool)> {
        let key = rate_limit_key(identifier);
        let mut conn = self.connection.clone();

        // SET NX starts the window without extending it on later hits
        let (count,): (i64,) = redis::pipe()
            .atomic()
            .cmd("SET")
            .arg(&key)
            .arg(0)
            .arg("EX")
            .arg(window_seconds)
            .arg("NX")
            .ignore()
            .incr(&key, 1)
            .query_async(&mut conn)
            .await
            .map_err(cache_error)?;

        let count = count.max(0) as u64;
        Ok((count, count <= max_requests))
    }
}

fn rate_limit_key(identifier: &str) -> String {
    format!("{}{}", CACHE_PREFIX_RATE_LIMIT, identifier)
}

/// Convert Redis error to AppError.
fn cache_error(e: RedisError) -> AppError {
    tracing::error!("Redis error: {}", e);
    AppError::internal(format!("Cache error: {}", e))
}
