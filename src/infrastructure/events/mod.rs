//! Event Bus Module
//!
//! Redis connection management and the pub/sub implementation of the
//! `EventPublisher` port. Publishing is fire-and-forget from the caller's
//! perspective: the verification services log a failed publish and keep
//! the committed state.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::Client;
use tracing::{info, instrument};

use crate::config::RedisSettings;
use crate::domain::events::{EventPublisher, VerificationEvent};
use crate::shared::error::AppError;

/// Creates a Redis connection manager with automatic reconnection.
///
/// # Arguments
/// * `settings` - Redis configuration settings
///
/// # Returns
/// * `Ok(ConnectionManager)` - On successful connection
/// * `Err(redis::RedisError)` - If connection fails
#[instrument(skip(settings), fields(url = %settings.url))]
pub async fn create_redis_connection(
    settings: &RedisSettings,
) -> Result<ConnectionManager, redis::RedisError> {
    info!("Connecting to Redis...");
    let client = Client::open(settings.url.as_str())?;
    let manager = ConnectionManager::new(client).await?;
    info!("Redis connection established");
    Ok(manager)
}

/// Redis pub/sub implementation of the event bus port.
pub struct RedisEventPublisher {
    conn: ConnectionManager,
    channel: String,
}

impl RedisEventPublisher {
    /// Create a publisher on the given channel.
    pub fn new(conn: ConnectionManager, channel: impl Into<String>) -> Self {
        Self {
            conn,
            channel: channel.into(),
        }
    }
}

#[async_trait]
impl EventPublisher for RedisEventPublisher {
    /// Publish a verification event on the configured channel.
    async fn publish(&self, event: &VerificationEvent) -> Result<(), AppError> {
        let payload = serde_json::to_string(event)
            .map_err(|e| AppError::Internal(format!("Failed to encode event: {}", e)))?;

        let mut conn = self.conn.clone();
        let receivers: i64 = redis::cmd("PUBLISH")
            .arg(&self.channel)
            .arg(payload)
            .query_async(&mut conn)
            .await?;

        tracing::debug!(
            event = event.event_name(),
            channel = %self.channel,
            receivers = receivers,
            "Verification event published"
        );

        Ok(())
    }
}
