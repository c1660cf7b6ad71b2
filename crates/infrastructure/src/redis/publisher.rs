//! Redis 事件发布者
//!
//! 把已提交的消息事件序列化后发到会话频道，频道名就是事件主题。
//! 连接由 ConnectionManager 维护，断线自动重连。

use application::publisher::{EventPublisher, OutboundEvent, PublishError};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use tracing::debug;

use super::{RedisError, RedisResult};

pub struct RedisEventPublisher {
    connection: ConnectionManager,
}

impl RedisEventPublisher {
    /// 建立到 Redis 的托管连接。
    pub async fn connect(url: &str) -> RedisResult<Self> {
        let client = redis::Client::open(url).map_err(|err| RedisError::ConfigError {
            message: format!("invalid redis url: {}", err),
        })?;
        let connection = client.get_connection_manager().await?;
        Ok(Self { connection })
    }

    async fn publish_json(&self, channel: &str, payload: &str) -> RedisResult<u32> {
        let mut connection = self.connection.clone();
        let subscribers: u32 = redis::cmd("PUBLISH")
            .arg(channel)
            .arg(payload)
            .query_async(&mut connection)
            .await
            .map_err(|err| RedisError::PublishError {
                message: err.to_string(),
            })?;
        Ok(subscribers)
    }
}

#[async_trait]
impl EventPublisher for RedisEventPublisher {
    async fn publish(&self, event: OutboundEvent) -> Result<(), PublishError> {
        let payload =
            serde_json::to_string(&event).map_err(|err| PublishError::failed(err.to_string()))?;

        let subscribers = self
            .publish_json(&event.topic, &payload)
            .await
            .map_err(|err| PublishError::failed(err.to_string()))?;

        debug!(topic = %event.topic, subscribers, "event published");
        Ok(())
    }
}
