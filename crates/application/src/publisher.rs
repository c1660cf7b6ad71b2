use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::dto::MessageDto;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageEventKind {
    Posted,
    LikeToggled,
}

/// 一次消息变更对应的事件，负载是变更后的消息快照。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEvent {
    pub kind: MessageEventKind,
    pub conversation_id: Uuid,
    pub message: MessageDto,
}

/// 发往 pub/sub hub 的事件信封。
///
/// private 标记该主题需要授权订阅，订阅端鉴权由 hub 自己负责。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundEvent {
    pub topic: String,
    pub private: bool,
    pub event: MessageEvent,
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("publish failed: {0}")]
    Failed(String),
}

impl PublishError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: OutboundEvent) -> Result<(), PublishError>;
}
