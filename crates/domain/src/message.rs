use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::{ConversationId, ImageRef, MessageBody, MessageId, Timestamp, UserId};

/// 消息实体。创建后只有 is_liked 标记可变。
///
/// liked 是单个共享标记（非按用户计数），并发切换采用
/// last-writer-wins 语义，原子性由存储层保证。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub author_id: UserId,
    pub content: MessageBody,
    pub image: Option<ImageRef>,
    pub is_liked: bool,
    pub created_at: Timestamp,
}

impl Message {
    /// 创建新消息。空正文只有在附带图片时才合法。
    pub fn new(
        id: MessageId,
        conversation_id: ConversationId,
        author_id: UserId,
        content: MessageBody,
        image: Option<ImageRef>,
        created_at: Timestamp,
    ) -> Result<Self, DomainError> {
        if content.is_empty() && image.is_none() {
            return Err(DomainError::invalid_argument(
                "content",
                "message requires text content or an image",
            ));
        }

        Ok(Self {
            id,
            conversation_id,
            author_id,
            content,
            image,
            is_liked: false,
            created_at,
        })
    }

    /// 翻转 liked 标记并返回新值。作者本人不得调用，校验在应用层。
    pub fn toggle_like(&mut self) -> bool {
        self.is_liked = !self.is_liked;
        self.is_liked
    }
}
