use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::{ConversationId, Timestamp, UserId};

/// 规范化的双人会话成员对。
///
/// 始终按 uuid 升序保存为 (low, high)，因此 (A,B) 与 (B,A)
/// 指向同一个值，查找天然对称；数据库唯一约束也建立在这对列上。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantPair {
    low: UserId,
    high: UserId,
}

impl ParticipantPair {
    pub fn new(a: UserId, b: UserId) -> Result<Self, DomainError> {
        if a == b {
            return Err(DomainError::SelfConversation);
        }
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        Ok(Self { low, high })
    }

    pub fn low(&self) -> UserId {
        self.low
    }

    pub fn high(&self) -> UserId {
        self.high
    }

    pub fn contains(&self, user_id: UserId) -> bool {
        self.low == user_id || self.high == user_id
    }

    pub fn both(&self) -> [UserId; 2] {
        [self.low, self.high]
    }
}

/// 双人会话实体。一旦创建不会删除，消息归属于唯一会话。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub participants: ParticipantPair,
    pub created_at: Timestamp,
}

impl Conversation {
    pub fn new(id: ConversationId, participants: ParticipantPair, created_at: Timestamp) -> Self {
        Self {
            id,
            participants,
            created_at,
        }
    }

    pub fn contains(&self, user_id: UserId) -> bool {
        self.participants.contains(user_id)
    }

    pub fn topic(&self) -> String {
        conversation_topic(self.id)
    }
}

/// 会话通知主题。确定性推导，任何持有会话 id 的客户端都能预先计算。
pub fn conversation_topic(id: ConversationId) -> String {
    format!("conversations/{}", id)
}
