use domain::{Conversation, Message, Timestamp, User};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDto {
    pub id: Uuid,
    pub username: String,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: Uuid::from(user.id),
            username: user.username.as_str().to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationDto {
    pub id: Uuid,
    pub users: Vec<UserDto>,
    pub created_at: Timestamp,
}

impl ConversationDto {
    pub fn from_parts(conversation: &Conversation, users: &[&User]) -> Self {
        Self {
            id: Uuid::from(conversation.id),
            users: users.iter().map(|user| UserDto::from(*user)).collect(),
            created_at: conversation.created_at,
        }
    }
}

/// 消息快照：变更那一刻的完整字段，同时用作 HTTP 响应和通知负载。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDto {
    pub id: Uuid,
    pub content: String,
    pub author: UserDto,
    pub conversation_id: Uuid,
    pub image: Option<String>,
    pub is_liked: bool,
    pub created_at: Timestamp,
}

impl MessageDto {
    pub fn from_parts(message: &Message, author: &User) -> Self {
        Self {
            id: Uuid::from(message.id),
            content: message.content.as_str().to_owned(),
            author: UserDto::from(author),
            conversation_id: Uuid::from(message.conversation_id),
            image: message.image.as_ref().map(|img| img.as_str().to_owned()),
            is_liked: message.is_liked,
            created_at: message.created_at,
        }
    }
}
