//! 消息系统核心领域模型
//!
//! 包含用户、会话、消息等核心实体，以及相关的业务规则。

pub mod conversation;
pub mod errors;
pub mod message;
pub mod user;
pub mod value_objects;

pub use conversation::{conversation_topic, Conversation, ParticipantPair};
pub use errors::{DomainError, RepositoryError};
pub use message::Message;
pub use user::User;
pub use value_objects::{
    ConversationId, ImageRef, MessageBody, MessageId, Timestamp, UserId, Username,
};
