use thiserror::Error;

/// 领域模型错误类型
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid argument: {field}: {reason}")]
    InvalidArgument { field: String, reason: String },
    #[error("user not found")]
    UserNotFound,
    #[error("conversation not found")]
    ConversationNotFound,
    #[error("message not found")]
    MessageNotFound,
    #[error("cannot open a conversation with yourself")]
    SelfConversation,
    #[error("user is not a participant of this conversation")]
    NotAParticipant,
    #[error("author cannot like their own message")]
    CannotLikeOwnMessage,
    #[error("unsupported image type")]
    UnsupportedImageType,
}

impl DomainError {
    pub fn invalid_argument(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// 存储层错误，与具体数据库实现无关。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("requested record not found")]
    NotFound,
    #[error("unique constraint violated")]
    Conflict,
    #[error("storage error: {message}")]
    Storage { message: String },
}

impl RepositoryError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}
