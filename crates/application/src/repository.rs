use async_trait::async_trait;
use domain::{
    Conversation, ConversationId, Message, MessageId, ParticipantPair, RepositoryError, User,
    UserId,
};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: User) -> Result<User, RepositoryError>;
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;
    // 按用户名升序返回全部用户
    async fn list_all(&self) -> Result<Vec<User>, RepositoryError>;
}

#[async_trait]
pub trait ConversationRepository: Send + Sync {
    // 重复的成员对必须返回 RepositoryError::Conflict，
    // 调用方以 conflict-as-lookup 的方式处理并发创建。
    async fn create(&self, conversation: Conversation) -> Result<Conversation, RepositoryError>;
    async fn find_by_id(&self, id: ConversationId)
        -> Result<Option<Conversation>, RepositoryError>;
    async fn find_by_pair(
        &self,
        pair: &ParticipantPair,
    ) -> Result<Option<Conversation>, RepositoryError>;
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn create(&self, message: Message) -> Result<Message, RepositoryError>;
    // 消息不存在或不属于该会话时返回 Ok(None)
    async fn find_in_conversation(
        &self,
        conversation_id: ConversationId,
        message_id: MessageId,
    ) -> Result<Option<Message>, RepositoryError>;
    // 按创建时间升序的完整快照
    async fn list_by_conversation(
        &self,
        conversation_id: ConversationId,
    ) -> Result<Vec<Message>, RepositoryError>;
    // 按消息行原子翻转 liked 标记，返回提交后的值
    async fn toggle_like(
        &self,
        conversation_id: ConversationId,
        message_id: MessageId,
    ) -> Result<bool, RepositoryError>;
}
