//! Postgres 仓储实现。
//!
//! 行结构体经 TryFrom 转回领域实体；唯一约束冲突映射为
//! RepositoryError::Conflict，由应用层退回为查找。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{
    Conversation, ConversationId, Message, MessageBody, MessageId, ParticipantPair,
    RepositoryError, User, UserId, Username,
};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};
use uuid::Uuid;

use application::repository::{ConversationRepository, MessageRepository, UserRepository};

fn map_sqlx_err(err: sqlx::Error) -> RepositoryError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => RepositoryError::Conflict,
        sqlx::Error::RowNotFound => RepositoryError::NotFound,
        _ => RepositoryError::storage(err.to_string()),
    }
}

fn invalid_data(message: impl Into<String>) -> RepositoryError {
    RepositoryError::storage(message)
}

#[derive(Debug, FromRow)]
struct UserRecord {
    id: Uuid,
    username: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRecord> for User {
    type Error = RepositoryError;

    fn try_from(value: UserRecord) -> Result<Self, Self::Error> {
        let username =
            Username::parse(value.username).map_err(|err| invalid_data(err.to_string()))?;

        Ok(User::new(
            UserId::from(value.id),
            username,
            value.created_at,
        ))
    }
}

#[derive(Debug, FromRow)]
struct ConversationRecord {
    id: Uuid,
    participant_low: Uuid,
    participant_high: Uuid,
    created_at: DateTime<Utc>,
}

impl TryFrom<ConversationRecord> for Conversation {
    type Error = RepositoryError;

    fn try_from(value: ConversationRecord) -> Result<Self, Self::Error> {
        // CHECK 约束保证 low < high，相等只可能是数据损坏
        let participants = ParticipantPair::new(
            UserId::from(value.participant_low),
            UserId::from(value.participant_high),
        )
        .map_err(|err| invalid_data(err.to_string()))?;

        Ok(Conversation::new(
            ConversationId::from(value.id),
            participants,
            value.created_at,
        ))
    }
}

#[derive(Debug, FromRow)]
struct MessageRecord {
    id: Uuid,
    conversation_id: Uuid,
    author_id: Uuid,
    content: String,
    image: Option<String>,
    is_liked: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<MessageRecord> for Message {
    type Error = RepositoryError;

    fn try_from(value: MessageRecord) -> Result<Self, Self::Error> {
        let content =
            MessageBody::new(value.content).map_err(|err| invalid_data(err.to_string()))?;
        let image = value
            .image
            .map(domain::ImageRef::new)
            .transpose()
            .map_err(|err| invalid_data(err.to_string()))?;

        let mut message = Message::new(
            MessageId::from(value.id),
            ConversationId::from(value.conversation_id),
            UserId::from(value.author_id),
            content,
            image,
            value.created_at,
        )
        .map_err(|err| invalid_data(err.to_string()))?;
        message.is_liked = value.is_liked;
        Ok(message)
    }
}

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: User) -> Result<User, RepositoryError> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (id, username, created_at)
            VALUES ($1, $2, $3)
            RETURNING id, username, created_at
            "#,
        )
        .bind(Uuid::from(user.id))
        .bind(user.username.as_str())
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        User::try_from(record)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"SELECT id, username, created_at FROM users WHERE id = $1"#,
        )
        .bind(Uuid::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        record.map(User::try_from).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"SELECT id, username, created_at FROM users WHERE username = $1"#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        record.map(User::try_from).transpose()
    }

    async fn list_all(&self) -> Result<Vec<User>, RepositoryError> {
        let records = sqlx::query_as::<_, UserRecord>(
            r#"SELECT id, username, created_at FROM users ORDER BY username"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        records.into_iter().map(User::try_from).collect()
    }
}

#[derive(Clone)]
pub struct PgConversationRepository {
    pool: PgPool,
}

impl PgConversationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationRepository for PgConversationRepository {
    async fn create(&self, conversation: Conversation) -> Result<Conversation, RepositoryError> {
        // (participant_low, participant_high) 上的唯一索引兜住并发创建
        let record = sqlx::query_as::<_, ConversationRecord>(
            r#"
            INSERT INTO conversations (id, participant_low, participant_high, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, participant_low, participant_high, created_at
            "#,
        )
        .bind(Uuid::from(conversation.id))
        .bind(Uuid::from(conversation.participants.low()))
        .bind(Uuid::from(conversation.participants.high()))
        .bind(conversation.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Conversation::try_from(record)
    }

    async fn find_by_id(
        &self,
        id: ConversationId,
    ) -> Result<Option<Conversation>, RepositoryError> {
        let record = sqlx::query_as::<_, ConversationRecord>(
            r#"
            SELECT id, participant_low, participant_high, created_at
            FROM conversations WHERE id = $1
            "#,
        )
        .bind(Uuid::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        record.map(Conversation::try_from).transpose()
    }

    async fn find_by_pair(
        &self,
        pair: &ParticipantPair,
    ) -> Result<Option<Conversation>, RepositoryError> {
        let record = sqlx::query_as::<_, ConversationRecord>(
            r#"
            SELECT id, participant_low, participant_high, created_at
            FROM conversations
            WHERE participant_low = $1 AND participant_high = $2
            "#,
        )
        .bind(Uuid::from(pair.low()))
        .bind(Uuid::from(pair.high()))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        record.map(Conversation::try_from).transpose()
    }
}

#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    async fn create(&self, message: Message) -> Result<Message, RepositoryError> {
        let record = sqlx::query_as::<_, MessageRecord>(
            r#"
            INSERT INTO messages (id, conversation_id, author_id, content, image, is_liked, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, conversation_id, author_id, content, image, is_liked, created_at
            "#,
        )
        .bind(Uuid::from(message.id))
        .bind(Uuid::from(message.conversation_id))
        .bind(Uuid::from(message.author_id))
        .bind(message.content.as_str())
        .bind(message.image.as_ref().map(|img| img.as_str()))
        .bind(message.is_liked)
        .bind(message.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Message::try_from(record)
    }

    async fn find_in_conversation(
        &self,
        conversation_id: ConversationId,
        message_id: MessageId,
    ) -> Result<Option<Message>, RepositoryError> {
        let record = sqlx::query_as::<_, MessageRecord>(
            r#"
            SELECT id, conversation_id, author_id, content, image, is_liked, created_at
            FROM messages
            WHERE id = $2 AND conversation_id = $1
            "#,
        )
        .bind(Uuid::from(conversation_id))
        .bind(Uuid::from(message_id))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        record.map(Message::try_from).transpose()
    }

    async fn list_by_conversation(
        &self,
        conversation_id: ConversationId,
    ) -> Result<Vec<Message>, RepositoryError> {
        let records = sqlx::query_as::<_, MessageRecord>(
            r#"
            SELECT id, conversation_id, author_id, content, image, is_liked, created_at
            FROM messages
            WHERE conversation_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(Uuid::from(conversation_id))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        records.into_iter().map(Message::try_from).collect()
    }

    async fn toggle_like(
        &self,
        conversation_id: ConversationId,
        message_id: MessageId,
    ) -> Result<bool, RepositoryError> {
        // 单条 UPDATE 完成读改写，返回值就是本次提交的标记
        let row: Option<(bool,)> = sqlx::query_as(
            r#"
            UPDATE messages
            SET is_liked = NOT is_liked
            WHERE id = $2 AND conversation_id = $1
            RETURNING is_liked
            "#,
        )
        .bind(Uuid::from(conversation_id))
        .bind(Uuid::from(message_id))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        match row {
            Some((is_liked,)) => Ok(is_liked),
            None => Err(RepositoryError::NotFound),
        }
    }
}

pub async fn create_pg_pool(
    database_url: &str,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}
