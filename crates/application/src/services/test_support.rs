//! 服务层测试用的内存端口实现。
//!
//! 语义与真实适配器对齐：会话仓库对重复成员对返回 Conflict，
//! 消息仓库的 toggle_like 在写锁内完成读改写。

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use domain::{
    Conversation, ConversationId, Message, MessageId, ParticipantPair, RepositoryError, Timestamp,
    User, UserId, Username,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    blob::{BlobError, BlobStore},
    clock::Clock,
    publisher::{EventPublisher, OutboundEvent, PublishError},
    repository::{ConversationRepository, MessageRepository, UserRepository},
};

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub async fn seed(&self, username: &str) -> User {
        let user = User::new(
            UserId(Uuid::new_v4()),
            Username::parse(username).unwrap(),
            chrono::Utc::now(),
        );
        self.users.write().await.insert(user.id, user.clone());
        user
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, RepositoryError> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|existing| existing.username == user.username)
        {
            return Err(RepositoryError::Conflict);
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.username.as_str() == username)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, RepositoryError> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by(|a, b| a.username.as_str().cmp(b.username.as_str()));
        Ok(users)
    }
}

#[derive(Default)]
pub struct InMemoryConversationRepository {
    rows: RwLock<HashMap<ConversationId, Conversation>>,
}

impl InMemoryConversationRepository {
    pub async fn count(&self) -> usize {
        self.rows.read().await.len()
    }
}

#[async_trait]
impl ConversationRepository for InMemoryConversationRepository {
    async fn create(&self, conversation: Conversation) -> Result<Conversation, RepositoryError> {
        let mut rows = self.rows.write().await;
        if rows
            .values()
            .any(|existing| existing.participants == conversation.participants)
        {
            return Err(RepositoryError::Conflict);
        }
        rows.insert(conversation.id, conversation.clone());
        Ok(conversation)
    }

    async fn find_by_id(
        &self,
        id: ConversationId,
    ) -> Result<Option<Conversation>, RepositoryError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn find_by_pair(
        &self,
        pair: &ParticipantPair,
    ) -> Result<Option<Conversation>, RepositoryError> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .find(|conversation| conversation.participants == *pair)
            .cloned())
    }
}

#[derive(Default)]
pub struct InMemoryMessageRepository {
    rows: RwLock<Vec<Message>>,
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn create(&self, message: Message) -> Result<Message, RepositoryError> {
        self.rows.write().await.push(message.clone());
        Ok(message)
    }

    async fn find_in_conversation(
        &self,
        conversation_id: ConversationId,
        message_id: MessageId,
    ) -> Result<Option<Message>, RepositoryError> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .find(|message| {
                message.id == message_id && message.conversation_id == conversation_id
            })
            .cloned())
    }

    async fn list_by_conversation(
        &self,
        conversation_id: ConversationId,
    ) -> Result<Vec<Message>, RepositoryError> {
        let mut messages: Vec<Message> = self
            .rows
            .read()
            .await
            .iter()
            .filter(|message| message.conversation_id == conversation_id)
            .cloned()
            .collect();
        messages.sort_by_key(|message| message.created_at);
        Ok(messages)
    }

    async fn toggle_like(
        &self,
        conversation_id: ConversationId,
        message_id: MessageId,
    ) -> Result<bool, RepositoryError> {
        let mut rows = self.rows.write().await;
        let message = rows
            .iter_mut()
            .find(|message| {
                message.id == message_id && message.conversation_id == conversation_id
            })
            .ok_or(RepositoryError::NotFound)?;
        Ok(message.toggle_like())
    }
}

/// 记录发出的事件，可切换为失败模式模拟 hub 不可用。
#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<OutboundEvent>>,
    fail: AtomicBool,
}

impl RecordingPublisher {
    pub fn fail_next_publishes(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn events(&self) -> Vec<OutboundEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, event: OutboundEvent) -> Result<(), PublishError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(PublishError::failed("hub unavailable"));
        }
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingBlobStore {
    files: Mutex<Vec<(String, Vec<u8>)>>,
}

impl RecordingBlobStore {
    pub fn files(&self) -> Vec<(String, Vec<u8>)> {
        self.files.lock().unwrap().clone()
    }
}

#[async_trait]
impl BlobStore for RecordingBlobStore {
    async fn store(&self, filename: &str, bytes: &[u8]) -> Result<(), BlobError> {
        self.files
            .lock()
            .unwrap()
            .push((filename.to_owned(), bytes.to_vec()));
        Ok(())
    }
}

/// 每次调用都往前走一格，保证同一测试内时间戳严格递增。
pub struct TickingClock {
    base: Timestamp,
    ticks: std::sync::atomic::AtomicI64,
}

impl Default for TickingClock {
    fn default() -> Self {
        Self {
            base: chrono::Utc::now(),
            ticks: std::sync::atomic::AtomicI64::new(0),
        }
    }
}

impl Clock for TickingClock {
    fn now(&self) -> Timestamp {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
        self.base + chrono::Duration::milliseconds(tick)
    }
}

pub struct TestHarness {
    pub users: Arc<InMemoryUserRepository>,
    pub conversations: Arc<InMemoryConversationRepository>,
    pub messages: Arc<InMemoryMessageRepository>,
    pub publisher: Arc<RecordingPublisher>,
    pub blobs: Arc<RecordingBlobStore>,
    pub conversation_service: super::ConversationService,
    pub message_service: super::MessageService,
}

impl TestHarness {
    pub fn new() -> Self {
        let users = Arc::new(InMemoryUserRepository::default());
        let conversations = Arc::new(InMemoryConversationRepository::default());
        let messages = Arc::new(InMemoryMessageRepository::default());
        let publisher = Arc::new(RecordingPublisher::default());
        let blobs = Arc::new(RecordingBlobStore::default());
        let clock: Arc<dyn Clock> = Arc::new(TickingClock::default());
        let locks = Arc::new(crate::locks::ConversationLocks::new());

        let conversation_service =
            super::ConversationService::new(super::ConversationServiceDependencies {
                user_repository: users.clone(),
                conversation_repository: conversations.clone(),
                clock: clock.clone(),
            });

        let message_service = super::MessageService::new(super::MessageServiceDependencies {
            conversation_repository: conversations.clone(),
            message_repository: messages.clone(),
            user_repository: users.clone(),
            blob_store: blobs.clone(),
            publisher: publisher.clone(),
            clock,
            locks,
        });

        Self {
            users,
            conversations,
            messages,
            publisher,
            blobs,
            conversation_service,
            message_service,
        }
    }
}
