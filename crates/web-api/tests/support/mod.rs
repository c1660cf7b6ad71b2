//! 端到端测试支撑：内存仓储 + 真实路由栈。
//!
//! 仓储语义与 Postgres 适配器对齐（重复成员对返回 Conflict，
//! toggle_like 原子翻转），图片走真实的文件系统存储和静态路由。

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use domain::{
    Conversation, ConversationId, Message, MessageId, ParticipantPair, RepositoryError, User,
    UserId, Username,
};
use tokio::sync::RwLock;
use tower::ServiceExt;
use uuid::Uuid;

use application::{
    ConversationLocks, ConversationRepository, ConversationService,
    ConversationServiceDependencies, EventPublisher, MessageRepository, MessageService,
    MessageServiceDependencies, OutboundEvent, PublishError, SystemClock, UserRepository,
};
use infrastructure::FsBlobStore;
use web_api::{AppState, IdentityConfig, IdentityVerifier};

#[derive(Default)]
pub struct InMemoryUsers {
    rows: RwLock<HashMap<UserId, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn create(&self, user: User) -> Result<User, RepositoryError> {
        self.rows.write().await.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .find(|user| user.username.as_str() == username)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, RepositoryError> {
        let mut users: Vec<User> = self.rows.read().await.values().cloned().collect();
        users.sort_by(|a, b| a.username.as_str().cmp(b.username.as_str()));
        Ok(users)
    }
}

#[derive(Default)]
pub struct InMemoryConversations {
    rows: RwLock<HashMap<ConversationId, Conversation>>,
}

#[async_trait]
impl ConversationRepository for InMemoryConversations {
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
pub struct InMemoryMessages {
    rows: RwLock<Vec<Message>>,
}

#[async_trait]
impl MessageRepository for InMemoryMessages {
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

pub struct NullPublisher;

#[async_trait]
impl EventPublisher for NullPublisher {
    async fn publish(&self, _event: OutboundEvent) -> Result<(), PublishError> {
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub users: Arc<InMemoryUsers>,
    pub identity: Arc<IdentityVerifier>,
    pub media_root: PathBuf,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let media_root = std::env::temp_dir().join(format!("web-api-test-{}", Uuid::new_v4()));
        let blobs = Arc::new(
            FsBlobStore::create(&media_root)
                .await
                .expect("media root"),
        );

        let users = Arc::new(InMemoryUsers::default());
        let conversations = Arc::new(InMemoryConversations::default());
        let messages = Arc::new(InMemoryMessages::default());
        let clock = Arc::new(SystemClock);

        let conversation_service =
            Arc::new(ConversationService::new(ConversationServiceDependencies {
                user_repository: users.clone(),
                conversation_repository: conversations.clone(),
                clock: clock.clone(),
            }));

        let message_service = Arc::new(MessageService::new(MessageServiceDependencies {
            conversation_repository: conversations.clone(),
            message_repository: messages.clone(),
            user_repository: users.clone(),
            blob_store: blobs,
            publisher: Arc::new(NullPublisher),
            clock,
            locks: Arc::new(ConversationLocks::new()),
        }));

        let identity = Arc::new(IdentityVerifier::new(&IdentityConfig {
            jwt_secret: "end-to-end-test-secret-key-32-chars!!".to_string(),
        }));

        let state = AppState::new(conversation_service, message_service, identity.clone());
        let router = web_api::router(state, &media_root);

        Self {
            router,
            users,
            identity,
            media_root,
        }
    }

    pub async fn seed_user(&self, username: &str) -> (Uuid, String) {
        let user = User::new(
            UserId::from(Uuid::new_v4()),
            Username::parse(username).expect("username"),
            Utc::now(),
        );
        self.users.create(user.clone()).await.expect("seed user");
        let token = self
            .identity
            .issue_token(Uuid::from(user.id), 1)
            .expect("token");
        (Uuid::from(user.id), token)
    }

    pub async fn request(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .expect("request"),
            None => builder.body(Body::empty()).expect("request"),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };
        (status, json)
    }
}
