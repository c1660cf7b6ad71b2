use std::collections::HashMap;
use std::sync::Arc;

use domain::{
    conversation_topic, Conversation, ConversationId, DomainError, ImageRef, Message, MessageBody,
    MessageId, RepositoryError, User, UserId,
};
use uuid::Uuid;

use crate::{
    blob::BlobStore,
    clock::Clock,
    dto::MessageDto,
    error::ApplicationError,
    image::decode_image_payload,
    locks::ConversationLocks,
    publisher::{EventPublisher, MessageEvent, MessageEventKind, OutboundEvent},
    repository::{ConversationRepository, MessageRepository, UserRepository},
};

#[derive(Debug, Clone)]
pub struct SendMessageRequest {
    pub conversation_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    /// base64 信封，可带 data URI 前缀；None 表示纯文本消息
    pub image: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ToggleLikeRequest {
    pub conversation_id: Uuid,
    pub message_id: Uuid,
    pub actor_id: Uuid,
}

/// 持久化成功后的发送结果。
///
/// realtime_delivered = false 表示写入已提交但实时通知没有送达
/// （降级成功），客户端应退回轮询消息列表。
#[derive(Debug, Clone, serde::Serialize)]
pub struct MessageDelivery {
    pub message: MessageDto,
    pub realtime_delivered: bool,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct LikeDelivery {
    pub message: MessageDto,
    pub is_liked: bool,
    pub realtime_delivered: bool,
}

pub struct MessageServiceDependencies {
    pub conversation_repository: Arc<dyn ConversationRepository>,
    pub message_repository: Arc<dyn MessageRepository>,
    pub user_repository: Arc<dyn UserRepository>,
    pub blob_store: Arc<dyn BlobStore>,
    pub publisher: Arc<dyn EventPublisher>,
    pub clock: Arc<dyn Clock>,
    pub locks: Arc<ConversationLocks>,
}

pub struct MessageService {
    deps: MessageServiceDependencies,
}

impl MessageService {
    pub fn new(deps: MessageServiceDependencies) -> Self {
        Self { deps }
    }

    /// 向会话追加一条消息。提交先于发布，发布失败不回滚。
    pub async fn send(
        &self,
        request: SendMessageRequest,
    ) -> Result<MessageDelivery, ApplicationError> {
        let conversation_id = ConversationId::from(request.conversation_id);
        let author_id = UserId::from(request.author_id);

        let conversation = self.find_conversation(conversation_id).await?;

        if !conversation.contains(author_id) {
            return Err(DomainError::NotAParticipant.into());
        }

        let author = self
            .deps
            .user_repository
            .find_by_id(author_id)
            .await?
            .ok_or(DomainError::UserNotFound)?;

        // 图片先解码、先落盘，再写消息行；消息行只保留文件名
        let image = match request.image.as_deref() {
            Some(payload) => {
                let decoded = decode_image_payload(payload)?;
                let filename = format!("{}.{}", Uuid::new_v4(), decoded.format.extension());
                self.deps.blob_store.store(&filename, &decoded.bytes).await?;
                Some(ImageRef::new(filename)?)
            }
            None => None,
        };

        // 同一会话内提交和发布串行，通知顺序与提交顺序一致；
        // 时间戳也在锁内取，created_at 排序不会偏离提交顺序
        let lock = self.deps.locks.lock_for(conversation_id);
        let _held = lock.lock().await;

        let message = Message::new(
            MessageId::from(Uuid::new_v4()),
            conversation_id,
            author_id,
            MessageBody::new(request.content)?,
            image,
            self.deps.clock.now(),
        )?;

        let stored = self.deps.message_repository.create(message).await?;
        let dto = MessageDto::from_parts(&stored, &author);
        let realtime_delivered = self
            .publish(MessageEventKind::Posted, conversation_id, dto.clone())
            .await;

        Ok(MessageDelivery {
            message: dto,
            realtime_delivered,
        })
    }

    /// 翻转消息的 liked 标记，返回提交后的值。
    pub async fn toggle_like(
        &self,
        request: ToggleLikeRequest,
    ) -> Result<LikeDelivery, ApplicationError> {
        let conversation_id = ConversationId::from(request.conversation_id);
        let message_id = MessageId::from(request.message_id);
        let actor_id = UserId::from(request.actor_id);

        let conversation = self.find_conversation(conversation_id).await?;

        if !conversation.contains(actor_id) {
            return Err(DomainError::NotAParticipant.into());
        }

        let message = self
            .deps
            .message_repository
            .find_in_conversation(conversation_id, message_id)
            .await?
            .ok_or(DomainError::MessageNotFound)?;

        if message.author_id == actor_id {
            return Err(DomainError::CannotLikeOwnMessage.into());
        }

        let author = self
            .deps
            .user_repository
            .find_by_id(message.author_id)
            .await?
            .ok_or(DomainError::UserNotFound)?;

        let lock = self.deps.locks.lock_for(conversation_id);
        let _held = lock.lock().await;

        // 原子读改写发生在存储层，返回值就是本次提交的值
        let is_liked = match self
            .deps
            .message_repository
            .toggle_like(conversation_id, message_id)
            .await
        {
            Ok(value) => value,
            Err(RepositoryError::NotFound) => return Err(DomainError::MessageNotFound.into()),
            Err(err) => return Err(err.into()),
        };

        let mut snapshot = message;
        snapshot.is_liked = is_liked;
        let dto = MessageDto::from_parts(&snapshot, &author);
        let realtime_delivered = self
            .publish(MessageEventKind::LikeToggled, conversation_id, dto.clone())
            .await;

        Ok(LikeDelivery {
            message: dto,
            is_liked,
            realtime_delivered,
        })
    }

    /// 会话的全部消息，按创建时间升序的新快照。
    pub async fn list(
        &self,
        conversation_id: Uuid,
    ) -> Result<Vec<MessageDto>, ApplicationError> {
        let conversation_id = ConversationId::from(conversation_id);
        let conversation = self.find_conversation(conversation_id).await?;

        let messages = self
            .deps
            .message_repository
            .list_by_conversation(conversation_id)
            .await?;

        // 作者一定在成员对里，两个参与者查一次就够
        let mut authors: HashMap<UserId, User> = HashMap::new();
        for user_id in conversation.participants.both() {
            if let Some(user) = self.deps.user_repository.find_by_id(user_id).await? {
                authors.insert(user_id, user);
            }
        }

        messages
            .iter()
            .map(|message| {
                let author = authors
                    .get(&message.author_id)
                    .ok_or(DomainError::UserNotFound)?;
                Ok(MessageDto::from_parts(message, author))
            })
            .collect()
    }

    async fn find_conversation(
        &self,
        id: ConversationId,
    ) -> Result<Conversation, ApplicationError> {
        Ok(self
            .deps
            .conversation_repository
            .find_by_id(id)
            .await?
            .ok_or(DomainError::ConversationNotFound)?)
    }

    /// 已提交的变更转成主题事件发出去。
    ///
    /// 发布失败不是请求失败：记录错误并报告降级成功，由调用方
    /// 决定是否轮询兜底。
    async fn publish(
        &self,
        kind: MessageEventKind,
        conversation_id: ConversationId,
        message: MessageDto,
    ) -> bool {
        let event = OutboundEvent {
            topic: conversation_topic(conversation_id),
            private: true,
            event: MessageEvent {
                kind,
                conversation_id: Uuid::from(conversation_id),
                message,
            },
        };

        match self.deps.publisher.publish(event).await {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(
                    conversation_id = %conversation_id,
                    error = %err,
                    "message persisted but realtime publish failed"
                );
                false
            }
        }
    }
}
