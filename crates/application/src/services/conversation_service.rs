use std::sync::Arc;

use domain::{Conversation, ConversationId, DomainError, ParticipantPair, RepositoryError, UserId};
use uuid::Uuid;

use crate::{
    clock::Clock,
    dto::{ConversationDto, UserDto},
    error::ApplicationError,
    repository::{ConversationRepository, UserRepository},
};

#[derive(Debug, Clone)]
pub struct OpenConversationRequest {
    pub requester_id: Uuid,
    pub recipient_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct OpenedConversation {
    pub conversation: ConversationDto,
    /// 本次调用是否真的创建了新会话（决定 HTTP 201 还是 200）
    pub created: bool,
}

pub struct ConversationServiceDependencies {
    pub user_repository: Arc<dyn UserRepository>,
    pub conversation_repository: Arc<dyn ConversationRepository>,
    pub clock: Arc<dyn Clock>,
}

pub struct ConversationService {
    deps: ConversationServiceDependencies,
}

impl ConversationService {
    pub fn new(deps: ConversationServiceDependencies) -> Self {
        Self { deps }
    }

    /// 解析或创建两个用户之间的会话。
    ///
    /// 查找对成员顺序不敏感（成员对在领域层规范化），重复调用幂等。
    /// 并发创建依赖存储层的唯一约束：撞上 Conflict 就退回为查找。
    pub async fn open(
        &self,
        request: OpenConversationRequest,
    ) -> Result<OpenedConversation, ApplicationError> {
        let requester = self
            .deps
            .user_repository
            .find_by_id(UserId::from(request.requester_id))
            .await?
            .ok_or(DomainError::UserNotFound)?;

        let recipient = self
            .deps
            .user_repository
            .find_by_id(UserId::from(request.recipient_id))
            .await?
            .ok_or(DomainError::UserNotFound)?;

        let pair = ParticipantPair::new(requester.id, recipient.id)?;

        if let Some(existing) = self.deps.conversation_repository.find_by_pair(&pair).await? {
            return Ok(OpenedConversation {
                conversation: ConversationDto::from_parts(&existing, &[&requester, &recipient]),
                created: false,
            });
        }

        let conversation = Conversation::new(
            ConversationId::from(Uuid::new_v4()),
            pair,
            self.deps.clock.now(),
        );

        match self.deps.conversation_repository.create(conversation).await {
            Ok(created) => Ok(OpenedConversation {
                conversation: ConversationDto::from_parts(&created, &[&requester, &recipient]),
                created: true,
            }),
            Err(RepositoryError::Conflict) => {
                // 并发请求先一步创建了同一对会话，重读即可
                let existing = self
                    .deps
                    .conversation_repository
                    .find_by_pair(&pair)
                    .await?
                    .ok_or(ApplicationError::Repository(RepositoryError::NotFound))?;
                Ok(OpenedConversation {
                    conversation: ConversationDto::from_parts(&existing, &[&requester, &recipient]),
                    created: false,
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// 除调用者外的全部用户，按用户名升序，供客户端挑选聊天对象。
    pub async fn list_users(&self, caller_id: Uuid) -> Result<Vec<UserDto>, ApplicationError> {
        let caller = UserId::from(caller_id);
        let users = self.deps.user_repository.list_all().await?;

        Ok(users
            .iter()
            .filter(|user| user.id != caller)
            .map(UserDto::from)
            .collect())
    }

    pub async fn current_user(&self, caller_id: Uuid) -> Result<UserDto, ApplicationError> {
        let user = self
            .deps
            .user_repository
            .find_by_id(UserId::from(caller_id))
            .await?
            .ok_or(DomainError::UserNotFound)?;

        Ok(UserDto::from(&user))
    }
}
