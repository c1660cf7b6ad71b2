//! 应用层实现。
//!
//! 这里提供围绕领域模型的用例服务，处理输入校验、持久化与发布的
//! 先后顺序，以及对外部适配器（存储、blob、事件发布）的抽象。

pub mod blob;
pub mod clock;
pub mod dto;
pub mod error;
pub mod image;
pub mod locks;
pub mod publisher;
pub mod repository;
pub mod services;

pub use blob::{BlobError, BlobStore};
pub use clock::{Clock, SystemClock};
pub use dto::{ConversationDto, MessageDto, UserDto};
pub use error::ApplicationError;
pub use image::{decode_image_payload, DecodedImage, ImageFormat};
pub use locks::ConversationLocks;
pub use publisher::{EventPublisher, MessageEvent, MessageEventKind, OutboundEvent, PublishError};
pub use repository::{ConversationRepository, MessageRepository, UserRepository};
pub use services::{
    ConversationService, ConversationServiceDependencies, LikeDelivery, MessageDelivery,
    MessageService, MessageServiceDependencies, OpenConversationRequest, OpenedConversation,
    SendMessageRequest, ToggleLikeRequest,
};
