mod conversation_service;
mod message_service;

#[cfg(test)]
mod test_support;


pub use conversation_service::{
    ConversationService, ConversationServiceDependencies, OpenConversationRequest,
    OpenedConversation,
};
pub use message_service::{
    LikeDelivery, MessageDelivery, MessageService, MessageServiceDependencies, SendMessageRequest,
    ToggleLikeRequest,
};
