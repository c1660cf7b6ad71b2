use std::sync::Arc;

use application::{ConversationService, MessageService};

use crate::IdentityVerifier;

#[derive(Clone)]
pub struct AppState {
    pub conversation_service: Arc<ConversationService>,
    pub message_service: Arc<MessageService>,
    pub identity: Arc<IdentityVerifier>,
}

impl AppState {
    pub fn new(
        conversation_service: Arc<ConversationService>,
        message_service: Arc<MessageService>,
        identity: Arc<IdentityVerifier>,
    ) -> Self {
        Self {
            conversation_service,
            message_service,
            identity,
        }
    }
}
