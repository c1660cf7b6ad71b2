use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use domain::ConversationId;

/// 按会话分片的临界区。
///
/// 持久化提交和事件发布在同一把锁内完成，保证单个会话的通知顺序
/// 与提交顺序一致；不同会话互不阻塞。
#[derive(Debug, Default)]
pub struct ConversationLocks {
    inner: Mutex<HashMap<ConversationId, Arc<tokio::sync::Mutex<()>>>>,
}

impl ConversationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock_for(&self, id: ConversationId) -> Arc<tokio::sync::Mutex<()>> {
        let mut map = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        // 没有其他持有者的锁直接回收，map 不随会话数无限增长
        map.retain(|_, lock| Arc::strong_count(lock) > 1);
        map.entry(id).or_default().clone()
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}
