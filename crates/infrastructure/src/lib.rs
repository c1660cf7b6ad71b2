//! 基础设施层实现。
//!
//! 提供 Postgres 仓储、文件系统图片存储和 Redis 事件发布，
//! 实现应用层定义的端口。

pub mod blob;
pub mod redis;
pub mod repository;

pub use blob::FsBlobStore;
pub use redis::{RedisError, RedisEventPublisher, RedisResult};
pub use repository::{
    create_pg_pool, PgConversationRepository, PgMessageRepository, PgUserRepository,
};
