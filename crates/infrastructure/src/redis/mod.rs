//! Redis Pub/Sub 模块
//!
//! 每个会话一个频道，hub 端按主题做订阅鉴权与扇出。

pub mod error;
pub mod publisher;

pub use error::*;
pub use publisher::*;
