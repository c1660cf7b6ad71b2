//! Redis 错误类型定义

use thiserror::Error;

/// Redis 操作错误
#[derive(Error, Debug)]
pub enum RedisError {
    #[error("Redis 连接错误: {message}")]
    ConnectionError { message: String },

    #[error("Redis 发布错误: {message}")]
    PublishError { message: String },

    #[error("配置错误: {message}")]
    ConfigError { message: String },
}

pub type RedisResult<T> = Result<T, RedisError>;

impl From<redis::RedisError> for RedisError {
    fn from(err: redis::RedisError) -> Self {
        match err.kind() {
            redis::ErrorKind::InvalidClientConfig => RedisError::ConfigError {
                message: err.to_string(),
            },
            _ => RedisError::ConnectionError {
                message: err.to_string(),
            },
        }
    }
}
