//! 身份令牌校验模块
//!
//! 令牌由外部身份服务用共享密钥签发，这里只负责验证和解析。
//! issue_token 仅供本地开发和测试使用。

use axum::http::HeaderMap;
use config::IdentityConfig;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// JWT Claims 结构
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: Uuid,
    pub exp: i64, // 过期时间 (Unix timestamp)
}

#[derive(Clone)]
pub struct IdentityVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl IdentityVerifier {
    pub fn new(config: &IdentityConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_ref()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_ref()),
        }
    }

    /// 验证并解析令牌
    pub fn verify_token(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|token_data| token_data.claims)
            .map_err(|err| ApiError::unauthorized(format!("Invalid token: {}", err)))
    }

    /// 从 headers 中提取并验证令牌，返回调用者 id
    pub fn extract_user_from_headers(&self, headers: &HeaderMap) -> Result<Uuid, ApiError> {
        let auth_header = headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|header| header.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::unauthorized("Invalid authorization header format"))?;

        let claims = self.verify_token(token)?;
        Ok(claims.user_id)
    }

    /// 用共享密钥签发短期令牌。生产环境由身份服务负责签发。
    pub fn issue_token(&self, user_id: Uuid, hours: i64) -> Result<String, ApiError> {
        let exp = chrono::Utc::now() + chrono::Duration::hours(hours);
        let claims = Claims {
            user_id,
            exp: exp.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|err| ApiError::unauthorized(format!("Token generation failed: {}", err)))
    }
}
