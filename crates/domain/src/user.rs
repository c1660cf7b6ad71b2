use serde::{Deserialize, Serialize};

use crate::value_objects::{Timestamp, UserId, Username};

/// 用户实体。身份创建后不可变，由外部身份服务负责注册和登录。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub created_at: Timestamp,
}

impl User {
    pub fn new(id: UserId, username: Username, created_at: Timestamp) -> Self {
        Self {
            id,
            username,
            created_at,
        }
    }
}
