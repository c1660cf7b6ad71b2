//! Web API 层。
//!
//! 提供 Axum 路由，将 HTTP 请求委托给应用层的用例服务。
//! 身份令牌由外部身份服务签发，这里只做校验。

mod auth;
mod error;
mod routes;
mod state;

pub use auth::{Claims, IdentityVerifier};
pub use error::ApiError;
pub use config::IdentityConfig;
pub use routes::router;
pub use state::AppState;
