use std::path::Path as FsPath;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use uuid::Uuid;

use application::services::{
    LikeDelivery, MessageDelivery, OpenConversationRequest, SendMessageRequest, ToggleLikeRequest,
};
use application::{ConversationDto, MessageDto, UserDto};

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
struct SendMessagePayload {
    conversation_id: Uuid,
    content: String,
}

#[derive(Debug, Deserialize)]
struct SendImagePayload {
    conversation_id: Uuid,
    #[serde(default)]
    content: String,
    /// base64 图片字节，可带 data URI 前缀
    image: String,
}

/// 组装完整路由。图片目录由静态文件服务直接对外暴露。
pub fn router(state: AppState, media_root: impl AsRef<FsPath>) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes())
        .nest_service("/images", ServeDir::new(media_root))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/me", get(current_user))
        .route("/conversations/{recipient_id}", post(open_conversation))
        .route(
            "/conversations/{conversation_id}/messages",
            get(list_messages),
        )
        .route("/messages", post(send_message))
        .route("/messages/image", post(send_image))
        .route(
            "/messages/{conversation_id}/{message_id}/toggle-like",
            put(toggle_like),
        )
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn list_users(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<UserDto>>, ApiError> {
    let caller_id = state.identity.extract_user_from_headers(&headers)?;
    let users = state.conversation_service.list_users(caller_id).await?;
    Ok(Json(users))
}

async fn current_user(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserDto>, ApiError> {
    let caller_id = state.identity.extract_user_from_headers(&headers)?;
    let user = state.conversation_service.current_user(caller_id).await?;
    Ok(Json(user))
}

/// 打开（或复用）与指定用户的会话。新建返回 201，已存在返回 200。
async fn open_conversation(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(recipient_id): Path<Uuid>,
) -> Result<(StatusCode, Json<ConversationDto>), ApiError> {
    let caller_id = state.identity.extract_user_from_headers(&headers)?;
    let opened = state
        .conversation_service
        .open(OpenConversationRequest {
            requester_id: caller_id,
            recipient_id,
        })
        .await?;

    let status = if opened.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(opened.conversation)))
}

async fn list_messages(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(conversation_id): Path<Uuid>,
) -> Result<Json<Vec<MessageDto>>, ApiError> {
    state.identity.extract_user_from_headers(&headers)?;
    let messages = state.message_service.list(conversation_id).await?;
    Ok(Json(messages))
}

async fn send_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<SendMessagePayload>,
) -> Result<(StatusCode, Json<MessageDelivery>), ApiError> {
    let caller_id = state.identity.extract_user_from_headers(&headers)?;
    let delivery = state
        .message_service
        .send(SendMessageRequest {
            conversation_id: payload.conversation_id,
            author_id: caller_id,
            content: payload.content,
            image: None,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(delivery)))
}

async fn send_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<SendImagePayload>,
) -> Result<(StatusCode, Json<MessageDelivery>), ApiError> {
    let caller_id = state.identity.extract_user_from_headers(&headers)?;
    let delivery = state
        .message_service
        .send(SendMessageRequest {
            conversation_id: payload.conversation_id,
            author_id: caller_id,
            content: payload.content,
            image: Some(payload.image),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(delivery)))
}

async fn toggle_like(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((conversation_id, message_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<LikeDelivery>, ApiError> {
    let caller_id = state.identity.extract_user_from_headers(&headers)?;
    let delivery = state
        .message_service
        .toggle_like(ToggleLikeRequest {
            conversation_id,
            message_id,
            actor_id: caller_id,
        })
        .await?;

    Ok(Json(delivery))
}
