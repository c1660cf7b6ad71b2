//! 主应用程序入口
//!
//! 启动消息服务的 Axum Web API。

use std::sync::Arc;

use application::{
    services::{
        ConversationService, ConversationServiceDependencies, MessageService,
        MessageServiceDependencies,
    },
    ConversationLocks, SystemClock,
};
use config::AppConfig;
use infrastructure::{
    create_pg_pool, FsBlobStore, PgConversationRepository, PgMessageRepository, PgUserRepository,
    RedisEventPublisher,
};
use tracing_subscriber::EnvFilter;
use web_api::{router, AppState, IdentityVerifier};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = AppConfig::from_env_with_defaults();
    config.validate()?;

    tracing::info!(
        "连接数据库: {}",
        config.database.url.split('@').last().unwrap_or("unknown")
    );

    let pg_pool = create_pg_pool(&config.database.url, config.database.max_connections).await?;

    // 运行迁移
    sqlx::migrate!("../../migrations").run(&pg_pool).await?;

    let user_repository = Arc::new(PgUserRepository::new(pg_pool.clone()));
    let conversation_repository = Arc::new(PgConversationRepository::new(pg_pool.clone()));
    let message_repository = Arc::new(PgMessageRepository::new(pg_pool));

    let blob_store = Arc::new(FsBlobStore::create(&config.media.root_dir).await?);
    let publisher = Arc::new(RedisEventPublisher::connect(&config.redis.url).await?);
    let clock = Arc::new(SystemClock);

    let conversation_service = Arc::new(ConversationService::new(ConversationServiceDependencies {
        user_repository: user_repository.clone(),
        conversation_repository: conversation_repository.clone(),
        clock: clock.clone(),
    }));

    let message_service = Arc::new(MessageService::new(MessageServiceDependencies {
        conversation_repository,
        message_repository,
        user_repository,
        blob_store,
        publisher,
        clock,
        locks: Arc::new(ConversationLocks::new()),
    }));

    let identity = Arc::new(IdentityVerifier::new(&config.identity));
    let state = AppState::new(conversation_service, message_service, identity);

    let app = router(state, &config.media.root_dir);
    let address = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;

    tracing::info!("消息服务启动在 http://{}", address);
    axum::serve(listener, app).await?;

    Ok(())
}
