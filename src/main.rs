//! # Runplanner 웹 서버 진입점
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. SQLite 데이터베이스 연결 풀 생성
//! 4. 데이터베이스 마이그레이션 실행
//! 5. 서비스 조립 (저장소 → 서비스 → AppState)
//! 6. HTTP 서버 시작, Ctrl+C에서 정상 종료

use std::sync::Arc;

use anyhow::Result;
use runplanner::{
    config::Config,
    db::{SqlitePlanStore, SqliteWorkoutStore},
    routes::{build_router, AppState},
    services::{GenerateService, OpenAiClient, PlanService, TextCompletion, WorkoutService},
};
use sqlx::sqlite::SqlitePoolOptions;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // .env 파일이 없어도 시스템 환경변수로 동작합니다.
    dotenvy::dotenv().ok();

    // RUST_LOG가 없으면 runplanner, tower_http, axum 모듈을 debug 레벨로
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "runplanner=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!("Starting Runplanner server on {}:{}", config.host, config.port);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    // ── 서비스 조립 ──
    let plans = PlanService::new(Arc::new(SqlitePlanStore::new(pool.clone())));
    let workouts = WorkoutService::new(Arc::new(SqliteWorkoutStore::new(pool.clone())));

    let completion: Option<Arc<dyn TextCompletion>> = match &config.completion {
        Some(completion_config) => {
            tracing::info!(
                "AI generation enabled (model {}, {})",
                completion_config.model,
                completion_config.base_url
            );
            Some(Arc::new(OpenAiClient::new(completion_config)))
        }
        None => {
            tracing::warn!("OPENAI_API_KEY not set, AI plan generation is disabled");
            None
        }
    };
    let generate = GenerateService::new(
        completion,
        plans.clone(),
        workouts.clone(),
        config.generation_timeout,
    );

    let shutdown = CancellationToken::new();
    let state = AppState {
        plans,
        workouts,
        generate,
        jwt_secret: config.jwt_secret.clone(),
        shutdown: shutdown.clone(),
    };
    let app = build_router(state);

    // Ctrl+C → 토큰 취소 → 새 연결 수락 중단, 진행 중인 AI 호출 중단
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
                return;
            }
            tracing::info!("Shutdown signal received");
            shutdown.cancel();
        }
    });

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    pool.close().await;
    tracing::info!("Server stopped");
    Ok(())
}
