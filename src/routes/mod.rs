//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 서비스 계층 호출로 바꾸는 얇은 핸들러들입니다.
//!
//! 각 하위 모듈:
//! - `health`: 서버 상태 확인
//! - `plans`: 계획 CRUD, 활성 계획 토글, 계획 상세, AI 생성, 워크아웃 배치 생성
//! - `workouts`: 워크아웃 단건 CRUD
//!
//! 모든 엔드포인트는 `/api` 아래에 있고, `/api/health`를 제외하면 Bearer 토큰이 필요합니다.

pub mod health;
pub mod plans;
pub mod workouts;

use axum::{
    routing::{get, post},
    Router,
};
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::services::{GenerateService, PlanService, WorkoutService};

pub use health::*;
pub use plans::*;
pub use workouts::*;

/// 애플리케이션 공유 상태
///
/// 모든 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// 서비스들은 내부적으로 `Arc`로 저장소를 공유하므로 clone 비용이 작습니다.
#[derive(Clone)]
pub struct AppState {
    pub plans: PlanService,
    pub workouts: WorkoutService,
    pub generate: GenerateService,
    /// Bearer 토큰 검증용 비밀키
    pub jwt_secret: String,
    /// 서버 종료 신호. 진행 중인 AI 생성 호출도 이 신호로 중단됩니다.
    pub shutdown: CancellationToken,
}

/// `/api` 아래의 전체 라우터를 만듭니다.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        // 훈련 계획
        .route("/plans", get(list_plans).post(create_plan))
        // 정적 경로가 `{id}`보다 우선 매칭됩니다.
        .route("/plans/generate", post(generate_plan))
        .route(
            "/plans/{id}",
            get(get_plan).put(update_plan).delete(delete_plan),
        )
        .route("/plans/{id}/activate", post(activate_plan))
        .route("/plans/{id}/workouts", get(list_plan_workouts))
        .route("/plans/{id}/workouts/batch", post(create_workout_batch))
        // 워크아웃
        .route("/workouts", post(create_workout))
        .route(
            "/workouts/{id}",
            get(get_workout).put(update_workout).delete(delete_workout),
        )
        .with_state(state);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
