//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 서비스 계층은 SQLite를 직접 알지 못하고, 엔티티별 저장소 포트(트레이트)에만 의존합니다.
//! - `PlanStore`: 훈련 계획 생성/조회/목록/수정/삭제, 사용자별 활성 계획
//! - `WorkoutStore`: 워크아웃 생성/배치 생성/조회/목록/수정/삭제
//!
//! 각 하위 모듈은 포트의 SQLite 구현을 담고 있습니다:
//! - `plans`: `training_plans` 테이블 쿼리
//! - `workouts`: `workouts` 테이블 쿼리
//!
//! 조회/수정/삭제 대상이 없으면 `AppError::NotFound`를 반환합니다.

pub mod plans;
pub mod workouts;

pub use plans::SqlitePlanStore;
pub use workouts::SqliteWorkoutStore;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{TrainingPlan, Workout};

/// 훈련 계획 저장소 포트
#[async_trait]
pub trait PlanStore: Send + Sync {
    async fn create(&self, plan: &TrainingPlan) -> Result<(), AppError>;
    async fn get_by_id(&self, id: &str) -> Result<TrainingPlan, AppError>;
    /// 사용자의 계획 목록 (최근 생성 순)
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<TrainingPlan>, AppError>;
    async fn update(&self, plan: &TrainingPlan) -> Result<(), AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    async fn active_plan(&self, user_id: &str) -> Result<Option<String>, AppError>;
    /// `None`이면 활성 계획을 해제합니다.
    async fn set_active_plan(&self, user_id: &str, plan_id: Option<&str>) -> Result<(), AppError>;
}

/// 워크아웃 저장소 포트
#[async_trait]
pub trait WorkoutStore: Send + Sync {
    async fn create(&self, workout: &Workout) -> Result<(), AppError>;
    /// 전부 저장하거나 하나도 저장하지 않습니다.
    async fn create_batch(&self, workouts: &[Workout]) -> Result<(), AppError>;
    async fn get_by_id(&self, id: &str) -> Result<Workout, AppError>;
    /// 계획의 워크아웃 목록 (날짜순, 같은 날짜는 저장 순서)
    async fn list_by_plan(&self, plan_id: &str) -> Result<Vec<Workout>, AppError>;
    async fn update(&self, workout: &Workout) -> Result<(), AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

/// INSERT 에러를 변환합니다. 유니크 키 중복은 409 Conflict로 구분합니다.
fn insert_error(err: sqlx::Error, entity: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict(format!("{} already exists", entity))
        }
        _ => AppError::Database(err),
    }
}
