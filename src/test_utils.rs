//! 단위 테스트 공용 헬퍼: 인메모리 DB와 샘플 엔티티

use chrono::{NaiveDate, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{RunType, TrainingPlan, Workout, WorkoutStatus};
use crate::services::calendar;

/// 마이그레이션이 적용된 인메모리 SQLite 풀
///
/// `sqlite::memory:`는 연결마다 별도의 DB가 생기므로 연결을 하나로 고정합니다.
pub async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");

    pool
}

/// 2025-04-12(토) 레이스로 끝나는 `weeks`주 계획
pub fn sample_plan(user_id: &str, weeks: i64) -> TrainingPlan {
    let end_date = NaiveDate::from_ymd_opt(2025, 4, 12).unwrap();
    TrainingPlan {
        id: Uuid::now_v7().to_string(),
        user_id: user_id.to_string(),
        name: "Spring Half".to_string(),
        end_date,
        weeks,
        start_date: calendar::start_date_for(end_date, weeks).unwrap(),
        created_at: Utc::now(),
    }
}

pub fn sample_workout(plan: &TrainingPlan, day: NaiveDate, distance: f64) -> Workout {
    Workout {
        id: Uuid::now_v7().to_string(),
        plan_id: plan.id.clone(),
        run_type: RunType::EasyRun,
        day,
        description: "Easy".to_string(),
        notes: String::new(),
        status: WorkoutStatus::Pending,
        distance,
    }
}
