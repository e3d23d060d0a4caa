//! # 워크아웃 데이터베이스 쿼리 모듈
//!
//! `workouts` 테이블에 대한 CRUD 쿼리로 `WorkoutStore` 포트를 구현합니다.
//! 배치 생성은 하나의 트랜잭션 안에서 실행되어 전부 저장되거나 전부 취소됩니다.

use async_trait::async_trait;
use sqlx::{Executor, Sqlite, SqlitePool};

use super::{insert_error, WorkoutStore};
use crate::error::AppError;
use crate::models::Workout;

#[derive(Clone)]
pub struct SqliteWorkoutStore {
    pool: SqlitePool,
}

impl SqliteWorkoutStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// 워크아웃 한 행을 삽입합니다.
///
/// 풀(`&SqlitePool`)과 트랜잭션 연결(`&mut SqliteConnection`) 모두 Executor이므로
/// 단건 생성과 배치 생성이 같은 쿼리를 공유합니다.
async fn insert_workout<'e, E>(executor: E, workout: &Workout) -> Result<(), AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO workouts (id, plan_id, run_type, day, description, notes, status, distance)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&workout.id)
    .bind(&workout.plan_id)
    .bind(workout.run_type)
    .bind(workout.day)
    .bind(&workout.description)
    .bind(&workout.notes)
    .bind(workout.status)
    .bind(workout.distance)
    .execute(executor)
    .await
    .map_err(|e| insert_error(e, "workout"))?;

    Ok(())
}

#[async_trait]
impl WorkoutStore for SqliteWorkoutStore {
    async fn create(&self, workout: &Workout) -> Result<(), AppError> {
        insert_workout(&self.pool, workout).await
    }

    async fn create_batch(&self, workouts: &[Workout]) -> Result<(), AppError> {
        // 트랜잭션이 commit 전에 drop되면 sqlx가 자동으로 롤백합니다.
        let mut tx = self.pool.begin().await?;
        for workout in workouts {
            insert_workout(&mut *tx, workout).await?;
        }
        tx.commit().await?;

        Ok(())
    }

    async fn get_by_id(&self, id: &str) -> Result<Workout, AppError> {
        sqlx::query_as::<_, Workout>(
            r#"
            SELECT id, plan_id, run_type, day, description, notes, status, distance
            FROM workouts
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound("workout"))
    }

    async fn list_by_plan(&self, plan_id: &str) -> Result<Vec<Workout>, AppError> {
        let workouts = sqlx::query_as::<_, Workout>(
            r#"
            SELECT id, plan_id, run_type, day, description, notes, status, distance
            FROM workouts
            WHERE plan_id = ?
            ORDER BY day, rowid
            "#,
        )
        .bind(plan_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(workouts)
    }

    async fn update(&self, workout: &Workout) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE workouts
            SET run_type = ?, day = ?, description = ?, notes = ?, status = ?, distance = ?
            WHERE id = ?
            "#,
        )
        .bind(workout.run_type)
        .bind(workout.day)
        .bind(&workout.description)
        .bind(&workout.notes)
        .bind(workout.status)
        .bind(workout.distance)
        .bind(&workout.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("workout"));
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM workouts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("workout"));
        }
        Ok(())
    }
}
