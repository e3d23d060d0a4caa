//! # 훈련 계획 데이터베이스 쿼리 모듈
//!
//! `training_plans` 테이블에 대한 CRUD 쿼리로 `PlanStore` 포트를 구현합니다.
//! 계획이 삭제되면 스키마의 `ON DELETE CASCADE`로 소속 워크아웃도 함께 삭제됩니다.

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::{insert_error, PlanStore};
use crate::error::AppError;
use crate::models::TrainingPlan;

/// SQLite 기반 계획 저장소
///
/// `SqlitePool`은 내부적으로 Arc를 사용하므로 clone해도 같은 풀을 가리킵니다.
#[derive(Clone)]
pub struct SqlitePlanStore {
    pool: SqlitePool,
}

impl SqlitePlanStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlanStore for SqlitePlanStore {
    async fn create(&self, plan: &TrainingPlan) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO training_plans (id, user_id, name, end_date, weeks, start_date, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&plan.id)
        .bind(&plan.user_id)
        .bind(&plan.name)
        .bind(plan.end_date)
        .bind(plan.weeks)
        .bind(plan.start_date)
        .bind(plan.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| insert_error(e, "plan"))?;

        Ok(())
    }

    async fn get_by_id(&self, id: &str) -> Result<TrainingPlan, AppError> {
        sqlx::query_as::<_, TrainingPlan>(
            r#"
            SELECT id, user_id, name, end_date, weeks, start_date, created_at
            FROM training_plans
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound("plan"))
    }

    // created_at은 RFC 3339 문자열이라 소수점 자릿수가 달라지면 문자열 정렬이 틀어질 수 있습니다.
    // 삽입 순서(rowid)의 역순이 곧 최근 생성 순입니다.
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<TrainingPlan>, AppError> {
        let plans = sqlx::query_as::<_, TrainingPlan>(
            r#"
            SELECT id, user_id, name, end_date, weeks, start_date, created_at
            FROM training_plans
            WHERE user_id = ?
            ORDER BY rowid DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(plans)
    }

    async fn update(&self, plan: &TrainingPlan) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE training_plans
            SET name = ?, end_date = ?, weeks = ?, start_date = ?
            WHERE id = ?
            "#,
        )
        .bind(&plan.name)
        .bind(plan.end_date)
        .bind(plan.weeks)
        .bind(plan.start_date)
        .bind(&plan.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("plan"));
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM training_plans WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("plan"));
        }
        Ok(())
    }

    async fn active_plan(&self, user_id: &str) -> Result<Option<String>, AppError> {
        let plan_id = sqlx::query_scalar::<_, String>(
            "SELECT plan_id FROM active_plans WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(plan_id)
    }

    async fn set_active_plan(&self, user_id: &str, plan_id: Option<&str>) -> Result<(), AppError> {
        match plan_id {
            Some(plan_id) => {
                // 사용자당 한 행: 이미 있으면 덮어씁니다.
                sqlx::query(
                    r#"
                    INSERT INTO active_plans (user_id, plan_id) VALUES (?, ?)
                    ON CONFLICT(user_id) DO UPDATE SET plan_id = excluded.plan_id
                    "#,
                )
                .bind(user_id)
                .bind(plan_id)
                .execute(&self.pool)
                .await?;
            }
            None => {
                sqlx::query("DELETE FROM active_plans WHERE user_id = ?")
                    .bind(user_id)
                    .execute(&self.pool)
                    .await?;
            }
        }
        Ok(())
    }
}
