//! # 훈련 계획 서비스
//!
//! 계획 생성/조회/수정/삭제를 담당합니다.
//! 시작일은 항상 레이스 날짜와 주 수로부터 계산되며, 둘 중 하나가 바뀌면 다시 계산합니다.
//!
//! 계획은 소유자에게만 보입니다. 다른 사용자의 계획은 존재 여부를 드러내지 않도록 NotFound로 응답합니다.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::db::PlanStore;
use crate::error::AppError;
use crate::models::TrainingPlan;
use crate::services::calendar;

#[derive(Clone)]
pub struct PlanService {
    store: Arc<dyn PlanStore>,
}

impl PlanService {
    pub fn new(store: Arc<dyn PlanStore>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        user_id: &str,
        name: &str,
        end_date: NaiveDate,
        weeks: i64,
    ) -> Result<TrainingPlan, AppError> {
        validate(name, weeks)?;
        let start_date = derive_start_date(end_date, weeks)?;

        let plan = TrainingPlan {
            id: Uuid::now_v7().to_string(),
            user_id: user_id.to_string(),
            name: name.to_string(),
            end_date,
            weeks,
            start_date,
            created_at: Utc::now(),
        };
        self.store.create(&plan).await?;

        tracing::info!(
            "Plan created: {} ({} weeks, {} → {})",
            plan.id,
            plan.weeks,
            plan.start_date,
            plan.end_date
        );
        Ok(plan)
    }

    pub async fn get(&self, id: &str) -> Result<TrainingPlan, AppError> {
        self.store.get_by_id(id).await
    }

    /// `user_id`가 소유한 계획만 반환합니다.
    pub async fn get_owned(&self, user_id: &str, id: &str) -> Result<TrainingPlan, AppError> {
        let plan = self.store.get_by_id(id).await?;
        if plan.user_id != user_id {
            return Err(AppError::NotFound("plan"));
        }
        Ok(plan)
    }

    /// 최근에 만든 계획이 먼저 옵니다.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<TrainingPlan>, AppError> {
        self.store.list_by_user(user_id).await
    }

    /// 이름, 레이스 날짜, 주 수를 교체하고 시작일을 다시 계산합니다.
    pub async fn update(
        &self,
        user_id: &str,
        id: &str,
        name: &str,
        end_date: NaiveDate,
        weeks: i64,
    ) -> Result<TrainingPlan, AppError> {
        validate(name, weeks)?;
        let start_date = derive_start_date(end_date, weeks)?;

        let mut plan = self.get_owned(user_id, id).await?;
        plan.name = name.to_string();
        plan.end_date = end_date;
        plan.weeks = weeks;
        plan.start_date = start_date;
        self.store.update(&plan).await?;

        tracing::info!("Plan updated: {}", plan.id);
        Ok(plan)
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        self.store.delete(id).await?;
        tracing::info!("Plan deleted: {}", id);
        Ok(())
    }

    /// 사용자의 활성 계획 ID (없으면 `None`)
    pub async fn active_plan(&self, user_id: &str) -> Result<Option<String>, AppError> {
        self.store.active_plan(user_id).await
    }

    /// 계획을 활성 계획으로 지정합니다. 이미 활성 계획이면 해제합니다.
    ///
    /// 변경 후의 활성 계획 ID를 반환합니다.
    pub async fn toggle_active(&self, user_id: &str, id: &str) -> Result<Option<String>, AppError> {
        let plan = self.get_owned(user_id, id).await?;

        let next = match self.store.active_plan(user_id).await? {
            Some(current) if current == plan.id => None,
            _ => Some(plan.id),
        };
        self.store.set_active_plan(user_id, next.as_deref()).await?;

        tracing::info!("Active plan for {}: {:?}", user_id, next);
        Ok(next)
    }

    /// 후속 단계가 실패했을 때 방금 만든 계획을 되돌립니다.
    ///
    /// 삭제 자체가 실패해도 호출자는 원래 에러를 반환해야 하므로, 여기서는 로그만 남깁니다.
    pub async fn discard(&self, id: &str) {
        match self.store.delete(id).await {
            Ok(()) => tracing::warn!("Rolled back plan {}", id),
            Err(e) => tracing::error!("Failed to roll back plan {}: {}", id, e),
        }
    }
}

fn validate(name: &str, weeks: i64) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::validation("name is required"));
    }
    if weeks < 1 {
        return Err(AppError::validation("weeks must be at least 1"));
    }
    if weeks > calendar::MAX_WEEKS {
        return Err(AppError::validation(format!(
            "weeks must be at most {}",
            calendar::MAX_WEEKS
        )));
    }
    Ok(())
}

fn derive_start_date(end_date: NaiveDate, weeks: i64) -> Result<NaiveDate, AppError> {
    calendar::start_date_for(end_date, weeks)
        .ok_or_else(|| AppError::validation("endDate is out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SqlitePlanStore;
    use crate::test_utils::setup_test_db;
    use chrono::{Datelike, Weekday};

    async fn service() -> PlanService {
        PlanService::new(Arc::new(SqlitePlanStore::new(setup_test_db().await)))
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn create_derives_the_start_date() {
        let service = service().await;
        let plan = service
            .create("user-1", "Spring Marathon", ymd(2025, 4, 12), 12)
            .await
            .unwrap();

        assert_eq!(plan.start_date, ymd(2025, 1, 20));
        assert_eq!(service.get(&plan.id).await.unwrap().start_date, plan.start_date);
    }

    #[tokio::test]
    async fn create_rejects_missing_name_and_zero_weeks() {
        let service = service().await;

        let err = service.create("user-1", "  ", ymd(2025, 4, 12), 4).await.unwrap_err();
        assert_eq!(err.to_string(), "name is required");

        let err = service.create("user-1", "Plan", ymd(2025, 4, 12), 0).await.unwrap_err();
        assert_eq!(err.to_string(), "weeks must be at least 1");

        assert!(service.list_for_user("user-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_recomputes_the_start_date() {
        let service = service().await;
        let plan = service
            .create("user-1", "Spring", ymd(2025, 4, 12), 12)
            .await
            .unwrap();

        let updated = service
            .update("user-1", &plan.id, "Spring 10K", ymd(2025, 5, 5), 4)
            .await
            .unwrap();

        assert_eq!(updated.start_date, ymd(2025, 4, 14));
        assert_eq!(updated.start_date.weekday(), Weekday::Mon);
        assert_eq!(service.get(&plan.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn other_users_plans_are_hidden() {
        let service = service().await;
        let plan = service
            .create("user-1", "Mine", ymd(2025, 4, 12), 6)
            .await
            .unwrap();

        assert!(matches!(
            service.get_owned("user-2", &plan.id).await,
            Err(AppError::NotFound("plan"))
        ));
        assert!(matches!(
            service
                .update("user-2", &plan.id, "Stolen", ymd(2025, 4, 12), 6)
                .await,
            Err(AppError::NotFound("plan"))
        ));
        assert!(service.list_for_user("user-2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let service = service().await;
        let first = service.create("user-1", "A", ymd(2025, 4, 12), 4).await.unwrap();
        let second = service.create("user-1", "B", ymd(2025, 6, 1), 4).await.unwrap();

        let ids: Vec<_> = service
            .list_for_user("user-1")
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn discard_swallows_missing_plans() {
        let service = service().await;
        let plan = service.create("user-1", "A", ymd(2025, 4, 12), 4).await.unwrap();

        service.discard(&plan.id).await;
        service.discard(&plan.id).await;

        assert!(service.list_for_user("user-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn week_count_is_bounded_on_create_and_update() {
        let service = service().await;

        let err = service
            .create("user-1", "Forever", ymd(2025, 4, 12), 20_000_000)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "weeks must be at most 104");

        let plan = service
            .create("user-1", "Two Years", ymd(2025, 4, 12), 104)
            .await
            .unwrap();
        let err = service
            .update("user-1", &plan.id, "Two Years", ymd(2025, 4, 12), 105)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "weeks must be at most 104");
        assert_eq!(service.get(&plan.id).await.unwrap().weeks, 104);
    }

    #[tokio::test]
    async fn race_date_too_early_for_the_calendar_is_rejected() {
        let service = service().await;
        let end = NaiveDate::MIN + chrono::Days::new(10);

        let err = service.create("user-1", "Ancient", end, 104).await.unwrap_err();

        assert_eq!(err.to_string(), "endDate is out of range");
        assert!(service.list_for_user("user-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn activating_twice_toggles_the_plan_off() {
        let service = service().await;
        let a = service.create("user-1", "A", ymd(2025, 4, 12), 4).await.unwrap();
        let b = service.create("user-1", "B", ymd(2025, 6, 1), 4).await.unwrap();

        assert_eq!(service.active_plan("user-1").await.unwrap(), None);
        assert_eq!(service.toggle_active("user-1", &a.id).await.unwrap(), Some(a.id.clone()));
        assert_eq!(service.toggle_active("user-1", &b.id).await.unwrap(), Some(b.id.clone()));
        assert_eq!(service.active_plan("user-1").await.unwrap(), Some(b.id.clone()));
        assert_eq!(service.toggle_active("user-1", &b.id).await.unwrap(), None);
        assert_eq!(service.active_plan("user-1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn only_the_owner_can_activate_a_plan() {
        let service = service().await;
        let plan = service.create("user-1", "Mine", ymd(2025, 4, 12), 4).await.unwrap();

        assert!(matches!(
            service.toggle_active("user-2", &plan.id).await,
            Err(AppError::NotFound("plan"))
        ));
        assert_eq!(service.active_plan("user-2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn deleting_the_active_plan_clears_it() {
        let service = service().await;
        let plan = service.create("user-1", "A", ymd(2025, 4, 12), 4).await.unwrap();
        service.toggle_active("user-1", &plan.id).await.unwrap();

        service.delete(&plan.id).await.unwrap();

        assert_eq!(service.active_plan("user-1").await.unwrap(), None);
    }
}
