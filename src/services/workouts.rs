//! # 워크아웃 서비스
//!
//! 워크아웃 단건 생성, 주차/요일 기반 배치 배치(placement), 부분 수정, 레이스 워크아웃 추가를 담당합니다.
//!
//! ## 배치 검증 규칙
//! 항목을 순서대로 검사하고, 첫 번째 위반에서 배치 전체를 거부합니다.
//! 한 항목 안에서는 다음 순서로 검사합니다 (여러 필드가 동시에 틀리면 먼저 걸린 메시지가 나갑니다):
//! 1. 러닝 종류가 허용 목록에 있는가
//! 2. 거리가 0 이상인가
//! 3. 근력 운동이면 거리가 정확히 0인가
//! 4. 주차가 `1..=plan.weeks` 안인가
//! 5. 요일이 `1..=7` 안인가
//!
//! 모든 항목이 통과한 뒤에만 저장소의 `create_batch`를 한 번 호출합니다.

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::db::WorkoutStore;
use crate::error::AppError;
use crate::models::{
    BulkWorkoutInput, RaceGoal, RunType, TrainingPlan, Workout, WorkoutChanges, WorkoutStatus,
};
use crate::services::calendar;

const INVALID_RUN_TYPE: &str = "invalid run type";
const NEGATIVE_DISTANCE: &str = "distance cannot be negative";
const STRENGTH_NON_ZERO: &str = "strength training must have a distance of 0km";
const INVALID_DAY_OF_WEEK: &str = "dayOfWeek must be between 1 (Monday) and 7 (Sunday)";
const INVALID_STATUS: &str = "invalid status";

#[derive(Clone)]
pub struct WorkoutService {
    store: Arc<dyn WorkoutStore>,
}

impl WorkoutService {
    pub fn new(store: Arc<dyn WorkoutStore>) -> Self {
        Self { store }
    }

    /// 날짜가 정해진 워크아웃 하나를 만듭니다. 상태는 항상 `pending`입니다.
    pub async fn create(
        &self,
        plan_id: &str,
        run_type: &str,
        day: NaiveDate,
        description: &str,
        distance: f64,
    ) -> Result<Workout, AppError> {
        if distance < 0.0 {
            return Err(AppError::validation(NEGATIVE_DISTANCE));
        }
        let run_type =
            RunType::parse(run_type).ok_or_else(|| AppError::validation(INVALID_RUN_TYPE))?;
        if run_type == RunType::StrengthTraining && distance != 0.0 {
            return Err(AppError::validation(STRENGTH_NON_ZERO));
        }

        let workout = new_workout(plan_id, run_type, day, description, distance);
        self.store.create(&workout).await?;
        Ok(workout)
    }

    /// 주차/요일로 표현된 항목들을 검증하고 실제 날짜의 워크아웃으로 바꿔 한 번에 저장합니다.
    ///
    /// 검증 실패 시 `AppError::Validation { index: Some(i), .. }`를 반환하며 아무것도 저장하지 않습니다.
    /// 반환되는 워크아웃은 입력 순서를 그대로 따릅니다.
    pub async fn create_batch(
        &self,
        plan: &TrainingPlan,
        items: &[BulkWorkoutInput],
    ) -> Result<Vec<Workout>, AppError> {
        let workouts = place_batch(plan, items)?;
        self.store.create_batch(&workouts).await?;

        tracing::debug!("Placed {} workouts in plan {}", workouts.len(), plan.id);
        Ok(workouts)
    }

    pub async fn get(&self, id: &str) -> Result<Workout, AppError> {
        self.store.get_by_id(id).await
    }

    pub async fn list_for_plan(&self, plan_id: &str) -> Result<Vec<Workout>, AppError> {
        self.store.list_by_plan(plan_id).await
    }

    /// 전달된 필드만 바꾼 뒤, 합쳐진 결과 전체를 다시 검증하고 저장합니다.
    pub async fn update(&self, id: &str, changes: WorkoutChanges) -> Result<Workout, AppError> {
        let mut workout = self.store.get_by_id(id).await?;
        apply_changes(&mut workout, changes)?;
        self.store.update(&workout).await?;
        Ok(workout)
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        self.store.delete(id).await
    }

    /// 계획의 레이스 날짜에 레이스 워크아웃을 추가합니다.
    ///
    /// 거리는 목표의 표준 거리, 설명은 `Race Day - <Label>`입니다.
    pub async fn create_race_workout(
        &self,
        plan: &TrainingPlan,
        goal: RaceGoal,
    ) -> Result<Workout, AppError> {
        let description = format!("Race Day - {}", goal.label());
        self.create(
            &plan.id,
            RunType::Race.as_str(),
            plan.end_date,
            &description,
            goal.distance_km(),
        )
        .await
    }
}

/// 저장소를 건드리지 않는 순수 검증 + 날짜 계산 단계
fn place_batch(plan: &TrainingPlan, items: &[BulkWorkoutInput]) -> Result<Vec<Workout>, AppError> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let run_type = RunType::parse(&item.run_type)
                .ok_or_else(|| AppError::batch_item(index, INVALID_RUN_TYPE))?;
            if item.distance < 0.0 {
                return Err(AppError::batch_item(index, NEGATIVE_DISTANCE));
            }
            if run_type == RunType::StrengthTraining && item.distance != 0.0 {
                return Err(AppError::batch_item(index, STRENGTH_NON_ZERO));
            }
            if item.week < 1 || item.week > plan.weeks {
                return Err(AppError::batch_item(
                    index,
                    format!("week must be between 1 and {}", plan.weeks),
                ));
            }
            if !(1..=7).contains(&item.day_of_week) {
                return Err(AppError::batch_item(index, INVALID_DAY_OF_WEEK));
            }

            let day = calendar::date_for(plan.start_date, item.week, item.day_of_week);
            Ok(new_workout(
                &plan.id,
                run_type,
                day,
                &item.description,
                item.distance,
            ))
        })
        .collect()
}

fn apply_changes(workout: &mut Workout, changes: WorkoutChanges) -> Result<(), AppError> {
    if let Some(distance) = changes.distance {
        workout.distance = distance;
    }
    if workout.distance < 0.0 {
        return Err(AppError::validation(NEGATIVE_DISTANCE));
    }

    if let Some(run_type) = changes.run_type {
        workout.run_type =
            RunType::parse(&run_type).ok_or_else(|| AppError::validation(INVALID_RUN_TYPE))?;
    }
    if workout.run_type == RunType::StrengthTraining && workout.distance != 0.0 {
        return Err(AppError::validation(STRENGTH_NON_ZERO));
    }

    if let Some(status) = changes.status {
        workout.status =
            WorkoutStatus::parse(&status).ok_or_else(|| AppError::validation(INVALID_STATUS))?;
    }
    if let Some(day) = changes.day {
        workout.day = day;
    }
    if let Some(description) = changes.description {
        workout.description = description;
    }
    if let Some(notes) = changes.notes {
        workout.notes = notes;
    }

    Ok(())
}

fn new_workout(
    plan_id: &str,
    run_type: RunType,
    day: NaiveDate,
    description: &str,
    distance: f64,
) -> Workout {
    Workout {
        id: Uuid::now_v7().to_string(),
        plan_id: plan_id.to_string(),
        run_type,
        day,
        description: description.to_string(),
        notes: String::new(),
        status: WorkoutStatus::Pending,
        distance,
    }
}
