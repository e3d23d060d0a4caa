//! 계획 상세 뷰. 매 조회마다 워크아웃 목록에서 다시 계산되며 저장하지 않습니다.

use chrono::NaiveDate;
use serde::Serialize;

use super::{TrainingPlan, Workout};

/// `GET /api/plans/{id}` 응답: 계획 필드 + 주 단위 요약
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanDetail {
    #[serde(flatten)]
    pub plan: TrainingPlan,
    pub weeks_summary: Vec<WeekSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekSummary {
    /// 1부터 시작하는 주차
    pub number: i64,
    /// 월요일부터 일요일까지 항상 7개
    pub days: Vec<DayDetail>,
    pub planned_km: f64,
    pub done_km: f64,
    /// 워크아웃이 하나 이상 있고 모두 완료 또는 건너뜀 상태일 때만 true
    pub all_done: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayDetail {
    pub date: NaiveDate,
    pub day_name: &'static str,
    pub workouts: Vec<Workout>,
}
