//! # AI 계획 생성 모델
//!
//! 시즌 단위 파라미터(주 수, 주간 기본 거리, 주당 러닝 횟수, 레이스 목표)와
//! 레이스 목표별 표준 거리를 정의합니다.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{TrainingPlan, Workout};

/// 레이스 목표: 고정된 소문자 토큰으로만 주고받습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaceGoal {
    FiveK,
    TenK,
    HalfMarathon,
    Marathon,
}

impl RaceGoal {
    /// `5k`, `10k`, `halfmarathon`, `marathon` 중 하나만 허용합니다.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "5k" => Some(RaceGoal::FiveK),
            "10k" => Some(RaceGoal::TenK),
            "halfmarathon" => Some(RaceGoal::HalfMarathon),
            "marathon" => Some(RaceGoal::Marathon),
            _ => None,
        }
    }

    /// 레이스 당일 워크아웃에 기록되는 표준 거리(km)
    pub fn distance_km(&self) -> f64 {
        match self {
            RaceGoal::FiveK => 5.0,
            RaceGoal::TenK => 10.0,
            RaceGoal::HalfMarathon => 21.0,
            RaceGoal::Marathon => 42.0,
        }
    }

    /// 사람이 읽는 이름 (워크아웃 설명과 프롬프트에 사용)
    pub fn label(&self) -> &'static str {
        match self {
            RaceGoal::FiveK => "5K",
            RaceGoal::TenK => "10K",
            RaceGoal::HalfMarathon => "Half Marathon",
            RaceGoal::Marathon => "Marathon",
        }
    }
}

/// 생성 오케스트레이터 입력. 날짜는 이미 파싱된 상태이고 나머지 범위 검증은 오케스트레이터가 합니다.
#[derive(Debug, Clone)]
pub struct GenerateInput {
    pub name: String,
    pub end_date: NaiveDate,
    pub weeks: i64,
    pub base_km_per_week: f64,
    pub runs_per_week: i64,
    pub race_goal: String,
}

/// `POST /api/plans/generate` 요청 본문
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratePlanRequest {
    pub name: String,
    pub end_date: String,
    pub weeks: i64,
    pub base_km_per_week: f64,
    pub runs_per_week: i64,
    pub race_goal: String,
}

/// 생성 결과: 만들어진 계획과 워크아웃 (레이스 워크아웃이 마지막)
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedPlan {
    pub plan: TrainingPlan,
    pub workouts: Vec<Workout>,
}
