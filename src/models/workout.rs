//! # 워크아웃 모델 정의
//!
//! 계획에 속한 하루 단위 훈련(러닝 또는 근력 운동)을 나타내는 구조체들입니다.
//!
//! 러닝 종류(`RunType`)와 상태(`WorkoutStatus`)는 닫힌 집합이므로
//! 문자열 맵 대신 열거형으로 표현하고, 문자열 입력은 `parse()`에서 `match`로 검사합니다.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 워크아웃 종류
///
/// DB와 JSON에는 snake_case 문자열(`easy_run`, `strength_training` 등)로 저장됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum RunType {
    EasyRun,
    Intervals,
    LongRun,
    TempoRun,
    StrengthTraining,
    Race,
}

impl RunType {
    /// 문자열을 러닝 종류로 변환합니다. 허용 목록에 없으면 None
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "easy_run" => Some(RunType::EasyRun),
            "intervals" => Some(RunType::Intervals),
            "long_run" => Some(RunType::LongRun),
            "tempo_run" => Some(RunType::TempoRun),
            "strength_training" => Some(RunType::StrengthTraining),
            "race" => Some(RunType::Race),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunType::EasyRun => "easy_run",
            RunType::Intervals => "intervals",
            RunType::LongRun => "long_run",
            RunType::TempoRun => "tempo_run",
            RunType::StrengthTraining => "strength_training",
            RunType::Race => "race",
        }
    }
}

/// 워크아웃 진행 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum WorkoutStatus {
    Pending,
    Completed,
    Skipped,
}

impl WorkoutStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(WorkoutStatus::Pending),
            "completed" => Some(WorkoutStatus::Completed),
            "skipped" => Some(WorkoutStatus::Skipped),
            _ => None,
        }
    }

    /// 완료했거나 건너뛰어서 더 이상 할 일이 없는 상태인지
    pub fn is_settled(&self) -> bool {
        matches!(self, WorkoutStatus::Completed | WorkoutStatus::Skipped)
    }
}

/// 워크아웃 엔티티: DB의 `workouts` 테이블 한 행에 대응합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: String,
    /// 소속 계획 ID (역참조일 뿐, 워크아웃을 지워도 계획은 그대로입니다)
    pub plan_id: String,
    pub run_type: RunType,
    /// 워크아웃 날짜 (`YYYY-MM-DD`)
    pub day: NaiveDate,
    pub description: String,
    pub notes: String,
    pub status: WorkoutStatus,
    /// 거리(km). 근력 운동이면 항상 0
    pub distance: f64,
}

/// 주차/요일 기준으로 표현된 워크아웃 제안: 저장되지 않는 임시 입력입니다.
///
/// AI 생성 결과와 `POST /api/plans/{id}/workouts/batch` 요청이 이 형태를 사용합니다.
/// 검증을 통과하면 계획의 시작일을 기준으로 실제 날짜가 계산됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkWorkoutInput {
    /// 문자열 그대로 받습니다. 허용되지 않는 값은 배치 검증에서 인덱스와 함께 거부됩니다.
    pub run_type: String,
    /// 1부터 시작하는 주차
    pub week: i64,
    /// 1=월요일 … 7=일요일
    pub day_of_week: i64,
    #[serde(default)]
    pub description: String,
    pub distance: f64,
}

/// `POST /api/workouts` 요청 본문
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateWorkoutRequest {
    pub plan_id: String,
    pub run_type: String,
    /// `YYYY-MM-DD`
    pub day: String,
    pub description: String,
    pub distance: f64,
}

/// `PUT /api/workouts/{id}` 요청 본문 (부분 업데이트)
///
/// None = 필드 누락 (변경 안 함)
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkoutRequest {
    pub run_type: Option<String>,
    pub day: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub status: Option<String>,
    pub distance: Option<f64>,
}

/// 날짜 문자열을 파싱한 뒤 서비스 계층에 넘기는 변경 집합
#[derive(Debug, Default, Clone)]
pub struct WorkoutChanges {
    pub run_type: Option<String>,
    pub day: Option<NaiveDate>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub status: Option<String>,
    pub distance: Option<f64>,
}

/// `POST /api/plans/{id}/workouts/batch` 요청 본문
#[derive(Debug, Deserialize)]
pub struct BatchWorkoutsRequest {
    pub workouts: Vec<BulkWorkoutInput>,
}
