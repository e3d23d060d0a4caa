use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// 훈련 계획 엔티티: DB의 `training_plans` 테이블 한 행에 대응합니다.
///
/// `start_date`는 항상 `end_date`와 `weeks`로부터 계산된 값입니다.
/// 둘 중 하나가 바뀌면 시작일도 다시 계산해서 함께 저장합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TrainingPlan {
    pub id: String,
    /// 계획을 소유한 사용자 ID (토큰의 `sub` 클레임)
    pub user_id: String,
    pub name: String,
    /// 레이스 날짜 (시각 정보 없음)
    pub end_date: NaiveDate,
    /// 계획 주 수 (1 이상)
    pub weeks: i64,
    /// 1주차 월요일
    pub start_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// `POST /api/plans` 요청 본문
///
/// 누락된 필드는 기본값으로 채운 뒤 서비스 계층에서 검증하므로,
/// 빠진 값도 JSON 파싱 에러가 아니라 400 검증 에러로 응답합니다.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreatePlanRequest {
    pub name: String,
    /// `YYYY-MM-DD`
    pub end_date: String,
    pub weeks: i64,
    /// 지정하면 레이스 당일 워크아웃을 함께 만듭니다 (`5k`, `10k`, `halfmarathon`, `marathon`)
    pub race_goal: Option<String>,
}

/// `PUT /api/plans/{id}` 요청 본문: 이름, 레이스 날짜, 주 수를 모두 교체합니다.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdatePlanRequest {
    pub name: String,
    pub end_date: String,
    pub weeks: i64,
}
