//! # 달력 계산 서비스
//!
//! 훈련 계획의 날짜 계산을 담당하는 순수 함수들입니다. 외부 의존성이 없습니다.
//!
//! 이 모듈의 함수들:
//! - `start_date_for()`: 레이스 날짜와 주 수로 1주차 월요일을 계산
//! - `date_for()`: (시작일, 주차, 요일) → 실제 날짜
//! - `parse_date()`: `YYYY-MM-DD` 문자열을 날짜로 변환
//!
//! 모든 날짜는 시각 정보가 없는 `NaiveDate`(UTC 기준 날짜)로 다룹니다.

use chrono::{Datelike, Days, NaiveDate};

use crate::error::AppError;

/// 외부 표현에 쓰는 날짜 형식
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 계획 하나가 가질 수 있는 최대 주 수 (2년)
pub const MAX_WEEKS: i64 = 104;

/// 월요일부터 일요일까지의 요일 이름
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// `end_date`가 속한 주를 마지막 주로 하는 `weeks`주 훈련 블록의 시작 월요일을 반환합니다.
///
/// 1. `end_date`가 속한 주의 월요일을 찾습니다 (일요일이면 6일 전).
/// 2. 그 월요일에서 `(weeks - 1) * 7`일을 뺍니다.
///
/// `weeks < 1`이거나 결과가 표현 가능한 날짜 범위를 벗어나면 `None`입니다.
///
/// # 예시
/// ```text
/// start_date_for(2025-04-12 (토), 12) → 2025-01-20 (월)
/// start_date_for(2025-05-05 (월), 4)  → 2025-04-14 (월)
/// ```
pub fn start_date_for(end_date: NaiveDate, weeks: i64) -> Option<NaiveDate> {
    // num_days_from_monday(): 월요일=0 … 일요일=6
    // 일요일을 0으로 세는 달력과 달리 일요일 특수 처리가 필요 없습니다.
    let days_since_monday = u64::from(end_date.weekday().num_days_from_monday());
    let earlier_weeks = u64::try_from(weeks.checked_sub(1)?).ok()?;
    let days_back = earlier_weeks.checked_mul(7)?.checked_add(days_since_monday)?;
    end_date.checked_sub_days(Days::new(days_back))
}

/// `start_date + (week - 1) * 7 + (day_of_week - 1)`일을 반환합니다.
///
/// 범위 검사는 하지 않습니다 (배치 검증이 먼저 수행합니다).
pub fn date_for(start_date: NaiveDate, week: i64, day_of_week: i64) -> NaiveDate {
    let offset = (week - 1) * 7 + (day_of_week - 1);
    if offset >= 0 {
        start_date + Days::new(offset as u64)
    } else {
        start_date - Days::new(offset.unsigned_abs())
    }
}

/// `YYYY-MM-DD` 문자열을 날짜로 변환합니다.
///
/// `field`는 에러 메시지에 들어갈 필드 이름입니다 (예: "endDate must be YYYY-MM-DD").
pub fn parse_date(value: &str, field: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| AppError::validation(format!("{} must be YYYY-MM-DD", field)))
}
