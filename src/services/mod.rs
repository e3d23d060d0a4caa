//! # 비즈니스 로직 모듈
//!
//! - `calendar`: 계획 시작일과 주차/요일 → 날짜 계산 (순수 함수)
//! - `workouts`: 워크아웃 생성, 배치 배치 검증, 부분 수정, 레이스 워크아웃
//! - `plans`: 훈련 계획 CRUD와 시작일 재계산
//! - `plan_detail`: 주/요일 격자와 주간 거리 집계 (순수 함수)
//! - `completion`: 텍스트 생성 포트와 OpenAI 호환 클라이언트
//! - `generate`: AI 기반 시즌 계획 생성

pub mod calendar;
pub mod completion;
pub mod generate;
pub mod plan_detail;
pub mod plans;
pub mod workouts;

pub use completion::{OpenAiClient, TextCompletion};
pub use generate::GenerateService;
pub use plan_detail::build_plan_detail;
pub use plans::PlanService;
pub use workouts::WorkoutService;
