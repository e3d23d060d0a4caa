//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! 각 하위 모듈은 특정 도메인의 데이터 타입을 담당합니다:
//! - `plan`: 훈련 계획(TrainingPlan)과 생성/수정 요청
//! - `workout`: 워크아웃, 러닝 종류/상태 열거형, 배치 입력
//! - `detail`: 주/요일 단위로 묶은 계획 상세 뷰 (읽기 전용, 저장하지 않음)
//! - `generation`: AI 계획 생성 입력과 레이스 목표
//!
//! JSON 필드 이름은 camelCase로 직렬화됩니다 (예: `endDate`, `runType`).

pub mod detail;
pub mod generation;
pub mod plan;
pub mod workout;

pub use detail::*;
pub use generation::*;
pub use plan::*;
pub use workout::*;
