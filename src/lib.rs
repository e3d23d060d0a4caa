//! # Runplanner
//!
//! 레이스 날짜를 기준으로 주 단위 러닝 훈련 계획을 만들고 관리하는 서버의 라이브러리 크레이트입니다.
//! 실행 파일(`main.rs`)과 통합 테스트(`tests/`)가 이 크레이트를 공유합니다.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

#[cfg(test)]
pub(crate) mod test_utils;
