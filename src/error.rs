//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//!
//! 이 모듈의 핵심:
//! - `AppError` 열거형(enum): 모든 에러 종류를 하나의 타입으로 통합
//! - `IntoResponse` 구현: 에러를 HTTP 응답으로 자동 변환
//!
//! 에러 분류:
//! - `NotFound`: 요청한 엔티티가 없음
//! - `Validation`: 호출자가 보낸 데이터가 제약을 위반함 (배치 작업이면 0부터 시작하는 항목 인덱스 포함)
//! - `Conflict`: 유니크 키 중복
//! - `Configuration`: 필요한 외부 협력자(AI 텍스트 생성)가 설정되지 않음
//! - `Upstream`: 외부 협력자 호출 실패 또는 해석할 수 없는 응답
//! - `Internal` / `Database`: 예상하지 못한 영속성 실패

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 요청한 리소스를 찾을 수 없음 (HTTP 404)
    #[error("{0} not found")]
    NotFound(&'static str),

    /// 입력값 검증 실패 (HTTP 400)
    ///
    /// 배치 생성에서는 `index`에 실패한 항목의 위치(0부터)가 들어갑니다.
    #[error("{}", validation_message(.index, .message))]
    Validation {
        index: Option<usize>,
        message: String,
    },

    /// 리소스 충돌 (HTTP 409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 외부 협력자가 설정되지 않음 (HTTP 400)
    #[error("{0}")]
    Configuration(String),

    /// 외부 협력자 호출 실패 (HTTP 502)
    #[error("{0}")]
    Upstream(String),

    /// 서버 내부 오류 (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),

    /// 데이터베이스 오류 (HTTP 500)
    /// #[from]: sqlx::Error → AppError::Database 자동 변환 (`?` 연산자와 함께 사용)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

fn validation_message(index: &Option<usize>, message: &str) -> String {
    match index {
        Some(i) => format!("workout[{}]: {}", i, message),
        None => message.to_string(),
    }
}

impl AppError {
    /// 인덱스 없는 검증 에러를 만듭니다.
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation {
            index: None,
            message: message.into(),
        }
    }

    /// 배치의 `index`번째 항목에서 발생한 검증 에러를 만듭니다.
    pub fn batch_item(index: usize, message: impl Into<String>) -> Self {
        AppError::Validation {
            index: Some(index),
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 내부 에러(Database, Internal)는 실제 에러 내용을 로그에만 기록하고,
    /// 클라이언트에는 일반적인 메시지만 반환합니다.
    fn into_response(self) -> Response {
        // 배치 검증 에러는 실패한 항목의 인덱스를 별도 필드로 함께 보냅니다.
        let index = match &self {
            AppError::Validation { index, .. } => *index,
            _ => None,
        };

        let (status, code, message) = match self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", self.to_string()),
            AppError::Validation { .. } => {
                (StatusCode::BAD_REQUEST, "invalid_input", self.to_string())
            }
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            AppError::Configuration(ref msg) => {
                (StatusCode::BAD_REQUEST, "not_configured", msg.clone())
            }
            AppError::Upstream(ref msg) => {
                tracing::warn!("Upstream failure: {}", msg);
                (StatusCode::BAD_GATEWAY, "upstream_failure", msg.clone())
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "A database error occurred".to_string(),
                )
            }
        };

        // 결과: { "error": { "code": "invalid_input", "message": "...", "index": 1 } }
        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(i) = index {
            error["index"] = json!(i);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
