//! # 헬스체크 핸들러
//!
//! - `GET /api/health` → `{ "status": "ok" }`
//!
//! 인증 없이 호출할 수 있으며, 로드밸런서나 컨테이너 헬스체크에서 사용합니다.

use axum::Json;
use serde_json::{json, Value};

/// `GET /health`: 프로세스가 요청을 받을 수 있으면 항상 200을 반환합니다.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok"
    }))
}
