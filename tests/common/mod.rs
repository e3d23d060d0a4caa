//! 통합 테스트 공용 헬퍼: 인메모리 DB 위에 조립한 Router, 토큰 발급, 요청/응답 유틸리티

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use runplanner::{
    db::{SqlitePlanStore, SqliteWorkoutStore},
    middleware::auth::Claims,
    routes::{build_router, AppState},
    services::{
        completion::CompletionError, GenerateService, PlanService, TextCompletion, WorkoutService,
    },
};
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

pub const JWT_SECRET: &str = "integration-test-secret";

/// 항상 같은 텍스트를 돌려주는 텍스트 생성 협력자
pub struct FixedCompletion(pub String);

#[async_trait]
impl TextCompletion for FixedCompletion {
    async fn complete(
        &self,
        _system: &str,
        _user: &str,
        _timeout: Duration,
    ) -> Result<String, CompletionError> {
        Ok(self.0.clone())
    }
}

pub async fn app(completion: Option<Arc<dyn TextCompletion>>) -> Router {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");

    let plans = PlanService::new(Arc::new(SqlitePlanStore::new(pool.clone())));
    let workouts = WorkoutService::new(Arc::new(SqliteWorkoutStore::new(pool)));
    let generate = GenerateService::new(
        completion,
        plans.clone(),
        workouts.clone(),
        Duration::from_secs(5),
    );

    build_router(AppState {
        plans,
        workouts,
        generate,
        jwt_secret: JWT_SECRET.to_string(),
        shutdown: CancellationToken::new(),
    })
}

pub fn token_for(user_id: &str) -> String {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + chrono::Duration::minutes(15)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("token")
}

/// 요청을 보내고 (상태 코드, JSON 본문)을 돌려줍니다. 본문이 비어 있으면 `Value::Null`
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    user: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token_for(user)));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1_048_576)
        .await
        .expect("body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, json)
}
