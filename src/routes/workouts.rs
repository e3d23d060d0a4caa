//! # 워크아웃 라우트 핸들러
//!
//! ## 엔드포인트
//! - `POST   /api/workouts`      → 날짜를 지정해 워크아웃 하나 생성
//! - `GET    /api/workouts/{id}` → 워크아웃 조회
//! - `PUT    /api/workouts/{id}` → 부분 수정 (보낸 필드만 변경)
//! - `DELETE /api/workouts/{id}` → 워크아웃 삭제 (계획에는 영향 없음)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use super::AppState;
use crate::{error::AppError, middleware::AuthUser, models::*, services::calendar};

/// 요청한 사용자의 계획에 속한 워크아웃만 돌려줍니다. 아니면 404
async fn owned_workout(state: &AppState, user: &AuthUser, id: &str) -> Result<Workout, AppError> {
    let workout = state.workouts.get(id).await?;
    state
        .plans
        .get_owned(&user.user_id, &workout.plan_id)
        .await
        .map_err(|e| match e {
            AppError::NotFound(_) => AppError::NotFound("workout"),
            other => other,
        })?;
    Ok(workout)
}

/// `POST /workouts`: `201 { "workout": ... }`
pub async fn create_workout(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateWorkoutRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let plan = state.plans.get_owned(&user.user_id, &req.plan_id).await?;
    let day = calendar::parse_date(&req.day, "day")?;

    let workout = state
        .workouts
        .create(&plan.id, &req.run_type, day, &req.description, req.distance)
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "workout": workout }))))
}

pub async fn get_workout(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let workout = owned_workout(&state, &user, &id).await?;
    Ok(Json(json!({ "workout": workout })))
}

/// `PUT /workouts/{id}`: 예: `{ "status": "completed", "notes": "felt strong" }`
pub async fn update_workout(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateWorkoutRequest>,
) -> Result<Json<Value>, AppError> {
    owned_workout(&state, &user, &id).await?;

    let changes = WorkoutChanges {
        day: req
            .day
            .as_deref()
            .map(|d| calendar::parse_date(d, "day"))
            .transpose()?,
        run_type: req.run_type,
        description: req.description,
        notes: req.notes,
        status: req.status,
        distance: req.distance,
    };

    let workout = state.workouts.update(&id, changes).await?;
    Ok(Json(json!({ "workout": workout })))
}

pub async fn delete_workout(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    owned_workout(&state, &user, &id).await?;
    state.workouts.delete(&id).await?;
    Ok(Json(json!({ "deleted": true })))
}
