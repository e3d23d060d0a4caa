//! # 훈련 계획 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET    /api/plans`                     → 내 계획 목록 (최근 생성 순) + 활성 계획 ID
//! - `POST   /api/plans`                     → 계획 생성 (raceGoal을 주면 레이스 워크아웃도 추가)
//! - `POST   /api/plans/generate`            → AI로 시즌 계획 생성
//! - `GET    /api/plans/{id}`                → 계획 상세 (주/요일 격자 + 주간 거리)
//! - `PUT    /api/plans/{id}`                → 이름/레이스 날짜/주 수 수정
//! - `DELETE /api/plans/{id}`                → 계획 삭제 (워크아웃도 함께 삭제)
//! - `POST   /api/plans/{id}/activate`       → 활성 계획 지정/해제 (토글)
//! - `GET    /api/plans/{id}/workouts`       → 계획의 워크아웃 목록
//! - `POST   /api/plans/{id}/workouts/batch` → 주차/요일 기반 워크아웃 일괄 생성
//!
//! 다른 사용자의 계획은 모두 404로 응답합니다.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use super::AppState;
use crate::{
    error::AppError,
    middleware::AuthUser,
    models::*,
    services::{build_plan_detail, calendar},
};

/// `GET /plans`: `{ "plans": [...], "activePlanId": "..." | null }`
pub async fn list_plans(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Value>, AppError> {
    let plans = state.plans.list_for_user(&user.user_id).await?;
    let active_plan_id = state.plans.active_plan(&user.user_id).await?;
    Ok(Json(json!({ "plans": plans, "activePlanId": active_plan_id })))
}

/// `POST /plans`: 계획을 만들고 `201 { "plan": ... }`을 반환합니다.
///
/// `raceGoal`이 있으면 레이스 날짜에 레이스 워크아웃을 추가하고,
/// 그 단계가 실패하면 방금 만든 계획을 삭제한 뒤 에러를 반환합니다.
pub async fn create_plan(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreatePlanRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let end_date = calendar::parse_date(&req.end_date, "endDate")?;
    let goal = req
        .race_goal
        .as_deref()
        .map(|g| {
            RaceGoal::parse(g).ok_or_else(|| {
                AppError::validation("raceGoal must be one of: 5k, 10k, halfmarathon, marathon")
            })
        })
        .transpose()?;

    let plan = state
        .plans
        .create(&user.user_id, &req.name, end_date, req.weeks)
        .await?;

    if let Some(goal) = goal {
        if let Err(e) = state.workouts.create_race_workout(&plan, goal).await {
            state.plans.discard(&plan.id).await;
            return Err(e);
        }
    }

    Ok((StatusCode::CREATED, Json(json!({ "plan": plan }))))
}

/// `POST /plans/generate`: `201 { "plan": ..., "workouts": [...] }`
///
/// 서버 종료 신호가 오면 진행 중인 AI 호출을 중단합니다.
pub async fn generate_plan(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<GeneratePlanRequest>,
) -> Result<(StatusCode, Json<GeneratedPlan>), AppError> {
    state.generate.ensure_configured()?;

    let input = GenerateInput {
        end_date: calendar::parse_date(&req.end_date, "endDate")?,
        name: req.name,
        weeks: req.weeks,
        base_km_per_week: req.base_km_per_week,
        runs_per_week: req.runs_per_week,
        race_goal: req.race_goal,
    };

    let generated = state
        .generate
        .generate(&user.user_id, input, &state.shutdown)
        .await?;
    Ok((StatusCode::CREATED, Json(generated)))
}

/// `GET /plans/{id}`: `{ "plan": PlanDetail }`
///
/// 주 요약은 저장하지 않고 매번 현재 워크아웃 상태로 다시 계산합니다.
pub async fn get_plan(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let plan = state.plans.get_owned(&user.user_id, &id).await?;
    let workouts = state.workouts.list_for_plan(&plan.id).await?;
    let detail = build_plan_detail(&plan, &workouts);
    Ok(Json(json!({ "plan": detail })))
}

/// `PUT /plans/{id}`: 시작일은 새 레이스 날짜/주 수로 다시 계산됩니다.
pub async fn update_plan(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdatePlanRequest>,
) -> Result<Json<Value>, AppError> {
    let end_date = calendar::parse_date(&req.end_date, "endDate")?;
    let plan = state
        .plans
        .update(&user.user_id, &id, &req.name, end_date, req.weeks)
        .await?;
    Ok(Json(json!({ "plan": plan })))
}

pub async fn delete_plan(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let plan = state.plans.get_owned(&user.user_id, &id).await?;
    state.plans.delete(&plan.id).await?;
    Ok(Json(json!({ "deleted": true })))
}

/// `POST /plans/{id}/activate`: `{ "activePlanId": "..." | null }`
///
/// 이미 활성 계획이면 해제되어 `null`이 반환됩니다.
pub async fn activate_plan(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let active_plan_id = state.plans.toggle_active(&user.user_id, &id).await?;
    Ok(Json(json!({ "activePlanId": active_plan_id })))
}

/// `GET /plans/{id}/workouts`: 날짜순
pub async fn list_plan_workouts(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let plan = state.plans.get_owned(&user.user_id, &id).await?;
    let workouts = state.workouts.list_for_plan(&plan.id).await?;
    Ok(Json(json!({ "workouts": workouts })))
}

/// `POST /plans/{id}/workouts/batch`
///
/// 항목 하나라도 검증에 실패하면 아무것도 저장하지 않고
/// `400 { "error": { "code": "invalid_input", "message": "workout[i]: ...", "index": i } }`로 응답합니다.
pub async fn create_workout_batch(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<BatchWorkoutsRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let plan = state.plans.get_owned(&user.user_id, &id).await?;
    let workouts = state.workouts.create_batch(&plan, &req.workouts).await?;
    Ok((StatusCode::CREATED, Json(json!({ "workouts": workouts }))))
}
