//! # AI 훈련 계획 생성 (Generation Orchestrator)
//!
//! 시즌 단위 파라미터를 받아 텍스트 생성 협력자에게 주차/요일 기반 워크아웃 목록을 요청하고,
//! 응답을 검증/저장한 뒤 레이스 당일 워크아웃을 덧붙입니다.
//!
//! ## 처리 순서
//! 1. 텍스트 생성 협력자가 설정되어 있는지 확인 (없으면 Configuration 에러)
//! 2. 입력 검증: weeks → baseKmPerWeek → runsPerWeek → name → raceGoal
//! 3. 시스템 지시문(주기화 규칙)과 사용자 지시문(구체적 파라미터) 구성
//! 4. 데드라인과 취소 신호를 걸고 협력자 호출
//! 5. `{"workouts": [...]}` JSON 파싱 (비어 있거나 파싱 실패 시 Upstream 에러)
//! 6. 거리를 가장 가까운 정수로 반올림
//! 7. 계획 생성
//! 8. 워크아웃 배치 생성 (실패 시 계획 삭제)
//! 9. 레이스 날짜에 레이스 워크아웃 추가 (실패 시 계획 삭제)
//!
//! 협력자 호출이 끝나기 전에는 아무것도 저장하지 않으므로, 취소나 타임아웃은 흔적을 남기지 않습니다.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::error::AppError;
use crate::models::{BulkWorkoutInput, GenerateInput, GeneratedPlan, RaceGoal};
use crate::services::calendar;
use crate::services::completion::TextCompletion;
use crate::services::plans::PlanService;
use crate::services::workouts::WorkoutService;

const NOT_CONFIGURED: &str = "AI generation is not configured";
const GENERATION_FAILED: &str = "AI generation failed";

const SYSTEM_PROMPT: &str = r#"You are a running coach who writes structured training plans. Reply with a single JSON object and nothing else.

Example of the required shape:
{ "workouts": [
    { "runType": "easy_run", "week": 1, "dayOfWeek": 1, "description": "Easy + 4x20s strides", "distance": 8 },
    { "runType": "tempo_run", "week": 1, "dayOfWeek": 3, "description": "3k easy, 4k tempo, 3k easy", "distance": 10 },
    { "runType": "easy_run", "week": 1, "dayOfWeek": 4, "description": "Recovery", "distance": 6 },
    { "runType": "long_run", "week": 1, "dayOfWeek": 6, "description": "Conversational pace", "distance": 16 }
  ]
}

Periodization rules:
- Increase weekly volume by about 10% on normal weeks.
- Every 4th week is a deload week: cut total volume by 40% and drop speed sessions.
- Taper over the final 3 weeks:
  - Week N-2: 75% of peak volume with one long_run shorter than the peak long run.
  - Week N-1: 50% of peak volume with one short long_run (12-15 km).
  - Week N (race week): 20% of peak volume, only easy_run shake-outs of 3-5 km. No long_run and no speed work.
- Every week except race week has exactly one long_run on Saturday (6) or Sunday (7).
- The first long_run is 15-18 km and builds toward a peak suited to the race distance.
- With 3 or more runs per week, add one speed session on normal weeks, alternating tempo_run and intervals.
- Fill the remaining runs with easy_run and vary their distances.
- About 80% of weekly volume comes from easy_run and long_run.
- Every distance is a whole number of kilometers.
- Give each workout a short description.

Allowed run types: easy_run, intervals, long_run, tempo_run.
Never emit a race workout; the race day is added separately.
dayOfWeek: 1 = Monday ... 7 = Sunday.

Each workout: {"runType": string, "week": int, "dayOfWeek": int, "description": string, "distance": number}"#;

/// 협력자 응답 형식
#[derive(Debug, Deserialize)]
struct CompletionReply {
    #[serde(default)]
    workouts: Vec<BulkWorkoutInput>,
}

#[derive(Clone)]
pub struct GenerateService {
    completion: Option<Arc<dyn TextCompletion>>,
    plans: PlanService,
    workouts: WorkoutService,
    timeout: Duration,
}

impl GenerateService {
    pub fn new(
        completion: Option<Arc<dyn TextCompletion>>,
        plans: PlanService,
        workouts: WorkoutService,
        timeout: Duration,
    ) -> Self {
        Self {
            completion,
            plans,
            workouts,
            timeout,
        }
    }

    /// 텍스트 생성 협력자가 없으면 Configuration 에러
    ///
    /// 핸들러가 요청 본문을 해석하기 전에 먼저 호출해, 설정 에러가 입력 에러보다 앞서게 합니다.
    pub fn ensure_configured(&self) -> Result<&Arc<dyn TextCompletion>, AppError> {
        self.completion
            .as_ref()
            .ok_or_else(|| AppError::Configuration(NOT_CONFIGURED.to_string()))
    }

    /// 계획과 워크아웃을 생성합니다. 반환되는 워크아웃 목록의 마지막은 레이스 워크아웃입니다.
    pub async fn generate(
        &self,
        user_id: &str,
        input: GenerateInput,
        cancel: &CancellationToken,
    ) -> Result<GeneratedPlan, AppError> {
        let completion = self.ensure_configured()?;

        let goal = validate_input(&input)?;
        let user_prompt = build_user_prompt(&input, goal);

        tracing::info!(
            "Generating {}-week {} plan for user {}",
            input.weeks,
            goal.label(),
            user_id
        );

        let raw = tokio::select! {
            _ = cancel.cancelled() => {
                return Err(AppError::Upstream(format!("{}: cancelled", GENERATION_FAILED)));
            }
            result = tokio::time::timeout(
                self.timeout,
                completion.complete(SYSTEM_PROMPT, &user_prompt, self.timeout),
            ) => match result {
                Ok(Ok(text)) => text,
                Ok(Err(e)) => return Err(AppError::Upstream(format!("{}: {}", GENERATION_FAILED, e))),
                Err(_) => {
                    return Err(AppError::Upstream(format!(
                        "{}: timed out after {:?}",
                        GENERATION_FAILED, self.timeout
                    )))
                }
            },
        };

        let items = parse_workouts(&raw).map_err(|reason| {
            AppError::Upstream(format!(
                "{}: failed to parse AI response: {}",
                GENERATION_FAILED, reason
            ))
        })?;

        let plan = self
            .plans
            .create(user_id, &input.name, input.end_date, input.weeks)
            .await?;

        let mut workouts = match self.workouts.create_batch(&plan, &items).await {
            Ok(workouts) => workouts,
            Err(e) => {
                self.plans.discard(&plan.id).await;
                return Err(wrap("failed to create workouts", e));
            }
        };

        match self.workouts.create_race_workout(&plan, goal).await {
            Ok(race) => workouts.push(race),
            Err(e) => {
                self.plans.discard(&plan.id).await;
                return Err(wrap("failed to create race workout", e));
            }
        }

        tracing::info!(
            "Generated plan {} with {} workouts",
            plan.id,
            workouts.len()
        );
        Ok(GeneratedPlan { plan, workouts })
    }
}

/// 검증 순서가 곧 에러 메시지의 우선순위입니다.
fn validate_input(input: &GenerateInput) -> Result<RaceGoal, AppError> {
    if input.weeks < 6 {
        return Err(AppError::validation("weeks must be at least 6"));
    }
    if input.weeks > calendar::MAX_WEEKS {
        return Err(AppError::validation(format!(
            "weeks must be at most {}",
            calendar::MAX_WEEKS
        )));
    }
    if input.base_km_per_week <= 0.0 {
        return Err(AppError::validation("baseKmPerWeek must be greater than 0"));
    }
    if !(2..=7).contains(&input.runs_per_week) {
        return Err(AppError::validation("runsPerWeek must be between 2 and 7"));
    }
    if input.name.trim().is_empty() {
        return Err(AppError::validation("name is required"));
    }
    RaceGoal::parse(&input.race_goal).ok_or_else(|| {
        AppError::validation("raceGoal must be one of: 5k, 10k, halfmarathon, marathon")
    })
}

fn build_user_prompt(input: &GenerateInput, goal: RaceGoal) -> String {
    format!(
        "Create a {weeks}-week training plan with {runs} runs per week. \
         Base weekly volume: {base:.1} km. \
         Race goal: {label} ({distance} km); size the peak long run and total volume for this distance. \
         Spread the volume across the runs with sensible progression. \
         Deload every 4th week and taper over the last 3 weeks before race day (week {weeks}).",
        weeks = input.weeks,
        runs = input.runs_per_week,
        base = input.base_km_per_week,
        label = goal.label(),
        distance = goal.distance_km(),
    )
}

/// 응답 텍스트를 배치 입력으로 바꾸고 거리를 정수 km로 반올림합니다.
fn parse_workouts(raw: &str) -> Result<Vec<BulkWorkoutInput>, String> {
    let reply: CompletionReply =
        serde_json::from_str(raw.trim()).map_err(|e| format!("invalid JSON: {}", e))?;
    if reply.workouts.is_empty() {
        return Err("no workouts in response".to_string());
    }

    Ok(reply
        .workouts
        .into_iter()
        .map(|mut item| {
            item.distance = item.distance.round();
            item
        })
        .collect())
}

/// 계획 생성 이후 단계의 에러에 맥락을 붙입니다.
///
/// 배치 검증 실패는 협력자가 잘못된 항목을 만든 것이므로 Upstream으로 분류합니다.
fn wrap(context: &str, err: AppError) -> AppError {
    match err {
        AppError::Validation { .. } => AppError::Upstream(format!("{}: {}", context, err)),
        AppError::Database(_) | AppError::Internal(_) => {
            AppError::Internal(format!("{}: {}", context, err))
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{SqlitePlanStore, SqliteWorkoutStore};
    use crate::models::{RunType, WorkoutStatus};
    use crate::services::completion::CompletionError;
    use crate::test_utils::setup_test_db;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    /// 미리 정해둔 응답을 돌려주고 받은 지시문을 기록하는 협력자
    struct ScriptedCompletion {
        reply: Result<String, String>,
        prompts: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedCompletion {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(message.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl TextCompletion for ScriptedCompletion {
        async fn complete(
            &self,
            system: &str,
            user: &str,
            _timeout: Duration,
        ) -> Result<String, CompletionError> {
            self.prompts
                .lock()
                .unwrap()
                .push((system.to_string(), user.to_string()));
            self.reply.clone().map_err(CompletionError::Api)
        }
    }

    /// 응답하지 않는 협력자 (취소/타임아웃 검증용)
    struct HangingCompletion;

    #[async_trait]
    impl TextCompletion for HangingCompletion {
        async fn complete(
            &self,
            _system: &str,
            _user: &str,
            _timeout: Duration,
        ) -> Result<String, CompletionError> {
            std::future::pending().await
        }
    }

    struct Harness {
        service: GenerateService,
        plans: PlanService,
        workouts: WorkoutService,
    }

    async fn harness(completion: Option<Arc<dyn TextCompletion>>) -> Harness {
        let pool = setup_test_db().await;
        let plans = PlanService::new(Arc::new(SqlitePlanStore::new(pool.clone())));
        let workouts = WorkoutService::new(Arc::new(SqliteWorkoutStore::new(pool)));
        let service = GenerateService::new(
            completion,
            plans.clone(),
            workouts.clone(),
            Duration::from_millis(200),
        );
        Harness {
            service,
            plans,
            workouts,
        }
    }

    fn input() -> GenerateInput {
        GenerateInput {
            name: "Berlin Half".to_string(),
            end_date: NaiveDate::from_ymd_opt(2025, 4, 12).unwrap(),
            weeks: 8,
            base_km_per_week: 30.0,
            runs_per_week: 4,
            race_goal: "halfmarathon".to_string(),
        }
    }

    const THREE_WORKOUTS: &str = r#"{"workouts": [
        {"runType": "easy_run", "week": 1, "dayOfWeek": 1, "description": "Easy", "distance": 7.6},
        {"runType": "tempo_run", "week": 1, "dayOfWeek": 3, "description": "Tempo", "distance": 10.2},
        {"runType": "long_run", "week": 1, "dayOfWeek": 6, "description": "Long", "distance": 16.5}
    ]}"#;

    #[tokio::test]
    async fn generates_plan_with_race_day_last() {
        let completion = ScriptedCompletion::replying(THREE_WORKOUTS);
        let h = harness(Some(completion.clone())).await;

        let generated = h
            .service
            .generate("user-1", input(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(generated.workouts.len(), 4);
        let race = generated.workouts.last().unwrap();
        assert_eq!(race.run_type, RunType::Race);
        assert_eq!(race.day, generated.plan.end_date);
        assert_eq!(race.distance, 21.0);
        assert_eq!(race.description, "Race Day - Half Marathon");
        assert!(generated
            .workouts
            .iter()
            .all(|w| w.status == WorkoutStatus::Pending));

        let stored = h.workouts.list_for_plan(&generated.plan.id).await.unwrap();
        assert_eq!(stored.len(), 4);
        assert_eq!(completion.calls(), 1);
    }

    #[tokio::test]
    async fn distances_are_rounded_to_whole_kilometers() {
        let h = harness(Some(ScriptedCompletion::replying(THREE_WORKOUTS))).await;

        let generated = h
            .service
            .generate("user-1", input(), &CancellationToken::new())
            .await
            .unwrap();

        let distances: Vec<f64> = generated.workouts.iter().map(|w| w.distance).collect();
        // 16.5는 0에서 먼 쪽으로 반올림
        assert_eq!(distances, vec![8.0, 10.0, 17.0, 21.0]);
    }

    #[tokio::test]
    async fn invalid_item_rolls_back_the_plan() {
        let reply = r#"{"workouts": [
            {"runType": "easy_run", "week": 1, "dayOfWeek": 1, "description": "", "distance": 5},
            {"runType": "hill_repeats", "week": 1, "dayOfWeek": 2, "description": "", "distance": 8}
        ]}"#;
        let h = harness(Some(ScriptedCompletion::replying(reply))).await;

        let err = h
            .service
            .generate("user-1", input(), &CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            AppError::Upstream(message) => {
                assert_eq!(
                    message,
                    "failed to create workouts: workout[1]: invalid run type"
                )
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
        assert!(h.plans.list_for_user("user-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn week_beyond_the_plan_rolls_back_the_plan() {
        let reply = r#"{"workouts": [
            {"runType": "long_run", "week": 9, "dayOfWeek": 6, "description": "", "distance": 20}
        ]}"#;
        let h = harness(Some(ScriptedCompletion::replying(reply))).await;

        let err = h
            .service
            .generate("user-1", input(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("week must be between 1 and 8"), "{err}");
        assert!(h.plans.list_for_user("user-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_collaborator_is_a_configuration_error() {
        let h = harness(None).await;

        let err = h
            .service
            .generate("user-1", input(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Configuration(ref m) if m == NOT_CONFIGURED));
    }

    #[tokio::test]
    async fn configuration_is_checked_before_input() {
        let h = harness(None).await;
        let mut bad = input();
        bad.weeks = 2;

        let err = h
            .service
            .generate("user-1", bad, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[tokio::test]
    async fn input_is_validated_in_order_without_calling_out() {
        let completion = ScriptedCompletion::replying(THREE_WORKOUTS);
        let h = harness(Some(completion.clone())).await;

        let cases: Vec<(Box<dyn Fn(&mut GenerateInput)>, &str)> = vec![
            (
                Box::new(|i: &mut GenerateInput| {
                    i.weeks = 5;
                    i.name = String::new();
                }),
                "weeks must be at least 6",
            ),
            (
                Box::new(|i: &mut GenerateInput| {
                    i.weeks = 20_000_000;
                    i.base_km_per_week = 0.0;
                }),
                "weeks must be at most 104",
            ),
            (
                Box::new(|i: &mut GenerateInput| {
                    i.base_km_per_week = 0.0;
                    i.runs_per_week = 1;
                }),
                "baseKmPerWeek must be greater than 0",
            ),
            (
                Box::new(|i: &mut GenerateInput| i.runs_per_week = 8),
                "runsPerWeek must be between 2 and 7",
            ),
            (
                Box::new(|i: &mut GenerateInput| {
                    i.name = String::new();
                    i.race_goal = "ultra".into();
                }),
                "name is required",
            ),
            (
                Box::new(|i: &mut GenerateInput| i.race_goal = "Marathon".into()),
                "raceGoal must be one of: 5k, 10k, halfmarathon, marathon",
            ),
        ];

        for (mutate, expected) in cases {
            let mut candidate = input();
            mutate(&mut candidate);
            let err = h
                .service
                .generate("user-1", candidate, &CancellationToken::new())
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::Validation { index: None, .. }));
            assert_eq!(err.to_string(), expected);
        }

        assert_eq!(completion.calls(), 0);
    }

    #[tokio::test]
    async fn collaborator_failure_persists_nothing() {
        let h = harness(Some(ScriptedCompletion::failing("rate limited"))).await;

        let err = h
            .service
            .generate("user-1", input(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Upstream(ref m) if m.contains("rate limited")));
        assert!(h.plans.list_for_user("user-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unparseable_or_empty_replies_are_upstream_failures() {
        for reply in ["here is your plan!", r#"{"workouts": []}"#, r#"{"plan": "x"}"#] {
            let h = harness(Some(ScriptedCompletion::replying(reply))).await;

            let err = h
                .service
                .generate("user-1", input(), &CancellationToken::new())
                .await
                .unwrap_err();

            assert!(
                matches!(err, AppError::Upstream(ref m) if m.contains("failed to parse AI response")),
                "reply {reply:?} gave {err:?}"
            );
            assert!(h.plans.list_for_user("user-1").await.unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn cancellation_aborts_before_persisting() {
        let h = harness(Some(Arc::new(HangingCompletion))).await;
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = h
            .service
            .generate("user-1", input(), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Upstream(ref m) if m.ends_with("cancelled")));
        assert!(h.plans.list_for_user("user-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deadline_is_enforced() {
        let h = harness(Some(Arc::new(HangingCompletion))).await;

        let err = h
            .service
            .generate("user-1", input(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Upstream(ref m) if m.contains("timed out")));
    }

    #[tokio::test]
    async fn user_prompt_carries_the_parameters() {
        let completion = ScriptedCompletion::replying(THREE_WORKOUTS);
        let h = harness(Some(completion.clone())).await;

        h.service
            .generate("user-1", input(), &CancellationToken::new())
            .await
            .unwrap();

        let prompts = completion.prompts.lock().unwrap();
        let (system, user) = &prompts[0];
        assert!(system.contains("deload"));
        assert!(user.contains("8-week"));
        assert!(user.contains("4 runs per week"));
        assert!(user.contains("30.0 km"));
        assert!(user.contains("Half Marathon (21 km)"));
    }
}
