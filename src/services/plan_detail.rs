//! # 계획 상세 집계
//!
//! 계획과 워크아웃 목록을 주/요일 격자로 묶고 주 단위 거리 합계와 완료 여부를 계산합니다.
//! 입력만으로 결과가 정해지는 순수 함수이며, 결과는 저장하지 않고 조회할 때마다 다시 만듭니다.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::models::{DayDetail, PlanDetail, TrainingPlan, WeekSummary, Workout, WorkoutStatus};
use crate::services::calendar::{self, WEEKDAY_NAMES};

/// `plan.weeks`개의 주 요약을 만듭니다. 각 주에는 월요일부터 일요일까지 항상 7일이 들어갑니다.
///
/// 워크아웃은 날짜가 정확히 같은 날에 붙습니다. 계획 기간 밖의 워크아웃은 어느 주에도 포함되지 않습니다.
/// 같은 날의 워크아웃은 입력 순서를 유지합니다.
pub fn build_plan_detail(plan: &TrainingPlan, workouts: &[Workout]) -> PlanDetail {
    let mut by_day: HashMap<NaiveDate, Vec<&Workout>> = HashMap::new();
    for workout in workouts {
        by_day.entry(workout.day).or_default().push(workout);
    }

    let weeks_summary = (1..=plan.weeks)
        .map(|week| {
            let days: Vec<DayDetail> = (1..=7)
                .map(|day_of_week| {
                    let date = calendar::date_for(plan.start_date, week, day_of_week);
                    DayDetail {
                        date,
                        day_name: WEEKDAY_NAMES[(day_of_week - 1) as usize],
                        workouts: by_day
                            .get(&date)
                            .map(|ws| ws.iter().map(|w| (*w).clone()).collect())
                            .unwrap_or_default(),
                    }
                })
                .collect();
            summarize(week, days)
        })
        .collect();

    PlanDetail {
        plan: plan.clone(),
        weeks_summary,
    }
}

fn summarize(number: i64, days: Vec<DayDetail>) -> WeekSummary {
    let week_workouts = || days.iter().flat_map(|d| d.workouts.iter());

    let planned_km = week_workouts().map(|w| w.distance).sum();
    let done_km = week_workouts()
        .filter(|w| w.status == WorkoutStatus::Completed)
        .map(|w| w.distance)
        .sum();
    let all_done =
        week_workouts().next().is_some() && week_workouts().all(|w| w.status.is_settled());

    WeekSummary {
        number,
        days,
        planned_km,
        done_km,
        all_done,
    }
}
