mod common;

use common::{d, missed, store_with_exam, task};
use exam_planner_lib::mistakes::{record_log, Subject};
use exam_planner_lib::planner::{assess_phase, ensure_daily_plan, generate_daily_plan, generate_weekly_plan, Phase};
use exam_planner_lib::store::RecordStore;
use exam_planner_lib::tasks::{Category, Task};

fn structure(tasks: &[Task]) -> Vec<(String, Category, Option<u32>)> {
    tasks
        .iter()
        .map(|t| (t.title.clone(), t.category, t.estimated_minutes))
        .collect()
}

#[tokio::test]
async fn test_ten_days_out_without_history_is_final_phase() {
    let today = d("2025-03-10");
    let store = store_with_exam(today, 10);
    let settings = store.settings().await.unwrap();

    let assessment = assess_phase(&store, &settings, today).await.unwrap();
    assert_eq!(assessment.phase, Phase::FinalOptimization);
    assert_eq!(assessment.days_remaining, 10);
    assert_eq!(assessment.completion_rate, 0.0);

    let tasks = generate_daily_plan(&store, &settings, today).await.unwrap();
    let categories: Vec<Category> = tasks.iter().map(|t| t.category).collect();
    assert_eq!(categories, vec![Category::Resolve, Category::Review, Category::Review]);
    assert!(tasks.iter().all(|t| t.category != Category::Mock));
}

#[tokio::test]
async fn test_ten_days_out_with_overdue_log_leads_with_resolve() {
    let today = d("2025-03-10");
    let store = store_with_exam(today, 10);
    record_log(&store, missed(d("2025-03-01"), Subject::Logic)).await.unwrap();
    let settings = store.settings().await.unwrap();

    let tasks = generate_daily_plan(&store, &settings, today).await.unwrap();
    assert_eq!(tasks.len(), 3);
    assert_eq!(tasks[0].title, "Logical reasoning mistake re-solve");
    assert_eq!(tasks[0].estimated_minutes, Some(30));
    assert!(tasks.iter().all(|t| t.category != Category::Mock));
}

#[tokio::test]
async fn test_hundred_days_out_saturday_without_history_is_foundation() {
    let saturday = d("2025-03-15");
    let store = store_with_exam(saturday, 100);
    let settings = store.settings().await.unwrap();

    // 90 < remaining <= 120 needs a 0.4 rate for type training.
    let assessment = assess_phase(&store, &settings, saturday).await.unwrap();
    assert_eq!(assessment.phase, Phase::Foundation);

    let tasks = generate_daily_plan(&store, &settings, saturday).await.unwrap();
    let shape: Vec<(Category, Option<u32>)> =
        tasks.iter().map(|t| (t.category, t.estimated_minutes)).collect();
    assert_eq!(shape, vec![
        (Category::Review, Some(144)),
        (Category::Logic, Some(126)),
        (Category::Review, Some(90)),
    ]);
    assert!(tasks[0].title.starts_with("Language comprehension"));
    assert!(tasks.iter().all(|t| t.category != Category::Mock));
}

#[tokio::test]
async fn test_saturday_in_full_scope_is_mock_day() {
    let saturday = d("2025-03-15");
    let store = store_with_exam(saturday, 40);
    let settings = store.settings().await.unwrap();

    let tasks = generate_daily_plan(&store, &settings, saturday).await.unwrap();
    let shape: Vec<(Category, Option<u32>)> =
        tasks.iter().map(|t| (t.category, t.estimated_minutes)).collect();
    assert_eq!(shape, vec![(Category::Mock, Some(120)), (Category::Review, Some(90))]);
}

#[tokio::test]
async fn test_recent_completion_moves_phase_forward() {
    let today = d("2025-03-10");
    let store = store_with_exam(today, 100);
    let history: Vec<Task> = (1..=10)
        .map(|i| task(today.add_days(-i), Category::Review, i % 2 == 0))
        .collect();
    store.save_tasks(&history).await.unwrap();
    // Outside the 30-day window; must not count.
    store.save_tasks(&[task(today.add_days(-40), Category::Review, false)]).await.unwrap();

    let settings = store.settings().await.unwrap();
    let assessment = assess_phase(&store, &settings, today).await.unwrap();
    assert_eq!(assessment.completion_rate, 0.5);
    assert_eq!(assessment.phase, Phase::TypeTraining);
}

#[tokio::test]
async fn test_generation_is_structurally_idempotent() {
    let today = d("2025-03-12");
    let store = store_with_exam(today, 60);
    record_log(&store, missed(d("2025-02-01"), Subject::Language)).await.unwrap();
    let settings = store.settings().await.unwrap();

    let first = generate_daily_plan(&store, &settings, today).await.unwrap();
    let second = generate_daily_plan(&store, &settings, today).await.unwrap();
    assert_eq!(structure(&first), structure(&second));
    assert_ne!(first[0].id, second[0].id);
}

#[tokio::test]
async fn test_ensure_daily_plan_persists_once() {
    let today = d("2025-03-12");
    let store = store_with_exam(today, 150);

    let created = ensure_daily_plan(&store, today).await.unwrap();
    assert_eq!(created.len(), 3);
    let again = ensure_daily_plan(&store, today).await.unwrap();
    let ids = |tasks: &[Task]| tasks.iter().map(|t| t.id.clone()).collect::<Vec<_>>();
    assert_eq!(ids(&created), ids(&again));
    assert_eq!(store.tasks_by_date(today).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_manual_tasks_suppress_generation() {
    let today = d("2025-03-12");
    let store = store_with_exam(today, 150);
    store.save_tasks(&[task(today, Category::Essay, false)]).await.unwrap();

    let tasks = ensure_daily_plan(&store, today).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].category, Category::Essay);
}

#[tokio::test]
async fn test_store_outage_surfaces() {
    let today = d("2025-03-12");
    let store = store_with_exam(today, 150);
    store.set_available(false);

    let err = ensure_daily_plan(&store, today).await.unwrap_err();
    assert!(err.is_store_failure());
}

#[tokio::test]
async fn test_weekly_plan_fills_every_day() {
    let wednesday = d("2025-03-12");
    let store = store_with_exam(wednesday, 200);
    store.save_tasks(&[task(d("2025-03-11"), Category::Logic, true)]).await.unwrap();

    let plan = generate_weekly_plan(&store, wednesday).await.unwrap();
    assert_eq!(plan.week_start, d("2025-03-10"));
    assert_eq!(plan.days.len(), 7);
    assert_eq!(plan.days[1].tasks.len(), 1);
    assert!(plan.days.iter().all(|day| !day.tasks.is_empty() && day.tasks.len() <= 3));
    assert_eq!(plan.task_count(), 1 + 6 * 3);

    let cached = store.weekly_plan(d("2025-03-10")).await.unwrap();
    assert_eq!(cached, Some(plan));
}
