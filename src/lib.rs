pub mod analytics;
pub mod config;
pub mod dates;
pub mod error;
pub mod logging;
pub mod mistakes;
pub mod planner;
pub mod store;
pub mod tasks;

use crate::dates::CalendarDate;
use crate::error::PlannerError;
use crate::store::{JsonFileStore, RecordStore};

/// Open the on-disk store, make sure today's plan exists and log a summary of it.
pub fn run() -> Result<(), PlannerError> {
    // Initialize structured logging first
    logging::init_logging();
    tracing::info!("Exam planner starting");

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| PlannerError::new(
            format!("Failed to create async runtime: {}", e),
            "startup"
        ))?;

    rt.block_on(async {
        let store = JsonFileStore::new(config::paths::data_dir());
        let today = CalendarDate::today();
        let settings = store.settings().await?;

        let assessment = planner::assess_phase(&store, &settings, today).await?;
        let tasks = planner::ensure_daily_plan(&store, today).await?;
        let count = analytics::daily_completion_count(&store, today).await?;
        let stage = analytics::GrowthStage::for_rate(count.rate_percent());

        tracing::info!(
            date = %today,
            dday = %analytics::dday_label(assessment.days_remaining),
            phase = assessment.phase.name(),
            focus = assessment.phase.focus(),
            done = count.done,
            total = count.total,
            growth = stage.label(),
            timer_minutes = settings.timer_duration().as_secs() / 60,
            "Today's plan"
        );
        if let Some(window) = planner::generate_phase_roadmap(settings.exam_date, today)
            .iter()
            .find(|w| w.is_current)
        {
            tracing::info!(
                planned_phase = window.phase.id(),
                start = %window.start,
                end = %window.end,
                "Roadmap window"
            );
        }
        for task in &tasks {
            tracing::info!(
                title = %task.title,
                category = task.category.label(),
                minutes = ?task.estimated_minutes,
                completed = task.completed,
                "Task"
            );
        }

        let logs = store.logs().await?;
        for item in mistakes::upcoming_resolves(&logs, today).iter().filter(|i| i.overdue) {
            tracing::info!(
                log_id = %item.log_id,
                subject = item.subject.label(),
                interval = item.interval.label(),
                due = %item.due_date,
                "Overdue re-solve"
            );
        }
        Ok::<(), PlannerError>(())
    })
}
