use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use crate::dates::CalendarDate;
use crate::error::PlannerError;
use crate::store::RecordStore;
use crate::tasks::Task;
use super::daily::ensure_daily_plan;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub date: CalendarDate,
    pub tasks: Vec<Task>,
}

/// Derived snapshot of one Monday-start week. Tasks stay the source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPlan {
    pub week_start: CalendarDate,
    pub days: Vec<DayPlan>,
    pub generated_at: DateTime<Utc>,
}

impl WeeklyPlan {
    pub fn task_count(&self) -> usize {
        self.days.iter().map(|d| d.tasks.len()).sum()
    }
}

/// Make sure every day of the week containing `date` has tasks, then cache the week.
pub async fn generate_weekly_plan<S: RecordStore + ?Sized>(
    store: &S,
    date: CalendarDate,
) -> Result<WeeklyPlan, PlannerError> {
    let week_start = date.week_start();
    let mut days = Vec::with_capacity(7);
    for offset in 0..7 {
        let day = week_start.add_days(offset);
        let tasks = ensure_daily_plan(store, day).await?;
        days.push(DayPlan { date: day, tasks });
    }

    let plan = WeeklyPlan {
        week_start,
        days,
        generated_at: Utc::now(),
    };
    store.save_weekly_plan(&plan).await?;
    tracing::info!(
        week_start = %week_start,
        task_count = plan.task_count(),
        "Weekly plan saved"
    );
    Ok(plan)
}
