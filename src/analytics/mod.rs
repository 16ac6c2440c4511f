use serde::{Serialize, Deserialize};
use crate::config::Settings;
use crate::dates::CalendarDate;
use crate::error::PlannerError;
use crate::planner::days_remaining;
use crate::store::RecordStore;
use crate::tasks::{Category, Task, MAX_GENERATED_TASKS_PER_DAY};

/// History window for the overall progress estimate.
pub const PROGRESS_LOOKBACK_DAYS: i64 = 365;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompletionCount {
    pub done: usize,
    pub total: usize,
}

fn percent(done: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (done as f64 / total as f64 * 100.0).round() as u32
}

impl CompletionCount {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        CompletionCount {
            done: tasks.iter().filter(|t| t.completed).count(),
            total: tasks.len(),
        }
    }

    pub fn rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.done as f64 / self.total as f64
        }
    }

    pub fn rate_percent(&self) -> u32 {
        percent(self.done, self.total)
    }
}

/// Realized history blended with an estimate of the remaining planned volume.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverallProgress {
    pub completed: usize,
    pub total: usize,
    pub rate_percent: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyRates {
    pub review_rate: u32,
    pub resolve_rate: u32,
}

async fn count_range<S: RecordStore + ?Sized>(
    store: &S,
    start: CalendarDate,
    end: CalendarDate,
) -> Result<CompletionCount, PlannerError> {
    let tasks = store.tasks_in_range(start, end).await?;
    Ok(CompletionCount::from_tasks(&tasks))
}

pub async fn daily_completion_count<S: RecordStore + ?Sized>(
    store: &S,
    date: CalendarDate,
) -> Result<CompletionCount, PlannerError> {
    let tasks = store.tasks_by_date(date).await?;
    Ok(CompletionCount::from_tasks(&tasks))
}

/// Fraction of `date`'s tasks that are done; 0 with no tasks.
pub async fn daily_completion_rate<S: RecordStore + ?Sized>(
    store: &S,
    date: CalendarDate,
) -> Result<f64, PlannerError> {
    Ok(daily_completion_count(store, date).await?.rate())
}

/// Counts for the Monday-start week containing `date`.
pub async fn weekly_completion_count<S: RecordStore + ?Sized>(
    store: &S,
    date: CalendarDate,
) -> Result<CompletionCount, PlannerError> {
    let start = date.week_start();
    count_range(store, start, start.add_days(6)).await
}

/// Counts for a calendar month. An invalid month counts nothing.
pub async fn monthly_completion_count<S: RecordStore + ?Sized>(
    store: &S,
    year: i32,
    month: u32,
) -> Result<CompletionCount, PlannerError> {
    let days = CalendarDate::month_days(year, month);
    match (days.first(), days.last()) {
        (Some(first), Some(last)) => count_range(store, *first, *last).await,
        _ => Ok(CompletionCount::default()),
    }
}

/// Completed tasks over the past year against that year's tasks plus
/// three per remaining day. An approximation, not a guarantee.
pub async fn overall_progress<S: RecordStore + ?Sized>(
    store: &S,
    settings: &Settings,
    today: CalendarDate,
) -> Result<OverallProgress, PlannerError> {
    let history = count_range(store, today.add_days(-(PROGRESS_LOOKBACK_DAYS - 1)), today).await?;
    let remaining = days_remaining(settings.exam_date, today).max(0) as usize;
    let total = history.total + remaining * MAX_GENERATED_TASKS_PER_DAY;

    Ok(OverallProgress {
        completed: history.done,
        total,
        rate_percent: percent(history.done, total),
    })
}

/// Completion percentages of review and re-solve tasks in the week containing `date`.
pub async fn weekly_rates<S: RecordStore + ?Sized>(
    store: &S,
    date: CalendarDate,
) -> Result<WeeklyRates, PlannerError> {
    let start = date.week_start();
    let tasks = store.tasks_in_range(start, start.add_days(6)).await?;
    let of = |category: Category| {
        let matching: Vec<&Task> = tasks.iter().filter(|t| t.category == category).collect();
        percent(matching.iter().filter(|t| t.completed).count(), matching.len())
    };

    Ok(WeeklyRates {
        review_rate: of(Category::Review),
        resolve_rate: of(Category::Resolve),
    })
}

/// `D-n` before the exam, `D-Day` on it, `D+n` after.
pub fn dday_label(days_remaining: i64) -> String {
    match days_remaining {
        0 => "D-Day".to_string(),
        d if d > 0 => format!("D-{}", d),
        d => format!("D+{}", d.unsigned_abs()),
    }
}

/// Visual stage for a daily completion percentage.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GrowthStage {
    Seed,
    Sprout,
    Stem,
    Bud,
    HalfBloom,
    FullBloom,
}

impl GrowthStage {
    pub fn for_rate(percent: u32) -> GrowthStage {
        match percent {
            0..=9 => GrowthStage::Seed,
            10..=29 => GrowthStage::Sprout,
            30..=49 => GrowthStage::Stem,
            50..=69 => GrowthStage::Bud,
            70..=89 => GrowthStage::HalfBloom,
            _ => GrowthStage::FullBloom,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GrowthStage::Seed => "Seed",
            GrowthStage::Sprout => "Sprout",
            GrowthStage::Stem => "Stem",
            GrowthStage::Bud => "Bud",
            GrowthStage::HalfBloom => "Half bloom",
            GrowthStage::FullBloom => "Full bloom",
        }
    }
}
