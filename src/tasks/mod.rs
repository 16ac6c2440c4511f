use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Serialize, Deserialize};
use crate::dates::CalendarDate;

/// Generated tasks allowed per date. Manual tasks are not counted.
pub const MAX_GENERATED_TASKS_PER_DAY: usize = 3;

/// Kind of work a task represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Language,
    Logic,
    Essay,
    Review,
    Resolve,
    Mock,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Language => "Language comprehension",
            Category::Logic => "Logical reasoning",
            Category::Essay => "Essay",
            Category::Review => "Review",
            Category::Resolve => "Re-solve",
            Category::Mock => "Mock exam",
        }
    }

    /// Problem-solving categories count toward the 40% share; the rest is review.
    pub fn is_problem_solving(&self) -> bool {
        matches!(self, Category::Language | Category::Logic | Category::Essay | Category::Mock)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskOrigin {
    #[default]
    Generated,
    Manual,
}

/// One unit of planned work for a single date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub date: CalendarDate,
    pub title: String,
    pub category: Category,
    pub estimated_minutes: Option<u32>,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub origin: TaskOrigin,
}

pub(crate) fn random_suffix() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(5)
        .map(|c| (c as char).to_ascii_lowercase())
        .collect()
}

impl Task {
    /// Task produced by the plan generator; `seq` is its position in the day's plan.
    pub fn generated(
        date: CalendarDate,
        seq: usize,
        title: impl Into<String>,
        category: Category,
        estimated_minutes: u32,
    ) -> Self {
        Task {
            id: format!("task-{}-{}-{}", date, seq, random_suffix()),
            date,
            title: title.into(),
            category,
            estimated_minutes: Some(estimated_minutes),
            completed: false,
            completed_at: None,
            origin: TaskOrigin::Generated,
        }
    }

    /// Task added by the user; exempt from the daily generation cap.
    pub fn manual(
        date: CalendarDate,
        title: impl Into<String>,
        category: Category,
        estimated_minutes: Option<u32>,
    ) -> Self {
        Task {
            id: format!("task-{}-manual-{}", date, random_suffix()),
            date,
            title: title.into(),
            category,
            estimated_minutes,
            completed: false,
            completed_at: None,
            origin: TaskOrigin::Manual,
        }
    }

    pub fn is_generated(&self) -> bool {
        self.origin == TaskOrigin::Generated
    }

    /// Keeps `completed_at` set iff the task is completed.
    pub fn set_completed(&mut self, completed: bool, now: DateTime<Utc>) {
        self.completed = completed;
        self.completed_at = completed.then_some(now);
    }

    pub fn toggle(&mut self, now: DateTime<Utc>) {
        self.set_completed(!self.completed, now);
    }
}

/// Drop generated tasks past the per-day cap, keeping manual ones and order.
pub fn enforce_generated_cap(tasks: Vec<Task>) -> Vec<Task> {
    let mut generated = 0;
    tasks
        .into_iter()
        .filter(|t| {
            if !t.is_generated() {
                return true;
            }
            generated += 1;
            generated <= MAX_GENERATED_TASKS_PER_DAY
        })
        .collect()
}
