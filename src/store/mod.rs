pub mod json;
pub mod memory;
mod records;

use async_trait::async_trait;
use thiserror::Error;
use crate::config::Settings;
use crate::dates::CalendarDate;
use crate::mistakes::MistakeLog;
use crate::planner::WeeklyPlan;
use crate::tasks::Task;

pub use json::JsonFileStore;
pub use memory::MemoryStore;
pub use records::Records;

/// Record store failures. These are the only hard failures the planner surfaces.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("record store unavailable: {0}")]
    Unavailable(String),

    #[error("record store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("record serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence for tasks, mistake logs, weekly plan caches and settings.
/// The planner never caches anything read from here across calls.
/// Writes are upserts keyed by id.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn tasks_by_date(&self, date: CalendarDate) -> StoreResult<Vec<Task>>;

    async fn save_tasks(&self, tasks: &[Task]) -> StoreResult<()>;

    async fn update_task(&self, task: &Task) -> StoreResult<()>;

    /// Deleting an unknown id is a no-op.
    async fn delete_task(&self, id: &str) -> StoreResult<()>;

    /// Tasks dated within `start..=end`, ordered by date.
    async fn tasks_in_range(&self, start: CalendarDate, end: CalendarDate) -> StoreResult<Vec<Task>>;

    /// All logs, newest date first.
    async fn logs(&self) -> StoreResult<Vec<MistakeLog>>;

    async fn logs_by_date(&self, date: CalendarDate) -> StoreResult<Vec<MistakeLog>>;

    async fn add_log(&self, log: MistakeLog) -> StoreResult<MistakeLog>;

    async fn update_log(&self, log: &MistakeLog) -> StoreResult<()>;

    async fn weekly_plan(&self, week_start: CalendarDate) -> StoreResult<Option<WeeklyPlan>>;

    async fn save_weekly_plan(&self, plan: &WeeklyPlan) -> StoreResult<()>;

    async fn settings(&self) -> StoreResult<Settings>;

    async fn save_settings(&self, settings: &Settings) -> StoreResult<()>;

    /// Clear tasks, logs and weekly plans, and restore default settings.
    async fn reset_all(&self) -> StoreResult<()>;
}
