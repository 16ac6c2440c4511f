use std::sync::atomic::{AtomicBool, Ordering};
use async_trait::async_trait;
use parking_lot::RwLock;
use crate::config::Settings;
use crate::dates::CalendarDate;
use crate::mistakes::MistakeLog;
use crate::planner::WeeklyPlan;
use crate::tasks::Task;
use super::{RecordStore, Records, StoreError, StoreResult};

/// In-process store. Used by tests and as a scratch store.
pub struct MemoryStore {
    records: RwLock<Records>,
    settings: RwLock<Settings>,
    available: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        MemoryStore {
            records: RwLock::new(Records::default()),
            settings: RwLock::new(settings),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate the store going offline; every call then fails with `Unavailable`.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::Relaxed);
    }

    fn check(&self) -> StoreResult<()> {
        if self.available.load(Ordering::Relaxed) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("memory store offline".into()))
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn tasks_by_date(&self, date: CalendarDate) -> StoreResult<Vec<Task>> {
        self.check()?;
        Ok(self.records.read().tasks_by_date(date))
    }

    async fn save_tasks(&self, tasks: &[Task]) -> StoreResult<()> {
        self.check()?;
        let mut records = self.records.write();
        for task in tasks {
            records.upsert_task(task);
        }
        Ok(())
    }

    async fn update_task(&self, task: &Task) -> StoreResult<()> {
        self.check()?;
        self.records.write().upsert_task(task);
        Ok(())
    }

    async fn delete_task(&self, id: &str) -> StoreResult<()> {
        self.check()?;
        self.records.write().delete_task(id);
        Ok(())
    }

    async fn tasks_in_range(&self, start: CalendarDate, end: CalendarDate) -> StoreResult<Vec<Task>> {
        self.check()?;
        Ok(self.records.read().tasks_in_range(start, end))
    }

    async fn logs(&self) -> StoreResult<Vec<MistakeLog>> {
        self.check()?;
        Ok(self.records.read().logs_newest_first())
    }

    async fn logs_by_date(&self, date: CalendarDate) -> StoreResult<Vec<MistakeLog>> {
        self.check()?;
        Ok(self.records.read().logs_by_date(date))
    }

    async fn add_log(&self, log: MistakeLog) -> StoreResult<MistakeLog> {
        self.check()?;
        self.records.write().upsert_log(&log);
        Ok(log)
    }

    async fn update_log(&self, log: &MistakeLog) -> StoreResult<()> {
        self.check()?;
        self.records.write().upsert_log(log);
        Ok(())
    }

    async fn weekly_plan(&self, week_start: CalendarDate) -> StoreResult<Option<WeeklyPlan>> {
        self.check()?;
        Ok(self.records.read().weekly_plan(week_start))
    }

    async fn save_weekly_plan(&self, plan: &WeeklyPlan) -> StoreResult<()> {
        self.check()?;
        self.records.write().upsert_weekly_plan(plan);
        Ok(())
    }

    async fn settings(&self) -> StoreResult<Settings> {
        self.check()?;
        Ok(self.settings.read().clone())
    }

    async fn save_settings(&self, settings: &Settings) -> StoreResult<()> {
        self.check()?;
        *self.settings.write() = settings.clone();
        Ok(())
    }

    async fn reset_all(&self) -> StoreResult<()> {
        self.check()?;
        *self.records.write() = Records::default();
        *self.settings.write() = Settings::default();
        Ok(())
    }
}
