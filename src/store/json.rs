use std::path::{Path, PathBuf};
use async_trait::async_trait;
use crate::config::{self, Settings};
use crate::dates::CalendarDate;
use crate::mistakes::MistakeLog;
use crate::planner::WeeklyPlan;
use crate::tasks::Task;
use super::{RecordStore, Records, StoreError, StoreResult};

const RECORDS_FILE: &str = "records.json";
const SETTINGS_FILE: &str = "settings.toml";

/// File-backed store: records in `records.json`, settings in `settings.toml`.
/// Every call re-reads the files; nothing is cached between calls.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        JsonFileStore { dir: dir.into() }
    }

    fn records_path(&self) -> PathBuf {
        self.dir.join(RECORDS_FILE)
    }

    fn settings_path(&self) -> PathBuf {
        self.dir.join(SETTINGS_FILE)
    }

    async fn load(&self) -> StoreResult<Records> {
        let path = self.records_path();
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                tracing::error!(path = ?path, error = %e, "Failed to parse records file");
                StoreError::from(e)
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Records::default()),
            Err(e) => {
                tracing::error!(path = ?path, error = %e, "Failed to read records file");
                Err(StoreError::Io(e))
            }
        }
    }

    async fn persist(&self, records: &Records) -> StoreResult<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let json = serde_json::to_string_pretty(records)?;
        // Stage then rename; records.json is never partially written.
        let tmp = self.records_path().with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, self.records_path()).await?;
        Ok(())
    }

    async fn modify<F>(&self, f: F) -> StoreResult<()>
    where
        F: FnOnce(&mut Records) + Send,
    {
        let mut records = self.load().await?;
        f(&mut records);
        self.persist(&records).await
    }
}

async fn remove_if_present(path: &Path) -> StoreResult<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StoreError::Io(e)),
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn tasks_by_date(&self, date: CalendarDate) -> StoreResult<Vec<Task>> {
        Ok(self.load().await?.tasks_by_date(date))
    }

    async fn save_tasks(&self, tasks: &[Task]) -> StoreResult<()> {
        self.modify(|records| {
            for task in tasks {
                records.upsert_task(task);
            }
        }).await
    }

    async fn update_task(&self, task: &Task) -> StoreResult<()> {
        self.modify(|records| records.upsert_task(task)).await
    }

    async fn delete_task(&self, id: &str) -> StoreResult<()> {
        self.modify(|records| records.delete_task(id)).await
    }

    async fn tasks_in_range(&self, start: CalendarDate, end: CalendarDate) -> StoreResult<Vec<Task>> {
        Ok(self.load().await?.tasks_in_range(start, end))
    }

    async fn logs(&self) -> StoreResult<Vec<MistakeLog>> {
        Ok(self.load().await?.logs_newest_first())
    }

    async fn logs_by_date(&self, date: CalendarDate) -> StoreResult<Vec<MistakeLog>> {
        Ok(self.load().await?.logs_by_date(date))
    }

    async fn add_log(&self, log: MistakeLog) -> StoreResult<MistakeLog> {
        self.modify(|records| records.upsert_log(&log)).await?;
        Ok(log)
    }

    async fn update_log(&self, log: &MistakeLog) -> StoreResult<()> {
        self.modify(|records| records.upsert_log(log)).await
    }

    async fn weekly_plan(&self, week_start: CalendarDate) -> StoreResult<Option<WeeklyPlan>> {
        Ok(self.load().await?.weekly_plan(week_start))
    }

    async fn save_weekly_plan(&self, plan: &WeeklyPlan) -> StoreResult<()> {
        self.modify(|records| records.upsert_weekly_plan(plan)).await
    }

    async fn settings(&self) -> StoreResult<Settings> {
        Ok(config::load_settings(&self.settings_path()).await?)
    }

    async fn save_settings(&self, settings: &Settings) -> StoreResult<()> {
        config::save_settings(&self.settings_path(), settings)
            .await
            .map_err(|e| {
                tracing::error!(dir = ?self.dir, error = %e, "Failed to write settings file");
                StoreError::Io(e)
            })
    }

    async fn reset_all(&self) -> StoreResult<()> {
        remove_if_present(&self.records_path()).await?;
        remove_if_present(&self.settings_path()).await?;
        tracing::info!(dir = ?self.dir, "All planner data reset");
        Ok(())
    }
}
