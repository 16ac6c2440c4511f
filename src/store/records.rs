use serde::{Serialize, Deserialize};
use crate::dates::CalendarDate;
use crate::mistakes::MistakeLog;
use crate::planner::WeeklyPlan;
use crate::tasks::Task;

/// Every persisted record. Shared by the in-memory and file-backed stores.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Records {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub logs: Vec<MistakeLog>,
    #[serde(default)]
    pub weekly_plans: Vec<WeeklyPlan>,
}

impl Records {
    pub fn tasks_by_date(&self, date: CalendarDate) -> Vec<Task> {
        self.tasks.iter().filter(|t| t.date == date).cloned().collect()
    }

    pub fn tasks_in_range(&self, start: CalendarDate, end: CalendarDate) -> Vec<Task> {
        let mut tasks: Vec<Task> = self.tasks
            .iter()
            .filter(|t| t.date >= start && t.date <= end)
            .cloned()
            .collect();
        tasks.sort_by_key(|t| t.date);
        tasks
    }

    pub fn upsert_task(&mut self, task: &Task) {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task.clone(),
            None => self.tasks.push(task.clone()),
        }
    }

    pub fn delete_task(&mut self, id: &str) {
        self.tasks.retain(|t| t.id != id);
    }

    pub fn logs_newest_first(&self) -> Vec<MistakeLog> {
        let mut logs = self.logs.clone();
        logs.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
        logs
    }

    pub fn logs_by_date(&self, date: CalendarDate) -> Vec<MistakeLog> {
        self.logs.iter().filter(|l| l.date == date).cloned().collect()
    }

    pub fn upsert_log(&mut self, log: &MistakeLog) {
        match self.logs.iter_mut().find(|l| l.id == log.id) {
            Some(existing) => *existing = log.clone(),
            None => self.logs.push(log.clone()),
        }
    }

    pub fn weekly_plan(&self, week_start: CalendarDate) -> Option<WeeklyPlan> {
        self.weekly_plans.iter().find(|p| p.week_start == week_start).cloned()
    }

    pub fn upsert_weekly_plan(&mut self, plan: &WeeklyPlan) {
        match self.weekly_plans.iter_mut().find(|p| p.week_start == plan.week_start) {
            Some(existing) => *existing = plan.clone(),
            None => self.weekly_plans.push(plan.clone()),
        }
    }
}
