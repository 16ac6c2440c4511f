#![allow(dead_code)]

use chrono::Utc;
use exam_planner_lib::config::Settings;
use exam_planner_lib::dates::CalendarDate;
use exam_planner_lib::mistakes::{MaterialType, MistakeLog, Subject};
use exam_planner_lib::store::MemoryStore;
use exam_planner_lib::tasks::{Category, Task};

pub fn d(s: &str) -> CalendarDate {
    CalendarDate::parse(s).expect("valid test date")
}

/// Store whose exam is `days_out` days after `today`.
pub fn store_with_exam(today: CalendarDate, days_out: i64) -> MemoryStore {
    let mut settings = Settings::default();
    settings.exam_date = today.add_days(days_out);
    MemoryStore::with_settings(settings)
}

pub fn task(date: CalendarDate, category: Category, completed: bool) -> Task {
    let mut t = Task::manual(date, "history", category, Some(30));
    t.set_completed(completed, Utc::now());
    t
}

pub fn missed(date: CalendarDate, subject: Subject) -> MistakeLog {
    MistakeLog::new(date, subject, MaterialType::PastExam, false, None)
}
