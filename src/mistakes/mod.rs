pub mod resolve;

use chrono::Utc;
use serde::{Serialize, Deserialize};
use crate::dates::CalendarDate;
use crate::error::PlannerError;
use crate::store::RecordStore;
use crate::tasks::{random_suffix, Category};

pub use resolve::{pending_resolves, upcoming_resolves, ResolveItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    Language,
    Logic,
    Essay,
}

impl Subject {
    pub fn label(&self) -> &'static str {
        match self {
            Subject::Language => "Language comprehension",
            Subject::Logic => "Logical reasoning",
            Subject::Essay => "Essay",
        }
    }

    /// Task category used for problem practice on this subject.
    pub fn category(&self) -> Category {
        match self {
            Subject::Language => Category::Language,
            Subject::Logic => Category::Logic,
            Subject::Essay => Category::Essay,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialType {
    PastExam,
    Mock,
}

/// Why an item was missed. Only recorded for incorrect answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MistakeReason {
    ConceptGap,
    Misreading,
    TimePressure,
    Careless,
    TrapChoice,
    Other,
}

/// Spaced re-practice interval after a mistake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveInterval {
    Week,
    Month,
}

impl ResolveInterval {
    pub const ALL: [ResolveInterval; 2] = [ResolveInterval::Week, ResolveInterval::Month];

    pub fn days(&self) -> i64 {
        match self {
            ResolveInterval::Week => 7,
            ResolveInterval::Month => 30,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ResolveInterval::Week => "7-day",
            ResolveInterval::Month => "30-day",
        }
    }
}

/// One answered practice item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MistakeLog {
    pub id: String,
    pub date: CalendarDate,
    pub subject: Subject,
    pub material: MaterialType,
    pub correct: bool,
    pub reason: Option<MistakeReason>,
    /// Fixed at creation; never recomputed.
    pub resolve_date7: Option<CalendarDate>,
    pub resolve_date30: Option<CalendarDate>,
    #[serde(default)]
    pub resolved7: bool,
    #[serde(default)]
    pub resolved30: bool,
}

impl MistakeLog {
    pub fn new(
        date: CalendarDate,
        subject: Subject,
        material: MaterialType,
        correct: bool,
        reason: Option<MistakeReason>,
    ) -> Self {
        let due = |interval: ResolveInterval| (!correct).then(|| date.add_days(interval.days()));
        MistakeLog {
            id: format!("log-{}-{}", Utc::now().timestamp_millis(), random_suffix()),
            date,
            subject,
            material,
            correct,
            reason: if correct { None } else { reason },
            resolve_date7: due(ResolveInterval::Week),
            resolve_date30: due(ResolveInterval::Month),
            resolved7: false,
            resolved30: false,
        }
    }

    pub fn due_date(&self, interval: ResolveInterval) -> Option<CalendarDate> {
        match interval {
            ResolveInterval::Week => self.resolve_date7,
            ResolveInterval::Month => self.resolve_date30,
        }
    }

    pub fn is_resolved(&self, interval: ResolveInterval) -> bool {
        match interval {
            ResolveInterval::Week => self.resolved7,
            ResolveInterval::Month => self.resolved30,
        }
    }

    pub fn mark_resolved(&mut self, interval: ResolveInterval, resolved: bool) {
        match interval {
            ResolveInterval::Week => self.resolved7 = resolved,
            ResolveInterval::Month => self.resolved30 = resolved,
        }
    }

    /// Due date of an interval that is still owed, if any.
    pub fn outstanding(&self, interval: ResolveInterval) -> Option<CalendarDate> {
        if self.correct || self.is_resolved(interval) {
            return None;
        }
        self.due_date(interval)
    }
}

/// Persist a new log entry.
pub async fn record_log<S: RecordStore + ?Sized>(
    store: &S,
    log: MistakeLog,
) -> Result<MistakeLog, PlannerError> {
    let saved = store.add_log(log).await?;
    tracing::info!(
        log_id = %saved.id,
        subject = ?saved.subject,
        correct = saved.correct,
        "Mistake log recorded"
    );
    Ok(saved)
}

/// Flip one resolved flag of a stored log.
pub async fn resolve_log<S: RecordStore + ?Sized>(
    store: &S,
    log_id: &str,
    interval: ResolveInterval,
) -> Result<MistakeLog, PlannerError> {
    let mut log = store
        .logs()
        .await?
        .into_iter()
        .find(|l| l.id == log_id)
        .ok_or_else(|| PlannerError::new(
            format!("No mistake log with id {}", log_id),
            "not_found"
        ))?;

    log.mark_resolved(interval, true);
    store.update_log(&log).await?;
    tracing::info!(log_id = %log_id, interval = interval.label(), "Re-solve marked done");
    Ok(log)
}
