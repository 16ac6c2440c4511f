use serde::{Serialize, Deserialize};
use crate::config::Settings;
use crate::dates::CalendarDate;
use crate::error::PlannerError;
use crate::store::RecordStore;

/// Days of history used for the trailing completion rate.
pub const COMPLETION_LOOKBACK_DAYS: i64 = 30;

/// Preparation stage, ordered from earliest to final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Foundation,
    TypeTraining,
    FullScope,
    FinalOptimization,
}

impl Phase {
    pub const ALL: [Phase; 4] = [
        Phase::Foundation,
        Phase::TypeTraining,
        Phase::FullScope,
        Phase::FinalOptimization,
    ];

    pub fn id(&self) -> u8 {
        match self {
            Phase::Foundation => 1,
            Phase::TypeTraining => 2,
            Phase::FullScope => 3,
            Phase::FinalOptimization => 4,
        }
    }

    pub fn from_id(id: u8) -> Option<Phase> {
        Phase::ALL.iter().copied().find(|p| p.id() == id)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Phase::Foundation => "Phase 1: Reasoning foundations and review routine",
            Phase::TypeTraining => "Phase 2: Question-type training with partial time limits",
            Phase::FullScope => "Phase 3: Full-scope practice and weekly mock exams",
            Phase::FinalOptimization => "Phase 4: Final optimization",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Phase::Foundation => "Core lectures, past exam analysis, building a review habit",
            Phase::TypeTraining => "Classify question types, drill each type, partial time limits",
            Phase::FullScope => "Timed full-range sets, one mock exam a week, error analysis",
            Phase::FinalOptimization => "No new material, repeat weak types, manage condition",
        }
    }

    pub fn focus(&self) -> &'static str {
        match self {
            Phase::Foundation => "Focus on understanding the basics and forming review habits.",
            Phase::TypeTraining => "Focus on recognising question types and pacing.",
            Phase::FullScope => "Focus on exam conditions and mock exams.",
            Phase::FinalOptimization => "Focus on repeating weak points and staying in shape.",
        }
    }
}

/// Classify the phase from days left and the trailing completion rate.
/// Total: negative `days_remaining` (after the exam) lands in the final phase.
pub fn determine_phase(days_remaining: i64, completion_rate: f64) -> Phase {
    match days_remaining {
        d if d <= 14 => Phase::FinalOptimization,
        d if d <= 35 && completion_rate >= 0.5 => Phase::FinalOptimization,
        d if d <= 45 => Phase::FullScope,
        d if d <= 70 && completion_rate >= 0.6 => Phase::FullScope,
        d if d <= 90 => Phase::TypeTraining,
        d if d <= 120 && completion_rate >= 0.4 => Phase::TypeTraining,
        _ => Phase::Foundation,
    }
}

/// Whole days from `today` to the exam; negative once the exam has passed.
pub fn days_remaining(exam_date: CalendarDate, today: CalendarDate) -> i64 {
    today.days_until(exam_date)
}

/// Completed / total tasks over the 30 days ending on `date`; 0 with no tasks.
pub async fn trailing_completion_rate<S: RecordStore + ?Sized>(
    store: &S,
    date: CalendarDate,
) -> Result<f64, PlannerError> {
    let start = date.add_days(-(COMPLETION_LOOKBACK_DAYS - 1));
    let tasks = store.tasks_in_range(start, date).await?;
    if tasks.is_empty() {
        return Ok(0.0);
    }
    let done = tasks.iter().filter(|t| t.completed).count();
    Ok(done as f64 / tasks.len() as f64)
}

/// Inputs and outcome of a phase classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseAssessment {
    pub phase: Phase,
    pub days_remaining: i64,
    pub completion_rate: f64,
}

/// Classify the phase for `date` using the store's recent history.
pub async fn assess_phase<S: RecordStore + ?Sized>(
    store: &S,
    settings: &Settings,
    date: CalendarDate,
) -> Result<PhaseAssessment, PlannerError> {
    let remaining = days_remaining(settings.exam_date, date);
    let completion_rate = trailing_completion_rate(store, date).await?;
    let phase = determine_phase(remaining, completion_rate);
    tracing::debug!(
        date = %date,
        days_remaining = remaining,
        completion_rate = completion_rate,
        phase = phase.id(),
        "Phase classified"
    );
    Ok(PhaseAssessment {
        phase,
        days_remaining: remaining,
        completion_rate,
    })
}
