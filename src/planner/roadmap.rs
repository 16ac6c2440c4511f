use serde::{Serialize, Deserialize};
use crate::dates::CalendarDate;
use super::phase::{days_remaining, Phase};

/// Share of the remaining days and minimum length for phases 1-3.
const LEADING_PHASES: [(f64, i64); 3] = [(0.35, 14), (0.30, 14), (0.25, 7)];
const FINAL_PHASE_MIN_DAYS: i64 = 7;

/// Planned calendar window for one phase. Descriptive only; plan generation
/// uses the classifier, not these windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseWindow {
    pub phase: Phase,
    pub start: CalendarDate,
    pub end: CalendarDate,
    pub days: i64,
    pub is_current: bool,
    pub is_completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    /// `YYYY.MM`
    pub month: String,
    pub text: String,
}

/// Days per phase over a span of `span` calendar days (today through exam day).
/// Floors apply first; if they overrun the span, earlier phases give way so the
/// windows still tile it exactly. Phases left with zero days are skipped.
fn allocate(span: i64) -> [i64; 4] {
    let remaining = span - 1;
    let mut leading = LEADING_PHASES
        .map(|(share, floor)| ((remaining as f64 * share).round() as i64).max(floor));

    let budget = span - FINAL_PHASE_MIN_DAYS.min(span);
    let mut excess = leading.iter().sum::<i64>() - budget;
    for days in leading.iter_mut() {
        if excess <= 0 {
            break;
        }
        let cut = excess.min(*days);
        *days -= cut;
        excess -= cut;
    }

    let final_days = span - leading.iter().sum::<i64>();
    [leading[0], leading[1], leading[2], final_days]
}

/// Split today..=exam_date into consecutive phase windows.
/// Once the exam is today or past, a single final-phase window is returned.
pub fn generate_phase_roadmap(exam_date: CalendarDate, today: CalendarDate) -> Vec<PhaseWindow> {
    let remaining = days_remaining(exam_date, today);
    if remaining <= 0 {
        return vec![PhaseWindow {
            phase: Phase::FinalOptimization,
            start: today,
            end: exam_date,
            days: 0,
            is_current: true,
            is_completed: false,
        }];
    }

    let mut windows = Vec::with_capacity(4);
    let mut cursor = today;
    for (phase, days) in Phase::ALL.into_iter().zip(allocate(remaining + 1)) {
        if days <= 0 {
            continue;
        }
        let start = cursor;
        let end = cursor.add_days(days - 1);
        cursor = end.add_days(1);
        windows.push(PhaseWindow {
            phase,
            start,
            end,
            days,
            is_current: today >= start && today <= end,
            is_completed: today > end,
        });
    }
    windows
}

fn milestone_text(days_left: i64) -> &'static str {
    match days_left {
        d if d > 120 => "Settle core concepts and a steady review routine",
        d if d > 90 => "Finish past exam analysis and identify weak points",
        d if d > 60 => "Deepen question-type training and start pacing practice",
        d if d > 30 => "Start full mock exams with weekly check-ins",
        d if d > 14 => "Drill weak question types repeatedly",
        _ => "Final wrap-up and condition management",
    }
}

/// One milestone per calendar month from the current month through the exam month.
pub fn generate_milestones(exam_date: CalendarDate, today: CalendarDate) -> Vec<Milestone> {
    let remaining = days_remaining(exam_date, today);
    let mut milestones = Vec::new();
    let mut cursor = today.first_of_month();

    while cursor <= exam_date {
        let days_left = remaining - today.days_until(cursor);
        milestones.push(Milestone {
            month: cursor.month_label(),
            text: milestone_text(days_left).to_string(),
        });
        cursor = cursor.next_month_start();
    }
    milestones
}
