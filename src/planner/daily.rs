use crate::config::Settings;
use crate::dates::CalendarDate;
use crate::error::PlannerError;
use crate::mistakes::{pending_resolves, MistakeLog, Subject};
use crate::store::RecordStore;
use crate::tasks::{enforce_generated_cap, Category, Task, MAX_GENERATED_TASKS_PER_DAY};
use super::phase::{assess_phase, Phase};

/// Slots that overdue re-solves may take, leaving room for forward progress.
pub const MAX_RESOLVE_SLOTS: usize = 2;
pub const RESOLVE_MINUTES: u32 = 30;
pub const MOCK_EXAM_MINUTES: u32 = 120;
pub const MOCK_REVIEW_MINUTES: u32 = 90;

// Shares of the daily study time for the three phase tasks.
const PRIMARY_SHARE: f64 = 0.40;
const SECONDARY_SHARE: f64 = 0.35;
const TERTIARY_SHARE: f64 = 0.25;

struct PlanBuilder {
    date: CalendarDate,
    tasks: Vec<Task>,
}

impl PlanBuilder {
    fn new(date: CalendarDate) -> Self {
        PlanBuilder { date, tasks: Vec::with_capacity(MAX_GENERATED_TASKS_PER_DAY) }
    }

    fn len(&self) -> usize {
        self.tasks.len()
    }

    fn add(&mut self, title: impl Into<String>, category: Category, minutes: u32) {
        if self.tasks.len() >= MAX_GENERATED_TASKS_PER_DAY {
            return;
        }
        let seq = self.tasks.len();
        self.tasks.push(Task::generated(self.date, seq, title, category, minutes));
    }

    fn finish(self) -> Vec<Task> {
        enforce_generated_cap(self.tasks)
    }
}

/// Build the task list for `date` from an already classified phase and the
/// logs whose re-solves are due. Pure; the caller persists the result.
pub fn compose_daily_plan(
    date: CalendarDate,
    phase: Phase,
    settings: &Settings,
    pending: &[&MistakeLog],
) -> Vec<Task> {
    let settings = settings.sanitized();
    let mut plan = PlanBuilder::new(date);

    // Overdue re-solves first, one per subject.
    let mut seen: Vec<Subject> = Vec::new();
    for log in pending {
        if plan.len() >= MAX_RESOLVE_SLOTS {
            break;
        }
        if seen.contains(&log.subject) {
            continue;
        }
        seen.push(log.subject);
        plan.add(
            format!("{} mistake re-solve", log.subject.label()),
            Category::Resolve,
            RESOLVE_MINUTES,
        );
    }

    // Re-solves count as review; two of them leave no room for new problem work.
    let need_problem = plan.len() < MAX_RESOLVE_SLOTS;
    let favored = settings.favored_subject();
    let other = settings.other_subject();
    let primary = settings.minutes_for(PRIMARY_SHARE);
    let secondary = settings.minutes_for(SECONDARY_SHARE);
    let tertiary = settings.minutes_for(TERTIARY_SHARE);

    match phase {
        Phase::Foundation => {
            // Review goes to the ratio-favored subject, practice to the other one.
            plan.add(format!("{} core lecture review", favored.label()), Category::Review, primary);
            plan.add(format!("{} past exam analysis", other.label()), other.category(), secondary);
            plan.add("Summarize and review today's material", Category::Review, tertiary);
        }
        Phase::TypeTraining => {
            if need_problem {
                plan.add(
                    format!("{} question-type practice (timed)", favored.label()),
                    favored.category(),
                    primary,
                );
            }
            plan.add(
                format!("{} past exam review and type analysis", other.label()),
                Category::Review,
                secondary,
            );
            plan.add("Error notebook review and weak-point summary", Category::Review, tertiary);
        }
        Phase::FullScope if date.is_saturday() => {
            plan.add("Full mock exam (timed)", Category::Mock, MOCK_EXAM_MINUTES);
            plan.add("Mock exam error analysis", Category::Review, MOCK_REVIEW_MINUTES);
        }
        Phase::FullScope => {
            if need_problem {
                plan.add(
                    format!("{} full-range timed set", favored.label()),
                    favored.category(),
                    primary,
                );
            }
            plan.add("Past exam error analysis and type review", Category::Review, secondary);
            plan.add("Focused review of weak question types", Category::Review, tertiary);
        }
        Phase::FinalOptimization => {
            plan.add("Re-solve weak question types from past exams", Category::Resolve, primary);
            plan.add("Final error notebook check", Category::Review, secondary);
            plan.add("Core concept summary review", Category::Review, tertiary);
        }
    }

    plan.finish()
}

/// Generate (but do not persist) the plan for `date`.
/// The caller must first check that no tasks exist for `date`.
pub async fn generate_daily_plan<S: RecordStore + ?Sized>(
    store: &S,
    settings: &Settings,
    date: CalendarDate,
) -> Result<Vec<Task>, PlannerError> {
    let assessment = assess_phase(store, settings, date).await?;
    let logs = store.logs().await?;
    let pending = pending_resolves(&logs, date);
    let tasks = compose_daily_plan(date, assessment.phase, settings, &pending);

    let problem_minutes: u32 = tasks
        .iter()
        .filter(|t| t.category.is_problem_solving())
        .filter_map(|t| t.estimated_minutes)
        .sum();
    let total_minutes: u32 = tasks.iter().filter_map(|t| t.estimated_minutes).sum();
    tracing::info!(
        date = %date,
        phase = assessment.phase.id(),
        pending_resolves = pending.len(),
        task_count = tasks.len(),
        problem_minutes = problem_minutes,
        total_minutes = total_minutes,
        "Daily plan generated"
    );
    Ok(tasks)
}

/// Tasks for `date`, generating and persisting a plan when none exist yet.
pub async fn ensure_daily_plan<S: RecordStore + ?Sized>(
    store: &S,
    date: CalendarDate,
) -> Result<Vec<Task>, PlannerError> {
    let existing = store.tasks_by_date(date).await?;
    if !existing.is_empty() {
        return Ok(existing);
    }

    let settings = store.settings().await?;
    let tasks = generate_daily_plan(store, &settings, date).await?;
    store.save_tasks(&tasks).await?;
    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mistakes::MaterialType;

    fn d(s: &str) -> CalendarDate {
        CalendarDate::parse(s).unwrap()
    }

    fn overdue(subject: Subject, id: &str) -> MistakeLog {
        let mut log = MistakeLog::new(d("2025-01-01"), subject, MaterialType::PastExam, false, None);
        log.id = id.to_string();
        log
    }

    fn shape(tasks: &[Task]) -> Vec<(Category, Option<u32>)> {
        tasks.iter().map(|t| (t.category, t.estimated_minutes)).collect()
    }

    // 2025-03-10 is a Monday, 2025-03-15 a Saturday
    const WEEKDAY: &str = "2025-03-10";
    const SATURDAY: &str = "2025-03-15";

    #[test]
    fn test_foundation_without_resolves() {
        let tasks = compose_daily_plan(d(WEEKDAY), Phase::Foundation, &Settings::default(), &[]);
        assert_eq!(shape(&tasks), vec![
            (Category::Review, Some(144)),
            (Category::Logic, Some(126)),
            (Category::Review, Some(90)),
        ]);
        assert!(tasks[0].title.starts_with("Language comprehension"));
    }

    #[test]
    fn test_foundation_follows_ratio() {
        let mut settings = Settings::default();
        settings.language_ratio = 30;
        let tasks = compose_daily_plan(d(WEEKDAY), Phase::Foundation, &settings, &[]);
        assert!(tasks[0].title.starts_with("Logical reasoning"));
        assert_eq!(tasks[1].category, Category::Language);
    }

    #[test]
    fn test_type_training_with_one_resolve_keeps_problem_task() {
        let logs = [overdue(Subject::Logic, "a")];
        let pending: Vec<&MistakeLog> = logs.iter().collect();
        let tasks = compose_daily_plan(d(WEEKDAY), Phase::TypeTraining, &Settings::default(), &pending);
        assert_eq!(shape(&tasks), vec![
            (Category::Resolve, Some(30)),
            (Category::Language, Some(144)),
            (Category::Review, Some(126)),
        ]);
        assert_eq!(tasks[0].title, "Logical reasoning mistake re-solve");
    }

    #[test]
    fn test_two_resolves_drop_problem_task() {
        let logs = [
            overdue(Subject::Logic, "a"),
            overdue(Subject::Logic, "b"),
            overdue(Subject::Language, "c"),
            overdue(Subject::Essay, "d"),
        ];
        let pending: Vec<&MistakeLog> = logs.iter().collect();
        for phase in [Phase::TypeTraining, Phase::FullScope] {
            let tasks = compose_daily_plan(d(WEEKDAY), phase, &Settings::default(), &pending);
            assert_eq!(tasks.len(), 3);
            assert_eq!(tasks[0].title, "Logical reasoning mistake re-solve");
            assert_eq!(tasks[1].title, "Language comprehension mistake re-solve");
            assert_eq!(tasks[2].category, Category::Review);
        }
    }

    #[test]
    fn test_saturday_mock_only_in_full_scope() {
        let tasks = compose_daily_plan(d(SATURDAY), Phase::FullScope, &Settings::default(), &[]);
        assert_eq!(shape(&tasks), vec![
            (Category::Mock, Some(120)),
            (Category::Review, Some(90)),
        ]);

        let tasks = compose_daily_plan(d(SATURDAY), Phase::TypeTraining, &Settings::default(), &[]);
        assert!(tasks.iter().all(|t| t.category != Category::Mock));
        assert_eq!(tasks.len(), 3);
    }

    #[test]
    fn test_final_phase_is_review_weighted() {
        let tasks = compose_daily_plan(d(SATURDAY), Phase::FinalOptimization, &Settings::default(), &[]);
        assert_eq!(shape(&tasks), vec![
            (Category::Resolve, Some(144)),
            (Category::Review, Some(126)),
            (Category::Review, Some(90)),
        ]);
    }

    #[test]
    fn test_never_more_than_three() {
        let logs = [overdue(Subject::Logic, "a"), overdue(Subject::Language, "b")];
        let pending: Vec<&MistakeLog> = logs.iter().collect();
        for phase in Phase::ALL {
            for date in [WEEKDAY, SATURDAY] {
                for p in [&pending[..0], &pending[..1], &pending[..]] {
                    let tasks = compose_daily_plan(d(date), phase, &Settings::default(), p);
                    assert!(!tasks.is_empty());
                    assert!(tasks.len() <= MAX_GENERATED_TASKS_PER_DAY);
                }
            }
        }
    }

    #[test]
    fn test_degenerate_hours_use_defaults() {
        let mut settings = Settings::default();
        settings.daily_study_hours = 0.0;
        let tasks = compose_daily_plan(d(WEEKDAY), Phase::Foundation, &settings, &[]);
        assert_eq!(tasks[0].estimated_minutes, Some(144));
    }
}
