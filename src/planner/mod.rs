pub mod daily;
pub mod phase;
pub mod roadmap;
pub mod weekly;

pub use daily::{compose_daily_plan, ensure_daily_plan, generate_daily_plan};
pub use phase::{assess_phase, days_remaining, determine_phase, trailing_completion_rate, Phase, PhaseAssessment};
pub use roadmap::{generate_milestones, generate_phase_roadmap, Milestone, PhaseWindow};
pub use weekly::{generate_weekly_plan, DayPlan, WeeklyPlan};
