use serde::{Serialize, Deserialize};
use crate::dates::CalendarDate;
use super::{MistakeLog, ResolveInterval, Subject};

/// One outstanding re-solve obligation. A log yields one item per unresolved interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveItem {
    pub log_id: String,
    pub subject: Subject,
    pub log_date: CalendarDate,
    pub interval: ResolveInterval,
    pub due_date: CalendarDate,
    pub overdue: bool,
}

fn earliest_due_on_or_before(log: &MistakeLog, as_of: CalendarDate) -> Option<CalendarDate> {
    ResolveInterval::ALL
        .into_iter()
        .filter_map(|i| log.outstanding(i))
        .filter(|due| *due <= as_of)
        .min()
}

/// Incorrect logs with an unresolved interval due on or before `as_of`.
/// Ordered by the oldest owed due date, then log id.
pub fn pending_resolves(logs: &[MistakeLog], as_of: CalendarDate) -> Vec<&MistakeLog> {
    let mut pending: Vec<(CalendarDate, &MistakeLog)> = logs
        .iter()
        .filter_map(|log| earliest_due_on_or_before(log, as_of).map(|due| (due, log)))
        .collect();
    pending.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.id.cmp(&b.1.id)));
    pending.into_iter().map(|(_, log)| log).collect()
}

/// Every unresolved interval of every incorrect log, past or future,
/// sorted by due date then log id.
pub fn upcoming_resolves(logs: &[MistakeLog], as_of: CalendarDate) -> Vec<ResolveItem> {
    let mut items: Vec<ResolveItem> = logs
        .iter()
        .flat_map(|log| {
            ResolveInterval::ALL.into_iter().filter_map(move |interval| {
                log.outstanding(interval).map(|due_date| ResolveItem {
                    log_id: log.id.clone(),
                    subject: log.subject,
                    log_date: log.date,
                    interval,
                    due_date,
                    overdue: due_date <= as_of,
                })
            })
        })
        .collect();

    items.sort_by(|a, b| {
        a.due_date
            .cmp(&b.due_date)
            .then_with(|| a.log_id.cmp(&b.log_id))
            .then_with(|| a.interval.cmp(&b.interval))
    });
    items
}
