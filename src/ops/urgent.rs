use std::cmp::Ordering;

use chrono::{Days, NaiveDate};

use crate::model::task::{ParsedLine, Priority, UrgentItem};
use crate::parse::parse_line;

/// How far ahead a due date still counts as urgent
pub const URGENT_WINDOW_DAYS: u64 = 7;

/// Select the urgent tasks in `text` and order them for display.
///
/// A task is urgent when it has priority `A` or is due on or before
/// `today + 7 days`. Completed and blank lines are skipped.
pub fn list_urgent(text: &str, today: NaiveDate) -> Vec<UrgentItem> {
    let horizon = today
        .checked_add_days(Days::new(URGENT_WINDOW_DAYS))
        .unwrap_or(NaiveDate::MAX);

    let mut items: Vec<UrgentItem> = text
        .lines()
        .enumerate()
        .filter_map(|(line_index, raw)| match parse_line(raw) {
            ParsedLine::Active(line) => Some((line_index, line)),
            ParsedLine::Blank | ParsedLine::Completed { .. } => None,
        })
        .filter(|(_, line)| {
            line.priority == Some(Priority::A) || line.due.is_some_and(|due| due <= horizon)
        })
        .map(|(line_index, line)| UrgentItem {
            priority: line.priority,
            due: line.due,
            is_overdue: line.due.is_some_and(|due| due < today),
            desc: line.desc,
            line_index,
        })
        .collect();

    // sort_by is stable: ties keep file order
    items.sort_by(urgency_order);
    items
}

/// Overdue first, then priority A, then earliest due date (undated last)
fn urgency_order(a: &UrgentItem, b: &UrgentItem) -> Ordering {
    b.is_overdue
        .cmp(&a.is_overdue)
        .then_with(|| is_top(b).cmp(&is_top(a)))
        .then_with(|| match (a.due, b.due) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}

fn is_top(item: &UrgentItem) -> bool {
    item.priority == Some(Priority::A)
}
