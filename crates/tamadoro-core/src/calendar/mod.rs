//! Calendar aggregation for the month view.
//!
//! Buckets are rebuilt from the assignment list on every call; no index is
//! kept alongside the session state.

mod grid;

pub use grid::MonthGrid;

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::task::Assignment;

/// Assignments grouped by due date, dates in ascending order.
pub type CalendarBuckets<'a> = BTreeMap<NaiveDate, Vec<&'a Assignment>>;

/// Group assignments by deadline.
///
/// Every assignment lands in exactly one bucket; within a bucket the input
/// order is kept.
pub fn bucket_by_deadline<'a, I>(assignments: I) -> CalendarBuckets<'a>
where
    I: IntoIterator<Item = &'a Assignment>,
{
    let mut buckets = CalendarBuckets::new();
    for assignment in assignments {
        buckets.entry(assignment.deadline).or_default().push(assignment);
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{AssignmentId, AssignmentStatus};

    fn assignment(id: u64, deadline: &str) -> Assignment {
        Assignment {
            id: AssignmentId(id),
            name: format!("a{id}"),
            status: AssignmentStatus::ToDo,
            deadline: NaiveDate::parse_from_str(deadline, "%Y-%m-%d").unwrap(),
            points: 10,
        }
    }

    #[test]
    fn groups_by_date_without_loss_or_duplication() {
        let items = vec![
            assignment(1, "2024-06-01"),
            assignment(2, "2024-05-20"),
            assignment(3, "2024-06-01"),
        ];
        let buckets = bucket_by_deadline(&items);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets.values().map(Vec::len).sum::<usize>(), items.len());

        let june_first = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let ids: Vec<u64> = buckets[&june_first].iter().map(|a| a.id.0).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn dates_iterate_in_order() {
        let items = vec![assignment(1, "2024-12-01"), assignment(2, "2024-01-01")];
        let dates: Vec<String> = bucket_by_deadline(&items)
            .keys()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .collect();
        assert_eq!(dates, vec!["2024-01-01", "2024-12-01"]);
    }

    #[test]
    fn no_assignments_no_buckets() {
        assert!(bucket_by_deadline(&Vec::<Assignment>::new()).is_empty());
    }
}
