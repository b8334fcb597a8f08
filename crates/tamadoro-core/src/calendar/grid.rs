use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

use super::CalendarBuckets;
use crate::error::ValidationError;
use crate::task::Assignment;

/// Layout of one calendar month with weeks starting on Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthGrid {
    first: NaiveDate,
}

impl MonthGrid {
    /// # Errors
    /// `InvalidMonth` when `month` is outside 1..=12 or the year is out of range.
    pub fn new(year: i32, month: u32) -> Result<Self, ValidationError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first| Self { first })
            .ok_or(ValidationError::InvalidMonth { year, month })
    }

    /// The month that contains `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    /// e.g. "June 2024"
    pub fn title(&self) -> String {
        self.first.format("%B %Y").to_string()
    }

    pub fn days_in_month(&self) -> u32 {
        self.first
            .checked_add_months(Months::new(1))
            .map(|next| next.signed_duration_since(self.first).num_days() as u32)
            .unwrap_or(31)
    }

    /// Empty cells before the 1st so it lands in its weekday column.
    pub fn leading_blanks(&self) -> u32 {
        self.first.weekday().num_days_from_sunday()
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.first.iter_days().take(self.days_in_month() as usize)
    }

    /// Blank cells followed by one cell per day.
    pub fn cells(&self) -> Vec<Option<NaiveDate>> {
        std::iter::repeat(None)
            .take(self.leading_blanks() as usize)
            .chain(self.days().map(Some))
            .collect()
    }

    /// `cells` split into rows of seven. The last row may be short.
    pub fn weeks(&self) -> Vec<Vec<Option<NaiveDate>>> {
        self.cells().chunks(7).map(<[_]>::to_vec).collect()
    }

    /// Move by `months` (negative goes back).
    ///
    /// # Errors
    /// `InvalidMonth` when the result leaves chrono's supported range.
    pub fn shift(&self, months: i32) -> Result<Self, ValidationError> {
        let step = Months::new(months.unsigned_abs());
        let moved = if months >= 0 {
            self.first.checked_add_months(step)
        } else {
            self.first.checked_sub_months(step)
        };
        moved.map(|first| Self { first }).ok_or(ValidationError::InvalidMonth {
            year: self.year(),
            month: self.month(),
        })
    }

    /// Each day of the month with the assignments due on it.
    pub fn days_with<'a>(
        &self,
        buckets: &CalendarBuckets<'a>,
    ) -> Vec<(NaiveDate, Vec<&'a Assignment>)> {
        self.days()
            .map(|day| (day, buckets.get(&day).cloned().unwrap_or_default()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::bucket_by_deadline;
    use crate::task::{AssignmentId, AssignmentStatus};

    #[test]
    fn june_2024_layout() {
        // 2024-06-01 is a Saturday.
        let grid = MonthGrid::new(2024, 6).unwrap();
        assert_eq!(grid.days_in_month(), 30);
        assert_eq!(grid.leading_blanks(), 6);
        assert_eq!(grid.cells().len(), 36);
        assert_eq!(grid.weeks().len(), 6);
        assert_eq!(grid.title(), "June 2024");
    }

    #[test]
    fn leap_february() {
        assert_eq!(MonthGrid::new(2024, 2).unwrap().days_in_month(), 29);
        assert_eq!(MonthGrid::new(2023, 2).unwrap().days_in_month(), 28);
    }

    #[test]
    fn invalid_month_rejected() {
        assert_eq!(
            MonthGrid::new(2024, 13),
            Err(ValidationError::InvalidMonth {
                year: 2024,
                month: 13
            })
        );
    }

    #[test]
    fn shift_crosses_year_boundaries() {
        let dec = MonthGrid::new(2024, 12).unwrap();
        let jan = dec.shift(1).unwrap();
        assert_eq!((jan.year(), jan.month()), (2025, 1));
        let back = jan.shift(-2).unwrap();
        assert_eq!((back.year(), back.month()), (2024, 11));
    }

    #[test]
    fn containing_normalizes_to_first() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 17).unwrap();
        assert_eq!(MonthGrid::containing(date), MonthGrid::new(2024, 3).unwrap());
    }

    #[test]
    fn days_with_attaches_due_assignments() {
        let due = Assignment {
            id: AssignmentId(1),
            name: "Report".to_string(),
            status: AssignmentStatus::InProgress,
            deadline: NaiveDate::from_ymd_opt(2024, 6, 14).unwrap(),
            points: 30,
        };
        let elsewhere = Assignment {
            id: AssignmentId(2),
            deadline: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            ..due.clone()
        };
        let items = vec![due, elsewhere];
        let buckets = bucket_by_deadline(&items);
        let days = MonthGrid::new(2024, 6).unwrap().days_with(&buckets);
        assert_eq!(days.len(), 30);
        let busy: Vec<_> = days.iter().filter(|(_, due)| !due.is_empty()).collect();
        assert_eq!(busy.len(), 1);
        assert_eq!(busy[0].0.day(), 14);
    }
}
