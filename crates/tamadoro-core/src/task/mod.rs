//! Assignments and daily goals.
//!
//! Both kinds of work carry a point value that counts toward experience only
//! while the item is done. Nothing here keeps a running total; see
//! [`crate::ledger`] for how experience is derived.

pub mod ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Format used for deadlines everywhere in the crate.
pub const DEADLINE_FORMAT: &str = "%Y-%m-%d";

/// Session-unique assignment identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssignmentId(pub u64);

/// Session-unique goal identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoalId(pub u64);

impl fmt::Display for AssignmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for GoalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Workflow status of an assignment.
///
/// The variants follow the order work moves through, but only `Completed`
/// carries meaning for rewards.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    ToDo,
    InProgress,
    Completed,
}

impl AssignmentStatus {
    pub fn is_completed(self) -> bool {
        matches!(self, AssignmentStatus::Completed)
    }

    pub fn label(self) -> &'static str {
        match self {
            AssignmentStatus::ToDo => "To Do",
            AssignmentStatus::InProgress => "In Progress",
            AssignmentStatus::Completed => "Completed",
        }
    }
}

impl Default for AssignmentStatus {
    fn default() -> Self {
        AssignmentStatus::ToDo
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AssignmentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "todo" | "to-do" | "to_do" => Ok(AssignmentStatus::ToDo),
            "doing" | "in-progress" | "in_progress" | "progress" => {
                Ok(AssignmentStatus::InProgress)
            }
            "done" | "completed" | "complete" => Ok(AssignmentStatus::Completed),
            other => Err(ValidationError::InvalidValue {
                field: "status".to_string(),
                message: format!("unknown status '{other}' (expected todo, doing or done)"),
            }),
        }
    }
}

/// A deadline-bound piece of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub name: String,
    pub status: AssignmentStatus,
    /// Due date, serialized as `YYYY-MM-DD`.
    pub deadline: NaiveDate,
    /// Awarded while `status` is `Completed`.
    pub points: u32,
}

impl Assignment {
    pub fn is_completed(&self) -> bool {
        self.status.is_completed()
    }

    /// Points this assignment currently contributes to experience.
    pub fn earned_points(&self) -> u32 {
        if self.is_completed() {
            self.points
        } else {
            0
        }
    }

    pub fn deadline_string(&self) -> String {
        self.deadline.format(DEADLINE_FORMAT).to_string()
    }
}

/// A done/not-done daily objective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub name: String,
    pub completed: bool,
    pub points: u32,
}

impl Goal {
    /// Points this goal currently contributes to experience.
    pub fn earned_points(&self) -> u32 {
        if self.completed {
            self.points
        } else {
            0
        }
    }
}

/// Partial update applied to an assignment in a single command.
///
/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentPatch {
    pub name: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub points: Option<u32>,
    pub status: Option<AssignmentStatus>,
}

impl AssignmentPatch {
    pub fn status(status: AssignmentStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.deadline.is_none() && self.points.is_none() && self.status.is_none()
    }
}

/// Parse a `YYYY-MM-DD` deadline.
///
/// # Errors
/// `MissingDeadline` for blank input, `InvalidDeadline` for anything that is
/// not a zero-padded calendar date.
pub fn parse_deadline(raw: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingDeadline);
    }
    let invalid = || ValidationError::InvalidDeadline {
        value: trimmed.to_string(),
    };
    if trimmed.len() != 10 {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(trimmed, DEADLINE_FORMAT).map_err(|_| invalid())
}

/// Trim a user-supplied name, rejecting blanks.
pub(crate) fn clean_name(raw: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName { field });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(status: AssignmentStatus, points: u32) -> Assignment {
        Assignment {
            id: AssignmentId(1),
            name: "Essay".to_string(),
            status,
            deadline: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            points,
        }
    }

    #[test]
    fn status_default_is_todo() {
        assert_eq!(AssignmentStatus::default(), AssignmentStatus::ToDo);
    }

    #[test]
    fn status_parses_cli_aliases() {
        assert_eq!("todo".parse::<AssignmentStatus>().unwrap(), AssignmentStatus::ToDo);
        assert_eq!("Doing".parse::<AssignmentStatus>().unwrap(), AssignmentStatus::InProgress);
        assert_eq!("done".parse::<AssignmentStatus>().unwrap(), AssignmentStatus::Completed);
        assert!("finished-ish".parse::<AssignmentStatus>().is_err());
    }

    #[test]
    fn only_completed_assignments_earn_points() {
        assert_eq!(assignment(AssignmentStatus::ToDo, 50).earned_points(), 0);
        assert_eq!(assignment(AssignmentStatus::InProgress, 50).earned_points(), 0);
        assert_eq!(assignment(AssignmentStatus::Completed, 50).earned_points(), 50);
    }

    #[test]
    fn goal_earns_points_when_completed() {
        let mut goal = Goal {
            id: GoalId(2),
            name: "Drink water".to_string(),
            completed: false,
            points: 20,
        };
        assert_eq!(goal.earned_points(), 0);
        goal.completed = true;
        assert_eq!(goal.earned_points(), 20);
    }

    #[test]
    fn deadline_parsing() {
        assert_eq!(
            parse_deadline(" 2024-05-01 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
        );
        assert_eq!(parse_deadline(""), Err(ValidationError::MissingDeadline));
        assert!(matches!(
            parse_deadline("2024-5-1"),
            Err(ValidationError::InvalidDeadline { .. })
        ));
        assert!(matches!(
            parse_deadline("2024-02-30"),
            Err(ValidationError::InvalidDeadline { .. })
        ));
    }

    #[test]
    fn deadline_serializes_as_iso_date() {
        let json = serde_json::to_value(assignment(AssignmentStatus::ToDo, 10)).unwrap();
        assert_eq!(json["deadline"], "2024-06-01");
        assert_eq!(json["status"], "to_do");
    }

    #[test]
    fn clean_name_rejects_whitespace() {
        assert_eq!(
            clean_name("   ", "Assignment"),
            Err(ValidationError::EmptyName { field: "Assignment" })
        );
        assert_eq!(clean_name("  Read ch. 3 ", "Assignment").unwrap(), "Read ch. 3");
    }
}
