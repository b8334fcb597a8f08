//! Display ordering for assignment and goal lists.
//!
//! Open work always comes before finished work. Assignments are then sorted
//! by deadline; goals keep the order they were added in.

use super::{Assignment, Goal};

/// Not-completed first, then by deadline ascending.
///
/// The sort is stable, so assignments sharing a deadline keep their
/// insertion order.
pub fn order_assignments<'a, I>(assignments: I) -> Vec<&'a Assignment>
where
    I: IntoIterator<Item = &'a Assignment>,
{
    let mut ordered: Vec<&Assignment> = assignments.into_iter().collect();
    ordered.sort_by_key(|a| (a.is_completed(), a.deadline));
    ordered
}

/// Stable partition: not-completed goals first, insertion order otherwise.
pub fn order_goals<'a, I>(goals: I) -> Vec<&'a Goal>
where
    I: IntoIterator<Item = &'a Goal>,
{
    let mut ordered: Vec<&Goal> = goals.into_iter().collect();
    ordered.sort_by_key(|g| g.completed);
    ordered
}
