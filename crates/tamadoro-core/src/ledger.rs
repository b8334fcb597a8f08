//! Reward ledger.
//!
//! Experience and point balance are always recomputed from the current
//! collections. There is no stored running total, so toggling an item back and
//! forth can never drift or double count.

use crate::shop::{Catalog, ItemId};
use crate::task::{Assignment, Goal};

/// Sum of points over completed assignments and completed goals.
pub fn total_experience<'a, A, G>(assignments: A, goals: G) -> u64
where
    A: IntoIterator<Item = &'a Assignment>,
    G: IntoIterator<Item = &'a Goal>,
{
    let from_assignments: u64 = assignments
        .into_iter()
        .map(|a| u64::from(a.earned_points()))
        .sum();
    let from_goals: u64 = goals.into_iter().map(|g| u64::from(g.earned_points())).sum();
    from_assignments + from_goals
}

/// Points spent on the given purchases. Ids missing from the catalog cost nothing.
pub fn spent_points(catalog: &Catalog, purchased: &[ItemId]) -> u64 {
    purchased
        .iter()
        .filter_map(|id| catalog.get(*id))
        .map(|item| u64::from(item.price))
        .sum()
}

/// Balance left from `initial` after the given purchases, floored at zero.
pub fn point_balance(initial: u32, catalog: &Catalog, purchased: &[ItemId]) -> u32 {
    let remaining = u64::from(initial).saturating_sub(spent_points(catalog, purchased));
    u32::try_from(remaining).unwrap_or(u32::MAX)
}
