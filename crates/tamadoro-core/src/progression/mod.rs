//! Pet evolution: which stage a given amount of experience unlocks and how far
//! along the way to the next stage the pet is.
//!
//! Everything here is a pure function of the experience total and an
//! immutable [`StageTable`].

mod stage;

pub use stage::{EvolutionStage, StageTable};

use serde::Serialize;

/// Where an experience total sits in the stage table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progression {
    pub experience: u64,
    /// Index of `current` in the table.
    pub stage_index: usize,
    pub current: EvolutionStage,
    /// `None` once the last stage is reached.
    pub next: Option<EvolutionStage>,
    /// 0.0 ..= 1.0 progress toward `next`; exactly 1.0 at the last stage.
    pub fraction: f64,
}

impl Progression {
    /// True when the pet has reached the final stage.
    pub fn is_max(&self) -> bool {
        self.next.is_none()
    }

    /// 0.0 .. 100.0 progress toward the next stage.
    pub fn percent(&self) -> f64 {
        self.fraction * 100.0
    }

    /// Experience still missing before the next evolution.
    pub fn experience_to_next(&self) -> Option<u64> {
        self.next
            .as_ref()
            .map(|next| next.min_experience.saturating_sub(self.experience))
    }
}

/// Index of the highest stage whose threshold does not exceed `experience`.
///
/// Falls back to the base stage, which a valid table always starts at 0.
pub fn stage_index_for(table: &StageTable, experience: u64) -> usize {
    table
        .stages()
        .iter()
        .rposition(|stage| stage.min_experience <= experience)
        .unwrap_or(0)
}

/// Compute the current stage, next stage and progress fraction.
pub fn progression(table: &StageTable, experience: u64) -> Progression {
    let stage_index = stage_index_for(table, experience);
    let current = table.stages()[stage_index].clone();
    let next = table.get(stage_index + 1).cloned();

    let fraction = match &next {
        Some(next) => {
            let span = next.min_experience - current.min_experience;
            let gained = experience.saturating_sub(current.min_experience);
            (gained as f64 / span as f64).clamp(0.0, 1.0)
        }
        None => 1.0,
    };

    Progression {
        experience,
        stage_index,
        current,
        next,
        fraction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> StageTable {
        StageTable::default()
    }

    #[test]
    fn zero_experience_is_base_stage() {
        let p = progression(&table(), 0);
        assert_eq!(p.current.name, "Egg");
        assert_eq!(p.next.as_ref().map(|s| s.name.as_str()), Some("Child"));
        assert_eq!(p.fraction, 0.0);
    }

    #[test]
    fn eighty_experience_is_thirty_percent_to_teen() {
        let p = progression(&table(), 80);
        assert_eq!(p.current.name, "Child");
        assert_eq!(p.next.as_ref().map(|s| s.name.as_str()), Some("Teen"));
        assert!((p.fraction - 0.30).abs() < 1e-9);
        assert_eq!(p.experience_to_next(), Some(70));
    }

    #[test]
    fn exact_threshold_unlocks_stage() {
        let p = progression(&table(), 150);
        assert_eq!(p.current.name, "Teen");
        assert_eq!(p.stage_index, 2);
        assert_eq!(p.fraction, 0.0);
    }

    #[test]
    fn one_below_threshold_stays_in_previous_stage() {
        let p = progression(&table(), 299);
        assert_eq!(p.current.name, "Teen");
        assert!(p.fraction < 1.0);
    }

    #[test]
    fn huge_experience_is_max_stage() {
        let p = progression(&table(), 1_000_000);
        assert_eq!(p.current.name, "Adult");
        assert!(p.is_max());
        assert_eq!(p.fraction, 1.0);
        assert_eq!(p.percent(), 100.0);
        assert_eq!(p.experience_to_next(), None);
    }

    #[test]
    fn single_stage_table_is_always_complete() {
        let table = StageTable::new(vec![EvolutionStage::new("Blob", 0, "")]).unwrap();
        let p = progression(&table, 42);
        assert_eq!(p.current.name, "Blob");
        assert!(p.is_max());
    }
}
