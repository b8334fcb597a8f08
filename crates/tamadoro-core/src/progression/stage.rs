use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One evolution tier of the pet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionStage {
    pub name: String,
    /// Experience needed to reach this stage.
    pub min_experience: u64,
    /// Display handle for the presentation layer.
    #[serde(default)]
    pub asset: String,
}

impl EvolutionStage {
    pub fn new(name: impl Into<String>, min_experience: u64, asset: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            min_experience,
            asset: asset.into(),
        }
    }
}

/// Ordered evolution thresholds.
///
/// Invariants, checked by [`StageTable::new`]:
/// - at least one stage
/// - the first stage starts at 0 experience
/// - thresholds are strictly increasing
/// - every stage has a non-blank name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageTable {
    stages: Vec<EvolutionStage>,
}

impl StageTable {
    /// Validate and build a table.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` when any invariant is broken.
    pub fn new(stages: Vec<EvolutionStage>) -> Result<Self, ConfigError> {
        let first = stages
            .first()
            .ok_or_else(|| ConfigError::invalid("stages", "stage table is empty"))?;
        if first.min_experience != 0 {
            return Err(ConfigError::invalid(
                "stages",
                format!(
                    "first stage '{}' must start at 0 experience, not {}",
                    first.name, first.min_experience
                ),
            ));
        }
        if let Some(blank) = stages.iter().position(|s| s.name.trim().is_empty()) {
            return Err(ConfigError::invalid(
                format!("stages[{blank}].name"),
                "stage name must not be empty",
            ));
        }
        for (i, pair) in stages.windows(2).enumerate() {
            if pair[1].min_experience <= pair[0].min_experience {
                return Err(ConfigError::invalid(
                    format!("stages[{}].min_experience", i + 1),
                    format!(
                        "threshold {} for '{}' must be greater than {} for '{}'",
                        pair[1].min_experience, pair[1].name, pair[0].min_experience, pair[0].name
                    ),
                ));
            }
        }
        Ok(Self { stages })
    }

    /// Egg, Child, Teen, Adult.
    pub fn default_stages() -> Vec<EvolutionStage> {
        vec![
            EvolutionStage::new("Egg", 0, "assets/pet/egg.png"),
            EvolutionStage::new("Child", 50, "assets/pet/child.png"),
            EvolutionStage::new("Teen", 150, "assets/pet/teen.png"),
            EvolutionStage::new("Adult", 300, "assets/pet/adult.png"),
        ]
    }

    pub fn stages(&self) -> &[EvolutionStage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Always false for a constructed table; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&EvolutionStage> {
        self.stages.get(index)
    }

    pub fn base(&self) -> &EvolutionStage {
        &self.stages[0]
    }

    pub fn last(&self) -> &EvolutionStage {
        &self.stages[self.stages.len() - 1]
    }
}

impl Default for StageTable {
    fn default() -> Self {
        Self {
            stages: Self::default_stages(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_is_valid() {
        let table = StageTable::new(StageTable::default_stages()).unwrap();
        assert_eq!(table, StageTable::default());
        assert_eq!(table.len(), 4);
        assert_eq!(table.base().name, "Egg");
        assert_eq!(table.last().name, "Adult");
    }

    #[test]
    fn rejects_empty_table() {
        assert!(StageTable::new(Vec::new()).is_err());
    }

    #[test]
    fn rejects_nonzero_base() {
        let err = StageTable::new(vec![EvolutionStage::new("Egg", 10, "")]).unwrap_err();
        assert!(err.to_string().contains("must start at 0"));
    }

    #[test]
    fn rejects_duplicate_threshold() {
        let err = StageTable::new(vec![
            EvolutionStage::new("Egg", 0, ""),
            EvolutionStage::new("Child", 50, ""),
            EvolutionStage::new("Twin", 50, ""),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: "stages[2].min_experience".to_string(),
                message: "threshold 50 for 'Twin' must be greater than 50 for 'Child'".to_string(),
            }
        );
    }

    #[test]
    fn rejects_decreasing_threshold() {
        assert!(StageTable::new(vec![
            EvolutionStage::new("Egg", 0, ""),
            EvolutionStage::new("Teen", 150, ""),
            EvolutionStage::new("Child", 50, ""),
        ])
        .is_err());
    }

    #[test]
    fn rejects_blank_name() {
        assert!(StageTable::new(vec![
            EvolutionStage::new("Egg", 0, ""),
            EvolutionStage::new("  ", 10, ""),
        ])
        .is_err());
    }
}
