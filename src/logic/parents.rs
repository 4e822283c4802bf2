use itertools::Itertools;
use serde::Serialize;

use crate::model::HybridRecord;

/// Distinct parent names across a working set, in first-appearance order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParentIndex {
    pub parents: Vec<String>,
}

impl ParentIndex {
    pub fn build(records: &[HybridRecord]) -> Self {
        let parents = records
            .iter()
            .flat_map(|record| [record.parent_a.as_str(), record.parent_b.as_str()])
            .unique()
            .map(str::to_string)
            .collect();
        Self { parents }
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClimateSuitability, YieldLevel};

    #[test]
    fn test_index_covers_both_columns_once() {
        let records = vec![
            HybridRecord::new("Reaper", "Habanero", 1, YieldLevel::High, ClimateSuitability::High, "x"),
            HybridRecord::new("Habanero", "Aji", 1, YieldLevel::High, ClimateSuitability::High, "x"),
            HybridRecord::new("Aji", "Reaper", 1, YieldLevel::High, ClimateSuitability::High, "x"),
        ];
        let index = ParentIndex::build(&records);
        assert_eq!(index.parents, vec!["Reaper", "Habanero", "Aji"]);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_empty_working_set() {
        assert!(ParentIndex::build(&[]).is_empty());
    }
}
