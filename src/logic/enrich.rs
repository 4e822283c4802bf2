use crate::logic::scoring::{score_record, SuccessModel};
use crate::model::HybridRecord;

pub const NOVELTY_PLACEHOLDER: &str = "Likely Novel";
pub const PREDICTED_FLAVOR_PLACEHOLDER: &str = "Complex & Fruity";
pub const DAYS_TO_HARVEST_PLACEHOLDER: u32 = 90;

/// Fill the derived columns of a freshly loaded working set.
///
/// Novelty, predicted flavor and harvest days are fixed placeholders set on
/// every record. Records without a stored score are scored with `model`.
/// Nothing here is written back to the store.
pub fn enrich_records(records: &mut [HybridRecord], model: Option<&dyn SuccessModel>) {
    for record in records.iter_mut() {
        record.novelty_flag = Some(NOVELTY_PLACEHOLDER.to_string());
        record.predicted_flavor = Some(PREDICTED_FLAVOR_PLACEHOLDER.to_string());
        record.estimated_days_to_harvest = Some(DAYS_TO_HARVEST_PLACEHOLDER);
        if record.ai_success_score.is_none() {
            record.ai_success_score = Some(score_record(record, model));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::scoring::LinearModel;
    use crate::model::{ClimateSuitability, SuccessScore, YieldLevel};

    fn records() -> Vec<HybridRecord> {
        vec![
            HybridRecord::new("A", "B", 100, YieldLevel::High, ClimateSuitability::High, "Sweet"),
            HybridRecord::new("C", "D", 200, YieldLevel::Low, ClimateSuitability::Low, "Bitter"),
        ]
    }

    #[test]
    fn test_placeholders_are_unconditional() {
        let mut records = records();
        records[0].novelty_flag = Some("Known".to_string());
        enrich_records(&mut records, None);

        for record in &records {
            assert_eq!(record.novelty_flag.as_deref(), Some("Likely Novel"));
            assert_eq!(record.predicted_flavor.as_deref(), Some("Complex & Fruity"));
            assert_eq!(record.estimated_days_to_harvest, Some(90));
        }
    }

    #[test]
    fn test_missing_model_marks_every_score_unknown() {
        let mut records = records();
        enrich_records(&mut records, None);
        assert!(records
            .iter()
            .all(|r| r.ai_success_score == Some(SuccessScore::Unknown)));
    }

    #[test]
    fn test_stored_scores_are_kept() {
        let mut records = records();
        records[1].ai_success_score = Some(SuccessScore::Score(0.1));
        let model = LinearModel::new(vec!["Expected Yield_High".to_string()], vec![1.0], 0.0).unwrap();

        enrich_records(&mut records, Some(&model));
        assert_eq!(records[0].ai_success_score, Some(SuccessScore::Score(1.0)));
        assert_eq!(records[1].ai_success_score, Some(SuccessScore::Score(0.1)));
    }
}
