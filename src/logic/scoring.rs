use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::model::{HybridRecord, SuccessScore};
use crate::table::columns::{CLIMATE_SUITABILITY, EXPECTED_YIELD};

/// Pre-trained success model. Loaded once and never trained here.
pub trait SuccessModel: Send + Sync {
    /// Feature names in the exact order `predict` expects them.
    fn feature_names(&self) -> &[String];

    /// Score one row per input vector.
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>>;
}

/// Linear model artifact stored as JSON.
///
/// ```json
/// {"feature_names_in": ["Expected Yield_High"], "coefficients": [0.4], "intercept": 0.1}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    feature_names_in: Vec<String>,
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearModel {
    pub fn new(feature_names_in: Vec<String>, coefficients: Vec<f64>, intercept: f64) -> Result<Self> {
        let model = Self {
            feature_names_in,
            coefficients,
            intercept,
        };
        model.validate()?;
        Ok(model)
    }

    /// Read and validate an artifact from disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model artifact {}", path.display()))?;
        let model: LinearModel = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse model artifact {}", path.display()))?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<()> {
        if self.feature_names_in.len() != self.coefficients.len() {
            return Err(anyhow!(
                "Model has {} feature names but {} coefficients",
                self.feature_names_in.len(),
                self.coefficients.len()
            ));
        }
        Ok(())
    }
}

impl SuccessModel for LinearModel {
    fn feature_names(&self) -> &[String] {
        &self.feature_names_in
    }

    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>> {
        rows.iter()
            .map(|row| {
                if row.len() != self.coefficients.len() {
                    return Err(anyhow!(
                        "Expected {} features, got {}",
                        self.coefficients.len(),
                        row.len()
                    ));
                }
                Ok(self.intercept
                    + row
                        .iter()
                        .zip(&self.coefficients)
                        .map(|(x, w)| x * w)
                        .sum::<f64>())
            })
            .collect()
    }
}

/// Load the model artifact at startup.
///
/// Any failure disables scoring for the whole process: the caller gets `None`
/// and a warning is logged, so every score becomes `Unknown`.
pub fn load_model(path: &Path) -> Option<Arc<dyn SuccessModel>> {
    match LinearModel::from_file(path) {
        Ok(model) => {
            log::info!(
                "Loaded success model from {} ({} features)",
                path.display(),
                model.feature_names().len()
            );
            Some(Arc::new(model))
        }
        Err(e) => {
            log::warn!("Success scoring disabled: {:#}", e);
            None
        }
    }
}

/// One-hot encode the categorical columns of a record.
pub fn encode_features(record: &HybridRecord) -> HashMap<String, f64> {
    let mut features = HashMap::new();
    features.insert(
        format!("{}_{}", EXPECTED_YIELD, record.expected_yield),
        1.0,
    );
    features.insert(
        format!("{}_{}", CLIMATE_SUITABILITY, record.climate_suitability),
        1.0,
    );
    features
}

/// Reconcile produced features with the model's expected feature list.
///
/// Expected names missing from `produced` are zero-filled, produced names the
/// model does not know are dropped, and the result follows `expected` order.
pub fn align_features(produced: &HashMap<String, f64>, expected: &[String]) -> Vec<f64> {
    expected
        .iter()
        .map(|name| produced.get(name).copied().unwrap_or(0.0))
        .collect()
}

/// Score a single record, or `Unknown` when no model is available.
pub fn score_record(record: &HybridRecord, model: Option<&dyn SuccessModel>) -> SuccessScore {
    let Some(model) = model else {
        return SuccessScore::Unknown;
    };

    let row = align_features(&encode_features(record), model.feature_names());
    match model.predict(&[row]) {
        Ok(scores) => match scores.first() {
            Some(score) if score.is_finite() => SuccessScore::Score(*score),
            _ => SuccessScore::Unknown,
        },
        Err(e) => {
            log::warn!(
                "Scoring failed for {} x {}: {:#}",
                record.parent_a,
                record.parent_b,
                e
            );
            SuccessScore::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClimateSuitability, YieldLevel};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    /// Model whose predictions come from a fixed outcome.
    struct FixedModel {
        features: Vec<String>,
        outcome: Option<f64>,
    }

    impl SuccessModel for FixedModel {
        fn feature_names(&self) -> &[String] {
            &self.features
        }

        fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>> {
            match self.outcome {
                Some(value) => Ok(vec![value; rows.len()]),
                None => Err(anyhow!("estimator rejected input")),
            }
        }
    }

    #[test]
    fn test_align_zero_fills_drops_and_reorders() {
        let mut produced = HashMap::new();
        produced.insert("b".to_string(), 2.0);
        produced.insert("extra".to_string(), 9.0);
        produced.insert("a".to_string(), 1.0);

        let aligned = align_features(&produced, &names(&["a", "missing", "b"]));
        assert_eq!(aligned, vec![1.0, 0.0, 2.0]);
    }

    #[test]
    fn test_encode_features_uses_column_prefixes() {
        let record = HybridRecord::new(
            "A",
            "B",
            1,
            YieldLevel::VeryHigh,
            ClimateSuitability::Medium,
            "x",
        );
        let features = encode_features(&record);
        assert_eq!(features.len(), 2);
        assert_eq!(features.get("Expected Yield_Very High"), Some(&1.0));
        assert_eq!(features.get("Climate Suitability (Cyprus)_Medium"), Some(&1.0));
    }

    #[test]
    fn test_score_record_with_and_without_model() {
        let record = HybridRecord::new("A", "B", 1, YieldLevel::High, ClimateSuitability::High, "x");
        assert_eq!(score_record(&record, None), SuccessScore::Unknown);

        let model = LinearModel::new(
            names(&[
                "Climate Suitability (Cyprus)_High",
                "Expected Yield_Low",
                "Expected Yield_High",
            ]),
            vec![0.25, -1.0, 0.5],
            0.0,
        )
        .unwrap();
        assert_eq!(score_record(&record, Some(&model)), SuccessScore::Score(0.75));
    }

    #[test]
    fn test_mismatched_artifact_is_rejected() {
        assert!(LinearModel::new(names(&["a", "b"]), vec![1.0], 0.0).is_err());
    }

    #[test]
    fn test_missing_artifact_disables_scoring() {
        let model = load_model(Path::new("/nonexistent/hybrid_success_model.json"));
        assert!(model.is_none());
    }

    #[test]
    fn test_failed_or_non_finite_prediction_degrades_to_unknown() {
        let record = HybridRecord::new("A", "B", 1, YieldLevel::High, ClimateSuitability::High, "x");
        let features = names(&["Expected Yield_High"]);

        let failing = FixedModel { features: features.clone(), outcome: None };
        assert_eq!(score_record(&record, Some(&failing)), SuccessScore::Unknown);

        for value in [f64::NAN, f64::INFINITY] {
            let model = FixedModel { features: features.clone(), outcome: Some(value) };
            assert_eq!(score_record(&record, Some(&model)), SuccessScore::Unknown);
        }

        let healthy = FixedModel { features, outcome: Some(0.4) };
        assert_eq!(score_record(&record, Some(&healthy)), SuccessScore::Score(0.4));
    }
}
