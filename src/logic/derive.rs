use crate::error::HybridError;
use crate::logic::scoring::{score_record, SuccessModel};
use crate::model::{ClimateSuitability, DerivedHybrid, HybridRecord, SuccessScore, YieldLevel};

/// Find the record describing a parent.
///
/// Returns the first record, in input order, where the name appears as either
/// parent. A name listed in several records with different traits resolves to
/// whichever comes first; callers that need a different rule must reorder the
/// input.
pub fn find_parent<'a>(records: &'a [HybridRecord], name: &str) -> Option<&'a HybridRecord> {
    records.iter().find(|record| record.has_parent(name))
}

/// Compute the expected traits of crossing `parent_a_name` with `parent_b_name`.
///
/// The success score is left `Unknown`; use [`derive_and_score`] to attach one.
pub fn derive_hybrid(
    parent_a_name: &str,
    parent_b_name: &str,
    records: &[HybridRecord],
) -> Result<DerivedHybrid, HybridError> {
    let a = find_parent(records, parent_a_name)
        .ok_or_else(|| HybridError::ParentNotFound(parent_a_name.to_string()))?;
    let b = find_parent(records, parent_b_name)
        .ok_or_else(|| HybridError::ParentNotFound(parent_b_name.to_string()))?;

    // Average without overflowing on very large heat values
    let heat = a.expected_heat_shu / 2
        + b.expected_heat_shu / 2
        + (a.expected_heat_shu % 2 + b.expected_heat_shu % 2) / 2;

    let expected_yield =
        if a.expected_yield == YieldLevel::VeryHigh || b.expected_yield == YieldLevel::VeryHigh {
            YieldLevel::VeryHigh
        } else {
            YieldLevel::High
        };

    let climate_suitability = if a.climate_suitability == ClimateSuitability::High
        && b.climate_suitability == ClimateSuitability::High
    {
        ClimateSuitability::High
    } else {
        ClimateSuitability::Medium
    };

    Ok(DerivedHybrid {
        parent_a: parent_a_name.to_string(),
        parent_b: parent_b_name.to_string(),
        expected_heat_shu: heat,
        expected_yield,
        climate_suitability,
        expected_flavor: format!("{} + {}", a.expected_flavor, b.expected_flavor),
        ai_success_score: SuccessScore::Unknown,
    })
}

/// Derive a hybrid and score it with the model, if one is available.
pub fn derive_and_score(
    parent_a_name: &str,
    parent_b_name: &str,
    records: &[HybridRecord],
    model: Option<&dyn SuccessModel>,
) -> Result<DerivedHybrid, HybridError> {
    let mut derived = derive_hybrid(parent_a_name, parent_b_name, records)?;
    let candidate = derived.clone().into_record();
    derived.ai_success_score = score_record(&candidate, model);
    Ok(derived)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::scoring::LinearModel;

    fn record(
        a: &str,
        b: &str,
        heat: u64,
        yield_level: YieldLevel,
        climate: ClimateSuitability,
        flavor: &str,
    ) -> HybridRecord {
        HybridRecord::new(a, b, heat, yield_level, climate, flavor)
    }

    fn sample() -> Vec<HybridRecord> {
        vec![
            record("Carolina Reaper", "Habanero", 500_000, YieldLevel::High, ClimateSuitability::High, "Smoky"),
            record("Aji Lemon", "Scotch Bonnet", 300_000, YieldLevel::VeryHigh, ClimateSuitability::Medium, "Fruity"),
        ]
    }

    #[test]
    fn test_derivation_scenario() {
        let records = sample();
        let derived = derive_hybrid("Carolina Reaper", "Aji Lemon", &records).unwrap();

        assert_eq!(derived.expected_heat_shu, 400_000);
        assert_eq!(derived.expected_yield, YieldLevel::VeryHigh);
        assert_eq!(derived.climate_suitability, ClimateSuitability::Medium);
        assert_eq!(derived.expected_flavor, "Smoky + Fruity");
        assert!(derived.ai_success_score.is_unknown());
    }

    #[test]
    fn test_parent_matches_either_column() {
        let records = sample();
        // "Habanero" only appears as parent B of the first record
        let derived = derive_hybrid("Habanero", "Scotch Bonnet", &records).unwrap();
        assert_eq!(derived.expected_heat_shu, 400_000);
        assert_eq!(derived.expected_flavor, "Smoky + Fruity");
    }

    #[test]
    fn test_heat_mean_floors() {
        let records = vec![
            record("A", "X", 3, YieldLevel::Low, ClimateSuitability::Low, "a"),
            record("B", "Y", 4, YieldLevel::Low, ClimateSuitability::Low, "b"),
        ];
        let derived = derive_hybrid("A", "B", &records).unwrap();
        assert_eq!(derived.expected_heat_shu, 3);

        let records = vec![
            record("A", "X", u64::MAX, YieldLevel::Low, ClimateSuitability::Low, "a"),
            record("B", "Y", u64::MAX, YieldLevel::Low, ClimateSuitability::Low, "b"),
        ];
        let derived = derive_hybrid("A", "B", &records).unwrap();
        assert_eq!(derived.expected_heat_shu, u64::MAX);
    }

    #[test]
    fn test_yield_and_climate_policies_are_two_branch() {
        let records = vec![
            record("A", "X", 10, YieldLevel::Low, ClimateSuitability::High, "a"),
            record("B", "Y", 10, YieldLevel::Low, ClimateSuitability::High, "b"),
            record("C", "Z", 10, YieldLevel::Medium, ClimateSuitability::Low, "c"),
        ];
        let both_high = derive_hybrid("A", "B", &records).unwrap();
        assert_eq!(both_high.expected_yield, YieldLevel::High);
        assert_eq!(both_high.climate_suitability, ClimateSuitability::High);

        let one_low = derive_hybrid("A", "C", &records).unwrap();
        assert_eq!(one_low.climate_suitability, ClimateSuitability::Medium);
    }

    #[test]
    fn test_first_match_wins() {
        let records = vec![
            record("Ghost", "X", 1_000_000, YieldLevel::Low, ClimateSuitability::Low, "first"),
            record("Y", "Ghost", 10, YieldLevel::VeryHigh, ClimateSuitability::High, "second"),
            record("Bell", "Z", 0, YieldLevel::Low, ClimateSuitability::Low, "sweet"),
        ];
        let derived = derive_hybrid("Ghost", "Bell", &records).unwrap();
        assert_eq!(derived.expected_flavor, "first + sweet");
    }

    #[test]
    fn test_missing_parent_is_reported() {
        let records = sample();
        let err = derive_hybrid("Carolina Reaper", "Bhut Jolokia", &records).unwrap_err();
        assert!(matches!(err, HybridError::ParentNotFound(name) if name == "Bhut Jolokia"));

        let err = derive_hybrid("Nope", "Bhut Jolokia", &[]).unwrap_err();
        assert!(matches!(err, HybridError::ParentNotFound(name) if name == "Nope"));
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let records = sample();
        let first = derive_hybrid("Carolina Reaper", "Aji Lemon", &records).unwrap();
        let second = derive_hybrid("Carolina Reaper", "Aji Lemon", &records).unwrap();
        assert_eq!(first, second);
        assert_eq!(records, sample());
    }

    #[test]
    fn test_derive_and_score_uses_model() {
        let records = sample();
        let model = LinearModel::new(
            vec!["Expected Yield_Very High".to_string()],
            vec![0.5],
            0.25,
        )
        .unwrap();

        let derived =
            derive_and_score("Carolina Reaper", "Aji Lemon", &records, Some(&model)).unwrap();
        assert_eq!(derived.ai_success_score, SuccessScore::Score(0.75));

        let derived = derive_and_score("Carolina Reaper", "Aji Lemon", &records, None).unwrap();
        assert!(derived.ai_success_score.is_unknown());
    }
}
