use itertools::Itertools;
use std::cmp::Ordering;

use crate::model::{ClimateFilter, HybridRecord, SortField, ViewFilters, ViewParams};

/// Keep records whose parents or flavor contain `term`, ignoring case.
/// An empty term keeps everything.
pub fn matches_search(record: &HybridRecord, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    [&record.parent_a, &record.parent_b, &record.expected_flavor]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

pub fn matches_filters(record: &HybridRecord, filters: &ViewFilters) -> bool {
    let climate_ok = match &filters.climate {
        ClimateFilter::All => true,
        ClimateFilter::Only(climate) => &record.climate_suitability == climate,
    };
    climate_ok && record.expected_heat_shu >= filters.min_heat
}

/// Ascending comparison on a single column.
pub fn compare_by(field: SortField, a: &HybridRecord, b: &HybridRecord) -> Ordering {
    match field {
        SortField::ExpectedHeat => a.expected_heat_shu.cmp(&b.expected_heat_shu),
        SortField::ExpectedYield => a.expected_yield.cmp(&b.expected_yield),
        SortField::ClimateSuitability => a.climate_suitability.cmp(&b.climate_suitability),
        SortField::ParentA => a.parent_a.cmp(&b.parent_a),
        SortField::ParentB => a.parent_b.cmp(&b.parent_b),
        SortField::ExpectedFlavor => a.expected_flavor.cmp(&b.expected_flavor),
        SortField::AiSuccessScore => a.ai_success_score.cmp(&b.ai_success_score),
        SortField::Id => a.id.cmp(&b.id),
    }
}

/// Produce a view of the working set.
///
/// Stages run in a fixed order: search, climate filter, heat floor, then a
/// stable descending sort. Records that compare equal keep their input order.
/// The input slice is left untouched.
pub fn apply_view(
    records: &[HybridRecord],
    filters: &ViewFilters,
    search_term: &str,
    sort_field: SortField,
) -> Vec<HybridRecord> {
    records
        .iter()
        .filter(|record| matches_search(record, search_term))
        .filter(|record| matches_filters(record, filters))
        .cloned()
        // sorted_by is a stable sort; reversing the comparator keeps ties in order
        .sorted_by(|a, b| compare_by(sort_field, b, a))
        .collect()
}

/// Convenience wrapper taking validated query parameters.
pub fn apply_view_params(records: &[HybridRecord], params: &ViewParams) -> Vec<HybridRecord> {
    apply_view(records, &params.filters, &params.search, params.sort)
}
