//! Column headers of the tabular import/export format.

pub const ID: &str = "ID";
pub const PARENT_A: &str = "Parent A";
pub const PARENT_B: &str = "Parent B";
pub const EXPECTED_HEAT: &str = "Expected Heat (SHU)";
pub const EXPECTED_YIELD: &str = "Expected Yield";
pub const CLIMATE_SUITABILITY: &str = "Climate Suitability (Cyprus)";
pub const EXPECTED_FLAVOR: &str = "Expected Flavor";

pub const NOVELTY_FLAG: &str = "Novelty Flag";
pub const PREDICTED_FLAVOR: &str = "Predicted Flavor";
pub const ESTIMATED_DAYS_TO_HARVEST: &str = "Estimated Days to Harvest";
pub const AI_SUCCESS_SCORE: &str = "AI Success Score";

/// Columns every uploaded table must carry.
pub const REQUIRED: [&str; 6] = [
    PARENT_A,
    PARENT_B,
    EXPECTED_HEAT,
    EXPECTED_YIELD,
    CLIMATE_SUITABILITY,
    EXPECTED_FLAVOR,
];

/// Derived columns, in export order.
pub const DERIVED: [&str; 4] = [
    NOVELTY_FLAG,
    PREDICTED_FLAVOR,
    ESTIMATED_DAYS_TO_HARVEST,
    AI_SUCCESS_SCORE,
];

pub const CSV_CONTENT_TYPE: &str = "text/csv";
pub const FILTERED_EXPORT_NAME: &str = "filtered_hybrids.csv";
pub const FULL_EXPORT_NAME: &str = "all_hybrids.csv";
