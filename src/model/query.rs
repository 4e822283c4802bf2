use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::HybridError;
use crate::model::{ClimateSuitability, YieldLevel};

/// Climate selection; `All` disables the filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ClimateFilter {
    #[default]
    All,
    Only(ClimateSuitability),
}

impl FromStr for ClimateFilter {
    type Err = HybridError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "" | "All" | "all" => Ok(Self::All),
            other => match ClimateSuitability::parse(other) {
                ClimateSuitability::Other(_) => Err(HybridError::InvalidQuery(format!(
                    "unknown climate selection '{}'",
                    other
                ))),
                known => Ok(Self::Only(known)),
            },
        }
    }
}

/// Columns a view can be sorted by (always descending).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    ExpectedHeat,
    ExpectedYield,
    ClimateSuitability,
    ParentA,
    ParentB,
    ExpectedFlavor,
    AiSuccessScore,
    Id,
}

impl FromStr for SortField {
    type Err = HybridError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "" | "expected_heat" | "Expected Heat (SHU)" => Ok(Self::ExpectedHeat),
            "expected_yield" | "Expected Yield" => Ok(Self::ExpectedYield),
            "climate_suitability" | "Climate Suitability (Cyprus)" => Ok(Self::ClimateSuitability),
            "parent_a" | "Parent A" => Ok(Self::ParentA),
            "parent_b" | "Parent B" => Ok(Self::ParentB),
            "expected_flavor" | "Expected Flavor" => Ok(Self::ExpectedFlavor),
            "ai_success_score" | "AI Success Score" => Ok(Self::AiSuccessScore),
            "id" | "ID" => Ok(Self::Id),
            other => Err(HybridError::InvalidQuery(format!(
                "unknown sort field '{}'",
                other
            ))),
        }
    }
}

/// Predicate filters applied after search.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewFilters {
    pub climate: ClimateFilter,
    pub min_heat: u64,
}

/// Raw query string accepted by the view and export endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewQuery {
    pub search: Option<String>,
    pub climate: Option<String>,
    pub min_heat: Option<String>,
    pub sort: Option<String>,
}

/// Validated view parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewParams {
    pub filters: ViewFilters,
    pub search: String,
    pub sort: SortField,
}

impl ViewQuery {
    /// Validate the raw query; `max_min_heat` is the upper bound of the heat slider.
    pub fn into_params(self, max_min_heat: u64) -> Result<ViewParams, HybridError> {
        let min_heat = match self.min_heat.as_deref().map(str::trim) {
            None | Some("") => 0,
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                HybridError::InvalidQuery(format!(
                    "min_heat '{}' is not a non-negative integer",
                    raw
                ))
            })?,
        };
        if min_heat > max_min_heat {
            return Err(HybridError::InvalidQuery(format!(
                "min_heat {} exceeds maximum {}",
                min_heat, max_min_heat
            )));
        }

        let climate = match self.climate.as_deref() {
            Some(raw) => raw.parse()?,
            None => ClimateFilter::All,
        };
        let sort = match self.sort.as_deref() {
            Some(raw) => raw.parse()?,
            None => SortField::default(),
        };

        Ok(ViewParams {
            filters: ViewFilters { climate, min_heat },
            search: self.search.unwrap_or_default(),
            sort,
        })
    }
}

/// Request body naming two parents to cross.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeriveRequest {
    pub parent_a: String,
    pub parent_b: String,
}

/// Request body for inserting a single record into the persisted table.
///
/// When `expected_heat_shu` and the trait fields are omitted the record is
/// derived from the two parents in the current table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewHybrid {
    pub parent_a: String,
    pub parent_b: String,
    #[serde(default)]
    pub expected_heat_shu: Option<u64>,
    #[serde(default)]
    pub expected_yield: Option<YieldLevel>,
    #[serde(default)]
    pub climate_suitability: Option<ClimateSuitability>,
    #[serde(default)]
    pub expected_flavor: Option<String>,
}
