use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// Expected yield of a cross. Values outside the known levels are kept
/// verbatim in `Other` and pass through filtering untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum YieldLevel {
    Low,
    Medium,
    High,
    VeryHigh,
    Other(String),
}

impl YieldLevel {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "Low" => Self::Low,
            "Medium" => Self::Medium,
            "High" => Self::High,
            "Very High" | "VeryHigh" => Self::VeryHigh,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::VeryHigh => "Very High",
            Self::Other(value) => value,
        }
    }

    /// Rank used for sorting; unrecognized values sit below `Low`.
    fn rank(&self) -> u8 {
        match self {
            Self::Other(_) => 0,
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
            Self::VeryHigh => 4,
        }
    }
}

impl Ord for YieldLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank()
            .cmp(&other.rank())
            .then_with(|| self.as_str().cmp(other.as_str()))
    }
}

impl PartialOrd for YieldLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Suitability of a cross for the Cyprus climate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClimateSuitability {
    Low,
    Medium,
    High,
    Other(String),
}

impl ClimateSuitability {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "Low" => Self::Low,
            "Medium" => Self::Medium,
            "High" => Self::High,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Other(value) => value,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Other(_) => 0,
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }
}

impl Ord for ClimateSuitability {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank()
            .cmp(&other.rank())
            .then_with(|| self.as_str().cmp(other.as_str()))
    }
}

impl PartialOrd for ClimateSuitability {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

macro_rules! string_serde {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Ok(Self::parse(&raw))
            }
        }
    };
}

string_serde!(YieldLevel);
string_serde!(ClimateSuitability);

/// Model-predicted success score, or `Unknown` when no model is loaded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SuccessScore {
    Score(f64),
    Unknown,
}

impl SuccessScore {
    pub const UNKNOWN: &'static str = "Unknown";

    /// Parse the stored text form: a number, or anything else as `Unknown`.
    pub fn parse(value: &str) -> Self {
        match value.trim().parse::<f64>() {
            Ok(score) if score.is_finite() => Self::Score(score),
            _ => Self::Unknown,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl fmt::Display for SuccessScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Score(score) => write!(f, "{}", score),
            Self::Unknown => f.write_str(Self::UNKNOWN),
        }
    }
}

impl Ord for SuccessScore {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Score(a), Self::Score(b)) => a.total_cmp(b),
            (Self::Score(_), Self::Unknown) => Ordering::Greater,
            (Self::Unknown, Self::Score(_)) => Ordering::Less,
            (Self::Unknown, Self::Unknown) => Ordering::Equal,
        }
    }
}

impl PartialOrd for SuccessScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Eq for SuccessScore {}

impl Serialize for SuccessScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Score(score) => serializer.serialize_f64(*score),
            Self::Unknown => serializer.serialize_str(Self::UNKNOWN),
        }
    }
}

impl<'de> Deserialize<'de> for SuccessScore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(score) => Self::Score(score),
            Raw::Text(text) => Self::parse(&text),
        })
    }
}

/// One row of the working set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub parent_a: String,
    pub parent_b: String,
    pub expected_heat_shu: u64,
    pub expected_yield: YieldLevel,
    pub climate_suitability: ClimateSuitability,
    pub expected_flavor: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub novelty_flag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted_flavor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_days_to_harvest: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_success_score: Option<SuccessScore>,
}

impl HybridRecord {
    pub fn new(
        parent_a: impl Into<String>,
        parent_b: impl Into<String>,
        expected_heat_shu: u64,
        expected_yield: YieldLevel,
        climate_suitability: ClimateSuitability,
        expected_flavor: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            parent_a: parent_a.into(),
            parent_b: parent_b.into(),
            expected_heat_shu,
            expected_yield,
            climate_suitability,
            expected_flavor: expected_flavor.into(),
            novelty_flag: None,
            predicted_flavor: None,
            estimated_days_to_harvest: None,
            ai_success_score: None,
        }
    }

    /// True when either parent column equals `name` exactly.
    pub fn has_parent(&self, name: &str) -> bool {
        self.parent_a == name || self.parent_b == name
    }

    pub fn heat_band(&self) -> HeatBand {
        HeatBand::classify(self.expected_heat_shu)
    }
}

/// Display color band for a heat level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeatBand {
    Red,
    Orange,
    Yellow,
}

impl HeatBand {
    pub const RED_THRESHOLD: u64 = 1_000_000;
    pub const ORANGE_THRESHOLD: u64 = 500_000;

    pub fn classify(heat_shu: u64) -> Self {
        if heat_shu >= Self::RED_THRESHOLD {
            Self::Red
        } else if heat_shu >= Self::ORANGE_THRESHOLD {
            Self::Orange
        } else {
            Self::Yellow
        }
    }
}

/// Expected traits of a cross between two parents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedHybrid {
    pub parent_a: String,
    pub parent_b: String,
    pub expected_heat_shu: u64,
    pub expected_yield: YieldLevel,
    pub climate_suitability: ClimateSuitability,
    pub expected_flavor: String,
    pub ai_success_score: SuccessScore,
}

impl DerivedHybrid {
    /// Convert into a record suitable for insertion into the persisted table.
    pub fn into_record(self) -> HybridRecord {
        HybridRecord {
            ai_success_score: Some(self.ai_success_score),
            ..HybridRecord::new(
                self.parent_a,
                self.parent_b,
                self.expected_heat_shu,
                self.expected_yield,
                self.climate_suitability,
                self.expected_flavor,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yield_parse_and_display() {
        assert_eq!(YieldLevel::parse("Very High"), YieldLevel::VeryHigh);
        assert_eq!(YieldLevel::parse("VeryHigh"), YieldLevel::VeryHigh);
        assert_eq!(YieldLevel::VeryHigh.to_string(), "Very High");
        assert_eq!(
            YieldLevel::parse("Enormous"),
            YieldLevel::Other("Enormous".to_string())
        );
    }

    #[test]
    fn test_unrecognized_levels_rank_lowest() {
        let other = ClimateSuitability::Other("Arid".to_string());
        assert!(other < ClimateSuitability::Low);
        assert!(YieldLevel::Other("?".to_string()) < YieldLevel::Low);
        assert!(YieldLevel::VeryHigh > YieldLevel::High);
    }

    #[test]
    fn test_success_score_serde() {
        let json = serde_json::to_value(SuccessScore::Unknown).unwrap();
        assert_eq!(json, serde_json::json!("Unknown"));

        let json = serde_json::to_value(SuccessScore::Score(0.75)).unwrap();
        assert_eq!(json, serde_json::json!(0.75));

        let parsed: SuccessScore = serde_json::from_value(serde_json::json!("0.5")).unwrap();
        assert_eq!(parsed, SuccessScore::Score(0.5));
        let parsed: SuccessScore = serde_json::from_value(serde_json::json!("Unknown")).unwrap();
        assert!(parsed.is_unknown());
    }

    #[test]
    fn test_unknown_score_sorts_below_numbers() {
        assert!(SuccessScore::Unknown < SuccessScore::Score(-1.0));
        assert!(SuccessScore::Score(0.2) < SuccessScore::Score(0.9));
    }

    #[test]
    fn test_heat_band_thresholds() {
        assert_eq!(HeatBand::classify(1_000_000), HeatBand::Red);
        assert_eq!(HeatBand::classify(999_999), HeatBand::Orange);
        assert_eq!(HeatBand::classify(500_000), HeatBand::Orange);
        assert_eq!(HeatBand::classify(499_999), HeatBand::Yellow);
        assert_eq!(HeatBand::classify(0), HeatBand::Yellow);
    }
}
