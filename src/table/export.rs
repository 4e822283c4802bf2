use anyhow::{Context, Result};
use csv::Writer;

use crate::model::HybridRecord;
use crate::table::columns;

/// Optional columns carried by at least one record of a view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct PresentColumns {
    id: bool,
    novelty: bool,
    predicted_flavor: bool,
    days: bool,
    score: bool,
}

impl PresentColumns {
    fn scan(records: &[HybridRecord]) -> Self {
        records.iter().fold(Self::default(), |present, r| Self {
            id: present.id || r.id.is_some(),
            novelty: present.novelty || r.novelty_flag.is_some(),
            predicted_flavor: present.predicted_flavor || r.predicted_flavor.is_some(),
            days: present.days || r.estimated_days_to_harvest.is_some(),
            score: present.score || r.ai_success_score.is_some(),
        })
    }

    fn header(&self) -> Vec<&'static str> {
        let mut header = Vec::with_capacity(11);
        if self.id {
            header.push(columns::ID);
        }
        header.extend(columns::REQUIRED);
        let derived = [self.novelty, self.predicted_flavor, self.days, self.score];
        header.extend(
            columns::DERIVED
                .iter()
                .zip(derived)
                .filter(|(_, present)| *present)
                .map(|(name, _)| *name),
        );
        header
    }

    fn row(&self, record: &HybridRecord) -> Vec<String> {
        let mut row = Vec::with_capacity(11);
        if self.id {
            row.push(record.id.map(|id| id.to_string()).unwrap_or_default());
        }
        row.push(record.parent_a.clone());
        row.push(record.parent_b.clone());
        row.push(record.expected_heat_shu.to_string());
        row.push(record.expected_yield.to_string());
        row.push(record.climate_suitability.to_string());
        row.push(record.expected_flavor.clone());
        if self.novelty {
            row.push(record.novelty_flag.clone().unwrap_or_default());
        }
        if self.predicted_flavor {
            row.push(record.predicted_flavor.clone().unwrap_or_default());
        }
        if self.days {
            row.push(
                record
                    .estimated_days_to_harvest
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
            );
        }
        if self.score {
            row.push(
                record
                    .ai_success_score
                    .map(|s| s.to_string())
                    .unwrap_or_default(),
            );
        }
        row
    }
}

/// Serialize a view to CSV bytes, in view order.
///
/// Values are written as displayed, including placeholder columns. A view
/// with no records produces a header-only document.
pub fn export_view(records: &[HybridRecord]) -> Result<Vec<u8>> {
    let present = PresentColumns::scan(records);
    let mut writer = Writer::from_writer(Vec::new());

    writer
        .write_record(present.header())
        .context("Failed to write CSV header")?;
    for record in records {
        writer
            .write_record(present.row(record))
            .context("Failed to write CSV row")?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV export: {}", e.error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::{apply_view, enrich_records};
    use crate::model::{ClimateSuitability, SortField, SuccessScore, ViewFilters, YieldLevel};
    use crate::table::read_records;

    fn records() -> Vec<HybridRecord> {
        vec![
            HybridRecord::new("Carolina Reaper", "Habanero", 1_200_000, YieldLevel::High, ClimateSuitability::High, "Smoky"),
            HybridRecord::new("Aji Lemon", "Scotch Bonnet", 300_000, YieldLevel::VeryHigh, ClimateSuitability::Medium, "Citrus, \"bright\""),
            HybridRecord::new("Bell", "Pimiento", 0, YieldLevel::Other("Huge".to_string()), ClimateSuitability::Low, "Sweet"),
        ]
    }

    #[test]
    fn test_empty_view_is_header_only() {
        let bytes = export_view(&[]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "Parent A,Parent B,Expected Heat (SHU),Expected Yield,Climate Suitability (Cyprus),Expected Flavor\n"
        );
    }

    #[test]
    fn test_derived_columns_follow_base_columns() {
        let mut records = records();
        enrich_records(&mut records, None);
        records[0].id = Some(7);

        let text = String::from_utf8(export_view(&records).unwrap()).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(
            header,
            "ID,Parent A,Parent B,Expected Heat (SHU),Expected Yield,Climate Suitability (Cyprus),Expected Flavor,Novelty Flag,Predicted Flavor,Estimated Days to Harvest,AI Success Score"
        );
        assert!(text.contains("7,Carolina Reaper,Habanero,1200000,High,High,Smoky,Likely Novel,Complex & Fruity,90,Unknown"));
    }

    #[test]
    fn test_export_round_trips_through_import() {
        let mut records = records();
        enrich_records(&mut records, None);
        records[1].ai_success_score = Some(SuccessScore::Score(0.8125));

        let view = apply_view(&records, &ViewFilters::default(), "", SortField::ExpectedHeat);
        let bytes = export_view(&view).unwrap();
        let reloaded = read_records(bytes.as_slice()).unwrap();

        assert_eq!(reloaded, view);
    }

    #[test]
    fn test_padded_text_survives_round_trip() {
        let records = vec![HybridRecord::new(
            " Reaper",
            "Habanero ",
            1_000_000,
            YieldLevel::High,
            ClimateSuitability::Medium,
            "  Smoky  ",
        )];

        let reloaded = read_records(export_view(&records).unwrap().as_slice()).unwrap();
        assert_eq!(reloaded, records);
        assert_eq!(reloaded[0].parent_a, " Reaper");
    }
}
