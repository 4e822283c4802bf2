use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::HashMap;
use std::io::Read;
use std::str::FromStr;

use crate::error::HybridError;
use crate::model::{ClimateSuitability, HybridRecord, SuccessScore, YieldLevel};
use crate::table::columns;

/// Header name to column position.
struct HeaderMap {
    positions: HashMap<String, usize>,
}

impl HeaderMap {
    fn new(headers: &StringRecord) -> Self {
        let positions = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim().to_string(), i))
            .collect();
        Self { positions }
    }

    fn require(&self, name: &str) -> Result<usize, HybridError> {
        self.positions
            .get(name)
            .copied()
            .ok_or_else(|| HybridError::MissingColumn(name.to_string()))
    }

    fn optional(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }
}

struct RequiredColumns {
    parent_a: usize,
    parent_b: usize,
    heat: usize,
    yield_level: usize,
    climate: usize,
    flavor: usize,
}

struct OptionalColumns {
    id: Option<usize>,
    novelty: Option<usize>,
    predicted_flavor: Option<usize>,
    days: Option<usize>,
    score: Option<usize>,
}

/// Parse an uploaded CSV table into records.
///
/// The six required columns must be present by header name; a missing one is
/// reported before any row is read. `ID` and the derived columns are picked
/// up when present so an exported view can be loaded again.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<HybridRecord>, HybridError> {
    let mut reader = ReaderBuilder::new().trim(Trim::Headers).from_reader(reader);

    let headers = reader.headers().map_err(|e| HybridError::InvalidRow {
        row: 0,
        message: e.to_string(),
    })?;
    let header_map = HeaderMap::new(headers);

    let required = RequiredColumns {
        parent_a: header_map.require(columns::PARENT_A)?,
        parent_b: header_map.require(columns::PARENT_B)?,
        heat: header_map.require(columns::EXPECTED_HEAT)?,
        yield_level: header_map.require(columns::EXPECTED_YIELD)?,
        climate: header_map.require(columns::CLIMATE_SUITABILITY)?,
        flavor: header_map.require(columns::EXPECTED_FLAVOR)?,
    };
    let optional = OptionalColumns {
        id: header_map.optional(columns::ID),
        novelty: header_map.optional(columns::NOVELTY_FLAG),
        predicted_flavor: header_map.optional(columns::PREDICTED_FLAVOR),
        days: header_map.optional(columns::ESTIMATED_DAYS_TO_HARVEST),
        score: header_map.optional(columns::AI_SUCCESS_SCORE),
    };

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        // Row 1 is the first data row after the header
        let row_number = index + 1;
        let row = row.map_err(|e| HybridError::InvalidRow {
            row: row_number,
            message: e.to_string(),
        })?;
        records.push(parse_row(&row, row_number, &required, &optional)?);
    }

    log::debug!("Parsed {} hybrid records from upload", records.len());
    Ok(records)
}

fn parse_row(
    row: &StringRecord,
    row_number: usize,
    required: &RequiredColumns,
    optional: &OptionalColumns,
) -> Result<HybridRecord, HybridError> {
    let cell = |position: usize| row.get(position).unwrap_or("");
    let optional_cell = |position: Option<usize>| {
        position
            .map(|p| cell(p))
            .filter(|value| !value.trim().is_empty())
    };

    let mut record = HybridRecord::new(
        cell(required.parent_a),
        cell(required.parent_b),
        parse_number(cell(required.heat), columns::EXPECTED_HEAT, row_number)?,
        YieldLevel::parse(cell(required.yield_level)),
        ClimateSuitability::parse(cell(required.climate)),
        cell(required.flavor),
    );

    record.id = optional_cell(optional.id)
        .map(|value| parse_number(value, columns::ID, row_number))
        .transpose()?;
    record.novelty_flag = optional_cell(optional.novelty).map(str::to_string);
    record.predicted_flavor = optional_cell(optional.predicted_flavor).map(str::to_string);
    record.estimated_days_to_harvest = optional_cell(optional.days)
        .map(|value| parse_number(value, columns::ESTIMATED_DAYS_TO_HARVEST, row_number))
        .transpose()?;
    record.ai_success_score = optional_cell(optional.score).map(SuccessScore::parse);

    Ok(record)
}

fn parse_number<T: FromStr>(value: &str, column: &str, row: usize) -> Result<T, HybridError> {
    value.trim().parse().map_err(|_| HybridError::InvalidRow {
        row,
        message: format!("'{}' is not a valid non-negative integer for '{}'", value, column),
    })
}
