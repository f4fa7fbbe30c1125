//! CSV loading.
//!
//! Headers are resolved through the alias table in [`Field::from_header`],
//! so `"Duos kills"` and `"Duo kills"` land in the same canonical column.
//! Columns that are not per-mode counters (ratios, percentages) are ignored.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info, warn};

use super::LoadOptions;
use crate::error::{Result, StatsError};
use crate::models::{Dataset, Field, PlayerRecord, Schema};

/// Header spellings accepted for the player identifier column.
const PLAYER_HEADERS: &[&str] = &["player", "players", "name", "player_name", "id", "player_id"];

/// Where each canonical column lives in the source file.
#[derive(Debug)]
struct ColumnLayout {
    player: usize,
    fields: Vec<(usize, Field)>,
}

impl ColumnLayout {
    fn resolve(headers: &StringRecord) -> Result<Self> {
        let mut player = None;
        let mut fields: Vec<(usize, Field)> = Vec::new();

        for (idx, header) in headers.iter().enumerate() {
            let lowered = header.trim().to_ascii_lowercase();
            if player.is_none() && PLAYER_HEADERS.contains(&lowered.as_str()) {
                player = Some(idx);
                continue;
            }

            match Field::from_header(header) {
                Some(field) if fields.iter().any(|(_, f)| *f == field) => {
                    warn!(
                        "Column '{}' duplicates {} after alias resolution, ignoring",
                        header, field
                    );
                }
                Some(field) => fields.push((idx, field)),
                None => debug!("Ignoring column '{}'", header),
            }
        }

        let player = player.ok_or_else(|| {
            StatsError::DataSource(format!(
                "no player identifier column (expected one of: {})",
                PLAYER_HEADERS.join(", ")
            ))
        })?;

        Ok(Self { player, fields })
    }

    fn schema(&self) -> Schema {
        Schema::new(self.fields.iter().map(|(_, f)| *f))
    }
}

/// Parse one counter cell. Empty cells are "not tracked" for that player.
fn parse_cell(cell: &str) -> std::result::Result<Option<f64>, String> {
    if cell.is_empty() {
        return Ok(None);
    }
    let value: f64 = cell
        .parse()
        .map_err(|_| format!("'{}' is not a number", cell))?;
    if !value.is_finite() {
        return Err(format!("'{}' is not a finite number", cell));
    }
    if value < 0.0 {
        return Err(format!("'{}' is negative", cell));
    }
    Ok(Some(value))
}

/// Load a dataset from a CSV file.
pub fn load(path: &Path, options: &LoadOptions) -> Result<Dataset> {
    let file = File::open(path).map_err(|e| {
        StatsError::DataSource(format!("cannot open '{}': {}", path.display(), e))
    })?;

    let dataset = load_from_reader(file, options)?.with_source(path.to_path_buf());
    info!(
        "Loaded {} players with {} counter columns from {}",
        dataset.len(),
        dataset.schema().len(),
        path.display()
    );
    Ok(dataset)
}

/// Load a dataset from any CSV byte stream, preserving row order.
pub fn load_from_reader<R: Read>(reader: R, options: &LoadOptions) -> Result<Dataset> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = reader.headers()?.clone();
    let layout = ColumnLayout::resolve(&headers)?;
    let schema = layout.schema();

    for required in &options.required {
        if !schema.contains(*required) {
            return Err(StatsError::DataSource(format!(
                "required column '{}' not found",
                required
            )));
        }
    }

    let mut records = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for (row_idx, row) in reader.records().enumerate() {
        let row = row?;
        // Header occupies line 1
        let line = row_idx + 2;

        let player = row.get(layout.player).unwrap_or_default();
        if player.is_empty() {
            return Err(StatsError::DataSource(format!(
                "line {}: empty player identifier",
                line
            )));
        }
        if !seen.insert(player.to_string()) {
            return Err(StatsError::DataSource(format!(
                "line {}: duplicate player '{}'",
                line, player
            )));
        }

        let mut record = PlayerRecord::new(player);
        for (idx, field) in &layout.fields {
            let cell = row.get(*idx).unwrap_or_default();
            let value = parse_cell(cell).map_err(|reason| {
                StatsError::DataSource(format!("line {}, column '{}': {}", line, field, reason))
            })?;
            if let Some(value) = value {
                record.values.insert(*field, value);
            }
        }
        records.push(record);
    }

    Ok(Dataset::new(records, schema))
}
