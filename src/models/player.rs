//! Player records and the immutable loaded dataset.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Field, Schema};

/// One row of the source: a player and the counters tracked for them.
///
/// A field that is absent here is "not tracked" for this player, either
/// because the column does not exist or because the cell was empty. It is
/// never silently treated as zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerRecord {
    /// Player identifier (unique within a dataset)
    pub player: String,

    /// Non-negative counter values keyed by canonical field
    pub values: BTreeMap<Field, f64>,
}

impl PlayerRecord {
    pub fn new(player: impl Into<String>) -> Self {
        Self {
            player: player.into(),
            values: BTreeMap::new(),
        }
    }

    /// Builder-style setter, mostly for fixtures.
    pub fn with(mut self, field: Field, value: f64) -> Self {
        self.values.insert(field, value);
        self
    }

    pub fn get(&self, field: Field) -> Option<f64> {
        self.values.get(&field).copied()
    }
}

/// The full record set, loaded once and never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct Dataset {
    records: Vec<PlayerRecord>,
    schema: Schema,
    source: Option<PathBuf>,
    loaded_at: DateTime<Utc>,
}

impl Dataset {
    pub fn new(records: Vec<PlayerRecord>, schema: Schema) -> Self {
        Self {
            records,
            schema,
            source: None,
            loaded_at: Utc::now(),
        }
    }

    /// Record the file this dataset came from.
    pub fn with_source(mut self, source: PathBuf) -> Self {
        self.source = Some(source);
        self
    }

    /// Records in input order.
    pub fn records(&self) -> &[PlayerRecord] {
        &self.records
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn source(&self) -> Option<&PathBuf> {
        self.source.as_ref()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Find a player by identifier.
    pub fn get_player(&self, player: &str) -> Option<&PlayerRecord> {
        self.records.iter().find(|r| r.player == player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Counter, Mode};

    const SOLO_KILLS: Field = Field::new(Mode::Solo, Counter::Kills);

    #[test]
    fn test_record_get() {
        let record = PlayerRecord::new("Ninja").with(SOLO_KILLS, 42.0);
        assert_eq!(record.get(SOLO_KILLS), Some(42.0));
        assert_eq!(record.get(Field::new(Mode::Duo, Counter::Kills)), None);
    }

    #[test]
    fn test_dataset_lookup() {
        let dataset = Dataset::new(
            vec![PlayerRecord::new("A"), PlayerRecord::new("B")],
            Schema::default(),
        );
        assert_eq!(dataset.len(), 2);
        assert!(dataset.get_player("B").is_some());
        assert!(dataset.get_player("C").is_none());
        assert!(dataset.source().is_none());
    }

    #[test]
    fn test_record_serialization_uses_header_keys() {
        let record = PlayerRecord::new("A").with(SOLO_KILLS, 3.0);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["player"], "A");
        assert_eq!(json["values"]["Solo kills"], 3.0);
    }
}
