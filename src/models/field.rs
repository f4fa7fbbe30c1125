//! Column identity: game modes, counters and the canonical alias table.
//!
//! Source files disagree on naming ("Duo" vs "Duos", "Trio" vs "Trios"),
//! so every header is resolved to a canonical [`Field`] at the load
//! boundary and nothing downstream sees the raw spelling.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StatsError;

/// A game sub-format that partitions the per-player counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Solo,
    Duo,
    Trio,
    Squad,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Solo, Mode::Duo, Mode::Trio, Mode::Squad];

    /// Resolve a mode spelling from any observed source variant.
    pub fn from_alias(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "solo" | "solos" => Some(Mode::Solo),
            "duo" | "duos" => Some(Mode::Duo),
            "trio" | "trios" => Some(Mode::Trio),
            "squad" | "squads" => Some(Mode::Squad),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Solo => "Solo",
            Mode::Duo => "Duo",
            Mode::Trio => "Trio",
            Mode::Squad => "Squad",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::from_alias(s)
            .ok_or_else(|| StatsError::invalid_parameter("mode", format!("unknown mode '{}'", s)))
    }
}

/// Parse a comma-separated mode list such as `"solo,duos,squad"`.
pub fn parse_modes(s: &str) -> Result<Vec<Mode>, StatsError> {
    let mut modes = Vec::new();
    for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let mode: Mode = part.parse()?;
        if !modes.contains(&mode) {
            modes.push(mode);
        }
    }
    Ok(modes)
}

/// A numeric per-mode counter tracked for each player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Counter {
    MinutesPlayed,
    Top1,
    Kills,
    Matches,
    Score,
}

impl Counter {
    pub const ALL: [Counter; 5] = [
        Counter::MinutesPlayed,
        Counter::Top1,
        Counter::Kills,
        Counter::Matches,
        Counter::Score,
    ];

    pub fn from_alias(s: &str) -> Option<Self> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "minutesplayed" | "minutes" => Some(Counter::MinutesPlayed),
            "top1" | "wins" => Some(Counter::Top1),
            "kills" => Some(Counter::Kills),
            "matches" | "matchesplayed" => Some(Counter::Matches),
            "score" => Some(Counter::Score),
            _ => None,
        }
    }

    /// Header spelling used by the source exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Counter::MinutesPlayed => "minutesPlayed",
            Counter::Top1 => "top1",
            Counter::Kills => "kills",
            Counter::Matches => "matches",
            Counter::Score => "score",
        }
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Counter {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Counter::from_alias(s).ok_or_else(|| {
            StatsError::invalid_parameter("counter", format!("unknown counter '{}'", s))
        })
    }
}

/// One column: a counter within a mode, e.g. `Solo minutesPlayed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Field {
    pub mode: Mode,
    pub counter: Counter,
}

impl Field {
    pub const fn new(mode: Mode, counter: Counter) -> Self {
        Self { mode, counter }
    }

    /// Resolve a source header (`"Duos kills"`, `"solo_minutes_played"`)
    /// to its canonical field. Returns `None` for headers that are not
    /// per-mode counters.
    pub fn from_header(header: &str) -> Option<Self> {
        let header = header.trim();
        let split = header.find(|c: char| matches!(c, ' ' | '_' | '-'))?;
        let (mode, counter) = header.split_at(split);
        Some(Field {
            mode: Mode::from_alias(mode)?,
            counter: Counter::from_alias(&counter[1..])?,
        })
    }
}

impl Default for Field {
    /// Minutes played in solo, the ranking key every dashboard uses.
    fn default() -> Self {
        Field::new(Mode::Solo, Counter::MinutesPlayed)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.mode, self.counter)
    }
}

impl FromStr for Field {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::from_header(s).ok_or_else(|| {
            StatsError::invalid_parameter("sort_key", format!("unrecognized field '{}'", s))
        })
    }
}

impl From<Field> for String {
    fn from(field: Field) -> Self {
        field.to_string()
    }
}

impl TryFrom<String> for Field {
    type Error = StatsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// The set of fields whose columns exist in a data source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    fields: BTreeSet<Field>,
}

impl Schema {
    pub fn new(fields: impl IntoIterator<Item = Field>) -> Self {
        Self {
            fields: fields.into_iter().collect(),
        }
    }

    pub fn contains(&self, field: Field) -> bool {
        self.fields.contains(&field)
    }

    /// Fail with a named error if `field` is not backed by a column.
    pub fn require(&self, field: Field) -> Result<(), StatsError> {
        if self.contains(field) {
            Ok(())
        } else {
            Err(StatsError::missing(field))
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.fields.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
