//! Data source access.
//!
//! The record set is read once per session from a CSV export and held
//! in memory as an immutable [`Dataset`](crate::models::Dataset).

mod loader;

pub use loader::{load, load_from_reader};

use crate::models::{Counter, Field, Mode};

/// Options applied while loading a data source.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOptions {
    /// Columns that must exist for the load to succeed
    pub required: Vec<Field>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            required: vec![
                Field::new(Mode::Solo, Counter::MinutesPlayed),
                Field::new(Mode::Solo, Counter::Top1),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_options_default() {
        let options = LoadOptions::default();
        assert_eq!(options.required.len(), 2);
        assert!(options.required.contains(&Field::default()));
    }
}
