//! Error taxonomy shared by the loader and the aggregation pipeline.

use thiserror::Error;

use crate::models::Field;

/// Errors raised while loading or aggregating player statistics.
#[derive(Debug, Error)]
pub enum StatsError {
    /// The input is absent, unreadable or malformed. Fatal to the session.
    #[error("Data source error: {0}")]
    DataSource(String),

    /// A column required by one computation is absent. Only that
    /// computation is skipped.
    #[error("Missing column: {field}")]
    MissingColumn { field: Field },

    /// A caller-supplied parameter was rejected before computation.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },
}

impl StatsError {
    pub fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        StatsError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub fn missing(field: Field) -> Self {
        StatsError::MissingColumn { field }
    }
}

impl From<csv::Error> for StatsError {
    fn from(err: csv::Error) -> Self {
        StatsError::DataSource(err.to_string())
    }
}

pub type Result<T, E = StatsError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Counter, Mode};

    #[test]
    fn test_missing_column_names_field() {
        let err = StatsError::missing(Field::new(Mode::Trio, Counter::Kills));
        assert_eq!(err.to_string(), "Missing column: Trio kills");
    }

    #[test]
    fn test_invalid_parameter_message() {
        let err = StatsError::invalid_parameter("top_n", "must be non-negative, got -3");
        assert_eq!(
            err.to_string(),
            "Invalid parameter 'top_n': must be non-negative, got -3"
        );
    }
}
