//! # Player Stats
//!
//! Ranking and aggregation over per-player game statistics exported as CSV.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (fields, records, ranked views, totals)
//! - **storage**: CSV loading with canonical column aliases
//! - **calculate**: Ranking, derived metrics and per-mode aggregation
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation
//! - **error**: Error taxonomy shared by loader and pipeline

pub mod api;
pub mod calculate;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;

pub use error::StatsError;
pub use models::*;
