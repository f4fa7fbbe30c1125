//! Core data models for player statistics.

mod field;
mod metric;
mod player;
mod view;

pub use field::*;
pub use metric::*;
pub use player::*;
pub use view::*;
