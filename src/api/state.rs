use std::sync::Arc;

use crate::config::RankingConfig;
use crate::models::Dataset;

/// Shared handler state. The dataset is immutable after load, so handlers
/// read it concurrently without locking.
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub ranking: Arc<RankingConfig>,
}

impl AppState {
    pub fn new(dataset: Dataset, ranking: RankingConfig) -> Self {
        Self {
            dataset: Arc::new(dataset),
            ranking: Arc::new(ranking),
        }
    }
}
