use serde::{Deserialize, Serialize};

use super::{Category, ExperimentStatus};

/// Aggregate view over the whole collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentStats {
    pub by_status: Vec<StatusStats>,
    pub by_category: Vec<CategoryStats>,
    pub total: u64,
}

/// Experiments sharing one status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusStats {
    pub status: ExperimentStatus,
    pub count: u64,
    #[serde(serialize_with = "super::experiment::serialize_amount")]
    pub avg_budget: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub category: Category,
    pub count: u64,
}
