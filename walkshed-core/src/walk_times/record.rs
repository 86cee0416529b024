use serde::Serialize;

use super::dispatcher::PartitionFailure;
use super::query::BatchDiagnostics;
use crate::{Minutes, NodeId};

/// Smallest trip time threshold within which `target_id` is reachable
/// from `origin_id`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WalkTimeRecord {
    pub origin_id: NodeId,
    pub target_id: NodeId,
    #[serde(rename = "trip_time")]
    pub threshold: Minutes,
}

impl WalkTimeRecord {
    pub fn new(origin_id: NodeId, target_id: NodeId, threshold: Minutes) -> Self {
        Self {
            origin_id,
            target_id,
            threshold,
        }
    }
}

/// Records of one batch together with what was skipped on the way
#[derive(Debug, Clone, Default)]
pub struct WalkTimeBatch {
    pub records: Vec<WalkTimeRecord>,
    pub diagnostics: BatchDiagnostics,
    /// Only populated under [`crate::FailurePolicy::Salvage`]
    pub failed_partitions: Vec<PartitionFailure>,
}

impl WalkTimeBatch {
    pub fn is_complete(&self) -> bool {
        self.failed_partitions.is_empty()
    }
}
