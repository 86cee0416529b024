use thiserror::Error;

use crate::walk_times::PartitionFailure;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Invalid node index: {0}")]
    InvalidNodeIndex(usize),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
    #[error("{0}")]
    PartitionFailed(PartitionFailure),
}

impl From<PartitionFailure> for Error {
    fn from(failure: PartitionFailure) -> Self {
        Error::PartitionFailed(failure)
    }
}
