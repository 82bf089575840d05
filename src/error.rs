//! Error types returned by the clustering entry points.

use thiserror::Error;

/// Reasons a clustering request is rejected before any run starts.
///
/// Empty clusters and runs that exhaust their iteration limit are not errors: the former keep their
/// centroid in place, the latter still produce a (less settled) result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KMeansError {
    /// There are no samples to cluster.
    #[error("Cannot cluster an empty set of samples")]
    EmptyInput,

    /// The requested cluster count is outside `[1, sample_cnt]`.
    #[error("Cluster count must be in [1, {sample_cnt}], got {k}")]
    InvalidClusterCount { k: usize, sample_cnt: usize },

    /// A sample has a NaN or infinite coordinate.
    #[error("Sample {index} has a non-finite coordinate")]
    NonFiniteSample { index: usize },

    /// The configuration asks for zero runs.
    #[error("At least one run is required")]
    InvalidRunCount,

    /// The configuration allows zero iterations per run.
    #[error("At least one iteration per run is required")]
    InvalidIterationLimit,

    /// The convergence threshold is negative or not finite.
    #[error("Convergence threshold must be finite and >= 0, got {0}")]
    InvalidThreshold(f64),

    /// An initialization method produced the wrong amount of centroids.
    #[error("Initialization produced {got} centroids, expected {expected}")]
    InvalidInitialization { expected: usize, got: usize },
}
