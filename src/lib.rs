//! # kmeans-restarts - API documentation
//!
//! A small rust library for k-means clustering of 2-D points, with repeated random restarts.
//!
//! ## Design target
//! K-Means only finds a local optimum, and which one it finds depends on the initial centroids.
//! This crate therefore executes several independent runs (in parallel, using rayon) and keeps the
//! one with the lowest inertia: the sum of the distances of all points to the centroid of their cluster.
//!
//! ## Supported variants
//! - Single run (Lloyd): [`KMeans::kmeans_lloyd`]
//! - Best-of-N restarts: [`KMeans::kmeans_restarts`], [`cluster`], [`cluster_with`]
//!
//! ## Supported centroid initializations
//! For a list of implemented initialization methods, see [`KMeans`].
//!
//! ## Supported primitive types
//! - [`f32`]
//! - [`f64`]
//!
//! ## Example
//! ```rust
//! use kmeans_restarts::*;
//!
//! let points = vec![
//!     Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(0.0, 1.0),
//!     Point::new(20.0, 20.0), Point::new(21.0, 20.0), Point::new(20.0, 21.0),
//! ];
//! let result = cluster(&points, 2).unwrap();
//!
//! assert_eq!(result.partition.len(), 2);
//! assert_eq!(result.assignments[0], result.assignments[2]);
//! assert_ne!(result.assignments[0], result.assignments[3]);
//! println!("Centroids: {:?}", result.centroids);
//! println!("Inertia: {}", result.inertia);
//! ```
//!
//! ## Example (seeded, with status event callbacks)
//! ```rust
//! use kmeans_restarts::*;
//!
//! let points: Vec<Point<f64>> = (0..200).map(|i| Point::new((i % 7) as f64, (i % 11) as f64)).collect();
//! let conf = KMeansConfig::build()
//!     .runs(4)
//!     .seed(1337)
//!     .run_done(&|r| println!("Run {} - {} iterations, inertia {:.2}", r.run, r.iterations, r.inertia))
//!     .build();
//!
//! let kmean = KMeans::new(points, EuclideanDistance);
//! let result = kmean.kmeans_restarts(3, KMeans::init_kmeanplusplus, &conf).unwrap();
//! println!("Best run: {}", result.run);
//! ```
//!
//! ## Short API-Overview / Description
//! Entry-point of the library is the [`KMeans`] struct, generic over the underlying primitive type and the
//! [`DistanceFunction`]. It takes over the samples into its ownership. Calling one of its instance-methods
//! does not mutate it; every run works on its own [`KMeansState`] and finally yields a [`RunResult`].
//!
//! Initialization methods are static methods within the [`KMeans`] struct, which are simply passed in as reference.
//! The [`cluster`] / [`cluster_with`] functions wrap the common case: euclidean distance, random sample initialization.

#[macro_use] mod helpers;
mod point;
mod error;
mod api;
mod abort_strategy;
mod distances;
mod inits;
mod variants;

pub use abort_strategy::{AbortStrategy, centroids_converged};
pub use api::{
    inertia, Cluster, DistanceFunction, InitDoneCallbackFn, IterationDoneCallbackFn, KMeans, KMeansConfig,
    KMeansConfigBuilder, KMeansState, RunDoneCallbackFn, RunResult,
};
pub use distances::EuclideanDistance;
pub use error::KMeansError;
pub use point::{Point, Primitive};

/// Cluster `points` into `k` groups, using the default [`KMeansConfig`] (10 runs, 50 iterations each).
///
/// Every run starts from `k` distinct, randomly chosen points. The result of the run with the lowest inertia is returned.
pub fn cluster<T: Primitive>(points: &[Point<T>], k: usize) -> Result<RunResult<T>, KMeansError> {
    cluster_with(points, k, &KMeansConfig::default())
}

/// Like [`cluster`], with an explicit configuration (e.g. a seeded random number generator).
pub fn cluster_with<T: Primitive>(points: &[Point<T>], k: usize, config: &KMeansConfig<'_, T>) -> Result<RunResult<T>, KMeansError> {
    KMeans::new(points.to_vec(), EuclideanDistance).kmeans_restarts(k, KMeans::init_random_sample, config)
}
