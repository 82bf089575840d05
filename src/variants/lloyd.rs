use crate::{api::RunSettings, inertia, Cluster, DistanceFunction, KMeans, KMeansError, KMeansState, Point, Primitive, RunResult};
use rand::RngCore;
use rayon::prelude::*;
use std::cmp::Ordering;
use tracing::{debug, trace};

/// Distance from one sample to one cluster's centroid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct DistanceCandidate<T> {
	pub(crate) distance: T,
	pub(crate) cluster: usize
}
impl<T: Primitive> DistanceCandidate<T> {
	/// Nearer candidates first; equidistant centroids are ranked by their cluster index.
	pub(crate) fn rank(&self, other: &Self) -> Ordering {
		self.distance.partial_cmp(&other.distance).unwrap_or(Ordering::Equal)
			.then(self.cluster.cmp(&other.cluster))
	}
}

pub(crate) struct Lloyd<T, D> where T: Primitive, D: DistanceFunction<T> {
	_p: std::marker::PhantomData<(T, D)>
}
impl<T, D> Lloyd<T, D> where T: Primitive, D: DistanceFunction<T> {
	pub(crate) fn nearest_centroid(distance: &D, sample: &Point<T>, centroids: &[Point<T>]) -> Option<DistanceCandidate<T>> {
		centroids.iter().enumerate()
			.map(|(cluster, c)| DistanceCandidate { distance: distance.distance(sample, c), cluster })
			.min_by(DistanceCandidate::rank)
	}

	/// Rebuild the partition around `state.centroids`: every cluster is reset to its centroid, then every
	/// sample is appended to the cluster of its nearest centroid (in sample order).
	fn update_cluster_assignments(data: &KMeans<T, D>, state: &mut KMeansState<T>) {
		let KMeansState { centroids, partition, assignments, centroid_distances, .. } = state;
		let centroids: &[Point<T>] = centroids;
		debug_assert!(!centroids.is_empty() && partition.len() == centroids.len());

		data.samples.par_iter()
			.zip(assignments.par_iter_mut())
			.zip(centroid_distances.par_iter_mut())
			.for_each(|((s, assignment), centroid_dist)| {
				if let Some(best) = Self::nearest_centroid(&data.distance, s, centroids) {
					*assignment = best.cluster;
					*centroid_dist = best.distance;
				}
			});

		partition.iter_mut()
			.zip(centroids.iter().cloned())
			.for_each(|(cluster, c)| cluster.reset(c));
		data.samples.iter()
			.zip(assignments.iter().cloned())
			.for_each(|(s, cluster_id)| partition[cluster_id].members.push(*s));
	}

	/// Mean of every cluster's members. Clusters without members keep their centroid.
	fn update_centroids(partition: &[Cluster<T>]) -> Vec<Point<T>> {
		partition.iter().map(Cluster::mean).collect()
	}

	pub(crate) fn calculate<F>(data: &KMeans<T, D>, run: usize, k: usize, init: &F, rnd: &mut dyn RngCore, settings: &RunSettings<'_, T>) -> Result<RunResult<T>, KMeansError>
				where F: Fn(&KMeans<T, D>, &mut KMeansState<T>, &mut dyn RngCore) {
		let mut state = KMeansState::new(run, data.sample_cnt(), k);

		// Initialize clusters and notify subscriber
		init(data, &mut state, rnd);
		if state.centroids.len() != k {
			return Err(KMeansError::InvalidInitialization { expected: k, got: state.centroids.len() });
		}
		state.partition = state.centroids.iter().cloned().map(Cluster::new).collect();
		(settings.init_done)(&state);

		let mut abort_strategy = settings.abort_strategy.create_logic();
		let (mut iterations, mut converged) = (0, false);
		for i in 0..settings.max_iter {
			if i > 0 {
				state.centroids = Self::update_centroids(&state.partition);
			}
			Self::update_cluster_assignments(data, &mut state);
			iterations = i + 1;

			// Notify subscriber about finished iteration
			(settings.iteration_done)(&state, i);
			trace!(run, iteration = i, "samples assigned");
			if !abort_strategy.next(&state.centroids, &data.distance) {
				converged = true;
				break;
			}
		}

		let inertia = inertia(&state.partition, &data.distance);
		debug!(run, iterations, converged, inertia = %inertia, "k-means run finished");
		Ok(RunResult {
			run,
			inertia,
			iterations,
			converged,
			centroids: state.centroids,
			assignments: state.assignments,
			partition: state.partition,
		})
	}
}




#[cfg(test)]
mod tests {
	use super::*;
	use crate::helpers::testing::*;
	use crate::{AbortStrategy, EuclideanDistance, KMeansConfig};
	use rand::prelude::*;

	fn run_precomputed(samples: Vec<Point<f64>>, centroids: Vec<Point<f64>>, conf: &KMeansConfig<'_, f64>) -> RunResult<f64> {
		let kmean = KMeans::new(samples, EuclideanDistance);
		let init = KMeans::<f64, EuclideanDistance>::init_precomputed(centroids);
		Lloyd::calculate(&kmean, 0, 2, &init, &mut StdRng::seed_from_u64(1), &conf.run_settings()).unwrap()
	}

	#[test]
	fn equidistant_centroids_prefer_lower_cluster() {
		let a = DistanceCandidate { distance: 1.0f64, cluster: 2 };
		let b = DistanceCandidate { distance: 1.0f64, cluster: 0 };
		let c = DistanceCandidate { distance: 0.5f64, cluster: 3 };
		assert_eq!(a.rank(&b), Ordering::Greater);
		assert_eq!(b.rank(&a), Ordering::Less);
		assert_eq!(c.rank(&b), Ordering::Less);

		let centroids = [Point::new(1.0, 0.0), Point::new(-1.0, 0.0), Point::new(0.0, 1.0)];
		let best = Lloyd::<f64, EuclideanDistance>::nearest_centroid(&EuclideanDistance, &Point::new(0.0, 0.0), &centroids);
		assert_eq!(best, Some(DistanceCandidate { distance: 1.0, cluster: 0 }));
		let best = Lloyd::<f64, EuclideanDistance>::nearest_centroid(&EuclideanDistance, &Point::new(0.0, 0.9), &centroids);
		assert_eq!(best.map(|b| b.cluster), Some(2));
	}

	#[test]
	fn separates_two_groups_from_a_bad_start() {
		// Both initial centroids in the lower group; ties in the first assignment go to cluster 0
		let result = run_precomputed(two_groups(), vec![Point::new(0.0, 1.0), Point::new(1.0, 0.0)], &KMeansConfig::default());

		assert!(result.converged);
		assert_eq!(result.iterations, 4);
		assert_eq!(result.assignments, vec![0, 0, 0, 1, 1, 1]);
		assert_approx_eq!(result.centroids[0].x, 1.0 / 3.0, 1e-12);
		assert_approx_eq!(result.centroids[1].y, 61.0 / 3.0, 1e-12);
		assert_approx_eq!(result.inertia, two_groups_inertia(), 1e-9);
		assert_partition_covers(&two_groups(), &result);
	}

	#[test]
	fn empty_cluster_keeps_centroid() {
		let samples = vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(2.0, 0.0)];
		let result = run_precomputed(samples.clone(), vec![Point::new(1.0, 0.0), Point::new(100.0, 100.0)], &KMeansConfig::default());

		assert!(result.converged);
		assert_eq!(result.iterations, 2);
		assert_eq!(result.assignments, vec![0, 0, 0]);
		assert_eq!(result.centroids, vec![Point::new(1.0, 0.0), Point::new(100.0, 100.0)]);
		assert_eq!(result.partition[1], Cluster::new(Point::new(100.0, 100.0)));
		assert_eq!(result.inertia, 2.0);
		assert_partition_covers(&samples, &result);
	}

	#[test]
	fn duplicate_centroids_do_not_crash() {
		// Fewer distinct locations than clusters: the second centroid never receives a member
		let samples = vec![Point::new(3.0, 3.0), Point::new(3.0, 3.0), Point::new(3.0, 3.0)];
		let result = run_precomputed(samples.clone(), vec![Point::new(3.0, 3.0), Point::new(3.0, 3.0)], &KMeansConfig::default());

		assert_eq!(result.assignments, vec![0, 0, 0]);
		assert!(result.partition[1].members.is_empty());
		assert_eq!(result.partition[1].centroid, Point::new(3.0, 3.0));
		assert_eq!(result.inertia, 0.0);
		assert_partition_covers(&samples, &result);
	}

	#[test]
	fn identical_start_gives_identical_result() {
		let samples = scattered_blobs(200, 3, 99);
		let centroids = samples[..2].to_vec();
		let conf = KMeansConfig::default();
		let a = run_precomputed(samples.clone(), centroids.clone(), &conf);
		let b = run_precomputed(samples.clone(), centroids, &conf);
		assert_eq!(a, b);
	}

	#[test]
	fn max_iterations_strategy_uses_all_iterations() {
		let conf = KMeansConfig::build()
			.max_iter(7)
			.abort_strategy(AbortStrategy::MaxIterations)
			.build();
		let result = run_precomputed(two_groups(), vec![Point::new(0.0, 0.0), Point::new(20.0, 20.0)], &conf);
		assert_eq!(result.iterations, 7);
		assert!(!result.converged);
		assert_approx_eq!(result.inertia, two_groups_inertia(), 1e-9);
	}

	#[test]
	fn iteration_limit_stops_unconverged_run() {
		let conf = KMeansConfig::build().max_iter(1).build();
		let result = run_precomputed(two_groups(), vec![Point::new(0.0, 1.0), Point::new(1.0, 0.0)], &conf);
		assert_eq!(result.iterations, 1);
		assert!(!result.converged);
		// Partition still matches the centroids it was assigned against
		assert_eq!(result.centroids, vec![Point::new(0.0, 1.0), Point::new(1.0, 0.0)]);
		assert_eq!(result.assignments, vec![0, 1, 0, 0, 1, 0]);
		assert_partition_covers(&two_groups(), &result);
	}

	#[test]
	fn inertia_matches_centroid_distances() {
		let samples = scattered_blobs(300, 4, 5);
		let kmean = KMeans::new(samples, EuclideanDistance);
		let conf = KMeansConfig::default();
		let mut last_state = std::sync::Mutex::new(None);
		let capture = |s: &KMeansState<f64>, _: usize| { *last_state.lock().unwrap() = Some(s.clone()); };
		let settings = RunSettings { iteration_done: &capture, ..conf.run_settings() };
		let result = Lloyd::calculate(&kmean, 0, 4, &KMeans::init_random_sample, &mut StdRng::seed_from_u64(3), &settings).unwrap();

		let state = last_state.get_mut().unwrap().take().unwrap();
		assert_eq!(state.partition, result.partition);
		assert_approx_eq!(state.centroid_distances.iter().sum::<f64>(), result.inertia, 1e-9);
	}
}
