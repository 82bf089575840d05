use crate::{DistanceFunction, KMeansError, Point, Primitive};

/// Enum with possible abort strategies.
/// These strategies specify when a running k-means run stops iterating before its iteration limit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AbortStrategy<T: Primitive> {
	/// Stop as soon as no centroid moved farther than **threshold** between two consecutive iterations.
	/// A centroid that moved by exactly **threshold** counts as settled.
	/// ## Fields:
	/// - **threshold**: Maximum centroid movement (same unit as the distance function) that still counts as converged
	CentroidShift { threshold: T },
	/// Never stop early, every run uses all of its iterations.
	MaxIterations,
}
impl<T: Primitive> Default for AbortStrategy<T> {
	fn default() -> Self {
		AbortStrategy::CentroidShift { threshold: T::from(0.01).unwrap_or_else(T::epsilon) }
	}
}
impl<T: Primitive> AbortStrategy<T> {
	pub(crate) fn validate(&self) -> Result<(), KMeansError> {
		match *self {
			AbortStrategy::CentroidShift { threshold } if !threshold.is_finite() || threshold < T::zero() =>
				Err(KMeansError::InvalidThreshold(threshold.to_f64().unwrap_or(f64::NAN))),
			_ => Ok(())
		}
	}

	pub(crate) fn create_logic(&self) -> Box<dyn AbortStrategyLogic<T>> {
		match *self {
			AbortStrategy::CentroidShift { threshold } => Box::new(CentroidShiftLogic {
				threshold,
				prev_centroids: None
			}),
			AbortStrategy::MaxIterations => Box::new(MaxIterationsLogic)
		}
	}
}

/// Checks whether every centroid of `new` lies within `threshold` of its counterpart in `old`.
///
/// Centroid sets of differing length are never converged.
pub fn centroids_converged<T, D>(old: &[Point<T>], new: &[Point<T>], threshold: T, distance: &D) -> bool
		where T: Primitive, D: DistanceFunction<T> + ?Sized {
	old.len() == new.len()
		&& old.iter().zip(new.iter()).all(|(o, n)| distance.distance(o, n) <= threshold)
}

pub(crate) trait AbortStrategyLogic<T: Primitive> {
	/// Function that has to be called once per iteration, after the samples were assigned to **centroids**.
	/// ## Arguments
	/// - **centroids**: The centroid set the current iteration assigned against
	/// - **distance**: Distance function used to measure centroid movement
	/// ## Returns
	/// - **true** if the calculation should continue
	/// - **false** if the calculation converged
	fn next(&mut self, centroids: &[Point<T>], distance: &dyn DistanceFunction<T>) -> bool;
}


pub(crate) struct CentroidShiftLogic<T: Primitive> {
	threshold: T,
	prev_centroids: Option<Vec<Point<T>>>
}
impl<T: Primitive> AbortStrategyLogic<T> for CentroidShiftLogic<T> {
	fn next(&mut self, centroids: &[Point<T>], distance: &dyn DistanceFunction<T>) -> bool {
		// First iteration has nothing to compare against
		let converged = self.prev_centroids.as_deref()
			.map_or(false, |prev| centroids_converged(prev, centroids, self.threshold, distance));
		self.prev_centroids = Some(centroids.to_vec());
		!converged
	}
}


pub(crate) struct MaxIterationsLogic;
impl<T: Primitive> AbortStrategyLogic<T> for MaxIterationsLogic {
	fn next(&mut self, _: &[Point<T>], _: &dyn DistanceFunction<T>) -> bool { true }
}
