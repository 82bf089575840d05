#[cfg(test)]
macro_rules! assert_approx_eq {
	($left: expr, $right: expr, $tol: expr) => ({
		match ($left, $right, $tol) {
			(left_val , right_val, tol_val) => {
				let delta = (left_val - right_val).abs();
				if !(delta < tol_val) {
					panic!(
						"assertion failed: `(left ≈ right)` \
						(left: `{}`, right: `{}`) \
						with ∆={:1.1e} (allowed ∆={:e})",
						left_val , right_val, delta, tol_val
					)
				}
			}
		}
	});
	($left: expr, $right: expr) => (assert_approx_eq!(($left), ($right), 1e-12))
}

#[cfg(test)]
pub(crate) mod testing {
	use crate::{Point, Primitive, RunResult};
	use rand::prelude::*;

	/// Two well separated groups of three samples each.
	/// Lower group first, so the expected assignment is `[a, a, a, b, b, b]`.
	pub fn two_groups() -> Vec<Point<f64>> {
		vec![
			Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(0.0, 1.0),
			Point::new(20.0, 20.0), Point::new(21.0, 20.0), Point::new(20.0, 21.0),
		]
	}

	/// Inertia of [`two_groups`] split into its two groups.
	/// Per group: one sample at `sqrt(2)/3` from the mean, two at `sqrt(5)/3`.
	pub fn two_groups_inertia() -> f64 {
		2.0 * (2.0f64.sqrt() / 3.0 + 2.0 * 5.0f64.sqrt() / 3.0)
	}

	/// `n` samples spread around `groups` centers, jittered by up to 5 in each direction.
	pub fn scattered_blobs(n: usize, groups: usize, seed: u64) -> Vec<Point<f64>> {
		let mut rnd = StdRng::seed_from_u64(seed);
		(0..n).map(|i| {
			let g = i % groups;
			let (cx, cy) = (g as f64 * 50.0, (g % 2) as f64 * 50.0);
			Point::new(cx + rnd.gen_range(-5.0..5.0), cy + rnd.gen_range(-5.0..5.0))
		}).collect()
	}

	/// Every sample sits in exactly one cluster, the one its assignment names, in sample order.
	pub fn assert_partition_covers<T: Primitive>(samples: &[Point<T>], result: &RunResult<T>) {
		assert_eq!(result.assignments.len(), samples.len());
		assert_eq!(result.partition.len(), result.centroids.len());
		assert_eq!(result.partition.iter().map(|c| c.members.len()).sum::<usize>(), samples.len());

		for (cluster_id, cluster) in result.partition.iter().enumerate() {
			assert_eq!(cluster.centroid, result.centroids[cluster_id]);
			let expected: Vec<Point<T>> = samples.iter()
				.zip(&result.assignments)
				.filter(|(_, &a)| a == cluster_id)
				.map(|(s, _)| *s)
				.collect();
			assert_eq!(cluster.members, expected, "members of cluster {}", cluster_id);
		}
	}
}
