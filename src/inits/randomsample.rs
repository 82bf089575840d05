use crate::{DistanceFunction, KMeans, KMeansState, Primitive};
use rand::prelude::*;

#[inline(always)]
pub fn calculate<T, D>(kmean: &KMeans<T, D>, state: &mut KMeansState<T>, rnd: &mut dyn RngCore)
where
    T: Primitive,
    D: DistanceFunction<T>,
{
    // Sampling indices without replacement, so no sample is picked twice
    state.centroids.clear();
    state.centroids.extend(kmean.samples.choose_multiple(rnd, state.k).cloned());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EuclideanDistance, Point};

    #[test]
    fn picks_k_distinct_samples() {
        let samples: Vec<Point<f64>> = (0..20).map(|i| Point::new(i as f64, -(i as f64))).collect();
        let kmean = KMeans::new(samples.clone(), EuclideanDistance);
        let mut rnd = StdRng::seed_from_u64(1337);

        for k in [1, 5, 20] {
            let mut state = KMeansState::new(0, samples.len(), k);
            calculate(&kmean, &mut state, &mut rnd);
            assert_eq!(state.centroids.len(), k);
            for (i, c) in state.centroids.iter().enumerate() {
                assert!(samples.contains(c));
                assert!(!state.centroids[i + 1..].contains(c));
            }
        }
    }

    #[test]
    fn reproducible_with_seeded_generator() {
        let samples: Vec<Point<f32>> = (0..50).map(|i| Point::new((i * 7 % 13) as f32, i as f32)).collect();
        let kmean = KMeans::new(samples, EuclideanDistance);
        let mut a = KMeansState::new(0, kmean.sample_cnt(), 4);
        let mut b = KMeansState::new(0, kmean.sample_cnt(), 4);
        calculate(&kmean, &mut a, &mut StdRng::seed_from_u64(7));
        calculate(&kmean, &mut b, &mut StdRng::seed_from_u64(7));
        assert_eq!(a.centroids, b.centroids);
    }
}
