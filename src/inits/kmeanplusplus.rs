use crate::{DistanceFunction, KMeans, KMeansState, Primitive};
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rayon::prelude::*;

#[inline(always)]
pub fn calculate<T, D>(kmean: &KMeans<T, D>, state: &mut KMeansState<T>, rnd: &mut dyn RngCore)
where
    T: Primitive,
    D: DistanceFunction<T>,
{
    let samples = &kmean.samples;
    state.centroids.clear();
    {
        // Randomly select first centroid
        let first_idx = rnd.gen_range(0..samples.len());
        state.centroids.push(samples[first_idx]);
    }
    for _ in 1..state.k {
        // Distance of every sample to its nearest, already chosen, centroid
        let centroids = &state.centroids;
        let distances: Vec<T> = samples.par_iter()
            .map(|s| centroids.iter()
                .map(|c| kmean.distance.distance(s, c))
                .fold(T::infinity(), T::min))
            .collect();
        // Squared, relative to the largest distance, so squaring cannot overflow
        let max_dist = distances.iter().cloned().fold(T::zero(), T::max);
        let weights: Vec<T> = distances.iter()
            .map(|&d| if max_dist > T::zero() { (d / max_dist) * (d / max_dist) } else { T::zero() })
            .collect();

        // All weights are zero when every sample sits on a chosen centroid
        let sampled_idx = match WeightedIndex::new(&weights) {
            Ok(centroid_index) => centroid_index.sample(rnd),
            Err(_) => rnd.gen_range(0..samples.len()),
        };
        state.centroids.push(samples[sampled_idx]);
    }
}
