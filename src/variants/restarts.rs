use crate::{variants::Lloyd, DistanceFunction, KMeans, KMeansConfig, KMeansError, KMeansState, Primitive, RunResult};
use rand::prelude::*;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::sync::{Mutex, PoisonError};
use tracing::debug;

pub(crate) struct Restarts<T, D> where T: Primitive, D: DistanceFunction<T> {
	_p: std::marker::PhantomData<(T, D)>
}
impl<T, D> Restarts<T, D> where T: Primitive, D: DistanceFunction<T> {
	/// Replace the held result if `result` has a lower inertia (or the same inertia and a lower run index).
	fn offer(best: &Mutex<Option<RunResult<T>>>, result: RunResult<T>) {
		let mut best = best.lock().unwrap_or_else(PoisonError::into_inner);
		let improves = best.as_ref().map_or(true, |current| result.cmp_quality(current) == Ordering::Less);
		if improves {
			*best = Some(result);
		}
	}

	pub(crate) fn calculate<F>(data: &KMeans<T, D>, k: usize, init: F, config: &KMeansConfig<'_, T>) -> Result<RunResult<T>, KMeansError>
				where F: Fn(&KMeans<T, D>, &mut KMeansState<T>, &mut dyn RngCore) + Sync {
		data.validate(k)?;
		config.validate()?;

		// Seeds are drawn up front, so the outcome does not depend on thread scheduling
		let seeds = config.run_seeds(config.runs);
		let settings = config.run_settings();
		let best = Mutex::new(None);
		debug!(runs = config.runs, k, sample_cnt = data.sample_cnt(), "starting k-means restarts");

		seeds.par_iter().enumerate()
			.try_for_each(|(run, &seed)| -> Result<(), KMeansError> {
				let mut rnd = StdRng::seed_from_u64(seed);
				let result = Lloyd::calculate(data, run, k, &init, &mut rnd, &settings)?;
				(settings.run_done)(&result);
				Self::offer(&best, result);
				Ok(())
			})?;

		let best = best.into_inner()
			.unwrap_or_else(PoisonError::into_inner)
			.ok_or(KMeansError::InvalidRunCount)?;
		debug!(run = best.run, inertia = %best.inertia, iterations = best.iterations, "selected best run");
		Ok(best)
	}
}
