use crate::{AbortStrategy, KMeansError, Point, Primitive};
use std::cell::RefCell;
use std::cmp::Ordering;
use rand::prelude::*;

pub type InitDoneCallbackFn<'a, T> = &'a (dyn Fn(&KMeansState<T>) + Sync);
pub type IterationDoneCallbackFn<'a, T> = &'a (dyn Fn(&KMeansState<T>, usize) + Sync);
pub type RunDoneCallbackFn<'a, T> = &'a (dyn Fn(&RunResult<T>) + Sync);

/// Distance measure between two samples, used for the assignment step, the convergence check and the inertia.
///
/// Implementations are shared between the worker threads of parallel runs, and therefore have to be [`Sync`].
pub trait DistanceFunction<T: Primitive>: Send + Sync {
    fn distance(&self, a: &Point<T>, b: &Point<T>) -> T;
}


/// Configuration options for k-means calculations. See [`KMeansConfigBuilder`] for all options.
pub struct KMeansConfig<'a, T: Primitive> {
    pub(crate) runs: usize,
    pub(crate) max_iter: usize,
    pub(crate) abort_strategy: AbortStrategy<T>,
    /// Only used to derive one seed per run
    pub(crate) rnd: Box<RefCell<dyn RngCore>>,
    pub(crate) init_done: InitDoneCallbackFn<'a, T>,
    /// Called after the assignment step, with the zero-based iteration number
    pub(crate) iteration_done: IterationDoneCallbackFn<'a, T>,
    /// Called from the thread that calculated the run
    pub(crate) run_done: RunDoneCallbackFn<'a, T>,
}
impl<'a, T: Primitive> Default for KMeansConfig<'a, T> {
    fn default() -> Self {
        Self {
            runs: 10,
            max_iter: 50,
            abort_strategy: AbortStrategy::default(),
            rnd: Box::new(RefCell::new(rand::thread_rng())),
            init_done: &|_| {},
            iteration_done: &|_, _| {},
            run_done: &|_| {},
        }
    }
}
impl<'a, T: Primitive> KMeansConfig<'a, T> {
    /// Use the [`KMeansConfigBuilder`] to build a [`KMeansConfig`] instance.
    pub fn build() -> KMeansConfigBuilder<'a, T> {
        KMeansConfigBuilder { config: KMeansConfig::default() }
    }

    pub fn runs(&self) -> usize { self.runs }
    pub fn max_iter(&self) -> usize { self.max_iter }
    pub fn abort_strategy(&self) -> AbortStrategy<T> { self.abort_strategy }

    pub(crate) fn validate(&self) -> Result<(), KMeansError> {
        if self.runs == 0 {
            return Err(KMeansError::InvalidRunCount);
        }
        if self.max_iter == 0 {
            return Err(KMeansError::InvalidIterationLimit);
        }
        self.abort_strategy.validate()
    }

    /// Draw the seeds for `cnt` runs from the configured generator.
    pub(crate) fn run_seeds(&self, cnt: usize) -> Vec<u64> {
        let mut rnd = self.rnd.borrow_mut();
        (0..cnt).map(|_| rnd.next_u64()).collect()
    }

    /// The thread-safe part of the configuration, needed inside of a single run.
    pub(crate) fn run_settings(&self) -> RunSettings<'a, T> {
        RunSettings {
            max_iter: self.max_iter,
            abort_strategy: self.abort_strategy,
            init_done: self.init_done,
            iteration_done: self.iteration_done,
            run_done: self.run_done,
        }
    }
}
impl<'a, T: Primitive> std::fmt::Debug for KMeansConfig<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KMeansConfig")
            .field("runs", &self.runs)
            .field("max_iter", &self.max_iter)
            .field("abort_strategy", &self.abort_strategy)
            .finish_non_exhaustive()
    }
}

pub struct KMeansConfigBuilder<'a, T: Primitive> {
    config: KMeansConfig<'a, T>
}
impl<'a, T: Primitive> KMeansConfigBuilder<'a, T> {
    /// Set the amount of independent runs. The run with the lowest inertia is returned.
    /// ## Default
    /// `10`
    pub fn runs(mut self, runs: usize) -> Self {
        self.config.runs = runs; self
    }
    /// Set the maximum amount of iterations a single run may use.
    /// ## Default
    /// `50`
    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.config.max_iter = max_iter; self
    }
    /// Set the abort-strategy to use during a running k-means calculation. For more information,
    /// see documentation of [`AbortStrategy`].
    /// ## Default
    /// [`AbortStrategy::CentroidShift`] `{ threshold: 0.01 }`
    pub fn abort_strategy(mut self, abort_strategy: AbortStrategy<T>) -> Self {
        self.config.abort_strategy = abort_strategy; self
    }
    /// Shortcut for [`AbortStrategy::CentroidShift`] with the given **threshold**.
    pub fn convergence_threshold(self, threshold: T) -> Self {
        self.abort_strategy(AbortStrategy::CentroidShift { threshold })
    }
    /// Set the random number generator that should be used to seed the runs.
    /// Use a seeded generator for deterministically repeatable results.
    pub fn random_generator<R: RngCore + 'static>(mut self, rnd: R) -> Self {
        self.config.rnd = Box::new(RefCell::new(rnd)); self
    }
    /// Shortcut for [`Self::random_generator`] with a [`StdRng`] seeded from **seed**.
    pub fn seed(self, seed: u64) -> Self {
        self.random_generator(StdRng::seed_from_u64(seed))
    }
    /// Set the callback that should be called after the centroid initialization of each run.
    pub fn init_done(mut self, init_done: InitDoneCallbackFn<'a, T>) -> Self {
        self.config.init_done = init_done; self
    }
    /// Set the callback that should be called after each iteration of each run.
    pub fn iteration_done(mut self, iteration_done: IterationDoneCallbackFn<'a, T>) -> Self {
        self.config.iteration_done = iteration_done; self
    }
    /// Set the callback that should be called whenever a run finished.
    pub fn run_done(mut self, run_done: RunDoneCallbackFn<'a, T>) -> Self {
        self.config.run_done = run_done; self
    }
    /// Return the internally built configuration structure.
    pub fn build(self) -> KMeansConfig<'a, T> { self.config }
}

#[derive(Clone, Copy)]
pub(crate) struct RunSettings<'a, T: Primitive> {
    pub(crate) max_iter: usize,
    pub(crate) abort_strategy: AbortStrategy<T>,
    pub(crate) init_done: InitDoneCallbackFn<'a, T>,
    pub(crate) iteration_done: IterationDoneCallbackFn<'a, T>,
    pub(crate) run_done: RunDoneCallbackFn<'a, T>,
}


/// One group of a partition. The centroid is kept apart from the samples assigned to it,
/// so a cluster without members still knows where it is.
#[derive(Clone, Debug, PartialEq)]
pub struct Cluster<T: Primitive> {
    pub centroid: Point<T>,
    pub members: Vec<Point<T>>,
}
impl<T: Primitive> Cluster<T> {
    pub fn new(centroid: Point<T>) -> Self {
        Self { centroid, members: Vec::new() }
    }

    /// Move the cluster to **centroid** and drop all of its members.
    pub(crate) fn reset(&mut self, centroid: Point<T>) {
        self.centroid = centroid;
        self.members.clear();
    }

    /// Mean of the members. A cluster without members stays where it is.
    pub fn mean(&self) -> Point<T> {
        Point::mean(self.members.iter()).unwrap_or(self.centroid)
    }

    /// Sum of the distances from every member to the centroid.
    pub fn inertia<D: DistanceFunction<T> + ?Sized>(&self, distance: &D) -> T {
        self.members.iter().map(|m| distance.distance(m, &self.centroid)).sum()
    }
}

/// Total inertia of a partition: the sum of all member-to-centroid distances.
pub fn inertia<T: Primitive, D: DistanceFunction<T> + ?Sized>(partition: &[Cluster<T>], distance: &D) -> T {
    partition.iter().map(|c| c.inertia(distance)).sum()
}


/// State of a single run during calculation, as handed to the status callbacks.
#[derive(Clone, Debug)]
pub struct KMeansState<T: Primitive> {
    pub run: usize,
    pub k: usize,
    pub centroids: Vec<Point<T>>,
    pub partition: Vec<Cluster<T>>,
    pub assignments: Vec<usize>,
    pub centroid_distances: Vec<T>,
}
impl<T: Primitive> KMeansState<T> {
    pub(crate) fn new(run: usize, sample_cnt: usize, k: usize) -> Self {
        Self {
            run,
            k,
            centroids: Vec::with_capacity(k),
            partition: Vec::with_capacity(k),
            assignments: vec![0usize; sample_cnt],
            centroid_distances: vec![T::infinity(); sample_cnt],
        }
    }
}


/// Outcome of one k-means run. `centroids[i] == partition[i].centroid`, and `converged` is **false**
/// if the run stopped at its iteration limit.
#[derive(Clone, Debug, PartialEq)]
pub struct RunResult<T: Primitive> {
    pub run: usize,
    pub inertia: T,
    pub iterations: usize,
    pub converged: bool,
    pub centroids: Vec<Point<T>>,
    pub assignments: Vec<usize>,
    pub partition: Vec<Cluster<T>>,
}
impl<T: Primitive> RunResult<T> {
    /// Order results by inertia, breaking ties by the lower run index.
    pub fn cmp_quality(&self, other: &Self) -> Ordering {
        self.inertia.partial_cmp(&other.inertia).unwrap_or(Ordering::Equal)
            .then(self.run.cmp(&other.run))
    }
}


/// Entrypoint of this crate's API-Surface.
///
/// Create an instance of this struct, giving the samples you want to operate on and the distance
/// function to use. Calculations do not mutate it, so the samples are shared read-only between
/// all runs of a calculation.
///
/// ## Supported variants
/// - Single k-means run (Lloyd) [`KMeans::kmeans_lloyd`]
/// - Best-of-N parallel restarts [`KMeans::kmeans_restarts`]
///
/// ## Supported initialization methods
/// - Random-Sample [`KMeans::init_random_sample`]
/// - K-Mean++ [`KMeans::init_kmeanplusplus`]
/// - Precomputed [`KMeans::init_precomputed`]
pub struct KMeans<T: Primitive, D: DistanceFunction<T> = crate::EuclideanDistance> {
    pub(crate) samples: Vec<Point<T>>,
    pub(crate) distance: D,
}
impl<T: Primitive, D: DistanceFunction<T>> KMeans<T, D> {
    pub fn new(samples: Vec<Point<T>>, distance: D) -> Self {
        Self { samples, distance }
    }

    pub fn samples(&self) -> &[Point<T>] { &self.samples }
    pub fn sample_cnt(&self) -> usize { self.samples.len() }

    pub(crate) fn validate(&self, k: usize) -> Result<(), KMeansError> {
        if self.samples.is_empty() {
            return Err(KMeansError::EmptyInput);
        }
        if k == 0 || k > self.samples.len() {
            return Err(KMeansError::InvalidClusterCount { k, sample_cnt: self.samples.len() });
        }
        match self.samples.iter().position(|s| !s.is_finite()) {
            Some(index) => Err(KMeansError::NonFiniteSample { index }),
            None => Ok(())
        }
    }

    /// A single k-means run: assign every sample to its nearest centroid, move each centroid to the mean
    /// of its members, repeat until the abort-strategy reports convergence or the iteration limit is hit.
    ///
    /// **runs** of the configuration is ignored here, the run is seeded with the first value of the
    /// configured random number generator.
    ///
    /// ## Arguments
    /// - **k**: Amount of clusters to search for
    /// - **init**: Initialization-Method to use for the initialization of the **k** centroids
    /// - **config**: [`KMeansConfig`] instance, containing several configuration options for the calculation.
    ///
    /// ## Example
    /// ```rust
    /// use kmeans_restarts::*;
    ///
    /// let samples = vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(9.0, 9.0), Point::new(10.0, 9.0)];
    /// let kmean = KMeans::new(samples, EuclideanDistance);
    /// let init = KMeans::<f64, EuclideanDistance>::init_precomputed(vec![Point::new(0.0, 0.0), Point::new(10.0, 9.0)]);
    /// let result = kmean.kmeans_lloyd(2, init, &KMeansConfig::default()).unwrap();
    ///
    /// assert!(result.converged);
    /// assert_eq!(result.assignments, vec![0, 0, 1, 1]);
    /// assert_eq!(result.inertia, 2.0);
    /// ```
    pub fn kmeans_lloyd<F>(&self, k: usize, init: F, config: &KMeansConfig<'_, T>) -> Result<RunResult<T>, KMeansError>
            where F: Fn(&KMeans<T, D>, &mut KMeansState<T>, &mut dyn RngCore) {
        self.validate(k)?;
        config.validate()?;
        let settings = config.run_settings();
        let mut rnd = StdRng::seed_from_u64(config.rnd.borrow_mut().next_u64());
        let result = crate::variants::Lloyd::calculate(self, 0, k, &init, &mut rnd, &settings)?;
        (settings.run_done)(&result);
        Ok(result)
    }

    /// Best-of-N k-means: executes **runs** independent single runs (see [`KMeans::kmeans_lloyd`]) in parallel,
    /// each with its own initialization, and returns the run with the lowest inertia.
    /// Ties are resolved in favor of the lower run index, so a seeded configuration gives reproducible results.
    ///
    /// ## Example
    /// ```rust
    /// use kmeans_restarts::*;
    ///
    /// let samples = vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(9.0, 9.0), Point::new(10.0, 9.0)];
    /// let kmean = KMeans::new(samples, EuclideanDistance);
    /// let conf = KMeansConfig::build().runs(4).seed(7).build();
    /// let result = kmean.kmeans_restarts(2, KMeans::init_random_sample, &conf).unwrap();
    ///
    /// assert_eq!(result.partition.len(), 2);
    /// assert_eq!(result.inertia, 2.0);
    /// ```
    pub fn kmeans_restarts<F>(&self, k: usize, init: F, config: &KMeansConfig<'_, T>) -> Result<RunResult<T>, KMeansError>
            where F: Fn(&KMeans<T, D>, &mut KMeansState<T>, &mut dyn RngCore) + Sync {
        crate::variants::Restarts::calculate(self, k, init, config)
    }

    /// Random sample initialization method (a.k.a. Forgy)
    ///
    /// ## Description
    /// This initialization method selects k distinct samples (without replacement) as initial centroids.
    ///
    /// ## Note
    /// This method is not meant for direct invocation. Pass a reference to it, to an instance-method of [`KMeans`].
    pub fn init_random_sample(kmean: &KMeans<T, D>, state: &mut KMeansState<T>, rnd: &mut dyn RngCore) {
        crate::inits::randomsample::calculate(kmean, state, rnd);
    }

    /// K-Mean++ initialization method
    ///
    /// ## Description
    /// This initialization method starts by selecting one random sample as first centroid.
    /// Proceeding from there, each following centroid is drawn with a probability proportional to the
    /// squared distance of a sample to its nearest, already chosen, centroid.
    ///
    /// ## Note
    /// This method is not meant for direct invocation. Pass a reference to it, to an instance-method of [`KMeans`].
    pub fn init_kmeanplusplus(kmean: &KMeans<T, D>, state: &mut KMeansState<T>, rnd: &mut dyn RngCore) {
        crate::inits::kmeanplusplus::calculate(kmean, state, rnd);
    }

    /// Precomputed initialization method
    ///
    /// ## Description
    /// Every run starts from the given **centroids**. Their amount has to match k.
    pub fn init_precomputed(centroids: Vec<Point<T>>) -> impl Fn(&KMeans<T, D>, &mut KMeansState<T>, &mut dyn RngCore) + Sync {
        move |_: &KMeans<T, D>, state: &mut KMeansState<T>, _: &mut dyn RngCore| {
            crate::inits::precomputed::calculate(state, &centroids);
        }
    }
}
