use kmeans_restarts::*;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Library log output (one line per run, plus the selected run)
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let (sample_cnt, k) = (20000, 6);

    // Generate some random data
    let samples: Vec<Point<f64>> = (0..sample_cnt)
        .map(|_| Point::new(rand::random(), rand::random()))
        .collect();

	let conf = KMeansConfig::build()
		.runs(8)
		.max_iter(250)
		.seed(1337)
		.init_done(&|s| println!("Run {} - Initialization completed.", s.run))
		.iteration_done(&|s, nr| {
			let error: f64 = s.centroid_distances.iter().sum();
			println!("Run {} - Iteration {} - Error: {:.2}", s.run, nr, error);
		})
		.run_done(&|r| println!("Run {} - Done after {} iterations | Inertia: {:.2}", r.run, r.iterations, r.inertia))
		.build();

    // Calculate kmeans, using kmean++ as initialization-method
    let kmean = KMeans::new(samples, EuclideanDistance);
    let result = kmean.kmeans_restarts(k, KMeans::init_kmeanplusplus, &conf)?;

    println!("Best run: {}", result.run);
    println!("Centroids: {:?}", result.centroids);
    println!("Inertia: {}", result.inertia);
    Ok(())
}
