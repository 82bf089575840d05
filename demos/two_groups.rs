use kmeans_restarts::*;
use rand::prelude::*;

fn main() {
    let (sample_cnt, k) = (20000, 4);

    // Generate some random data around k centers
    let mut rnd = rand::thread_rng();
    let samples: Vec<Point<f64>> = (0..sample_cnt)
        .map(|i| {
            let center = (i % k) as f64 * 10.0;
            Point::new(center + rnd.gen::<f64>(), center + rnd.gen::<f64>())
        })
        .collect();

    // Best of 10 runs, each initialized with k randomly chosen samples
    let result = match cluster(&samples, k) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Clustering failed: {}", e);
            std::process::exit(1);
        }
    };

    println!("Best run: {} ({} iterations, converged: {})", result.run, result.iterations, result.converged);
    println!("Centroids: {:?}", result.centroids);
    println!("Cluster sizes: {:?}", result.partition.iter().map(|c| c.members.len()).collect::<Vec<_>>());
    println!("Inertia: {}", result.inertia);
}
