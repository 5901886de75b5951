use threadwork::{map_parallel_n, reduce_parallel, Config, Ticker};
use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};
use tracing_subscriber::EnvFilter;


fn main() -> Result<(), threadwork::SpawnError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let now = Instant::now();
    let items: Vec<u64> = (0..1_000_000).collect();
    let squares = map_parallel_n(Config::cpu_bound().num_threads, |x| x * x, &items)?;
    let total = reduce_parallel(|a: u64, b: u64| a + b, 0, squares[..16].to_vec())?;
    tracing::info!(len = squares.len(), total, elapsed = ?now.elapsed(), "pool map finished");

    let ticks = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&ticks);
    let ticker = Ticker::builder().name("demo-ticker").build(
        move |elapsed| {
            let n = counter.fetch_add(1, Ordering::Relaxed) + 1;
            tracing::info!(tick = n, ?elapsed, "tick");
        },
        Duration::from_millis(100),
    );
    ticker.start();
    thread::sleep(Duration::from_millis(550));
    ticker.stop();

    println!("ticks: {}, metrics: {:?}", ticks.load(Ordering::Relaxed), ticker.metrics());
    Ok(())
}
