//! # Example: basic
//!
//! Starts a broker, attaches a closure endpoint that aggregates counters, emits
//! a few stats and shuts down.
//!
//! ## Flow
//! ```text
//! Broker::start(64)
//!     ├─► register_endpoint(EndpointFn "totals")
//!     ├─► incr / count / timing_period / event
//!     └─► finish(1s) ──► endpoint drains and returns its totals
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example basic
//! ```

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use statbroker::{Broker, EndpointFn, Measurement, StatStream};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let broker = Broker::start(64);

    let (tx, rx) = tokio::sync::oneshot::channel();
    broker.register_endpoint(EndpointFn::new("totals", |mut stats: StatStream| async move {
        let mut totals: BTreeMap<String, i64> = BTreeMap::new();
        while let Some(m) = stats.recv().await {
            match m.as_ref() {
                Measurement::Count { name, value } => {
                    *totals.entry(name.clone()).or_default() += value;
                }
                Measurement::Timing { name, millis } => println!("[timing] {name} = {millis}ms"),
                Measurement::Event(ev) => println!("[event] {} {}", ev.tag, ev.data),
                _ => {}
            }
        }
        let _ = tx.send(totals);
    }))?;

    let started = Instant::now();
    for _ in 0..3 {
        broker.incr("requests");
    }
    broker.count("bytes", 512);
    tokio::time::sleep(Duration::from_millis(20)).await;
    broker.timing_period("work", started, Instant::now());
    broker.event("demo", "finished");

    broker.finish(Duration::from_secs(1)).await?;
    for (name, total) in rx.await? {
        println!("[total] {name} = {total}");
    }
    Ok(())
}
