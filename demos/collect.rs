//! # Example: collect
//!
//! Installs a default broker with the built-in [`LogWriter`] endpoint and the
//! runtime stats reporter, then uses the free-function facade.
//!
//! ## Run
//! Requires the `logging` feature.
//! ```bash
//! RUST_LOG=info cargo run --example collect --features logging
//! ```

use std::time::Duration;

use statbroker::{Broker, LogWriter, StatsConfig};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let broker = Broker::start(1024);
    broker.register_endpoint(LogWriter::new())?;
    if statbroker::install_default(broker.clone()).is_err() {
        return Err("default broker already installed".into());
    }

    let token = CancellationToken::new();
    let cfg = StatsConfig::default()
        .with_prefix("demo")
        .with_runtime_interval(Duration::from_millis(100));
    let reporter = cfg.register_runtime_stats(&broker, token.clone())?;

    // statsd/graphite are not configured here, so this reports why nothing starts.
    if let Err(e) = cfg.register_stats(&broker).await {
        println!("[config] {e} ({})", e.as_label());
    }

    for i in 0..5 {
        statbroker::incr("ticks");
        statbroker::gauge("level", i);
        tokio::time::sleep(Duration::from_millis(60)).await;
    }
    statbroker::event("demo", "done");

    token.cancel();
    reporter.await?;
    statbroker::finish_default(Duration::from_secs(1)).await?;
    Ok(())
}
