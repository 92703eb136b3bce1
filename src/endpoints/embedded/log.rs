//! # LogWriter — logs every measurement
//!
//! A minimal endpoint that writes incoming measurements through `tracing`.
//! Use it for tests or demos.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! INFO statbroker: count name="requests" value=1
//! INFO statbroker: gauge name="conns" value=4
//! INFO statbroker: timing name="latency" millis=12
//! INFO statbroker: event tag="deploy" data="v1.4.2"
//! ```

use async_trait::async_trait;
use tracing::info;

use crate::endpoints::{Endpoint, StatStream};
use crate::measures::Measurement;

/// Measurement logger endpoint.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Endpoint for LogWriter {
    async fn run(&mut self, mut stats: StatStream) {
        while let Some(m) = stats.recv().await {
            match m.as_ref() {
                Measurement::Count { name, value } => info!(name = %name, value, "count"),
                Measurement::Gauge { name, value } => info!(name = %name, value, "gauge"),
                Measurement::BigGauge { name, value } => info!(name = %name, value, "big_gauge"),
                Measurement::Timing { name, millis } => info!(name = %name, millis, "timing"),
                Measurement::Event(ev) => info!(tag = %ev.tag, data = %ev.data, "event"),
            }
        }
    }

    fn name(&self) -> &str {
        "LogWriter"
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::Broker;

    #[tokio::test]
    async fn drains_and_returns_on_close() {
        let broker = Broker::start(8);
        broker.register_endpoint(LogWriter::new()).unwrap();
        broker.incr("a");
        broker.event("t", "d");
        assert_eq!(broker.finish(Duration::from_secs(1)).await, Ok(()));
    }
}
