//! # Runtime stats reporter.
//!
//! Periodically samples the Tokio runtime the reporter runs on and sends the
//! samples as gauges through a [`Broker`].
//!
//! ## Gauges
//! | Name                         | Source                                   |
//! |------------------------------|------------------------------------------|
//! | `runtime.workers`            | `RuntimeMetrics::num_workers`            |
//! | `runtime.alive_tasks`        | `RuntimeMetrics::num_alive_tasks`        |
//! | `runtime.global_queue_depth` | `RuntimeMetrics::global_queue_depth`     |
//!
//! The reporter stops when its [`CancellationToken`] is cancelled.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::Broker;
use crate::error::ConfigError;

/// One sample of runtime metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeSnapshot {
    /// Worker threads of the runtime.
    pub workers: usize,
    /// Tasks spawned and not yet completed.
    pub alive_tasks: usize,
    /// Tasks waiting in the global injection queue.
    pub global_queue_depth: usize,
}

impl RuntimeSnapshot {
    /// Samples the runtime behind `handle`.
    pub fn capture(handle: &Handle) -> Self {
        let metrics = handle.metrics();
        Self {
            workers: metrics.num_workers(),
            alive_tasks: metrics.num_alive_tasks(),
            global_queue_depth: metrics.global_queue_depth(),
        }
    }

    /// Sends the sample as `runtime.*` gauges.
    pub fn report(&self, broker: &Broker) {
        broker.gauge("runtime.workers", saturating_i64(self.workers));
        broker.gauge("runtime.alive_tasks", saturating_i64(self.alive_tasks));
        broker.gauge(
            "runtime.global_queue_depth",
            saturating_i64(self.global_queue_depth),
        );
    }
}

/// Spawns the reporter on the current runtime.
///
/// # Errors
/// [`ConfigError::ZeroRuntimeInterval`] if `interval` is zero.
///
/// # Panics
/// Panics if called outside a Tokio runtime.
pub fn report_runtime_stats(
    broker: Broker,
    interval: Duration,
    token: CancellationToken,
) -> Result<JoinHandle<()>, ConfigError> {
    if interval.is_zero() {
        return Err(ConfigError::ZeroRuntimeInterval);
    }
    let handle = Handle::current();

    Ok(tokio::spawn(async move {
        let mut ticker = time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        debug!(?interval, "runtime stats reporter started");

        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticker.tick() => RuntimeSnapshot::capture(&handle).report(&broker),
            }
        }
        debug!("runtime stats reporter stopped");
    }))
}

fn saturating_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::broker::tests::collector;
    use crate::measures::Measurement;

    #[tokio::test]
    async fn zero_interval_is_rejected() {
        let broker = Broker::start(4);
        let err = report_runtime_stats(broker, Duration::ZERO, CancellationToken::new())
            .unwrap_err();
        assert!(matches!(err, ConfigError::ZeroRuntimeInterval));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn reports_gauges_until_cancelled() {
        let broker = Broker::start(64);
        let (ep, seen) = collector("runtime");
        broker.register_endpoint(ep).unwrap();

        let token = CancellationToken::new();
        let reporter =
            report_runtime_stats(broker.clone(), Duration::from_millis(5), token.clone()).unwrap();
        time::sleep(Duration::from_millis(30)).await;
        token.cancel();
        reporter.await.unwrap();

        broker.finish(Duration::from_secs(1)).await.unwrap();
        let seen = seen.await.unwrap();

        assert!(seen.contains(&Measurement::gauge("runtime.workers", 2)));
        assert!(seen.iter().any(|m| m.name() == "runtime.alive_tasks"));
        assert!(seen.iter().any(|m| m.name() == "runtime.global_queue_depth"));
    }

    #[test]
    fn snapshot_of_current_thread_runtime() {
        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let snap = RuntimeSnapshot::capture(rt.handle());
        assert_eq!(snap.workers, 1);
        assert_eq!(snap.alive_tasks, 0);
    }
}
