//! # Process-wide default broker.
//!
//! An optional convenience on top of explicit [`Broker`] passing. Nothing is
//! installed until [`install_default`] is called; until then every free
//! function here is a no-op.
//!
//! ## Lifecycle
//! ```text
//! install_default(Broker::start(cap))   (once; later installs are rejected)
//!      │
//!      ├─► incr / gauge / timing / ...  (forward to the default, or no-op)
//!      │
//!      └─► finish_default(deadline)     (single teardown)
//! ```
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let _ = statbroker::install_default(statbroker::Broker::start(1024));
//!     statbroker::incr("boot");
//!     let _ = statbroker::finish_default(Duration::from_secs(1)).await;
//! }
//! ```

use std::sync::OnceLock;
use std::time::{Duration, Instant};

use super::Broker;
use crate::error::BrokerError;

static DEFAULT: OnceLock<Broker> = OnceLock::new();

/// Installs `broker` as the process-wide default.
///
/// # Errors
/// Returns `broker` back if a default is already installed.
pub fn install_default(broker: Broker) -> Result<(), Broker> {
    DEFAULT.set(broker)
}

/// Returns the default broker, if one was installed.
pub fn default_broker() -> Option<&'static Broker> {
    DEFAULT.get()
}

/// Shuts the default broker down.
///
/// A no-op when no default is installed.
///
/// # Errors
/// See [`Broker::finish`].
pub async fn finish_default(deadline: Duration) -> Result<(), BrokerError> {
    match default_broker() {
        Some(b) => b.finish(deadline).await,
        None => Ok(()),
    }
}

/// [`Broker::count`] on the default broker.
pub fn count(name: impl Into<String>, value: i64) {
    if let Some(b) = default_broker() {
        b.count(name, value);
    }
}

/// [`Broker::incr`] on the default broker.
pub fn incr(name: impl Into<String>) {
    count(name, 1);
}

/// [`Broker::gauge`] on the default broker.
pub fn gauge(name: impl Into<String>, value: i64) {
    if let Some(b) = default_broker() {
        b.gauge(name, value);
    }
}

/// [`Broker::on`] on the default broker.
pub fn on(name: impl Into<String>) {
    gauge(name, 1);
}

/// [`Broker::off`] on the default broker.
pub fn off(name: impl Into<String>) {
    gauge(name, 0);
}

/// [`Broker::big_gauge`] on the default broker.
pub fn big_gauge(name: impl Into<String>, value: u64) {
    if let Some(b) = default_broker() {
        b.big_gauge(name, value);
    }
}

/// [`Broker::timing`] on the default broker.
pub fn timing(name: impl Into<String>, millis: i64) {
    if let Some(b) = default_broker() {
        b.timing(name, millis);
    }
}

/// [`Broker::timing_duration`] on the default broker.
pub fn timing_duration(name: impl Into<String>, duration: Duration) {
    if let Some(b) = default_broker() {
        b.timing_duration(name, duration);
    }
}

/// [`Broker::timing_period`] on the default broker.
pub fn timing_period(name: impl Into<String>, start: Instant, end: Instant) {
    if let Some(b) = default_broker() {
        b.timing_period(name, start, end);
    }
}

/// [`Broker::event`] on the default broker.
pub fn event(tag: impl Into<String>, data: impl Into<String>) {
    if let Some(b) = default_broker() {
        b.event(tag, data);
    }
}
