//! # statbroker
//!
//! **statbroker** is a lightweight in-process stats bus for Rust.
//!
//! Application code emits counters, gauges, timings and tagged events without
//! knowing which backends, if any, are attached. A [`Broker`] receives them and
//! fans them out to registered [`Endpoint`]s, each running on its own task and
//! forwarding data to an external system at its own pace.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  producer #1 │   │  producer #2 │   │  producer #3 │
//!     │ incr/gauge/… │   │ timing/…     │   │ event/…      │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │              Broker inbound channel (bounded, ordered)            │
//! │       Stat(m) | Register(endpoint) | Shutdown(oneshot)            │
//! │           full → send drops, register/finish → BufferFull         │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                       ┌────────────────────────┐
//!                       │      fan-out loop      │
//!                       │ (owns endpoint list)   │
//!                       └───┬────────┬───────┬───┘
//!                   try_send│        │       │
//!                           ▼        ▼       ▼
//!                      [queue E1] [queue E2] [queue EN]   (private, bounded)
//!                           ▼        ▼       ▼
//!                       runner E1 runner E2 runner EN
//!                           ▼        ▼       ▼
//!                        statsd  graphite  custom
//! ```
//!
//! ### Shutdown
//! ```text
//! finish(deadline)
//!   ├─► enqueue Shutdown(tx)          (ordered after every earlier entry)
//!   └─► fan-out loop:
//!         ├─ close inbound channel    (later entries are discarded)
//!         ├─ close every endpoint queue
//!         ├─ join every runner        (endpoints drain their backlog and return)
//!         └─ tx.send(())
//! caller: Ok(()) on completion, DeadlineExceeded if the deadline wins
//!         (the drain keeps going in the background)
//! ```
//!
//! ## Features
//! | Area              | Description                                                     | Key types / functions                        |
//! |-------------------|-----------------------------------------------------------------|----------------------------------------------|
//! | **Broker**        | Non-blocking fan-out, ordered registration and shutdown.        | [`Broker`]                                   |
//! | **Endpoints**     | Plug sinks into the stream.                                     | [`Endpoint`], [`EndpointFn`], [`StatStream`] |
//! | **Built-ins**     | statsd over UDP, graphite events over HTTP.                     | [`StatsdEndpoint`], [`GraphiteEndpoint`]     |
//! | **Runtime stats** | Periodic Tokio runtime gauges.                                  | [`report_runtime_stats`]                     |
//! | **Configuration** | Validate settings and start the built-ins.                      | [`StatsConfig`]                              |
//! | **Default**       | Optional process-wide broker with free functions.               | [`install_default`], [`incr`], …             |
//! | **Errors**        | Typed errors for lifecycle calls and bootstrap.                 | [`BrokerError`], [`ConfigError`]             |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] endpoint _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use statbroker::{Broker, EndpointFn, Measurement, StatStream};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let broker = Broker::start(1024);
//!
//!     let (tx, rx) = tokio::sync::oneshot::channel();
//!     broker.register_endpoint(EndpointFn::new("collect", |mut stats: StatStream| async move {
//!         let mut total = 0;
//!         while let Some(m) = stats.recv().await {
//!             if let Measurement::Count { value, .. } = m.as_ref() {
//!                 total += value;
//!             }
//!         }
//!         let _ = tx.send(total);
//!     }))?;
//!
//!     broker.incr("requests");
//!     broker.count("requests", 4);
//!     broker.finish(Duration::from_secs(1)).await?;
//!
//!     assert_eq!(rx.await?, 5);
//!     Ok(())
//! }
//! ```
mod config;
mod core;
mod endpoints;
mod error;
mod measures;
mod runtime;

// ---- Public re-exports ----

pub use config::StatsConfig;
pub use crate::core::Broker;
pub use crate::core::default::{
    big_gauge, count, default_broker, event, finish_default, gauge, incr, install_default, off,
    on, timing, timing_duration, timing_period,
};
pub use endpoints::{Endpoint, EndpointFn, GraphiteEndpoint, StatStream, StatsdEndpoint};
pub use error::{BrokerError, ConfigError};
pub use measures::{Measurement, TaggedEvent};
pub use runtime::{RuntimeSnapshot, report_runtime_stats};

// Optional: expose a simple built-in logger endpoint (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use endpoints::LogWriter;
