//! # Endpoints: consumers of the broker's measurement stream.
//!
//! This module provides the [`Endpoint`] trait, the closure adapter
//! [`EndpointFn`], the [`StatStream`] each endpoint reads from, and the
//! built-in endpoints.
//!
//! ## Architecture
//! ```text
//! Fan-out loop ── try_send(Arc<Measurement>) ──► [private queue] ──► runner task
//!                                                                     │
//!                                                   endpoint.run(StatStream)
//!                                                                     │
//!                                        ┌────────────┬───────────────┼──────────┐
//!                                        ▼            ▼               ▼          ▼
//!                                  StatsdEndpoint  GraphiteEndpoint  LogWriter  Custom
//! ```
//!
//! ## Implementing custom endpoints
//! ```no_run
//! use async_trait::async_trait;
//! use statbroker::{Endpoint, Measurement, StatStream};
//!
//! struct Printer;
//!
//! #[async_trait]
//! impl Endpoint for Printer {
//!     async fn run(&mut self, mut stats: StatStream) {
//!         while let Some(m) = stats.recv().await {
//!             if let Measurement::Count { name, value } = m.as_ref() {
//!                 println!("{name} += {value}");
//!             }
//!         }
//!     }
//!
//!     fn name(&self) -> &str { "printer" }
//! }
//! ```

mod embedded;
mod endpoint;
mod endpoint_fn;
mod stream;

pub use embedded::{GraphiteEndpoint, StatsdEndpoint};
#[cfg(feature = "logging")]
pub use embedded::LogWriter;
pub use endpoint::Endpoint;
pub use endpoint_fn::EndpointFn;
pub use stream::StatStream;
