//! Built-in endpoints.
//!
//! - [`StatsdEndpoint`]: statsd line protocol over UDP
//! - [`GraphiteEndpoint`]: tagged events to the graphite events HTTP API
//! - [`LogWriter`]: logs every measurement through `tracing` (`logging` feature)

mod graphite;
#[cfg(feature = "logging")]
mod log;
mod statsd;

pub use graphite::GraphiteEndpoint;
#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use statsd::StatsdEndpoint;
