//! Error types used by the broker and its configuration layer.
//!
//! This module defines two enums:
//!
//! - [`BrokerError`] — errors returned synchronously by broker lifecycle calls.
//! - [`ConfigError`] — errors returned when starting endpoints from a [`StatsConfig`](crate::StatsConfig).
//!
//! Both provide `as_label` for logs. Measurement submission has no error type:
//! [`Broker::send`](crate::Broker::send) is lossy by contract.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced by broker lifecycle calls.
///
/// None of these are retried internally; the caller picks its own retry policy.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BrokerError {
    /// The broker's inbound channel is at capacity.
    #[error("stats activity buffer full")]
    BufferFull,

    /// The drain did not complete before the caller's deadline.
    ///
    /// The drain itself keeps running in the background.
    #[error("broker drain exceeded deadline of {deadline:?}")]
    DeadlineExceeded {
        /// The deadline that elapsed.
        deadline: Duration,
    },

    /// The broker has stopped accepting entries (shutdown accepted or loop gone).
    #[error("broker closed")]
    Closed,
}

impl BrokerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use statbroker::BrokerError;
    ///
    /// assert_eq!(BrokerError::BufferFull.as_label(), "broker_buffer_full");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            BrokerError::BufferFull => "broker_buffer_full",
            BrokerError::DeadlineExceeded { .. } => "broker_deadline_exceeded",
            BrokerError::Closed => "broker_closed",
        }
    }
}

/// # Errors produced while starting endpoints from configuration.
///
/// Missing-field errors are checked before anything is started.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No stat name prefix configured.
    #[error("no prefix, not starting stats endpoints")]
    MissingPrefix,

    /// No statsd address configured.
    #[error("no statsd address, not starting stats endpoints")]
    MissingStatsdAddr,

    /// No graphite address configured.
    #[error("no graphite address, not starting stats endpoints")]
    MissingGraphiteAddr,

    /// No runtime stats interval configured.
    #[error("no runtime interval, not reporting runtime stats")]
    MissingRuntimeInterval,

    /// Runtime stats interval is zero.
    #[error("runtime interval must be non-zero")]
    ZeroRuntimeInterval,

    /// The statsd socket could not be resolved, bound or connected.
    #[error("statsd endpoint setup failed: {0}")]
    Statsd(#[source] std::io::Error),

    /// The graphite HTTP client could not be built.
    #[error("graphite endpoint setup failed: {0}")]
    Graphite(#[source] reqwest::Error),

    /// The broker refused the registration.
    #[error(transparent)]
    Broker(#[from] BrokerError),
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::MissingPrefix => "config_missing_prefix",
            ConfigError::MissingStatsdAddr => "config_missing_statsd_addr",
            ConfigError::MissingGraphiteAddr => "config_missing_graphite_addr",
            ConfigError::MissingRuntimeInterval => "config_missing_runtime_interval",
            ConfigError::ZeroRuntimeInterval => "config_zero_runtime_interval",
            ConfigError::Statsd(_) => "config_statsd_setup",
            ConfigError::Graphite(_) => "config_graphite_setup",
            ConfigError::Broker(e) => e.as_label(),
        }
    }

    /// True for the errors caused by absent settings (as opposed to I/O or broker failures).
    pub fn is_missing_setting(&self) -> bool {
        matches!(
            self,
            ConfigError::MissingPrefix
                | ConfigError::MissingStatsdAddr
                | ConfigError::MissingGraphiteAddr
                | ConfigError::MissingRuntimeInterval
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broker_error_wraps_transparently() {
        let err = ConfigError::from(BrokerError::BufferFull);
        assert_eq!(err.to_string(), "stats activity buffer full");
        assert_eq!(err.as_label(), "broker_buffer_full");
        assert!(!err.is_missing_setting());
    }

    #[test]
    fn deadline_message_names_the_deadline() {
        let err = BrokerError::DeadlineExceeded {
            deadline: Duration::from_millis(100),
        };
        assert_eq!(err.to_string(), "broker drain exceeded deadline of 100ms");
    }
}
