//! # Stats configuration and endpoint bootstrap.
//!
//! Provides [`StatsConfig`], the settings carrier that decides which built-in
//! endpoints to attach to a [`Broker`].
//!
//! ## Flow
//! ```text
//! StatsConfig::default()
//!     .with_prefix("svc")
//!     .with_statsd_addr("127.0.0.1:8125")
//!     .with_graphite("graphite:8080", "user", "pw", false)
//!     .with_runtime_interval(10s)
//!
//! register_stats(&broker):
//!   ├─ prefix?          else MissingPrefix
//!   ├─ statsd addr?     else MissingStatsdAddr
//!   ├─ graphite addr?   else MissingGraphiteAddr
//!   ├─ build StatsdEndpoint + GraphiteEndpoint (nothing registered yet)
//!   └─ register both
//!
//! register_runtime_stats(&broker, token):
//!   ├─ interval?        else MissingRuntimeInterval
//!   └─ spawn reporter   (ZeroRuntimeInterval for 0s)
//! ```
//!
//! ## Sentinel values
//! Empty strings count as unset, so `with_prefix("")` behaves like no prefix.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::core::Broker;
use crate::endpoints::{GraphiteEndpoint, StatsdEndpoint};
use crate::error::ConfigError;
use crate::runtime::report_runtime_stats;

/// Settings for the built-in endpoints.
///
/// ## Field semantics
/// - `prefix`: prepended to every stat name (`<prefix>.<name>`)
/// - `statsd_addr`: `host:port` of the statsd daemon
/// - `graphite_addr`: base URL of the graphite events API
/// - `graphite_user` / `graphite_password`: basic-auth credentials (empty = none)
/// - `graphite_verbose`: log every published event
/// - `runtime_interval`: how often runtime stats are reported
#[derive(Clone, Debug, Default)]
pub struct StatsConfig {
    /// Stat name prefix.
    pub prefix: Option<String>,
    /// Statsd daemon address.
    pub statsd_addr: Option<String>,
    /// Graphite events API address.
    pub graphite_addr: Option<String>,
    /// Graphite basic-auth user.
    pub graphite_user: String,
    /// Graphite basic-auth password.
    pub graphite_password: String,
    /// Log every published graphite event.
    pub graphite_verbose: bool,
    /// Runtime stats reporting interval.
    pub runtime_interval: Option<Duration>,
}

impl StatsConfig {
    /// Sets the stat name prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Sets the statsd daemon address.
    #[must_use]
    pub fn with_statsd_addr(mut self, addr: impl Into<String>) -> Self {
        self.statsd_addr = Some(addr.into());
        self
    }

    /// Sets the graphite events API address and credentials.
    #[must_use]
    pub fn with_graphite(
        mut self,
        addr: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
        verbose: bool,
    ) -> Self {
        self.graphite_addr = Some(addr.into());
        self.graphite_user = user.into();
        self.graphite_password = password.into();
        self.graphite_verbose = verbose;
        self
    }

    /// Sets the runtime stats reporting interval.
    #[must_use]
    pub fn with_runtime_interval(mut self, interval: Duration) -> Self {
        self.runtime_interval = Some(interval);
        self
    }

    /// Returns the prefix, or `""` when unset.
    #[inline]
    pub fn prefix(&self) -> &str {
        self.prefix.as_deref().unwrap_or("")
    }

    /// Returns whether the statsd and graphite addresses are set.
    #[inline]
    pub fn has_stats(&self) -> (bool, bool) {
        (
            non_empty(&self.statsd_addr).is_some(),
            non_empty(&self.graphite_addr).is_some(),
        )
    }

    /// Starts the statsd and graphite endpoints on `broker`.
    ///
    /// All settings are validated and both endpoints are built before either
    /// is registered.
    ///
    /// # Errors
    /// - `MissingPrefix`, `MissingStatsdAddr`, `MissingGraphiteAddr` (checked in that order);
    /// - `Statsd` / `Graphite` if an endpoint cannot be built;
    /// - `Broker` if the broker refuses a registration. The endpoints are two
    ///   separate entries: when the graphite registration is refused because
    ///   the channel filled up, the statsd endpoint stays registered.
    pub async fn register_stats(&self, broker: &Broker) -> Result<(), ConfigError> {
        let prefix = non_empty(&self.prefix).ok_or(ConfigError::MissingPrefix)?;
        let statsd_addr = non_empty(&self.statsd_addr).ok_or(ConfigError::MissingStatsdAddr)?;
        let graphite_addr =
            non_empty(&self.graphite_addr).ok_or(ConfigError::MissingGraphiteAddr)?;

        info!(addr = statsd_addr, prefix, "registering statsd endpoint");
        let statsd = StatsdEndpoint::connect(statsd_addr, prefix)
            .await
            .map_err(ConfigError::Statsd)?;

        info!(addr = graphite_addr, user = %self.graphite_user, "registering graphite endpoint");
        let graphite = GraphiteEndpoint::new(graphite_addr, prefix)
            .map_err(ConfigError::Graphite)?
            .with_credentials(&self.graphite_user, &self.graphite_password)
            .verbose(self.graphite_verbose);

        broker.register_endpoint(statsd)?;
        broker.register_endpoint(graphite)?;
        Ok(())
    }

    /// Starts the runtime stats reporter on `broker`.
    ///
    /// # Errors
    /// - `MissingRuntimeInterval` if no interval is set;
    /// - `ZeroRuntimeInterval` if the interval is zero.
    pub fn register_runtime_stats(
        &self,
        broker: &Broker,
        token: CancellationToken,
    ) -> Result<JoinHandle<()>, ConfigError> {
        let interval = self
            .runtime_interval
            .ok_or(ConfigError::MissingRuntimeInterval)?;
        report_runtime_stats(broker.clone(), interval, token)
    }
}

fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use tokio::net::UdpSocket;

    use super::*;
    use crate::error::BrokerError;

    fn full(statsd: &str) -> StatsConfig {
        StatsConfig::default()
            .with_prefix("svc")
            .with_statsd_addr(statsd)
            .with_graphite("localhost:1", "user", "pw", true)
    }

    #[test]
    fn prefix_defaults_to_empty() {
        assert_eq!(StatsConfig::default().prefix(), "");
        assert_eq!(StatsConfig::default().with_prefix("a").prefix(), "a");
    }

    #[test]
    fn has_stats_reports_each_address() {
        let cfg = StatsConfig::default();
        assert_eq!(cfg.has_stats(), (false, false));

        let cfg = cfg.with_statsd_addr("127.0.0.1:8125");
        assert_eq!(cfg.has_stats(), (true, false));

        let cfg = cfg.with_graphite("graphite", "", "", false);
        assert_eq!(cfg.has_stats(), (true, true));

        let cfg = StatsConfig::default().with_statsd_addr("");
        assert_eq!(cfg.has_stats(), (false, false));
    }

    #[tokio::test]
    async fn missing_settings_are_reported_in_order() {
        let broker = Broker::start(4);

        let err = StatsConfig::default()
            .with_statsd_addr("127.0.0.1:8125")
            .register_stats(&broker)
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingPrefix));

        let err = StatsConfig::default()
            .with_prefix("svc")
            .with_graphite("graphite", "", "", false)
            .register_stats(&broker)
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingStatsdAddr));

        let err = StatsConfig::default()
            .with_prefix("svc")
            .with_statsd_addr("127.0.0.1:8125")
            .register_stats(&broker)
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingGraphiteAddr));
        assert!(err.is_missing_setting());
    }

    #[tokio::test]
    async fn bad_statsd_address_registers_nothing() {
        // Capacity 1: any registration would fill the channel.
        let broker = Broker::start(1);
        let err = full("not an address")
            .register_stats(&broker)
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::Statsd(_)));

        assert_eq!(broker.finish(Duration::from_secs(1)).await, Ok(()));
    }

    #[tokio::test]
    async fn registers_both_endpoints() {
        let daemon = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = daemon.local_addr().unwrap().to_string();

        let broker = Broker::start(8);
        full(&addr).register_stats(&broker).await.unwrap();

        broker.incr("boot");
        assert_eq!(broker.finish(Duration::from_secs(5)).await, Ok(()));

        let mut packet = [0u8; 64];
        let n = tokio::time::timeout(Duration::from_secs(1), daemon.recv(&mut packet))
            .await
            .expect("statsd packet")
            .unwrap();
        assert_eq!(&packet[..n], b"svc.boot:1|c");
    }

    #[tokio::test]
    async fn refused_graphite_leaves_statsd_registered() {
        let daemon = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = daemon.local_addr().unwrap().to_string();

        // Capacity 1 and no yield before both registrations: the statsd entry
        // fills the channel and the graphite entry is refused.
        let broker = Broker::start(1);
        let err = full(&addr).register_stats(&broker).await.unwrap_err();
        assert!(matches!(err, ConfigError::Broker(BrokerError::BufferFull)));

        tokio::time::sleep(Duration::from_millis(10)).await;
        broker.incr("late");
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(broker.finish(Duration::from_secs(5)).await, Ok(()));

        let mut packet = [0u8; 64];
        let n = tokio::time::timeout(Duration::from_secs(1), daemon.recv(&mut packet))
            .await
            .expect("statsd packet")
            .unwrap();
        assert_eq!(&packet[..n], b"svc.late:1|c");
    }

    #[tokio::test]
    async fn runtime_stats_require_interval() {
        let broker = Broker::start(4);
        let token = CancellationToken::new();

        let err = StatsConfig::default()
            .register_runtime_stats(&broker, token.clone())
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingRuntimeInterval));

        let reporter = StatsConfig::default()
            .with_runtime_interval(Duration::from_millis(10))
            .register_runtime_stats(&broker, token.clone())
            .unwrap();
        token.cancel();
        reporter.await.unwrap();
    }
}
