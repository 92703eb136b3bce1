//! # StatsdEndpoint — statsd line protocol over UDP
//!
//! Formats numeric measurements as statsd lines and ships them in buffered
//! UDP packets. Tagged events have no statsd representation and are skipped.
//!
//! ## Wire format
//! ```text
//! <prefix>.<name>:<value>|c     Count
//! <prefix>.<name>:<value>|g     Gauge, BigGauge
//! <prefix>.<name>:<value>|ms    Timing
//! ```
//! Lines are joined with `\n`. A packet is flushed when the next line would
//! exceed [`MAX_PACKET_SIZE`], on every flush tick, and when the stream ends.

use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::{UdpSocket, lookup_host};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, warn};

use crate::endpoints::{Endpoint, StatStream};
use crate::measures::Measurement;

/// Largest payload put into a single datagram (fits a 1500-byte MTU).
pub const MAX_PACKET_SIZE: usize = 1432;

/// Default interval between flushes of a partially filled packet.
pub const DEFAULT_FLUSH_PERIOD: Duration = Duration::from_millis(100);

/// Endpoint forwarding numeric measurements to a statsd daemon.
pub struct StatsdEndpoint {
    socket: UdpSocket,
    prefix: String,
    flush_period: Duration,
}

impl StatsdEndpoint {
    /// Resolves `addr`, binds an ephemeral local socket of the same family and connects it.
    ///
    /// # Errors
    /// Returns the I/O error if resolution, bind or connect fails.
    pub async fn connect(addr: &str, prefix: impl Into<String>) -> io::Result<Self> {
        let target = lookup_host(addr).await?.next().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no address for {addr}"))
        })?;

        let local: SocketAddr = if target.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(local).await?;
        socket.connect(target).await?;
        debug!(addr = %target, "statsd socket connected");

        Ok(Self {
            socket,
            prefix: prefix.into(),
            flush_period: DEFAULT_FLUSH_PERIOD,
        })
    }

    /// Sets how often a partially filled packet is flushed.
    #[must_use]
    pub fn with_flush_period(mut self, period: Duration) -> Self {
        if !period.is_zero() {
            self.flush_period = period;
        }
        self
    }

    async fn flush(&self, buf: &mut String) {
        if buf.is_empty() {
            return;
        }
        if let Err(e) = self.socket.send(buf.as_bytes()).await {
            warn!(error = %e, bytes = buf.len(), "statsd send failed");
        }
        buf.clear();
    }
}

#[async_trait]
impl Endpoint for StatsdEndpoint {
    async fn run(&mut self, mut stats: StatStream) {
        let mut buf = String::with_capacity(MAX_PACKET_SIZE);
        let mut ticker = time::interval(self.flush_period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                next = stats.recv() => {
                    let Some(m) = next else { break };
                    let Some(line) = format_line(&self.prefix, &m) else { continue };
                    if !buf.is_empty() && buf.len() + 1 + line.len() > MAX_PACKET_SIZE {
                        self.flush(&mut buf).await;
                    }
                    if !buf.is_empty() {
                        buf.push('\n');
                    }
                    buf.push_str(&line);
                }
                _ = ticker.tick() => self.flush(&mut buf).await,
            }
        }
        self.flush(&mut buf).await;
    }

    fn name(&self) -> &str {
        "statsd"
    }
}

/// Formats one measurement as a statsd line; `None` for tagged events.
pub(crate) fn format_line(prefix: &str, m: &Measurement) -> Option<String> {
    let (name, value, kind) = match m {
        Measurement::Count { name, value } => (name, value.to_string(), "c"),
        Measurement::Gauge { name, value } => (name, value.to_string(), "g"),
        Measurement::BigGauge { name, value } => (name, value.to_string(), "g"),
        Measurement::Timing { name, millis } => (name, millis.to_string(), "ms"),
        Measurement::Event(_) => return None,
    };

    Some(if prefix.is_empty() {
        format!("{name}:{value}|{kind}")
    } else {
        format!("{prefix}.{name}:{value}|{kind}")
    })
}
