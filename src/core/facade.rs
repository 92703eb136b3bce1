//! Typed producer helpers.
//!
//! Every helper builds a [`Measurement`] and hands it to [`Broker::send`]; none
//! of them can fail or block.

use std::time::{Duration, Instant};

use super::Broker;
use crate::measures::{Measurement, TaggedEvent};

impl Broker {
    /// Sends a count for `name`.
    pub fn count(&self, name: impl Into<String>, value: i64) {
        self.send(Measurement::count(name, value));
    }

    /// Increments a count by 1.
    pub fn incr(&self, name: impl Into<String>) {
        self.count(name, 1);
    }

    /// Sends a gauge value for `name`.
    pub fn gauge(&self, name: impl Into<String>, value: i64) {
        self.send(Measurement::gauge(name, value));
    }

    /// Sends a gauge of 1.
    pub fn on(&self, name: impl Into<String>) {
        self.gauge(name, 1);
    }

    /// Sends a gauge of 0.
    pub fn off(&self, name: impl Into<String>) {
        self.gauge(name, 0);
    }

    /// Sends a gauge value too large for `i64`.
    pub fn big_gauge(&self, name: impl Into<String>, value: u64) {
        self.send(Measurement::big_gauge(name, value));
    }

    /// Sends a timing in milliseconds.
    pub fn timing(&self, name: impl Into<String>, millis: i64) {
        self.send(Measurement::timing(name, millis));
    }

    /// Sends a timing for `duration`, truncated to whole milliseconds.
    pub fn timing_duration(&self, name: impl Into<String>, duration: Duration) {
        self.timing(name, duration_millis(duration));
    }

    /// Sends a timing for the span between `start` and `end` (zero if `end` is earlier).
    pub fn timing_period(&self, name: impl Into<String>, start: Instant, end: Instant) {
        self.timing_duration(name, end.saturating_duration_since(start));
    }

    /// Sends a tagged event stamped with the current time.
    pub fn event(&self, tag: impl Into<String>, data: impl Into<String>) {
        self.send_event(TaggedEvent::new(tag, data));
    }

    /// Sends a pre-built tagged event.
    pub fn send_event(&self, event: TaggedEvent) {
        self.send(Measurement::Event(event));
    }
}

/// Whole milliseconds, saturating at `i64::MAX`.
pub(crate) fn duration_millis(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::broker::tests::collector;

    #[test]
    fn duration_millis_truncates_and_saturates() {
        assert_eq!(duration_millis(Duration::from_micros(1_999)), 1);
        assert_eq!(duration_millis(Duration::from_secs(2)), 2_000);
        assert_eq!(duration_millis(Duration::MAX), i64::MAX);
    }

    #[tokio::test]
    async fn helpers_build_expected_measurements() {
        let broker = Broker::start(32);
        let (ep, seen) = collector("all");
        broker.register_endpoint(ep).unwrap();

        let start = Instant::now();
        broker.count("c", 5);
        broker.on("flag");
        broker.off("flag");
        broker.big_gauge("bytes", u64::MAX);
        broker.timing_duration("d", Duration::from_millis(250));
        broker.timing_period("p", start + Duration::from_millis(40), start);
        broker.timing_period("q", start, start + Duration::from_millis(40));

        broker.finish(Duration::from_secs(1)).await.unwrap();
        assert_eq!(
            seen.await.unwrap(),
            vec![
                Measurement::count("c", 5),
                Measurement::gauge("flag", 1),
                Measurement::gauge("flag", 0),
                Measurement::big_gauge("bytes", u64::MAX),
                Measurement::timing("d", 250),
                Measurement::timing("p", 0),
                Measurement::timing("q", 40),
            ]
        );
    }

    #[tokio::test]
    async fn event_carries_tag_and_data() {
        let broker = Broker::start(4);
        let (ep, seen) = collector("events");
        broker.register_endpoint(ep).unwrap();

        broker.event("deploy", "v2");
        broker.finish(Duration::from_secs(1)).await.unwrap();

        let seen = seen.await.unwrap();
        match seen.as_slice() {
            [Measurement::Event(ev)] => {
                assert_eq!(ev.tag, "deploy");
                assert_eq!(ev.data, "v2");
            }
            other => panic!("unexpected measurements: {other:?}"),
        }
    }
}
