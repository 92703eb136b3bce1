//! # Measurements emitted by producers.
//!
//! [`Measurement`] is a closed enum; endpoints dispatch on it with `match`.
//!
//! | Variant      | Payload            | statsd suffix |
//! |--------------|--------------------|---------------|
//! | `Count`      | `i64` delta        | `c`           |
//! | `Gauge`      | `i64` absolute     | `g`           |
//! | `BigGauge`   | `u64` absolute     | `g`           |
//! | `Timing`     | `i64` milliseconds | `ms`          |
//! | `Event`      | [`TaggedEvent`]    | (not sent)    |
//!
//! ## Example
//! ```rust
//! use statbroker::Measurement;
//!
//! let m = Measurement::count("requests", 1);
//! assert_eq!(m.name(), "requests");
//! assert_eq!(m.as_label(), "count");
//! ```

use super::TaggedEvent;

/// A single stat produced by application code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Measurement {
    /// Counter delta.
    Count {
        /// Stat name (without prefix).
        name: String,
        /// Amount to add.
        value: i64,
    },

    /// Gauge value.
    Gauge {
        /// Stat name (without prefix).
        name: String,
        /// Current value.
        value: i64,
    },

    /// Gauge value exceeding the signed range (byte counts, totals).
    BigGauge {
        /// Stat name (without prefix).
        name: String,
        /// Current value.
        value: u64,
    },

    /// Duration in whole milliseconds.
    Timing {
        /// Stat name (without prefix).
        name: String,
        /// Elapsed milliseconds.
        millis: i64,
    },

    /// Free-form tagged event.
    Event(TaggedEvent),
}

impl Measurement {
    /// Builds a [`Measurement::Count`].
    pub fn count(name: impl Into<String>, value: i64) -> Self {
        Self::Count {
            name: name.into(),
            value,
        }
    }

    /// Builds a [`Measurement::Gauge`].
    pub fn gauge(name: impl Into<String>, value: i64) -> Self {
        Self::Gauge {
            name: name.into(),
            value,
        }
    }

    /// Builds a [`Measurement::BigGauge`].
    pub fn big_gauge(name: impl Into<String>, value: u64) -> Self {
        Self::BigGauge {
            name: name.into(),
            value,
        }
    }

    /// Builds a [`Measurement::Timing`].
    pub fn timing(name: impl Into<String>, millis: i64) -> Self {
        Self::Timing {
            name: name.into(),
            millis,
        }
    }

    /// Builds a [`Measurement::Event`] stamped with the current time.
    pub fn event(tag: impl Into<String>, data: impl Into<String>) -> Self {
        Self::Event(TaggedEvent::new(tag, data))
    }

    /// Stat name, or the tag for events.
    pub fn name(&self) -> &str {
        match self {
            Self::Count { name, .. }
            | Self::Gauge { name, .. }
            | Self::BigGauge { name, .. }
            | Self::Timing { name, .. } => name,
            Self::Event(ev) => &ev.tag,
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::Count { .. } => "count",
            Self::Gauge { .. } => "gauge",
            Self::BigGauge { .. } => "big_gauge",
            Self::Timing { .. } => "timing",
            Self::Event(_) => "event",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_name_is_its_tag() {
        let m = Measurement::event("deploy", "v2");
        assert_eq!(m.name(), "deploy");
        assert_eq!(m.as_label(), "event");
    }

    #[test]
    fn constructors_keep_payload() {
        assert_eq!(
            Measurement::big_gauge("bytes", u64::MAX),
            Measurement::BigGauge {
                name: "bytes".into(),
                value: u64::MAX
            }
        );
        assert_eq!(Measurement::timing("t", 12).name(), "t");
    }
}
