//! # Tagged events.
//!
//! A [`TaggedEvent`] is a free-form annotation ("deploy finished", "cache flushed")
//! rather than a numeric sample. Numeric endpoints such as statsd ignore them;
//! the graphite events endpoint publishes them.
//!
//! ## Example
//! ```rust
//! use statbroker::TaggedEvent;
//!
//! let ev = TaggedEvent::new("deploy", "v1.4.2 rolled out");
//! assert_eq!(ev.tag, "deploy");
//! assert_eq!(ev.data, "v1.4.2 rolled out");
//! ```

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Free-form event identified by a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedEvent {
    /// Short tag describing what happened.
    pub tag: String,
    /// Free-form payload.
    pub data: String,
    /// Wall-clock time the event was created.
    pub when: SystemTime,
}

impl TaggedEvent {
    /// Creates an event stamped with the current wall-clock time.
    pub fn new(tag: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            data: data.into(),
            when: SystemTime::now(),
        }
    }

    /// Overrides the timestamp.
    #[must_use]
    pub fn with_when(mut self, when: SystemTime) -> Self {
        self.when = when;
        self
    }

    /// Seconds since the Unix epoch (0 for timestamps before it).
    #[inline]
    pub fn unix_secs(&self) -> u64 {
        self.when
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_secs_of_fixed_time() {
        let ev = TaggedEvent::new("t", "d")
            .with_when(UNIX_EPOCH + Duration::from_secs(1_700_000_000));
        assert_eq!(ev.unix_secs(), 1_700_000_000);
    }

    #[test]
    fn pre_epoch_clamps_to_zero() {
        let ev = TaggedEvent::new("t", "d").with_when(UNIX_EPOCH - Duration::from_secs(5));
        assert_eq!(ev.unix_secs(), 0);
    }
}
