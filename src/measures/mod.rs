//! Measurement data model.
//!
//! ## Contents
//! - [`Measurement`] the closed set of stats a producer can emit
//! - [`TaggedEvent`] free-form tagged event payload (carried by [`Measurement::Event`])
//!
//! Measurements are immutable once built. The broker wraps each one in an
//! `Arc` before fan-out, so every endpoint reads the same allocation.

mod measurement;
mod tagged;

pub use measurement::Measurement;
pub use tagged::TaggedEvent;
