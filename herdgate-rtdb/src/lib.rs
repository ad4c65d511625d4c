//! Realtime-database fan-out for Herdgate.
//!
//! Provides the aggregation core of the service:
//! - [`RtdbClient`] — REST client for one external realtime-database project
//! - [`ProjectRegistry`] — the set of registered project connections
//! - [`Aggregator`] — fan-out reads/writes across every registered project,
//!   the merge-patch modify path, and the single-step undo

pub mod aggregator;
pub mod client;
pub mod error;
pub mod registry;

pub use aggregator::Aggregator;
pub use client::RtdbClient;
pub use error::{RtdbError, RtdbResult};
pub use registry::ProjectRegistry;
