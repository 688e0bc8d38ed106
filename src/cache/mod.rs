//! In-memory response cache
//!
//! Holds raw API response bodies keyed by request URL for a fixed time-to-live.
//! Expired entries are removed by a background sweeper owned by the cache and
//! are never returned by a read, so callers can treat a hit as fresh data.

mod timed;

pub use timed::TimedCache;
