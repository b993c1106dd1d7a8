//! vane-poller — drives the fetch-submit-sleep cycle.
//!
//! The loop is a single task selecting between its inter-cycle sleep and a
//! `watch`-channel shutdown signal, so termination interrupts the sleep
//! instead of waiting out a full interval. Consecutive fetch failures back
//! off geometrically; any success snaps the delay back to the base interval.

pub mod backoff;
pub mod poller;

pub use backoff::FetchBackoff;
pub use poller::Poller;
