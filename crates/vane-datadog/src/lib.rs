//! vane-datadog — gauge submission to the Datadog v1 series API.
//!
//! One POST per sample, in slice order, with the submission timestamp taken
//! at send time. Also exposes a startup credential check against
//! `/api/v1/validate`.

pub mod client;

pub use client::{DEFAULT_BASE_URL, DatadogClient};
