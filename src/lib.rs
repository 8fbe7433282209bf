//! Round-trip latency probe for the Polymarket CLOB REST API.
//!
//! One run resolves a liquid probe target (manual `TOKEN_ID` override or
//! discovery against the Gamma listings API), times a fixed number of
//! sequential GETs against the `/book`, `/price` and `/midpoint` endpoints,
//! and writes min/mean/p95 per endpoint plus the full measurement log to a
//! JSON result file.

pub mod config;
pub mod discovery;
pub mod error;
pub mod probe;
pub mod report;
pub mod runner;
pub mod stats;
pub mod types;

pub use crate::config::ProbeConfig;
pub use crate::error::RunError;
pub use crate::runner::Runner;
