//! Readiness scoring for contractor cost estimates.
//!
//! The [`readiness`] module holds the pure scoring engine together with the
//! property store and remote-service seams that surround it. Configuration,
//! telemetry and the application error type live alongside so the API binary
//! can share them.

pub mod config;
pub mod error;
pub mod readiness;
pub mod telemetry;
