//! Metric reporter: flattens nested cluster telemetry into dot-named metrics
//! and ships the allowed ones to a time-series backend.

mod app;
pub mod core;
pub mod data;
pub mod domain;
pub mod utils;
