//! # Middleware
//!
//! Request counters and per-request tracing spans.

pub mod metrics;
pub mod tracing_layer;
