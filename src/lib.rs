//! avatar-relay library crate.
//!
//! This module exposes the provider adapters, the fallback orchestrator and
//! configuration loading for the binary and for integration testing.

pub mod avatar;
pub mod config;
