//! Telemetry setup for wikiflow binaries and tests.

pub mod tracing;
