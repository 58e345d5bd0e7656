//! Configuration types for the capture pipeline.
//!
//! The shared types live in the `wikiflow-config` crate so that binaries can
//! deserialize them without depending on the pipeline itself; they are
//! re-exported here for convenience.

pub use wikiflow_config::shared::*;
