//! Concurrency utilities for coordinating the capture pipeline.
//!
//! The pipeline runs exactly one background fetch worker, while the drain path
//! is driven by an external caller on its own schedule. The two meet on the
//! [`staging::StagingBuffer`], the only shared mutable resource in the system,
//! and are torn down through the broadcast signal in [`shutdown`].

pub mod shutdown;
pub mod staging;
