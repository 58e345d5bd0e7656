//! Background workers driving the capture pipeline.

pub mod fetch;
