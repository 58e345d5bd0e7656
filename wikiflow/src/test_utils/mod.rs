//! Test doubles and helpers shared between unit and integration tests.

pub mod feed;
pub mod pipeline;
pub mod store;
