pub mod concurrency;
pub mod config;
pub mod conversions;
pub mod error;
pub mod feed;
mod macros;
pub mod pipeline;
pub mod state;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod types;
pub mod workers;
