//! Upstream feed access: the HTTP client seam and the paginated fetch loop.

pub mod client;
pub mod fetcher;
