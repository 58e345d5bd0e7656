//! Checkpoint state: offset payloads, the store contract, and resumption.

pub mod memory;
pub mod offset;
