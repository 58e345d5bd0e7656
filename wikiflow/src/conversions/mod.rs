//! Pure conversions from fetched changes to output records.

pub mod record;
