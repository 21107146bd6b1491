//! Snapshot fetching, normalization and engineer scoring

pub mod normalize;
pub mod provider;
pub mod report;
pub mod scoring;
pub mod stats;

#[cfg(test)]
mod normalize_test;
#[cfg(test)]
mod tests;

pub use provider::{ProviderConfig, SnapshotProvider};
pub use report::Report;
pub use scoring::{combine, score};
