//! Common types and utilities for the engineer impact report

pub mod config;
pub mod error;
pub mod models;
pub mod snapshot;

pub use config::Config;
pub use error::{Error, Result};
