//! Shared utilities and common logic for dbassert

pub mod config;
pub mod observability;

pub use config::*;
pub use observability::*;
