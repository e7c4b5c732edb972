//! Data types for the collector library.

pub mod collection;
pub mod config;
pub mod record;
