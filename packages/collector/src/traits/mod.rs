//! Core trait abstractions for the collector library.
//!
//! These traits define the interfaces that hosts implement to provide
//! text generation and persistence.

pub mod ai;
pub mod store;
