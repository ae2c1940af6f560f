//! Core type definitions
//!
//! Strongly-typed account handles, repository records, and the filter
//! criteria the catalog operations consume.

pub mod filter;
pub mod repository;

pub use filter::*;
pub use repository::*;
