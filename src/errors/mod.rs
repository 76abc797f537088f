//! Crate-wide error types
//!
//! See [`errors::DataError`] for the full taxonomy.

pub mod errors;

pub use errors::{DataError, DataResult};
