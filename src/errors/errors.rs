//! Unified error system for the data-access layer
//!
//! Every fallible operation in this crate returns [`DataResult`], separating
//! caller mistakes (configuration and argument errors, fail fast) from store
//! failures (transport or server-side, possibly transient). Store failures keep
//! the driver error as their `source` so diagnostics survive the mapping.
//!
//! # Examples
//!
//! ```rust,ignore
//! use mongo_data::errors::{DataError, DataResult};
//!
//! fn page_size_of(raw: u64) -> DataResult<u64> {
//!     if raw == 0 {
//!         return Err(DataError::InvalidArgument(
//!             "page_size must be greater than zero".to_string(),
//!         ));
//!     }
//!     Ok(raw)
//! }
//! ```

use thiserror::Error;

/// Error type covering every failure the repository layer can surface.
///
/// No silent recovery is performed anywhere in the crate; each of these
/// reaches the caller unchanged in kind.
#[derive(Error, Debug)]
pub enum DataError {
    /// Empty or missing collection name, malformed connection descriptor.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Invalid paging parameters or other bad call-site input.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A single required record does not exist. Only produced by the
    /// `require_by_id` family; plain lookups return `Ok(None)` instead.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Transport or server-side failure while reading from the store.
    #[error("Read failed on collection '{collection}': {source}")]
    Read {
        collection: String,
        #[source]
        source: mongodb::error::Error,
    },

    /// Transport or server-side failure while writing to the store.
    #[error("Write failed on collection '{collection}': {source}")]
    Write {
        collection: String,
        #[source]
        source: mongodb::error::Error,
    },

    /// One or more members of a batch update failed. Carries the first
    /// member failure; no per-item results are reported.
    #[error("Batch update failed: {0}")]
    BatchFailure(#[source] Box<DataError>),
}

/// Convenience alias used throughout the crate.
pub type DataResult<T> = Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_configuration_display() {
        let error = DataError::InvalidConfiguration("collection name cannot be empty".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid configuration: collection name cannot be empty"
        );
    }

    #[test]
    fn test_invalid_argument_display() {
        let error = DataError::InvalidArgument("page_size must be greater than zero".to_string());
        assert!(error.to_string().starts_with("Invalid argument:"));
    }

    #[test]
    fn test_not_found_display() {
        let error = DataError::NotFound("no TestCustomers document with id 000".to_string());
        assert!(error.to_string().contains("Not found"));
    }

    #[test]
    fn test_batch_failure_wraps_member_error() {
        let member = DataError::InvalidArgument("bad entity".to_string());
        let error = DataError::BatchFailure(Box::new(member));

        assert!(error.to_string().contains("Batch update failed"));
        assert!(std::error::Error::source(&error).is_some());
    }
}
