//! Error types for PABX billing.
//!
//! The proration calculation itself is total and never returns an error.
//! These errors come from the ingestion boundary, where loosely typed backend
//! records are turned into typed snapshots.

use crate::ids::IdError;

/// Result type for PABX billing operations.
pub type Result<T> = std::result::Result<T, BillingError>;

/// Errors that can occur while building billing inputs.
#[derive(Debug, thiserror::Error)]
pub enum BillingError {
    /// A required field was absent (or null) in the record.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// A monetary amount could not be parsed or was negative.
    #[error("invalid amount for {field}: {value}")]
    InvalidAmount {
        /// The offending field.
        field: &'static str,
        /// The raw value received.
        value: String,
    },

    /// A billing period was not a whole number of days.
    #[error("invalid period for {field}: {value}")]
    InvalidPeriod {
        /// The offending field.
        field: &'static str,
        /// The raw value received.
        value: String,
    },

    /// A timestamp could not be parsed.
    #[error("invalid timestamp for {field}: {value}")]
    InvalidTimestamp {
        /// The offending field.
        field: &'static str,
        /// The raw value received.
        value: String,
    },

    /// Invalid identifier.
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] IdError),
}
