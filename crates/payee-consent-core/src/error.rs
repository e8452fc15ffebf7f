//! # Validation Errors
//!
//! Raised when a caller-supplied record violates a business rule that
//! serde alone cannot express.

use thiserror::Error;

/// Validation failure for caller-supplied consent records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A request carried no access items.
    #[error("at least one access item is required")]
    NoItems,

    /// An access item was missing its purpose.
    #[error("access item {index} has an empty purposeId")]
    EmptyPurpose { index: usize },

    /// A required identifier was blank.
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
}
