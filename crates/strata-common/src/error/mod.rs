//! Error handling for Strata.
//!
//! This module provides a unified error type and result alias used
//! across all Strata components.

mod strata;

pub use strata::{ErrorCode, StrataError};

/// Result type alias for Strata operations.
pub type StrataResult<T> = std::result::Result<T, StrataError>;
