//! Convenience result type alias for StableHub.

use crate::error::AppError;

/// A specialized `Result` type for StableHub operations.
pub type AppResult<T> = Result<T, AppError>;
