//! Convenience result type alias for LexDesk.

use crate::error::AppError;

/// A specialized `Result` type for LexDesk operations.
pub type AppResult<T> = Result<T, AppError>;
