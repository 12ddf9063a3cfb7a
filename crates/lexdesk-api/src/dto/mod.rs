//! Request and response DTOs.

pub mod request;
pub mod response;

use validator::Validate;

use lexdesk_core::error::AppError;

/// Runs `validator` rules on a request body.
pub fn validated<T: Validate>(req: T) -> Result<T, AppError> {
    req.validate()
        .map_err(|e| AppError::validation(format!("Invalid request: {e}")))?;
    Ok(req)
}
