/// API route handlers
///
/// Organized by resource:
///
/// - `health`: Service banner and health check
/// - `auth`: Registration, login and the current user
/// - `bills`: Customer bills and payment
/// - `tasks`: Installation tasks for engineers

pub mod auth;
pub mod bills;
pub mod health;
pub mod tasks;

use crate::error::ApiError;
use uuid::Uuid;

/// Parses an id path segment; anything that is not a UUID cannot exist
pub(crate) fn parse_id(raw: &str, what: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound(format!("{} not found", what)))
}

/// Rejects values that are not exactly ten ASCII digits
pub(crate) fn validate_mobile(mobile: &str) -> Result<(), validator::ValidationError> {
    if broadband_shared::models::user::is_valid_mobile(mobile) {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("mobile");
        err.message = Some("Mobile number must be exactly 10 digits".into());
        Err(err)
    }
}
