/// Domain error taxonomy
///
/// Every service operation fails with a [`ServiceError`]. The variants are
/// caller-input or caller-state problems and are never retried; anything the
/// taxonomy does not name (storage connectivity, hashing failures) collapses
/// into [`ServiceError::Internal`].

use crate::auth::jwt::JwtError;
use crate::auth::password::PasswordError;
use crate::store::StoreError;
use crate::uploads::UploadError;

/// Result alias used by the service layer
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error type returned by the authorization gate and lifecycle managers
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Bearer token failed signature, format or expiry checks
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Missing or incorrect credentials, or the caller could not be resolved
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Role or ownership mismatch
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A user with the same mobile number already exists
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// The referenced record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Upload rejected by the storage collaborator
    #[error("Invalid file: {0}")]
    InvalidFile(String),

    /// Malformed input
    #[error("Validation failed for {field}: {message}")]
    Validation { field: String, message: String },

    /// Anything outside the taxonomy
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Builds a validation error for a single field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ServiceError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

impl From<PasswordError> for ServiceError {
    fn from(err: PasswordError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

impl From<JwtError> for ServiceError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::CreateError(msg) => ServiceError::Internal(msg),
            other => ServiceError::InvalidToken(other.to_string()),
        }
    }
}

impl From<UploadError> for ServiceError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Io(e) => ServiceError::Internal(format!("Upload write failed: {}", e)),
            other => ServiceError::InvalidFile(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_errors_become_invalid_token() {
        let err: ServiceError = JwtError::Expired.into();
        assert!(matches!(err, ServiceError::InvalidToken(_)));

        let err: ServiceError = JwtError::CreateError("boom".to_string()).into();
        assert!(matches!(err, ServiceError::Internal(_)));
    }

    #[test]
    fn test_upload_errors_split_by_cause() {
        let err: ServiceError = UploadError::UnsupportedExtension(".exe".to_string()).into();
        assert!(matches!(err, ServiceError::InvalidFile(_)));

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ServiceError = UploadError::Io(io).into();
        assert!(matches!(err, ServiceError::Internal(_)));
    }

    #[test]
    fn test_validation_display() {
        let err = ServiceError::validation("mobile", "must be 10 digits");
        assert_eq!(err.to_string(), "Validation failed for mobile: must be 10 digits");
    }
}
