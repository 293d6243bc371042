/// Bearer token issuing and validation
///
/// Tokens are JWTs signed with HS256. The subject is the caller's mobile
/// number and a custom `role` claim records the role they logged in as.
/// Tokens are never persisted: everything needed to trust one is in the
/// signed payload, checked for signature, issuer and expiry on every use.
///
/// # Example
///
/// ```
/// use broadband_shared::auth::jwt::{issue_token, validate_token};
/// use broadband_shared::models::user::UserRole;
/// use chrono::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "a-secret-that-is-at-least-32-bytes-long";
/// let token = issue_token("9876543210", UserRole::Customer, Duration::days(7), secret)?;
///
/// let claims = validate_token(&token, secret)?;
/// assert_eq!(claims.sub, "9876543210");
/// assert_eq!(claims.role, UserRole::Customer);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::user::UserRole;

/// Issuer stamped into and required from every token
pub const ISSUER: &str = "4you-broadband";

/// Default token lifetime: 7 days
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60 * 24 * 7;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Signature, format or claim validation failed
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token was issued by someone else
    #[error("Invalid issuer")]
    InvalidIssuer,
}

/// JWT claims
///
/// - `sub`: Subject, the caller's mobile number
/// - `role`: Role the caller authenticated as
/// - `iss`: Always [`ISSUER`]
/// - `iat` / `nbf` / `exp`: Unix timestamps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: UserRole,
    pub iss: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

impl Claims {
    /// Creates claims with the default 7-day lifetime
    pub fn new(mobile: impl Into<String>, role: UserRole) -> Self {
        Self::with_expiration(mobile, role, Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES))
    }

    /// Creates claims that expire `expires_in` from now
    ///
    /// A negative duration yields already-expired claims, which is handy in
    /// tests.
    pub fn with_expiration(mobile: impl Into<String>, role: UserRole, expires_in: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: mobile.into(),
            role,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + expires_in).timestamp(),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Time left before expiry, `None` once expired
    pub fn time_until_expiration(&self) -> Option<Duration> {
        let now = Utc::now().timestamp();
        (self.exp > now).then(|| Duration::seconds(self.exp - now))
    }
}

/// Signs claims into a token string
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&Header::new(Algorithm::HS256), claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Issues a token for `mobile` acting as `role`, valid for `ttl`
pub fn issue_token(
    mobile: &str,
    role: UserRole,
    ttl: Duration,
    secret: &str,
) -> Result<String, JwtError> {
    create_token(&Claims::with_expiration(mobile, role, ttl), secret)
}

/// Validates a token and returns its claims
///
/// Checks the HS256 signature, issuer, `nbf` and `exp` with no clock leeway.
/// Never touches the user store.
///
/// # Errors
///
/// - `JwtError::Expired` once `exp` has passed
/// - `JwtError::InvalidIssuer` for tokens not issued by this service
/// - `JwtError::ValidationError` for bad signatures, malformed payloads or
///   missing claims
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.set_required_spec_claims(&["exp", "sub", "iss"]);
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.leeway = 0;

    let data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_default_lifetime() {
        let claims = Claims::new("9876543210", UserRole::Customer);

        assert_eq!(claims.sub, "9876543210");
        assert_eq!(claims.iss, ISSUER);
        assert!(!claims.is_expired());

        let left = claims.time_until_expiration().unwrap();
        assert!(left.num_minutes() > DEFAULT_TOKEN_TTL_MINUTES - 2);
        assert!(left.num_minutes() <= DEFAULT_TOKEN_TTL_MINUTES);
    }

    #[test]
    fn test_issue_and_validate() {
        let token = issue_token("8888888888", UserRole::Engineer, Duration::hours(1), SECRET)
            .expect("Should issue token");

        let claims = validate_token(&token, SECRET).expect("Should validate token");
        assert_eq!(claims.sub, "8888888888");
        assert_eq!(claims.role, UserRole::Engineer);
    }

    #[test]
    fn test_expired_token_rejected() {
        let claims = Claims::with_expiration("9876543210", UserRole::Customer, Duration::seconds(-60));
        assert!(claims.is_expired());
        assert!(claims.time_until_expiration().is_none());

        let token = create_token(&claims, SECRET).unwrap();
        assert!(matches!(validate_token(&token, SECRET), Err(JwtError::Expired)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue_token("9876543210", UserRole::Customer, Duration::hours(1), SECRET).unwrap();
        let result = validate_token(&token, "some-other-secret-of-32-bytes-len");
        assert!(matches!(result, Err(JwtError::ValidationError(_))));
    }

    #[test]
    fn test_foreign_issuer_rejected() {
        let mut claims = Claims::new("9876543210", UserRole::Customer);
        claims.iss = "someone-else".to_string();
        let token = create_token(&claims, SECRET).unwrap();

        assert!(matches!(validate_token(&token, SECRET), Err(JwtError::InvalidIssuer)));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(validate_token("not.a.token", SECRET).is_err());
        assert!(validate_token("", SECRET).is_err());
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let token = issue_token("9876543210", UserRole::Customer, Duration::hours(1), SECRET).unwrap();
        let forged = issue_token("8888888888", UserRole::Engineer, Duration::hours(1), "attacker-secret-also-32-bytes-long").unwrap();

        // Splice the forged payload onto the genuine signature
        let genuine: Vec<&str> = token.split('.').collect();
        let fake: Vec<&str> = forged.split('.').collect();
        let spliced = format!("{}.{}.{}", genuine[0], fake[1], genuine[2]);

        assert!(validate_token(&spliced, SECRET).is_err());
    }
}
