/// Authorization gate
///
/// Resolves who is calling before any task or bill operation runs:
///
/// 1. **Registration**: hashes the password and inserts the user
/// 2. **Login**: checks mobile, role and password, then issues a token
/// 3. **Authentication**: turns a bearer token back into a stored [`User`]
/// 4. **Role checks**: [`require_role`] gates customer-only and
///    engineer-only operations
///
/// Lifecycle managers trust the user this module resolves and never
/// re-check identity themselves.

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, info, warn};

use super::{jwt, password};
use crate::error::{ServiceError, ServiceResult};
use crate::models::user::{is_valid_mobile, CreateUser, User, UserRole, MOBILE_LENGTH};
use crate::store::UserStore;

/// Message returned for every failed login, whatever the cause
pub const INVALID_CREDENTIALS: &str = "Incorrect mobile number, password, or role";

/// Message returned when a bearer token cannot be resolved to a user
pub const INVALID_BEARER: &str = "Could not validate credentials";

/// Input for registering a user
#[derive(Debug, Clone)]
pub struct UserRegistration {
    pub mobile: String,
    pub name: String,

    /// Plaintext; hashed before it reaches the store
    pub password: String,

    pub role: UserRole,
    pub address: Option<String>,
    pub plan: Option<String>,
}

/// Registration, login and token resolution over a [`UserStore`]
#[derive(Clone)]
pub struct AuthGate {
    users: Arc<dyn UserStore>,
    secret: Arc<str>,
    token_ttl: Duration,
}

impl AuthGate {
    /// Creates a gate signing tokens with `secret` that live for `token_ttl`
    pub fn new(users: Arc<dyn UserStore>, secret: impl Into<String>, token_ttl: Duration) -> Self {
        Self {
            users,
            secret: Arc::from(secret.into()),
            token_ttl,
        }
    }

    /// Registers a new user
    ///
    /// # Errors
    ///
    /// - `ServiceError::Validation` if the mobile number is not 10 digits or
    ///   the name or password is empty
    /// - `ServiceError::AlreadyExists` if the mobile number is taken
    pub async fn register(&self, registration: UserRegistration) -> ServiceResult<User> {
        if !is_valid_mobile(&registration.mobile) {
            return Err(ServiceError::validation(
                "mobile",
                format!("Mobile number must be exactly {} digits", MOBILE_LENGTH),
            ));
        }
        if registration.name.trim().is_empty() {
            return Err(ServiceError::validation("name", "Name must not be empty"));
        }
        if registration.password.is_empty() {
            return Err(ServiceError::validation("password", "Password must not be empty"));
        }

        let password_hash = hash_blocking(registration.password).await?;

        let created = self
            .users
            .insert_user(CreateUser {
                mobile: registration.mobile.clone(),
                name: registration.name,
                role: registration.role,
                password_hash,
                address: registration.address,
                plan: registration.plan,
            })
            .await?;

        match created {
            Some(user) => {
                info!(user_id = %user.id, role = %user.role, "Registered user");
                Ok(user)
            }
            None => {
                debug!(mobile = %registration.mobile, "Registration rejected: mobile already in use");
                Err(ServiceError::AlreadyExists(
                    "User with this mobile number already exists".to_string(),
                ))
            }
        }
    }

    /// Checks login credentials
    ///
    /// An unknown mobile, a role mismatch and a wrong password all fail with
    /// the same [`INVALID_CREDENTIALS`] message.
    pub async fn login(&self, mobile: &str, password: &str, role: UserRole) -> ServiceResult<User> {
        let denied = || ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string());

        let user = self.users.find_user_by_mobile(mobile).await?.ok_or_else(denied)?;

        if user.role != role {
            debug!(user_id = %user.id, requested = %role, "Login rejected: role mismatch");
            return Err(denied());
        }

        if !verify_blocking(password.to_string(), user.password_hash.clone()).await? {
            debug!(user_id = %user.id, "Login rejected: wrong password");
            return Err(denied());
        }

        info!(user_id = %user.id, role = %user.role, "User logged in");
        Ok(user)
    }

    /// Issues a bearer token for `user`
    pub fn issue_token(&self, user: &User) -> ServiceResult<String> {
        Ok(jwt::issue_token(&user.mobile, user.role, self.token_ttl, &self.secret)?)
    }

    /// Resolves a bearer token to the stored user it names
    ///
    /// # Errors
    ///
    /// `ServiceError::Unauthorized` if the token does not validate, carries no
    /// subject, or names a mobile number with no user behind it.
    pub async fn authenticate(&self, token: &str) -> ServiceResult<User> {
        let denied = || ServiceError::Unauthorized(INVALID_BEARER.to_string());

        let claims = jwt::validate_token(token, &self.secret).map_err(|e| {
            debug!(error = %e, "Bearer token rejected");
            denied()
        })?;

        if claims.sub.is_empty() {
            return Err(denied());
        }

        match self.users.find_user_by_mobile(&claims.sub).await? {
            Some(user) => Ok(user),
            None => {
                warn!("Valid token names a mobile number with no account");
                Err(denied())
            }
        }
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }
}

/// Passes `user` through if it holds `role`
///
/// Pure check; touches no storage.
pub fn require_role(user: User, role: UserRole) -> ServiceResult<User> {
    if user.role == role {
        Ok(user)
    } else {
        let label = match role {
            UserRole::Customer => "Customer",
            UserRole::Engineer => "Engineer",
        };
        Err(ServiceError::Forbidden(format!(
            "Not authorized. {} role required.",
            label
        )))
    }
}

async fn hash_blocking(plaintext: String) -> ServiceResult<String> {
    tokio::task::spawn_blocking(move || password::hash_password(&plaintext))
        .await
        .map_err(|e| ServiceError::Internal(format!("Hashing task failed: {}", e)))?
        .map_err(ServiceError::from)
}

async fn verify_blocking(plaintext: String, hash: String) -> ServiceResult<bool> {
    tokio::task::spawn_blocking(move || password::verify_password(&plaintext, &hash))
        .await
        .map_err(|e| ServiceError::Internal(format!("Verification task failed: {}", e)))?
        .map_err(ServiceError::from)
}
