/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id hashing and constant-time verification
/// - [`jwt`]: Signed bearer tokens carrying the caller's mobile and role
/// - [`gate`]: Registration, login, token resolution and role checks
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use chrono::Duration;
/// use broadband_shared::auth::gate::{require_role, AuthGate, UserRegistration};
/// use broadband_shared::models::user::UserRole;
/// use broadband_shared::store::memory::MemoryStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let gate = AuthGate::new(
///     Arc::new(MemoryStore::new()),
///     "a-secret-that-is-at-least-32-bytes-long",
///     Duration::days(7),
/// );
///
/// gate.register(UserRegistration {
///     mobile: "9876543210".to_string(),
///     name: "Rahul Sharma".to_string(),
///     password: "password".to_string(),
///     role: UserRole::Customer,
///     address: None,
///     plan: None,
/// })
/// .await?;
///
/// let user = gate.login("9876543210", "password", UserRole::Customer).await?;
/// let token = gate.issue_token(&user)?;
///
/// let caller = require_role(gate.authenticate(&token).await?, UserRole::Customer)?;
/// assert_eq!(caller.mobile, "9876543210");
/// # Ok(())
/// # }
/// ```

pub mod gate;
pub mod jwt;
pub mod password;
