/// User accounts
///
/// Customers and engineers share one table and are told apart by [`UserRole`].
/// The mobile number is the login identifier and is unique across all users.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_role AS ENUM ('customer', 'engineer');
///
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     mobile VARCHAR(10) NOT NULL UNIQUE,
///     name TEXT NOT NULL,
///     role user_role NOT NULL DEFAULT 'customer',
///     password_hash TEXT NOT NULL,
///     address TEXT,
///     plan TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Length of a valid mobile number
pub const MOBILE_LENGTH: usize = 10;

/// Role a user signs in as
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Broadband subscriber; views and pays bills
    #[default]
    Customer,

    /// Field engineer; files and progresses installation tasks
    Engineer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Customer => "customer",
            UserRole::Engineer => "engineer",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(UserRole::Customer),
            "engineer" => Ok(UserRole::Engineer),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// Stored user account
///
/// Passwords are stored as Argon2id hashes. Never hand this type to a client
/// directly; the API layer maps it to a response without `password_hash`.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct User {
    /// Store-generated identifier
    pub id: Uuid,

    /// 10-digit mobile number, unique across all users
    pub mobile: String,

    /// Display name
    pub name: String,

    /// Role fixed at creation
    pub role: UserRole,

    /// Argon2id PHC string
    pub password_hash: String,

    /// Installation address (customers only)
    pub address: Option<String>,

    /// Subscribed plan (customers only)
    pub plan: Option<String>,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Input for inserting a user
///
/// Carries the already-hashed password; hashing happens in the auth gate.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub mobile: String,
    pub name: String,
    pub role: UserRole,
    pub password_hash: String,
    pub address: Option<String>,
    pub plan: Option<String>,
}

/// Returns true when `mobile` is exactly ten ASCII digits
pub fn is_valid_mobile(mobile: &str) -> bool {
    mobile.len() == MOBILE_LENGTH && mobile.bytes().all(|b| b.is_ascii_digit())
}
