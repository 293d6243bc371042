/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/auth/register` - Register a customer or engineer
/// - `POST /api/auth/login` - Check credentials for a role and get a token
/// - `GET /api/auth/me` - The user behind the bearer token

use crate::{app::AppState, error::ApiResult, extract::ApiJson, middleware::auth::CurrentUser};
use axum::{extract::State, http::StatusCode, Json};
use broadband_shared::{
    auth::gate::UserRegistration,
    models::user::{User, UserRole},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        length(equal = 10, message = "Mobile number must be exactly 10 digits"),
        custom(function = "super::validate_mobile")
    )]
    pub mobile: String,

    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    #[serde(default)]
    pub role: UserRole,

    pub address: Option<String>,
    pub plan: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Mobile number is required"))]
    pub mobile: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    #[serde(default)]
    pub role: UserRole,
}

/// Outward view of a user; never carries the password hash
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub mobile: String,
    pub name: String,
    pub role: UserRole,
    pub address: Option<String>,
    pub plan: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            mobile: user.mobile,
            name: user.name,
            role: user.role,
            address: user.address,
            plan: user.plan,
            created_at: user.created_at,
        }
    }
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,

    /// Always `"bearer"`
    pub token_type: String,

    pub user: UserResponse,
}

/// Register a new user
///
/// ```text
/// POST /api/auth/register
/// Content-Type: application/json
///
/// {
///   "mobile": "9876543210",
///   "name": "Rahul Sharma",
///   "password": "password",
///   "role": "customer"
/// }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed
/// - `409 Conflict`: Mobile number already registered
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    req.validate()?;

    let user = state
        .auth
        .register(UserRegistration {
            mobile: req.mobile,
            name: req.name,
            password: req.password,
            role: req.role,
            address: req.address,
            plan: req.plan,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Login endpoint
///
/// The role is part of the credentials: an engineer logging in as a
/// customer is rejected the same way as a wrong password.
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid credentials
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    req.validate()?;

    let user = state.auth.login(&req.mobile, &req.password, req.role).await?;
    let access_token = state.auth.issue_token(&user)?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        user: user.into(),
    }))
}

pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(user.into())
}
