/// Bearer authentication middleware
///
/// Resolves the `Authorization: Bearer <token>` header through the
/// [`AuthGate`](broadband_shared::auth::gate::AuthGate) and stores the
/// resulting user in the request extensions. Handlers pick it up with the
/// [`CurrentUser`] extractor and apply role checks themselves, since a single
/// path can serve different roles per method.
///
/// # Example
///
/// ```ignore
/// let protected = Router::new()
///     .route("/me", get(me))
///     .layer(axum::middleware::from_fn_with_state(state.clone(), require_auth));
/// ```

use crate::{app::AppState, error::ApiError};
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use broadband_shared::{
    auth::gate::require_role,
    models::user::{User, UserRole},
};

/// The authenticated caller, resolved from the bearer token
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    /// Narrows the caller to the given role
    pub fn require(self, role: UserRole) -> Result<User, ApiError> {
        Ok(require_role(self.0, role)?)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))
    }
}

/// Extracts the bearer token from an `Authorization` header value
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") {
        Some(token.trim())
    } else {
        None
    }
}

/// Middleware that rejects requests without a valid bearer token
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

    let user = state.auth.authenticate(token).await?;
    tracing::debug!(user_id = %user.id, role = %user.role, "Authenticated request");

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}
