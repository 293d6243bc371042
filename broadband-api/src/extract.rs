/// Request extractors that reject with the API error envelope
use crate::error::ApiError;
use axum::extract::FromRequest;

/// JSON body extractor
///
/// Behaves like [`axum::Json`], but a body that fails to parse or does not
/// match the target type is answered with an [`ApiError`] instead of
/// axum's plain-text rejection.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
