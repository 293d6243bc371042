/// Middleware modules for the API server
///
/// - `auth`: Bearer token resolution into the calling user

pub mod auth;
