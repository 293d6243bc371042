/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use broadband_api::{app::{build_router, AppState}, config::Config};
/// use broadband_shared::store::postgres::PgStore;
/// use sqlx::PgPool;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(Arc::new(PgStore::new(pool)), config);
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::auth::require_auth,
};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, patch, post},
    Router,
};
use broadband_shared::{
    auth::gate::AuthGate,
    services::{bills::BillManager, tasks::TaskManager},
    store::Store,
    uploads::UploadStorage,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Headroom for multipart framing and text fields on top of the two files
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor. Every
/// field is an `Arc` or wraps one.
#[derive(Clone)]
pub struct AppState {
    /// Backing store, used directly only for health checks
    pub store: Arc<dyn Store>,

    pub auth: AuthGate,
    pub tasks: TaskManager,
    pub bills: BillManager,
    pub uploads: UploadStorage,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Wires the services over a single store
    pub fn new<S>(store: Arc<S>, config: Config) -> Self
    where
        S: Store + 'static,
    {
        let auth = AuthGate::new(store.clone(), config.jwt.secret.clone(), config.token_ttl());
        let tasks = TaskManager::new(store.clone(), auth.clone());
        let bills = BillManager::new(store.clone());
        let uploads =
            UploadStorage::with_max_file_size(config.uploads.dir.clone(), config.uploads.max_file_size);

        Self {
            store,
            auth,
            tasks,
            bills,
            uploads,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /                         # Service banner (public)
/// ├── GET  /health                   # Health check (public)
/// └── /api/
///     ├── /auth/
///     │   ├── POST /register         # public
///     │   ├── POST /login            # public
///     │   └── GET  /me               # authenticated
///     ├── /bills/                    # authenticated
///     │   ├── GET   /                # customer
///     │   ├── POST  /                # engineer
///     │   └── PATCH /:bill_id/pay    # customer, owner only
///     └── /tasks/                    # authenticated, engineer
///         ├── GET   /
///         ├── POST  /                # multipart
///         └── PATCH /:task_id/status
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. CORS (tower-http CorsLayer)
/// 2. Response compression (gzip/br when the client accepts it)
/// 3. Logging (tower-http TraceLayer)
/// 4. Authentication (per-route basis)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let public_routes = Router::new()
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health_check));

    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .merge(
            Router::new()
                .route("/me", get(routes::auth::me))
                .layer(axum::middleware::from_fn_with_state(state.clone(), require_auth)),
        );

    let bill_routes = Router::new()
        .route("/", get(routes::bills::list_bills).post(routes::bills::create_bill))
        .route("/:bill_id/pay", patch(routes::bills::pay_bill))
        .layer(axum::middleware::from_fn_with_state(state.clone(), require_auth));

    let body_limit = state.config.uploads.max_file_size * 2 + MULTIPART_OVERHEAD;
    let task_routes = Router::new()
        .route("/", get(routes::tasks::list_tasks).post(routes::tasks::create_task))
        .route("/:task_id/status", patch(routes::tasks::update_task_status))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(axum::middleware::from_fn_with_state(state.clone(), require_auth));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/bills", bill_routes)
        .nest("/tasks", task_routes);

    Router::new()
        .merge(public_routes)
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CompressionLayer::new())
        .layer(cors_layer(&state.config.api.cors_origins))
        .with_state(state)
}

/// CORS for the configured origins; `*` anywhere in the list is permissive
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}
