mod error;
mod handlers;
mod middleware;

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, FromRef},
    routing::get,
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

pub use error::ApiError;

use crate::config::Config;
use crate::db::Database;

/// Largest accepted request body.
pub const BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Static facts about the running service, reported by `/api/health/info`.
#[derive(Debug, Clone)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: String,
    pub environment: String,
}

impl From<&Config> for ServiceInfo {
    fn from(config: &Config) -> Self {
        Self {
            name: "Experiment Backend API",
            version: config.api_version.clone(),
            environment: config.environment.clone(),
        }
    }
}

/// Shared handler state. Handlers extract only the part they need.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub info: Arc<ServiceInfo>,
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for Arc<ServiceInfo> {
    fn from_ref(state: &AppState) -> Self {
        state.info.clone()
    }
}

pub fn create_router(db: Database, config: &Config) -> Router {
    let state = AppState {
        db,
        info: Arc::new(ServiceInfo::from(config)),
    };

    let prefix = format!("/api/{}/experiments", config.api_version);
    let collection = get(handlers::list_experiments).post(handlers::create_experiment);

    // Static segments are registered before `{id}` so they are never read as ids.
    let experiments = Router::new()
        .route("/", collection.clone())
        .route("/stats/overview", get(handlers::experiment_stats))
        .route(
            "/{id}",
            get(handlers::get_experiment)
                .put(handlers::update_experiment)
                .delete(handlers::delete_experiment),
        );

    let health = Router::new()
        .route("/health", get(handlers::health))
        .route("/info", get(handlers::info));

    Router::new()
        .route(&format!("{prefix}/"), collection)
        .nest(&prefix, experiments)
        .nest("/api/health", health)
        .fallback(handlers::route_not_found)
        .method_not_allowed_fallback(handlers::route_not_found)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(CatchPanicLayer::custom(middleware::panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors_layer(&config.cors_origins))
        .with_state(state)
}
