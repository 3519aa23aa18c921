use axum::{
    Router, middleware,
    routing::{any, get},
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Store;
use crate::services::UserService;

mod error;
mod observability;
pub mod path;
pub mod render;
pub mod users;

pub use error::ApiError;
pub use render::{Renderer, View};

#[derive(Clone)]
pub struct AppState {
    pub users: UserService,

    pub renderer: Arc<Renderer>,

    pub static_path: PathBuf,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn new(users: UserService, config: &Config) -> Self {
        Self {
            users,
            renderer: Arc::new(Renderer::new(&config.templates)),
            static_path: PathBuf::from(&config.server.static_path),
            prometheus_handle: None,
        }
    }

    #[must_use]
    pub fn with_prometheus(mut self, handle: Option<PrometheusHandle>) -> Self {
        self.prometheus_handle = handle;
        self
    }
}

pub async fn create_app_state(
    config: &Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let store = Store::from_config(&config.general).await?;
    let repository = store.user_repository();
    repository.ensure_schema().await?;

    let users = UserService::new(Arc::new(repository));

    Ok(Arc::new(
        AppState::new(users, config).with_prometheus(prometheus_handle),
    ))
}

pub fn router(state: Arc<AppState>) -> Router {
    let static_files = ServeDir::new(&state.static_path);

    Router::new()
        .route("/users", any(users::dispatch))
        .route("/users/", any(users::dispatch))
        .route("/users/{*rest}", any(users::dispatch))
        .route("/api/users", any(users::dispatch))
        .route("/api/users/", any(users::dispatch))
        .route("/api/users/{*rest}", any(users::dispatch))
        .route("/metrics", get(observability::get_metrics))
        .nest_service("/static", static_files)
        .with_state(state)
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(TraceLayer::new_for_http())
}
