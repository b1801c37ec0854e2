//! HTTP API and static front-end for userbase.
//!
//! Routes:
//! - `GET /` redirects to `/index.html`
//! - `GET|POST /api/v1/user` lists or creates users
//! - `GET|PUT|UPDATE /api/v1/user/{user_id}` fetches or updates one user
//! - everything else is served from the static directory

pub mod args;
pub mod config;
pub mod error;
pub mod resources;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use std::path::Path;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use userbase_store::UserStore;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};

/// Prefix of every REST endpoint.
pub const API_PREFIX: &str = "/api/v1";

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: UserStore,
}

impl AppState {
    pub fn new(store: UserStore) -> Self {
        Self { store }
    }
}

async fn index() -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, "/index.html")])
}

/// Build the HTTP router over `store`, serving front-end files from `static_dir`.
pub fn build_router(store: UserStore, static_dir: impl AsRef<Path>) -> Router {
    let api = Router::new()
        .route(
            "/user",
            get(resources::list_users).post(resources::create_user),
        )
        .route(
            "/user/{user_id}",
            get(resources::get_user)
                .put(resources::update_user)
                .fallback(resources::update_user_by_method),
        );

    Router::new()
        .route("/", get(index))
        .nest(API_PREFIX, api)
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(store))
}
