pub mod assets;
pub mod auth;
pub mod db;
pub mod error;
pub mod flash;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod render;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use db::DbPool;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub base_path: Arc<String>,
}

impl AppState {
    /// Absolute path under the configured base path. "/" collapses to the
    /// base path itself when one is set.
    pub fn path(&self, path: &str) -> String {
        if path == "/" && !self.base_path.is_empty() {
            self.base_path.to_string()
        } else {
            format!("{}{}", self.base_path, path)
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    let base_path = state.base_path.clone();

    let app_routes = Router::new()
        .route("/", get(handlers::web::index))
        .route("/static/{*path}", get(handlers::web::static_file))
        .route("/users/register", get(handlers::auth::register_page))
        .route("/users/register", post(handlers::auth::register))
        .route("/users/login", get(handlers::auth::login_page))
        .route("/users/login", post(handlers::auth::login))
        .route("/users/logout", get(handlers::auth::logout))
        .route("/users/todolist", get(handlers::tasks::todolist))
        .route("/users/tasks/add", post(handlers::tasks::add))
        .route("/users/tasks/edit/{id}", get(handlers::tasks::edit_page))
        .route("/users/tasks/update/{id}", post(handlers::tasks::update))
        .route("/users/tasks/delete/{id}", post(handlers::tasks::delete))
        .layer(
            tower::ServiceBuilder::new()
                .layer(tower_http::trace::TraceLayer::new_for_http())
                .layer(tower_http::compression::CompressionLayer::new()),
        )
        .with_state(state);

    tracing::info!("base_path: {base_path:?}");

    if base_path.is_empty() {
        app_routes
    } else {
        Router::new().nest(&*base_path, app_routes)
    }
}
