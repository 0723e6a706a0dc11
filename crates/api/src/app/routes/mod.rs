use axum::Router;

pub mod professores;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new().nest("/professores", professores::router())
}
