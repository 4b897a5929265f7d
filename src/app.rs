use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/heat", get(handlers::get_heat))
        .route("/api/chart", get(handlers::get_chart))
        .route("/api/status", get(handlers::get_status))
        .with_state(state)
}
