use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::adapters::http::{app_state::AppState, routes};

pub fn create_app(app_state: AppState) -> Router {
    routes::router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
