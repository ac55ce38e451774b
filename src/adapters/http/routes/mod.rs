pub mod bill;
pub mod card;

use axum::Router;

use crate::adapters::http::app_state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().merge(card::router()).merge(bill::router())
}
