use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    adapters::http::app_state::AppState,
    app_error::AppResult,
    domain::entities::card::{CreditCard, NewCard},
};

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    /// When set, only cards currently waiting on a đáo payment.
    needs_payment: Option<bool>,
}

#[derive(Serialize)]
struct CardsResponse<T> {
    items: Vec<T>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cards", get(list_cards).post(register_card))
        .route("/cards/{id}", get(get_card))
        .route("/cards/{id}/payments", post(record_payment))
}

async fn register_card(
    State(app_state): State<AppState>,
    Json(payload): Json<NewCard>,
) -> AppResult<impl IntoResponse> {
    let now = Utc::now().naive_utc();
    let card = app_state
        .card_cycle_use_cases
        .register_card(payload, now)
        .await?;
    Ok((StatusCode::CREATED, Json(card)))
}

async fn get_card(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let now = Utc::now().naive_utc();
    let card = app_state.card_cycle_use_cases.get_card(id, now).await?;
    Ok(Json(card))
}

async fn list_cards(
    State(app_state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let now = Utc::now().naive_utc();
    let mut cards: Vec<CreditCard> = app_state.card_cycle_use_cases.list_cards(now).await?;
    if params.needs_payment.unwrap_or(false) {
        cards.retain(|card| card.status.requires_rollover());
    }
    Ok(Json(CardsResponse { items: cards }))
}

async fn record_payment(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let now = Utc::now().naive_utc();
    let card = app_state
        .card_cycle_use_cases
        .record_payment(id, now)
        .await?;
    Ok((StatusCode::CREATED, Json(card)))
}
