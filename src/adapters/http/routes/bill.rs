use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::post,
};
use serde::Deserialize;

use crate::{adapters::http::app_state::AppState, app_error::AppResult};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupPayload {
    customer_code: String,
    region: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/bills/lookup", post(lookup_bill))
}

async fn lookup_bill(
    State(app_state): State<AppState>,
    Json(payload): Json<LookupPayload>,
) -> AppResult<impl IntoResponse> {
    let bill = app_state
        .bill_lookup_use_cases
        .lookup(&payload.customer_code, &payload.region)
        .await?;
    Ok(Json(bill))
}
