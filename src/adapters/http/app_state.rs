use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    infra::config::AppConfig,
    use_cases::{bill_lookup::BillLookupUseCases, card_cycle::CardCycleUseCases},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub card_cycle_use_cases: Arc<CardCycleUseCases>,
    pub bill_lookup_use_cases: Arc<BillLookupUseCases>,
}

impl FromRef<AppState> for Arc<CardCycleUseCases> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.card_cycle_use_cases.clone()
    }
}

impl FromRef<AppState> for Arc<BillLookupUseCases> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.bill_lookup_use_cases.clone()
    }
}
