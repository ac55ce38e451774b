use std::fs::File;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    adapters::{
        bill_lookup::WebhookBillClient, http::app_state::AppState,
        persistence::PostgresPersistence,
    },
    infra::config::AppConfig,
    use_cases::{
        bill_lookup::{BillLookupClient, BillLookupUseCases},
        card_cycle::{CardCycleUseCases, CardRepo},
    },
};

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let config = AppConfig::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let persistence = Arc::new(PostgresPersistence::new(pool));

    let bill_client = Arc::new(WebhookBillClient::new(
        config.bill_webhook_url.clone(),
        config.lookup_connect_timeout,
        config.lookup_timeout,
    ));

    let card_cycle_use_cases =
        CardCycleUseCases::new(persistence.clone() as Arc<dyn CardRepo>);
    let bill_lookup_use_cases =
        BillLookupUseCases::new(bill_client as Arc<dyn BillLookupClient>);

    Ok(AppState {
        config: Arc::new(config),
        card_cycle_use_cases: Arc::new(card_cycle_use_cases),
        bill_lookup_use_cases: Arc::new(bill_lookup_use_cases),
    })
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cardcycle=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer().with_target(false).with_level(true).pretty();

    // File (structured JSON logs)
    let file = File::create("app.log").expect("cannot create log file");
    let json_layer = fmt::layer()
        .json()
        .with_writer(file)
        .with_current_span(true)
        .with_span_list(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();
}
