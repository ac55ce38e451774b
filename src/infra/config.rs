use std::env;
use std::time::Duration;

const DEFAULT_LOOKUP_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 30;

pub struct AppConfig {
    pub bind_addr: String,
    pub database_url: String,
    pub bill_webhook_url: String,
    pub lookup_connect_timeout: Duration,
    pub lookup_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let bill_webhook_url =
            env::var("BILL_WEBHOOK_URL").expect("BILL_WEBHOOK_URL must be set");
        let bind_addr = env::var("BIND_ADDR").unwrap_or("0.0.0.0:8080".to_string());

        let lookup_connect_timeout = timeout_from(
            env::var("BILL_LOOKUP_CONNECT_TIMEOUT_SECS").ok(),
            DEFAULT_LOOKUP_CONNECT_TIMEOUT_SECS,
        );
        let lookup_timeout = timeout_from(
            env::var("BILL_LOOKUP_TIMEOUT_SECS").ok(),
            DEFAULT_LOOKUP_TIMEOUT_SECS,
        );

        Self {
            bind_addr,
            database_url,
            bill_webhook_url,
            lookup_connect_timeout,
            lookup_timeout,
        }
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            bind_addr: "127.0.0.1:0".to_string(),
            database_url: "postgres://localhost/cardcycle_test".to_string(),
            bill_webhook_url: "http://localhost:9/lookup".to_string(),
            lookup_connect_timeout: Duration::from_secs(DEFAULT_LOOKUP_CONNECT_TIMEOUT_SECS),
            lookup_timeout: Duration::from_secs(DEFAULT_LOOKUP_TIMEOUT_SECS),
        }
    }
}

fn timeout_from(raw: Option<String>, default_secs: u64) -> Duration {
    let secs = match raw {
        Some(value) => value.parse().expect("timeout override must be a number of seconds"),
        None => default_secs,
    };
    Duration::from_secs(secs)
}
