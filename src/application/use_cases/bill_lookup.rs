use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::app_error::{AppError, AppResult};

/// Billing data for one customer code, normalized from whichever shape the
/// upstream webhook happened to answer with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillData {
    pub customer_code: String,
    pub customer_name: Option<String>,
    pub address: Option<String>,
    pub amount: i64,
    pub period: Option<String>,
    pub provider: Option<String>,
}

/// Failure kinds surfaced to callers of the lookup. `Upstream` carries the
/// human-readable message extracted from the provider's error envelope so the
/// UI can tell "customer code doesn't exist" apart from transport failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("Upstream lookup timed out")]
    Timeout,

    #[error("Could not reach upstream: {0}")]
    Connection(String),

    #[error("Could not parse upstream response: {0}")]
    Parse(String),

    #[error("Unrecognized upstream response: {0}")]
    InvalidResponse(String),

    #[error("Upstream error {code}: {message}")]
    Upstream { code: u16, message: String },
}

/// Upstream webhook seam. No retries here; retry policy belongs to callers.
#[async_trait]
pub trait BillLookupClient: Send + Sync {
    async fn lookup(&self, customer_code: &str, region: &str) -> Result<BillData, LookupError>;
}

#[derive(Clone)]
pub struct BillLookupUseCases {
    client: Arc<dyn BillLookupClient>,
}

impl BillLookupUseCases {
    pub fn new(client: Arc<dyn BillLookupClient>) -> Self {
        Self { client }
    }

    #[instrument(skip(self))]
    pub async fn lookup(&self, customer_code: &str, region: &str) -> AppResult<BillData> {
        let code = customer_code.trim();
        if code.is_empty() {
            return Err(AppError::InvalidInput("Customer code must not be empty".into()));
        }
        Ok(self.client.lookup(code, region).await?)
    }
}
