//! Canned bill-lookup client for router-level tests.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::use_cases::bill_lookup::{BillData, BillLookupClient, LookupError};

/// Returns a fixed result and records the codes it was asked about.
pub struct StaticBillLookupClient {
    pub result: Result<BillData, LookupError>,
    pub seen_codes: Mutex<Vec<String>>,
}

impl StaticBillLookupClient {
    pub fn new(result: Result<BillData, LookupError>) -> Self {
        Self {
            result,
            seen_codes: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl BillLookupClient for StaticBillLookupClient {
    async fn lookup(&self, customer_code: &str, _region: &str) -> Result<BillData, LookupError> {
        self.seen_codes.lock().unwrap().push(customer_code.to_string());
        self.result.clone()
    }
}
