//! Upstream bill-lookup webhook client.
//!
//! The provider answers one POST per lookup with one of three shapes: a bare
//! success array, a `data.bills[0]` envelope, or an error envelope whose
//! human-readable message is itself an escaped JSON string. Parsing is kept
//! as pure functions over the body text so every shape is unit testable.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::use_cases::bill_lookup::{BillData, BillLookupClient, LookupError};

const MAX_SNIPPET_LEN: usize = 200;

/// Phrases the provider embeds in its error payloads; scanned as a fallback
/// when the nested JSON cannot be re-parsed.
const KNOWN_ERROR_PHRASES: [&str; 3] = [
    "Mã khách hàng không tồn tại",
    "Không tìm thấy hóa đơn",
    "Hệ thống đang bảo trì",
];

#[derive(Clone)]
pub struct WebhookBillClient {
    client: Client,
    lookup_url: String,
}

impl WebhookBillClient {
    pub fn new(lookup_url: String, connect_timeout: Duration, timeout: Duration) -> Self {
        // The client carries its own timeout budget, independent of any
        // caller-level deadline.
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .build()
            .expect("failed to build reqwest client");
        Self { client, lookup_url }
    }
}

#[async_trait]
impl BillLookupClient for WebhookBillClient {
    async fn lookup(&self, customer_code: &str, region: &str) -> Result<BillData, LookupError> {
        let body = serde_json::json!({
            "ma_kh": customer_code,
            "khu_vuc": region,
        });

        let resp = self
            .client
            .post(&self.lookup_url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = resp.status();
        let text = resp.text().await.map_err(classify_transport_error)?;

        match parse_lookup_body(&text) {
            // Some gateways answer errors as plain text with a non-2xx code;
            // fold those into the upstream variant instead of a parse error.
            Err(LookupError::Parse(_)) if !status.is_success() => Err(LookupError::Upstream {
                code: status.as_u16(),
                message: extract_upstream_message(&text),
            }),
            other => other,
        }
    }
}

fn classify_transport_error(err: reqwest::Error) -> LookupError {
    if err.is_timeout() {
        LookupError::Timeout
    } else {
        LookupError::Connection(err.to_string())
    }
}

/// Normalize any of the three known upstream shapes into `BillData`.
pub(crate) fn parse_lookup_body(body: &str) -> Result<BillData, LookupError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| LookupError::Parse(e.to_string()))?;

    if let Some(error) = value.get("error") {
        let code = error.get("code").and_then(|c| c.as_u64()).unwrap_or(502) as u16;
        let raw = error.get("message").and_then(|m| m.as_str()).unwrap_or_default();
        return Err(LookupError::Upstream {
            code,
            message: extract_upstream_message(raw),
        });
    }

    if let Some(bills) = value
        .get("data")
        .and_then(|d| d.get("bills"))
        .and_then(|b| b.as_array())
    {
        return bills
            .first()
            .ok_or_else(|| LookupError::InvalidResponse("empty bills array".into()))
            .and_then(bill_from_value);
    }

    if let Some(items) = value.as_array() {
        return items
            .first()
            .ok_or_else(|| LookupError::InvalidResponse("empty result array".into()))
            .and_then(bill_from_value);
    }

    Err(LookupError::InvalidResponse(snippet(body)))
}

/// Dig the human-readable message out of the provider's error field.
///
/// The field usually looks like `400 - "{\"message\":\"...\"}"`: bounded
/// slicing between the outermost braces plus a JSON re-parse recovers the
/// inner message; if that fails, fall back to scanning for the known phrases.
pub(crate) fn extract_upstream_message(raw: &str) -> String {
    if let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) {
        if start < end {
            let inner = &raw[start..=end];
            let unescaped = inner.replace("\\\"", "\"");
            for candidate in [inner, unescaped.as_str()] {
                if let Ok(value) = serde_json::from_str::<serde_json::Value>(candidate) {
                    if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
                        return message.to_string();
                    }
                }
            }
        }
    }

    for phrase in KNOWN_ERROR_PHRASES {
        if raw.contains(phrase) {
            return phrase.to_string();
        }
    }

    snippet(raw)
}

/// Bill record as the provider sends it; field names differ between the
/// direct-array and enveloped shapes.
#[derive(Deserialize)]
struct RawBill {
    #[serde(alias = "customerCode", alias = "ma_kh")]
    customer_code: Option<String>,
    #[serde(alias = "customerName", alias = "ten_kh")]
    customer_name: Option<String>,
    #[serde(alias = "dia_chi")]
    address: Option<String>,
    #[serde(alias = "totalAmount", alias = "so_tien")]
    amount: Option<serde_json::Value>,
    #[serde(alias = "billingPeriod", alias = "ky_thanh_toan")]
    period: Option<String>,
    #[serde(alias = "nha_cung_cap")]
    provider: Option<String>,
}

fn bill_from_value(value: &serde_json::Value) -> Result<BillData, LookupError> {
    let raw: RawBill =
        serde_json::from_value(value.clone()).map_err(|e| LookupError::Parse(e.to_string()))?;

    let customer_code = raw
        .customer_code
        .ok_or_else(|| LookupError::InvalidResponse("bill without a customer code".into()))?;
    let amount = raw
        .amount
        .as_ref()
        .and_then(parse_amount)
        .ok_or_else(|| LookupError::InvalidResponse("bill without a numeric amount".into()))?;

    Ok(BillData {
        customer_code,
        customer_name: raw.customer_name,
        address: raw.address,
        amount,
        period: raw.period,
        provider: raw.provider,
    })
}

/// Amounts arrive either as a JSON number or a numeric string.
fn parse_amount(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    }
}

fn snippet(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.len() <= MAX_SNIPPET_LEN {
        trimmed.to_string()
    } else {
        let mut end = MAX_SNIPPET_LEN;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &trimmed[..end])
    }
}
