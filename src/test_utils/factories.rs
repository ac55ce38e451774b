//! Test data factories for creating valid test fixtures.
//!
//! Each factory creates a complete, valid object with sensible defaults; use
//! the closure parameter to override specific fields as needed.

use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::domain::entities::card::{CardStatus, CreditCard};

/// A fixed, unremarkable timestamp for created/updated fields.
pub fn test_datetime() -> NaiveDateTime {
    chrono::NaiveDate::from_ymd_opt(2024, 11, 1)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

/// Create a test card with sensible defaults.
pub fn create_test_card(overrides: impl FnOnce(&mut CreditCard)) -> CreditCard {
    let mut card = CreditCard {
        id: Uuid::new_v4(),
        customer_id: Uuid::new_v4(),
        statement_date: 15,
        payment_due_date: 10,
        credit_limit: 100_000_000,
        status: CardStatus::NotDue,
        current_cycle_month: Some("11/2024".to_string()),
        last_payment_date: None,
        cycle_payment_count: 0,
        total_cycles: 0,
        created_at: test_datetime(),
        updated_at: test_datetime(),
    };
    overrides(&mut card);
    card
}
