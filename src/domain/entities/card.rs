use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle state of a card's current billing cycle.
///
/// The persisted value is a cache: it is recomputed from the statement/due
/// dates and the cycle markers on every commit, never trusted on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "card_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardStatus {
    /// Inside a cycle with nothing payable yet, or an unpaid cycle that aged
    /// out past its grace window.
    NotDue,
    /// A statement has closed and its amount has not been rolled over.
    NeedPayment,
    /// A rollover payment was recorded within the current cycle.
    PaidOff,
    /// Past the due date, inside the 7-day grace window.
    Overdue,
}

impl CardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardStatus::NotDue => "NOT_DUE",
            CardStatus::NeedPayment => "NEED_PAYMENT",
            CardStatus::PaidOff => "PAID_OFF",
            CardStatus::Overdue => "OVERDUE",
        }
    }

    /// Whether the card is waiting on a đáo (rollover) payment.
    pub fn requires_rollover(&self) -> bool {
        matches!(self, CardStatus::NeedPayment | CardStatus::Overdue)
    }
}

impl Default for CardStatus {
    fn default() -> Self {
        CardStatus::NotDue
    }
}

impl std::fmt::Display for CardStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One physical credit card under management, owned by a customer by
/// reference.
///
/// `statement_date` and `payment_due_date` are days of month (1–31); the due
/// date is always read as falling in the month after the statement closes.
/// `current_cycle_month` ("MM/YYYY") and `last_payment_date` are the two
/// persisted markers the status derivation runs on.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CreditCard {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub statement_date: i16,
    pub payment_due_date: i16,
    pub credit_limit: i64,
    pub status: CardStatus,
    pub current_cycle_month: Option<String>,
    pub last_payment_date: Option<NaiveDateTime>,
    pub cycle_payment_count: i32,
    pub total_cycles: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCard {
    pub customer_id: Uuid,
    pub statement_date: i16,
    pub payment_due_date: i16,
    pub credit_limit: i64,
}
