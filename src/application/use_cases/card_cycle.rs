use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    domain::{
        cycle::{calculate_status, cycle_month_tag},
        entities::card::{CardStatus, CreditCard, NewCard},
    },
};

/// Fields the rollover committer writes back, always in one single-row
/// update (`updated_at` included).
#[derive(Debug, Clone)]
pub struct CycleStateUpdate {
    pub status: CardStatus,
    pub current_cycle_month: Option<String>,
    pub cycle_payment_count: i32,
    pub total_cycles: i32,
    pub last_payment_date: Option<NaiveDateTime>,
    pub updated_at: NaiveDateTime,
}

#[async_trait]
pub trait CardRepo: Send + Sync {
    async fn insert_card(&self, card: &CreditCard) -> AppResult<()>;
    async fn find_card(&self, card_id: Uuid) -> AppResult<Option<CreditCard>>;
    async fn list_cards(&self) -> AppResult<Vec<CreditCard>>;
    /// Must be a single-row write; per-row atomicity is all the committer
    /// relies on.
    async fn save_cycle_state(&self, card_id: Uuid, update: &CycleStateUpdate) -> AppResult<()>;
}

/// Cycle rollover committer. Every read and every đáo payment funnels
/// through [`Self::commit`], which detects month-tag changes, keeps the
/// cycle counters, and refreshes the cached status in one write.
#[derive(Clone)]
pub struct CardCycleUseCases {
    repo: Arc<dyn CardRepo>,
}

impl CardCycleUseCases {
    pub fn new(repo: Arc<dyn CardRepo>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self, new))]
    pub async fn register_card(&self, new: NewCard, now: NaiveDateTime) -> AppResult<CreditCard> {
        validate_day_of_month("statementDate", new.statement_date)?;
        validate_day_of_month("paymentDueDate", new.payment_due_date)?;
        if new.credit_limit < 0 {
            return Err(AppError::InvalidInput("creditLimit must not be negative".into()));
        }

        let card = CreditCard {
            id: Uuid::new_v4(),
            customer_id: new.customer_id,
            statement_date: new.statement_date,
            payment_due_date: new.payment_due_date,
            credit_limit: new.credit_limit,
            status: CardStatus::NotDue,
            // Seeding the tag at creation means the first read in the same
            // month is not mistaken for a cycle transition.
            current_cycle_month: Some(cycle_month_tag(now.date())),
            last_payment_date: None,
            cycle_payment_count: 0,
            total_cycles: 0,
            created_at: now,
            updated_at: now,
        };
        self.repo.insert_card(&card).await?;
        Ok(card)
    }

    /// Read path: load, roll the cycle forward if a month boundary was
    /// crossed since the last write, refresh the cached status, persist.
    #[instrument(skip(self))]
    pub async fn get_card(&self, card_id: Uuid, now: NaiveDateTime) -> AppResult<CreditCard> {
        let card = self.repo.find_card(card_id).await?.ok_or(AppError::NotFound)?;
        self.commit(card, now, false).await
    }

    #[instrument(skip(self))]
    pub async fn list_cards(&self, now: NaiveDateTime) -> AppResult<Vec<CreditCard>> {
        let cards = self.repo.list_cards().await?;
        let mut refreshed = Vec::with_capacity(cards.len());
        for card in cards {
            refreshed.push(self.commit(card, now, false).await?);
        }
        Ok(refreshed)
    }

    /// Đáo payment path. The transaction ledger entry is written by the
    /// payment collaborator before this is called; here only the cycle
    /// bookkeeping advances.
    #[instrument(skip(self))]
    pub async fn record_payment(&self, card_id: Uuid, now: NaiveDateTime) -> AppResult<CreditCard> {
        let card = self.repo.find_card(card_id).await?.ok_or(AppError::NotFound)?;
        self.commit(card, now, true).await
    }

    async fn commit(
        &self,
        mut card: CreditCard,
        now: NaiveDateTime,
        payment: bool,
    ) -> AppResult<CreditCard> {
        ensure_stored_day("statement_date", card.statement_date)?;
        ensure_stored_day("payment_due_date", card.payment_due_date)?;

        if payment {
            // Payment applies before the rollover check so repeated payments
            // within one cycle accumulate. A payment landing in the same call
            // that detects a month change is absorbed by the reset below;
            // that ordering is part of the ledger rules.
            card.cycle_payment_count += 1;
            card.last_payment_date = Some(now);
        }

        let this_cycle = cycle_month_tag(now.date());
        if card.current_cycle_month.as_deref() != Some(this_cycle.as_str()) {
            // A first-ever write has no previous tag and must not treat the
            // absent field as a transition.
            if card.current_cycle_month.is_some() {
                card.last_payment_date = None;
            }
            card.current_cycle_month = Some(this_cycle);
            card.cycle_payment_count = 0;
            card.total_cycles += 1;
        }

        card.status = calculate_status(&card, now);
        card.updated_at = now;

        let update = CycleStateUpdate {
            status: card.status,
            current_cycle_month: card.current_cycle_month.clone(),
            cycle_payment_count: card.cycle_payment_count,
            total_cycles: card.total_cycles,
            last_payment_date: card.last_payment_date,
            updated_at: card.updated_at,
        };
        // Read-modify-write without a lock: two concurrent payments on the
        // same card can race between load and write, and the whole row goes
        // to the last writer. Accepted; the store only guarantees per-row
        // atomicity.
        self.repo.save_cycle_state(card.id, &update).await?;

        Ok(card)
    }
}

fn validate_day_of_month(field: &str, day: i16) -> AppResult<()> {
    if (1..=31).contains(&day) {
        Ok(())
    } else {
        Err(AppError::InvalidInput(format!(
            "{} must be a day of month between 1 and 31, got {}",
            field, day
        )))
    }
}

fn ensure_stored_day(column: &str, day: i16) -> AppResult<()> {
    if (1..=31).contains(&day) {
        Ok(())
    } else {
        Err(AppError::InvalidState(format!(
            "stored {} out of range: {}",
            column, day
        )))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::test_utils::{InMemoryCardRepo, create_test_card};

    fn dt(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn use_cases(cards: Vec<CreditCard>) -> (Arc<InMemoryCardRepo>, CardCycleUseCases) {
        let repo = Arc::new(InMemoryCardRepo::with_cards(cards));
        let use_cases = CardCycleUseCases::new(repo.clone());
        (repo, use_cases)
    }

    #[tokio::test]
    async fn register_seeds_the_current_cycle() {
        let (repo, use_cases) = use_cases(vec![]);
        let now = dt(2024, 12, 2, 9);
        let new = NewCard {
            customer_id: Uuid::new_v4(),
            statement_date: 15,
            payment_due_date: 10,
            credit_limit: 50_000_000,
        };

        let card = use_cases.register_card(new, now).await.unwrap();

        assert_eq!(card.status, CardStatus::NotDue);
        assert_eq!(card.current_cycle_month.as_deref(), Some("12/2024"));
        assert_eq!(card.cycle_payment_count, 0);
        assert_eq!(card.total_cycles, 0);
        assert!(repo.get(card.id).is_some());
    }

    #[tokio::test]
    async fn register_rejects_out_of_range_days() {
        let (_, use_cases) = use_cases(vec![]);
        let new = NewCard {
            customer_id: Uuid::new_v4(),
            statement_date: 0,
            payment_due_date: 10,
            credit_limit: 0,
        };
        let err = use_cases.register_card(new, dt(2024, 12, 2, 9)).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn missing_card_is_not_found() {
        let (_, use_cases) = use_cases(vec![]);
        let err = use_cases.get_card(Uuid::new_v4(), dt(2024, 12, 2, 9)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn read_commit_is_idempotent_within_a_cycle() {
        let card = create_test_card(|card| {
            card.current_cycle_month = Some("12/2024".to_string());
            card.cycle_payment_count = 1;
            card.total_cycles = 4;
            card.last_payment_date = Some(dt(2024, 12, 1, 8));
        });
        let id = card.id;
        let (repo, use_cases) = use_cases(vec![card]);

        let first = use_cases.get_card(id, dt(2024, 12, 5, 9)).await.unwrap();
        let second = use_cases.get_card(id, dt(2024, 12, 5, 9)).await.unwrap();

        assert_eq!(first.cycle_payment_count, 1);
        assert_eq!(second.cycle_payment_count, 1);
        assert_eq!(second.total_cycles, 4);
        assert_eq!(repo.get(id).unwrap().total_cycles, 4);
    }

    #[tokio::test]
    async fn crossing_a_cycle_boundary_increments_total_cycles_once() {
        // Statement day 5; the card last committed in November.
        let card = create_test_card(|card| {
            card.statement_date = 5;
            card.current_cycle_month = Some("11/2024".to_string());
            card.cycle_payment_count = 2;
            card.total_cycles = 7;
            card.last_payment_date = Some(dt(2024, 11, 12, 8));
        });
        let id = card.id;
        let (repo, use_cases) = use_cases(vec![card]);

        let rolled = use_cases.get_card(id, dt(2024, 12, 4, 9)).await.unwrap();
        assert_eq!(rolled.total_cycles, 8);
        assert_eq!(rolled.cycle_payment_count, 0);
        assert_eq!(rolled.last_payment_date, None);
        assert_eq!(rolled.current_cycle_month.as_deref(), Some("12/2024"));

        // Two days later, past the statement day: same month tag, no second
        // increment.
        let again = use_cases.get_card(id, dt(2024, 12, 6, 9)).await.unwrap();
        assert_eq!(again.total_cycles, 8);
        assert_eq!(repo.get(id).unwrap().total_cycles, 8);
    }

    #[tokio::test]
    async fn payment_clears_need_payment_at_the_same_instant() {
        let now = dt(2024, 12, 5, 14);
        let card = create_test_card(|card| {
            card.statement_date = 25;
            card.payment_due_date = 10;
            card.current_cycle_month = Some("12/2024".to_string());
        });
        let id = card.id;
        let (_, use_cases) = use_cases(vec![card]);

        let before = use_cases.get_card(id, now).await.unwrap();
        assert_eq!(before.status, CardStatus::NeedPayment);

        let paid = use_cases.record_payment(id, now).await.unwrap();
        assert_eq!(paid.status, CardStatus::PaidOff);
        assert_eq!(paid.cycle_payment_count, 1);
        assert_eq!(paid.last_payment_date, Some(now));
    }

    #[tokio::test]
    async fn payment_clears_overdue_too() {
        // Statement 25 / due 10: Dec 12 is inside the grace window.
        let now = dt(2024, 12, 12, 10);
        let card = create_test_card(|card| {
            card.statement_date = 25;
            card.payment_due_date = 10;
            card.current_cycle_month = Some("12/2024".to_string());
        });
        let id = card.id;
        let (_, use_cases) = use_cases(vec![card]);

        assert_eq!(use_cases.get_card(id, now).await.unwrap().status, CardStatus::Overdue);
        let paid = use_cases.record_payment(id, now).await.unwrap();
        assert_eq!(paid.status, CardStatus::PaidOff);
    }

    #[tokio::test]
    async fn multiple_payments_accumulate_within_one_cycle() {
        let card = create_test_card(|card| {
            card.statement_date = 25;
            card.payment_due_date = 10;
            card.current_cycle_month = Some("12/2024".to_string());
            card.total_cycles = 3;
        });
        let id = card.id;
        let (repo, use_cases) = use_cases(vec![card]);

        use_cases.record_payment(id, dt(2024, 12, 3, 9)).await.unwrap();
        let second = use_cases.record_payment(id, dt(2024, 12, 8, 9)).await.unwrap();

        assert_eq!(second.cycle_payment_count, 2);
        assert_eq!(second.total_cycles, 3);
        assert_eq!(second.status, CardStatus::PaidOff);
        assert_eq!(repo.get(id).unwrap().cycle_payment_count, 2);
    }

    #[tokio::test]
    async fn first_ever_commit_does_not_clear_an_absent_payment_marker() {
        // Legacy rows imported without a cycle tag: the first write adopts
        // the current month but must not treat the absence as a transition
        // that wipes the payment marker.
        let old_payment = dt(2024, 12, 1, 8);
        let card = create_test_card(|card| {
            card.current_cycle_month = None;
            card.last_payment_date = Some(old_payment);
            card.total_cycles = 0;
        });
        let id = card.id;
        let (_, use_cases) = use_cases(vec![card]);

        let committed = use_cases.get_card(id, dt(2024, 12, 5, 9)).await.unwrap();
        assert_eq!(committed.current_cycle_month.as_deref(), Some("12/2024"));
        assert_eq!(committed.last_payment_date, Some(old_payment));
        assert_eq!(committed.total_cycles, 1);
    }

    #[tokio::test]
    async fn corrupt_stored_days_report_invalid_state() {
        let card = create_test_card(|card| card.statement_date = 42);
        let id = card.id;
        let (_, use_cases) = use_cases(vec![card]);

        let err = use_cases.get_card(id, dt(2024, 12, 5, 9)).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
    }

    #[tokio::test]
    async fn list_refreshes_every_card() {
        let stale = create_test_card(|card| {
            card.current_cycle_month = Some("10/2024".to_string());
            card.total_cycles = 1;
        });
        let fresh = create_test_card(|card| {
            card.current_cycle_month = Some("12/2024".to_string());
            card.total_cycles = 5;
        });
        let (_, use_cases) = use_cases(vec![stale.clone(), fresh.clone()]);

        let listed = use_cases.list_cards(dt(2024, 12, 5, 9)).await.unwrap();
        assert_eq!(listed.len(), 2);
        for card in listed {
            assert_eq!(card.current_cycle_month.as_deref(), Some("12/2024"));
            if card.id == stale.id {
                assert_eq!(card.total_cycles, 2);
            } else {
                assert_eq!(card.total_cycles, 5);
            }
        }
    }
}
