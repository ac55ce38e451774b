use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::AppResult,
    domain::entities::card::CreditCard,
    use_cases::card_cycle::{CardRepo, CycleStateUpdate},
};

const CARD_COLUMNS: &str = "id, customer_id, statement_date, payment_due_date, credit_limit, \
     status, current_cycle_month, last_payment_date, cycle_payment_count, total_cycles, \
     created_at, updated_at";

#[async_trait]
impl CardRepo for PostgresPersistence {
    async fn insert_card(&self, card: &CreditCard) -> AppResult<()> {
        sqlx::query(
            r#"INSERT INTO credit_cards
                 (id, customer_id, statement_date, payment_due_date, credit_limit,
                  status, current_cycle_month, last_payment_date, cycle_payment_count,
                  total_cycles, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)"#,
        )
        .bind(card.id)
        .bind(card.customer_id)
        .bind(card.statement_date)
        .bind(card.payment_due_date)
        .bind(card.credit_limit)
        .bind(card.status)
        .bind(&card.current_cycle_month)
        .bind(card.last_payment_date)
        .bind(card.cycle_payment_count)
        .bind(card.total_cycles)
        .bind(card.created_at)
        .bind(card.updated_at)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    async fn find_card(&self, card_id: Uuid) -> AppResult<Option<CreditCard>> {
        let rec = sqlx::query_as::<_, CreditCard>(&format!(
            "SELECT {} FROM credit_cards WHERE id = $1",
            CARD_COLUMNS
        ))
        .bind(card_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(rec)
    }

    async fn list_cards(&self) -> AppResult<Vec<CreditCard>> {
        let recs = sqlx::query_as::<_, CreditCard>(&format!(
            "SELECT {} FROM credit_cards ORDER BY created_at DESC",
            CARD_COLUMNS
        ))
        .fetch_all(self.pool())
        .await?;

        Ok(recs)
    }

    async fn save_cycle_state(&self, card_id: Uuid, update: &CycleStateUpdate) -> AppResult<()> {
        // One single-row UPDATE; this per-row atomicity is the only write
        // guarantee the committer relies on.
        sqlx::query(
            r#"UPDATE credit_cards
               SET status = $2,
                   current_cycle_month = $3,
                   cycle_payment_count = $4,
                   total_cycles = $5,
                   last_payment_date = $6,
                   updated_at = $7
               WHERE id = $1"#,
        )
        .bind(card_id)
        .bind(update.status)
        .bind(&update.current_cycle_month)
        .bind(update.cycle_payment_count)
        .bind(update.total_cycles)
        .bind(update.last_payment_date)
        .bind(update.updated_at)
        .execute(self.pool())
        .await?;

        Ok(())
    }
}
