//! In-memory mock implementation of the card repository trait.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    domain::entities::card::CreditCard,
    use_cases::card_cycle::{CardRepo, CycleStateUpdate},
};

/// In-memory implementation of `CardRepo` for testing.
#[derive(Default)]
pub struct InMemoryCardRepo {
    pub cards: Mutex<HashMap<Uuid, CreditCard>>,
}

impl InMemoryCardRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the repo with initial cards for testing.
    pub fn with_cards(cards: Vec<CreditCard>) -> Self {
        let map: HashMap<Uuid, CreditCard> = cards.into_iter().map(|c| (c.id, c)).collect();
        Self {
            cards: Mutex::new(map),
        }
    }

    /// Fetch one card as stored (for test assertions).
    pub fn get(&self, card_id: Uuid) -> Option<CreditCard> {
        self.cards.lock().unwrap().get(&card_id).cloned()
    }
}

#[async_trait]
impl CardRepo for InMemoryCardRepo {
    async fn insert_card(&self, card: &CreditCard) -> AppResult<()> {
        let mut cards = self.cards.lock().unwrap();
        if cards.contains_key(&card.id) {
            return Err(AppError::InvalidInput("Card already exists".into()));
        }
        cards.insert(card.id, card.clone());
        Ok(())
    }

    async fn find_card(&self, card_id: Uuid) -> AppResult<Option<CreditCard>> {
        Ok(self.cards.lock().unwrap().get(&card_id).cloned())
    }

    async fn list_cards(&self) -> AppResult<Vec<CreditCard>> {
        let mut cards: Vec<CreditCard> = self.cards.lock().unwrap().values().cloned().collect();
        cards.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(cards)
    }

    async fn save_cycle_state(&self, card_id: Uuid, update: &CycleStateUpdate) -> AppResult<()> {
        let mut cards = self.cards.lock().unwrap();
        let card = cards.get_mut(&card_id).ok_or(AppError::NotFound)?;

        card.status = update.status;
        card.current_cycle_month = update.current_cycle_month.clone();
        card.cycle_payment_count = update.cycle_payment_count;
        card.total_cycles = update.total_cycles;
        card.last_payment_date = update.last_payment_date;
        card.updated_at = update.updated_at;

        Ok(())
    }
}
