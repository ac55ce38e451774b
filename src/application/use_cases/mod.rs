pub mod bill_lookup;
pub mod card_cycle;
