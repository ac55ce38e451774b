pub mod bill_lookup;
pub mod http;
pub mod persistence;
