//! Test utilities: in-memory repository implementations and data factories
//! for exercising the use cases without Postgres or a live upstream.

mod card_mocks;
mod factories;
mod lookup_mocks;

pub use card_mocks::*;
pub use factories::*;
pub use lookup_mocks::*;
