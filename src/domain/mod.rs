pub mod cycle;
pub mod entities;
