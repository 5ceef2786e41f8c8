pub mod health;
pub mod reload;
