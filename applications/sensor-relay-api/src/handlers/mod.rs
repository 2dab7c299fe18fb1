pub mod health;
pub mod reading;
