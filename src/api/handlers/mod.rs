pub mod availability;
pub mod health;
pub mod purchase;
pub mod reservation;
pub mod schedule;
