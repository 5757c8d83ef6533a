pub mod availability;
pub mod purchase;
pub mod reservation;
pub mod slot;
