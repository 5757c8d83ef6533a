pub mod postgres_availability_repo;
pub mod postgres_purchase_repo;
pub mod postgres_reservation_repo;
pub mod sqlite_availability_repo;
pub mod sqlite_purchase_repo;
pub mod sqlite_reservation_repo;
