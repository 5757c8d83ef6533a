use std::sync::Arc;
use crate::config::Config;
use crate::domain::ports::{AvailabilityRepository, PurchaseRepository, ReservationRepository};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub availability_repo: Arc<dyn AvailabilityRepository>,
    pub reservation_repo: Arc<dyn ReservationRepository>,
    pub purchase_repo: Arc<dyn PurchaseRepository>,
}
