use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::BookingStore;
use crate::services::notifications::ConfirmationSender;
use crate::services::realtime::ChangeBus;

pub struct AppState {
    pub store: Arc<dyn BookingStore>,
    pub config: AppConfig,
    pub confirmations: Box<dyn ConfirmationSender>,
    pub changes: ChangeBus,
}
