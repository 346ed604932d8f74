use std::sync::Arc;

use crate::{config::Settings, service::ServiceContext, storage::StorageStatus};

#[derive(Clone)]
pub struct AppState {
    pub service_context: Arc<ServiceContext>,
    pub settings: Arc<Settings>,
    pub storage: Arc<StorageStatus>,
}

impl AppState {
    pub fn new(
        service_context: Arc<ServiceContext>,
        settings: Arc<Settings>,
        storage: Arc<StorageStatus>,
    ) -> Self {
        Self {
            service_context,
            settings,
            storage,
        }
    }
}
