use std::sync::Arc;

use sqlx::SqlitePool;

use crate::repository::*;

/// Shared handles every request works through. Wired once in main and
/// cloned into the router state.
pub struct ServiceContext {
    pub funeral_repo: Arc<dyn FuneralRepository>,
    pub condolence_repo: Arc<dyn CondolenceRepository>,
    pub donation_repo: Arc<dyn DonationRepository>,
    pub db_pool: SqlitePool,
}

impl ServiceContext {
    pub fn new(
        funeral_repo: Arc<dyn FuneralRepository>,
        condolence_repo: Arc<dyn CondolenceRepository>,
        donation_repo: Arc<dyn DonationRepository>,
        db_pool: SqlitePool,
    ) -> Self {
        Self {
            funeral_repo,
            condolence_repo,
            donation_repo,
            db_pool,
        }
    }
}
