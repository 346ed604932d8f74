use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::*;
use crate::error::Result;

pub mod condolence_repository;
pub mod donation_repository;
pub mod funeral_repository;

pub use condolence_repository::SqliteCondolenceRepository;
pub use donation_repository::SqliteDonationRepository;
pub use funeral_repository::SqliteFuneralRepository;

/// One page of a filtered listing plus the total row count over the same
/// predicates.
#[derive(Debug, Clone)]
pub struct FuneralPage {
    pub rows: Vec<Funeral>,
    pub count: i64,
}

#[async_trait]
pub trait FuneralRepository: Send + Sync {
    /// Persists a public submission. Always lands as Pending.
    async fn create(&self, funeral: NewFuneral) -> Result<Funeral>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Funeral>>;
    /// Filtered public listing; only Approved + visible rows qualify.
    async fn list_public(&self, filter: &FuneralFilter) -> Result<FuneralPage>;
    /// Approved + visible rows flagged as featured, soonest first.
    async fn list_featured(&self) -> Result<Vec<Funeral>>;
    /// Every funeral regardless of status, for the admin dashboard.
    async fn list_all(&self, limit: i64, offset: i64) -> Result<Vec<Funeral>>;
    async fn set_status(&self, id: Uuid, status: FuneralStatus) -> Result<Funeral>;
    async fn set_visibility(&self, id: Uuid, visible: bool) -> Result<Funeral>;
    async fn set_featured(&self, id: Uuid, featured: bool) -> Result<Funeral>;
    async fn set_program_pdf(&self, id: Uuid, url: &str) -> Result<Funeral>;
    async fn count_by_status(&self, status: FuneralStatus) -> Result<i64>;
}

#[async_trait]
pub trait CondolenceRepository: Send + Sync {
    /// Persists a public submission. Always lands unapproved.
    async fn create(&self, condolence: NewCondolence) -> Result<Condolence>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Condolence>>;
    async fn list_approved_for_funeral(&self, funeral_id: Uuid) -> Result<Vec<Condolence>>;
    async fn list_pending(&self, limit: i64, offset: i64) -> Result<Vec<Condolence>>;
    async fn approve(&self, id: Uuid) -> Result<Condolence>;
    async fn delete(&self, id: Uuid) -> Result<()>;
    async fn count_pending(&self) -> Result<i64>;
}

#[async_trait]
pub trait DonationRepository: Send + Sync {
    /// Persists a public submission. Always lands as Pending with the
    /// default currency applied when none was given.
    async fn create(&self, donation: NewDonation) -> Result<Donation>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Donation>>;
    async fn list_for_funeral(&self, funeral_id: Uuid) -> Result<Vec<Donation>>;
    /// Moves a Pending donation to a terminal state, optionally attaching
    /// the payment reference. Any other transition is a conflict.
    async fn update_status(
        &self,
        id: Uuid,
        status: DonationStatus,
        payment_reference: Option<&str>,
    ) -> Result<Donation>;
    async fn stats_for_funeral(&self, funeral_id: Uuid) -> Result<DonationStats>;
    async fn completed_total(&self) -> Result<f64>;
}
