use chrono::{Duration, Utc};
use memoriam::{
    domain::{DonationStatus, NewCondolence, NewDonation, NewFuneral},
    error::AppError,
    repository::{
        CondolenceRepository, DonationRepository, FuneralRepository,
        SqliteCondolenceRepository, SqliteDonationRepository, SqliteFuneralRepository,
    },
};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use uuid::Uuid;

async fn setup() -> anyhow::Result<(SqlitePool, Uuid)> {
    // One connection: a pooled :memory: database is per-connection
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let funeral_repo = SqliteFuneralRepository::new(pool.clone());
    let funeral = funeral_repo
        .create(NewFuneral {
            deceased_name: "Kwabena Darko".to_string(),
            description: String::new(),
            funeral_date: Utc::now() + Duration::days(7),
            venue: None,
            region: Some("Ashanti".to_string()),
            poster_url: None,
            image_url: None,
        })
        .await?;

    Ok((pool, funeral.id))
}

fn condolence_for(funeral_id: Uuid) -> NewCondolence {
    NewCondolence {
        funeral_id,
        author_name: "Abena Owusu".to_string(),
        author_email: Some("abena@example.com".to_string()),
        author_location: Some("Kumasi".to_string()),
        message: "Rest well, our friend.".to_string(),
    }
}

fn donation_for(funeral_id: Uuid) -> NewDonation {
    NewDonation {
        funeral_id,
        donor_name: Some("Yaw Ofori".to_string()),
        donor_email: None,
        amount: 50.5,
        currency: None,
        message: None,
        payment_method: Some("mobile_money".to_string()),
    }
}

#[tokio::test]
async fn condolences_start_unapproved_and_publish_on_approval() -> anyhow::Result<()> {
    let (pool, funeral_id) = setup().await?;
    let repo = SqliteCondolenceRepository::new(pool);

    let condolence = repo.create(condolence_for(funeral_id)).await?;
    assert!(!condolence.is_approved);

    // Invisible to the public listing until approved
    let approved = repo.list_approved_for_funeral(funeral_id).await?;
    assert!(approved.is_empty());
    assert_eq!(repo.count_pending().await?, 1);

    let published = repo.approve(condolence.id).await?;
    assert!(published.is_approved);

    let approved = repo.list_approved_for_funeral(funeral_id).await?;
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0].id, condolence.id);
    assert_eq!(repo.count_pending().await?, 0);

    Ok(())
}

#[tokio::test]
async fn condolence_rejection_deletes_the_row() -> anyhow::Result<()> {
    let (pool, funeral_id) = setup().await?;
    let repo = SqliteCondolenceRepository::new(pool);

    let condolence = repo.create(condolence_for(funeral_id)).await?;
    repo.delete(condolence.id).await?;

    assert!(repo.find_by_id(condolence.id).await?.is_none());

    // Deleting again is a NotFound, not a silent no-op
    let err = repo.delete(condolence.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    Ok(())
}

#[tokio::test]
async fn donations_start_pending_with_default_currency() -> anyhow::Result<()> {
    let (pool, funeral_id) = setup().await?;
    let repo = SqliteDonationRepository::new(pool);

    let donation = repo.create(donation_for(funeral_id)).await?;
    assert_eq!(donation.status, DonationStatus::Pending);
    assert_eq!(donation.currency, "GHS");
    assert_eq!(donation.amount, 50.5);
    assert!(donation.payment_reference.is_none());

    Ok(())
}

#[tokio::test]
async fn confirmation_attaches_reference_and_settles_once() -> anyhow::Result<()> {
    let (pool, funeral_id) = setup().await?;
    let repo = SqliteDonationRepository::new(pool);

    let donation = repo.create(donation_for(funeral_id)).await?;

    let completed = repo
        .update_status(donation.id, DonationStatus::Completed, Some("ref123"))
        .await?;
    assert_eq!(completed.status, DonationStatus::Completed);
    assert_eq!(completed.payment_reference.as_deref(), Some("ref123"));

    // Post-pending states are terminal
    let err = repo
        .update_status(donation.id, DonationStatus::Refunded, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    Ok(())
}

#[tokio::test]
async fn donations_never_return_to_pending() -> anyhow::Result<()> {
    let (pool, funeral_id) = setup().await?;
    let repo = SqliteDonationRepository::new(pool);

    let donation = repo.create(donation_for(funeral_id)).await?;

    let err = repo
        .update_status(donation.id, DonationStatus::Pending, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // Missing rows are distinguished from settled ones
    let err = repo
        .update_status(Uuid::new_v4(), DonationStatus::Failed, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    Ok(())
}

#[tokio::test]
async fn submissions_reject_orphan_funeral_references() -> anyhow::Result<()> {
    let (pool, _funeral_id) = setup().await?;
    let repo = SqliteCondolenceRepository::new(pool);

    // Referential integrity lives in the store: an unknown funeral_id is
    // a database fault, surfaced before anything is persisted.
    let err = repo.create(condolence_for(Uuid::new_v4())).await.unwrap_err();
    assert!(matches!(err, AppError::Database(_)));

    Ok(())
}
