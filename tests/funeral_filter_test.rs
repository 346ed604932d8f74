use chrono::{DateTime, Duration, Utc};
use memoriam::{
    domain::{DateRange, FuneralFilter, FuneralStatus, NewFuneral, SortField, Timeframe},
    repository::{FuneralRepository, SqliteFuneralRepository},
};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use uuid::Uuid;

async fn setup() -> anyhow::Result<SqlitePool> {
    // One connection: a pooled :memory: database is per-connection
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(pool)
}

async fn create_approved(
    repo: &SqliteFuneralRepository,
    name: &str,
    region: &str,
    funeral_date: DateTime<Utc>,
) -> anyhow::Result<Uuid> {
    let funeral = repo
        .create(NewFuneral {
            deceased_name: name.to_string(),
            description: format!("In loving memory of {}", name),
            funeral_date,
            venue: Some("Community Centre".to_string()),
            region: Some(region.to_string()),
            poster_url: None,
            image_url: None,
        })
        .await?;
    repo.set_status(funeral.id, FuneralStatus::Approved).await?;
    Ok(funeral.id)
}

#[tokio::test]
async fn new_funerals_are_pending_and_not_publicly_listed() -> anyhow::Result<()> {
    let pool = setup().await?;
    let repo = SqliteFuneralRepository::new(pool);

    let funeral = repo
        .create(NewFuneral {
            deceased_name: "Kwame Mensah".to_string(),
            description: String::new(),
            funeral_date: Utc::now() + Duration::days(10),
            venue: None,
            region: None,
            poster_url: None,
            image_url: None,
        })
        .await?;

    assert_eq!(funeral.status, FuneralStatus::Pending);
    assert!(!funeral.featured);

    let page = repo.list_public(&FuneralFilter::default()).await?;
    assert_eq!(page.count, 0);
    assert!(page.rows.is_empty());

    // Approval alone publishes it
    repo.set_status(funeral.id, FuneralStatus::Approved).await?;
    let page = repo.list_public(&FuneralFilter::default()).await?;
    assert_eq!(page.count, 1);

    // Hiding pulls it back off the listing without touching approval
    repo.set_visibility(funeral.id, false).await?;
    let page = repo.list_public(&FuneralFilter::default()).await?;
    assert_eq!(page.count, 0);

    Ok(())
}

#[tokio::test]
async fn upcoming_and_past_partition_on_today() -> anyhow::Result<()> {
    let pool = setup().await?;
    let repo = SqliteFuneralRepository::new(pool);

    let past_id = create_approved(&repo, "Ama Serwaa", "Volta", Utc::now() - Duration::days(3)).await?;
    let future_id = create_approved(&repo, "Kofi Boateng", "Ashanti", Utc::now() + Duration::days(3)).await?;

    let upcoming = repo
        .list_public(&FuneralFilter {
            timeframe: Timeframe::Upcoming,
            ..Default::default()
        })
        .await?;
    assert_eq!(upcoming.count, 1);
    assert_eq!(upcoming.rows[0].id, future_id);

    let past = repo
        .list_public(&FuneralFilter {
            timeframe: Timeframe::Past,
            ..Default::default()
        })
        .await?;
    assert_eq!(past.count, 1);
    assert_eq!(past.rows[0].id, past_id);

    Ok(())
}

#[tokio::test]
async fn rolling_windows_run_forward_from_today() -> anyhow::Result<()> {
    let pool = setup().await?;
    let repo = SqliteFuneralRepository::new(pool);

    let soon_id = create_approved(&repo, "Yaa Asantewaa", "Ashanti", Utc::now() + Duration::days(3)).await?;
    create_approved(&repo, "Kojo Antwi", "Central", Utc::now() + Duration::days(20)).await?;
    create_approved(&repo, "Efua Sutherland", "Central", Utc::now() - Duration::days(5)).await?;

    let week = repo
        .list_public(&FuneralFilter {
            date_range: DateRange::Week,
            ..Default::default()
        })
        .await?;
    assert_eq!(week.count, 1);
    assert_eq!(week.rows[0].id, soon_id);

    let month = repo
        .list_public(&FuneralFilter {
            date_range: DateRange::Month,
            ..Default::default()
        })
        .await?;
    assert_eq!(month.count, 2);

    // A forward window intersected with Past is empty, not an error
    let contradiction = repo
        .list_public(&FuneralFilter {
            timeframe: Timeframe::Past,
            date_range: DateRange::Week,
            ..Default::default()
        })
        .await?;
    assert_eq!(contradiction.count, 0);

    Ok(())
}

#[tokio::test]
async fn search_and_region_filters() -> anyhow::Result<()> {
    let pool = setup().await?;
    let repo = SqliteFuneralRepository::new(pool);

    let mensah_id = create_approved(&repo, "Kwame Mensah", "Greater Accra", Utc::now() + Duration::days(5)).await?;
    create_approved(&repo, "Ama Serwaa", "Volta", Utc::now() + Duration::days(6)).await?;

    let by_name = repo
        .list_public(&FuneralFilter {
            search: Some("Mensah".to_string()),
            ..Default::default()
        })
        .await?;
    assert_eq!(by_name.count, 1);
    assert_eq!(by_name.rows[0].id, mensah_id);

    let by_region = repo
        .list_public(&FuneralFilter {
            region: Some("Volta".to_string()),
            ..Default::default()
        })
        .await?;
    assert_eq!(by_region.count, 1);
    assert_eq!(by_region.rows[0].deceased_name, "Ama Serwaa");

    let no_match = repo
        .list_public(&FuneralFilter {
            region: Some("Northern".to_string()),
            ..Default::default()
        })
        .await?;
    assert_eq!(no_match.count, 0);

    Ok(())
}

#[tokio::test]
async fn name_sort_and_pagination_count() -> anyhow::Result<()> {
    let pool = setup().await?;
    let repo = SqliteFuneralRepository::new(pool);

    create_approved(&repo, "Charlotte Osei", "Eastern", Utc::now() + Duration::days(1)).await?;
    create_approved(&repo, "adwoa Badoe", "Eastern", Utc::now() + Duration::days(2)).await?;
    create_approved(&repo, "Benjamin Quartey", "Eastern", Utc::now() + Duration::days(3)).await?;

    let page = repo
        .list_public(&FuneralFilter {
            sort: SortField::Name,
            limit: 2,
            offset: 0,
            ..Default::default()
        })
        .await?;

    // count covers the whole result set, not just the page
    assert_eq!(page.count, 3);
    assert_eq!(page.rows.len(), 2);
    assert_eq!(page.rows[0].deceased_name, "adwoa Badoe");
    assert_eq!(page.rows[1].deceased_name, "Benjamin Quartey");

    let rest = repo
        .list_public(&FuneralFilter {
            sort: SortField::Name,
            limit: 2,
            offset: 2,
            ..Default::default()
        })
        .await?;
    assert_eq!(rest.rows.len(), 1);
    assert_eq!(rest.rows[0].deceased_name, "Charlotte Osei");

    Ok(())
}

#[tokio::test]
async fn featured_listing_requires_public_visibility() -> anyhow::Result<()> {
    let pool = setup().await?;
    let repo = SqliteFuneralRepository::new(pool);

    let featured_id = create_approved(&repo, "Esi Amankwah", "Western", Utc::now() + Duration::days(4)).await?;
    repo.set_featured(featured_id, true).await?;

    // Featured but still pending: stays off the featured listing
    let pending = repo
        .create(NewFuneral {
            deceased_name: "Nana Yaw".to_string(),
            description: String::new(),
            funeral_date: Utc::now() + Duration::days(8),
            venue: None,
            region: None,
            poster_url: None,
            image_url: None,
        })
        .await?;
    repo.set_featured(pending.id, true).await?;

    let featured = repo.list_featured().await?;
    assert_eq!(featured.len(), 1);
    assert_eq!(featured[0].id, featured_id);

    Ok(())
}
