use chrono::{Duration, Utc};
use clap::Parser;
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::Name;
use fake::Fake;
use sqlx::sqlite::SqlitePoolOptions;

use memoriam::{
    domain::{DonationStatus, FuneralStatus, NewCondolence, NewDonation, NewFuneral},
    repository::{
        CondolenceRepository, DonationRepository, FuneralRepository,
        SqliteCondolenceRepository, SqliteDonationRepository, SqliteFuneralRepository,
    },
};

const REGIONS: &[&str] = &[
    "Greater Accra",
    "Ashanti",
    "Central",
    "Eastern",
    "Volta",
    "Western",
    "Northern",
];

#[derive(Parser)]
#[command(about = "Seed the database with demo funerals, condolences and donations")]
struct Args {
    /// Database URL (falls back to DATABASE_URL, then sqlite:memoriam.db)
    #[arg(long)]
    database_url: Option<String>,

    /// Number of funerals to create
    #[arg(long, default_value_t = 12)]
    funerals: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    println!("🌱 Starting database seeding...");

    let database_url = args
        .database_url
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| "sqlite:memoriam.db".to_string());

    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    println!("📋 Running migrations...");
    sqlx::migrate!("./migrations").run(&db_pool).await?;

    let funeral_repo = SqliteFuneralRepository::new(db_pool.clone());
    let condolence_repo = SqliteCondolenceRepository::new(db_pool.clone());
    let donation_repo = SqliteDonationRepository::new(db_pool.clone());

    println!("🕯️  Creating {} funerals...", args.funerals);

    let mut condolence_count = 0usize;
    let mut donation_count = 0usize;

    for i in 0..args.funerals {
        // Spread dates from a month back to two months out
        let offset_days = (-30..60).fake::<i64>();
        let region = REGIONS[(0..REGIONS.len()).fake::<usize>()];

        let funeral = funeral_repo
            .create(NewFuneral {
                deceased_name: Name().fake(),
                description: Sentence(8..16).fake(),
                funeral_date: Utc::now() + Duration::days(offset_days),
                venue: Some(format!("{} Community Centre", region)),
                region: Some(region.to_string()),
                poster_url: None,
                image_url: None,
            })
            .await?;

        // Roughly two thirds approved, a few of those featured
        if i % 3 != 0 {
            funeral_repo
                .set_status(funeral.id, FuneralStatus::Approved)
                .await?;
            if i % 5 == 0 {
                funeral_repo.set_featured(funeral.id, true).await?;
            }
        }

        for j in 0..(0..5).fake::<usize>() {
            let condolence = condolence_repo
                .create(NewCondolence {
                    funeral_id: funeral.id,
                    author_name: Name().fake(),
                    author_email: None,
                    author_location: Some(region.to_string()),
                    message: Sentence(6..20).fake(),
                })
                .await?;
            if j % 2 == 0 {
                condolence_repo.approve(condolence.id).await?;
            }
            condolence_count += 1;
        }

        for j in 0..(0..4).fake::<usize>() {
            let donation = donation_repo
                .create(NewDonation {
                    funeral_id: funeral.id,
                    donor_name: Some(Name().fake()),
                    donor_email: None,
                    amount: (20.0..500.0).fake::<f64>(),
                    currency: None,
                    message: None,
                    payment_method: Some("mobile_money".to_string()),
                })
                .await?;
            if j % 2 == 0 {
                donation_repo
                    .update_status(
                        donation.id,
                        DonationStatus::Completed,
                        Some(&format!("seed-ref-{}", donation.id)),
                    )
                    .await?;
            }
            donation_count += 1;
        }
    }

    println!(
        "  ✅ Created {} funerals, {} condolences, {} donations",
        args.funerals, condolence_count, donation_count
    );
    println!("🎉 Seeding complete");

    Ok(())
}
