use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{Donation, DonationStats, DonationStatus, NewDonation},
    error::{AppError, Result},
    repository::DonationRepository,
};

#[derive(FromRow)]
struct DonationRow {
    id: String,
    funeral_id: String,
    donor_name: Option<String>,
    donor_email: Option<String>,
    amount: f64,
    currency: String,
    message: Option<String>,
    payment_method: Option<String>,
    status: String,
    payment_reference: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteDonationRepository {
    pool: SqlitePool,
}

impl SqliteDonationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_donation(row: DonationRow) -> Result<Donation> {
        Ok(Donation {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            funeral_id: Uuid::parse_str(&row.funeral_id)
                .map_err(|e| AppError::Database(e.to_string()))?,
            donor_name: row.donor_name,
            donor_email: row.donor_email,
            amount: row.amount,
            currency: row.currency,
            message: row.message,
            payment_method: row.payment_method,
            status: Self::parse_status(&row.status)?,
            payment_reference: row.payment_reference,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }

    fn parse_status(s: &str) -> Result<DonationStatus> {
        match s {
            "Pending" => Ok(DonationStatus::Pending),
            "Completed" => Ok(DonationStatus::Completed),
            "Failed" => Ok(DonationStatus::Failed),
            "Refunded" => Ok(DonationStatus::Refunded),
            _ => Err(AppError::Database(format!("Invalid donation status: {}", s))),
        }
    }

    fn status_to_str(status: &DonationStatus) -> &'static str {
        match status {
            DonationStatus::Pending => "Pending",
            DonationStatus::Completed => "Completed",
            DonationStatus::Failed => "Failed",
            DonationStatus::Refunded => "Refunded",
        }
    }
}

#[async_trait]
impl DonationRepository for SqliteDonationRepository {
    async fn create(&self, donation: NewDonation) -> Result<Donation> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let funeral_id_str = donation.funeral_id.to_string();
        let currency = donation.currency_or_default();
        let now = Utc::now().naive_utc();

        // status and payment_reference are not taken from the submission;
        // every donation starts Pending with no reference attached.
        sqlx::query(
            r#"
            INSERT INTO donations (
                id, funeral_id, donor_name, donor_email, amount, currency,
                message, payment_method, status, payment_reference,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, 'Pending', NULL, ?, ?)
            "#,
        )
        .bind(&id_str)
        .bind(&funeral_id_str)
        .bind(&donation.donor_name)
        .bind(&donation.donor_email)
        .bind(donation.amount)
        .bind(&currency)
        .bind(&donation.message)
        .bind(&donation.payment_method)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created donation".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Donation>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, DonationRow>(
            r#"
            SELECT id, funeral_id, donor_name, donor_email, amount, currency,
                   message, payment_method, status, payment_reference,
                   created_at, updated_at
            FROM donations
            WHERE id = ?
            "#,
        )
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_donation(r)?)),
            None => Ok(None),
        }
    }

    async fn list_for_funeral(&self, funeral_id: Uuid) -> Result<Vec<Donation>> {
        let funeral_id_str = funeral_id.to_string();
        let rows = sqlx::query_as::<_, DonationRow>(
            r#"
            SELECT id, funeral_id, donor_name, donor_email, amount, currency,
                   message, payment_method, status, payment_reference,
                   created_at, updated_at
            FROM donations
            WHERE funeral_id = ?
            ORDER BY created_at DESC, id ASC
            "#,
        )
        .bind(funeral_id_str)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_donation).collect()
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: DonationStatus,
        payment_reference: Option<&str>,
    ) -> Result<Donation> {
        if status == DonationStatus::Pending {
            return Err(AppError::Conflict(
                "A donation cannot be returned to Pending".to_string(),
            ));
        }

        let id_str = id.to_string();
        let status_str = Self::status_to_str(&status);
        let now = Utc::now().naive_utc();

        // Guarded update: only a Pending row may move. rows_affected == 0
        // then distinguishes "missing" from "already settled".
        let result = sqlx::query(
            r#"
            UPDATE donations
            SET status = ?,
                payment_reference = COALESCE(?, payment_reference),
                updated_at = ?
            WHERE id = ? AND status = 'Pending'
            "#,
        )
        .bind(status_str)
        .bind(payment_reference)
        .bind(now)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return match self.find_by_id(id).await? {
                None => Err(AppError::NotFound("Donation not found".to_string())),
                Some(existing) => Err(AppError::Conflict(format!(
                    "Donation is already {}",
                    Self::status_to_str(&existing.status)
                ))),
            };
        }

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated donation".to_string())
        })
    }

    async fn stats_for_funeral(&self, funeral_id: Uuid) -> Result<DonationStats> {
        let funeral_id_str = funeral_id.to_string();

        let (total, count): (f64, i64) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(amount), 0.0), COUNT(*)
            FROM donations
            WHERE funeral_id = ? AND status = 'Completed'
            "#,
        )
        .bind(&funeral_id_str)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        if count == 0 {
            return Ok(DonationStats::empty());
        }

        let rows = sqlx::query_as::<_, DonationRow>(
            r#"
            SELECT id, funeral_id, donor_name, donor_email, amount, currency,
                   message, payment_method, status, payment_reference,
                   created_at, updated_at
            FROM donations
            WHERE funeral_id = ? AND status = 'Completed'
            ORDER BY created_at DESC, id ASC
            LIMIT 5
            "#,
        )
        .bind(&funeral_id_str)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        let recent = rows
            .into_iter()
            .map(Self::row_to_donation)
            .collect::<Result<Vec<_>>>()?;

        Ok(DonationStats { total, count, recent })
    }

    async fn completed_total(&self) -> Result<f64> {
        let row: (f64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(amount), 0.0) FROM donations WHERE status = 'Completed'",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.0)
    }
}
