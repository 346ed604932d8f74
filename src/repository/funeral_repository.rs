use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDateTime, NaiveTime, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{Funeral, FuneralFilter, FuneralStatus, NewFuneral, SortField, Timeframe},
    error::{AppError, Result},
    repository::{FuneralPage, FuneralRepository},
};

const FUNERAL_COLUMNS: &str = "id, deceased_name, description, funeral_date, venue, region, \
     poster_url, image_url, program_pdf_url, status, is_visible, featured, created_at, updated_at";

#[derive(FromRow)]
struct FuneralRow {
    id: String,
    deceased_name: String,
    description: String,
    funeral_date: NaiveDateTime,
    venue: Option<String>,
    region: Option<String>,
    poster_url: Option<String>,
    image_url: Option<String>,
    program_pdf_url: Option<String>,
    status: String,
    is_visible: i32,
    featured: i32,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteFuneralRepository {
    pool: SqlitePool,
}

impl SqliteFuneralRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_funeral(row: FuneralRow) -> Result<Funeral> {
        Ok(Funeral {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            deceased_name: row.deceased_name,
            description: row.description,
            funeral_date: DateTime::from_naive_utc_and_offset(row.funeral_date, Utc),
            venue: row.venue,
            region: row.region,
            poster_url: row.poster_url,
            image_url: row.image_url,
            program_pdf_url: row.program_pdf_url,
            status: Self::parse_status(&row.status)?,
            is_visible: row.is_visible != 0,
            featured: row.featured != 0,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }

    fn parse_status(s: &str) -> Result<FuneralStatus> {
        match s {
            "Pending" => Ok(FuneralStatus::Pending),
            "Approved" => Ok(FuneralStatus::Approved),
            _ => Err(AppError::Database(format!("Invalid funeral status: {}", s))),
        }
    }

    fn status_to_str(status: &FuneralStatus) -> &'static str {
        match status {
            FuneralStatus::Pending => "Pending",
            FuneralStatus::Approved => "Approved",
        }
    }

    /// Midnight UTC today, the pivot for upcoming/past and the rolling
    /// windows.
    fn today() -> NaiveDateTime {
        Utc::now().date_naive().and_time(NaiveTime::MIN)
    }

    /// Appends the public-visibility predicate plus every active filter.
    /// Shared by the page query and the count query so both see the same
    /// rows.
    fn push_public_predicates(
        builder: &mut QueryBuilder<'_, Sqlite>,
        filter: &FuneralFilter,
        today: NaiveDateTime,
    ) {
        builder.push(" WHERE status = 'Approved' AND is_visible = 1");

        if let Some(search) = &filter.search {
            let pattern = format!("%{}%", search.trim());
            builder
                .push(" AND (deceased_name LIKE ")
                .push_bind(pattern.clone())
                .push(" OR description LIKE ")
                .push_bind(pattern)
                .push(")");
        }

        if let Some(region) = &filter.region {
            builder.push(" AND region = ").push_bind(region.clone());
        }

        match filter.timeframe {
            Timeframe::Upcoming => {
                builder.push(" AND funeral_date >= ").push_bind(today);
            }
            Timeframe::Past => {
                builder.push(" AND funeral_date < ").push_bind(today);
            }
            Timeframe::All => {}
        }

        // Rolling windows always run forward from today; with Past this
        // intersects to an empty range and simply returns no rows.
        if let Some(days) = filter.date_range.days() {
            let end = today + Duration::days(days);
            builder
                .push(" AND funeral_date >= ")
                .push_bind(today)
                .push(" AND funeral_date < ")
                .push_bind(end);
        }
    }

    /// ORDER BY clause for a sort field. Every variant ends on `id ASC` so
    /// equal keys come back in a stable order.
    fn order_clause(sort: SortField) -> &'static str {
        match sort {
            SortField::Date => "funeral_date ASC, id ASC",
            SortField::Name => "deceased_name COLLATE NOCASE ASC, id ASC",
            SortField::Recent => "created_at DESC, id ASC",
            SortField::Popular => {
                "(SELECT COUNT(*) FROM condolences c \
                  WHERE c.funeral_id = funerals.id AND c.is_approved = 1) DESC, \
                 funeral_date ASC, id ASC"
            }
        }
    }

    async fn fetch_after_update(&self, id: Uuid, rows_affected: u64) -> Result<Funeral> {
        if rows_affected == 0 {
            return Err(AppError::NotFound("Funeral not found".to_string()));
        }
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve updated funeral".to_string()))
    }
}

#[async_trait]
impl FuneralRepository for SqliteFuneralRepository {
    async fn create(&self, funeral: NewFuneral) -> Result<Funeral> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let funeral_date_naive = funeral.funeral_date.naive_utc();
        let now = Utc::now().naive_utc();

        // status/is_visible/featured are not taken from the submission;
        // every new funeral starts Pending, visible-once-approved, not
        // featured.
        sqlx::query(
            r#"
            INSERT INTO funerals (
                id, deceased_name, description, funeral_date, venue, region,
                poster_url, image_url, program_pdf_url, status, is_visible,
                featured, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, NULL, 'Pending', 1, 0, ?, ?)
            "#,
        )
        .bind(&id_str)
        .bind(&funeral.deceased_name)
        .bind(&funeral.description)
        .bind(funeral_date_naive)
        .bind(&funeral.venue)
        .bind(&funeral.region)
        .bind(&funeral.poster_url)
        .bind(&funeral.image_url)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created funeral".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Funeral>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, FuneralRow>(&format!(
            "SELECT {} FROM funerals WHERE id = ?",
            FUNERAL_COLUMNS
        ))
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_funeral(r)?)),
            None => Ok(None),
        }
    }

    async fn list_public(&self, filter: &FuneralFilter) -> Result<FuneralPage> {
        let today = Self::today();

        let mut count_builder = QueryBuilder::new("SELECT COUNT(*) FROM funerals");
        Self::push_public_predicates(&mut count_builder, filter, today);
        let count: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut builder =
            QueryBuilder::new(format!("SELECT {} FROM funerals", FUNERAL_COLUMNS));
        Self::push_public_predicates(&mut builder, filter, today);
        builder
            .push(" ORDER BY ")
            .push(Self::order_clause(filter.sort))
            .push(" LIMIT ")
            .push_bind(filter.limit)
            .push(" OFFSET ")
            .push_bind(filter.offset);

        let rows: Vec<FuneralRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let rows = rows
            .into_iter()
            .map(Self::row_to_funeral)
            .collect::<Result<Vec<_>>>()?;

        Ok(FuneralPage { rows, count })
    }

    async fn list_featured(&self) -> Result<Vec<Funeral>> {
        let rows = sqlx::query_as::<_, FuneralRow>(&format!(
            r#"
            SELECT {}
            FROM funerals
            WHERE status = 'Approved' AND is_visible = 1 AND featured = 1
            ORDER BY funeral_date ASC, id ASC
            "#,
            FUNERAL_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_funeral).collect()
    }

    async fn list_all(&self, limit: i64, offset: i64) -> Result<Vec<Funeral>> {
        let rows = sqlx::query_as::<_, FuneralRow>(&format!(
            r#"
            SELECT {}
            FROM funerals
            ORDER BY created_at DESC, id ASC
            LIMIT ? OFFSET ?
            "#,
            FUNERAL_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_funeral).collect()
    }

    async fn set_status(&self, id: Uuid, status: FuneralStatus) -> Result<Funeral> {
        let id_str = id.to_string();
        let status_str = Self::status_to_str(&status);
        let now = Utc::now().naive_utc();

        let result = sqlx::query("UPDATE funerals SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status_str)
            .bind(now)
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.fetch_after_update(id, result.rows_affected()).await
    }

    async fn set_visibility(&self, id: Uuid, visible: bool) -> Result<Funeral> {
        let id_str = id.to_string();
        let visible_int = if visible { 1i32 } else { 0i32 };
        let now = Utc::now().naive_utc();

        let result =
            sqlx::query("UPDATE funerals SET is_visible = ?, updated_at = ? WHERE id = ?")
                .bind(visible_int)
                .bind(now)
                .bind(&id_str)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

        self.fetch_after_update(id, result.rows_affected()).await
    }

    async fn set_featured(&self, id: Uuid, featured: bool) -> Result<Funeral> {
        let id_str = id.to_string();
        let featured_int = if featured { 1i32 } else { 0i32 };
        let now = Utc::now().naive_utc();

        let result = sqlx::query("UPDATE funerals SET featured = ?, updated_at = ? WHERE id = ?")
            .bind(featured_int)
            .bind(now)
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.fetch_after_update(id, result.rows_affected()).await
    }

    async fn set_program_pdf(&self, id: Uuid, url: &str) -> Result<Funeral> {
        let id_str = id.to_string();
        let now = Utc::now().naive_utc();

        let result =
            sqlx::query("UPDATE funerals SET program_pdf_url = ?, updated_at = ? WHERE id = ?")
                .bind(url)
                .bind(now)
                .bind(&id_str)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

        self.fetch_after_update(id, result.rows_affected()).await
    }

    async fn count_by_status(&self, status: FuneralStatus) -> Result<i64> {
        let status_str = Self::status_to_str(&status);

        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM funerals WHERE status = ?")
            .bind(status_str)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.0)
    }
}
