use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Funeral {
    pub id: Uuid,
    pub deceased_name: String,
    pub description: String,
    pub funeral_date: DateTime<Utc>,
    pub venue: Option<String>,
    pub region: Option<String>,
    pub poster_url: Option<String>,
    pub image_url: Option<String>,
    pub program_pdf_url: Option<String>,
    pub status: FuneralStatus,
    pub is_visible: bool,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::Type, PartialEq)]
#[sqlx(type_name = "TEXT")]
pub enum FuneralStatus {
    Pending,
    Approved,
}

/// Public submission shape. Deliberately carries no `status`, `is_visible`
/// or `featured` fields: new funerals are always persisted as Pending, so
/// the moderation override is enforced by the type, not by a runtime check.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewFuneral {
    #[validate(length(min = 1, message = "deceased_name is required"))]
    pub deceased_name: String,
    #[serde(default)]
    pub description: String,
    pub funeral_date: DateTime<Utc>,
    pub venue: Option<String>,
    pub region: Option<String>,
    pub poster_url: Option<String>,
    pub image_url: Option<String>,
}

/// Which side of "today" a funeral falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timeframe {
    Upcoming,
    Past,
    #[default]
    All,
}

/// Forward rolling window from today. Only narrows results further;
/// combined with `Timeframe::Past` the window is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateRange {
    Week,
    Month,
    #[default]
    All,
}

/// Sort order for listings. Every variant tie-breaks on `id ASC` so equal
/// keys still come back in a stable order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    /// Funeral date, soonest first.
    #[default]
    Date,
    /// Deceased name, case-insensitive.
    Name,
    /// Most recently created first.
    Recent,
    /// Approved condolence count, highest first.
    Popular,
}

/// Fully-enumerated filter options for the public funeral listing.
///
/// Defaults: no text/region filter, `Timeframe::All`, `DateRange::All`,
/// `SortField::Date`, limit 20 (capped at 100), offset 0.
#[derive(Debug, Clone)]
pub struct FuneralFilter {
    pub search: Option<String>,
    pub region: Option<String>,
    pub timeframe: Timeframe,
    pub date_range: DateRange,
    pub sort: SortField,
    pub limit: i64,
    pub offset: i64,
}

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;

impl Default for FuneralFilter {
    fn default() -> Self {
        Self {
            search: None,
            region: None,
            timeframe: Timeframe::All,
            date_range: DateRange::All,
            sort: SortField::Date,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl FuneralFilter {
    /// Builds a filter from raw query-string values, sanitizing tokens and
    /// falling back to the documented default on anything unrecognized.
    pub fn from_raw(
        search: Option<String>,
        region: Option<String>,
        status: Option<&str>,
        date_range: Option<&str>,
        sort_by: Option<&str>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Self {
        Self {
            search: search.filter(|s| !s.trim().is_empty()),
            region: region.filter(|r| !r.trim().is_empty()),
            timeframe: status.map(Timeframe::parse).unwrap_or_default(),
            date_range: date_range.map(DateRange::parse).unwrap_or_default(),
            sort: sort_by.map(SortField::parse).unwrap_or_default(),
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
            offset: offset.unwrap_or(0).max(0),
        }
    }
}

/// Truncates a raw query token at the first `.` or `:` separator, so a
/// value like `"date.asc"` matches on `"date"`.
fn sanitize_token(raw: &str) -> &str {
    raw.split(['.', ':'])
        .next()
        .unwrap_or("")
        .trim()
}

impl Timeframe {
    pub fn parse(raw: &str) -> Self {
        match sanitize_token(raw) {
            "upcoming" => Timeframe::Upcoming,
            "past" => Timeframe::Past,
            _ => Timeframe::All,
        }
    }
}

impl DateRange {
    pub fn parse(raw: &str) -> Self {
        match sanitize_token(raw) {
            "week" => DateRange::Week,
            "month" => DateRange::Month,
            _ => DateRange::All,
        }
    }

    /// Window length in days, when the range narrows at all.
    pub fn days(&self) -> Option<i64> {
        match self {
            DateRange::Week => Some(7),
            DateRange::Month => Some(30),
            DateRange::All => None,
        }
    }
}

impl SortField {
    pub fn parse(raw: &str) -> Self {
        match sanitize_token(raw) {
            "name" => SortField::Name,
            "recent" => SortField::Recent,
            "popular" => SortField::Popular,
            _ => SortField::Date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_tokens_are_truncated_at_separator() {
        assert_eq!(SortField::parse("date.asc"), SortField::Date);
        assert_eq!(SortField::parse("name:desc"), SortField::Name);
        assert_eq!(SortField::parse("popular.nullslast.asc"), SortField::Popular);
    }

    #[test]
    fn unrecognized_tokens_fall_back_to_defaults() {
        assert_eq!(SortField::parse("price"), SortField::Date);
        assert_eq!(Timeframe::parse("tomorrow"), Timeframe::All);
        assert_eq!(DateRange::parse("fortnight"), DateRange::All);
    }

    #[test]
    fn blank_search_and_region_mean_no_filter() {
        let filter = FuneralFilter::from_raw(
            Some("  ".to_string()),
            Some(String::new()),
            None,
            None,
            None,
            None,
            None,
        );
        assert!(filter.search.is_none());
        assert!(filter.region.is_none());
    }

    #[test]
    fn limit_is_defaulted_and_capped() {
        let filter = FuneralFilter::from_raw(None, None, None, None, None, None, None);
        assert_eq!(filter.limit, 20);

        let filter = FuneralFilter::from_raw(None, None, None, None, None, Some(5000), Some(-3));
        assert_eq!(filter.limit, 100);
        assert_eq!(filter.offset, 0);
    }
}
