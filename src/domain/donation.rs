use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_CURRENCY: &str = "GHS";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Donation {
    pub id: Uuid,
    pub funeral_id: Uuid,
    pub donor_name: Option<String>,
    pub donor_email: Option<String>,
    pub amount: f64,
    pub currency: String,
    pub message: Option<String>,
    pub payment_method: Option<String>,
    pub status: DonationStatus,
    pub payment_reference: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "TEXT")]
pub enum DonationStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl DonationStatus {
    /// Parses an API status token. Pending parses too; the store rejects
    /// it as a transition target.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "pending" => Some(DonationStatus::Pending),
            "completed" => Some(DonationStatus::Completed),
            "failed" => Some(DonationStatus::Failed),
            "refunded" => Some(DonationStatus::Refunded),
            _ => None,
        }
    }
}

/// Public submission shape. Has no `status` or `payment_reference` field:
/// every donation is persisted Pending and only a confirmation or admin
/// action moves it on.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewDonation {
    pub funeral_id: Uuid,
    pub donor_name: Option<String>,
    #[validate(email(message = "donor_email is not a valid email"))]
    pub donor_email: Option<String>,
    #[serde(deserialize_with = "amount_from_number_or_string")]
    #[validate(range(exclusive_min = 0.0, message = "amount must be positive"))]
    pub amount: f64,
    pub currency: Option<String>,
    pub message: Option<String>,
    pub payment_method: Option<String>,
}

impl NewDonation {
    /// Currency to persist: the submitted 3-letter code, or the platform
    /// default when absent or blank.
    pub fn currency_or_default(&self) -> String {
        self.currency
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_uppercase)
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string())
    }
}

/// Aggregate donation figures for one funeral. Only Completed rows count;
/// `recent` holds at most the 5 newest, most recent first.
#[derive(Debug, Clone, Serialize)]
pub struct DonationStats {
    pub total: f64,
    pub count: i64,
    pub recent: Vec<Donation>,
}

impl DonationStats {
    pub fn empty() -> Self {
        Self { total: 0.0, count: 0, recent: Vec::new() }
    }
}

/// Payment forms post amounts as strings, API clients as numbers; accept
/// either.
fn amount_from_number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom("amount is not a number")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_accepts_number_or_numeric_string() {
        let from_number: NewDonation =
            serde_json::from_str(r#"{"funeral_id":"8c4b86f4-16a5-4c3e-9606-22b6e7dd27a2","amount":50.5}"#)
                .unwrap();
        assert_eq!(from_number.amount, 50.5);

        let from_string: NewDonation =
            serde_json::from_str(r#"{"funeral_id":"8c4b86f4-16a5-4c3e-9606-22b6e7dd27a2","amount":"50.5"}"#)
                .unwrap();
        assert_eq!(from_string.amount, 50.5);

        let bad: Result<NewDonation, _> =
            serde_json::from_str(r#"{"funeral_id":"8c4b86f4-16a5-4c3e-9606-22b6e7dd27a2","amount":"fifty"}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn currency_defaults_when_absent_or_blank() {
        let donation: NewDonation =
            serde_json::from_str(r#"{"funeral_id":"8c4b86f4-16a5-4c3e-9606-22b6e7dd27a2","amount":10}"#)
                .unwrap();
        assert_eq!(donation.currency_or_default(), "GHS");

        let donation: NewDonation = serde_json::from_str(
            r#"{"funeral_id":"8c4b86f4-16a5-4c3e-9606-22b6e7dd27a2","amount":10,"currency":" usd "}"#,
        )
        .unwrap();
        assert_eq!(donation.currency_or_default(), "USD");
    }
}
