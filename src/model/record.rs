use crate::model::Amount;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single expense entry in the spending journal.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Record {
    /// Also read from `spending_id`, the name used by earlier exports.
    #[serde(alias = "spending_id")]
    pub(crate) id: u64,
    pub(crate) category: String,
    #[serde(default)]
    pub(crate) description: String,
    pub(crate) amount: Amount,
    /// Serialized as `YYYY-MM-DD`.
    pub(crate) date: NaiveDate,
}

impl Record {
    pub fn new(
        id: u64,
        category: impl Into<String>,
        description: impl Into<String>,
        amount: Amount,
        date: NaiveDate,
    ) -> Self {
        Self {
            id,
            category: category.into(),
            description: description.into(),
            amount,
            date,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_deserialize_seed_style_record() {
        let json = r#"{
            "id": 3,
            "category": "Transport",
            "description": "BTS card top-up",
            "amount": 200,
            "date": "2024-03-05"
        }"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.id(), 3);
        assert_eq!(record.amount().value(), Decimal::from(200));
        assert_eq!(record.date(), NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    }

    #[test]
    fn test_deserialize_spending_id() {
        let json = r#"{
            "spending_id": 16,
            "category": "Food",
            "description": "Som tam",
            "amount": 45.5,
            "date": "2024-03-06"
        }"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.id(), 16);
        assert_eq!(record.amount().value(), Decimal::new(455, 1));

        let written = serde_json::to_value(&record).unwrap();
        assert_eq!(written["id"], 16);
        assert!(written.get("spending_id").is_none());
    }

    #[test]
    fn test_bad_date_is_rejected() {
        let json = r#"{"id": 1, "category": "Food", "amount": 1, "date": "2024-02-30"}"#;
        assert!(serde_json::from_str::<Record>(json).is_err());
    }
}
