use crate::error::CoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;
use uuid::Uuid;

/// Role assigned to every self-registered account.
pub const DEFAULT_ROLE: &str = "user";
/// Accounts start out pending until an operator approves them.
pub const DEFAULT_STATUS: &str = "pending";

/// Keys owned by the fixed fields of a serialized `ChartPoint`.
///
/// Passthrough attributes may not use them, or the flattened output would
/// carry duplicate keys.
pub const RESERVED_FIELDS: [&str; 5] = ["_id", "country", "product_id", "sales", "prediction"];

/// Drops every reserved key from a passthrough attribute map.
pub fn strip_reserved(mut attributes: Map<String, Value>) -> Map<String, Value> {
    attributes.retain(|key, _| !RESERVED_FIELDS.contains(&key.as_str()));
    attributes
}

/// One historical sales observation for a product in a country.
///
/// Any extra fields stored alongside the record (month, currency, ...) are
/// carried through untouched in `attributes` and flattened back into the
/// JSON object on output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub country: String,
    pub product_id: String,
    pub sales: f64,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl SalesRecord {
    /// Builds a record with no passthrough attributes.
    ///
    /// Rejects non-finite sales figures, which would poison every smoothed
    /// value computed after them.
    pub fn new(
        country: impl Into<String>,
        product_id: impl Into<String>,
        sales: f64,
    ) -> Result<Self, CoreError> {
        if !sales.is_finite() {
            return Err(CoreError::InvalidInput(
                "sales".to_string(),
                format!("expected a finite number, got {sales}"),
            ));
        }

        Ok(Self {
            id: None,
            country: country.into(),
            product_id: product_id.into(),
            sales,
            attributes: Map::new(),
        })
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    /// Adds a passthrough attribute. Reserved keys are ignored.
    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        let key = key.into();
        if !RESERVED_FIELDS.contains(&key.as_str()) {
            self.attributes.insert(key, value);
        }
        self
    }
}

/// A historical record paired with the forecast value assigned to its position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    #[serde(flatten)]
    pub record: SalesRecord,
    pub prediction: Option<f64>,
}

/// A row from the `users` table.
///
/// Not `Serialize`: the password hash must never end up in a response.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub role: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// The data needed to insert a new account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub role: String,
    pub status: String,
}

impl NewUser {
    /// A freshly registered account with the default role and a pending status.
    pub fn pending(name: String, email: String, phone: String, password_hash: String) -> Self {
        Self {
            name,
            email,
            phone,
            password_hash,
            role: DEFAULT_ROLE.to_string(),
            status: DEFAULT_STATUS.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_rejects_non_finite_sales() {
        let result = SalesRecord::new("US", "p1", f64::NAN);
        assert!(matches!(result, Err(CoreError::InvalidInput(field, _)) if field == "sales"));
        assert!(SalesRecord::new("US", "p1", f64::INFINITY).is_err());
    }

    #[test]
    fn test_record_flattens_attributes_and_renames_id() {
        let id = Uuid::new_v4();
        let record = SalesRecord::new("US", "p1", 12.5)
            .unwrap()
            .with_id(id)
            .with_attribute("month", json!("2024-01"));

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["_id"], json!(id.to_string()));
        assert_eq!(value["month"], json!("2024-01"));
        assert_eq!(value["sales"], json!(12.5));
        assert!(value.get("attributes").is_none());
    }

    #[test]
    fn test_reserved_attributes_cannot_shadow_fixed_fields() {
        let record = SalesRecord::new("US", "p", 100.0)
            .unwrap()
            .with_attribute("sales", json!("oops"))
            .with_attribute("prediction", json!(1))
            .with_attribute("month", json!(3));
        assert_eq!(record.attributes.len(), 1);

        let mut raw = Map::new();
        raw.insert("sales".to_string(), json!("oops"));
        raw.insert("_id".to_string(), json!("x"));
        raw.insert("country".to_string(), json!("FR"));
        raw.insert("product_id".to_string(), json!("q"));
        raw.insert("prediction".to_string(), json!(1));
        raw.insert("region".to_string(), json!("west"));
        let mut record = record;
        record.attributes.extend(strip_reserved(raw));

        let point = ChartPoint { record, prediction: Some(5.0) };
        let text = serde_json::to_string(&point).unwrap();
        assert_eq!(text.matches("\"sales\"").count(), 1);
        assert_eq!(text.matches("\"prediction\"").count(), 1);
        assert_eq!(text.matches("\"country\"").count(), 1);

        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["sales"], json!(100.0));
        assert_eq!(value["prediction"], json!(5.0));
        assert_eq!(value["region"], json!("west"));
    }

    #[test]
    fn test_chart_point_serializes_null_prediction() {
        let record = SalesRecord::new("DE", "p9", 3.0).unwrap();
        let point = ChartPoint { record, prediction: None };

        let value = serde_json::to_value(&point).unwrap();
        assert_eq!(value["prediction"], Value::Null);
        assert_eq!(value["country"], json!("DE"));
        assert!(value.get("_id").is_none());
    }

    #[test]
    fn test_new_user_defaults() {
        let user = NewUser::pending(
            "Ada".to_string(),
            "ada@example.com".to_string(),
            "555-0100".to_string(),
            "hash".to_string(),
        );
        assert_eq!(user.role, DEFAULT_ROLE);
        assert_eq!(user.status, DEFAULT_STATUS);
    }
}
