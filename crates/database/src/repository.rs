use crate::DbError;
use crate::connection::check_connection;
use crate::store::{Repository, SalesStore, UserStore};
use async_trait::async_trait;
use core_types::{NewUser, SalesRecord, User, strip_reserved};
use serde_json::{Map, Value};
use sqlx::FromRow;
use sqlx::postgres::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

// This struct represents a row fetched from the sales_records table.
#[derive(FromRow, Debug, Clone)]
struct DbSalesRecord {
    id: Uuid,
    country: String,
    product_id: String,
    sales: f64,
    attributes: Json<Map<String, Value>>,
}

impl From<DbSalesRecord> for SalesRecord {
    fn from(row: DbSalesRecord) -> Self {
        Self {
            id: Some(row.id),
            country: row.country,
            product_id: row.product_id,
            sales: row.sales,
            attributes: strip_reserved(row.attributes.0),
        }
    }
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for DbRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, phone, password_hash, role, status, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert_user(&self, user: &NewUser) -> Result<Uuid, DbError> {
        let user_id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, phone, password_hash, role, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
            "#,
        )
        .bind(user_id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.password_hash)
        .bind(&user.role)
        .bind(&user.status)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => DbError::DuplicateEmail,
            e => e.into(),
        })?;

        Ok(user_id)
    }
}

#[async_trait]
impl SalesStore for DbRepository {
    async fn find_sales_records(
        &self,
        country: &str,
        product_id: &str,
    ) -> Result<Vec<SalesRecord>, DbError> {
        let rows = sqlx::query_as::<_, DbSalesRecord>(
            r#"
            SELECT id, country, product_id, sales, attributes
            FROM sales_records
            WHERE country = $1 AND product_id = $2
            ORDER BY recorded_at ASC, id ASC
            "#,
        )
        .bind(country)
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SalesRecord::from).collect())
    }
}

#[async_trait]
impl Repository for DbRepository {
    async fn ping(&self) -> Result<(), DbError> {
        check_connection(&self.pool).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_conversion_keeps_attributes() {
        let id = Uuid::new_v4();
        let mut attributes = Map::new();
        attributes.insert("month".to_string(), json!("2024-03"));

        let record = SalesRecord::from(DbSalesRecord {
            id,
            country: "US".to_string(),
            product_id: "p1".to_string(),
            sales: 42.0,
            attributes: Json(attributes),
        });

        assert_eq!(record.id, Some(id));
        assert_eq!(record.sales, 42.0);
        assert_eq!(record.attributes["month"], json!("2024-03"));
    }

    #[test]
    fn test_row_conversion_drops_reserved_attributes() {
        let mut attributes = Map::new();
        attributes.insert("sales".to_string(), json!("oops"));
        attributes.insert("prediction".to_string(), json!(1));
        attributes.insert("month".to_string(), json!(4));

        let record = SalesRecord::from(DbSalesRecord {
            id: Uuid::new_v4(),
            country: "US".to_string(),
            product_id: "p".to_string(),
            sales: 100.0,
            attributes: Json(attributes),
        });

        assert_eq!(record.attributes.len(), 1);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["sales"], json!(100.0));
        assert_eq!(value["month"], json!(4));
    }
}
