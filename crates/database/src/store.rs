use crate::error::DbError;
use async_trait::async_trait;
use core_types::{NewUser, SalesRecord, User};
use uuid::Uuid;

/// Account persistence used by the login and registration handlers.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DbError>;

    /// Inserts the user and returns its new id.
    ///
    /// Returns `DbError::DuplicateEmail` if the email is already taken.
    async fn insert_user(&self, user: &NewUser) -> Result<Uuid, DbError>;
}

/// Read access to historical sales.
#[async_trait]
pub trait SalesStore: Send + Sync {
    /// All records for one product in one country, oldest first.
    async fn find_sales_records(
        &self,
        country: &str,
        product_id: &str,
    ) -> Result<Vec<SalesRecord>, DbError>;
}

/// Everything the web layer needs from storage.
#[async_trait]
pub trait Repository: UserStore + SalesStore {
    /// Cheap round trip proving the backing store is reachable.
    async fn ping(&self) -> Result<(), DbError>;
}
