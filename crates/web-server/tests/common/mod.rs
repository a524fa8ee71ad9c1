use async_trait::async_trait;
use auth::TokenSigner;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::Utc;
use core_types::{NewUser, SalesRecord, User};
use database::{DbError, Repository, SalesStore, UserStore};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use uuid::Uuid;
use web_server::{AppState, build_router};

pub const TEST_SECRET: &str = "test-secret";

/// In-memory stand-in for the Postgres repository.
#[derive(Default)]
pub struct MemoryRepository {
    pub users: Mutex<Vec<User>>,
    pub sales: Vec<SalesRecord>,
    pub offline: bool,
}

impl MemoryRepository {
    pub fn with_sales(sales: Vec<SalesRecord>) -> Self {
        Self {
            sales,
            ..Self::default()
        }
    }
}

#[async_trait]
impl UserStore for MemoryRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, user: &NewUser) -> Result<Uuid, DbError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(DbError::DuplicateEmail);
        }

        let id = Uuid::new_v4();
        users.push(User {
            id,
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            password_hash: user.password_hash.clone(),
            role: user.role.clone(),
            status: user.status.clone(),
            created_at: Utc::now(),
        });
        Ok(id)
    }
}

#[async_trait]
impl SalesStore for MemoryRepository {
    async fn find_sales_records(
        &self,
        country: &str,
        product_id: &str,
    ) -> Result<Vec<SalesRecord>, DbError> {
        Ok(self
            .sales
            .iter()
            .filter(|r| r.country == country && r.product_id == product_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn ping(&self) -> Result<(), DbError> {
        if self.offline {
            return Err(DbError::ConnectionConfigError("database is offline".to_string()));
        }
        Ok(())
    }
}

pub struct TestApp {
    pub repo: Arc<MemoryRepository>,
    pub signer: TokenSigner,
    pub router: Router,
}

impl TestApp {
    pub fn new(repo: MemoryRepository) -> Self {
        let repo = Arc::new(repo);
        let signer = TokenSigner::new(TEST_SECRET, chrono::Duration::minutes(15));
        let state = Arc::new(AppState::new(repo.clone(), signer.clone()));

        Self {
            repo,
            signer,
            router: build_router(state),
        }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        self.post_raw(uri, body.to_string()).await
    }

    pub async fn post_raw(&self, uri: &str, body: String) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }
}
