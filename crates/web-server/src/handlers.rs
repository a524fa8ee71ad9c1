use crate::{AppState, error::AppError};
use auth::verify_password;
use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use core_types::{ChartPoint, NewUser};
use database::{DbError, Repository, SalesStore, UserStore};
use forecaster::{ForecastError, combine_with_history, forecast};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task;

const EMAIL_TAKEN: &str = "Email already registered";
const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    pub country: Option<String>,
    pub product_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Treats absent and empty fields alike.
fn present(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

/// # GET /test_db_connection
pub async fn test_db_connection(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MessageResponse>, AppError> {
    state.repo.ping().await?;
    Ok(Json(MessageResponse {
        message: "Successfully connected to the database.".to_string(),
    }))
}

/// # POST /login
/// Exchanges an email and password for an access token.
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(payload) = payload?;
    let (Some(email), Some(password)) = (present(payload.email), present(payload.password)) else {
        return Err(AppError::BadRequest("Missing email or password".to_string()));
    };

    let user = match state.repo.find_user_by_email(&email).await? {
        Some(user) => {
            let stored_hash = user.password_hash.clone();
            let verified =
                task::spawn_blocking(move || verify_password(&password, &stored_hash)).await?;
            verified.then_some(user)
        }
        None => None,
    };

    let Some(user) = user else {
        tracing::warn!("Rejected login attempt.");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    let access_token = state.signer.issue(&user.id.to_string())?;
    tracing::info!(user_id = %user.id, "User logged in.");

    Ok(Json(LoginResponse {
        access_token,
        name: user.name,
    }))
}

/// # POST /register
/// Creates a pending account with the default role.
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let Json(payload) = payload?;
    let (Some(name), Some(email), Some(phone), Some(password)) = (
        present(payload.name),
        present(payload.email),
        present(payload.phone),
        present(payload.password),
    ) else {
        return Err(AppError::BadRequest("Missing fields".to_string()));
    };

    if state.repo.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::BadRequest(EMAIL_TAKEN.to_string()));
    }

    let password_hash = task::spawn_blocking(move || auth::hash_password(&password)).await??;
    let new_user = NewUser::pending(name, email, phone, password_hash);

    // The unique index still catches a registration racing this one.
    let user_id = state.repo.insert_user(&new_user).await.map_err(|e| match e {
        DbError::DuplicateEmail => AppError::BadRequest(EMAIL_TAKEN.to_string()),
        e => e.into(),
    })?;
    tracing::info!(%user_id, "User registered.");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            user_id: user_id.to_string(),
        }),
    ))
}

/// # GET /fetch_chart_data?country=..&product_id=..
/// Returns the product's sales history with the forecast zipped onto the
/// first `FORECAST_HORIZON` records.
pub async fn fetch_chart_data(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ChartQuery>, QueryRejection>,
) -> Result<Json<Vec<ChartPoint>>, AppError> {
    let Query(query) = query?;
    let (Some(country), Some(product_id)) = (present(query.country), present(query.product_id))
    else {
        return Err(AppError::BadRequest("Missing country or product_id".to_string()));
    };

    let records = state.repo.find_sales_records(&country, &product_id).await?;

    let result = forecast(&records).map_err(|e| match e {
        ForecastError::EmptyInput => AppError::NotFound(format!(
            "No sales data found for country '{country}' and product '{product_id}'"
        )),
    })?;
    tracing::info!(%country, %product_id, records = records.len(), level = result.level(), "Forecast computed.");

    Ok(Json(combine_with_history(records, &result)))
}
