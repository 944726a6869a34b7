use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A registered account, as returned by the API. Never carries the password
/// hash.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub is_verified: bool,
    pub location: Option<String>,
    pub bio: Option<String>,
    /// Monthly CO2e budget in kg
    pub monthly_goal_kg: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(FromRow, Debug, Clone)]
pub struct UserCredentials {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
}
