use ecotrack_core::AppError;
use sqlx::MySqlPool;
use tracing::instrument;

use super::model::{User, UserCredentials};

pub struct UserService;

/// Emails are stored and compared trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl UserService {
    #[instrument(skip(db))]
    pub async fn find_by_id(db: &MySqlPool, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, is_verified, location, bio, monthly_goal_kg, created_at, updated_at
             FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(user)
    }

    /// Like [`find_by_id`](Self::find_by_id) but a missing account is a 404.
    pub async fn get_by_id(db: &MySqlPool, id: i64) -> Result<User, AppError> {
        Self::find_by_id(db, id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))
    }

    #[instrument(skip(db))]
    pub async fn find_by_email(db: &MySqlPool, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, is_verified, location, bio, monthly_goal_kg, created_at, updated_at
             FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(db)
        .await?;

        Ok(user)
    }

    #[instrument(skip(db))]
    pub async fn credentials_by_email(
        db: &MySqlPool,
        email: &str,
    ) -> Result<Option<UserCredentials>, AppError> {
        let credentials = sqlx::query_as::<_, UserCredentials>(
            "SELECT id, email, password_hash FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(db)
        .await?;

        Ok(credentials)
    }

    #[instrument(skip(db))]
    pub async fn credentials_by_id(
        db: &MySqlPool,
        id: i64,
    ) -> Result<Option<UserCredentials>, AppError> {
        let credentials = sqlx::query_as::<_, UserCredentials>(
            "SELECT id, email, password_hash FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(credentials)
    }

    /// Inserts an account and returns it. A concurrent registration of the
    /// same email surfaces as a 409 through the unique index.
    #[instrument(skip(db, password_hash))]
    pub async fn create(
        db: &MySqlPool,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let result = sqlx::query("INSERT INTO users (name, email, password_hash) VALUES (?, ?, ?)")
            .bind(name)
            .bind(email)
            .bind(password_hash)
            .execute(db)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::conflict(anyhow::anyhow!("Email already registered"))
                } else {
                    AppError::from(e)
                }
            })?;

        Self::get_by_id(db, result.last_insert_id() as i64).await
    }

    #[instrument(skip(db))]
    pub async fn mark_verified(db: &MySqlPool, id: i64) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET is_verified = TRUE WHERE id = ?")
            .bind(id)
            .execute(db)
            .await?;

        Ok(())
    }

    #[instrument(skip(db, password_hash))]
    pub async fn update_password(
        db: &MySqlPool,
        id: i64,
        password_hash: &str,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
            .bind(password_hash)
            .bind(id)
            .execute(db)
            .await?;

        Ok(())
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
        assert_eq!(normalize_email("ada@example.com"), "ada@example.com");
    }
}
