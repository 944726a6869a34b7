use anyhow::anyhow;
use chrono::{Datelike, NaiveDate, Utc};
use ecotrack_core::{AppError, hash_password, verify_password};
use sqlx::{FromRow, MySqlPool};
use tracing::{info, instrument, warn};

use crate::modules::footprints::calculator::round_kg;
use crate::modules::users::service::UserService;

use super::model::{ChangePasswordRequest, ProfileResponse, ProfileStats, UpdateProfileRequest};

pub struct ProfileService;

impl ProfileService {
    #[instrument(skip(db))]
    pub async fn get_profile(db: &MySqlPool, user_id: i64) -> Result<ProfileResponse, AppError> {
        #[derive(FromRow)]
        struct Totals {
            entries: i64,
            total_co2e_kg: f64,
            month_co2e_kg: f64,
        }

        let user = UserService::get_by_id(db, user_id).await?;
        let month_start = first_of_month(Utc::now().date_naive());

        let totals = sqlx::query_as::<_, Totals>(
            "SELECT COUNT(*) AS entries,
                    COALESCE(SUM(co2e_kg), 0) AS total_co2e_kg,
                    COALESCE(SUM(CASE WHEN recorded_on >= ? THEN co2e_kg ELSE 0 END), 0) AS month_co2e_kg
             FROM footprints WHERE user_id = ?",
        )
        .bind(month_start)
        .bind(user_id)
        .fetch_one(db)
        .await?;

        let stats = ProfileStats {
            entries: totals.entries,
            total_co2e_kg: round_kg(totals.total_co2e_kg),
            month_co2e_kg: round_kg(totals.month_co2e_kg),
            monthly_goal_kg: user.monthly_goal_kg,
            goal_progress_percent: goal_progress(totals.month_co2e_kg, user.monthly_goal_kg),
        };

        Ok(ProfileResponse { user, stats })
    }

    #[instrument(skip(db, dto))]
    pub async fn update_profile(
        db: &MySqlPool,
        user_id: i64,
        dto: UpdateProfileRequest,
    ) -> Result<ProfileResponse, AppError> {
        let name = dto.name.as_deref().map(str::trim);
        if name.is_some_and(str::is_empty) {
            return Err(AppError::unprocessable(anyhow!("name must not be blank")));
        }

        let result = sqlx::query(
            "UPDATE users
             SET name = COALESCE(?, name),
                 location = COALESCE(?, location),
                 bio = COALESCE(?, bio),
                 monthly_goal_kg = COALESCE(?, monthly_goal_kg)
             WHERE id = ?",
        )
        .bind(name)
        .bind(&dto.location)
        .bind(&dto.bio)
        .bind(dto.monthly_goal_kg)
        .bind(user_id)
        .execute(db)
        .await?;

        if result.rows_affected() > 0 {
            info!(user_id, "Profile updated");
        }

        Self::get_profile(db, user_id).await
    }

    #[instrument(skip(db, dto))]
    pub async fn change_password(
        db: &MySqlPool,
        user_id: i64,
        dto: ChangePasswordRequest,
    ) -> Result<(), AppError> {
        let credentials = UserService::credentials_by_id(db, user_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("User not found")))?;

        if !verify_password(&dto.current_password, &credentials.password_hash)? {
            warn!(user_id, "Password change with wrong current password");
            return Err(AppError::unauthorized("Current password is incorrect"));
        }

        if dto.current_password == dto.new_password {
            return Err(AppError::unprocessable(anyhow!(
                "new_password must differ from current_password"
            )));
        }

        let password_hash = hash_password(&dto.new_password)?;
        UserService::update_password(db, user_id, &password_hash).await?;
        info!(user_id, "Password changed");

        Ok(())
    }
}

fn first_of_month(today: NaiveDate) -> NaiveDate {
    today.with_day(1).unwrap_or(today)
}

fn goal_progress(month_co2e_kg: f64, goal: Option<f64>) -> Option<f64> {
    goal.filter(|g| *g > 0.0)
        .map(|g| (month_co2e_kg / g * 1000.0).round() / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_of_month() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(first_of_month(date), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    }

    #[test]
    fn test_goal_progress() {
        assert_eq!(goal_progress(50.0, Some(200.0)), Some(25.0));
        assert_eq!(goal_progress(1.0, Some(3.0)), Some(33.3));
        assert_eq!(goal_progress(300.0, Some(200.0)), Some(150.0));
        assert_eq!(goal_progress(10.0, None), None);
        assert_eq!(goal_progress(10.0, Some(0.0)), None);
    }
}
