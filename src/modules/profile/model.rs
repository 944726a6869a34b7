use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::modules::users::model::User;

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub user: User,
    pub stats: ProfileStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ProfileStats {
    pub entries: i64,
    pub total_co2e_kg: f64,
    /// CO2e recorded since the first day of the current month (UTC)
    pub month_co2e_kg: f64,
    pub monthly_goal_kg: Option<f64>,
    /// `month_co2e_kg` as a percentage of the goal, one decimal
    pub goal_progress_percent: Option<f64>,
}

/// Omitted fields keep their stored value.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1 to 100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 120, message = "location must be at most 120 characters"))]
    pub location: Option<String>,
    #[validate(length(max = 1000, message = "bio must be at most 1000 characters"))]
    pub bio: Option<String>,
    #[validate(range(min = 0.0, message = "monthly_goal_kg must be a non-negative number"))]
    pub monthly_goal_kg: Option<f64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "current_password is required"))]
    pub current_password: String,
    #[validate(length(min = 8, max = 128, message = "new_password must be 8 to 128 characters"))]
    pub new_password: String,
}
