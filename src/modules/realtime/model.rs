use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::modules::footprints::calculator::EmissionCategory;

pub const DEFAULT_FEED_LIMIT: i64 = 20;
pub const MAX_FEED_LIMIT: i64 = 100;
pub const DEFAULT_LEADERBOARD_DAYS: i64 = 30;
pub const MAX_LEADERBOARD_DAYS: i64 = 365;
pub const DEFAULT_LEADERBOARD_LIMIT: i64 = 10;
pub const MAX_LEADERBOARD_LIMIT: i64 = 50;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LiveStats {
    pub users_total: i64,
    /// Users with at least one entry created in the last 24 hours
    pub active_users_24h: i64,
    pub entries_24h: i64,
    pub co2e_kg_24h: f64,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FeedParams {
    /// 1-100, default 20
    pub limit: Option<i64>,
}

impl FeedParams {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_FEED_LIMIT).clamp(1, MAX_FEED_LIMIT)
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FeedItem {
    pub id: i64,
    pub display_name: String,
    pub category: EmissionCategory,
    pub activity: String,
    pub co2e_kg: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LeaderboardParams {
    /// Window size in days, 1-365, default 30
    pub days: Option<i64>,
    /// 1-50, default 10
    pub limit: Option<i64>,
}

impl LeaderboardParams {
    pub fn days(&self) -> i64 {
        self.days
            .unwrap_or(DEFAULT_LEADERBOARD_DAYS)
            .clamp(1, MAX_LEADERBOARD_DAYS)
    }

    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_LEADERBOARD_LIMIT)
            .clamp(1, MAX_LEADERBOARD_LIMIT)
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeaderboardEntry {
    /// 1 is the lowest footprint
    pub rank: i64,
    pub display_name: String,
    pub entries: i64,
    pub co2e_kg: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LeaderboardResponse {
    pub days: i64,
    pub entries: Vec<LeaderboardEntry>,
}

/// First word of the name, or "Anonymous".
pub fn display_name(name: &str) -> String {
    name.split_whitespace()
        .next()
        .map(str::to_string)
        .unwrap_or_else(|| "Anonymous".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("Ada Lovelace"), "Ada");
        assert_eq!(display_name("  Grace  "), "Grace");
        assert_eq!(display_name("   "), "Anonymous");
    }

    #[test]
    fn test_param_clamping() {
        let feed = FeedParams { limit: Some(1000) };
        assert_eq!(feed.limit(), MAX_FEED_LIMIT);
        assert_eq!(FeedParams::default().limit(), DEFAULT_FEED_LIMIT);

        let board = LeaderboardParams {
            days: Some(0),
            limit: Some(-5),
        };
        assert_eq!(board.days(), 1);
        assert_eq!(board.limit(), 1);
        assert_eq!(LeaderboardParams::default().days(), DEFAULT_LEADERBOARD_DAYS);
    }
}
