use chrono::{Duration, Utc};
use ecotrack_core::AppError;
use sqlx::{FromRow, MySqlPool};
use tracing::instrument;

use crate::modules::footprints::calculator::{EmissionCategory, round_kg};

use super::model::{
    FeedItem, FeedParams, LeaderboardEntry, LeaderboardParams, LeaderboardResponse, LiveStats,
    display_name,
};

pub struct RealtimeService;

impl RealtimeService {
    #[instrument(skip(db))]
    pub async fn get_stats(db: &MySqlPool) -> Result<LiveStats, AppError> {
        #[derive(FromRow)]
        struct Window {
            active_users: i64,
            entries: i64,
            co2e_kg: f64,
        }

        let users_total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(db)
            .await?;

        let since = Utc::now() - Duration::hours(24);
        let window = sqlx::query_as::<_, Window>(
            "SELECT COUNT(DISTINCT user_id) AS active_users,
                    COUNT(*) AS entries,
                    COALESCE(SUM(co2e_kg), 0) AS co2e_kg
             FROM footprints WHERE created_at >= ?",
        )
        .bind(since)
        .fetch_one(db)
        .await?;

        Ok(LiveStats {
            users_total,
            active_users_24h: window.active_users,
            entries_24h: window.entries,
            co2e_kg_24h: round_kg(window.co2e_kg),
            generated_at: Utc::now(),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_feed(db: &MySqlPool, params: FeedParams) -> Result<Vec<FeedItem>, AppError> {
        #[derive(FromRow)]
        struct FeedRow {
            id: i64,
            name: String,
            #[sqlx(try_from = "String")]
            category: EmissionCategory,
            activity: String,
            co2e_kg: f64,
            created_at: chrono::DateTime<Utc>,
        }

        let rows = sqlx::query_as::<_, FeedRow>(
            "SELECT f.id, u.name, f.category, f.activity, f.co2e_kg, f.created_at
             FROM footprints f
             JOIN users u ON u.id = f.user_id
             ORDER BY f.created_at DESC, f.id DESC
             LIMIT ?",
        )
        .bind(params.limit())
        .fetch_all(db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| FeedItem {
                id: row.id,
                display_name: display_name(&row.name),
                category: row.category,
                activity: row.activity,
                co2e_kg: row.co2e_kg,
                created_at: row.created_at,
            })
            .collect())
    }

    /// Users with the lowest total CO2e recorded over the window. Users with
    /// no entries in the window are not ranked.
    #[instrument(skip(db))]
    pub async fn get_leaderboard(
        db: &MySqlPool,
        params: LeaderboardParams,
    ) -> Result<LeaderboardResponse, AppError> {
        #[derive(FromRow)]
        struct LeaderRow {
            name: String,
            entries: i64,
            co2e_kg: f64,
        }

        let days = params.days();
        let since = Utc::now().date_naive() - Duration::days(days - 1);

        let rows = sqlx::query_as::<_, LeaderRow>(
            "SELECT u.name, COUNT(*) AS entries, COALESCE(SUM(f.co2e_kg), 0) AS co2e_kg
             FROM footprints f
             JOIN users u ON u.id = f.user_id
             WHERE f.recorded_on >= ?
             GROUP BY u.id, u.name
             ORDER BY co2e_kg ASC, entries DESC, u.id ASC
             LIMIT ?",
        )
        .bind(since)
        .bind(params.limit())
        .fetch_all(db)
        .await?;

        let entries = rows
            .into_iter()
            .zip(1..)
            .map(|(row, rank)| LeaderboardEntry {
                rank,
                display_name: display_name(&row.name),
                entries: row.entries,
                co2e_kg: round_kg(row.co2e_kg),
            })
            .collect();

        Ok(LeaderboardResponse { days, entries })
    }
}
