use anyhow::anyhow;
use chrono::{NaiveDate, Utc};
use ecotrack_core::AppError;
use sqlx::{FromRow, MySqlPool};
use tracing::{info, instrument};

use crate::metrics::track_footprint_logged;

use super::calculator::{Calculation, EmissionCategory, calculate};
use super::model::{
    CategoryTotal, CreateFootprintRequest, Footprint, FootprintFilterParams, FootprintSummary,
    PaginatedFootprintsResponse, SummaryParams, UpdateFootprintRequest,
};

const FOOTPRINT_COLUMNS: &str = "id, user_id, category, activity, quantity, unit, emission_factor, co2e_kg, notes, recorded_on, created_at";

pub struct FootprintService;

impl FootprintService {
    #[instrument(skip(db, dto), fields(category = %dto.category))]
    pub async fn create_footprint(
        db: &MySqlPool,
        user_id: i64,
        dto: CreateFootprintRequest,
    ) -> Result<Footprint, AppError> {
        let calculation = calculate_or_422(
            dto.category,
            &dto.activity,
            dto.quantity,
            dto.unit.as_deref(),
            dto.emission_factor,
        )?;
        let recorded_on = dto.recorded_on.unwrap_or_else(|| Utc::now().date_naive());

        let result = sqlx::query(
            "INSERT INTO footprints
                (user_id, category, activity, quantity, unit, emission_factor, co2e_kg, notes, recorded_on)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(dto.category.as_str())
        .bind(&calculation.activity)
        .bind(dto.quantity)
        .bind(&calculation.unit)
        .bind(calculation.emission_factor)
        .bind(calculation.co2e_kg)
        .bind(&dto.notes)
        .bind(recorded_on)
        .execute(db)
        .await?;

        track_footprint_logged(dto.category.as_str(), calculation.co2e_kg);
        info!(user_id, co2e_kg = calculation.co2e_kg, "Footprint recorded");

        Self::get_footprint(db, user_id, result.last_insert_id() as i64).await
    }

    #[instrument(skip(db))]
    pub async fn get_footprints(
        db: &MySqlPool,
        user_id: i64,
        filters: FootprintFilterParams,
    ) -> Result<PaginatedFootprintsResponse, AppError> {
        let pagination = filters.pagination();
        let category = filters.category.map(|c| c.as_str());

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM footprints
             WHERE user_id = ?
               AND (? IS NULL OR category = ?)
               AND (? IS NULL OR recorded_on >= ?)
               AND (? IS NULL OR recorded_on <= ?)",
        )
        .bind(user_id)
        .bind(category)
        .bind(category)
        .bind(filters.from)
        .bind(filters.from)
        .bind(filters.to)
        .bind(filters.to)
        .fetch_one(db)
        .await?;

        let sql = format!(
            "SELECT {FOOTPRINT_COLUMNS} FROM footprints
             WHERE user_id = ?
               AND (? IS NULL OR category = ?)
               AND (? IS NULL OR recorded_on >= ?)
               AND (? IS NULL OR recorded_on <= ?)
             ORDER BY recorded_on DESC, id DESC
             LIMIT ? OFFSET ?"
        );
        let data = sqlx::query_as::<_, Footprint>(&sql)
            .bind(user_id)
            .bind(category)
            .bind(category)
            .bind(filters.from)
            .bind(filters.from)
            .bind(filters.to)
            .bind(filters.to)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(db)
            .await?;

        Ok(PaginatedFootprintsResponse {
            data,
            meta: pagination.meta(total),
        })
    }

    /// Records owned by someone else are reported as missing.
    #[instrument(skip(db))]
    pub async fn get_footprint(
        db: &MySqlPool,
        user_id: i64,
        id: i64,
    ) -> Result<Footprint, AppError> {
        let sql = format!("SELECT {FOOTPRINT_COLUMNS} FROM footprints WHERE id = ? AND user_id = ?");
        sqlx::query_as::<_, Footprint>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Footprint not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_footprint(
        db: &MySqlPool,
        user_id: i64,
        id: i64,
        dto: UpdateFootprintRequest,
    ) -> Result<Footprint, AppError> {
        let existing = Self::get_footprint(db, user_id, id).await?;
        let merged = merge_update(&existing, dto);

        let calculation = calculate_or_422(
            merged.category,
            &merged.activity,
            merged.quantity,
            Some(&merged.unit),
            merged.emission_factor,
        )?;

        sqlx::query(
            "UPDATE footprints
             SET category = ?, activity = ?, quantity = ?, unit = ?, emission_factor = ?,
                 co2e_kg = ?, notes = ?, recorded_on = ?
             WHERE id = ? AND user_id = ?",
        )
        .bind(merged.category.as_str())
        .bind(&calculation.activity)
        .bind(merged.quantity)
        .bind(&calculation.unit)
        .bind(calculation.emission_factor)
        .bind(calculation.co2e_kg)
        .bind(&merged.notes)
        .bind(merged.recorded_on)
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;

        Self::get_footprint(db, user_id, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_footprint(db: &MySqlPool, user_id: i64, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM footprints WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Footprint not found")));
        }

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn get_summary(
        db: &MySqlPool,
        user_id: i64,
        params: SummaryParams,
    ) -> Result<FootprintSummary, AppError> {
        #[derive(FromRow)]
        struct CategoryRow {
            category: String,
            entries: i64,
            co2e_kg: f64,
        }

        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT category, COUNT(*) AS entries, COALESCE(SUM(co2e_kg), 0) AS co2e_kg
             FROM footprints
             WHERE user_id = ?
               AND (? IS NULL OR recorded_on >= ?)
               AND (? IS NULL OR recorded_on <= ?)
             GROUP BY category
             ORDER BY co2e_kg DESC",
        )
        .bind(user_id)
        .bind(params.from)
        .bind(params.from)
        .bind(params.to)
        .bind(params.to)
        .fetch_all(db)
        .await?;

        let totals = rows
            .into_iter()
            .filter_map(|row| {
                // Rows with a category this build doesn't know are left out
                let category = row.category.parse::<EmissionCategory>().ok()?;
                Some(CategoryTotal {
                    category,
                    entries: row.entries,
                    co2e_kg: row.co2e_kg,
                })
            })
            .collect();

        Ok(summarize(params.from, params.to, totals))
    }
}

fn calculate_or_422(
    category: EmissionCategory,
    activity: &str,
    quantity: f64,
    unit: Option<&str>,
    emission_factor: Option<f64>,
) -> Result<Calculation, AppError> {
    calculate(category, activity, quantity, unit, emission_factor)
        .map_err(|e| AppError::unprocessable(anyhow!(e)))
}

#[derive(Debug, Clone, PartialEq)]
struct MergedFootprint {
    category: EmissionCategory,
    activity: String,
    quantity: f64,
    unit: String,
    emission_factor: Option<f64>,
    notes: Option<String>,
    recorded_on: NaiveDate,
}

/// Overlays an update on the stored record.
///
/// The stored factor is only carried over when neither the category nor the
/// activity changed and the stored value did not come from the table, so a
/// changed activity is priced from the table again.
fn merge_update(existing: &Footprint, dto: UpdateFootprintRequest) -> MergedFootprint {
    let category = dto.category.unwrap_or(existing.category);
    let activity = dto.activity.unwrap_or_else(|| existing.activity.clone());
    let same_activity = category == existing.category && activity == existing.activity;

    let emission_factor = dto.emission_factor.or_else(|| {
        let from_table = super::calculator::find_factor(existing.category, &existing.activity)
            .is_some_and(|f| f.kg_co2e_per_unit == existing.emission_factor);
        (same_activity && !from_table).then_some(existing.emission_factor)
    });

    MergedFootprint {
        category,
        activity,
        quantity: dto.quantity.unwrap_or(existing.quantity),
        unit: dto.unit.unwrap_or_else(|| existing.unit.clone()),
        emission_factor,
        notes: dto.notes.or_else(|| existing.notes.clone()),
        recorded_on: dto.recorded_on.unwrap_or(existing.recorded_on),
    }
}

fn summarize(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    by_category: Vec<CategoryTotal>,
) -> FootprintSummary {
    let entries = by_category.iter().map(|c| c.entries).sum();
    let total = by_category.iter().map(|c| c.co2e_kg).sum::<f64>();

    FootprintSummary {
        from,
        to,
        entries,
        total_co2e_kg: super::calculator::round_kg(total),
        by_category: by_category
            .into_iter()
            .map(|c| CategoryTotal {
                co2e_kg: super::calculator::round_kg(c.co2e_kg),
                ..c
            })
            .collect(),
    }
}
