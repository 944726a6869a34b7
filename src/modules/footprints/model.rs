use chrono::{DateTime, NaiveDate, Utc};
use ecotrack_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::calculator::{EmissionCategory, EmissionFactor};

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct Footprint {
    pub id: i64,
    pub user_id: i64,
    #[sqlx(try_from = "String")]
    pub category: EmissionCategory,
    pub activity: String,
    pub quantity: f64,
    pub unit: String,
    /// kg CO2e per unit used for this record
    pub emission_factor: f64,
    pub co2e_kg: f64,
    pub notes: Option<String>,
    pub recorded_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateFootprintRequest {
    pub category: EmissionCategory,
    #[validate(length(min = 1, max = 64, message = "activity must be 1 to 64 characters"))]
    pub activity: String,
    #[validate(range(min = 0.0, message = "quantity must be a non-negative number"))]
    pub quantity: f64,
    #[validate(length(min = 1, max = 16, message = "unit must be 1 to 16 characters"))]
    pub unit: Option<String>,
    /// kg CO2e per unit; required for activities missing from the factor table
    #[validate(range(min = 0.0, message = "emission_factor must be a non-negative number"))]
    pub emission_factor: Option<f64>,
    #[validate(length(max = 500, message = "notes must be at most 500 characters"))]
    pub notes: Option<String>,
    /// Defaults to today (UTC)
    pub recorded_on: Option<NaiveDate>,
}

/// Every field is optional; the stored values fill the gaps and CO2e is
/// recalculated from the merged record.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateFootprintRequest {
    pub category: Option<EmissionCategory>,
    #[validate(length(min = 1, max = 64, message = "activity must be 1 to 64 characters"))]
    pub activity: Option<String>,
    #[validate(range(min = 0.0, message = "quantity must be a non-negative number"))]
    pub quantity: Option<f64>,
    #[validate(length(min = 1, max = 16, message = "unit must be 1 to 16 characters"))]
    pub unit: Option<String>,
    #[validate(range(min = 0.0, message = "emission_factor must be a non-negative number"))]
    pub emission_factor: Option<f64>,
    #[validate(length(max = 500, message = "notes must be at most 500 characters"))]
    pub notes: Option<String>,
    pub recorded_on: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct FootprintFilterParams {
    pub category: Option<EmissionCategory>,
    /// Inclusive lower bound on `recorded_on`
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on `recorded_on`
    pub to: Option<NaiveDate>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl FootprintFilterParams {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            limit: self.limit,
            offset: self.offset,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedFootprintsResponse {
    pub data: Vec<Footprint>,
    pub meta: PaginationMeta,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct SummaryParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryTotal {
    pub category: EmissionCategory,
    pub entries: i64,
    pub co2e_kg: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FootprintSummary {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub entries: i64,
    pub total_co2e_kg: f64,
    pub by_category: Vec<CategoryTotal>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EmissionFactorResponse {
    pub category: EmissionCategory,
    pub activity: String,
    pub unit: String,
    pub kg_co2e_per_unit: f64,
}

impl From<&EmissionFactor> for EmissionFactorResponse {
    fn from(factor: &EmissionFactor) -> Self {
        Self {
            category: factor.category,
            activity: factor.activity.to_string(),
            unit: factor.unit.to_string(),
            kg_co2e_per_unit: factor.kg_co2e_per_unit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_rejects_negative_quantity() {
        let request: CreateFootprintRequest = serde_json::from_value(serde_json::json!({
            "category": "food",
            "activity": "beef",
            "quantity": -2.0
        }))
        .unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("quantity"));
    }

    #[test]
    fn test_create_request_rejects_unknown_category() {
        let result = serde_json::from_value::<CreateFootprintRequest>(serde_json::json!({
            "category": "plastic",
            "activity": "bottle",
            "quantity": 1.0
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_update_request_allows_empty_body() {
        let request: UpdateFootprintRequest = serde_json::from_str("{}").unwrap();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_empty_unit_is_rejected() {
        let request = UpdateFootprintRequest {
            unit: Some(String::new()),
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }
}
