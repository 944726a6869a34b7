use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EmissionCategory {
    Transport,
    Energy,
    Food,
    Waste,
    Other,
}

impl EmissionCategory {
    pub const ALL: [EmissionCategory; 5] = [
        EmissionCategory::Transport,
        EmissionCategory::Energy,
        EmissionCategory::Food,
        EmissionCategory::Waste,
        EmissionCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmissionCategory::Transport => "transport",
            EmissionCategory::Energy => "energy",
            EmissionCategory::Food => "food",
            EmissionCategory::Waste => "waste",
            EmissionCategory::Other => "other",
        }
    }
}

impl fmt::Display for EmissionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown emission category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for EmissionCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EmissionCategory::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

// Lets `FromRow` decode the VARCHAR column straight into the enum
impl TryFrom<String> for EmissionCategory {
    type Error = UnknownCategory;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmissionFactor {
    pub category: EmissionCategory,
    pub activity: &'static str,
    pub unit: &'static str,
    pub kg_co2e_per_unit: f64,
}

const fn factor(
    category: EmissionCategory,
    activity: &'static str,
    unit: &'static str,
    kg_co2e_per_unit: f64,
) -> EmissionFactor {
    EmissionFactor {
        category,
        activity,
        unit,
        kg_co2e_per_unit,
    }
}

/// Average kg CO2e per unit of activity.
pub const EMISSION_FACTORS: &[EmissionFactor] = &[
    factor(EmissionCategory::Transport, "car_petrol", "km", 0.192),
    factor(EmissionCategory::Transport, "car_diesel", "km", 0.171),
    factor(EmissionCategory::Transport, "car_electric", "km", 0.053),
    factor(EmissionCategory::Transport, "motorbike", "km", 0.114),
    factor(EmissionCategory::Transport, "bus", "km", 0.105),
    factor(EmissionCategory::Transport, "train", "km", 0.041),
    factor(EmissionCategory::Transport, "flight_short_haul", "km", 0.255),
    factor(EmissionCategory::Transport, "flight_long_haul", "km", 0.195),
    factor(EmissionCategory::Transport, "bicycle", "km", 0.0),
    factor(EmissionCategory::Transport, "walking", "km", 0.0),
    factor(EmissionCategory::Energy, "electricity", "kwh", 0.233),
    factor(EmissionCategory::Energy, "natural_gas", "kwh", 0.184),
    factor(EmissionCategory::Energy, "heating_oil", "litre", 2.54),
    factor(EmissionCategory::Energy, "lpg", "litre", 1.56),
    factor(EmissionCategory::Food, "beef", "kg", 27.0),
    factor(EmissionCategory::Food, "lamb", "kg", 39.2),
    factor(EmissionCategory::Food, "pork", "kg", 12.1),
    factor(EmissionCategory::Food, "chicken", "kg", 6.9),
    factor(EmissionCategory::Food, "fish", "kg", 6.1),
    factor(EmissionCategory::Food, "dairy", "kg", 3.2),
    factor(EmissionCategory::Food, "vegetables", "kg", 2.0),
    factor(EmissionCategory::Food, "plant_based_meal", "meal", 0.9),
    factor(EmissionCategory::Food, "meat_meal", "meal", 3.3),
    factor(EmissionCategory::Waste, "landfill", "kg", 0.58),
    factor(EmissionCategory::Waste, "recycling", "kg", 0.021),
    factor(EmissionCategory::Waste, "compost", "kg", 0.01),
];

/// Lowercases and turns spaces and hyphens into underscores, so "Car Petrol"
/// finds `car_petrol`.
pub fn normalize_activity(activity: &str) -> String {
    activity
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

pub fn find_factor(category: EmissionCategory, activity: &str) -> Option<&'static EmissionFactor> {
    let activity = normalize_activity(activity);
    EMISSION_FACTORS
        .iter()
        .find(|f| f.category == category && f.activity == activity)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Calculation {
    pub activity: String,
    pub unit: String,
    pub emission_factor: f64,
    pub co2e_kg: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalculationError {
    #[error("quantity must be a finite number greater than or equal to 0")]
    InvalidQuantity,
    #[error("emission_factor must be a finite number greater than or equal to 0")]
    InvalidFactor,
    #[error("unknown activity '{activity}' for category '{category}', provide an emission_factor")]
    UnknownActivity {
        category: EmissionCategory,
        activity: String,
    },
}

/// Converts an activity amount to kg CO2e, rounded to 3 decimals.
///
/// A supplied factor overrides the table; its unit defaults to "unit" when
/// none is given. Without a supplied factor the activity must be in the
/// table, and the table's unit wins.
pub fn calculate(
    category: EmissionCategory,
    activity: &str,
    quantity: f64,
    unit: Option<&str>,
    factor_override: Option<f64>,
) -> Result<Calculation, CalculationError> {
    if !quantity.is_finite() || quantity < 0.0 {
        return Err(CalculationError::InvalidQuantity);
    }

    let activity = normalize_activity(activity);

    let (emission_factor, unit) = match factor_override {
        Some(value) if !value.is_finite() || value < 0.0 => {
            return Err(CalculationError::InvalidFactor);
        }
        Some(value) => (
            value,
            unit.map(str::trim)
                .filter(|u| !u.is_empty())
                .unwrap_or("unit")
                .to_string(),
        ),
        None => {
            let known = find_factor(category, &activity).ok_or_else(|| {
                CalculationError::UnknownActivity {
                    category,
                    activity: activity.clone(),
                }
            })?;
            (known.kg_co2e_per_unit, known.unit.to_string())
        }
    };

    Ok(Calculation {
        activity,
        unit,
        emission_factor,
        co2e_kg: round_kg(quantity * emission_factor),
    })
}

pub fn round_kg(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
