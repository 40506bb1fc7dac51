// src/models/workcentre.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::{common::validation::validate_not_negative, models::status::RecordStatus};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Workcentre {
    #[schema(example = "WC012")]
    pub workcentre_id: String,
    #[schema(example = "Welding cell 2")]
    pub workcentre_name: String,
    pub description: Option<String>,
    #[schema(value_type = f64, example = 16.0)]
    pub capacity: Decimal,
    #[schema(example = "hours/day")]
    pub capacity_unit: String,
    #[schema(value_type = f64, example = 42.0)]
    pub cost_rate_per_hour: Decimal,
    pub last_updated: DateTime<Utc>,
    #[sqlx(try_from = "String")]
    pub status: RecordStatus,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewWorkcentre {
    #[validate(length(min = 1, max = 200, message = "O nome do centro de trabalho é obrigatório."))]
    #[schema(example = "Welding cell 2")]
    pub workcentre_name: String,

    pub description: Option<String>,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(value_type = f64)]
    pub capacity: Decimal,

    #[validate(length(min = 1, message = "O campo 'capacity_unit' é obrigatório."))]
    #[schema(example = "hours/day")]
    pub capacity_unit: String,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(value_type = f64)]
    pub cost_rate_per_hour: Decimal,
}
