// src/models/routing.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::{common::validation::validate_not_negative, models::status::RecordStatus};

// Operação de fabricação de uma aresta de BOM, executada num centro de trabalho.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Routing {
    #[schema(example = "R003")]
    pub routing_id: String,
    #[serde(rename = "BOM_id")]
    #[schema(example = "B047")]
    pub bom_id: String,
    #[schema(example = 10)]
    pub operation_seq: i32,
    #[schema(example = "WC012")]
    pub workcentre_id: String,
    #[schema(example = "Weld frame joints")]
    pub process_description: String,
    #[schema(value_type = f64, example = 0.5)]
    pub setup_time: Decimal,
    #[schema(value_type = f64, example = 1.25)]
    pub runtime: Decimal,
    pub last_updated: DateTime<Utc>,
    #[sqlx(try_from = "String")]
    pub status: RecordStatus,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewRouting {
    #[serde(rename = "BOM_id")]
    #[validate(length(min = 1, message = "O campo 'BOM_id' é obrigatório."))]
    #[schema(example = "B047")]
    pub bom_id: String,

    #[validate(range(min = 1, message = "A sequência da operação deve ser no mínimo 1."))]
    #[schema(example = 10)]
    pub operation_seq: i32,

    #[validate(length(min = 1, message = "O campo 'workcentre_id' é obrigatório."))]
    #[schema(example = "WC012")]
    pub workcentre_id: String,

    #[validate(length(min = 1, message = "A descrição do processo é obrigatória."))]
    pub process_description: String,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    #[schema(value_type = f64)]
    pub setup_time: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    #[schema(value_type = f64)]
    pub runtime: Decimal,
}
