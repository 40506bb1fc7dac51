// src/models/part.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::validation::{validate_not_negative, validate_positive},
    models::status::RecordStatus,
};

// --- Cadastro de peças (part master record) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Part {
    #[schema(example = "P001")]
    pub part_id: String,
    #[schema(example = "Bicycle frame")]
    pub part_name: String,
    #[schema(example = 12)]
    pub inventory: i32,
    #[schema(example = "EA")]
    pub unit_of_measure: String,
    #[schema(value_type = f64, example = 1.0)]
    pub units_per_measure: Decimal,
    pub description: Option<String>,
    #[schema(value_type = f64, example = 84.5)]
    pub unit_cost: Decimal,
    /// Prazo de reposição em dias.
    #[schema(example = 7)]
    pub lead_time: i32,
    pub last_updated: DateTime<Utc>,
    #[sqlx(try_from = "String")]
    pub status: RecordStatus,
}

fn one() -> Decimal {
    Decimal::ONE
}

// Payload de criação/revisão. Uma revisão gera uma nova linha com novo ID.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewPart {
    #[validate(length(min = 1, max = 200, message = "O nome da peça é obrigatório."))]
    #[schema(example = "Bicycle frame")]
    pub part_name: String,

    #[validate(range(min = 0, message = "O estoque não pode ser negativo."))]
    #[serde(default)]
    pub inventory: i32,

    #[validate(length(min = 1, max = 20, message = "A unidade de medida é obrigatória."))]
    #[schema(example = "EA")]
    pub unit_of_measure: String,

    #[validate(custom(function = "validate_positive"))]
    #[serde(default = "one")]
    #[schema(value_type = f64)]
    pub units_per_measure: Decimal,

    pub description: Option<String>,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    #[schema(value_type = f64)]
    pub unit_cost: Decimal,

    #[validate(range(min = 0, message = "O prazo de reposição não pode ser negativo."))]
    #[serde(default)]
    pub lead_time: i32,
}

// Renomeia um part_id em todas as tabelas que o referenciam.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RenamePartId {
    #[validate(length(min = 1, message = "O campo 'old_part_id' é obrigatório."))]
    #[schema(example = "P003")]
    pub old_part_id: String,
    #[validate(length(min = 1, message = "O campo 'new_part_id' é obrigatório."))]
    #[schema(example = "P100")]
    pub new_part_id: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RenameSummary {
    pub old_part_id: String,
    pub new_part_id: String,
    pub parts_updated: u64,
    pub bom_rows_updated: u64,
    pub orders_updated: u64,
}
