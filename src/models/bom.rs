// src/models/bom.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::{common::validation::validate_positive, models::status::RecordStatus};

// Uma aresta da estrutura: o pai consome `child_quantity` unidades do filho.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BomEdge {
    #[serde(rename = "BOM_id")]
    #[schema(example = "B047")]
    pub bom_id: String,
    #[schema(example = "P001")]
    pub parent_id: String,
    #[schema(example = "P002")]
    pub child_id: String,
    #[schema(value_type = f64, example = 2.0)]
    pub child_quantity: Decimal,
    #[schema(example = 3)]
    pub child_lead_time: i32,
    pub last_updated: DateTime<Utc>,
    #[sqlx(try_from = "String")]
    pub status: RecordStatus,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewBomEdge {
    #[validate(length(min = 1, message = "O campo 'parent_id' é obrigatório."))]
    #[schema(example = "P001")]
    pub parent_id: String,

    #[validate(length(min = 1, message = "O campo 'child_id' é obrigatório."))]
    #[schema(example = "P002")]
    pub child_id: String,

    #[validate(custom(function = "validate_positive"))]
    #[schema(value_type = f64, example = 2.0)]
    pub child_quantity: Decimal,

    #[validate(range(min = 0, message = "O prazo do filho não pode ser negativo."))]
    #[serde(default)]
    pub child_lead_time: i32,
}

// --- Explosão multinível ---
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ExplosionLine {
    /// 1 = filho direto da peça consultada.
    pub level: u32,
    #[serde(rename = "BOM_id")]
    pub bom_id: String,
    pub parent_id: String,
    pub child_id: String,
    #[schema(value_type = f64)]
    pub quantity_per: Decimal,
    /// Quantidade por unidade da peça raiz.
    #[schema(value_type = f64)]
    pub extended_quantity: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BomExplosion {
    pub part_id: String,
    pub lines: Vec<ExplosionLine>,
}
