// src/models/order.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::models::{bom::BomEdge, part::Part, routing::Routing, workcentre::Workcentre};

pub const DEFAULT_ORDER_STATUS: &str = "open";

// Pedidos não são versionados: PUT altera a própria linha.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Order {
    #[schema(example = "O0001")]
    pub order_id: String,
    #[schema(example = "P001")]
    pub part_id: String,
    #[schema(example = 25)]
    pub quantity: i32,
    pub order_date: NaiveDate,
    pub due_date: NaiveDate,
    pub last_updated: DateTime<Utc>,
    #[schema(example = "open")]
    pub status: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewOrder {
    #[validate(length(min = 1, message = "O campo 'part_id' é obrigatório."))]
    #[schema(example = "P001")]
    pub part_id: String,

    #[validate(range(min = 1, message = "A quantidade deve ser no mínimo 1."))]
    #[schema(example = 25)]
    pub quantity: i32,

    pub order_date: NaiveDate,
    pub due_date: NaiveDate,

    #[validate(length(min = 1, max = 40, message = "O status não pode ser vazio."))]
    pub status: Option<String>,
}

impl NewOrder {
    // Regra: o pedido não pode vencer antes de ser emitido.
    pub fn validate_dates(&self) -> Result<(), ValidationError> {
        if self.due_date < self.order_date {
            let mut err = ValidationError::new("DueBeforeOrderDate");
            err.message = Some("A data de entrega não pode ser anterior à data do pedido.".into());
            return Err(err);
        }
        Ok(())
    }

    pub fn status_or_default(&self) -> &str {
        self.status.as_deref().unwrap_or(DEFAULT_ORDER_STATUS)
    }
}

// --- Visão completa do pedido (pedido + peça + estrutura + roteiros) ---
#[derive(Debug, Serialize, ToSchema)]
pub struct RoutingDetail {
    #[serde(flatten)]
    pub routing: Routing,
    pub workcentre: Option<Workcentre>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ComponentDetail {
    #[serde(flatten)]
    pub edge: BomEdge,
    pub routings: Vec<RoutingDetail>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderDetailsFull {
    pub order: Order,
    /// `None` quando o pedido aponta para uma peça que não existe mais.
    pub part: Option<Part>,
    pub components: Vec<ComponentDetail>,
}
