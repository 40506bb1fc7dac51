// src/handlers/orders.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use validator::{Validate, ValidationErrors};

use crate::{
    common::{
        csv_export::{list_response, ListFormat, ListResponse},
        error::AppError,
        extract::{AppJson, AppQuery},
    },
    config::AppState,
    models::order::{NewOrder, Order, OrderDetailsFull},
};

// O status de pedido é texto livre, por isso não usa o ListQuery comum.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderListQuery {
    /// Filtra pelo rótulo do pedido, sem diferenciar maiúsculas.
    pub status: Option<String>,
    #[serde(default)]
    pub format: ListFormat,
}

fn validate_order(payload: &NewOrder) -> Result<(), AppError> {
    payload.validate()?;
    payload.validate_dates().map_err(|e| {
        let mut errors = ValidationErrors::new();
        errors.add("due_date", e);
        AppError::ValidationError(errors)
    })
}

// GET /orders
#[utoipa::path(
    get,
    path = "/orders",
    tag = "Orders",
    params(OrderListQuery),
    responses(
        (status = 200, description = "Com ?format=csv a resposta é um anexo text/csv", body = ListResponse<Order>)
    )
)]
pub async fn list_orders(
    State(app_state): State<AppState>,
    AppQuery(query): AppQuery<OrderListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let orders = app_state.order_service.list(query.status.as_deref()).await?;
    list_response(orders, query.format, "orders")
}

// GET /orders/{order_id}
#[utoipa::path(
    get,
    path = "/orders/{order_id}",
    tag = "Orders",
    params(("order_id" = String, Path, description = "ID do pedido (ex.: O0001)")),
    responses(
        (status = 200, description = "Registro encontrado", body = Order),
        (status = 404, description = "Pedido não encontrado")
    )
)]
pub async fn get_order(
    State(app_state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state.order_service.get(&order_id).await?;
    Ok(Json(order))
}

// POST /orders
#[utoipa::path(
    post,
    path = "/orders",
    tag = "Orders",
    request_body = NewOrder,
    responses(
        (status = 201, description = "Pedido criado", body = Order),
        (status = 400, description = "Payload inválido"),
        (status = 404, description = "Peça inexistente")
    )
)]
pub async fn create_order(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<NewOrder>,
) -> Result<impl IntoResponse, AppError> {
    validate_order(&payload)?;

    let order = app_state.order_service.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

// PUT /orders/{order_id}
#[utoipa::path(
    put,
    path = "/orders/{order_id}",
    tag = "Orders",
    request_body = NewOrder,
    params(("order_id" = String, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Pedido alterado", body = Order),
        (status = 404, description = "Pedido ou peça não encontrado")
    )
)]
pub async fn update_order(
    State(app_state): State<AppState>,
    Path(order_id): Path<String>,
    AppJson(payload): AppJson<NewOrder>,
) -> Result<impl IntoResponse, AppError> {
    validate_order(&payload)?;

    let order = app_state.order_service.update(&order_id, &payload).await?;
    Ok(Json(order))
}

// DELETE /orders/{order_id}
#[utoipa::path(
    delete,
    path = "/orders/{order_id}",
    tag = "Orders",
    params(("order_id" = String, Path, description = "ID do pedido")),
    responses(
        (status = 204, description = "Pedido removido"),
        (status = 404, description = "Pedido não encontrado")
    )
)]
pub async fn delete_order(
    State(app_state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    app_state.order_service.delete(&order_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /orderdetailsfull/{order_id}
#[utoipa::path(
    get,
    path = "/orderdetailsfull/{order_id}",
    tag = "Orders",
    params(("order_id" = String, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Pedido com peça, estrutura, roteiros e centros de trabalho", body = OrderDetailsFull),
        (status = 404, description = "Pedido não encontrado")
    )
)]
pub async fn get_order_details_full(
    State(app_state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let details = app_state.order_service.details_full(&order_id).await?;
    Ok(Json(details))
}
