// src/handlers/routings.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::{
        csv_export::{list_response, ListQuery, ListResponse},
        error::AppError,
        extract::{AppJson, AppQuery},
    },
    config::AppState,
    models::routing::{NewRouting, Routing},
};

// GET /routings
#[utoipa::path(
    get,
    path = "/routings",
    tag = "Routings",
    params(ListQuery),
    responses(
        (status = 200, description = "Com ?format=csv a resposta é um anexo text/csv", body = ListResponse<Routing>)
    )
)]
pub async fn list_routings(
    State(app_state): State<AppState>,
    AppQuery(query): AppQuery<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let routings = app_state.routing_service.list(query.status).await?;
    list_response(routings, query.format, "routings")
}

// GET /routings/{routing_id}
#[utoipa::path(
    get,
    path = "/routings/{routing_id}",
    tag = "Routings",
    params(("routing_id" = String, Path, description = "ID do roteiro")),
    responses(
        (status = 200, description = "Registro encontrado", body = Routing),
        (status = 404, description = "Roteiro não encontrado")
    )
)]
pub async fn get_routing(
    State(app_state): State<AppState>,
    Path(routing_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let routing = app_state.routing_service.get(&routing_id).await?;
    Ok(Json(routing))
}

// POST /routings
#[utoipa::path(
    post,
    path = "/routings",
    tag = "Routings",
    request_body = NewRouting,
    responses(
        (status = 201, description = "Roteiro criado", body = Routing),
        (status = 400, description = "Payload inválido"),
        (status = 404, description = "BOM ou centro de trabalho inexistente")
    )
)]
pub async fn create_routing(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<NewRouting>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let routing = app_state.routing_service.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(routing)))
}

// PUT /routings/{routing_id}
#[utoipa::path(
    put,
    path = "/routings/{routing_id}",
    tag = "Routings",
    request_body = NewRouting,
    params(("routing_id" = String, Path, description = "Versão que será substituída")),
    responses(
        (status = 200, description = "Nova versão do roteiro", body = Routing),
        (status = 404, description = "Roteiro, BOM ou centro de trabalho inexistente"),
        (status = 409, description = "Roteiro inativo")
    )
)]
pub async fn update_routing(
    State(app_state): State<AppState>,
    Path(routing_id): Path<String>,
    AppJson(payload): AppJson<NewRouting>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let routing = app_state.routing_service.update(&routing_id, &payload).await?;
    Ok(Json(routing))
}

// DELETE /routings/{routing_id}
#[utoipa::path(
    delete,
    path = "/routings/{routing_id}",
    tag = "Routings",
    params(("routing_id" = String, Path, description = "ID do roteiro")),
    responses(
        (status = 204, description = "Roteiro removido"),
        (status = 404, description = "Roteiro não encontrado")
    )
)]
pub async fn delete_routing(
    State(app_state): State<AppState>,
    Path(routing_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    app_state.routing_service.delete(&routing_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
