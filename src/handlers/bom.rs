// src/handlers/bom.rs

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
    models::bom::{BomEdge, BomExplosion, NewBomEdge},
};

// GET /BOM
#[utoipa::path(
    get,
    path = "/BOM",
    tag = "BOM",
    params(ListQuery),
    responses(
        (status = 200, description = "Arestas da estrutura; com ?format=csv vira anexo text/csv", body = ListResponse<BomEdge>)
    )
)]
pub async fn list_bom(
    State(app_state): State<AppState>,
    AppQuery(query): AppQuery<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let edges = app_state.bom_service.list(query.status).await?;
    list_response(edges, query.format, "BOM")
}

// GET /BOM/{bom_id}
#[utoipa::path(
    get,
    path = "/BOM/{bom_id}",
    tag = "BOM",
    params(("bom_id" = String, Path, description = "ID da aresta (ex.: B047)")),
    responses(
        (status = 200, description = "Registro encontrado", body = BomEdge),
        (status = 404, description = "Aresta não encontrada")
    )
)]
pub async fn get_bom(
    State(app_state): State<AppState>,
    Path(bom_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let edge = app_state.bom_service.get(&bom_id).await?;
    Ok(Json(edge))
}

// POST /BOM
#[utoipa::path(
    post,
    path = "/BOM",
    tag = "BOM",
    request_body = NewBomEdge,
    responses(
        (status = 201, description = "Aresta criada; a aresta ativa anterior do mesmo pai fica inativa", body = BomEdge),
        (status = 400, description = "Payload inválido ou relação duplicada"),
        (status = 404, description = "Pai ou filho não cadastrado"),
        (status = 409, description = "A relação criaria um ciclo")
    )
)]
pub async fn create_bom(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<NewBomEdge>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let edge = app_state.bom_service.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(edge)))
}

// PUT /BOM/{bom_id}
#[utoipa::path(
    put,
    path = "/BOM/{bom_id}",
    tag = "BOM",
    request_body = NewBomEdge,
    params(("bom_id" = String, Path, description = "Versão que será substituída")),
    responses(
        (status = 200, description = "Nova versão da aresta", body = BomEdge),
        (status = 404, description = "Aresta ou peça não encontrada"),
        (status = 409, description = "Aresta inativa ou ciclo")
    )
)]
pub async fn update_bom(
    State(app_state): State<AppState>,
    Path(bom_id): Path<String>,
    AppJson(payload): AppJson<NewBomEdge>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let edge = app_state.bom_service.update(&bom_id, &payload).await?;
    Ok(Json(edge))
}

// DELETE /BOM/{bom_id}
#[utoipa::path(
    delete,
    path = "/BOM/{bom_id}",
    tag = "BOM",
    params(("bom_id" = String, Path, description = "ID da aresta")),
    responses(
        (status = 204, description = "Aresta removida"),
        (status = 404, description = "Aresta não encontrada"),
        (status = 409, description = "Existem roteiros para a aresta")
    )
)]
pub async fn delete_bom(
    State(app_state): State<AppState>,
    Path(bom_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    app_state.bom_service.delete(&bom_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /BOM/explode/{part_id}
#[utoipa::path(
    get,
    path = "/BOM/explode/{part_id}",
    tag = "BOM",
    params(("part_id" = String, Path, description = "Peça raiz")),
    responses(
        (status = 200, description = "Estrutura ativa em todos os níveis", body = BomExplosion),
        (status = 404, description = "Peça não encontrada")
    )
)]
pub async fn explode_bom(
    State(app_state): State<AppState>,
    Path(part_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let explosion = app_state.bom_service.explode(&part_id).await?;
    Ok(Json(explosion))
}
