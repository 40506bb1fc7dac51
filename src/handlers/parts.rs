// src/handlers/parts.rs

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
    models::part::{NewPart, Part, RenamePartId, RenameSummary},
};

// GET /partmasterrecords
#[utoipa::path(
    get,
    path = "/partmasterrecords",
    tag = "Parts",
    params(ListQuery),
    responses(
        (status = 200, description = "Cadastro de peças; com ?format=csv vira anexo text/csv", body = ListResponse<Part>)
    )
)]
pub async fn list_parts(
    State(app_state): State<AppState>,
    AppQuery(query): AppQuery<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let parts = app_state.part_service.list(query.status).await?;
    list_response(parts, query.format, "partmasterrecords")
}

// GET /partmasterrecords/{part_id}
#[utoipa::path(
    get,
    path = "/partmasterrecords/{part_id}",
    tag = "Parts",
    params(("part_id" = String, Path, description = "ID da peça")),
    responses(
        (status = 200, description = "Registro encontrado", body = Part),
        (status = 404, description = "Peça não encontrada")
    )
)]
pub async fn get_part(
    State(app_state): State<AppState>,
    Path(part_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let part = app_state.part_service.get(&part_id).await?;
    Ok(Json(part))
}

// POST /partmasterrecords
#[utoipa::path(
    post,
    path = "/partmasterrecords",
    tag = "Parts",
    request_body = NewPart,
    responses(
        (status = 201, description = "Peça criada; a versão ativa anterior com o mesmo nome fica inativa", body = Part),
        (status = 400, description = "Payload inválido")
    )
)]
pub async fn create_part(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<NewPart>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let part = app_state.part_service.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(part)))
}

// PUT /partmasterrecords/{part_id}
#[utoipa::path(
    put,
    path = "/partmasterrecords/{part_id}",
    tag = "Parts",
    request_body = NewPart,
    params(("part_id" = String, Path, description = "Versão que será substituída")),
    responses(
        (status = 200, description = "Nova versão da peça", body = Part),
        (status = 404, description = "Peça não encontrada"),
        (status = 409, description = "A peça já está inativa")
    )
)]
pub async fn update_part(
    State(app_state): State<AppState>,
    Path(part_id): Path<String>,
    AppJson(payload): AppJson<NewPart>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let part = app_state.part_service.update(&part_id, &payload).await?;
    Ok(Json(part))
}

// DELETE /partmasterrecords/{part_id}
#[utoipa::path(
    delete,
    path = "/partmasterrecords/{part_id}",
    tag = "Parts",
    params(("part_id" = String, Path, description = "ID da peça")),
    responses(
        (status = 204, description = "Peça removida"),
        (status = 404, description = "Peça não encontrada"),
        (status = 409, description = "Peça usada em BOM ou pedidos")
    )
)]
pub async fn delete_part(
    State(app_state): State<AppState>,
    Path(part_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    app_state.part_service.delete(&part_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// PUT /partmasterrecords/update_part_id
#[utoipa::path(
    put,
    path = "/partmasterrecords/update_part_id",
    tag = "Parts",
    request_body = RenamePartId,
    responses(
        (status = 200, description = "part_id trocado em peças, BOM e pedidos", body = RenameSummary),
        (status = 400, description = "ID novo inválido ou já em uso"),
        (status = 404, description = "ID antigo não encontrado")
    )
)]
pub async fn update_part_id(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<RenamePartId>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let summary = app_state.part_service.rename_part_id(&payload).await?;
    Ok(Json(summary))
}
