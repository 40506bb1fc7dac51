// src/handlers/workcentres.rs

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
    models::workcentre::{NewWorkcentre, Workcentre},
};

// GET /workcentre
#[utoipa::path(
    get,
    path = "/workcentre",
    tag = "Workcentres",
    params(ListQuery),
    responses(
        (status = 200, description = "Com ?format=csv a resposta é um anexo text/csv", body = ListResponse<Workcentre>)
    )
)]
pub async fn list_workcentres(
    State(app_state): State<AppState>,
    AppQuery(query): AppQuery<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let workcentres = app_state.workcentre_service.list(query.status).await?;
    list_response(workcentres, query.format, "workcentre")
}

// GET /workcentre/{workcentre_id}
#[utoipa::path(
    get,
    path = "/workcentre/{workcentre_id}",
    tag = "Workcentres",
    params(("workcentre_id" = String, Path, description = "ID do centro de trabalho")),
    responses(
        (status = 200, description = "Registro encontrado", body = Workcentre),
        (status = 404, description = "Centro de trabalho não encontrado")
    )
)]
pub async fn get_workcentre(
    State(app_state): State<AppState>,
    Path(workcentre_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let workcentre = app_state.workcentre_service.get(&workcentre_id).await?;
    Ok(Json(workcentre))
}

// POST /workcentre
#[utoipa::path(
    post,
    path = "/workcentre",
    tag = "Workcentres",
    request_body = NewWorkcentre,
    responses(
        (status = 201, description = "Centro de trabalho criado", body = Workcentre),
        (status = 400, description = "Payload inválido")
    )
)]
pub async fn create_workcentre(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<NewWorkcentre>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let workcentre = app_state.workcentre_service.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(workcentre)))
}

// PUT /workcentre/{workcentre_id}
#[utoipa::path(
    put,
    path = "/workcentre/{workcentre_id}",
    tag = "Workcentres",
    request_body = NewWorkcentre,
    params(("workcentre_id" = String, Path, description = "Versão que será substituída")),
    responses(
        (status = 200, description = "Nova versão do centro de trabalho", body = Workcentre),
        (status = 404, description = "Centro de trabalho não encontrado"),
        (status = 409, description = "Centro de trabalho inativo")
    )
)]
pub async fn update_workcentre(
    State(app_state): State<AppState>,
    Path(workcentre_id): Path<String>,
    AppJson(payload): AppJson<NewWorkcentre>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let workcentre = app_state
        .workcentre_service
        .update(&workcentre_id, &payload)
        .await?;
    Ok(Json(workcentre))
}

// DELETE /workcentre/{workcentre_id}
#[utoipa::path(
    delete,
    path = "/workcentre/{workcentre_id}",
    tag = "Workcentres",
    params(("workcentre_id" = String, Path, description = "ID do centro de trabalho")),
    responses(
        (status = 204, description = "Centro de trabalho removido"),
        (status = 404, description = "Centro de trabalho não encontrado"),
        (status = 409, description = "Usado por roteiros")
    )
)]
pub async fn delete_workcentre(
    State(app_state): State<AppState>,
    Path(workcentre_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    app_state.workcentre_service.delete(&workcentre_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
