// src/common/error.rs

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Taxonomia única de erros da aplicação. Cada variante tem um status HTTP fixo
// (ver `status_code`), então nenhum handler monta respostas de erro na mão.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("A relação {parent_id} -> {child_id} já existe")]
    DuplicateRelationship { parent_id: String, child_id: String },

    #[error("{entity} {id} não encontrado")]
    NotFound { entity: &'static str, id: String },

    #[error("{entity} {id} referenciado não existe")]
    MissingReference { entity: &'static str, id: String },

    #[error("A relação {parent_id} -> {child_id} criaria uma estrutura circular")]
    CircularDependency { parent_id: String, child_id: String },

    #[error("{0}")]
    ReferentialConflict(String),

    #[error("{entity} {id} não está ativo")]
    NotActive { entity: &'static str, id: String },

    #[error("Restrição de integridade violada: {0}")]
    IntegrityViolation(String),

    #[error("Banco de dados indisponível: {0}")]
    DatabaseUnavailable(String),

    // Sem #[from]: a conversão classifica o erro (ver `From<sqlx::Error>` abaixo)
    #[error("Erro de banco de dados")]
    DatabaseError(sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                AppError::DatabaseUnavailable(e.to_string())
            }
            sqlx::Error::Database(db_err)
                if db_err.is_unique_violation()
                    || db_err.is_foreign_key_violation()
                    || db_err.is_check_violation() =>
            {
                let detail = db_err
                    .constraint()
                    .map(|c| format!("restrição '{c}'"))
                    .unwrap_or_else(|| db_err.message().to_string());
                AppError::IntegrityViolation(detail)
            }
            _ => AppError::DatabaseError(e),
        }
    }
}

// Corpo ou query string que nem chegam a desserializar também são 400.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(format!("Corpo JSON inválido: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(format!("Parâmetros de consulta inválidos: {}", rejection.body_text()))
    }
}

impl From<csv::Error> for AppError {
    fn from(e: csv::Error) -> Self {
        AppError::InternalServerError(anyhow::Error::new(e).context("failed to render CSV"))
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::BadRequest(_)
            | AppError::DuplicateRelationship { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } | AppError::MissingReference { .. } => StatusCode::NOT_FOUND,
            AppError::CircularDependency { .. }
            | AppError::ReferentialConflict(_)
            | AppError::NotActive { .. }
            | AppError::IntegrityViolation(_) => StatusCode::CONFLICT,
            AppError::DatabaseUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        AppError::NotFound { entity, id: id.into() }
    }

    pub fn missing_reference(entity: &'static str, id: impl Into<String>) -> Self {
        AppError::MissingReference { entity, id: id.into() }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let error_message = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (status, body).into_response();
            }

            // O detalhe de erros de infraestrutura fica só no log.
            ref e @ (AppError::DatabaseError(_) | AppError::InternalServerError(_)) => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                "Ocorreu um erro inesperado.".to_string()
            }
            ref e @ AppError::DatabaseUnavailable(_) => {
                tracing::error!("{}", e);
                "O banco de dados está indisponível no momento.".to_string()
            }

            e => e.to_string(),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
