// src/common/csv_export.rs

use axum::{
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{common::error::AppError, models::status::RecordStatus};

// Envelope padrão das listagens: {"value": [...]}
#[derive(Debug, Serialize, ToSchema)]
pub struct ListResponse<T> {
    pub value: Vec<T>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ListFormat {
    #[default]
    Json,
    Csv,
}

// Query string comum a todas as listagens (?status=active&format=csv)
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Filtra por status ("active" ou "inactive").
    pub status: Option<RecordStatus>,
    #[serde(default)]
    pub format: ListFormat,
}

/// Serializa as linhas em CSV, com cabeçalho vindo dos nomes dos campos.
pub fn to_csv<T: Serialize>(rows: &[T]) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| AppError::InternalServerError(anyhow::anyhow!("Falha ao gerar o CSV: {e}")))
}

pub struct CsvAttachment {
    pub filename: String,
    pub body: Vec<u8>,
}

impl IntoResponse for CsvAttachment {
    fn into_response(self) -> Response {
        let disposition = format!("attachment; filename=\"{}\"", self.filename);
        (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            self.body,
        )
            .into_response()
    }
}

/// Responde a listagem como JSON ou como anexo CSV, conforme `format`.
pub fn list_response<T: Serialize>(
    rows: Vec<T>,
    format: ListFormat,
    resource: &str,
) -> Result<Response, AppError> {
    match format {
        ListFormat::Json => Ok(Json(ListResponse { value: rows }).into_response()),
        ListFormat::Csv => {
            let body = to_csv(&rows)?;
            Ok(CsvAttachment {
                filename: format!("{resource}.csv"),
                body,
            }
            .into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[derive(Serialize)]
    struct Row {
        part_id: &'static str,
        inventory: i32,
        description: Option<&'static str>,
    }

    #[test]
    fn writes_header_and_rows() {
        let rows = [
            Row { part_id: "P001", inventory: 4, description: Some("frame, welded") },
            Row { part_id: "P002", inventory: 0, description: None },
        ];
        let out = String::from_utf8(to_csv(&rows).unwrap()).unwrap();
        assert_eq!(
            out,
            "part_id,inventory,description\nP001,4,\"frame, welded\"\nP002,0,\n"
        );
    }

    #[test]
    fn csv_list_is_an_attachment() {
        let rows = vec![Row { part_id: "P001", inventory: 1, description: None }];
        let response = list_response(rows, ListFormat::Csv, "partmasterrecords").unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"partmasterrecords.csv\""
        );
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/csv"));
    }

    #[tokio::test]
    async fn json_list_is_wrapped_in_value() {
        let rows = vec![Row { part_id: "P001", inventory: 1, description: None }];
        let response = list_response(rows, ListFormat::Json, "partmasterrecords").unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["value"][0]["part_id"], "P001");
    }
}
