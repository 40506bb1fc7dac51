// src/db/versioning_repo.rs

// SQL comum às tabelas versionadas por status. Os nomes de tabela e coluna
// vêm sempre de `EntityKind` (constantes), nunca da requisição.

use sqlx::{Executor, Postgres};

use crate::{
    common::{error::AppError, id_gen::EntityKind},
    models::status::RecordStatus,
};

/// Lê todos os IDs gravados do tipo, para calcular o próximo.
pub async fn existing_ids<'e, E>(executor: E, kind: EntityKind) -> Result<Vec<String>, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let sql = format!("SELECT {} FROM {}", kind.id_column(), kind.table());
    let ids = sqlx::query_scalar::<_, String>(&sql)
        .fetch_all(executor)
        .await?;
    Ok(ids)
}

/// Próximo ID livre do tipo, recalculado a partir do banco.
pub async fn next_id<'e, E>(executor: E, kind: EntityKind) -> Result<String, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let ids = existing_ids(executor, kind).await?;
    kind.next_id(&ids)
}

/// Marca como inativas as linhas ativas com esta chave natural.
/// Retorna os IDs afetados.
pub async fn supersede_by_key<'e, E>(
    executor: E,
    kind: EntityKind,
    key: &[String],
) -> Result<Vec<String>, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let columns = kind.natural_key_columns();
    if columns.is_empty() || columns.len() != key.len() {
        return Err(AppError::InternalServerError(anyhow::anyhow!(
            "chave natural de {} espera {} valor(es), recebeu {}",
            kind.label(),
            columns.len(),
            key.len()
        )));
    }

    let mut sql = format!(
        "UPDATE {} SET status = $1, last_updated = NOW() WHERE LOWER(status) = $2",
        kind.table()
    );
    for (i, column) in columns.iter().enumerate() {
        sql.push_str(&format!(" AND {column}::text = ${}", i + 3));
    }
    sql.push_str(&format!(" RETURNING {}", kind.id_column()));

    let mut query = sqlx::query_scalar::<_, String>(&sql)
        .bind(RecordStatus::Superseded.as_str())
        .bind(RecordStatus::Active.as_str());
    for value in key {
        query = query.bind(value);
    }

    Ok(query.fetch_all(executor).await?)
}

/// Marca uma linha específica como inativa, se ainda estiver ativa.
pub async fn supersede_by_id<'e, E>(
    executor: E,
    kind: EntityKind,
    id: &str,
) -> Result<Option<String>, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let sql = format!(
        "UPDATE {table} SET status = $1, last_updated = NOW() \
         WHERE {id_col} = $2 AND LOWER(status) = $3 RETURNING {id_col}",
        table = kind.table(),
        id_col = kind.id_column(),
    );
    let flipped = sqlx::query_scalar::<_, String>(&sql)
        .bind(RecordStatus::Superseded.as_str())
        .bind(id)
        .bind(RecordStatus::Active.as_str())
        .fetch_optional(executor)
        .await?;
    Ok(flipped)
}

/// Status atual de uma linha (`None` se o ID não existe).
pub async fn status_of<'e, E>(
    executor: E,
    kind: EntityKind,
    id: &str,
) -> Result<Option<RecordStatus>, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let sql = format!(
        "SELECT status FROM {} WHERE {} = $1",
        kind.table(),
        kind.id_column()
    );
    let raw = sqlx::query_scalar::<_, String>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;

    raw.map(|s| {
        s.parse::<RecordStatus>()
            .map_err(|e| AppError::InternalServerError(anyhow::Error::new(e)))
    })
    .transpose()
}

/// Apaga uma linha pelo ID. Retorna `false` se não existia.
pub async fn delete_by_id<'e, E>(executor: E, kind: EntityKind, id: &str) -> Result<bool, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let sql = format!(
        "DELETE FROM {} WHERE {} = $1",
        kind.table(),
        kind.id_column()
    );
    let result = sqlx::query(&sql).bind(id).execute(executor).await?;
    Ok(result.rows_affected() > 0)
}
