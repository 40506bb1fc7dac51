// src/db/part_repo.rs

use async_trait::async_trait;
use sqlx::{Executor, PgConnection, PgPool, Postgres};

use crate::{
    common::{error::AppError, id_gen::EntityKind},
    models::{
        part::{NewPart, Part},
        status::RecordStatus,
    },
    services::versioning::VersionedRepository,
};

#[derive(Clone)]
pub struct PartRepository {
    pool: PgPool,
}

impl PartRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leitura
    // ---

    pub async fn list(&self, status: Option<RecordStatus>) -> Result<Vec<Part>, AppError> {
        let parts = sqlx::query_as::<_, Part>(
            r#"
            SELECT * FROM parts
            WHERE $1::text[] IS NULL OR LOWER(status) = ANY($1)
            ORDER BY LENGTH(part_id), part_id
            "#,
        )
        .bind(status.map(RecordStatus::stored_values))
        .fetch_all(&self.pool)
        .await?;
        Ok(parts)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, part_id: &str) -> Result<Option<Part>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let part = sqlx::query_as::<_, Part>("SELECT * FROM parts WHERE part_id = $1")
            .bind(part_id)
            .fetch_optional(executor)
            .await?;
        Ok(part)
    }

    pub async fn exists<'e, E>(&self, executor: E, part_id: &str) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM parts WHERE part_id = $1)",
        )
        .bind(part_id)
        .fetch_one(executor)
        .await?;
        Ok(exists)
    }

    // ---
    // Escrita
    // ---

    pub async fn insert<'e, E>(&self, executor: E, part_id: &str, draft: &NewPart) -> Result<Part, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let part = sqlx::query_as::<_, Part>(
            r#"
            INSERT INTO parts (
                part_id, part_name, inventory, unit_of_measure, units_per_measure,
                description, unit_cost, lead_time, last_updated, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW(), $9)
            RETURNING *
            "#,
        )
        .bind(part_id)
        .bind(&draft.part_name)
        .bind(draft.inventory)
        .bind(&draft.unit_of_measure)
        .bind(draft.units_per_measure)
        .bind(draft.description.as_deref())
        .bind(draft.unit_cost)
        .bind(draft.lead_time)
        .bind(RecordStatus::Active.as_str())
        .fetch_one(executor)
        .await?;
        Ok(part)
    }

    /// Troca o próprio part_id da linha (parte do rename entre tabelas).
    pub async fn rename<'e, E>(&self, executor: E, old_id: &str, new_id: &str) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE parts SET part_id = $2, last_updated = NOW() WHERE part_id = $1",
        )
        .bind(old_id)
        .bind(new_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl VersionedRepository for PartRepository {
    type Record = Part;
    type Draft = NewPart;

    const KIND: EntityKind = EntityKind::Part;

    fn natural_key(&self, draft: &NewPart) -> Vec<String> {
        vec![draft.part_name.clone()]
    }

    async fn insert_version(
        &self,
        conn: &mut PgConnection,
        id: &str,
        draft: &NewPart,
    ) -> Result<Part, AppError> {
        self.insert(conn, id, draft).await
    }
}
