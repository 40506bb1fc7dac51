// src/db/workcentre_repo.rs

use async_trait::async_trait;
use sqlx::{Executor, PgConnection, PgPool, Postgres};

use crate::{
    common::{error::AppError, id_gen::EntityKind},
    models::{
        status::RecordStatus,
        workcentre::{NewWorkcentre, Workcentre},
    },
    services::versioning::VersionedRepository,
};

#[derive(Clone)]
pub struct WorkcentreRepository {
    pool: PgPool,
}

impl WorkcentreRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, status: Option<RecordStatus>) -> Result<Vec<Workcentre>, AppError> {
        let workcentres = sqlx::query_as::<_, Workcentre>(
            r#"
            SELECT * FROM workcentres
            WHERE $1::text[] IS NULL OR LOWER(status) = ANY($1)
            ORDER BY LENGTH(workcentre_id), workcentre_id
            "#,
        )
        .bind(status.map(RecordStatus::stored_values))
        .fetch_all(&self.pool)
        .await?;
        Ok(workcentres)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, workcentre_id: &str) -> Result<Option<Workcentre>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let workcentre = sqlx::query_as::<_, Workcentre>(
            "SELECT * FROM workcentres WHERE workcentre_id = $1",
        )
        .bind(workcentre_id)
        .fetch_optional(executor)
        .await?;
        Ok(workcentre)
    }

    pub async fn find_many<'e, E>(&self, executor: E, ids: &[String]) -> Result<Vec<Workcentre>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let workcentres = sqlx::query_as::<_, Workcentre>(
            "SELECT * FROM workcentres WHERE workcentre_id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(executor)
        .await?;
        Ok(workcentres)
    }

    pub async fn exists<'e, E>(&self, executor: E, workcentre_id: &str) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM workcentres WHERE workcentre_id = $1)",
        )
        .bind(workcentre_id)
        .fetch_one(executor)
        .await?;
        Ok(exists)
    }

    pub async fn insert<'e, E>(&self, executor: E, workcentre_id: &str, draft: &NewWorkcentre) -> Result<Workcentre, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let workcentre = sqlx::query_as::<_, Workcentre>(
            r#"
            INSERT INTO workcentres (
                workcentre_id, workcentre_name, description, capacity, capacity_unit,
                cost_rate_per_hour, last_updated, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, NOW(), $7)
            RETURNING *
            "#,
        )
        .bind(workcentre_id)
        .bind(&draft.workcentre_name)
        .bind(draft.description.as_deref())
        .bind(draft.capacity)
        .bind(&draft.capacity_unit)
        .bind(draft.cost_rate_per_hour)
        .bind(RecordStatus::Active.as_str())
        .fetch_one(executor)
        .await?;
        Ok(workcentre)
    }
}

#[async_trait]
impl VersionedRepository for WorkcentreRepository {
    type Record = Workcentre;
    type Draft = NewWorkcentre;

    const KIND: EntityKind = EntityKind::Workcentre;

    fn natural_key(&self, draft: &NewWorkcentre) -> Vec<String> {
        vec![draft.workcentre_name.clone()]
    }

    async fn insert_version(
        &self,
        conn: &mut PgConnection,
        id: &str,
        draft: &NewWorkcentre,
    ) -> Result<Workcentre, AppError> {
        self.insert(conn, id, draft).await
    }
}
