// src/db/routing_repo.rs

use async_trait::async_trait;
use sqlx::{Executor, PgConnection, PgPool, Postgres};

use crate::{
    common::{error::AppError, id_gen::EntityKind},
    models::{
        routing::{NewRouting, Routing},
        status::RecordStatus,
    },
    services::versioning::VersionedRepository,
};

#[derive(Clone)]
pub struct RoutingRepository {
    pool: PgPool,
}

impl RoutingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, status: Option<RecordStatus>) -> Result<Vec<Routing>, AppError> {
        let routings = sqlx::query_as::<_, Routing>(
            r#"
            SELECT * FROM routings
            WHERE $1::text[] IS NULL OR LOWER(status) = ANY($1)
            ORDER BY LENGTH(routing_id), routing_id
            "#,
        )
        .bind(status.map(RecordStatus::stored_values))
        .fetch_all(&self.pool)
        .await?;
        Ok(routings)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, routing_id: &str) -> Result<Option<Routing>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let routing = sqlx::query_as::<_, Routing>("SELECT * FROM routings WHERE routing_id = $1")
            .bind(routing_id)
            .fetch_optional(executor)
            .await?;
        Ok(routing)
    }

    /// Roteiros ativos de um conjunto de arestas, em ordem de operação.
    pub async fn active_for_boms<'e, E>(&self, executor: E, bom_ids: &[String]) -> Result<Vec<Routing>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let routings = sqlx::query_as::<_, Routing>(
            r#"
            SELECT * FROM routings
            WHERE bom_id = ANY($1) AND LOWER(status) = $2
            ORDER BY bom_id, operation_seq
            "#,
        )
        .bind(bom_ids)
        .bind(RecordStatus::Active.as_str())
        .fetch_all(executor)
        .await?;
        Ok(routings)
    }

    pub async fn count_by_bom<'e, E>(&self, executor: E, bom_id: &str) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM routings WHERE bom_id = $1")
            .bind(bom_id)
            .fetch_one(executor)
            .await?;
        Ok(count)
    }

    pub async fn count_by_workcentre<'e, E>(&self, executor: E, workcentre_id: &str) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM routings WHERE workcentre_id = $1",
        )
        .bind(workcentre_id)
        .fetch_one(executor)
        .await?;
        Ok(count)
    }

    pub async fn insert<'e, E>(&self, executor: E, routing_id: &str, draft: &NewRouting) -> Result<Routing, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let routing = sqlx::query_as::<_, Routing>(
            r#"
            INSERT INTO routings (
                routing_id, bom_id, operation_seq, workcentre_id, process_description,
                setup_time, runtime, last_updated, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW(), $8)
            RETURNING *
            "#,
        )
        .bind(routing_id)
        .bind(&draft.bom_id)
        .bind(draft.operation_seq)
        .bind(&draft.workcentre_id)
        .bind(&draft.process_description)
        .bind(draft.setup_time)
        .bind(draft.runtime)
        .bind(RecordStatus::Active.as_str())
        .fetch_one(executor)
        .await?;
        Ok(routing)
    }
}

#[async_trait]
impl VersionedRepository for RoutingRepository {
    type Record = Routing;
    type Draft = NewRouting;

    const KIND: EntityKind = EntityKind::Routing;

    fn natural_key(&self, draft: &NewRouting) -> Vec<String> {
        vec![draft.bom_id.clone(), draft.operation_seq.to_string()]
    }

    async fn insert_version(
        &self,
        conn: &mut PgConnection,
        id: &str,
        draft: &NewRouting,
    ) -> Result<Routing, AppError> {
        self.insert(conn, id, draft).await
    }
}
