// src/db/bom_repo.rs

use async_trait::async_trait;
use sqlx::{Executor, PgConnection, PgPool, Postgres};

use crate::{
    common::{error::AppError, id_gen::EntityKind},
    db::versioning_repo,
    models::{
        bom::{BomEdge, NewBomEdge},
        status::RecordStatus,
    },
    services::versioning::VersionedRepository,
};

#[derive(Clone)]
pub struct BomRepository {
    pool: PgPool,
}

impl BomRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, status: Option<RecordStatus>) -> Result<Vec<BomEdge>, AppError> {
        let edges = sqlx::query_as::<_, BomEdge>(
            r#"
            SELECT * FROM bom
            WHERE $1::text[] IS NULL OR LOWER(status) = ANY($1)
            ORDER BY LENGTH(bom_id), bom_id
            "#,
        )
        .bind(status.map(RecordStatus::stored_values))
        .fetch_all(&self.pool)
        .await?;
        Ok(edges)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, bom_id: &str) -> Result<Option<BomEdge>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let edge = sqlx::query_as::<_, BomEdge>("SELECT * FROM bom WHERE bom_id = $1")
            .bind(bom_id)
            .fetch_optional(executor)
            .await?;
        Ok(edge)
    }

    /// Todos os pares (pai, filho) gravados, em qualquer status: é o grafo
    /// usado na checagem de ciclo.
    pub async fn all_pairs<'e, E>(&self, executor: E) -> Result<Vec<(String, String)>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let pairs = sqlx::query_as::<_, (String, String)>("SELECT parent_id, child_id FROM bom")
            .fetch_all(executor)
            .await?;
        Ok(pairs)
    }

    pub async fn active_edges<'e, E>(&self, executor: E) -> Result<Vec<BomEdge>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let edges = sqlx::query_as::<_, BomEdge>(
            "SELECT * FROM bom WHERE LOWER(status) = $1 ORDER BY parent_id, child_id",
        )
        .bind(RecordStatus::Active.as_str())
        .fetch_all(executor)
        .await?;
        Ok(edges)
    }

    pub async fn active_by_parent<'e, E>(&self, executor: E, parent_id: &str) -> Result<Vec<BomEdge>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let edges = sqlx::query_as::<_, BomEdge>(
            r#"
            SELECT * FROM bom
            WHERE parent_id = $1 AND LOWER(status) = $2
            ORDER BY child_id
            "#,
        )
        .bind(parent_id)
        .bind(RecordStatus::Active.as_str())
        .fetch_all(executor)
        .await?;
        Ok(edges)
    }

    /// Quantas arestas (qualquer status) usam a peça como pai ou filho.
    pub async fn count_referencing_part<'e, E>(&self, executor: E, part_id: &str) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM bom WHERE parent_id = $1 OR child_id = $1",
        )
        .bind(part_id)
        .fetch_one(executor)
        .await?;
        Ok(count)
    }

    pub async fn insert<'e, E>(&self, executor: E, bom_id: &str, draft: &NewBomEdge) -> Result<BomEdge, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let edge = sqlx::query_as::<_, BomEdge>(
            r#"
            INSERT INTO bom (
                bom_id, parent_id, child_id, child_quantity, child_lead_time,
                last_updated, status
            )
            VALUES ($1, $2, $3, $4, $5, NOW(), $6)
            RETURNING *
            "#,
        )
        .bind(bom_id)
        .bind(&draft.parent_id)
        .bind(&draft.child_id)
        .bind(draft.child_quantity)
        .bind(draft.child_lead_time)
        .bind(RecordStatus::Active.as_str())
        .fetch_one(executor)
        .await?;
        Ok(edge)
    }

    /// Atualiza parent_id e child_id no rename de peça.
    pub async fn rename_part<'e, E>(&self, executor: E, old_id: &str, new_id: &str) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE bom SET
                parent_id = CASE WHEN parent_id = $1 THEN $2 ELSE parent_id END,
                child_id  = CASE WHEN child_id  = $1 THEN $2 ELSE child_id  END,
                last_updated = NOW()
            WHERE parent_id = $1 OR child_id = $1
            "#,
        )
        .bind(old_id)
        .bind(new_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl VersionedRepository for BomRepository {
    type Record = BomEdge;
    type Draft = NewBomEdge;

    const KIND: EntityKind = EntityKind::Bom;

    fn natural_key(&self, draft: &NewBomEdge) -> Vec<String> {
        vec![draft.parent_id.clone()]
    }

    async fn insert_version(
        &self,
        conn: &mut PgConnection,
        id: &str,
        draft: &NewBomEdge,
    ) -> Result<BomEdge, AppError> {
        self.insert(conn, id, draft).await
    }

    // Os roteiros ativos das arestas inativadas caem junto.
    async fn after_superseded(
        &self,
        conn: &mut PgConnection,
        superseded_ids: &[String],
    ) -> Result<(), AppError> {
        for bom_id in superseded_ids {
            let routings = sqlx::query_scalar::<_, String>(
                "SELECT routing_id FROM routings WHERE bom_id = $1 AND LOWER(status) = $2",
            )
            .bind(bom_id)
            .bind(RecordStatus::Active.as_str())
            .fetch_all(&mut *conn)
            .await?;

            for routing_id in routings {
                versioning_repo::supersede_by_id(&mut *conn, EntityKind::Routing, &routing_id).await?;
            }
        }
        Ok(())
    }
}
