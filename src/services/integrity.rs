// src/services/integrity.rs

use sqlx::PgConnection;

use crate::{
    common::error::AppError,
    db::{BomRepository, PartRepository},
    services::bom_graph::{check_new_edge, BomGraph},
};

/// Decide se uma relação pai -> filho pode entrar na estrutura.
#[derive(Clone)]
pub struct BomIntegrityEngine {
    part_repo: PartRepository,
    bom_repo: BomRepository,
}

impl BomIntegrityEngine {
    pub fn new(part_repo: PartRepository, bom_repo: BomRepository) -> Self {
        Self { part_repo, bom_repo }
    }

    /// Duplicidade, existência das peças e ciclo, nesta ordem. O grafo é
    /// remontado do banco a cada chamada; quem chama já detém o lock de BOM.
    pub async fn validate_new_edge(
        &self,
        conn: &mut PgConnection,
        parent_id: &str,
        child_id: &str,
    ) -> Result<(), AppError> {
        let graph = BomGraph::from_edges(self.bom_repo.all_pairs(&mut *conn).await?);
        let (parent_exists, child_exists) = self.parts_exist(conn, parent_id, child_id).await?;

        check_new_edge(
            &graph,
            |id| if id == parent_id { parent_exists } else { child_exists },
            parent_id,
            child_id,
        )
        .inspect_err(|e| tracing::warn!("Aresta {} -> {} recusada: {}", parent_id, child_id, e))
    }

    /// Revisão de uma aresta existente (mesmo par): só confere as peças.
    pub async fn validate_revision(
        &self,
        conn: &mut PgConnection,
        parent_id: &str,
        child_id: &str,
    ) -> Result<(), AppError> {
        let (parent_exists, child_exists) = self.parts_exist(conn, parent_id, child_id).await?;
        if !parent_exists {
            return Err(AppError::missing_reference("Part", parent_id));
        }
        if !child_exists {
            return Err(AppError::missing_reference("Part", child_id));
        }
        Ok(())
    }

    async fn parts_exist(
        &self,
        conn: &mut PgConnection,
        parent_id: &str,
        child_id: &str,
    ) -> Result<(bool, bool), AppError> {
        let parent_exists = self.part_repo.exists(&mut *conn, parent_id).await?;
        let child_exists = if child_id == parent_id {
            parent_exists
        } else {
            self.part_repo.exists(&mut *conn, child_id).await?
        };
        Ok((parent_exists, child_exists))
    }
}
