// src/services/bom_service.rs

use sqlx::PgPool;

use crate::{
    common::{db_utils::begin_write, error::AppError, id_gen::EntityKind},
    db::{versioning_repo, BomRepository, PartRepository, RoutingRepository},
    models::{
        bom::{BomEdge, BomExplosion, NewBomEdge},
        status::RecordStatus,
    },
    services::{
        bom_graph,
        integrity::BomIntegrityEngine,
        versioning::{ensure_active, supersede},
    },
};

// Tipos travados por qualquer escrita em BOM: peças (existência), a própria
// BOM e os roteiros que são inativados junto.
const BOM_WRITE_LOCKS: &[EntityKind] = &[EntityKind::Part, EntityKind::Bom, EntityKind::Routing];

#[derive(Clone)]
pub struct BomService {
    pool: PgPool,
    bom_repo: BomRepository,
    part_repo: PartRepository,
    routing_repo: RoutingRepository,
    engine: BomIntegrityEngine,
}

impl BomService {
    pub fn new(
        pool: PgPool,
        bom_repo: BomRepository,
        part_repo: PartRepository,
        routing_repo: RoutingRepository,
        engine: BomIntegrityEngine,
    ) -> Self {
        Self {
            pool,
            bom_repo,
            part_repo,
            routing_repo,
            engine,
        }
    }

    pub async fn list(&self, status: Option<RecordStatus>) -> Result<Vec<BomEdge>, AppError> {
        self.bom_repo.list(status).await
    }

    pub async fn get(&self, bom_id: &str) -> Result<BomEdge, AppError> {
        self.bom_repo
            .find_by_id(&self.pool, bom_id)
            .await?
            .ok_or_else(|| AppError::not_found("BOM", bom_id))
    }

    // --- CREATE ---
    // Valida a nova aresta e a torna a versão ativa do pai.
    pub async fn create(&self, draft: &NewBomEdge) -> Result<BomEdge, AppError> {
        let mut tx = begin_write(&self.pool, BOM_WRITE_LOCKS).await?;

        self.engine
            .validate_new_edge(&mut tx, &draft.parent_id, &draft.child_id)
            .await?;

        let result = supersede(&mut tx, &self.bom_repo, draft, None).await?;

        tx.commit().await?;
        Ok(result.record)
    }

    // --- UPDATE (nova versão) ---
    pub async fn update(&self, bom_id: &str, draft: &NewBomEdge) -> Result<BomEdge, AppError> {
        let mut tx = begin_write(&self.pool, BOM_WRITE_LOCKS).await?;

        ensure_active(&mut tx, EntityKind::Bom, bom_id).await?;
        let current = self
            .bom_repo
            .find_by_id(&mut *tx, bom_id)
            .await?
            .ok_or_else(|| AppError::not_found("BOM", bom_id))?;

        // Mesmo par: é revisão de quantidade/prazo, não uma relação nova.
        if current.parent_id == draft.parent_id && current.child_id == draft.child_id {
            self.engine
                .validate_revision(&mut tx, &draft.parent_id, &draft.child_id)
                .await?;
        } else {
            self.engine
                .validate_new_edge(&mut tx, &draft.parent_id, &draft.child_id)
                .await?;
        }

        let result = supersede(&mut tx, &self.bom_repo, draft, Some(bom_id)).await?;

        tx.commit().await?;
        Ok(result.record)
    }

    // --- DELETE ---
    // Bloqueado enquanto houver roteiros apontando para a aresta.
    pub async fn delete(&self, bom_id: &str) -> Result<(), AppError> {
        let mut tx = begin_write(&self.pool, &[EntityKind::Bom, EntityKind::Routing]).await?;

        if self.bom_repo.find_by_id(&mut *tx, bom_id).await?.is_none() {
            return Err(AppError::not_found("BOM", bom_id));
        }

        let routings = self.routing_repo.count_by_bom(&mut *tx, bom_id).await?;
        if routings > 0 {
            return Err(AppError::ReferentialConflict(format!(
                "A BOM {bom_id} é referenciada por {routings} roteiro(s) e não pode ser removida"
            )));
        }

        versioning_repo::delete_by_id(&mut *tx, EntityKind::Bom, bom_id).await?;
        tx.commit().await?;

        tracing::info!("BOM {} removida", bom_id);
        Ok(())
    }

    // --- EXPLOSÃO MULTINÍVEL ---
    pub async fn explode(&self, part_id: &str) -> Result<BomExplosion, AppError> {
        if !self.part_repo.exists(&self.pool, part_id).await? {
            return Err(AppError::not_found("Part", part_id));
        }

        let edges = self.bom_repo.active_edges(&self.pool).await?;
        let lines = bom_graph::explode(&edges, part_id);

        Ok(BomExplosion {
            part_id: part_id.to_string(),
            lines,
        })
    }
}
