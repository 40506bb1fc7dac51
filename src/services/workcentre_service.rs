// src/services/workcentre_service.rs

use sqlx::PgPool;

use crate::{
    common::{db_utils::begin_write, error::AppError, id_gen::EntityKind},
    db::{versioning_repo, RoutingRepository, WorkcentreRepository},
    models::{
        status::RecordStatus,
        workcentre::{NewWorkcentre, Workcentre},
    },
    services::versioning::{ensure_active, supersede},
};

#[derive(Clone)]
pub struct WorkcentreService {
    pool: PgPool,
    workcentre_repo: WorkcentreRepository,
    routing_repo: RoutingRepository,
}

impl WorkcentreService {
    pub fn new(pool: PgPool, workcentre_repo: WorkcentreRepository, routing_repo: RoutingRepository) -> Self {
        Self {
            pool,
            workcentre_repo,
            routing_repo,
        }
    }

    pub async fn list(&self, status: Option<RecordStatus>) -> Result<Vec<Workcentre>, AppError> {
        self.workcentre_repo.list(status).await
    }

    pub async fn get(&self, workcentre_id: &str) -> Result<Workcentre, AppError> {
        self.workcentre_repo
            .find_by_id(&self.pool, workcentre_id)
            .await?
            .ok_or_else(|| AppError::not_found("Workcentre", workcentre_id))
    }

    pub async fn create(&self, draft: &NewWorkcentre) -> Result<Workcentre, AppError> {
        let mut tx = begin_write(&self.pool, &[EntityKind::Workcentre]).await?;
        let result = supersede(&mut tx, &self.workcentre_repo, draft, None).await?;
        tx.commit().await?;
        Ok(result.record)
    }

    pub async fn update(&self, workcentre_id: &str, draft: &NewWorkcentre) -> Result<Workcentre, AppError> {
        let mut tx = begin_write(&self.pool, &[EntityKind::Workcentre]).await?;
        ensure_active(&mut tx, EntityKind::Workcentre, workcentre_id).await?;
        let result = supersede(&mut tx, &self.workcentre_repo, draft, Some(workcentre_id)).await?;
        tx.commit().await?;
        Ok(result.record)
    }

    // Bloqueado enquanto algum roteiro usar o centro de trabalho.
    pub async fn delete(&self, workcentre_id: &str) -> Result<(), AppError> {
        let mut tx = begin_write(&self.pool, &[EntityKind::Routing, EntityKind::Workcentre]).await?;

        if !self.workcentre_repo.exists(&mut *tx, workcentre_id).await? {
            return Err(AppError::not_found("Workcentre", workcentre_id));
        }

        let routings = self.routing_repo.count_by_workcentre(&mut *tx, workcentre_id).await?;
        if routings > 0 {
            return Err(AppError::ReferentialConflict(format!(
                "O centro de trabalho {workcentre_id} é usado por {routings} roteiro(s) e não pode ser removido"
            )));
        }

        versioning_repo::delete_by_id(&mut *tx, EntityKind::Workcentre, workcentre_id).await?;
        tx.commit().await?;

        tracing::info!("Centro de trabalho {} removido", workcentre_id);
        Ok(())
    }
}

#[cfg(test)]
mod db_tests {
    use rust_decimal::Decimal;
    use sqlx::PgPool;

    use crate::{
        common::error::AppError,
        config::AppState,
        models::{bom::NewBomEdge, part::NewPart, routing::NewRouting, workcentre::NewWorkcentre},
    };

    fn workcentre(name: &str, rate: i64) -> NewWorkcentre {
        NewWorkcentre {
            workcentre_name: name.to_string(),
            description: Some("linha 1".to_string()),
            capacity: Decimal::from(16),
            capacity_unit: "hours/day".to_string(),
            cost_rate_per_hour: Decimal::from(rate),
        }
    }

    fn part(name: &str) -> NewPart {
        NewPart {
            part_name: name.to_string(),
            inventory: 0,
            unit_of_measure: "EA".to_string(),
            units_per_measure: Decimal::ONE,
            description: None,
            unit_cost: Decimal::ZERO,
            lead_time: 0,
        }
    }

    async fn active_workcentres(pool: &PgPool) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM workcentres WHERE status = 'active'")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[sqlx::test]
    #[ignore]
    async fn workcentre_used_by_routing_cannot_be_deleted(pool: PgPool) {
        let state = AppState::from_pool(pool.clone());
        let p1 = state.part_service.create(&part("Frame")).await.unwrap();
        let p2 = state.part_service.create(&part("Tube")).await.unwrap();
        let b1 = state
            .bom_service
            .create(&NewBomEdge {
                parent_id: p1.part_id.clone(),
                child_id: p2.part_id.clone(),
                child_quantity: Decimal::ONE,
                child_lead_time: 0,
            })
            .await
            .unwrap();
        let wc = state.workcentre_service.create(&workcentre("Welding", 40)).await.unwrap();
        state
            .routing_service
            .create(&NewRouting {
                bom_id: b1.bom_id.clone(),
                operation_seq: 10,
                workcentre_id: wc.workcentre_id.clone(),
                process_description: "Weld".to_string(),
                setup_time: Decimal::ZERO,
                runtime: Decimal::ONE,
            })
            .await
            .unwrap();

        let err = state.workcentre_service.delete(&wc.workcentre_id).await.unwrap_err();
        assert!(matches!(err, AppError::ReferentialConflict(_)));
        assert!(state.workcentre_service.get(&wc.workcentre_id).await.is_ok());

        let err = state.workcentre_service.delete("WC999").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[sqlx::test]
    #[ignore]
    async fn unused_workcentre_is_deleted(pool: PgPool) {
        let state = AppState::from_pool(pool.clone());
        let wc = state.workcentre_service.create(&workcentre("Painting", 20)).await.unwrap();

        state.workcentre_service.delete(&wc.workcentre_id).await.unwrap();

        let err = state.workcentre_service.get(&wc.workcentre_id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[sqlx::test]
    #[ignore]
    async fn put_with_a_new_name_supersedes_by_id(pool: PgPool) {
        let state = AppState::from_pool(pool.clone());
        let first = state.workcentre_service.create(&workcentre("Welding", 40)).await.unwrap();

        // Nome novo: a chave natural não casa com nada, só o ID substituído sai de cena.
        let second = state
            .workcentre_service
            .update(&first.workcentre_id, &workcentre("Welding cell 2", 45))
            .await
            .unwrap();

        assert_ne!(first.workcentre_id, second.workcentre_id);
        assert_eq!(second.workcentre_name, "Welding cell 2");
        assert!(second.status.is_active());
        let old = state.workcentre_service.get(&first.workcentre_id).await.unwrap();
        assert!(!old.status.is_active());
        assert_eq!(active_workcentres(&pool).await, 1);

        // Recriar o nome antigo não toca na versão ativa renomeada.
        state.workcentre_service.create(&workcentre("Welding", 50)).await.unwrap();
        assert_eq!(active_workcentres(&pool).await, 2);
        let current = state.workcentre_service.get(&second.workcentre_id).await.unwrap();
        assert!(current.status.is_active());
    }
}
