// src/services/routing_service.rs

use sqlx::{PgConnection, PgPool};

use crate::{
    common::{db_utils::begin_write, error::AppError, id_gen::EntityKind},
    db::{versioning_repo, RoutingRepository},
    models::{
        routing::{NewRouting, Routing},
        status::RecordStatus,
    },
    services::versioning::{ensure_active, supersede},
};

const ROUTING_WRITE_LOCKS: &[EntityKind] =
    &[EntityKind::Bom, EntityKind::Routing, EntityKind::Workcentre];

#[derive(Clone)]
pub struct RoutingService {
    pool: PgPool,
    routing_repo: RoutingRepository,
}

impl RoutingService {
    pub fn new(pool: PgPool, routing_repo: RoutingRepository) -> Self {
        Self { pool, routing_repo }
    }

    pub async fn list(&self, status: Option<RecordStatus>) -> Result<Vec<Routing>, AppError> {
        self.routing_repo.list(status).await
    }

    pub async fn get(&self, routing_id: &str) -> Result<Routing, AppError> {
        self.routing_repo
            .find_by_id(&self.pool, routing_id)
            .await?
            .ok_or_else(|| AppError::not_found("Routing", routing_id))
    }

    pub async fn create(&self, draft: &NewRouting) -> Result<Routing, AppError> {
        let mut tx = begin_write(&self.pool, ROUTING_WRITE_LOCKS).await?;
        self.check_references(&mut tx, draft).await?;
        let result = supersede(&mut tx, &self.routing_repo, draft, None).await?;
        tx.commit().await?;
        Ok(result.record)
    }

    pub async fn update(&self, routing_id: &str, draft: &NewRouting) -> Result<Routing, AppError> {
        let mut tx = begin_write(&self.pool, ROUTING_WRITE_LOCKS).await?;
        ensure_active(&mut tx, EntityKind::Routing, routing_id).await?;
        self.check_references(&mut tx, draft).await?;
        let result = supersede(&mut tx, &self.routing_repo, draft, Some(routing_id)).await?;
        tx.commit().await?;
        Ok(result.record)
    }

    pub async fn delete(&self, routing_id: &str) -> Result<(), AppError> {
        let mut tx = begin_write(&self.pool, &[EntityKind::Routing]).await?;
        if !versioning_repo::delete_by_id(&mut *tx, EntityKind::Routing, routing_id).await? {
            return Err(AppError::not_found("Routing", routing_id));
        }
        tx.commit().await?;
        tracing::info!("Roteiro {} removido", routing_id);
        Ok(())
    }

    // A aresta de BOM e o centro de trabalho precisam existir e estar ativos:
    // um roteiro novo numa versão inativa escaparia da inativação em cascata.
    async fn check_references(&self, conn: &mut PgConnection, draft: &NewRouting) -> Result<(), AppError> {
        require_active(conn, EntityKind::Bom, &draft.bom_id).await?;
        require_active(conn, EntityKind::Workcentre, &draft.workcentre_id).await?;
        Ok(())
    }
}

async fn require_active(conn: &mut PgConnection, kind: EntityKind, id: &str) -> Result<(), AppError> {
    match versioning_repo::status_of(&mut *conn, kind, id).await? {
        None => Err(AppError::missing_reference(kind.label(), id)),
        Some(status) if !status.is_active() => Err(AppError::NotActive {
            entity: kind.label(),
            id: id.to_string(),
        }),
        Some(_) => Ok(()),
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

    fn edge(parent: &str, child: &str) -> NewBomEdge {
        NewBomEdge {
            parent_id: parent.to_string(),
            child_id: child.to_string(),
            child_quantity: Decimal::ONE,
            child_lead_time: 0,
        }
    }

    fn workcentre(name: &str) -> NewWorkcentre {
        NewWorkcentre {
            workcentre_name: name.to_string(),
            description: None,
            capacity: Decimal::from(8),
            capacity_unit: "hours/day".to_string(),
            cost_rate_per_hour: Decimal::from(30),
        }
    }

    fn routing(bom_id: &str, seq: i32, workcentre_id: &str) -> NewRouting {
        NewRouting {
            bom_id: bom_id.to_string(),
            operation_seq: seq,
            workcentre_id: workcentre_id.to_string(),
            process_description: "Assemble".to_string(),
            setup_time: Decimal::ONE,
            runtime: Decimal::from(2),
        }
    }

    async fn routing_count(pool: &PgPool) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM routings")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[sqlx::test]
    #[ignore]
    async fn routing_on_a_superseded_edge_is_rejected(pool: PgPool) {
        let state = AppState::from_pool(pool.clone());
        let p1 = state.part_service.create(&part("Frame")).await.unwrap();
        let p2 = state.part_service.create(&part("Tube")).await.unwrap();
        let p3 = state.part_service.create(&part("Bolt")).await.unwrap();
        let wc = state.workcentre_service.create(&workcentre("Welding")).await.unwrap();

        // A segunda aresta do mesmo pai inativa a primeira.
        let old_edge = state.bom_service.create(&edge(&p1.part_id, &p2.part_id)).await.unwrap();
        let new_edge = state.bom_service.create(&edge(&p1.part_id, &p3.part_id)).await.unwrap();

        let err = state
            .routing_service
            .create(&routing(&old_edge.bom_id, 10, &wc.workcentre_id))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotActive { entity: "BOM", .. }));
        assert_eq!(routing_count(&pool).await, 0);

        state
            .routing_service
            .create(&routing(&new_edge.bom_id, 10, &wc.workcentre_id))
            .await
            .unwrap();
        assert_eq!(routing_count(&pool).await, 1);
    }

    #[sqlx::test]
    #[ignore]
    async fn routing_on_a_superseded_workcentre_is_rejected(pool: PgPool) {
        let state = AppState::from_pool(pool.clone());
        let p1 = state.part_service.create(&part("Frame")).await.unwrap();
        let p2 = state.part_service.create(&part("Tube")).await.unwrap();
        let b1 = state.bom_service.create(&edge(&p1.part_id, &p2.part_id)).await.unwrap();
        let old_wc = state.workcentre_service.create(&workcentre("Painting")).await.unwrap();
        state
            .workcentre_service
            .update(&old_wc.workcentre_id, &workcentre("Painting booth"))
            .await
            .unwrap();

        let err = state
            .routing_service
            .create(&routing(&b1.bom_id, 10, &old_wc.workcentre_id))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotActive { entity: "Workcentre", .. }));

        let err = state
            .routing_service
            .create(&routing(&b1.bom_id, 10, "WC999"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MissingReference { .. }));
        assert_eq!(routing_count(&pool).await, 0);
    }

    #[sqlx::test]
    #[ignore]
    async fn put_supersedes_the_routing(pool: PgPool) {
        let state = AppState::from_pool(pool.clone());
        let p1 = state.part_service.create(&part("Frame")).await.unwrap();
        let p2 = state.part_service.create(&part("Tube")).await.unwrap();
        let b1 = state.bom_service.create(&edge(&p1.part_id, &p2.part_id)).await.unwrap();
        let wc = state.workcentre_service.create(&workcentre("Cutting")).await.unwrap();

        let first = state
            .routing_service
            .create(&routing(&b1.bom_id, 10, &wc.workcentre_id))
            .await
            .unwrap();
        let second = state
            .routing_service
            .update(&first.routing_id, &routing(&b1.bom_id, 20, &wc.workcentre_id))
            .await
            .unwrap();

        assert_ne!(first.routing_id, second.routing_id);
        assert_eq!(second.operation_seq, 20);
        assert!(second.status.is_active());
        let old = state.routing_service.get(&first.routing_id).await.unwrap();
        assert!(!old.status.is_active());

        let active = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM routings WHERE bom_id = $1 AND status = 'active'",
        )
        .bind(&b1.bom_id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(active, 1);

        let err = state
            .routing_service
            .update(&first.routing_id, &routing(&b1.bom_id, 30, &wc.workcentre_id))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotActive { .. }));
    }
}
