// src/services/order_service.rs

use std::collections::HashMap;

use sqlx::PgPool;

use crate::{
    common::{db_utils::begin_write, error::AppError, id_gen::EntityKind},
    db::{
        versioning_repo, BomRepository, OrderRepository, PartRepository, RoutingRepository,
        WorkcentreRepository,
    },
    models::order::{ComponentDetail, NewOrder, Order, OrderDetailsFull, RoutingDetail},
};

#[derive(Clone)]
pub struct OrderService {
    pool: PgPool,
    order_repo: OrderRepository,
    part_repo: PartRepository,
    bom_repo: BomRepository,
    routing_repo: RoutingRepository,
    workcentre_repo: WorkcentreRepository,
}

impl OrderService {
    pub fn new(
        pool: PgPool,
        order_repo: OrderRepository,
        part_repo: PartRepository,
        bom_repo: BomRepository,
        routing_repo: RoutingRepository,
        workcentre_repo: WorkcentreRepository,
    ) -> Self {
        Self {
            pool,
            order_repo,
            part_repo,
            bom_repo,
            routing_repo,
            workcentre_repo,
        }
    }

    pub async fn list(&self, status: Option<&str>) -> Result<Vec<Order>, AppError> {
        self.order_repo.list(status).await
    }

    pub async fn get(&self, order_id: &str) -> Result<Order, AppError> {
        self.order_repo
            .find_by_id(&self.pool, order_id)
            .await?
            .ok_or_else(|| AppError::not_found("Order", order_id))
    }

    pub async fn create(&self, draft: &NewOrder) -> Result<Order, AppError> {
        let mut tx = begin_write(&self.pool, &[EntityKind::Part, EntityKind::Order]).await?;

        if !self.part_repo.exists(&mut *tx, &draft.part_id).await? {
            return Err(AppError::missing_reference("Part", &draft.part_id));
        }

        let order_id = versioning_repo::next_id(&mut *tx, EntityKind::Order).await?;
        let order = self.order_repo.insert(&mut *tx, &order_id, draft).await?;

        tx.commit().await?;
        tracing::info!("Pedido {} criado para {}", order.order_id, order.part_id);
        Ok(order)
    }

    // Pedidos são alterados na própria linha.
    pub async fn update(&self, order_id: &str, draft: &NewOrder) -> Result<Order, AppError> {
        let mut tx = begin_write(&self.pool, &[EntityKind::Part, EntityKind::Order]).await?;

        if !self.part_repo.exists(&mut *tx, &draft.part_id).await? {
            return Err(AppError::missing_reference("Part", &draft.part_id));
        }

        let order = self
            .order_repo
            .update(&mut *tx, order_id, draft)
            .await?
            .ok_or_else(|| AppError::not_found("Order", order_id))?;

        tx.commit().await?;
        Ok(order)
    }

    pub async fn delete(&self, order_id: &str) -> Result<(), AppError> {
        let mut tx = begin_write(&self.pool, &[EntityKind::Order]).await?;
        if !versioning_repo::delete_by_id(&mut *tx, EntityKind::Order, order_id).await? {
            return Err(AppError::not_found("Order", order_id));
        }
        tx.commit().await?;
        tracing::info!("Pedido {} removido", order_id);
        Ok(())
    }

    // --- DETALHE COMPLETO ---
    // Pedido -> peça -> arestas ativas da peça -> roteiros ativos -> centros de trabalho.
    pub async fn details_full(&self, order_id: &str) -> Result<OrderDetailsFull, AppError> {
        // Uma transação só de leitura para ver um retrato consistente.
        let mut tx = self.pool.begin().await?;

        let order = self
            .order_repo
            .find_by_id(&mut *tx, order_id)
            .await?
            .ok_or_else(|| AppError::not_found("Order", order_id))?;

        let part = self.part_repo.find_by_id(&mut *tx, &order.part_id).await?;
        let edges = self.bom_repo.active_by_parent(&mut *tx, &order.part_id).await?;

        let bom_ids: Vec<String> = edges.iter().map(|e| e.bom_id.clone()).collect();
        let routings = self.routing_repo.active_for_boms(&mut *tx, &bom_ids).await?;

        let mut workcentre_ids: Vec<String> = routings.iter().map(|r| r.workcentre_id.clone()).collect();
        workcentre_ids.sort();
        workcentre_ids.dedup();
        let workcentres: HashMap<String, _> = self
            .workcentre_repo
            .find_many(&mut *tx, &workcentre_ids)
            .await?
            .into_iter()
            .map(|w| (w.workcentre_id.clone(), w))
            .collect();

        tx.commit().await?;

        let mut routings_by_bom: HashMap<String, Vec<RoutingDetail>> = HashMap::new();
        for routing in routings {
            let workcentre = workcentres.get(&routing.workcentre_id).cloned();
            routings_by_bom
                .entry(routing.bom_id.clone())
                .or_default()
                .push(RoutingDetail { routing, workcentre });
        }

        let components = edges
            .into_iter()
            .map(|edge| ComponentDetail {
                routings: routings_by_bom.remove(&edge.bom_id).unwrap_or_default(),
                edge,
            })
            .collect();

        Ok(OrderDetailsFull {
            order,
            part,
            components,
        })
    }
}
