// src/db/order_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::order::{NewOrder, Order},
};

// Pedidos não passam pelo versionamento: são atualizados na própria linha.
#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, status: Option<&str>) -> Result<Vec<Order>, AppError> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT * FROM orders
            WHERE $1::text IS NULL OR LOWER(status) = LOWER($1)
            ORDER BY LENGTH(order_id), order_id
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, order_id: &str) -> Result<Option<Order>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE order_id = $1")
            .bind(order_id)
            .fetch_optional(executor)
            .await?;
        Ok(order)
    }

    pub async fn count_by_part<'e, E>(&self, executor: E, part_id: &str) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders WHERE part_id = $1")
            .bind(part_id)
            .fetch_one(executor)
            .await?;
        Ok(count)
    }

    pub async fn insert<'e, E>(&self, executor: E, order_id: &str, draft: &NewOrder) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (
                order_id, part_id, quantity, order_date, due_date, last_updated, status
            )
            VALUES ($1, $2, $3, $4, $5, NOW(), $6)
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(&draft.part_id)
        .bind(draft.quantity)
        .bind(draft.order_date)
        .bind(draft.due_date)
        .bind(draft.status_or_default())
        .fetch_one(executor)
        .await?;
        Ok(order)
    }

    pub async fn update<'e, E>(&self, executor: E, order_id: &str, draft: &NewOrder) -> Result<Option<Order>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders SET
                part_id = $2,
                quantity = $3,
                order_date = $4,
                due_date = $5,
                status = $6,
                last_updated = NOW()
            WHERE order_id = $1
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(&draft.part_id)
        .bind(draft.quantity)
        .bind(draft.order_date)
        .bind(draft.due_date)
        .bind(draft.status_or_default())
        .fetch_optional(executor)
        .await?;
        Ok(order)
    }

    pub async fn rename_part<'e, E>(&self, executor: E, old_id: &str, new_id: &str) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE orders SET part_id = $2, last_updated = NOW() WHERE part_id = $1",
        )
        .bind(old_id)
        .bind(new_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }
}
