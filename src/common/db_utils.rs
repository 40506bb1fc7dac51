use sqlx::{PgConnection, PgPool, Postgres, Transaction};

use crate::common::{error::AppError, id_gen::EntityKind};

// ---
// Helper de escrita: transação + advisory lock por tipo de entidade
// ---
/// Abre uma transação e trava os tipos de entidade informados até o commit
/// ou rollback. Toda escrita que gera ID, troca status ou checa referências
/// passa por aqui.
pub(crate) async fn begin_write(
    pool: &PgPool,
    kinds: &[EntityKind],
) -> Result<Transaction<'static, Postgres>, AppError> {
    // O '?' converte sqlx::Error -> AppError (pool esgotado vira 503)
    let mut tx = pool.begin().await?;
    lock_kinds(&mut *tx, kinds).await?;
    Ok(tx)
}

/// Trava os tipos sempre na mesma ordem para duas transações nunca se
/// bloquearem mutuamente.
pub(crate) async fn lock_kinds(
    conn: &mut PgConnection,
    kinds: &[EntityKind],
) -> Result<(), AppError> {
    let mut ordered = kinds.to_vec();
    ordered.sort();
    ordered.dedup();

    for kind in ordered {
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(kind.lock_key())
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}
