// src/services/versioning.rs

use async_trait::async_trait;
use sqlx::PgConnection;

use crate::{
    common::{error::AppError, id_gen::EntityKind},
    db::versioning_repo,
};

/// Repositório de uma tabela versionada por status (Part, BOM, Routing,
/// Workcentre). Uma "atualização" nunca altera a linha: insere uma nova com
/// novo ID e inativa a anterior.
#[async_trait]
pub trait VersionedRepository: Send + Sync {
    type Record: Send;
    type Draft: Send + Sync;

    const KIND: EntityKind;

    /// Valores da chave natural, na ordem de `EntityKind::natural_key_columns`.
    fn natural_key(&self, draft: &Self::Draft) -> Vec<String>;

    /// Insere a nova versão, já ativa, com o ID informado.
    async fn insert_version(
        &self,
        conn: &mut PgConnection,
        id: &str,
        draft: &Self::Draft,
    ) -> Result<Self::Record, AppError>;

    /// Chamado dentro da mesma transação com os IDs recém-inativados.
    async fn after_superseded(
        &self,
        _conn: &mut PgConnection,
        _superseded_ids: &[String],
    ) -> Result<(), AppError> {
        Ok(())
    }
}

#[derive(Debug)]
pub struct Superseded<T> {
    pub record: T,
    pub superseded_ids: Vec<String>,
}

/// Inativa a versão atual da chave (e `replaced_id`, quando informado) e insere
/// `draft` como a nova versão ativa.
///
/// Deve rodar dentro de uma transação que já detém o lock de `R::KIND`
/// (ver `begin_write`); o commit fica com quem chamou, então a troca de status
/// e o insert são atômicos.
pub async fn supersede<R>(
    conn: &mut PgConnection,
    repo: &R,
    draft: &R::Draft,
    replaced_id: Option<&str>,
) -> Result<Superseded<R::Record>, AppError>
where
    R: VersionedRepository,
{
    let key = repo.natural_key(draft);
    let mut superseded_ids = versioning_repo::supersede_by_key(&mut *conn, R::KIND, &key).await?;

    if let Some(id) = replaced_id {
        if let Some(flipped) = versioning_repo::supersede_by_id(&mut *conn, R::KIND, id).await? {
            superseded_ids.push(flipped);
        }
    }

    if !superseded_ids.is_empty() {
        repo.after_superseded(&mut *conn, &superseded_ids).await?;
    }

    let id = versioning_repo::next_id(&mut *conn, R::KIND).await?;
    let record = repo.insert_version(&mut *conn, &id, draft).await?;

    tracing::info!(
        "{} {} ativo; inativados: {:?}",
        R::KIND.label(),
        id,
        superseded_ids
    );

    Ok(Superseded {
        record,
        superseded_ids,
    })
}

/// Garante que `id` existe e ainda é a versão ativa, antes de uma revisão.
pub async fn ensure_active(
    conn: &mut PgConnection,
    kind: EntityKind,
    id: &str,
) -> Result<(), AppError> {
    match versioning_repo::status_of(&mut *conn, kind, id).await? {
        None => Err(AppError::not_found(kind.label(), id)),
        Some(status) if !status.is_active() => Err(AppError::NotActive {
            entity: kind.label(),
            id: id.to_string(),
        }),
        Some(_) => Ok(()),
    }
}
