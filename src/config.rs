// src/config.rs

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{BomRepository, OrderRepository, PartRepository, RoutingRepository, WorkcentreRepository},
    services::{
        integrity::BomIntegrityEngine, BomService, OrderService, PartService, RoutingService,
        WorkcentreService,
    },
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub max_connections: u32,
}

impl Config {
    // Lê o .env (se existir) e depois as variáveis de ambiente.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("DB_MAX_CONNECTIONS inválido: {raw}"))?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            database_url,
            bind_addr,
            max_connections,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub part_service: PartService,
    pub bom_service: BomService,
    pub routing_service: RoutingService,
    pub workcentre_service: WorkcentreService,
    pub order_service: OrderService,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_pool(db_pool))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_pool(db_pool: PgPool) -> Self {
        let part_repo = PartRepository::new(db_pool.clone());
        let bom_repo = BomRepository::new(db_pool.clone());
        let routing_repo = RoutingRepository::new(db_pool.clone());
        let workcentre_repo = WorkcentreRepository::new(db_pool.clone());
        let order_repo = OrderRepository::new(db_pool.clone());

        let engine = BomIntegrityEngine::new(part_repo.clone(), bom_repo.clone());

        let part_service = PartService::new(
            db_pool.clone(),
            part_repo.clone(),
            bom_repo.clone(),
            order_repo.clone(),
        );
        let bom_service = BomService::new(
            db_pool.clone(),
            bom_repo.clone(),
            part_repo.clone(),
            routing_repo.clone(),
            engine,
        );
        let routing_service = RoutingService::new(db_pool.clone(), routing_repo.clone());
        let workcentre_service =
            WorkcentreService::new(db_pool.clone(), workcentre_repo.clone(), routing_repo.clone());
        let order_service = OrderService::new(
            db_pool.clone(),
            order_repo,
            part_repo,
            bom_repo,
            routing_repo,
            workcentre_repo,
        );

        Self {
            db_pool,
            part_service,
            bom_service,
            routing_service,
            workcentre_service,
            order_service,
        }
    }
}
