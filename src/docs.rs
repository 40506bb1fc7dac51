// src/docs.rs

use utoipa::OpenApi;

use crate::common::csv_export::{ListFormat, ListResponse};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(title = "BOM Backend", description = "Estrutura de produto, roteiros, centros de trabalho e pedidos"),
    paths(
        // --- Parts ---
        handlers::parts::list_parts,
        handlers::parts::get_part,
        handlers::parts::create_part,
        handlers::parts::update_part,
        handlers::parts::delete_part,
        handlers::parts::update_part_id,

        // --- BOM ---
        handlers::bom::list_bom,
        handlers::bom::get_bom,
        handlers::bom::create_bom,
        handlers::bom::update_bom,
        handlers::bom::delete_bom,
        handlers::bom::explode_bom,

        // --- Routings ---
        handlers::routings::list_routings,
        handlers::routings::get_routing,
        handlers::routings::create_routing,
        handlers::routings::update_routing,
        handlers::routings::delete_routing,

        // --- Workcentres ---
        handlers::workcentres::list_workcentres,
        handlers::workcentres::get_workcentre,
        handlers::workcentres::create_workcentre,
        handlers::workcentres::update_workcentre,
        handlers::workcentres::delete_workcentre,

        // --- Orders ---
        handlers::orders::list_orders,
        handlers::orders::get_order,
        handlers::orders::create_order,
        handlers::orders::update_order,
        handlers::orders::delete_order,
        handlers::orders::get_order_details_full,
    ),
    components(
        schemas(
            models::status::RecordStatus,
            ListFormat,
            ListResponse<models::part::Part>,
            ListResponse<models::bom::BomEdge>,
            ListResponse<models::routing::Routing>,
            ListResponse<models::workcentre::Workcentre>,
            ListResponse<models::order::Order>,

            // --- Parts ---
            models::part::Part,
            models::part::NewPart,
            models::part::RenamePartId,
            models::part::RenameSummary,

            // --- BOM ---
            models::bom::BomEdge,
            models::bom::NewBomEdge,
            models::bom::ExplosionLine,
            models::bom::BomExplosion,

            // --- Routings ---
            models::routing::Routing,
            models::routing::NewRouting,

            // --- Workcentres ---
            models::workcentre::Workcentre,
            models::workcentre::NewWorkcentre,

            // --- Orders ---
            models::order::Order,
            models::order::NewOrder,
            models::order::RoutingDetail,
            models::order::ComponentDetail,
            models::order::OrderDetailsFull,
        )
    ),
    tags(
        (name = "Parts", description = "Cadastro de peças (part master records)"),
        (name = "BOM", description = "Estrutura de produto e verificação de ciclos"),
        (name = "Routings", description = "Roteiros de fabricação por aresta de BOM"),
        (name = "Workcentres", description = "Centros de trabalho"),
        (name = "Orders", description = "Pedidos e visão completa do pedido")
    )
)]
pub struct ApiDoc;
