pub mod bom_graph;
pub mod bom_service;
pub mod integrity;
pub mod order_service;
pub mod part_service;
pub mod routing_service;
pub mod versioning;
pub mod workcentre_service;

pub use bom_service::BomService;
pub use order_service::OrderService;
pub use part_service::PartService;
pub use routing_service::RoutingService;
pub use workcentre_service::WorkcentreService;
