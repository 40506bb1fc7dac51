pub mod part_repo;
pub use part_repo::PartRepository;
pub mod bom_repo;
pub use bom_repo::BomRepository;
pub mod routing_repo;
pub use routing_repo::RoutingRepository;
pub mod workcentre_repo;
pub use workcentre_repo::WorkcentreRepository;
pub mod order_repo;
pub use order_repo::OrderRepository;

pub mod versioning_repo;
