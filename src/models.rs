pub mod bom;
pub mod order;
pub mod part;
pub mod routing;
pub mod status;
pub mod workcentre;
