pub mod bom;
pub mod orders;
pub mod parts;
pub mod routings;
pub mod workcentres;
