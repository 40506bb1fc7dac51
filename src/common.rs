pub mod csv_export;
pub mod db_utils;
pub mod error;
pub mod extract;
pub mod id_gen;
pub mod validation;
