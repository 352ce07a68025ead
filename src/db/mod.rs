pub mod images;
pub mod models;
pub mod repositories;

pub use models::*;
