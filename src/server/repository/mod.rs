pub mod handlers;
pub mod models;
pub mod registry;
pub mod routes;
pub mod validation;

pub use registry::{RegisterError, RepositoryRegistry};
