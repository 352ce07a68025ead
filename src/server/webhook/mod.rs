pub mod handlers;
pub mod models;
pub mod processor;
pub mod reporter;
pub mod routes;

pub use processor::{PushEventProcessor, PushOutcome};
pub use reporter::{PushEventReporter, TracingReporter};
