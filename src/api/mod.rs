//! HTTP webhook surface
//!
//! - POST /alexa - one skill invocation per request
//! - GET /health - liveness
//! - GET /metrics - Prometheus metrics

pub mod handlers;
pub mod routes;

pub use handlers::{ApiError, AppState};
pub use routes::build_router;
