//! HTTP surface for ragserve.
//!
//! Thin axum plumbing around the core pipeline: JSON routes for text and
//! URL ingestion, a multipart upload route, and the query endpoint.
//! Validation failures are rejected at the boundary with 400; everything
//! else is logged and reported as a 500 with a generic message.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::{Environment, ServerConfig};
pub use error::ApiError;
pub use routes::app_router;
pub use state::AppState;
