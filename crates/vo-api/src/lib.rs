//! Axum HTTP API server.
//!
//! This crate provides:
//! - The project/timeline/TTS/demo/render REST surface (spec §6)
//! - Request-id propagation, structured logging, security headers, CORS
//! - Per-IP rate limiting and Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
