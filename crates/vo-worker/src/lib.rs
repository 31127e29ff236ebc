#![deny(unreachable_patterns)]
//! Orchestration Core worker.
//!
//! This crate provides:
//! - Job executor dispatching `render` and `demo_capture` jobs
//! - Graceful shutdown and orphaned-job reclaim
//! - Structured job logging

pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod retry;

pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use executor::JobExecutor;
pub use logging::JobLogger;
