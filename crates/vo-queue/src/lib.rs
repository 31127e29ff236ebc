//! Redis Streams job queue.
//!
//! This crate provides:
//! - Job enqueueing via Redis Streams (render and demo-capture runs)
//! - Worker consumption with retry/DLQ
//! - Per-job status tracking (`GET /jobs/{job_id}` backing store)

pub mod error;
pub mod job;
pub mod queue;

pub use error::{QueueError, QueueResult};
pub use job::{DemoCaptureJob, QueueJob, RenderJob};
pub use queue::{JobQueue, QueueConfig};
