//! Shared domain types for the orchestration core.
//!
//! This crate is the one every other crate in the workspace depends on: the
//! Project document and its nested settings/history records, the canonical
//! timeline model, TTS profiles, and the job/queue vocabulary shared between
//! the API and the worker.

pub mod demo;
pub mod job;
pub mod project;
pub mod render;
pub mod timeline;
pub mod tts;

pub use demo::{
    ArtifactSummary, Correlation, DebugArtifacts, DemoCaptureExecutionMode, DemoRunMode,
    DemoRunRecord, DependencyStatus, DriftStats, ExecutionSummary, RecordingProfile,
};
pub use job::{JobId, JobStatus, JobStatusResponse, RunType};
pub use project::{
    NarrationSettings, Project, ProjectSettings, Renders, SourceVideo, DemoState, Exports,
    SCHEMA_VERSION,
};
pub use render::{RenderMode, RenderRecord, RenderStatus, StageTimings};
pub use timeline::{ActionEvent, NarrationEvent, Timeline, TIMELINE_VERSION};
pub use tts::{TTSParams, TTSProfile, VoiceMode};
