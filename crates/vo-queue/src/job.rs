//! Job payloads for the queue: one render run or one demo capture run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vo_models::JobId;

/// Job to run the TTS render pipeline (tts-only or unified) for a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderJob {
    pub job_id: JobId,
    pub project_id: String,
    /// `Some` when this render should compose a fresh demo capture first
    /// (unified mode); `None` narrates over the project's existing source
    /// video (tts-only mode).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo_run_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_override: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl RenderJob {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            job_id: JobId::new(),
            project_id: project_id.into(),
            demo_run_id: None,
            profile_override: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_demo_run(mut self, demo_run_id: impl Into<String>) -> Self {
        self.demo_run_id = Some(demo_run_id.into());
        self
    }

    /// Generate idempotency key for deduplication: one in-flight render at
    /// a time per project.
    pub fn idempotency_key(&self) -> String {
        format!("render:{}", self.project_id)
    }
}

/// Job to run the Demo Runner's action timeline for a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoCaptureJob {
    pub job_id: JobId,
    pub project_id: String,
    pub run_id: String,
    pub created_at: DateTime<Utc>,
}

impl DemoCaptureJob {
    pub fn new(project_id: impl Into<String>, run_id: impl Into<String>) -> Self {
        Self {
            job_id: JobId::new(),
            project_id: project_id.into(),
            run_id: run_id.into(),
            created_at: Utc::now(),
        }
    }

    /// Generate idempotency key for deduplication: one in-flight capture at
    /// a time per project.
    pub fn idempotency_key(&self) -> String {
        format!("demo_capture:{}", self.project_id)
    }
}

/// Generic job wrapper for queue storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueueJob {
    Render(RenderJob),
    DemoCapture(DemoCaptureJob),
}

impl QueueJob {
    pub fn job_id(&self) -> &JobId {
        match self {
            QueueJob::Render(j) => &j.job_id,
            QueueJob::DemoCapture(j) => &j.job_id,
        }
    }

    pub fn project_id(&self) -> &str {
        match self {
            QueueJob::Render(j) => &j.project_id,
            QueueJob::DemoCapture(j) => &j.project_id,
        }
    }

    pub fn run_type(&self) -> vo_models::RunType {
        match self {
            QueueJob::Render(_) => vo_models::RunType::Render,
            QueueJob::DemoCapture(_) => vo_models::RunType::DemoCapture,
        }
    }

    pub fn idempotency_key(&self) -> String {
        match self {
            QueueJob::Render(j) => j.idempotency_key(),
            QueueJob::DemoCapture(j) => j.idempotency_key(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_job_render_serde_roundtrip() {
        let job = RenderJob::new("proj_1").with_demo_run("run_1");
        let wrapper = QueueJob::Render(job.clone());
        let json = serde_json::to_string(&wrapper).expect("serialize QueueJob");
        let decoded: QueueJob = serde_json::from_str(&json).expect("deserialize QueueJob");

        match decoded {
            QueueJob::Render(j) => {
                assert_eq!(j.job_id, job.job_id);
                assert_eq!(j.project_id, job.project_id);
                assert_eq!(j.demo_run_id, job.demo_run_id);
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn idempotency_key_is_scoped_per_project_and_run_type() {
        let render = QueueJob::Render(RenderJob::new("proj_1"));
        let capture = QueueJob::DemoCapture(DemoCaptureJob::new("proj_1", "run_1"));
        assert_ne!(render.idempotency_key(), capture.idempotency_key());
    }
}
