//! Unified Pipeline: capture a fresh demo recording, then narrate over it
//! with the same render logic [`crate::pipeline::TtsOnlyPipeline`] uses for
//! a project's own source video.

use std::path::{Path, PathBuf};

use vo_demo::{BrowserSession, DemoRunner};
use vo_models::{
    ActionEvent, Correlation, DemoCaptureExecutionMode, DependencyStatus, Project, RenderMode,
    RenderRecord,
};

use crate::error::TtsResult;
use crate::pipeline::TtsOnlyPipeline;

pub struct UnifiedPipeline {
    demo_runner: DemoRunner,
    tts_pipeline: TtsOnlyPipeline,
}

impl UnifiedPipeline {
    pub fn new(demo_runner: DemoRunner, tts_pipeline: TtsOnlyPipeline) -> Self {
        Self {
            demo_runner,
            tts_pipeline,
        }
    }

    /// Run the demo capture for `run_id`, then narrate over whatever it
    /// produced (the transcoded recording on success, or the project's own
    /// source video when the run falls back to a dry run). Returns the demo
    /// run record alongside the render record and final MP4 path.
    #[allow(clippy::too_many_arguments)]
    pub async fn run(
        &self,
        project: &Project,
        session: &mut dyn BrowserSession,
        run_id: String,
        actions: &[ActionEvent],
        execution_mode: DemoCaptureExecutionMode,
        dependency_status: DependencyStatus,
        demo_output_dir: &Path,
    ) -> TtsResult<(vo_models::DemoRunRecord, RenderRecord, PathBuf)> {
        let demo_correlation = Correlation {
            trigger: Some("unified".to_string()),
            ..Default::default()
        };

        let demo_record = self
            .demo_runner
            .run(
                session,
                run_id.clone(),
                actions,
                execution_mode,
                dependency_status,
                demo_correlation,
                demo_output_dir,
            )
            .await?;

        let source_video_path = demo_record
            .artifact_summary
            .raw_demo_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(project.source.video.path.clone()));

        let render_correlation = Correlation {
            unified_run_id: Some(demo_record.run_id.clone()),
            render_mode: Some(RenderMode::Unified.as_str().to_string()),
            source_video_path: Some(source_video_path.display().to_string()),
            ..Default::default()
        };

        let (render_record, final_path) = self
            .tts_pipeline
            .render(project, &source_video_path, RenderMode::Unified, render_correlation)
            .await?;

        Ok((demo_record, render_record, final_path))
    }
}
