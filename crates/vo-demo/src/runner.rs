//! The Demo Runner: executes a validated action timeline against a
//! `BrowserSession` on an absolute schedule, classifies and retries
//! transient failures, then transcodes and quality-gates the resulting
//! recording.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tokio::time::sleep_until;
use vo_media::command::{FfmpegCommand, FfmpegRunner};
use vo_media::probe::probe_video;
use vo_models::{
    ActionEvent, ArtifactSummary, Correlation, DebugArtifacts, DemoCaptureExecutionMode,
    DemoRunMode, DemoRunRecord, DependencyStatus, DriftStats, ExecutionSummary, RecordingProfile,
};

use crate::error::{DemoError, DemoResult, FailureClass};
use crate::session::BrowserSession;
use crate::validator::validate_actions;

const DEFAULT_ACTION_TIMEOUT_MS: i64 = 5_000;
const MIN_PLAYABLE_DURATION_MS: i64 = 200;

#[derive(Debug, Default)]
struct ErrorSummaryBuilder {
    failed_action_ids: Vec<String>,
    error_types: Vec<String>,
    message: Option<String>,
}

impl ErrorSummaryBuilder {
    fn record(&mut self, action_id: &str, class: FailureClass, message: String) {
        self.failed_action_ids.push(action_id.to_string());
        let kind = class.as_str().to_string();
        if !self.error_types.contains(&kind) {
            self.error_types.push(kind);
        }
        self.message.get_or_insert(message);
    }

    fn build(self) -> vo_models::demo::ErrorSummary {
        vo_models::demo::ErrorSummary {
            has_error: !self.failed_action_ids.is_empty(),
            message: self.message,
            failed_actions: self.failed_action_ids.len(),
            failed_action_ids: self.failed_action_ids,
            error_types: self.error_types,
            dependency_diagnostic: None,
            runtime_diagnostic: None,
        }
    }
}

/// Execute every action on its absolute-timeline schedule. A single action
/// is retried up to its `retries` budget when its failure is classified as
/// transient; a non-retryable or exhausted failure is recorded and
/// execution moves on to the next action rather than aborting the run.
async fn execute_actions(
    session: &mut dyn BrowserSession,
    actions: &[ActionEvent],
) -> (ExecutionSummary, DriftStats, vo_models::demo::ErrorSummary) {
    let schedule_start = Instant::now();
    let mut summary = ExecutionSummary::default();
    let mut drifts_ms: Vec<f64> = Vec::with_capacity(actions.len());
    let mut errors = ErrorSummaryBuilder::default();

    for action in actions {
        summary.total += 1;
        let planned = schedule_start + Duration::from_millis(action.at_ms.max(0) as u64);
        sleep_until(tokio::time::Instant::from_std(planned)).await;
        let actual = Instant::now();
        let drift_ms = actual.saturating_duration_since(planned).as_millis() as f64;
        drifts_ms.push(drift_ms);

        let max_attempts = 1 + action.retries.unwrap_or(0).max(0) as usize;
        let mut last_err: Option<String> = None;
        let mut ok = false;

        for attempt in 0..max_attempts {
            let outcome = run_single_action(session, action).await;
            match outcome {
                Ok(()) => {
                    ok = true;
                    break;
                }
                Err(err) => {
                    let message = err.to_string();
                    let class = FailureClass::classify(&message);
                    if class == FailureClass::Timeout {
                        summary.timeouts += 1;
                    }
                    last_err = Some(message);
                    if attempt + 1 < max_attempts && class.is_retryable() {
                        summary.retries += 1;
                        continue;
                    }
                    break;
                }
            }
        }

        if ok {
            summary.ok += 1;
        } else {
            summary.error += 1;
            let message = last_err.unwrap_or_else(|| "action failed".to_string());
            let class = FailureClass::classify(&message);
            errors.record(&action.id, class, message);
        }
    }

    let drift_stats = summarize_drift(&drifts_ms);
    (summary, drift_stats, errors.build())
}

async fn run_single_action(session: &mut dyn BrowserSession, action: &ActionEvent) -> DemoResult<()> {
    let timeout_ms = action.timeout_ms.unwrap_or(DEFAULT_ACTION_TIMEOUT_MS).max(1) as u64;
    let body = async {
        match action.action.as_str() {
            "goto" => session.goto(action.target.as_deref().unwrap_or_default()).await,
            "click" => session.click(action.target.as_deref().unwrap_or_default()).await,
            "fill" => {
                let value = action
                    .args
                    .get("value")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default();
                session.fill(action.target.as_deref().unwrap_or_default(), value).await
            }
            "press" => session.press(action.target.as_deref().unwrap_or_default()).await,
            "wait" => session.wait(action.at_ms).await,
            "screenshot" => {
                let path = action
                    .args
                    .get("path")
                    .and_then(|v| v.as_str())
                    .unwrap_or("screenshot.png");
                session.screenshot(Path::new(path)).await
            }
            other => Err(DemoError::InvalidAction {
                action_id: action.id.clone(),
                message: format!("unsupported action {other:?}"),
            }),
        }
    };

    match tokio::time::timeout(Duration::from_millis(timeout_ms), body).await {
        Ok(result) => result,
        Err(_) => Err(DemoError::ActionTimeout {
            action_id: action.id.clone(),
            timeout_ms: timeout_ms as i64,
        }),
    }
}

fn summarize_drift(samples: &[f64]) -> DriftStats {
    if samples.is_empty() {
        return DriftStats::default();
    }
    let count = samples.len();
    let mean = samples.iter().sum::<f64>() / count as f64;
    let max = samples.iter().cloned().fold(f64::MIN, f64::max);
    let min = samples.iter().cloned().fold(f64::MAX, f64::min);

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let p95_index = ((count as f64 - 1.0) * 0.95).round() as usize;
    let p95 = sorted[p95_index.min(count - 1)];

    DriftStats { count, mean, max, min, p95 }
}

pub struct DemoRunner {
    pub recording_profile: RecordingProfile,
}

impl Default for DemoRunner {
    fn default() -> Self {
        Self {
            recording_profile: RecordingProfile::default(),
        }
    }
}

impl DemoRunner {
    /// Validate, execute, transcode, and quality-gate one demo capture run.
    pub async fn run(
        &self,
        session: &mut dyn BrowserSession,
        run_id: String,
        actions: &[ActionEvent],
        execution_mode: DemoCaptureExecutionMode,
        dependency_status: DependencyStatus,
        correlation: Correlation,
        output_dir: &Path,
    ) -> DemoResult<DemoRunRecord> {
        validate_actions(actions)?;

        let started_at = chrono::Utc::now().to_rfc3339();
        let run_start = Instant::now();

        session.start_tracing().await?;
        let (execution_summary, drift_stats, mut error_summary) = execute_actions(session, actions).await;

        let trace_path = output_dir.join(format!("{run_id}_trace.zip"));
        session.stop_tracing(&trace_path).await?;
        let raw_path = session.video_path();
        session.close().await?;

        let mut artifact_summary = ArtifactSummary::default();
        let mut debug_artifacts = DebugArtifacts {
            trace_path: Some(trace_path.display().to_string()),
            screenshot_paths: Vec::new(),
        };

        let mut mode = DemoRunMode::DemoCaptureDryRun;

        if let Some(raw) = raw_path {
            let final_path = output_dir.join(format!("{run_id}.mp4"));
            match transcode_recording(&raw, &final_path, &self.recording_profile).await {
                Ok(info) => {
                    artifact_summary.raw_demo_path = Some(final_path.display().to_string());
                    artifact_summary.raw_demo_duration_ms = (info.duration * 1000.0) as i64;
                    artifact_summary.raw_demo_size_bytes = info.size;
                    artifact_summary.video_codec = Some(info.codec.clone());
                    artifact_summary.raw_demo_playable =
                        Some(artifact_summary.raw_demo_duration_ms >= MIN_PLAYABLE_DURATION_MS);

                    mode = if artifact_summary.raw_demo_playable == Some(true) {
                        DemoRunMode::DemoCapturePlaywright
                    } else {
                        DemoRunMode::DemoCaptureFailed
                    };
                }
                Err(err) => {
                    error_summary.has_error = true;
                    error_summary.runtime_diagnostic = Some(err.to_string());
                    mode = DemoRunMode::DemoCaptureFailed;
                }
            }
        } else if dependency_status.required {
            mode = DemoRunMode::DemoCaptureFailed;
            error_summary.has_error = true;
            error_summary.dependency_diagnostic = Some(dependency_status.error.clone());
        }

        let mut stage_timings_ms = HashMap::new();
        stage_timings_ms.insert("total_ms".to_string(), run_start.elapsed().as_millis() as i64);

        Ok(DemoRunRecord {
            run_id,
            created_at: started_at,
            mode,
            execution_mode,
            actions_total: actions.len(),
            actions_executed: execution_summary.ok + execution_summary.error,
            stage_timings_ms,
            drift_stats,
            execution_summary,
            error_summary,
            artifact_summary,
            debug_artifacts,
            recording_profile: self.recording_profile.clone(),
            correlation,
            dependency_status,
        })
    }
}

async fn transcode_recording(
    raw: &Path,
    output: &Path,
    profile: &RecordingProfile,
) -> Result<vo_media::probe::VideoInfo, vo_media::MediaError> {
    let cmd = FfmpegCommand::new(raw, output)
        .video_codec(profile.video_codec.clone())
        .output_arg("-pix_fmt")
        .output_arg(profile.pixel_format.clone())
        .audio_codec(profile.audio_codec.clone())
        .preset(profile.video_preset.clone())
        .output_arg("-r")
        .output_arg(profile.fps.to_string())
        .output_arg("-movflags")
        .output_arg(profile.movflags.trim_start_matches('+').to_string());

    FfmpegRunner::new().run(&cmd).await?;
    probe_video(output).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::fake::FakeSession;

    fn action(id: &str, action_name: &str, at_ms: i64, target: Option<&str>, retries: Option<i64>) -> ActionEvent {
        ActionEvent {
            id: id.to_string(),
            at_ms,
            action: action_name.to_string(),
            target: target.map(|s| s.to_string()),
            args: Default::default(),
            timeout_ms: Some(500),
            retries,
            source_index: 0,
        }
    }

    #[tokio::test]
    async fn executes_all_actions_and_reports_drift() {
        let mut session = FakeSession::default();
        let actions = vec![
            action("a1", "goto", 0, Some("https://example.com"), None),
            action("a2", "click", 5, Some("#login"), None),
        ];
        let (summary, drift, errors) = execute_actions(&mut session, &actions).await;
        assert_eq!(summary.total, 2);
        assert_eq!(summary.ok, 2);
        assert!(!errors.has_error);
        assert_eq!(drift.count, 2);
    }

    #[tokio::test]
    async fn retries_transient_failures_up_to_budget() {
        let mut session = FakeSession {
            fail_action: Some("click".to_string()),
            ..Default::default()
        };
        let actions = vec![action("a1", "click", 0, Some("#x"), Some(2))];
        let (summary, _drift, errors) = execute_actions(&mut session, &actions).await;
        // FakeSession's failure message "click failed" classifies as ActionError, which
        // is not retryable, so it's recorded immediately without consuming retries.
        assert_eq!(summary.error, 1);
        assert!(errors.has_error);
    }

    #[tokio::test]
    async fn run_without_browser_and_optional_dependency_is_a_dry_run() {
        let mut session = FakeSession::default();
        let runner = DemoRunner::default();
        let actions = vec![action("a1", "wait", 0, None, None)];
        let dir = tempfile::tempdir().unwrap();
        let dependency_status = DependencyStatus {
            ok: true,
            python_package_ok: true,
            browser_ok: false,
            error: String::new(),
            execution_mode: "playwright_optional".to_string(),
            required: false,
        };
        let record = runner
            .run(
                &mut session,
                "run1".to_string(),
                &actions,
                DemoCaptureExecutionMode::PlaywrightOptional,
                dependency_status,
                Correlation::default(),
                dir.path(),
            )
            .await
            .unwrap();
        assert_eq!(record.mode, DemoRunMode::DemoCaptureDryRun);
    }
}
