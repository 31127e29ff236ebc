//! The Project Store: one JSON document per project, read and written
//! atomically from a directory tree on local disk.
//!
//! Layout: `{root}/{project_id}/project.json` plus a human-readable
//! `{root}/{project_id}/demo_context.md` mirror of `settings.demo_context`,
//! kept in sync on every save so an operator can `cat` it without parsing
//! JSON.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::fs;
use vo_models::{DemoRunRecord, Project, RenderRecord, SourceVideo};

use crate::error::{StorageError, StorageResult};
use crate::fs_atomic::write_atomic;
use crate::history::push_bounded;
use crate::migration::ensure_project_defaults;

#[derive(Debug, Clone)]
pub struct ProjectStore {
    root: PathBuf,
}

impl ProjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn project_dir(&self, project_id: &str) -> PathBuf {
        self.root.join(project_id)
    }

    pub fn project_path(&self, project_id: &str) -> PathBuf {
        self.project_dir(project_id).join("project.json")
    }

    fn demo_context_path(&self, project_id: &str) -> PathBuf {
        self.project_dir(project_id).join("demo_context.md")
    }

    /// Create a brand-new project for a freshly uploaded source video.
    /// Fails if a project with the same id already has a document on disk.
    pub async fn init_project(&self, project_id: &str, video: SourceVideo) -> StorageResult<Project> {
        let path = self.project_path(project_id);
        if fs::try_exists(&path).await? {
            return Err(StorageError::already_exists(project_id));
        }
        let now = Utc::now().to_rfc3339();
        let project = Project::new(project_id, now, video);
        self.save_project(&project).await?;
        Ok(project)
    }

    /// Load a project, running it through default-filling migration. The
    /// on-disk document is not rewritten unless a subsequent mutation is
    /// saved — loading alone never takes a write lock.
    pub async fn load_project(&self, project_id: &str) -> StorageResult<Project> {
        let path = self.project_path(project_id);
        let bytes = fs::read(&path)
            .await
            .map_err(|_| StorageError::not_found(project_id))?;
        let mut project: Project = serde_json::from_slice(&bytes)
            .map_err(|e| StorageError::corrupt(path.display().to_string(), e.to_string()))?;
        ensure_project_defaults(&mut project);
        Ok(project)
    }

    /// Persist `project` atomically and refresh its `demo_context.md`
    /// mirror. Bumps `updated_at` to now.
    pub async fn save_project(&self, project: &Project) -> StorageResult<()> {
        let mut project = project.clone();
        project.updated_at = Utc::now().to_rfc3339();

        let path = self.project_path(&project.project_id);
        let json = serde_json::to_vec_pretty(&project)?;
        write_atomic(&path, &json).await?;

        let context_path = self.demo_context_path(&project.project_id);
        write_atomic(&context_path, project.settings.demo_context.as_bytes()).await?;

        Ok(())
    }

    /// Replace the project's timeline and persist it.
    pub async fn set_timeline(&self, project_id: &str, timeline: vo_models::Timeline) -> StorageResult<Project> {
        let mut project = self.load_project(project_id).await?;
        project.timeline = timeline;
        self.save_project(&project).await?;
        Ok(project)
    }

    /// Mutate `settings` in place via `mutator`, then persist.
    pub async fn update_settings<F>(&self, project_id: &str, mutator: F) -> StorageResult<Project>
    where
        F: FnOnce(&mut vo_models::ProjectSettings),
    {
        let mut project = self.load_project(project_id).await?;
        mutator(&mut project.settings);
        self.save_project(&project).await?;
        Ok(project)
    }

    /// Append a demo-run record, bounding `demo.runs` to the soft limit,
    /// and persist.
    pub async fn append_demo_run(&self, project_id: &str, record: DemoRunRecord) -> StorageResult<Project> {
        let mut project = self.load_project(project_id).await?;
        project.demo.last_run_id = Some(record.run_id.clone());
        push_bounded(&mut project.demo.runs, record);
        self.save_project(&project).await?;
        Ok(project)
    }

    /// Append a render record, bounding `renders.history` to the soft
    /// limit, and persist.
    pub async fn append_render_history(&self, project_id: &str, record: RenderRecord) -> StorageResult<Project> {
        let mut project = self.load_project(project_id).await?;
        project.renders.last_render_id = Some(record.render_id.clone());
        push_bounded(&mut project.renders.history, record);
        self.save_project(&project).await?;
        Ok(project)
    }

    pub fn exists(&self, project_id: &str) -> bool {
        Path::new(&self.project_path(project_id)).exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vo_models::demo::{
        ArtifactSummary, Correlation, DebugArtifacts, DemoCaptureExecutionMode, DemoRunMode,
        DependencyStatus, DriftStats, ErrorSummary, ExecutionSummary, RecordingProfile,
    };

    fn store() -> (ProjectStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        (ProjectStore::new(dir.path()), dir)
    }

    fn video() -> SourceVideo {
        SourceVideo {
            path: "uploads/a.mp4".to_string(),
            sha256: "abc".to_string(),
            duration_ms: 60_000,
            width: Some(1280),
            height: Some(720),
            fps: Some(30.0),
            has_audio: true,
        }
    }

    #[tokio::test]
    async fn init_then_load_round_trips() {
        let (store, _dir) = store();
        let created = store.init_project("p1", video()).await.unwrap();
        let loaded = store.load_project("p1").await.unwrap();
        assert_eq!(created.project_id, loaded.project_id);
        assert_eq!(loaded.source.video.sha256, "abc");
    }

    #[tokio::test]
    async fn init_twice_fails() {
        let (store, _dir) = store();
        store.init_project("p1", video()).await.unwrap();
        let err = store.init_project("p1", video()).await.unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn load_missing_project_fails() {
        let (store, _dir) = store();
        let err = store.load_project("nope").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn append_demo_run_sets_last_run_id_and_bounds_history() {
        let (store, _dir) = store();
        store.init_project("p1", video()).await.unwrap();

        for i in 0..60 {
            let record = DemoRunRecord {
                run_id: format!("run_{i}"),
                created_at: "2026-01-01T00:00:00Z".to_string(),
                mode: DemoRunMode::DemoCaptureDryRun,
                execution_mode: DemoCaptureExecutionMode::PlaywrightOptional,
                actions_total: 0,
                actions_executed: 0,
                stage_timings_ms: Default::default(),
                drift_stats: DriftStats::default(),
                execution_summary: ExecutionSummary::default(),
                error_summary: ErrorSummary::default(),
                artifact_summary: ArtifactSummary::default(),
                debug_artifacts: DebugArtifacts::default(),
                recording_profile: RecordingProfile::default(),
                correlation: Correlation::default(),
                dependency_status: DependencyStatus::default(),
            };
            store.append_demo_run("p1", record).await.unwrap();
        }

        let project = store.load_project("p1").await.unwrap();
        assert_eq!(project.demo.runs.len(), crate::history::SOFT_LIMIT);
        assert_eq!(project.demo.last_run_id, Some("run_59".to_string()));
        assert_eq!(project.demo.runs[0].run_id, "run_10");
    }

    #[tokio::test]
    async fn save_mirrors_demo_context_md() {
        let (store, dir) = store();
        let mut project = store.init_project("p1", video()).await.unwrap();
        project.settings.demo_context = "## Context\nClick the login button.".to_string();
        store.save_project(&project).await.unwrap();

        let mirrored = fs::read_to_string(dir.path().join("p1").join("demo_context.md"))
            .await
            .unwrap();
        assert_eq!(mirrored, "## Context\nClick the login button.");
    }
}
