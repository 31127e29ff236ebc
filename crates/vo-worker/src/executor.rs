//! Job executor: consumes `render` and `demo_capture` jobs from the queue
//! and drives the render/demo pipelines to completion.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use vo_demo::{probe_dependencies, BrowserSession, DemoRunner};
use vo_models::{Correlation, RenderMode};
use vo_queue::{DemoCaptureJob, JobQueue, QueueJob, RenderJob};
use vo_storage::ProjectStore;
use vo_tts::{AudioCache, TtsClient, TtsOnlyPipeline, UnifiedPipeline};

use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::logging::JobLogger;

/// Shared, cheap-to-clone state every job needs to build its pipelines.
#[derive(Clone)]
struct ExecutorContext {
    config: WorkerConfig,
    storage: Arc<ProjectStore>,
    tts_cache: Arc<AudioCache>,
    http_client: reqwest::Client,
}

impl ExecutorContext {
    fn new(config: WorkerConfig) -> Self {
        let storage = Arc::new(ProjectStore::new(&config.projects_root));
        let tts_cache = Arc::new(AudioCache::new(&config.tts_cache_root));
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");

        Self {
            config,
            storage,
            tts_cache,
            http_client,
        }
    }

    fn tts_pipeline(&self) -> TtsOnlyPipeline {
        let client = TtsClient::new(self.http_client.clone(), self.config.tts_api_key.clone());
        TtsOnlyPipeline::new(client, (*self.tts_cache).clone(), self.config.work_dir.clone())
    }
}

/// A browser automation driver that never actually drives a browser.
///
/// No concrete `BrowserSession` backend (Playwright-over-CDP, a headless
/// Chrome binding) ships in this workspace; [`vo_demo::dependencies`]
/// already falls back to a dry run when the environment has no usable
/// browser, so a null session just takes that same path unconditionally.
struct NullBrowserSession;

#[async_trait::async_trait]
impl BrowserSession for NullBrowserSession {
    async fn goto(&mut self, _url: &str) -> vo_demo::DemoResult<()> {
        Ok(())
    }
    async fn click(&mut self, _selector: &str) -> vo_demo::DemoResult<()> {
        Ok(())
    }
    async fn fill(&mut self, _selector: &str, _value: &str) -> vo_demo::DemoResult<()> {
        Ok(())
    }
    async fn press(&mut self, _key: &str) -> vo_demo::DemoResult<()> {
        Ok(())
    }
    async fn wait(&mut self, _ms: i64) -> vo_demo::DemoResult<()> {
        Ok(())
    }
    async fn screenshot(&mut self, _path: &std::path::Path) -> vo_demo::DemoResult<()> {
        Ok(())
    }
    fn video_path(&self) -> Option<PathBuf> {
        None
    }
    async fn close(&mut self) -> vo_demo::DemoResult<()> {
        Ok(())
    }
}

/// Job executor that processes jobs from the queue.
pub struct JobExecutor {
    config: WorkerConfig,
    queue: Arc<JobQueue>,
    job_semaphore: Arc<Semaphore>,
    shutdown: tokio::sync::watch::Sender<bool>,
    consumer_name: String,
}

impl JobExecutor {
    /// Create a new job executor.
    pub fn new(config: WorkerConfig, queue: JobQueue) -> WorkerResult<Self> {
        let job_semaphore = Arc::new(Semaphore::new(config.max_concurrent_jobs));
        let (shutdown, _) = tokio::sync::watch::channel(false);
        let consumer_name = format!("worker-{}", Uuid::new_v4());

        Ok(Self {
            config,
            queue: Arc::new(queue),
            job_semaphore,
            shutdown,
            consumer_name,
        })
    }

    /// Start the executor.
    pub async fn run(&self) -> WorkerResult<()> {
        info!(
            "Starting job executor '{}' with {} max concurrent jobs",
            self.consumer_name, self.config.max_concurrent_jobs
        );

        self.queue.init().await?;
        std::fs::create_dir_all(&self.config.work_dir).ok();

        let ctx = Arc::new(ExecutorContext::new(self.config.clone()));

        let mut shutdown_rx = self.shutdown.subscribe();

        let queue_clone = Arc::clone(&self.queue);
        let consumer_name = self.consumer_name.clone();
        let ctx_clone = Arc::clone(&ctx);
        let semaphore_clone = Arc::clone(&self.job_semaphore);
        let claim_interval = self.config.claim_interval;
        let claim_min_idle_ms = self.config.claim_min_idle.as_millis() as u64;
        let mut shutdown_rx_claim = self.shutdown.subscribe();

        let claim_task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(claim_interval);
            loop {
                tokio::select! {
                    _ = shutdown_rx_claim.changed() => {
                        if *shutdown_rx_claim.borrow() {
                            break;
                        }
                    }
                    _ = interval.tick() => {
                        match queue_clone.claim_pending(&consumer_name, claim_min_idle_ms, 5).await {
                            Ok(jobs) if !jobs.is_empty() => {
                                info!("Claimed {} pending jobs", jobs.len());
                                for (message_id, job) in jobs {
                                    let ctx = Arc::clone(&ctx_clone);
                                    let queue = Arc::clone(&queue_clone);
                                    let permit = semaphore_clone.clone().acquire_owned().await;
                                    if permit.is_err() {
                                        break;
                                    }
                                    let permit = permit.unwrap();

                                    tokio::spawn(async move {
                                        let _permit = permit;
                                        Self::execute_job(ctx, queue, message_id, job).await;
                                    });
                                }
                            }
                            Ok(_) => {}
                            Err(e) => {
                                warn!("Failed to claim pending jobs: {}", e);
                            }
                        }
                    }
                }
            }
        });

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        info!("Shutdown signal received, stopping executor");
                        break;
                    }
                }
                result = self.consume_jobs(&ctx) => {
                    if let Err(e) = result {
                        error!("Error consuming jobs: {}", e);
                        tokio::time::sleep(Duration::from_secs(5)).await;
                    }
                }
            }
        }

        claim_task.abort();

        info!("Waiting for in-flight jobs to complete...");
        let _ = tokio::time::timeout(self.config.shutdown_timeout, self.wait_for_jobs()).await;

        info!("Job executor stopped");
        Ok(())
    }

    /// Consume and process jobs from the queue.
    async fn consume_jobs(&self, ctx: &Arc<ExecutorContext>) -> WorkerResult<()> {
        let available = self.job_semaphore.available_permits();
        if available == 0 {
            tokio::time::sleep(Duration::from_millis(100)).await;
            return Ok(());
        }

        let jobs = self
            .queue
            .consume(&self.consumer_name, 1000, available.min(5))
            .await?;

        if jobs.is_empty() {
            return Ok(());
        }

        debug!("Consumed {} jobs from queue", jobs.len());

        for (message_id, job) in jobs {
            let ctx = Arc::clone(ctx);
            let queue = Arc::clone(&self.queue);
            let permit = self
                .job_semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|_| WorkerError::job_failed("Semaphore closed"))?;

            tokio::spawn(async move {
                let _permit = permit;
                Self::execute_job(ctx, queue, message_id, job).await;
            });
        }

        Ok(())
    }

    /// Execute a single job with retry and DLQ handling.
    async fn execute_job(ctx: Arc<ExecutorContext>, queue: Arc<JobQueue>, message_id: String, job: QueueJob) {
        let job_id = job.job_id().clone();
        let logger = JobLogger::new(&job_id, job.run_type().as_str());
        logger.log_start("dequeued");

        queue.start_job_status(&job_id).await.ok();

        let result = Self::process_job(&ctx, job.clone()).await;

        match result {
            Ok(result_json) => {
                logger.log_completion("job completed successfully");
                queue.complete_job_status(&job_id, result_json).await.ok();
                if let Err(e) = queue.ack(&message_id).await {
                    error!("Failed to ack job {}: {}", job_id, e);
                }
                if let Err(e) = queue.clear_dedup(&job).await {
                    warn!("Failed to clear dedup key for job {}: {}", job_id, e);
                }
            }
            Err(e) => {
                logger.log_error(&e.to_string());

                let retry_count = queue.increment_retry(&message_id).await.unwrap_or(999);
                let max_retries = queue.max_retries();

                if !e.is_retryable() || retry_count >= max_retries {
                    warn!(
                        "Job {} failed permanently (retry {}/{}), moving to DLQ",
                        job_id, retry_count, max_retries
                    );
                    queue.fail_job_status(&job_id, &e.to_string()).await.ok();
                    if let Err(dlq_err) = queue.dlq(&message_id, &job, &e.to_string()).await {
                        error!("Failed to move job {} to DLQ: {}", job_id, dlq_err);
                    }
                    if let Err(e) = queue.clear_dedup(&job).await {
                        warn!("Failed to clear dedup key for job {}: {}", job_id, e);
                    }
                } else {
                    info!(
                        "Job {} will be retried (attempt {}/{})",
                        job_id, retry_count, max_retries
                    );
                }
            }
        }
    }

    /// Wait for all in-flight jobs to complete.
    async fn wait_for_jobs(&self) {
        loop {
            let available = self.job_semaphore.available_permits();
            if available == self.config.max_concurrent_jobs {
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }

    /// Signal shutdown.
    pub fn shutdown(&self) {
        let _ = self.shutdown.send(true);
    }

    /// Process a single job, returning a JSON summary for its status record.
    async fn process_job(ctx: &Arc<ExecutorContext>, job: QueueJob) -> WorkerResult<serde_json::Value> {
        match job {
            QueueJob::Render(j) => Self::process_render(ctx, j).await,
            QueueJob::DemoCapture(j) => Self::process_demo_capture(ctx, j).await,
        }
    }

    async fn process_render(ctx: &Arc<ExecutorContext>, job: RenderJob) -> WorkerResult<serde_json::Value> {
        let project = ctx.storage.load_project(&job.project_id).await?;
        let tts_pipeline = ctx.tts_pipeline();

        let (record, final_path) = match job.demo_run_id {
            None => {
                let source_path = PathBuf::from(&project.source.video.path);
                let correlation = Correlation {
                    render_mode: Some(RenderMode::TtsOnly.as_str().to_string()),
                    ..Default::default()
                };
                tts_pipeline
                    .render(&project, &source_path, RenderMode::TtsOnly, correlation)
                    .await?
            }
            Some(run_id) => {
                let demo_runner = DemoRunner::default();
                let unified = UnifiedPipeline::new(demo_runner, tts_pipeline);
                let execution_mode = project.settings.demo_capture_execution_mode;
                let dependency_status = probe_dependencies(execution_mode);
                let demo_output_dir = PathBuf::from(&ctx.config.demo_output_root).join(&job.project_id);
                tokio::fs::create_dir_all(&demo_output_dir).await.ok();

                let mut session = NullBrowserSession;
                let (demo_record, render_record, final_path) = unified
                    .run(
                        &project,
                        &mut session,
                        run_id,
                        &project.timeline.action_events,
                        execution_mode,
                        dependency_status,
                        &demo_output_dir,
                    )
                    .await?;

                ctx.storage.append_demo_run(&job.project_id, demo_record).await?;
                (render_record, final_path)
            }
        };

        ctx.storage.append_render_history(&job.project_id, record.clone()).await?;

        Ok(serde_json::json!({
            "render_id": record.render_id,
            "final_mp4_path": final_path.display().to_string(),
        }))
    }

    async fn process_demo_capture(ctx: &Arc<ExecutorContext>, job: DemoCaptureJob) -> WorkerResult<serde_json::Value> {
        let project = ctx.storage.load_project(&job.project_id).await?;
        let demo_runner = DemoRunner::default();
        let execution_mode = project.settings.demo_capture_execution_mode;
        let dependency_status = probe_dependencies(execution_mode);
        let demo_output_dir = PathBuf::from(&ctx.config.demo_output_root).join(&job.project_id);
        tokio::fs::create_dir_all(&demo_output_dir).await.ok();

        let correlation = Correlation::default();
        let mut session = NullBrowserSession;
        let record = demo_runner
            .run(
                &mut session,
                job.run_id.clone(),
                &project.timeline.action_events,
                execution_mode,
                dependency_status,
                correlation,
                &demo_output_dir,
            )
            .await?;

        let mode = record.mode;
        ctx.storage.append_demo_run(&job.project_id, record).await?;

        Ok(serde_json::json!({
            "run_id": job.run_id,
            "mode": mode.as_str(),
        }))
    }
}
