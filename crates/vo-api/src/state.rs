//! Application state.

use std::sync::Arc;

use vo_queue::JobQueue;
use vo_storage::ProjectStore;
use vo_tts::AudioCache;

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub storage: Arc<ProjectStore>,
    pub queue: Arc<JobQueue>,
    pub tts_cache: Arc<AudioCache>,
    pub http_client: reqwest::Client,
}

impl AppState {
    /// Create new application state.
    pub async fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let storage = ProjectStore::new(&config.projects_root);
        let queue = JobQueue::from_env()?;
        queue.init().await?;

        let tts_cache = AudioCache::new(&config.tts_cache_root);
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()?;

        Ok(Self {
            config,
            storage: Arc::new(storage),
            queue: Arc::new(queue),
            tts_cache: Arc::new(tts_cache),
            http_client,
        })
    }
}
