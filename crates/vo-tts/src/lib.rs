//! TTS profile resolution, content-addressed render caching, synthesis
//! clients, and the two render pipelines (tts-only and unified).

pub mod cache;
pub mod client;
pub mod error;
pub mod pipeline;
pub mod pool;
pub mod postprocess;
pub mod profiles;
pub mod unified;

pub use cache::{cache_key, sha256_file, AudioCache};
pub use client::TtsClient;
pub use error::{TtsError, TtsResult};
pub use pipeline::TtsOnlyPipeline;
pub use pool::BoundedPool;
pub use postprocess::{normalize_loudness, wav_duration_ms};
pub use profiles::{merge_params, resolve_profile, upsert_profile};
pub use unified::UnifiedPipeline;
