//! Content-addressed cache for synthesized narration audio: the same
//! text, params, endpoint, voice mode, and voice identity always resolve
//! to the same cache key, so re-rendering a project that only changed one
//! line re-synthesizes just that line.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};
use vo_models::{TTSParams, VoiceMode};

use crate::error::TtsResult;

/// The exact fields that determine whether two synthesis requests would
/// produce the same audio. Built from a `BTreeMap` so key ordering (and
/// therefore the serialized bytes hashed) is deterministic regardless of
/// `HashMap` iteration order in the caller's params.
#[derive(Serialize)]
struct CacheKeyInput<'a> {
    text: &'a str,
    params: BTreeMap<&'a str, &'a serde_json::Value>,
    endpoint: &'a str,
    voice_mode: VoiceMode,
    voice_identity: &'a str,
    model_signature: &'a str,
}

/// Compute the cache key for one narration line rendered with one profile.
///
/// `voice_identity` is the profile's `predefined_voice_id` for
/// `PredefinedVoice` mode, or the sha256 of the reference audio file for
/// `ReferenceAudio` mode — the caller resolves this since it may require a
/// file read.
pub fn cache_key(
    text: &str,
    params: &TTSParams,
    endpoint: &str,
    voice_mode: VoiceMode,
    voice_identity: &str,
    model_signature: &str,
) -> String {
    let sorted_params: BTreeMap<&str, &serde_json::Value> =
        params.iter().map(|(k, v)| (k.as_str(), v)).collect();

    let input = CacheKeyInput {
        text,
        params: sorted_params,
        endpoint,
        voice_mode,
        voice_identity,
        model_signature,
    };

    let canonical = serde_json::to_vec(&input).expect("cache key input always serializes");
    let digest = Sha256::digest(&canonical);
    hex::encode(digest)
}

/// sha256 of a file's bytes, used to fold reference-audio identity into
/// the cache key.
pub async fn sha256_file(path: &Path) -> TtsResult<String> {
    let bytes = tokio::fs::read(path).await?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

#[derive(Debug, Clone)]
pub struct AudioCache {
    root: PathBuf,
}

impl AudioCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.wav"))
    }

    /// Return the cached file path if present.
    pub async fn get(&self, key: &str) -> Option<PathBuf> {
        let path = self.path_for(key);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            Some(path)
        } else {
            None
        }
    }

    /// Store freshly synthesized audio under `key`, returning its path.
    pub async fn put(&self, key: &str, audio: &[u8]) -> TtsResult<PathBuf> {
        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.path_for(key);
        tokio::fs::write(&path, audio).await?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_key_is_deterministic_regardless_of_param_insertion_order() {
        let mut p1 = TTSParams::new();
        p1.insert("a".to_string(), serde_json::json!(1));
        p1.insert("b".to_string(), serde_json::json!(2));

        let mut p2 = TTSParams::new();
        p2.insert("b".to_string(), serde_json::json!(2));
        p2.insert("a".to_string(), serde_json::json!(1));

        let k1 = cache_key("hello", &p1, "ep", VoiceMode::PredefinedVoice, "alloy", "chatterbox");
        let k2 = cache_key("hello", &p2, "ep", VoiceMode::PredefinedVoice, "alloy", "chatterbox");
        assert_eq!(k1, k2);
    }

    #[test]
    fn cache_key_changes_with_text() {
        let params = TTSParams::new();
        let k1 = cache_key("hello", &params, "ep", VoiceMode::PredefinedVoice, "alloy", "chatterbox");
        let k2 = cache_key("goodbye", &params, "ep", VoiceMode::PredefinedVoice, "alloy", "chatterbox");
        assert_ne!(k1, k2);
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let cache = AudioCache::new(dir.path());
        assert!(cache.get("missing").await.is_none());
        cache.put("k1", b"RIFF....").await.unwrap();
        assert!(cache.get("k1").await.is_some());
    }
}
