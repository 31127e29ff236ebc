//! TTS Render Pipeline: narration events in, a captioned, voiced MP4 out.
//! "tts_only" mode narrates over the existing source video; [`crate::unified`]
//! layers a fresh demo capture underneath first.

use std::path::{Path, PathBuf};
use std::time::Instant;

use vo_media::command::FfmpegRunner;
use vo_media::mux::{build_mixdown_args, mux_command, AudioSegment};
use vo_media::srt::render_srt;
use vo_models::{Correlation, Project, RenderMode, RenderRecord, RenderStatus, StageTimings, VoiceMode};

use crate::cache::{cache_key, sha256_file, AudioCache};
use crate::client::TtsClient;
use crate::error::TtsResult;
use crate::postprocess::{normalize_loudness, wav_duration_ms};
use crate::profiles::resolve_profile;

pub struct TtsOnlyPipeline {
    client: TtsClient,
    cache: AudioCache,
    work_dir: PathBuf,
}

impl TtsOnlyPipeline {
    pub fn new(client: TtsClient, cache: AudioCache, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            cache,
            work_dir: work_dir.into(),
        }
    }

    /// Render `project`'s timeline over `source_video_path` (the project's
    /// own source video for tts-only mode, or a fresh demo capture for
    /// unified mode). Returns the render record and the final MP4 path.
    pub async fn render(&self, project: &Project, source_video_path: &Path, mode: RenderMode, correlation: Correlation) -> TtsResult<(RenderRecord, PathBuf)> {
        let render_id = format!("render_{}", uuid::Uuid::new_v4());
        std::fs::create_dir_all(&self.work_dir).ok();

        let tts_start = Instant::now();
        let (segments, segment_paths, cache_hits, generated_segments) =
            self.synthesize_segments(project).await?;
        let tts_ms = tts_start.elapsed().as_millis() as i64;

        let mix_start = Instant::now();
        let total_duration_ms = segments
            .iter()
            .map(|s| s.start_ms + s.duration_ms)
            .max()
            .unwrap_or(0)
            .max(project.source.video.duration_ms);

        let mixed_path = self.work_dir.join(format!("{render_id}_mixed.wav"));
        if !segments.is_empty() {
            let paths_ref: Vec<&Path> = segment_paths.iter().map(|p| p.as_path()).collect();
            let args = build_mixdown_args(&paths_ref, &segments, total_duration_ms, &mixed_path);
            FfmpegRunner::new().run_args(&args).await?;
        }

        let normalized_path = self.work_dir.join(format!("{render_id}_normalized.wav"));
        if segments.is_empty() {
            tokio::fs::copy(&mixed_path, &normalized_path).await.ok();
        } else {
            normalize_loudness(&mixed_path, &normalized_path).await?;
        }

        let srt_path = self.work_dir.join(format!("{render_id}.srt"));
        tokio::fs::write(&srt_path, render_srt(&project.timeline.narration_events)).await?;

        let final_path = self.work_dir.join(format!("{render_id}.mp4"));
        let mux_cmd = mux_command(source_video_path, &normalized_path, &srt_path, &final_path);
        FfmpegRunner::new().run(&mux_cmd).await?;
        let mix_mux_ms = mix_start.elapsed().as_millis() as i64;

        let record = RenderRecord {
            render_id,
            created_at: chrono::Utc::now().to_rfc3339(),
            status: RenderStatus::Completed,
            mode,
            segments: segments.len(),
            cache_hits,
            generated_segments,
            final_mp4_path: Some(final_path.display().to_string()),
            source_video_path: source_video_path.display().to_string(),
            stage_timings_ms: StageTimings {
                tts_ms,
                mix_mux_ms,
                total_ms: tts_ms + mix_mux_ms,
            },
            error: None,
            correlation,
        };

        Ok((record, final_path))
    }

    async fn synthesize_segments(&self, project: &Project) -> TtsResult<(Vec<AudioSegment>, Vec<PathBuf>, usize, usize)> {
        let mut segments = Vec::new();
        let mut paths = Vec::new();
        let mut cache_hits = 0usize;
        let mut generated = 0usize;

        for (i, event) in project.timeline.narration_events.iter().enumerate() {
            let profile = resolve_profile(project, event.voice_profile_id.as_deref())?;
            let endpoint = profile.endpoint.clone().unwrap_or_default();

            let voice_identity = match profile.voice_mode {
                VoiceMode::PredefinedVoice => profile.predefined_voice_id.clone().unwrap_or_default(),
                VoiceMode::ReferenceAudio => match &profile.audio_prompt_path {
                    Some(path) => sha256_file(Path::new(path)).await?,
                    None => String::new(),
                },
            };

            let key = cache_key(&event.text, &profile.params, &endpoint, profile.voice_mode, &voice_identity, &profile.provider);

            let path = match self.cache.get(&key).await {
                Some(path) => {
                    cache_hits += 1;
                    path
                }
                None => {
                    let audio = self.client.synthesize(profile, &event.text, &profile.params).await?;
                    generated += 1;
                    self.cache.put(&key, &audio).await?
                }
            };

            let bytes = tokio::fs::read(&path).await?;
            let duration_ms = wav_duration_ms(&bytes).unwrap_or(event.end_ms - event.start_ms);

            segments.push(AudioSegment {
                input_index: i,
                start_ms: event.start_ms,
                duration_ms,
            });
            paths.push(path);
        }

        Ok((segments, paths, cache_hits, generated))
    }
}
