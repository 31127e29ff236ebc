#![deny(unreachable_patterns)]
//! FFmpeg CLI wrapper for video processing.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building
//! - Video/audio probing via ffprobe
//! - The filter graphs and mux/mix commands the render pipeline shells out to
//! - SRT subtitle rendering

pub mod command;
pub mod error;
pub mod filters;
pub mod fs_utils;
pub mod mux;
pub mod probe;
pub mod progress;
pub mod srt;

pub use command::{FfmpegCommand, FfmpegRunner};
pub use error::{MediaError, MediaResult};
pub use progress::{FfmpegProgress, ProgressCallback};
pub use mux::{
    build_audio_mix_filter_complex, build_mixdown_args, loudness_filter_chain, mux_command,
    AudioSegment,
};
pub use probe::{probe_video, VideoInfo};
pub use srt::render_srt;
