//! Audio mixing (`filter_complex`) and subtitle muxing.

use std::path::Path;

use crate::command::FfmpegCommand;

/// One synthesized narration clip placed at an absolute offset on the
/// output timeline.
#[derive(Debug, Clone)]
pub struct AudioSegment {
    /// Input file index as passed to ffmpeg (`-i` occurrence order).
    pub input_index: usize,
    pub start_ms: i64,
    pub duration_ms: i64,
}

/// Assemble a complete `ffmpeg` argument list that mixes down every
/// segment's own file (supplied in `segment_paths`, one `-i` per path, in
/// order) into `output`. `segment_paths[i]` corresponds to
/// `AudioSegment { input_index: i, .. }` in the `segments` passed to
/// [`build_audio_mix_filter_complex`].
pub fn build_mixdown_args(
    segment_paths: &[&Path],
    segments: &[AudioSegment],
    total_duration_ms: i64,
    output: &Path,
) -> Vec<String> {
    let mut args = vec!["-y".to_string(), "-v".to_string(), "error".to_string()];
    for path in segment_paths {
        args.push("-i".to_string());
        args.push(path.to_string_lossy().to_string());
    }
    args.push("-filter_complex".to_string());
    args.push(build_audio_mix_filter_complex(segments, total_duration_ms));
    args.push("-map".to_string());
    args.push("[mixed]".to_string());
    args.push(output.to_string_lossy().to_string());
    args
}

/// Build the `-filter_complex` graph that places each segment at its
/// absolute offset and mixes them down to one stream labeled `[mixed]`:
/// `atrim` clips each input to its own duration, `asetpts` resets PTS to
/// zero, `adelay` shifts it to `start_ms`, `apad` keeps every branch alive
/// for the full mix duration, and `amix` sums them with
/// `dropout_transition=0` so a short clip doesn't fade the others out early.
pub fn build_audio_mix_filter_complex(segments: &[AudioSegment], total_duration_ms: i64) -> String {
    let mut branches = Vec::with_capacity(segments.len());
    let mut labels = Vec::with_capacity(segments.len());

    for (i, seg) in segments.iter().enumerate() {
        let label = format!("seg{i}");
        branches.push(format!(
            "[{}:a]atrim=0:{:.3},asetpts=PTS-STARTPTS,adelay={}|{},apad=whole_dur={:.3}[{label}]",
            seg.input_index,
            seg.duration_ms as f64 / 1000.0,
            seg.start_ms,
            seg.start_ms,
            total_duration_ms as f64 / 1000.0,
        ));
        labels.push(format!("[{label}]"));
    }

    let mix = format!(
        "{}amix=inputs={}:duration=longest:dropout_transition=0[mixed]",
        labels.join(""),
        segments.len().max(1),
    );

    branches.push(mix);
    branches.join(";")
}

/// The loudness post-processing chain applied to the mixed narration
/// track before it is muxed with video: trims leading/trailing silence,
/// normalizes to broadcast loudness (EBU R128, `I=-16 LUFS, TP=-1.5 dBTP,
/// LRA=11`), then limits any remaining peaks.
pub fn loudness_filter_chain() -> String {
    "silenceremove=start_periods=1:start_threshold=-50dB:start_silence=0.1,\
     loudnorm=I=-16:TP=-1.5:LRA=11,\
     alimiter=limit=0.95"
        .replace(' ', "")
}

/// Mux `video_in` with the mixed narration track as its audio stream and
/// `srt_in` as a `mov_text` subtitle track, producing `output`.
///
/// `FfmpegCommand` places its declared `input_arg`/`-i` pairs before the
/// single input it was constructed with, so the resulting input order is
/// `[0]=audio, [1]=srt, [2]=video`.
pub fn mux_command(video_in: impl AsRef<Path>, audio_in: impl AsRef<Path>, srt_in: impl AsRef<Path>, output: impl AsRef<Path>) -> FfmpegCommand {
    FfmpegCommand::new(video_in, output)
        .input_arg("-i")
        .input_arg(audio_in.as_ref().to_string_lossy().to_string())
        .input_arg("-i")
        .input_arg(srt_in.as_ref().to_string_lossy().to_string())
        .output_arg("-map")
        .output_arg("2:v:0")
        .output_arg("-map")
        .output_arg("0:a:0")
        .output_arg("-map")
        .output_arg("1:s:0")
        .video_codec("copy")
        .audio_codec("aac")
        .output_arg("-c:s")
        .output_arg("mov_text")
        .output_arg("-movflags")
        .output_arg("+faststart")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_complex_places_each_segment_and_mixes() {
        let segments = vec![
            AudioSegment { input_index: 1, start_ms: 0, duration_ms: 1_000 },
            AudioSegment { input_index: 2, start_ms: 2_000, duration_ms: 1_500 },
        ];
        let graph = build_audio_mix_filter_complex(&segments, 5_000);
        assert!(graph.contains("[1:a]atrim=0:1.000"));
        assert!(graph.contains("adelay=2000|2000"));
        assert!(graph.contains("amix=inputs=2:duration=longest:dropout_transition=0[mixed]"));
    }

    #[test]
    fn loudness_chain_has_target_lufs() {
        let chain = loudness_filter_chain();
        assert!(chain.contains("loudnorm=I=-16:TP=-1.5:LRA=11"));
    }
}
