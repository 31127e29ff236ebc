//! Post-synthesis audio processing: WAV duration introspection (so the
//! mixer knows where to `adelay`/`apad` each segment) and the final
//! loudness normalization pass on the mixed narration track.

use std::path::Path;

use vo_media::command::{FfmpegCommand, FfmpegRunner};
use vo_media::mux::loudness_filter_chain;

use crate::error::TtsResult;

/// Parse a canonical-form WAV file's duration in milliseconds straight
/// from its RIFF headers, without shelling out to `ffprobe` — every
/// provider in this system returns WAV, so this is cheaper than a probe
/// round trip per segment.
pub fn wav_duration_ms(bytes: &[u8]) -> Option<i64> {
    if bytes.len() < 44 || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return None;
    }

    let mut pos = 12;
    let mut sample_rate: Option<u32> = None;
    let mut block_align: Option<u16> = None;
    let mut data_size: Option<u32> = None;

    while pos + 8 <= bytes.len() {
        let chunk_id = &bytes[pos..pos + 4];
        let chunk_size = u32::from_le_bytes(bytes[pos + 4..pos + 8].try_into().ok()?);
        let body_start = pos + 8;

        if chunk_id == b"fmt " && body_start + 16 <= bytes.len() {
            sample_rate = Some(u32::from_le_bytes(bytes[body_start + 4..body_start + 8].try_into().ok()?));
            block_align = Some(u16::from_le_bytes(bytes[body_start + 12..body_start + 14].try_into().ok()?));
        } else if chunk_id == b"data" {
            data_size = Some(chunk_size);
        }

        pos = body_start + chunk_size as usize + (chunk_size % 2) as usize;
    }

    let sample_rate = sample_rate? as u64;
    let block_align = block_align? as u64;
    let data_size = data_size? as u64;
    if sample_rate == 0 || block_align == 0 {
        return None;
    }

    let total_frames = data_size / block_align;
    Some(((total_frames * 1000) / sample_rate) as i64)
}

/// Run the loudness normalization chain over the mixed narration track.
pub async fn normalize_loudness(input: &Path, output: &Path) -> TtsResult<()> {
    let cmd = FfmpegCommand::new(input, output)
        .output_arg("-af")
        .output_arg(loudness_filter_chain());
    FfmpegRunner::new().run(&cmd).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_wav(sample_rate: u32, frames: u32) -> Vec<u8> {
        let channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let block_align = channels * (bits_per_sample / 8);
        let byte_rate = sample_rate * block_align as u32;
        let data_size = frames * block_align as u32;

        let mut buf = Vec::new();
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + data_size).to_le_bytes());
        buf.extend_from_slice(b"WAVE");
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&channels.to_le_bytes());
        buf.extend_from_slice(&sample_rate.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());
        buf.extend(std::iter::repeat(0u8).take(data_size as usize));
        buf
    }

    #[test]
    fn parses_duration_from_minimal_wav() {
        let wav = minimal_wav(16_000, 16_000); // 1 second at 16kHz
        assert_eq!(wav_duration_ms(&wav), Some(1_000));
    }

    #[test]
    fn rejects_non_wav_bytes() {
        assert_eq!(wav_duration_ms(b"not a wav file"), None);
    }
}
