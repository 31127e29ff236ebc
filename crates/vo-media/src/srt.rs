//! SRT subtitle generation from narration events, and `mov_text` muxing of
//! the resulting subtitle track into the final MP4.

use vo_models::NarrationEvent;

/// Render `HH:MM:SS,mmm` from a millisecond offset.
fn format_srt_timestamp(ms: i64) -> String {
    let ms = ms.max(0);
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;
    format!("{hours:02}:{minutes:02}:{seconds:02},{millis:03}")
}

/// Render a sequence of narration events as an SRT document, numbering
/// cues from 1 in timeline order.
pub fn render_srt(events: &[NarrationEvent]) -> String {
    let mut out = String::new();
    for (i, event) in events.iter().enumerate() {
        out.push_str(&format!("{}\n", i + 1));
        out.push_str(&format!(
            "{} --> {}\n",
            format_srt_timestamp(event.start_ms),
            format_srt_timestamp(event.end_ms)
        ));
        out.push_str(event.text.trim());
        out.push_str("\n\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str, start_ms: i64, end_ms: i64, text: &str) -> NarrationEvent {
        NarrationEvent {
            id: id.to_string(),
            start_ms,
            end_ms,
            text: text.to_string(),
            voice_profile_id: None,
            meta: Default::default(),
        }
    }

    #[test]
    fn formats_timestamps_with_comma_millis() {
        assert_eq!(format_srt_timestamp(3_723_045), "01:02:03,045");
        assert_eq!(format_srt_timestamp(0), "00:00:00,000");
    }

    #[test]
    fn renders_numbered_cues() {
        let events = vec![
            event("a", 0, 1_000, "Hello"),
            event("b", 1_500, 3_000, "World"),
        ];
        let srt = render_srt(&events);
        assert!(srt.starts_with("1\n00:00:00,000 --> 00:00:01,000\nHello\n\n2\n"));
        assert!(srt.contains("World"));
    }
}
