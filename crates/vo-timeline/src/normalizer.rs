//! Narration-event normalization: ordering, duration inference, and id
//! de-duplication, applied uniformly regardless of which importer produced
//! the raw events.

use std::collections::HashMap;

use vo_models::NarrationEvent;

/// Minimum duration assigned to a narration event whose end could not be
/// inferred from a following event (e.g. the last cue in a script).
const DEFAULT_TAIL_DURATION_MS: i64 = 2_000;

/// Sort narration events by start time (source order breaks ties), infer
/// missing/invalid `end_ms` from the next event's `start_ms`, and rewrite any
/// duplicate ids as `{id}_2`, `{id}_3`, ... in the order they appear.
///
/// This is applied to every import path so a hand-authored SRT, a
/// timestamped-text script, and a raw JSON payload all end up with the same
/// invariants: non-decreasing `start_ms`, `end_ms > start_ms`, unique `id`.
pub fn normalize_narration_events(mut events: Vec<NarrationEvent>) -> Vec<NarrationEvent> {
    let mut indexed: Vec<(usize, NarrationEvent)> =
        events.drain(..).enumerate().collect();
    indexed.sort_by(|(ia, a), (ib, b)| a.start_ms.cmp(&b.start_ms).then(ia.cmp(ib)));

    let mut out: Vec<NarrationEvent> = indexed.into_iter().map(|(_, e)| e).collect();

    for i in 0..out.len() {
        let needs_inference = out[i].end_ms <= out[i].start_ms;
        if !needs_inference {
            continue;
        }
        let inferred_end = if i + 1 < out.len() {
            out[i + 1].start_ms.max(out[i].start_ms + 1)
        } else {
            out[i].start_ms + DEFAULT_TAIL_DURATION_MS
        };
        out[i].end_ms = inferred_end;
    }

    dedup_ids(&mut out);
    out
}

fn dedup_ids(events: &mut [NarrationEvent]) {
    let mut seen: HashMap<String, usize> = HashMap::new();
    for event in events.iter_mut() {
        let count = seen.entry(event.id.clone()).or_insert(0);
        *count += 1;
        if *count > 1 {
            event.id = format!("{}_{}", event.id, count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str, start_ms: i64, end_ms: i64) -> NarrationEvent {
        NarrationEvent {
            id: id.to_string(),
            start_ms,
            end_ms,
            text: "hello".to_string(),
            voice_profile_id: None,
            meta: Default::default(),
        }
    }

    #[test]
    fn sorts_by_start_then_source_order() {
        let events = vec![event("b", 2_000, 3_000), event("a", 1_000, 1_500)];
        let out = normalize_narration_events(events);
        assert_eq!(out[0].id, "a");
        assert_eq!(out[1].id, "b");
    }

    #[test]
    fn infers_end_from_next_start() {
        let events = vec![event("a", 1_000, 0), event("b", 4_000, 5_000)];
        let out = normalize_narration_events(events);
        assert_eq!(out[0].end_ms, 4_000);
    }

    #[test]
    fn infers_tail_duration_for_last_event() {
        let events = vec![event("a", 1_000, 0)];
        let out = normalize_narration_events(events);
        assert_eq!(out[0].end_ms, 1_000 + DEFAULT_TAIL_DURATION_MS);
    }

    #[test]
    fn dedups_colliding_ids_with_suffix() {
        let events = vec![event("x", 0, 500), event("x", 600, 900), event("x", 1_000, 1_200)];
        let out = normalize_narration_events(events);
        let ids: Vec<&str> = out.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["x", "x_2", "x_3"]);
    }
}
