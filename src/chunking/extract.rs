use crate::models::{Segment, Transcript, WordTimestamp};

/// Slice a transcript to `[range_start, range_end)` and rebase it to zero
///
/// Words and segments are kept when they overlap the range at all, so an item
/// straddling a chunk boundary shows up in both neighbouring chunks. Rebased
/// times are clamped at zero. The result's duration is exactly the range
/// length, whatever was included.
pub fn extract_chunk_transcript(
    transcript: &Transcript,
    range_start: f64,
    range_end: f64,
) -> Transcript {
    let rebase = |t: f64| (t - range_start).max(0.0);

    let words = transcript
        .words
        .iter()
        .filter(|w| w.overlaps(range_start, range_end))
        .map(|w| WordTimestamp {
            start: rebase(w.start),
            end: rebase(w.end),
            ..w.clone()
        })
        .collect();

    let segments = transcript
        .segments
        .iter()
        .filter(|s| s.overlaps(range_start, range_end))
        .map(|s| Segment {
            start: rebase(s.start),
            end: rebase(s.end),
            ..s.clone()
        })
        .collect();

    Transcript {
        words,
        segments,
        language_code: transcript.language_code.clone(),
        duration: range_end - range_start,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boundary_transcript() -> Transcript {
        Transcript::new(
            vec![
                WordTimestamp::new("early", 2.0, 3.0),
                WordTimestamp::new("straddle", 9.0, 11.0),
                WordTimestamp::new("late", 15.0, 16.0),
            ],
            vec![
                Segment::new("early straddle", 2.0, 11.0),
                Segment::new("late", 15.0, 16.0),
            ],
            "en",
            20.0,
        )
    }

    #[test]
    fn test_boundary_word_appears_in_both_ranges() {
        let transcript = boundary_transcript();

        let first = extract_chunk_transcript(&transcript, 0.0, 10.0);
        let second = extract_chunk_transcript(&transcript, 10.0, 20.0);

        let first_texts: Vec<&str> = first.words.iter().map(|w| w.text.as_str()).collect();
        let second_texts: Vec<&str> = second.words.iter().map(|w| w.text.as_str()).collect();

        assert_eq!(first_texts, vec!["early", "straddle"]);
        assert_eq!(second_texts, vec!["straddle", "late"]);
    }

    #[test]
    fn test_rebasing_clamps_at_zero() {
        let transcript = boundary_transcript();
        let second = extract_chunk_transcript(&transcript, 10.0, 20.0);

        assert_eq!(second.words[0].start, 0.0);
        assert_eq!(second.words[0].end, 1.0);
        assert_eq!(second.words[1].start, 5.0);
        assert_eq!(second.segments[0].start, 0.0);
        assert_eq!(second.segments[0].end, 1.0);
    }

    #[test]
    fn test_duration_is_range_length() {
        let transcript = boundary_transcript();
        let empty = extract_chunk_transcript(&transcript, 17.0, 19.5);

        assert!(empty.words.is_empty());
        assert!(empty.segments.is_empty());
        assert_eq!(empty.duration, 2.5);
        assert_eq!(empty.language_code, "en");
    }

    #[test]
    fn test_touching_items_are_excluded() {
        let transcript = Transcript::new(
            vec![WordTimestamp::new("edge", 5.0, 10.0)],
            vec![],
            "en",
            20.0,
        );

        assert!(extract_chunk_transcript(&transcript, 10.0, 20.0).words.is_empty());
        assert!(extract_chunk_transcript(&transcript, 0.0, 5.0).words.is_empty());
    }

    #[test]
    fn test_lemmas_are_preserved() {
        let mut word = WordTimestamp::new("ran", 1.0, 2.0);
        word.lemma = Some("run".to_string());
        let transcript = Transcript::new(vec![word], vec![], "en", 5.0);

        let extracted = extract_chunk_transcript(&transcript, 0.5, 5.0);
        assert_eq!(extracted.words[0].lemma.as_deref(), Some("run"));
        assert_eq!(extracted.words[0].start, 0.5);
    }
}
