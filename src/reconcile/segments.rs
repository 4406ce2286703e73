use crate::models::{Segment, WordTimestamp};

/// Rebuild segment texts from reconciled words
///
/// Each segment keeps its bounds and takes the text of the words contained in
/// it; a segment that contains no words keeps its original text. Words must be
/// ascending by start.
pub fn rebuild_segments(segments: &[Segment], words: &[WordTimestamp]) -> Vec<Segment> {
    segments
        .iter()
        .map(|segment| {
            let first = words.partition_point(|w| w.start < segment.start);
            let text = words[first..]
                .iter()
                .take_while(|w| w.start <= segment.end)
                .filter(|w| w.is_within(segment.start, segment.end))
                .map(|w| w.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");

            Segment {
                text: if text.is_empty() {
                    segment.text.clone()
                } else {
                    text
                },
                ..segment.clone()
            }
        })
        .collect()
}
