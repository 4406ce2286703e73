use tracing::debug;

use crate::models::{Chunk, ChunkConfig, Segment, Transcript, WordTimestamp};
use crate::text::truncate_chars;

/// A chunk under construction; ids are assigned once the sequence is final
#[derive(Debug)]
struct PendingChunk {
    start: f64,
    end: f64,
    preview_text: String,
    word_count: usize,
}

/// Segments accumulated into the chunk currently being built
#[derive(Debug, Default)]
struct Accumulator<'a> {
    start: Option<f64>,
    texts: Vec<&'a str>,
    word_count: usize,
}

impl<'a> Accumulator<'a> {
    fn push(&mut self, segment: &'a Segment, words: &[WordTimestamp]) -> f64 {
        let start = *self.start.get_or_insert(segment.start);
        if self.texts.len() < 2 {
            self.texts.push(&segment.text);
        }
        self.word_count += count_contained_words(words, segment);
        start
    }

    fn finish(self, end: f64, preview_chars: usize) -> PendingChunk {
        let joined = self.texts.join(" ");
        let mut preview_text = truncate_chars(&joined, preview_chars).to_string();
        if joined.chars().count() >= preview_chars {
            preview_text.push_str("...");
        }

        PendingChunk {
            start: self.start.unwrap_or(0.0),
            end,
            preview_text,
            word_count: self.word_count,
        }
    }
}

/// Split a transcript into pause-aligned chunks of roughly `target_duration`
///
/// A chunk closes once it spans at least the target and the next segment
/// starts after a natural pause (or there is no next segment). A trailing
/// remainder shorter than `min_final_duration` is folded into the previous
/// chunk. Transcripts without segments, or shorter than the target, yield a
/// single chunk covering the whole duration.
pub fn segment_transcript(transcript: &Transcript, config: &ChunkConfig) -> Vec<Chunk> {
    let duration = transcript.duration;
    let segments = &transcript.segments;

    if segments.is_empty() || duration < config.target_duration {
        let preview_text = match segments.first() {
            Some(first) => truncate_chars(&first.text, config.preview_chars).to_string(),
            None => transcript
                .words
                .iter()
                .take(config.preview_words)
                .map(|w| w.text.as_str())
                .collect::<Vec<_>>()
                .join(" "),
        };

        return assign_ids(vec![PendingChunk {
            start: 0.0,
            end: duration,
            preview_text,
            word_count: transcript.words.len(),
        }]);
    }

    let mut pending: Vec<PendingChunk> = Vec::new();
    let mut current = Accumulator::default();

    for (idx, segment) in segments.iter().enumerate() {
        let chunk_start = current.push(segment, &transcript.words);

        if segment.end - chunk_start < config.target_duration {
            continue;
        }

        let at_pause = segments
            .get(idx + 1)
            .is_none_or(|next| next.start - segment.end >= config.pause_threshold);

        if at_pause {
            let finished = std::mem::take(&mut current);
            pending.push(finished.finish(segment.end, config.preview_chars));
        }
    }

    if let (Some(start), Some(last)) = (current.start, segments.last()) {
        let trailing_duration = last.end - start;
        match pending.last_mut() {
            Some(previous) if trailing_duration < config.min_final_duration => {
                debug!(
                    "Merging {:.1}s trailing chunk into previous chunk",
                    trailing_duration
                );
                previous.end = last.end;
                previous.word_count += current.word_count;
            }
            _ => pending.push(current.finish(last.end, config.preview_chars)),
        }
    }

    debug!(
        "Segmented {} segments ({:.1}s) into {} chunks",
        segments.len(),
        duration,
        pending.len()
    );

    assign_ids(pending)
}

/// Number of words lying entirely inside the segment
///
/// Words must be ascending by start.
fn count_contained_words(words: &[WordTimestamp], segment: &Segment) -> usize {
    let first = words.partition_point(|w| w.start < segment.start);
    words[first..]
        .iter()
        .take_while(|w| w.start <= segment.end)
        .filter(|w| w.end <= segment.end)
        .count()
}

fn assign_ids(pending: Vec<PendingChunk>) -> Vec<Chunk> {
    pending
        .into_iter()
        .enumerate()
        .map(|(index, p)| Chunk {
            id: format!("chunk-{}", index),
            index,
            start: p.start,
            end: p.end,
            duration: p.end - p.start,
            preview_text: p.preview_text,
            word_count: p.word_count,
        })
        .collect()
}
