use tracing::{debug, info};

use crate::chunking::{extract_chunk_transcript, segment_transcript};
use crate::models::{Chunk, ChunkConfig, Transcript};

/// Result of Stage 2 chunking
#[derive(Debug, Clone)]
pub struct ChunkingResult {
    pub chunks: Vec<Chunk>,
    /// Rebased sub-transcript for each chunk, in chunk order
    pub chunk_transcripts: Vec<Transcript>,
}

impl ChunkingResult {
    pub fn total_duration(&self) -> f64 {
        self.chunks.iter().map(|c| c.duration).sum()
    }
}

/// Execute Stage 2: temporal chunking
///
/// Splits the transcript into pause-aligned chunks and extracts a rebased
/// sub-transcript for each one.
pub fn execute_chunking(transcript: &Transcript, config: &ChunkConfig) -> ChunkingResult {
    let chunks = segment_transcript(transcript, config);

    let chunk_transcripts: Vec<Transcript> = chunks
        .iter()
        .map(|chunk| {
            let sub = extract_chunk_transcript(transcript, chunk.start, chunk.end);
            debug!(
                "{}: {:.1}s - {:.1}s, {} words extracted",
                chunk.id,
                chunk.start,
                chunk.end,
                sub.words.len()
            );
            sub
        })
        .collect();

    info!(
        "Stage 2: {} chunks from {:.1}s of audio",
        chunks.len(),
        transcript.duration
    );

    ChunkingResult {
        chunks,
        chunk_transcripts,
    }
}
