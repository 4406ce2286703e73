use serde::{Deserialize, Serialize};

/// Configuration for temporal chunking
#[derive(Debug, Clone)]
pub struct ChunkConfig {
    /// Accumulated span in seconds at which a chunk may be closed
    pub target_duration: f64,
    /// A trailing chunk shorter than this is merged into its predecessor
    pub min_final_duration: f64,
    /// Minimum inter-segment gap in seconds that counts as a natural pause
    pub pause_threshold: f64,
    /// Maximum preview length in characters
    pub preview_chars: usize,
    /// Number of words used for the preview when there are no segments
    pub preview_words: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            target_duration: 180.0,    // 3 minutes
            min_final_duration: 120.0, // 2 minutes
            pause_threshold: 0.5,
            preview_chars: 100,
            preview_words: 15,
        }
    }
}

/// A bounded, playable window of a transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// `chunk-{index}`
    pub id: String,
    /// Position in the chunk sequence
    pub index: usize,
    /// Start timestamp in seconds
    pub start: f64,
    /// End timestamp in seconds
    pub end: f64,
    /// Always `end - start`
    pub duration: f64,
    pub preview_text: String,
    pub word_count: usize,
}

/// Configuration for prose chunking
#[derive(Debug, Clone)]
pub struct TextChunkConfig {
    /// Preferred ceiling for a chunk, in characters
    pub target_chars: usize,
    /// A trailing chunk below this is merged into the previous one
    pub min_chars: usize,
    /// Chunks are always strictly shorter than this
    pub hard_limit_chars: usize,
    /// Pieces shorter than this are treated as decorative separators
    pub separator_chars: usize,
    /// Maximum preview length in characters
    pub preview_chars: usize,
}

impl Default for TextChunkConfig {
    fn default() -> Self {
        Self {
            target_chars: 3500,
            min_chars: 500,
            hard_limit_chars: 4096,
            separator_chars: 50,
            preview_chars: 100,
        }
    }
}

/// Processing state of a text chunk in the synthesis pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkStatus {
    /// Waiting for synthesis
    #[default]
    Pending,
    /// Audio is being generated
    Synthesizing,
    /// Audio and timestamps are available
    Ready,
    /// Synthesis or alignment failed
    Failed,
}

/// A bounded piece of prose
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextChunk {
    /// `chunk-{index}`
    pub id: String,
    /// Position in the chunk sequence
    pub index: usize,
    pub text: String,
    pub preview_text: String,
    pub word_count: usize,
    #[serde(default)]
    pub status: ChunkStatus,
}

impl TextChunk {
    /// Length of the chunk text in characters
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}
