pub mod chunking;
pub mod error;
pub mod io;
pub mod llm;
pub mod models;
pub mod reconcile;
pub mod stages;
pub mod text;

pub use chunking::{extract_chunk_transcript, segment_text, segment_transcript};
pub use error::{ServiceError, ServiceResult};
pub use io::{
    parse_transcript_file, parse_transcript_json, read_text_file, write_json, ChunkManifest,
    HumanChunkListing, ManifestMetadata,
};
pub use llm::{AnthropicClient, AnthropicConfig, Lemmatizer, TextCorrector};
pub use models::{
    Chunk, ChunkConfig, ChunkStatus, Segment, TextChunk, TextChunkConfig, TimedToken, Transcript,
    WordTimestamp,
};
pub use reconcile::{
    align, align_to_retranscription, apply_corrections, interpolate, Alignment, MatchPolicy,
};
pub use stages::{
    execute_chunking, execute_correction, execute_lemmatization, execute_render,
    execute_text_alignment, ChunkingResult, CorrectionConfig, LemmaConfig, RenderTargets,
};
