use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{Chunk, Transcript};

/// Chunk manifest written for downstream players
#[derive(Debug, Clone, Serialize)]
pub struct ChunkManifest {
    pub metadata: ManifestMetadata,
    pub chunks: Vec<Chunk>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ManifestMetadata {
    pub language_code: String,
    pub duration: f64,
    pub total_words: usize,
    pub total_segments: usize,
    pub total_chunks: usize,
    pub lemmatized_words: usize,
    pub corrected_words: usize,
    pub generated_at: DateTime<Utc>,
}

impl ManifestMetadata {
    pub fn from_transcript(
        transcript: &Transcript,
        total_chunks: usize,
        corrected_words: usize,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            language_code: transcript.language_code.clone(),
            duration: transcript.duration,
            total_words: transcript.words.len(),
            total_segments: transcript.segments.len(),
            total_chunks,
            lemmatized_words: transcript.lemmatized_count(),
            corrected_words,
            generated_at,
        }
    }
}

impl ChunkManifest {
    pub fn new(metadata: ManifestMetadata, chunks: Vec<Chunk>) -> Self {
        Self { metadata, chunks }
    }

    /// Write to a JSON file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        write_json(self, path)
    }
}

/// Serialize any value as pretty JSON to a file
pub fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    serde_json::to_writer_pretty(file, value).context("Failed to write JSON")?;
    Ok(())
}

/// Write each chunk's transcript to `<dir>/<chunk id>.json`
///
/// Returns the written paths in chunk order.
pub fn write_chunk_transcripts(
    dir: &Path,
    chunks: &[Chunk],
    transcripts: &[Transcript],
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {:?}", dir))?;

    chunks
        .iter()
        .zip(transcripts)
        .map(|(chunk, transcript)| {
            let path = dir.join(format!("{}.json", chunk.id));
            write_json(transcript, &path)?;
            Ok(path)
        })
        .collect()
}

/// Human-readable chunk listing
pub struct HumanChunkListing<'a> {
    chunks: &'a [Chunk],
}

impl<'a> HumanChunkListing<'a> {
    pub fn new(chunks: &'a [Chunk]) -> Self {
        Self { chunks }
    }

    /// Format the chunk list as human-readable text
    pub fn format(&self) -> String {
        let mut output = String::new();

        for chunk in self.chunks {
            output.push_str(&format!(
                "[{} - {}] {} ({} words, {:.1}s):\n",
                format_timestamp(chunk.start),
                format_timestamp(chunk.end),
                chunk.id,
                chunk.word_count,
                chunk.duration
            ));
            output.push_str(&wrap_text(&chunk.preview_text, 80));
            output.push_str("\n\n");
        }

        output
    }

    /// Write to a text file
    pub fn write_file(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        write!(file, "{}", self.format())?;
        Ok(())
    }
}

/// Format seconds as MM:SS.mmm
pub fn format_timestamp(seconds: f64) -> String {
    let ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let secs = ms / 1000;
    format!("{:02}:{:02}.{:03}", secs / 60, secs % 60, ms % 1000)
}

/// Wrap text at approximately the given width
fn wrap_text(text: &str, width: usize) -> String {
    let mut result = String::new();
    let mut line_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if line_len + word_len + 1 > width && line_len > 0 {
            result.push('\n');
            line_len = 0;
        }
        if line_len > 0 {
            result.push(' ');
            line_len += 1;
        }
        result.push_str(word);
        line_len += word_len;
    }

    result
}
