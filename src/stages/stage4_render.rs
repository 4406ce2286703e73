use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::info;

use crate::io::{write_chunk_transcripts, ChunkManifest, HumanChunkListing, ManifestMetadata};
use crate::stages::ChunkingResult;

/// Where Stage 4 writes its outputs
#[derive(Debug, Clone, Default)]
pub struct RenderTargets<'a> {
    /// Chunk manifest JSON
    pub manifest: Option<&'a Path>,
    /// Directory for per-chunk transcript files
    pub chunk_dir: Option<&'a Path>,
    /// Human-readable chunk listing
    pub human: Option<&'a Path>,
}

/// Result of Stage 4 rendering
#[derive(Debug, Default)]
pub struct RenderResult {
    pub manifest_path: Option<PathBuf>,
    pub chunk_paths: Vec<PathBuf>,
    pub human_path: Option<PathBuf>,
}

/// Execute Stage 4: Rendering
///
/// Produces up to three outputs:
/// 1. Chunk manifest: JSON with processing metadata and chunk bounds
/// 2. Per-chunk transcripts: one rebased JSON file per chunk
/// 3. Human listing: chunk bounds and previews as text
pub fn execute_render(
    chunking: &ChunkingResult,
    metadata: ManifestMetadata,
    targets: &RenderTargets<'_>,
) -> Result<RenderResult> {
    let mut result = RenderResult::default();

    if let Some(path) = targets.manifest {
        info!("Writing chunk manifest to {:?}", path);
        ChunkManifest::new(metadata, chunking.chunks.clone()).write_json(path)?;
        result.manifest_path = Some(path.to_path_buf());
    }

    if let Some(dir) = targets.chunk_dir {
        info!("Writing {} chunk transcripts to {:?}", chunking.chunks.len(), dir);
        result.chunk_paths =
            write_chunk_transcripts(dir, &chunking.chunks, &chunking.chunk_transcripts)?;
    }

    if let Some(path) = targets.human {
        info!("Writing chunk listing to {:?}", path);
        HumanChunkListing::new(&chunking.chunks).write_file(path)?;
        result.human_path = Some(path.to_path_buf());
    }

    Ok(result)
}
