use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use segalign::{
    execute_chunking, execute_correction, execute_lemmatization, execute_render,
    execute_text_alignment, parse_transcript_file, read_text_file, segment_text, write_json,
    AnthropicClient, AnthropicConfig, ChunkConfig, CorrectionConfig, LemmaConfig,
    ManifestMetadata, RenderTargets, TextChunkConfig,
};

#[derive(Parser)]
#[command(name = "segalign")]
#[command(author, version, about = "Transcript segmentation and cross-system alignment", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a timed transcript into pause-aligned chunks
    Chunk {
        /// Input transcript file (native or Deepgram JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the chunk manifest (JSON)
        #[arg(short, long)]
        output: PathBuf,

        /// Output file for a human-readable chunk listing (text)
        #[arg(long)]
        human_readable: Option<PathBuf>,

        /// Directory for per-chunk transcript files
        #[arg(long)]
        chunk_dir: Option<PathBuf>,

        /// Correct punctuation and spelling before chunking
        #[arg(long)]
        correct: bool,

        /// Annotate words with lemmas
        #[arg(long)]
        lemmatize: bool,

        /// Target chunk duration in seconds
        #[arg(long, default_value = "180")]
        target_secs: f64,

        /// Minimum duration of the final chunk in seconds
        #[arg(long, default_value = "120")]
        min_final_secs: f64,

        /// Minimum gap between segments that counts as a pause, in seconds
        #[arg(long, default_value = "0.5")]
        pause_secs: f64,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Split prose into chunks for speech synthesis
    Text {
        /// Input text file
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the text chunks (JSON)
        #[arg(short, long)]
        output: PathBuf,

        /// Preferred chunk size in characters
        #[arg(long, default_value = "3500")]
        target_chars: usize,

        /// Minimum size of the final chunk in characters
        #[arg(long, default_value = "500")]
        min_chars: usize,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Recover word timings for written text
    AlignText {
        /// Original text file
        #[arg(short, long)]
        text: PathBuf,

        /// Re-transcription of the synthesized audio (native or Deepgram JSON)
        #[arg(short, long)]
        retranscript: Option<PathBuf>,

        /// Audio duration in seconds (defaults to the re-transcription's)
        #[arg(short, long)]
        duration: Option<f64>,

        /// Output file for the timed words (JSON)
        #[arg(short, long)]
        output: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Analyze a transcript and show its chunk plan without writing files
    Analyze {
        /// Input transcript file (native or Deepgram JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Chunk {
            input,
            output,
            human_readable,
            chunk_dir,
            correct,
            lemmatize,
            target_secs,
            min_final_secs,
            pause_secs,
            verbose,
        } => {
            setup_logging(verbose);
            let config = ChunkConfig {
                target_duration: target_secs,
                min_final_duration: min_final_secs,
                pause_threshold: pause_secs,
                ..Default::default()
            };
            let options = ChunkOptions {
                output,
                human_readable,
                chunk_dir,
                correct,
                lemmatize,
            };
            chunk_transcript(input, options, config).await
        }
        Commands::Text {
            input,
            output,
            target_chars,
            min_chars,
            verbose,
        } => {
            setup_logging(verbose);
            let config = TextChunkConfig {
                target_chars,
                min_chars,
                ..Default::default()
            };
            chunk_text(input, output, config)
        }
        Commands::AlignText {
            text,
            retranscript,
            duration,
            output,
            verbose,
        } => {
            setup_logging(verbose);
            align_text(text, retranscript, duration, output)
        }
        Commands::Analyze { input, verbose } => {
            setup_logging(verbose);
            analyze_transcript(input)
        }
    }
}

fn setup_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

struct ChunkOptions {
    output: PathBuf,
    human_readable: Option<PathBuf>,
    chunk_dir: Option<PathBuf>,
    correct: bool,
    lemmatize: bool,
}

async fn chunk_transcript(
    input: PathBuf,
    options: ChunkOptions,
    config: ChunkConfig,
) -> Result<()> {
    info!("Loading transcript from {:?}", input);
    let mut transcript =
        parse_transcript_file(&input).context("Failed to parse input transcript")?;

    info!(
        "Loaded {} words, {} segments, {:.1}s",
        transcript.words.len(),
        transcript.segments.len(),
        transcript.duration
    );

    let client = if options.correct || options.lemmatize {
        Some(AnthropicClient::new(AnthropicConfig::from_env()?))
    } else {
        None
    };

    // Stage 1: Correction
    let mut corrected_words = 0;
    if let (true, Some(client)) = (options.correct, &client) {
        info!("Stage 1: Correcting transcript...");
        let result =
            execute_correction(client, &mut transcript, &CorrectionConfig::default()).await?;
        info!(
            "Stage 1: {} batches, {} failed, {} words changed",
            result.batches_processed, result.batches_failed, result.words_changed
        );
        corrected_words = result.words_changed;
    }

    // Stage 3 runs before extraction so chunk transcripts carry lemmas
    if let (true, Some(client)) = (options.lemmatize, &client) {
        info!("Stage 3: Lemmatizing transcript...");
        let result =
            execute_lemmatization(client, &mut transcript, &LemmaConfig::default()).await?;
        info!(
            "Stage 3: {} distinct words, {} batches failed",
            result.distinct_words, result.batches_failed
        );
    }

    // Stage 2: Chunking
    info!("Stage 2: Chunking transcript...");
    let chunking = execute_chunking(&transcript, &config);

    // Stage 4: Rendering
    info!("Stage 4: Rendering output...");
    let metadata = ManifestMetadata::from_transcript(
        &transcript,
        chunking.chunks.len(),
        corrected_words,
        Utc::now(),
    );
    let targets = RenderTargets {
        manifest: Some(&options.output),
        chunk_dir: options.chunk_dir.as_deref(),
        human: options.human_readable.as_deref(),
    };
    let result = execute_render(&chunking, metadata, &targets)?;

    info!("Output written to {:?}", result.manifest_path);
    if !result.chunk_paths.is_empty() {
        info!("{} chunk transcripts written", result.chunk_paths.len());
    }
    if let Some(human_path) = result.human_path {
        info!("Human-readable output written to {:?}", human_path);
    }

    info!(
        "Complete: {} chunks, {:.1}s total",
        chunking.chunks.len(),
        chunking.total_duration()
    );

    Ok(())
}

fn chunk_text(input: PathBuf, output: PathBuf, config: TextChunkConfig) -> Result<()> {
    info!("Loading text from {:?}", input);
    let text = read_text_file(&input)?;

    let chunks = segment_text(&text, &config);
    let longest = chunks.iter().map(|c| c.char_count()).max().unwrap_or(0);
    info!(
        "Split {} characters into {} chunks (longest {})",
        text.chars().count(),
        chunks.len(),
        longest
    );

    write_json(&chunks, &output)?;
    info!("Output written to {:?}", output);
    Ok(())
}

fn align_text(
    text_path: PathBuf,
    retranscript_path: Option<PathBuf>,
    duration: Option<f64>,
    output: PathBuf,
) -> Result<()> {
    let text = read_text_file(&text_path)?;
    let retranscript = retranscript_path
        .as_deref()
        .map(parse_transcript_file)
        .transpose()
        .context("Failed to parse re-transcription")?;

    let result = execute_text_alignment(&text, retranscript.as_ref(), duration)?;
    info!(
        "{} words: {} matched, {} interpolated ({:?})",
        result.words.len(),
        result.matched,
        result.interpolated,
        result.source
    );

    write_json(&result, &output)?;
    info!("Output written to {:?}", output);
    Ok(())
}

fn analyze_transcript(input: PathBuf) -> Result<()> {
    info!("Analyzing transcript from {:?}", input);
    let transcript =
        parse_transcript_file(&input).context("Failed to parse input transcript")?;

    println!("Transcript Analysis");
    println!("==================");
    let language = if transcript.language_code.is_empty() {
        "unknown"
    } else {
        transcript.language_code.as_str()
    };
    println!("Language: {}", language);
    println!("Total words: {}", transcript.words.len());
    println!("Total segments: {}", transcript.segments.len());
    println!("Lemmatized words: {}", transcript.lemmatized_count());
    println!("Duration: {:.1}s", transcript.duration);
    println!();

    // Pause statistics
    let config = ChunkConfig::default();
    let pauses = transcript
        .segments
        .windows(2)
        .filter(|pair| pair[1].start - pair[0].end >= config.pause_threshold)
        .count();
    println!(
        "Pauses >= {:.1}s between segments: {}",
        config.pause_threshold, pauses
    );
    println!();

    let chunking = execute_chunking(&transcript, &config);

    println!("Chunk Plan");
    println!("----------");
    for chunk in &chunking.chunks {
        println!(
            "{}: {:.1}s - {:.1}s ({:.1}s, {} words)",
            chunk.id, chunk.start, chunk.end, chunk.duration, chunk.word_count
        );
    }

    Ok(())
}
