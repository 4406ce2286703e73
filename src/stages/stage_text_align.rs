use anyhow::{bail, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::models::{Transcript, WordTimestamp};
use crate::reconcile::{align_to_retranscription, estimate_by_length, interpolate};
use crate::text::tokenize;

/// How word timings were obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingSource {
    /// Aligned against a re-transcription of the synthesized audio
    Retranscription,
    /// Estimated from word lengths alone
    LengthEstimate,
}

/// Word timings for a piece of written text
#[derive(Debug, Clone, Serialize)]
pub struct TextAlignmentResult {
    pub source: TimingSource,
    pub duration: f64,
    /// Words that borrowed a timing from the re-transcription
    pub matched: usize,
    /// Words whose timing was interpolated or estimated
    pub interpolated: usize,
    pub words: Vec<WordTimestamp>,
}

/// Time the words of written text against its synthesized audio
///
/// With a re-transcription, written tokens are aligned to the transcribed
/// words and unmatched tokens are interpolated. Without one, timings are
/// estimated from token lengths. `duration` defaults to the
/// re-transcription's duration and is required when there is none.
pub fn execute_text_alignment(
    text: &str,
    retranscript: Option<&Transcript>,
    duration: Option<f64>,
) -> Result<TextAlignmentResult> {
    let tokens = tokenize(text);

    let Some(transcript) = retranscript else {
        let Some(duration) = duration else {
            bail!("Audio duration is required when no re-transcription is given");
        };
        warn!("No re-transcription; estimating timings from word lengths");
        return Ok(TextAlignmentResult {
            source: TimingSource::LengthEstimate,
            duration,
            matched: 0,
            interpolated: tokens.len(),
            words: estimate_by_length(&tokens, duration),
        });
    };

    let duration = duration.unwrap_or(transcript.duration);
    let timed = align_to_retranscription(&tokens, &transcript.words);
    let matched = timed.iter().filter(|t| t.is_known()).count();

    info!(
        "Aligned {} of {} words against {} transcribed words",
        matched,
        tokens.len(),
        transcript.words.len()
    );

    Ok(TextAlignmentResult {
        source: TimingSource::Retranscription,
        duration,
        matched,
        interpolated: tokens.len() - matched,
        words: interpolate(&timed, duration),
    })
}
