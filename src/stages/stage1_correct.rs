use anyhow::Result;
use tracing::{info, warn};

use crate::error::{ServiceError, ServiceResult};
use crate::llm::{validate_correction, TextCorrector, ValidationConfig};
use crate::models::{Transcript, WordTimestamp};
use crate::reconcile::{rebuild_segments, reconcile_batches};
use crate::text::tokenize;

/// Configuration for Stage 1
#[derive(Debug, Clone)]
pub struct CorrectionConfig {
    /// Words sent to the corrector per request
    pub batch_size: usize,
    /// Validation of corrected batches
    pub validation: ValidationConfig,
    /// Maximum retries per batch on failure or rejection
    pub max_retries: u32,
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self {
            batch_size: 500,
            validation: ValidationConfig::default(),
            max_retries: 1,
        }
    }
}

/// Result of Stage 1 processing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionResult {
    /// Number of batches sent to the corrector
    pub batches_processed: usize,
    /// Number of batches left uncorrected
    pub batches_failed: usize,
    /// Number of words whose text changed
    pub words_changed: usize,
}

/// Execute Stage 1: punctuation and spelling correction
///
/// Words are sent in fixed-size batches. Each reply is tokenized, validated,
/// and reconciled against the batch so every word keeps its timestamp and
/// lemma. A batch whose correction fails or is rejected keeps its original
/// words. Segment texts are rebuilt from the corrected words.
pub async fn execute_correction<C>(
    corrector: &C,
    transcript: &mut Transcript,
    config: &CorrectionConfig,
) -> Result<CorrectionResult>
where
    C: TextCorrector + ?Sized,
{
    let batch_size = config.batch_size.max(1);
    let language = transcript.language_code.clone();
    let mut corrections: Vec<Option<Vec<String>>> = Vec::new();
    let mut batches_failed = 0;

    info!(
        "Stage 1: Correcting {} words in batches of {}",
        transcript.words.len(),
        batch_size
    );

    for (index, batch) in transcript.words.chunks(batch_size).enumerate() {
        match correct_batch(corrector, batch, &language, config).await {
            Ok(tokens) => corrections.push(Some(tokens)),
            Err(e) => {
                warn!("Batch {} left uncorrected: {}", index, e);
                batches_failed += 1;
                corrections.push(None);
            }
        }
    }

    let corrected = reconcile_batches(&transcript.words, &corrections, batch_size);
    let words_changed = corrected
        .iter()
        .zip(&transcript.words)
        .filter(|(new, old)| new.text != old.text)
        .count();

    transcript.segments = rebuild_segments(&transcript.segments, &corrected);
    transcript.words = corrected;

    Ok(CorrectionResult {
        batches_processed: corrections.len(),
        batches_failed,
        words_changed,
    })
}

/// Correct a single batch, retrying on failure or rejection
async fn correct_batch<C>(
    corrector: &C,
    batch: &[WordTimestamp],
    language: &str,
    config: &CorrectionConfig,
) -> ServiceResult<Vec<String>>
where
    C: TextCorrector + ?Sized,
{
    let text = batch
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let mut last_error = None;

    for attempt in 0..=config.max_retries {
        if attempt > 0 {
            info!("Retry {} of {}", attempt, config.max_retries);
        }

        match corrector.correct(&text, language).await {
            Ok(reply) => {
                let tokens = tokenize(&reply);
                let validation = validate_correction(batch.len(), &tokens, &config.validation);

                if validation.is_valid {
                    return Ok(tokens);
                }
                warn!("Correction rejected: {:?}", validation.errors);
                last_error = Some(ServiceError::Rejected(validation.errors.join("; ")));
            }
            Err(e) => {
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| ServiceError::Rejected("No attempts made".to_string())))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::models::Segment;

    enum Behavior {
        /// Capitalize the first word and end the batch with a period
        Punctuate,
        Fail,
        Refuse,
    }

    struct FakeCorrector {
        behavior: Behavior,
        calls: AtomicUsize,
    }

    impl FakeCorrector {
        fn new(behavior: Behavior) -> Self {
            Self {
                behavior,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TextCorrector for FakeCorrector {
        async fn correct(&self, text: &str, _language: &str) -> ServiceResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.behavior {
                Behavior::Punctuate => {
                    let mut chars = text.chars();
                    let first = chars.next().map(|c| c.to_uppercase().to_string()).unwrap_or_default();
                    Ok(format!("{}{}.", first, chars.as_str()))
                }
                Behavior::Fail => Err(ServiceError::Api {
                    status: 500,
                    body: "boom".to_string(),
                }),
                Behavior::Refuse => Ok("Sorry, I can't.".to_string()),
            }
        }
    }

    fn sample_transcript() -> Transcript {
        let words = ["hello", "world", "how", "are", "you"]
            .iter()
            .enumerate()
            .map(|(i, w)| WordTimestamp::new(*w, i as f64, i as f64 + 0.5))
            .collect();
        let segments = vec![
            Segment::new("hello world", 0.0, 1.5),
            Segment::new("how are you", 2.0, 4.5),
        ];
        Transcript::new(words, segments, "en", 5.0)
    }

    #[tokio::test]
    async fn test_correction_keeps_timestamps() {
        let corrector = FakeCorrector::new(Behavior::Punctuate);
        let mut transcript = sample_transcript();

        let result = execute_correction(&corrector, &mut transcript, &CorrectionConfig::default())
            .await
            .unwrap();

        assert_eq!(result.batches_processed, 1);
        assert_eq!(result.batches_failed, 0);
        assert_eq!(result.words_changed, 2);
        assert_eq!(transcript.words[0].text, "Hello");
        assert_eq!(transcript.words[4].text, "you.");
        assert_eq!(transcript.words[4].start, 4.0);
        assert_eq!(transcript.segments[0].text, "Hello world");
        assert_eq!(transcript.segments[1].text, "how are you.");
    }

    #[tokio::test]
    async fn test_failed_service_keeps_original_words() {
        let corrector = FakeCorrector::new(Behavior::Fail);
        let mut transcript = sample_transcript();
        let original = transcript.clone();

        let result = execute_correction(&corrector, &mut transcript, &CorrectionConfig::default())
            .await
            .unwrap();

        assert_eq!(result.batches_failed, 1);
        assert_eq!(result.words_changed, 0);
        assert_eq!(transcript, original);
        assert_eq!(corrector.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_refusal_is_rejected() {
        let corrector = FakeCorrector::new(Behavior::Refuse);
        let mut transcript = sample_transcript();
        let config = CorrectionConfig {
            batch_size: 10,
            max_retries: 0,
            validation: ValidationConfig {
                max_token_drift_percent: 20.0,
            },
        };

        let result = execute_correction(&corrector, &mut transcript, &config)
            .await
            .unwrap();

        assert_eq!(result.batches_failed, 1);
        assert_eq!(transcript.words[0].text, "hello");
        assert_eq!(corrector.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_batches_are_corrected_independently() {
        let corrector = FakeCorrector::new(Behavior::Punctuate);
        let mut transcript = sample_transcript();
        let config = CorrectionConfig {
            batch_size: 2,
            ..Default::default()
        };

        let result = execute_correction(&corrector, &mut transcript, &config)
            .await
            .unwrap();

        assert_eq!(result.batches_processed, 3);
        let texts: Vec<&str> = transcript.words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, vec!["Hello", "world.", "How", "are.", "You."]);
    }

    #[tokio::test]
    async fn test_empty_transcript() {
        let corrector = FakeCorrector::new(Behavior::Punctuate);
        let mut transcript = Transcript::default();

        let result = execute_correction(&corrector, &mut transcript, &CorrectionConfig::default())
            .await
            .unwrap();

        assert_eq!(result.batches_processed, 0);
        assert_eq!(corrector.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_correction_config_default() {
        let config = CorrectionConfig::default();
        assert_eq!(config.batch_size, 500);
        assert_eq!(config.max_retries, 1);
    }
}
