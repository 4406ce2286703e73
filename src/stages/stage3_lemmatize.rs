use std::collections::HashMap;

use anyhow::Result;
use tracing::{info, warn};

use crate::llm::{sanitize_lemmas, Lemmatizer};
use crate::models::Transcript;
use crate::reconcile::{annotate_lemmas, distinct_base_forms};

/// Configuration for Stage 3
#[derive(Debug, Clone)]
pub struct LemmaConfig {
    /// Distinct words sent to the lemmatizer per request
    pub batch_size: usize,
}

impl Default for LemmaConfig {
    fn default() -> Self {
        Self { batch_size: 300 }
    }
}

/// Result of Stage 3 processing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LemmaResult {
    pub distinct_words: usize,
    pub batches_processed: usize,
    pub batches_failed: usize,
    /// Number of words that received a lemma
    pub words_annotated: usize,
}

/// Execute Stage 3: lemma annotation
///
/// Each distinct base form is sent once. Replies are sanitized against the
/// requested batch and merged into one table, which is then applied to every
/// word. A failed batch leaves its words without lemmas.
pub async fn execute_lemmatization<L>(
    lemmatizer: &L,
    transcript: &mut Transcript,
    config: &LemmaConfig,
) -> Result<LemmaResult>
where
    L: Lemmatizer + ?Sized,
{
    let distinct = distinct_base_forms(&transcript.words);
    let batch_size = config.batch_size.max(1);
    let mut lemmas: HashMap<String, String> = HashMap::with_capacity(distinct.len());
    let mut batches_processed = 0;
    let mut batches_failed = 0;

    info!(
        "Stage 3: Lemmatizing {} distinct words in batches of {}",
        distinct.len(),
        batch_size
    );

    for (index, batch) in distinct.chunks(batch_size).enumerate() {
        batches_processed += 1;
        match lemmatizer.lemmatize(batch, &transcript.language_code).await {
            Ok(reply) => {
                let clean = sanitize_lemmas(batch, reply);
                if clean.len() < batch.len() {
                    warn!(
                        "Batch {}: {} of {} words returned without a lemma",
                        index,
                        batch.len() - clean.len(),
                        batch.len()
                    );
                }
                lemmas.extend(clean);
            }
            Err(e) => {
                warn!("Batch {} left unlemmatized: {}", index, e);
                batches_failed += 1;
            }
        }
    }

    let words_annotated = annotate_lemmas(&mut transcript.words, &lemmas);

    info!(
        "Stage 3: {} of {} words annotated",
        words_annotated,
        transcript.words.len()
    );

    Ok(LemmaResult {
        distinct_words: distinct.len(),
        batches_processed,
        batches_failed,
        words_annotated,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::{ServiceError, ServiceResult};
    use crate::models::WordTimestamp;

    /// Lemmatizer backed by a fixed dictionary; fails on batches containing `fail_on`
    struct FakeLemmatizer {
        dictionary: HashMap<String, String>,
        fail_on: Option<String>,
        requests: Mutex<Vec<Vec<String>>>,
    }

    impl FakeLemmatizer {
        fn new(pairs: &[(&str, &str)]) -> Self {
            Self {
                dictionary: pairs
                    .iter()
                    .map(|(w, l)| (w.to_string(), l.to_string()))
                    .collect(),
                fail_on: None,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Lemmatizer for FakeLemmatizer {
        async fn lemmatize(
            &self,
            words: &[String],
            _language: &str,
        ) -> ServiceResult<HashMap<String, String>> {
            self.requests.lock().unwrap().push(words.to_vec());
            if let Some(bad) = &self.fail_on {
                if words.contains(bad) {
                    return Err(ServiceError::MalformedResponse("no tool use".to_string()));
                }
            }
            let mut reply: HashMap<String, String> = words
                .iter()
                .filter_map(|w| self.dictionary.get(w).map(|l| (w.clone(), l.clone())))
                .collect();
            reply.insert("unrequested".to_string(), "x".to_string());
            Ok(reply)
        }
    }

    fn transcript(texts: &[&str]) -> Transcript {
        let words = texts
            .iter()
            .enumerate()
            .map(|(i, t)| WordTimestamp::new(*t, i as f64, i as f64 + 0.5))
            .collect();
        Transcript::new(words, vec![], "en", texts.len() as f64)
    }

    #[tokio::test]
    async fn test_lemmas_are_annotated_by_base_form() {
        let lemmatizer = FakeLemmatizer::new(&[("cats", "cat"), ("ran", "run")]);
        let mut transcript = transcript(&["Cats", "ran,", "cats.", "away"]);

        let result = execute_lemmatization(&lemmatizer, &mut transcript, &LemmaConfig::default())
            .await
            .unwrap();

        assert_eq!(result.distinct_words, 3);
        assert_eq!(result.batches_processed, 1);
        assert_eq!(result.words_annotated, 3);
        assert_eq!(transcript.words[0].lemma.as_deref(), Some("cat"));
        assert_eq!(transcript.words[1].lemma.as_deref(), Some("run"));
        assert_eq!(transcript.words[2].lemma.as_deref(), Some("cat"));
        assert_eq!(transcript.words[3].lemma, None);
        assert_eq!(transcript.words[1].text, "ran,");
    }

    #[tokio::test]
    async fn test_each_distinct_word_is_requested_once() {
        let lemmatizer = FakeLemmatizer::new(&[]);
        let mut transcript = transcript(&["a", "b", "A", "c", "b", "d", "e"]);
        let config = LemmaConfig { batch_size: 2 };

        let result = execute_lemmatization(&lemmatizer, &mut transcript, &config)
            .await
            .unwrap();

        let requests = lemmatizer.requests.lock().unwrap();
        assert_eq!(result.batches_processed, 3);
        assert_eq!(requests[0], vec!["a", "b"]);
        assert_eq!(requests[1], vec!["c", "d"]);
        assert_eq!(requests[2], vec!["e"]);
    }

    #[tokio::test]
    async fn test_failed_batch_does_not_abort() {
        let mut lemmatizer = FakeLemmatizer::new(&[("dogs", "dog"), ("mice", "mouse")]);
        lemmatizer.fail_on = Some("dogs".to_string());
        let mut transcript = transcript(&["dogs", "mice"]);
        let config = LemmaConfig { batch_size: 1 };

        let result = execute_lemmatization(&lemmatizer, &mut transcript, &config)
            .await
            .unwrap();

        assert_eq!(result.batches_failed, 1);
        assert_eq!(result.words_annotated, 1);
        assert_eq!(transcript.words[0].lemma, None);
        assert_eq!(transcript.words[1].lemma.as_deref(), Some("mouse"));
    }
}
