use std::collections::{HashMap, HashSet};

use crate::text::base_form;

/// Configuration for checking service replies
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Maximum change in token count, as a percentage of the batch size
    pub max_token_drift_percent: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_token_drift_percent: 50.0,
        }
    }
}

/// Outcome of validating a corrected batch
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionValidation {
    pub is_valid: bool,
    /// Token count change as a percentage of the original batch
    pub drift_percent: f64,
    pub errors: Vec<String>,
}

/// Validate a corrected batch before it is reconciled
///
/// A reply that is empty, or whose token count drifts too far from the
/// original, is most likely a refusal or a paraphrase and is rejected.
pub fn validate_correction(
    original_count: usize,
    corrected: &[String],
    config: &ValidationConfig,
) -> CorrectionValidation {
    let mut errors = Vec::new();

    if original_count > 0 && corrected.is_empty() {
        errors.push("Correction is empty".to_string());
    }

    let drift_percent = if original_count > 0 {
        original_count.abs_diff(corrected.len()) as f64 / original_count as f64 * 100.0
    } else if corrected.is_empty() {
        0.0
    } else {
        100.0
    };

    if drift_percent > config.max_token_drift_percent {
        errors.push(format!(
            "Token drift too high: {} -> {} tokens ({:.1}% > {:.1}%)",
            original_count,
            corrected.len(),
            drift_percent,
            config.max_token_drift_percent
        ));
    }

    CorrectionValidation {
        is_valid: errors.is_empty(),
        drift_percent,
        errors,
    }
}

/// Keep only usable entries of a lemma map
///
/// Keys are normalized to base forms and must be among the requested words;
/// blank lemmas are dropped and the rest trimmed. When several keys share a
/// base form, a key already in base form wins, then the smallest key.
pub fn sanitize_lemmas(
    requested: &[String],
    lemmas: HashMap<String, String>,
) -> HashMap<String, String> {
    let requested: HashSet<&str> = requested.iter().map(String::as_str).collect();

    let mut entries: Vec<(String, String, String)> = lemmas
        .into_iter()
        .filter_map(|(word, lemma)| {
            let key = base_form(&word);
            let lemma = lemma.trim();
            if lemma.is_empty() || !requested.contains(key.as_str()) {
                return None;
            }
            Some((key, word, lemma.to_string()))
        })
        .collect();
    entries.sort_by(|(key_a, word_a, _), (key_b, word_b, _)| {
        (word_a != key_a)
            .cmp(&(word_b != key_b))
            .then_with(|| word_a.cmp(word_b))
    });

    let mut clean = HashMap::new();
    for (key, _, lemma) in entries {
        clean.entry(key).or_insert(lemma);
    }
    clean
}
