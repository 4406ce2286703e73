use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One word → lemma pair as returned by the lemmatization tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LemmaEntry {
    pub word: String,
    pub lemma: String,
}

/// Structured output of the `submit_lemmas` tool
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LemmaSubmission {
    #[serde(default)]
    pub lemmas: Vec<LemmaEntry>,
}

impl LemmaSubmission {
    /// Collapse into a lookup table; later duplicates win
    pub fn into_map(self) -> HashMap<String, String> {
        self.lemmas
            .into_iter()
            .map(|entry| (entry.word, entry.lemma))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.lemmas.is_empty()
    }
}
