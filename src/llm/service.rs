use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::ServiceResult;

/// External service that fixes punctuation and spelling of transcribed text
#[async_trait]
pub trait TextCorrector: Send + Sync {
    /// Return the corrected text; words should stay in the same order
    async fn correct(&self, text: &str, language: &str) -> ServiceResult<String>;
}

/// External service that maps surface words to dictionary lemmas
#[async_trait]
pub trait Lemmatizer: Send + Sync {
    /// Map each requested word (lowercase base form) to its lemma
    async fn lemmatize(
        &self,
        words: &[String],
        language: &str,
    ) -> ServiceResult<HashMap<String, String>>;
}
