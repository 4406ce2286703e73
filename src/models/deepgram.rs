use serde::{Deserialize, Serialize};

/// Root response from the Deepgram pre-recorded API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeepgramResponse {
    #[serde(default)]
    pub metadata: Option<DeepgramMetadata>,
    pub results: DeepgramResults,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeepgramMetadata {
    /// Audio duration in seconds
    #[serde(default)]
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeepgramResults {
    #[serde(default)]
    pub channels: Vec<DeepgramChannel>,
    /// Present when the request was made with `utterances=true`
    #[serde(default)]
    pub utterances: Option<Vec<DeepgramUtterance>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeepgramChannel {
    #[serde(default)]
    pub alternatives: Vec<DeepgramAlternative>,
    #[serde(default)]
    pub detected_language: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeepgramAlternative {
    #[serde(default)]
    pub words: Vec<DeepgramWord>,
    #[serde(default)]
    pub transcript: Option<String>,
}

/// A single word from Deepgram
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeepgramWord {
    /// The recognized text
    pub word: String,
    /// Start timestamp in seconds
    pub start: f64,
    /// End timestamp in seconds
    pub end: f64,
    /// Punctuated and cased form (if smart formatting was enabled)
    #[serde(default)]
    pub punctuated_word: Option<String>,
}

impl DeepgramWord {
    /// Display text, preferring the punctuated form
    pub fn display_text(&self) -> &str {
        self.punctuated_word.as_deref().unwrap_or(&self.word)
    }
}

/// An utterance grouping from Deepgram
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeepgramUtterance {
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub transcript: String,
}

impl DeepgramResponse {
    /// Extract all words from the first channel's first alternative
    pub fn words(&self) -> &[DeepgramWord] {
        self.results
            .channels
            .first()
            .and_then(|c| c.alternatives.first())
            .map(|a| a.words.as_slice())
            .unwrap_or(&[])
    }

    pub fn utterances(&self) -> &[DeepgramUtterance] {
        self.results.utterances.as_deref().unwrap_or(&[])
    }

    pub fn detected_language(&self) -> Option<&str> {
        self.results
            .channels
            .first()
            .and_then(|c| c.detected_language.as_deref())
    }

    /// Reported audio duration, falling back to the last word's end
    pub fn duration(&self) -> f64 {
        self.metadata
            .as_ref()
            .and_then(|m| m.duration)
            .unwrap_or_else(|| self.words().last().map(|w| w.end).unwrap_or(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_deepgram_response() {
        let json = r#"{
            "metadata": {"duration": 3.5},
            "results": {
                "channels": [{
                    "detected_language": "ru",
                    "alternatives": [{
                        "words": [
                            {"word": "привет", "start": 0.5, "end": 0.8, "punctuated_word": "Привет,"},
                            {"word": "мир", "start": 0.9, "end": 1.2}
                        ]
                    }]
                }],
                "utterances": [
                    {"start": 0.5, "end": 1.2, "transcript": "Привет, мир"}
                ]
            }
        }"#;

        let response: DeepgramResponse = serde_json::from_str(json).unwrap();
        let words = response.words();

        assert_eq!(words.len(), 2);
        assert_eq!(words[0].display_text(), "Привет,");
        assert_eq!(words[1].display_text(), "мир");
        assert_eq!(response.utterances().len(), 1);
        assert_eq!(response.detected_language(), Some("ru"));
        assert_eq!(response.duration(), 3.5);
    }

    #[test]
    fn test_duration_falls_back_to_last_word() {
        let json = r#"{
            "results": {
                "channels": [{
                    "alternatives": [{
                        "words": [{"word": "hello", "start": 0.5, "end": 0.8}]
                    }]
                }]
            }
        }"#;

        let response: DeepgramResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.duration(), 0.8);
        assert!(response.utterances().is_empty());
    }
}
