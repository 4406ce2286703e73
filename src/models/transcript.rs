use serde::{Deserialize, Serialize};

/// A single recognized word with its timing in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordTimestamp {
    /// Surface text as displayed
    pub text: String,
    /// Start timestamp in seconds
    pub start: f64,
    /// End timestamp in seconds
    pub end: f64,
    /// Dictionary form, filled in by lemma annotation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lemma: Option<String>,
}

impl WordTimestamp {
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            lemma: None,
        }
    }

    /// Whether the word lies entirely inside `[start, end]`
    pub fn is_within(&self, start: f64, end: f64) -> bool {
        self.start >= start && self.end <= end
    }

    /// Whether the word overlaps the half-open range `(start, end)`
    pub fn overlaps(&self, start: f64, end: f64) -> bool {
        self.end > start && self.start < end
    }
}

impl AsRef<str> for WordTimestamp {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// A coarser utterance grouping as reported by the transcription service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    /// Start timestamp in seconds
    pub start: f64,
    /// End timestamp in seconds
    pub end: f64,
}

impl Segment {
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }

    pub fn overlaps(&self, start: f64, end: f64) -> bool {
        self.end > start && self.start < end
    }
}

/// Word- and segment-level transcript of one audio window
///
/// Missing `words` or `segments` deserialize as empty sequences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    #[serde(default)]
    pub words: Vec<WordTimestamp>,
    #[serde(default)]
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub language_code: String,
    /// Total duration in seconds
    #[serde(default)]
    pub duration: f64,
}

impl Transcript {
    pub fn new(
        words: Vec<WordTimestamp>,
        segments: Vec<Segment>,
        language_code: impl Into<String>,
        duration: f64,
    ) -> Self {
        Self {
            words,
            segments,
            language_code: language_code.into(),
            duration,
        }
    }

    /// Latest end time of any word or segment, or 0 when there are none
    pub fn latest_end(&self) -> f64 {
        self.words
            .iter()
            .map(|w| w.end)
            .chain(self.segments.iter().map(|s| s.end))
            .fold(0.0, f64::max)
    }

    /// Number of words carrying a lemma
    pub fn lemmatized_count(&self) -> usize {
        self.words.iter().filter(|w| w.lemma.is_some()).count()
    }
}

/// A token whose timing may still be unknown
///
/// `timing == None` is the sentinel consumed by
/// [`crate::reconcile::interpolate`].
#[derive(Debug, Clone, PartialEq)]
pub struct TimedToken {
    pub text: String,
    pub timing: Option<(f64, f64)>,
}

impl TimedToken {
    pub fn known(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            timing: Some((start, end)),
        }
    }

    pub fn unknown(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            timing: None,
        }
    }

    pub fn is_known(&self) -> bool {
        self.timing.is_some()
    }
}
