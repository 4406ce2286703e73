use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::models::{DeepgramResponse, Segment, Transcript, WordTimestamp};

/// Read a transcript file in either native or Deepgram format
pub fn parse_transcript_file(path: &Path) -> Result<Transcript> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    parse_transcript_json(&content).with_context(|| format!("Failed to parse transcript: {:?}", path))
}

/// Parse transcript JSON, detecting the Deepgram layout by its `results` key
pub fn parse_transcript_json(json: &str) -> Result<Transcript> {
    let value: serde_json::Value = serde_json::from_str(json).context("Invalid JSON")?;

    if value.get("results").is_some() {
        debug!("Detected Deepgram response layout");
        let response: DeepgramResponse =
            serde_json::from_value(value).context("Failed to parse Deepgram JSON")?;
        return Ok(transcript_from_deepgram(&response));
    }

    let has_duration = value.get("duration").is_some_and(|d| !d.is_null());
    let mut transcript: Transcript =
        serde_json::from_value(value).context("Failed to parse transcript JSON")?;
    if !has_duration {
        transcript.duration = transcript.latest_end();
        debug!("No duration given; using latest end {:.2}s", transcript.duration);
    }

    Ok(transcript)
}

/// Convert a Deepgram response into a Transcript
///
/// Utterances become segments. Without utterances the segment list stays
/// empty and chunking falls back to a word preview.
fn transcript_from_deepgram(response: &DeepgramResponse) -> Transcript {
    let words: Vec<WordTimestamp> = response
        .words()
        .iter()
        .map(|w| WordTimestamp::new(w.display_text(), w.start, w.end))
        .collect();

    let mut segments: Vec<Segment> = response
        .utterances()
        .iter()
        .map(|u| Segment::new(u.transcript.trim(), u.start, u.end))
        .collect();
    segments.sort_by(|a, b| a.start.total_cmp(&b.start));

    Transcript::new(
        words,
        segments,
        response.detected_language().unwrap_or_default(),
        response.duration(),
    )
}

/// Read a plain text file
pub fn read_text_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::segment_transcript;
    use crate::models::ChunkConfig;

    #[test]
    fn test_parse_deepgram_with_utterances() {
        let json = r#"{
            "metadata": {"duration": 3.0},
            "results": {
                "channels": [{
                    "detected_language": "en",
                    "alternatives": [{
                        "words": [
                            {"word": "hello", "start": 0.5, "end": 0.8, "confidence": 0.95, "punctuated_word": "Hello"},
                            {"word": "world", "start": 0.9, "end": 1.2, "confidence": 0.92, "punctuated_word": "world."},
                            {"word": "how", "start": 1.5, "end": 1.7, "confidence": 0.90},
                            {"word": "are", "start": 1.8, "end": 2.0, "confidence": 0.91},
                            {"word": "you", "start": 2.1, "end": 2.3, "confidence": 0.93}
                        ]
                    }]
                }],
                "utterances": [
                    {"start": 1.5, "end": 2.3, "transcript": "how are you"},
                    {"start": 0.5, "end": 1.2, "transcript": "Hello world."}
                ]
            }
        }"#;

        let transcript = parse_transcript_json(json).unwrap();

        assert_eq!(transcript.words.len(), 5);
        assert_eq!(transcript.words[0].text, "Hello");
        assert_eq!(transcript.words[2].text, "how");
        assert_eq!(transcript.segments.len(), 2);
        assert_eq!(transcript.segments[0].text, "Hello world.");
        assert_eq!(transcript.language_code, "en");
        assert_eq!(transcript.duration, 3.0);
    }

    #[test]
    fn test_deepgram_without_utterances_has_no_segments() {
        let json = r#"{
            "results": {
                "channels": [{
                    "alternatives": [{
                        "words": [
                            {"word": "one", "start": 0.0, "end": 0.4},
                            {"word": "two", "start": 0.5, "end": 0.9}
                        ]
                    }]
                }]
            }
        }"#;

        let transcript = parse_transcript_json(json).unwrap();

        assert!(transcript.segments.is_empty());
        assert_eq!(transcript.words.len(), 2);
        assert_eq!(transcript.duration, 0.9);
        assert_eq!(transcript.language_code, "");

        let chunks = segment_transcript(&transcript, &ChunkConfig::default());
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].preview_text, "one two");
        assert_eq!(chunks[0].word_count, 2);
    }

    #[test]
    fn test_empty_response() {
        let json = r#"{
            "results": {
                "channels": [{
                    "alternatives": [{
                        "words": []
                    }]
                }]
            }
        }"#;

        let transcript = parse_transcript_json(json).unwrap();

        assert!(transcript.words.is_empty());
        assert!(transcript.segments.is_empty());
        assert_eq!(transcript.duration, 0.0);
    }

    #[test]
    fn test_parse_native_transcript_with_missing_fields() {
        let json = r#"{"language_code": "ru", "duration": 12.5}"#;

        let transcript = parse_transcript_json(json).unwrap();

        assert!(transcript.words.is_empty());
        assert!(transcript.segments.is_empty());
        assert_eq!(transcript.language_code, "ru");
        assert_eq!(transcript.duration, 12.5);
    }

    #[test]
    fn test_native_duration_defaults_to_latest_end() {
        let segments: Vec<String> = (0..10)
            .map(|i| {
                format!(
                    r#"{{"text": "part {}", "start": {}.0, "end": {}.0}}"#,
                    i,
                    i * 61,
                    i * 61 + 60
                )
            })
            .collect();
        let json = format!(r#"{{"segments": [{}]}}"#, segments.join(","));

        let transcript = parse_transcript_json(&json).unwrap();
        assert_eq!(transcript.duration, 609.0);

        let chunks = segment_transcript(&transcript, &ChunkConfig::default());
        assert!(chunks.len() > 1);
        assert_eq!(chunks.last().unwrap().end, 609.0);

        let words_only = parse_transcript_json(
            r#"{"words": [{"text": "a", "start": 0.0, "end": 0.4}, {"text": "b", "start": 0.5, "end": 1.5}], "duration": null}"#,
        )
        .unwrap();
        assert_eq!(words_only.duration, 1.5);
    }

    #[test]
    fn test_parse_native_transcript() {
        let json = r#"{
            "words": [{"text": "привет", "start": 0.0, "end": 0.5, "lemma": "привет"}],
            "segments": [{"text": "привет", "start": 0.0, "end": 0.5}],
            "language_code": "ru",
            "duration": 1.0
        }"#;

        let transcript = parse_transcript_json(json).unwrap();

        assert_eq!(transcript.words[0].lemma.as_deref(), Some("привет"));
        assert_eq!(transcript.segments.len(), 1);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(parse_transcript_json("not json").is_err());
    }

    #[test]
    fn test_read_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transcript.json");
        std::fs::write(&path, r#"{"duration": 2.0}"#).unwrap();

        let transcript = parse_transcript_file(&path).unwrap();
        assert_eq!(transcript.duration, 2.0);

        assert!(read_text_file(&dir.path().join("missing.txt")).is_err());
    }
}
