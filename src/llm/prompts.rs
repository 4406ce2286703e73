/// Name of the forced tool used for structured lemma output
pub const LEMMA_TOOL_NAME: &str = "submit_lemmas";

/// System prompt for punctuation and spelling correction
pub const CORRECTION_SYSTEM_PROMPT: &str = r#"You are correcting a machine transcription of speech. You MUST follow these rules:

1. Fix punctuation, capitalization and obvious spelling errors only.
2. You MUST NOT add, remove, reorder or paraphrase words.
3. Keep the text in its original language. Do not translate.
4. Keep numbers, names and filler words as they are.
5. Reply with the corrected text only, with no commentary, quotes or markup."#;

/// System prompt for lemmatization
pub const LEMMA_SYSTEM_PROMPT: &str = r#"You are a lemmatizer. For every word you are given, return its dictionary form (lemma) in the same language.

RULES:
- Return exactly one entry per requested word, using the word exactly as given.
- Lemmas are lowercase unless the language requires otherwise (proper nouns, German nouns).
- For words without a meaningful lemma (numbers, names, interjections), return the word itself.
- Submit the result using the submit_lemmas tool."#;

/// Build the user prompt for one correction batch
pub fn build_correction_prompt(text: &str, language: &str) -> String {
    let mut prompt = String::new();
    prompt.push_str(&format!("Language: {}\n\n", language_label(language)));
    prompt.push_str("## Transcript\n");
    prompt.push_str(text);
    prompt.push_str("\n\n## Instructions\n");
    prompt.push_str("Return the corrected transcript. Every word must still be present, in order.\n");
    prompt
}

/// Build the user prompt for one lemmatization batch
pub fn build_lemma_prompt(words: &[String], language: &str) -> String {
    let mut prompt = String::new();
    prompt.push_str(&format!("Language: {}\n", language_label(language)));
    prompt.push_str(&format!("Words: {}\n\n", words.len()));
    prompt.push_str("```json\n");
    prompt.push_str(&serde_json::to_string(words).unwrap_or_else(|_| "[]".to_string()));
    prompt.push_str("\n```\n");
    prompt
}

/// JSON schema of the `submit_lemmas` tool input
pub fn lemma_tool_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "lemmas": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "word": {"type": "string", "description": "The word exactly as requested"},
                        "lemma": {"type": "string", "description": "Dictionary form of the word"}
                    },
                    "required": ["word", "lemma"]
                }
            }
        },
        "required": ["lemmas"]
    })
}

fn language_label(language: &str) -> &str {
    if language.is_empty() {
        "unknown (detect from the text)"
    } else {
        language
    }
}
