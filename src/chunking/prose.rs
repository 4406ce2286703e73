use std::sync::LazyLock;

use regex::Regex;

use crate::models::{ChunkStatus, TextChunk, TextChunkConfig};
use crate::text::{preview, truncate_chars, word_count};

/// Two or more newlines, possibly with whitespace-only lines between them
static BLANK_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("Invalid blank line regex"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

/// Characters that may end a sentence when followed by whitespace
const SENTENCE_END: [char; 5] = ['.', '!', '?', '»', '…'];

const SECTION_JOINER: &str = "\n\n";
const SENTENCE_JOINER: &str = " ";

/// A unit of text ready to be packed into chunks
#[derive(Debug)]
struct Piece {
    text: String,
    /// First piece of a paragraph section (joined with a blank line)
    starts_section: bool,
}

/// Split prose into chunks that respect paragraph and sentence boundaries
///
/// Paragraphs are separated by blank lines; hard line wraps inside a
/// paragraph are joined with spaces. Chunks aim for `target_chars`, are
/// always shorter than `hard_limit_chars`, and a short tail is merged into
/// the previous chunk. At least one chunk is always returned.
pub fn segment_text(text: &str, config: &TextChunkConfig) -> Vec<TextChunk> {
    let normalized = text.replace("\r\n", "\n");

    let sections: Vec<String> = BLANK_LINE
        .split(&normalized)
        .map(|section| WHITESPACE_RUN.replace_all(section.trim(), " ").into_owned())
        .filter(|section| !section.is_empty())
        .collect();

    if sections.is_empty() {
        let trimmed = truncate_chars(text.trim(), max_chunk_chars(config));
        return build_chunks(vec![trimmed.to_string()], config);
    }

    let pieces: Vec<Piece> = sections
        .into_iter()
        .flat_map(|section| split_section(section, config))
        .collect();

    build_chunks(pack_pieces(pieces, config), config)
}

/// Break an over-long section into sentence-packed pieces
fn split_section(section: String, config: &TextChunkConfig) -> Vec<Piece> {
    if char_len(&section) <= config.target_chars.min(max_chunk_chars(config)) {
        return vec![Piece {
            text: section,
            starts_section: true,
        }];
    }

    let mut packed: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for sentence in split_sentences(&section) {
        let sentence_len = char_len(sentence);
        if current.is_empty() {
            current.push_str(sentence);
            current_len = sentence_len;
        } else if current_len + 1 + sentence_len <= config.target_chars {
            current.push_str(SENTENCE_JOINER);
            current.push_str(sentence);
            current_len += 1 + sentence_len;
        } else {
            packed.push(std::mem::take(&mut current));
            current.push_str(sentence);
            current_len = sentence_len;
        }
    }
    if !current.is_empty() {
        packed.push(current);
    }

    // A lone sentence may exceed the target but never the hard limit
    let max_piece = max_chunk_chars(config);
    packed
        .into_iter()
        .flat_map(|piece| {
            if char_len(&piece) > max_piece {
                split_on_words(&piece, max_piece)
            } else {
                vec![piece]
            }
        })
        .enumerate()
        .map(|(i, text)| Piece {
            text,
            starts_section: i == 0,
        })
        .collect()
}

/// Split on sentence-ending punctuation followed by whitespace
fn split_sentences(section: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = section.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if !SENTENCE_END.contains(&c) {
            continue;
        }
        if let Some(&(next_idx, next)) = chars.peek() {
            if next.is_whitespace() {
                sentences.push(section[start..idx + c.len_utf8()].trim());
                start = next_idx;
            }
        }
    }
    sentences.push(section[start..].trim());

    sentences.retain(|s| !s.is_empty());
    sentences
}

/// Last-resort split for a sentence longer than `max_chars`
fn split_on_words(text: &str, max_chars: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word = word;
        // A single word longer than the limit is cut at char boundaries
        while char_len(word) > max_chars {
            if !current.is_empty() {
                pieces.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let head = truncate_chars(word, max_chars);
            pieces.push(head.to_string());
            word = &word[head.len()..];
        }

        let word_len = char_len(word);
        if word_len == 0 {
            continue;
        }
        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= max_chars {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            pieces.push(std::mem::replace(&mut current, word.to_string()));
            current_len = word_len;
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }

    pieces
}

/// Greedily pack pieces into chunk texts
fn pack_pieces(pieces: Vec<Piece>, config: &TextChunkConfig) -> Vec<String> {
    let mut chunks: Vec<String> = Vec::new();
    let mut buffer = String::new();
    let mut buffer_len = 0;

    for piece in pieces {
        let joiner = if piece.starts_section {
            SECTION_JOINER
        } else {
            SENTENCE_JOINER
        };
        let piece_len = char_len(&piece.text);
        let joined_len = if buffer.is_empty() {
            piece_len
        } else {
            buffer_len + joiner.len() + piece_len
        };
        let fits_hard_limit = joined_len < config.hard_limit_chars;
        let is_separator = piece_len < config.separator_chars;

        if !buffer.is_empty()
            && (!fits_hard_limit || (!is_separator && joined_len > config.target_chars))
        {
            chunks.push(std::mem::replace(&mut buffer, piece.text));
            buffer_len = piece_len;
        } else {
            if !buffer.is_empty() {
                buffer.push_str(joiner);
            }
            buffer.push_str(&piece.text);
            buffer_len = joined_len;
        }
    }

    if buffer.is_empty() {
        return chunks;
    }

    match chunks.last_mut() {
        Some(last)
            if buffer_len < config.min_chars
                && char_len(last) + SECTION_JOINER.len() + buffer_len < config.hard_limit_chars =>
        {
            last.push_str(SECTION_JOINER);
            last.push_str(&buffer);
        }
        _ => chunks.push(buffer),
    }

    chunks
}

fn build_chunks(texts: Vec<String>, config: &TextChunkConfig) -> Vec<TextChunk> {
    texts
        .into_iter()
        .enumerate()
        .map(|(index, text)| TextChunk {
            id: format!("chunk-{}", index),
            index,
            preview_text: preview(&text, config.preview_chars),
            word_count: word_count(&text),
            text,
            status: ChunkStatus::Pending,
        })
        .collect()
}

/// Longest text a chunk may hold
fn max_chunk_chars(config: &TextChunkConfig) -> usize {
    config.hard_limit_chars.saturating_sub(1).max(1)
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}
