use crate::models::{TimedToken, WordTimestamp};
use crate::text::{base_form, tokens_match};

/// How far ahead either stream is searched to resynchronize after a mismatch
pub const LOOKAHEAD: usize = 3;

/// What to do with a left-hand token that could not be matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPolicy {
    /// Keep the original token and its timestamp
    KeepOriginal,
    /// Mark the timestamp unknown so it can be interpolated later
    MarkUnknown,
}

impl MatchPolicy {
    fn fallback(self) -> Alignment {
        match self {
            MatchPolicy::KeepOriginal => Alignment::KeepOriginal,
            MatchPolicy::MarkUnknown => Alignment::Unknown,
        }
    }
}

/// Alignment outcome for one left-hand token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// Paired with the right-hand token at this index
    Matched(usize),
    /// Unmatched; the token stays as it was
    KeepOriginal,
    /// Unmatched; timing must be recovered elsewhere
    Unknown,
}

/// Align two token streams that describe the same words
///
/// Returns exactly one [`Alignment`] per `left` token. Mismatches are
/// recovered with a bounded lookahead of [`LOOKAHEAD`] tokens on either side:
/// first by assuming the right stream inserted tokens, then by assuming it
/// merged or dropped left tokens. Anything still unmatched gets the policy's
/// fallback, and the right pointer stays put so the token can be tried again.
pub fn align<L, R>(left: &[L], right: &[R], policy: MatchPolicy) -> Vec<Alignment>
where
    L: AsRef<str>,
    R: AsRef<str>,
{
    let left_base: Vec<String> = left.iter().map(|t| base_form(t.as_ref())).collect();
    let right_base: Vec<String> = right.iter().map(|t| base_form(t.as_ref())).collect();

    let mut alignments = Vec::with_capacity(left.len());
    let mut i = 0;
    let mut j = 0;

    while i < left_base.len() {
        if j >= right_base.len() {
            alignments.push(policy.fallback());
            i += 1;
            continue;
        }

        if tokens_match(&left_base[i], &right_base[j]) {
            alignments.push(Alignment::Matched(j));
            i += 1;
            j += 1;
            continue;
        }

        // Right side inserted up to LOOKAHEAD extra tokens
        let inserted = (1..=LOOKAHEAD)
            .take_while(|k| j + k < right_base.len())
            .find(|&k| tokens_match(&left_base[i], &right_base[j + k]));
        if let Some(k) = inserted {
            j += k;
            alignments.push(Alignment::Matched(j));
            i += 1;
            j += 1;
            continue;
        }

        // Right side merged or dropped up to LOOKAHEAD left tokens
        let merged = (1..=LOOKAHEAD)
            .take_while(|k| i + k < left_base.len())
            .find(|&k| tokens_match(&left_base[i + k], &right_base[j]));
        if let Some(k) = merged {
            alignments.extend(std::iter::repeat_n(policy.fallback(), k));
            i += k;
            continue;
        }

        alignments.push(policy.fallback());
        i += 1;
    }

    alignments
}

/// Carry corrected surface text onto timestamped words
///
/// The output has the same length and timestamps as `original`; matched words
/// take the corrected spelling, everything else stays as it was.
pub fn apply_corrections<S: AsRef<str>>(
    original: &[WordTimestamp],
    corrected: &[S],
) -> Vec<WordTimestamp> {
    align(original, corrected, MatchPolicy::KeepOriginal)
        .into_iter()
        .zip(original)
        .map(|(alignment, word)| match alignment {
            Alignment::Matched(j) => WordTimestamp {
                text: corrected[j].as_ref().to_string(),
                ..word.clone()
            },
            Alignment::KeepOriginal | Alignment::Unknown => word.clone(),
        })
        .collect()
}

/// Apply per-batch corrections to consecutive `batch_size` slices of `original`
///
/// `corrections[b]` holds the corrected tokens for batch `b`, or `None` when
/// the batch could not be corrected and keeps its words. Batches past the end
/// of `corrections` are kept as well. Results are concatenated in order.
pub fn reconcile_batches<S: AsRef<str>>(
    original: &[WordTimestamp],
    corrections: &[Option<Vec<S>>],
    batch_size: usize,
) -> Vec<WordTimestamp> {
    original
        .chunks(batch_size.max(1))
        .enumerate()
        .flat_map(|(b, batch)| match corrections.get(b) {
            Some(Some(corrected)) => apply_corrections(batch, corrected),
            _ => batch.to_vec(),
        })
        .collect()
}

/// Recover timings for written text from a re-transcription of its audio
///
/// Every written token keeps its own text. Tokens matched to a transcribed
/// word borrow that word's timing; the rest are left unknown for
/// [`crate::reconcile::interpolate`].
pub fn align_to_retranscription<S: AsRef<str>>(
    written: &[S],
    transcribed: &[WordTimestamp],
) -> Vec<TimedToken> {
    align(written, transcribed, MatchPolicy::MarkUnknown)
        .into_iter()
        .zip(written)
        .map(|(alignment, token)| match alignment {
            Alignment::Matched(j) => {
                let word = &transcribed[j];
                TimedToken::known(token.as_ref(), word.start, word.end)
            }
            Alignment::KeepOriginal | Alignment::Unknown => TimedToken::unknown(token.as_ref()),
        })
        .collect()
}
