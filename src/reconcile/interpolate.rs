use crate::models::{TimedToken, WordTimestamp};

/// Share of each slot treated as spoken; the rest is an inter-word gap
pub const SPOKEN_FRACTION: f64 = 0.8;

/// Resolve unknown timings by spreading each gap evenly over its tokens
///
/// For every maximal run of tokens without timing, the gap runs from the
/// nearest known end before the run (or 0) to the nearest known start after
/// it (or `total_duration`). The gap is cut into one equal slot per token and
/// each token occupies the first [`SPOKEN_FRACTION`] of its slot.
pub fn interpolate(tokens: &[TimedToken], total_duration: f64) -> Vec<WordTimestamp> {
    let mut words: Vec<WordTimestamp> = Vec::with_capacity(tokens.len());
    let mut i = 0;

    while i < tokens.len() {
        if let Some((start, end)) = tokens[i].timing {
            words.push(WordTimestamp::new(&tokens[i].text, start, end));
            i += 1;
            continue;
        }

        let run_end = tokens[i..]
            .iter()
            .position(TimedToken::is_known)
            .map_or(tokens.len(), |offset| i + offset);

        // Runs are maximal, so the previous output word is a known one
        let gap_start = words.last().map_or(0.0, |w| w.end);
        let gap_end = tokens
            .get(run_end)
            .and_then(|t| t.timing)
            .map_or(total_duration, |(start, _)| start);

        let run = &tokens[i..run_end];
        let slot = ((gap_end - gap_start) / run.len() as f64).max(0.0);

        for (k, token) in run.iter().enumerate() {
            let start = gap_start + k as f64 * slot;
            let end = gap_start + (k as f64 + SPOKEN_FRACTION) * slot;
            words.push(WordTimestamp::new(&token.text, start, end));
        }

        i = run_end;
    }

    words
}

/// Estimate timings from character length alone
///
/// Fallback for text that has no re-transcription to align against: the
/// duration is shared out in proportion to each token's length.
pub fn estimate_by_length<S: AsRef<str>>(tokens: &[S], total_duration: f64) -> Vec<WordTimestamp> {
    let weights: Vec<usize> = tokens
        .iter()
        .map(|t| t.as_ref().chars().count().max(1))
        .collect();
    let total_weight: usize = weights.iter().sum();
    if total_weight == 0 {
        return Vec::new();
    }

    let per_char = total_duration.max(0.0) / total_weight as f64;
    let mut cursor = 0.0;

    tokens
        .iter()
        .zip(weights)
        .map(|(token, weight)| {
            let slot = weight as f64 * per_char;
            let word = WordTimestamp::new(token.as_ref(), cursor, cursor + SPOKEN_FRACTION * slot);
            cursor += slot;
            word
        })
        .collect()
}
