/// Minimum length (in chars) for two base forms to be compared fuzzily
pub const FUZZY_MIN_LEN: usize = 4;

/// Fraction of the longer word's length tolerated as edits
pub const FUZZY_RATIO: f64 = 0.3;

/// Edits always tolerated for words long enough to be compared
pub const FUZZY_MIN_EDITS: usize = 2;

/// Levenshtein distance over chars
///
/// Uses two rolling rows sized to the shorter input.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return long.len();
    }

    let mut prev: Vec<usize> = (0..=short.len()).collect();
    let mut curr = vec![0usize; short.len() + 1];

    for (i, lc) in long.iter().enumerate() {
        curr[0] = i + 1;
        for (j, sc) in short.iter().enumerate() {
            let substitution = prev[j] + usize::from(lc != sc);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[short.len()]
}

/// Whether two base forms are close enough to be the same word
///
/// Both must have at least [`FUZZY_MIN_LEN`] chars; the allowed distance is
/// `max(2, floor(0.3 * longer_len))`.
pub fn fuzzy_match(a: &str, b: &str) -> bool {
    let a_len = a.chars().count();
    let b_len = b.chars().count();
    if a_len < FUZZY_MIN_LEN || b_len < FUZZY_MIN_LEN {
        return false;
    }

    let longer = a_len.max(b_len);
    let allowed = FUZZY_MIN_EDITS.max((longer as f64 * FUZZY_RATIO).floor() as usize);

    // Cheap reject: the length difference alone exceeds the budget
    if longer - a_len.min(b_len) > allowed {
        return false;
    }

    edit_distance(a, b) <= allowed
}

/// Exact or fuzzy equality of two base forms
pub fn tokens_match(a: &str, b: &str) -> bool {
    a == b || fuzzy_match(a, b)
}
