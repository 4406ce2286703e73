use std::collections::{HashMap, HashSet};

use crate::models::WordTimestamp;
use crate::text::base_form;

/// Distinct non-empty base forms in order of first appearance
pub fn distinct_base_forms(words: &[WordTimestamp]) -> Vec<String> {
    let mut seen = HashSet::new();
    words
        .iter()
        .map(|w| base_form(&w.text))
        .filter(|base| !base.is_empty() && seen.insert(base.clone()))
        .collect()
}

/// Attach lemmas by looking up each word's base form
///
/// Words whose base form is missing from `lemmas` keep whatever lemma they
/// already had. Returns the number of words annotated.
pub fn annotate_lemmas(words: &mut [WordTimestamp], lemmas: &HashMap<String, String>) -> usize {
    let mut annotated = 0;
    for word in words.iter_mut() {
        if let Some(lemma) = lemmas.get(&base_form(&word.text)) {
            word.lemma = Some(lemma.clone());
            annotated += 1;
        }
    }
    annotated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_base_forms_keep_first_order() {
        let words = vec![
            WordTimestamp::new("Cats,", 0.0, 0.1),
            WordTimestamp::new("dogs", 0.2, 0.3),
            WordTimestamp::new("—", 0.4, 0.4),
            WordTimestamp::new("cats", 0.5, 0.6),
        ];

        assert_eq!(distinct_base_forms(&words), vec!["cats", "dogs"]);
    }

    #[test]
    fn test_annotate_lemmas_by_base_form() {
        let mut words = vec![
            WordTimestamp::new("Бежал,", 0.0, 0.3),
            WordTimestamp::new("кот", 0.4, 0.6),
            WordTimestamp::new("бежал", 0.7, 0.9),
        ];
        let lemmas = HashMap::from([("бежал".to_string(), "бежать".to_string())]);

        let annotated = annotate_lemmas(&mut words, &lemmas);

        assert_eq!(annotated, 2);
        assert_eq!(words[0].lemma.as_deref(), Some("бежать"));
        assert_eq!(words[1].lemma, None);
        assert_eq!(words[2].lemma.as_deref(), Some("бежать"));
        assert_eq!(words[0].text, "Бежал,");
    }
}
