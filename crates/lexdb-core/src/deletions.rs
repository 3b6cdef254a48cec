//! # Deletion Detector
//!
//! Finds the words of the prior edition that the current edition dropped.

use crate::DeletedWord;
use crate::engine::Dictionary;

/// Every word of `prior_words` missing from `current`, sorted by word.
pub fn detect_deletions<'w, I, D>(prior_words: I, current: &D) -> Vec<DeletedWord>
where
    I: IntoIterator<Item = &'w str>,
    D: Dictionary + ?Sized,
{
    let mut deleted: Vec<DeletedWord> = prior_words
        .into_iter()
        .filter(|word| !current.is_member(word))
        .map(DeletedWord::new)
        .collect();
    deleted.sort();
    deleted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WordList;

    #[test]
    fn dropped_word_is_reported_with_length() {
        let current: WordList = ["QI", "ZA"].into_iter().collect();
        let deleted = detect_deletions(["ZA", "QUIZ", "QI"], &current);
        assert_eq!(deleted, vec![DeletedWord::new("QUIZ")]);
        assert_eq!(deleted[0].length, 4);
    }

    #[test]
    fn output_is_sorted() {
        let current = WordList::new();
        let deleted = detect_deletions(["ZO", "AB", "MU"], &current);
        let words: Vec<&str> = deleted.iter().map(|d| d.word.as_str()).collect();
        assert_eq!(words, vec!["AB", "MU", "ZO"]);
    }

    #[test]
    fn nothing_dropped() {
        let current: WordList = ["AA"].into_iter().collect();
        assert!(detect_deletions(["AA"], &current).is_empty());
    }
}
