
use std::collections::HashMap;
use tracing::{info, warn};


/// Frequency-filtered, frequency-ranked word types with O(1) index lookup.
#[derive(Clone, Debug, Default)]
pub struct Vocabulary {
    words: Vec<String>,
    counts: Vec<usize>,
    t2i: HashMap<String, usize>,
}

impl Vocabulary {

    /// Keeps the words seen at least `min_count` times, most frequent first.
    /// Words with equal counts are ordered alphabetically so the ranking is reproducible.
    pub fn build(token2count: &HashMap<String, usize>, min_count: usize) -> Vocabulary {

        let mut tup = token2count
        .iter()
        .filter(|(_, count)| **count >= min_count)
        .map(|(k, v)| (k.to_owned(), *v))
        .collect::<Vec<(String, usize)>>();
        tup.sort_by(|(w1, c1), (w2, c2)| c2.cmp(c1).then_with(|| w1.cmp(w2)));

        let t2i: HashMap<String, usize> = tup
        .iter()
        .enumerate()
        .map(|(i, (word, _))| (word.to_owned(), i))
        .collect();
        let (words, counts): (Vec<String>, Vec<usize>) = tup.into_iter().unzip();

        if words.is_empty() {
            warn!("no word reaches the frequency threshold {}, vocabulary is empty", min_count);
        } else {
            info!("filtered vocabulary to {} words out of {}", words.len(), token2count.len());
        }

        Self { words, counts, t2i }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    #[inline]
    pub fn index_of(&self, word: &str) -> Option<usize> {
        self.t2i.get(word).copied()
    }

    pub fn count_of(&self, index: usize) -> Option<usize> {
        self.counts.get(index).copied()
    }

}


#[cfg(test)]
mod tests {

    use super::Vocabulary;
    use std::collections::HashMap;

    fn counts(pairs: &[(&str, usize)]) -> HashMap<String, usize> {
        pairs.iter().map(|(w, c)| (w.to_string(), *c)).collect()
    }

    #[test]
    fn build_vocab_test() {
        let token2count = counts(&[("a", 5), ("b", 1), ("c", 3), ("d", 3), ("e", 2)]);
        let vocab = Vocabulary::build(&token2count, 2);

        // b is below threshold, c and d tie and are ordered alphabetically
        assert_eq!(vocab.words(), &["a", "c", "d", "e"]);
        assert_eq!(vocab.len(), 4);
        assert_eq!(vocab.index_of("a"), Some(0));
        assert_eq!(vocab.index_of("d"), Some(2));
        assert_eq!(vocab.index_of("b"), None);
        assert_eq!(vocab.count_of(1), Some(3));
        assert_eq!(vocab.count_of(4), None);
    }

    #[test]
    fn sorted_and_complete_test() {
        let token2count = counts(&[
            ("the", 40), ("of", 22), ("cat", 3), ("dog", 3), ("zebra", 1),
            ("apple", 7), ("run", 3), ("ran", 2), ("x", 22),
        ]);
        for threshold in 0..45 {
            let vocab = Vocabulary::build(&token2count, threshold);
            let expected = token2count.values().filter(|c| **c >= threshold).count();
            assert_eq!(vocab.len(), expected);
            for i in 1..vocab.len() {
                assert!(vocab.count_of(i - 1).unwrap() >= vocab.count_of(i).unwrap());
            }
            for (i, word) in vocab.words().iter().enumerate() {
                assert_eq!(vocab.index_of(word), Some(i));
            }
        }
    }

    #[test]
    fn ties_are_reproducible_test() {
        let token2count = counts(&[("pear", 2), ("fig", 2), ("kiwi", 2), ("lime", 2)]);
        let first = Vocabulary::build(&token2count, 1);
        for _ in 0..10 {
            let again = Vocabulary::build(&counts(&[("lime", 2), ("kiwi", 2), ("fig", 2), ("pear", 2)]), 1);
            assert_eq!(again.words(), first.words());
        }
        assert_eq!(first.words(), &["fig", "kiwi", "lime", "pear"]);
    }

    #[test]
    fn empty_vocab_test() {
        let vocab = Vocabulary::build(&counts(&[("a", 1)]), 2);
        assert!(vocab.is_empty());
        assert_eq!(vocab.len(), 0);
        assert_eq!(vocab.index_of("a"), None);
    }
}
