
// imports
use crate::error::Result;
use crate::vocab::Vocabulary;

use ndarray::{s, Array2};
use rayon::{prelude::*, ThreadPoolBuilder};
use std::ops::Range;
use tracing::{debug, info};


// a position in a line wrapped by sentence boundaries
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Slot {
    Start,
    End,
    Word(Option<usize>),
}

/// Words (row order) and their `m x (m+2)` context count matrix. The last two
/// columns count the sentence-start and sentence-end markers.
#[derive(Debug)]
pub struct ContextVectors {
    pub words: Vec<String>,
    pub counts: Array2<f64>,
}

pub struct ContextCounts {}

impl ContextCounts {

    fn wrap(sequence: &[String], vocab: &Vocabulary) -> Vec<Slot> {
        let mut wrapped = Vec::with_capacity(sequence.len() + 2);
        wrapped.push(Slot::Start);
        wrapped.extend(sequence.iter().map(|tok| Slot::Word(vocab.index_of(tok))));
        wrapped.push(Slot::End);
        wrapped
    }

    fn count(window: usize,
        lines: &[Vec<Slot>],
        vocab_size: usize,
        slice: &Range<usize>,
        thread_i: usize) -> Array2<u64> {

            // counts the rows of the targets in `slice` only, so that slices can be filled
            // independently and stacked in order afterwards.
            let start_col = vocab_size;
            let end_col = vocab_size + 1;
            let mut counts: Array2<u64> = Array2::zeros((slice.len(), vocab_size + 2));

            for (li, line) in lines.iter().enumerate() {

                if (li + 1) % 2000 == 0 {
                    debug!("within thread {}, counted {} lines", thread_i, li + 1);
                }

                let n = line.len();
                for i in 0..n {

                    let row = match line[i] {
                        Slot::Word(Some(token_i)) if slice.contains(&token_i) => token_i - slice.start,
                        _ => continue
                    };

                    // contexts to the left and to the right, clipped at the line edges
                    let left = i.saturating_sub(window)..i;
                    let right = (i + 1)..(i + window + 1).min(n);
                    for j in left.chain(right) {
                        match line[j] {
                            Slot::Word(Some(context_j)) => counts[[row, context_j]] += 1,
                            Slot::Start => counts[[row, start_col]] += 1,
                            Slot::End => counts[[row, end_col]] += 1,
                            Slot::Word(None) => ()
                        }
                    }
                }
            }

            counts
    }

    /// Builds the context count matrix of `vocab` over `sequences` with the given window radius.
    pub fn run(sequences: &[Vec<String>], window: usize, vocab: &Vocabulary, num_threads: usize) -> Result<ContextVectors> {

        let vocab_size = vocab.len();
        let lines: Vec<Vec<Slot>> = sequences.iter().map(|sequence| ContextCounts::wrap(sequence, vocab)).collect();

        // counting is done in slices of target rows, one per thread. Integer counts per row
        // are independent of the partition, so the result does not depend on num_threads.
        let num_threads = num_threads.max(1);
        let in_parts_size = ((vocab_size + num_threads - 1) / num_threads).max(1);
        let slices: Vec<Range<usize>> = (0..vocab_size)
            .step_by(in_parts_size)
            .map(|i| i..(i + in_parts_size).min(vocab_size))
            .collect();

        let pool = ThreadPoolBuilder::new().num_threads(num_threads).build()?;
        let counts_by_slices: Vec<Array2<u64>> = pool.install(|| {
            slices.par_iter().enumerate().map(|(thread_i, slice)| {
                ContextCounts::count(window, &lines, vocab_size, slice, thread_i)
            }).collect()
        });

        let mut counts: Array2<f64> = Array2::zeros((vocab_size, vocab_size + 2));
        for (slice, part) in slices.iter().zip(counts_by_slices.iter()) {
            counts.slice_mut(s![slice.clone(), ..]).assign(&part.mapv(|c| c as f64));
        }

        info!("estimated count context vectors over {} lines with window {}", sequences.len(), window);

        Ok(ContextVectors {
            words: vocab.words().to_vec(),
            counts
        })
    }

}


#[cfg(test)]
mod tests {

    use super::ContextCounts;
    use crate::corpus::Corpus;
    use crate::vocab::Vocabulary;
    use ndarray::{array, s, Array2};

    // the tests check the counts against golden matrices computed by hand on toy corpora.
    // column order is the vocabulary order followed by <s> and </s>.

    fn build(lines: &[&str], threshold: usize, window: usize, num_threads: usize) -> (Vec<String>, Array2<f64>) {
        let corpus = Corpus::from_lines(lines, false);
        let vocab = Vocabulary::build(&corpus.token2count, threshold);
        let vectors = ContextCounts::run(&corpus.sequences, window, &vocab, num_threads).unwrap();
        (vectors.words, vectors.counts)
    }

    #[test]
    fn window_one_test() {
        let (words, counts) = build(&["a b a", "b c"], 1, 1, 1);
        assert_eq!(words, vec!["a", "b", "c"]);

        let golden = array![
            [0.0, 2.0, 0.0, 1.0, 1.0],
            [2.0, 0.0, 1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0, 0.0, 1.0]
        ];
        assert_eq!(counts, golden);
    }

    #[test]
    fn wide_window_is_clipped_at_line_edges_test() {
        let (_, counts) = build(&["a b a", "b c"], 1, 5, 1);
        let golden = array![
            [2.0, 2.0, 0.0, 2.0, 2.0],
            [2.0, 0.0, 1.0, 2.0, 2.0],
            [0.0, 1.0, 0.0, 1.0, 1.0]
        ];
        assert_eq!(counts, golden);
    }

    #[test]
    fn out_of_vocabulary_contexts_are_ignored_test() {
        // x and y are below threshold: they are skipped as contexts but still occupy window slots
        let (words, counts) = build(&["a x b", "b y a", "a b"], 2, 1, 1);
        assert_eq!(words, vec!["a", "b"]);
        let golden = array![
            [0.0, 1.0, 2.0, 1.0],
            [1.0, 0.0, 1.0, 2.0]
        ];
        assert_eq!(counts, golden);
    }

    #[test]
    fn window_zero_test() {
        let (_, counts) = build(&["the cat sat on the mat", "a cat"], 1, 0, 1);
        assert_eq!(counts.dim(), (6, 8));
        assert!(counts.iter().all(|x| *x == 0.0));

        // interior columns stay empty even for words never at a line edge
        let interior = counts.slice(s![.., ..6]);
        assert!(interior.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn boundary_markers_are_not_words_test() {
        // a literal "<s>" token is an ordinary vocabulary word
        let (words, counts) = build(&["<s> a"], 1, 1, 1);
        assert_eq!(words, vec!["<s>", "a"]);
        let golden = array![
            [0.0, 1.0, 1.0, 0.0],
            [1.0, 0.0, 0.0, 1.0]
        ];
        assert_eq!(counts, golden);
    }

    #[test]
    fn independent_of_threads_test() {
        let lines = [
            "the quick brown fox jumps over the lazy dog",
            "the dog sleeps",
            "a quick fox is a happy fox",
            "",
            "dog",
        ];
        let (_, single) = build(&lines, 1, 2, 1);
        for num_threads in [2, 3, 7, 32] {
            let (_, multi) = build(&lines, 1, 2, num_threads);
            assert_eq!(single, multi);
        }
    }

    #[test]
    fn empty_vocab_test() {
        let (words, counts) = build(&["a b c"], 5, 2, 4);
        assert!(words.is_empty());
        assert_eq!(counts.dim(), (0, 2));
    }
}
