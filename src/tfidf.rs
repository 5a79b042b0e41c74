use crate::vocab::Vocabulary;

use ndarray::{Array1, Array2, Axis};
use tracing::{info, warn};


/// Document-term vectors: one row per document (corpus line), one column per vocabulary term.
pub struct DocTerm {}

impl DocTerm {

    /// Raw frequency of every vocabulary term in every document.
    pub fn term_frequencies(sequences: &[Vec<String>], vocab: &Vocabulary) -> Array2<f64> {

        let mut tf: Array2<f64> = Array2::zeros((sequences.len(), vocab.len()));
        for (li, line) in sequences.iter().enumerate() {
            for term in line {
                if let Some(term_i) = vocab.index_of(term) {
                    tf[[li, term_i]] += 1.0;
                }
            }
        }
        tf
    }

    /// Number of documents each term occurs in.
    pub fn document_frequencies(tf: &Array2<f64>) -> Array1<f64> {
        tf.mapv(|x| if x > 0.0 { 1.0 } else { 0.0 }).sum_axis(Axis(0))
    }

    /// `-log2(df / n_docs)` per term. A term found in no document gets 0.
    pub fn idf(df: &Array1<f64>, n_docs: usize) -> Array1<f64> {

        let unseen = df.iter().filter(|x| **x == 0.0).count();
        if unseen > 0 {
            warn!("{} terms occur in none of the {} documents, their IDF is set to 0", unseen, n_docs);
        }

        let n_docs = n_docs as f64;
        df.mapv(|x| {
            if x == 0.0 || n_docs == 0.0 {
                0.0
            } else {
                // adding 0.0 turns the -0.0 of terms present everywhere into 0.0
                -(x / n_docs).log2() + 0.0
            }
        })
    }

    /// TF-IDF weights of the documents in `sequences` over `vocab`.
    pub fn tfidf(sequences: &[Vec<String>], vocab: &Vocabulary) -> Array2<f64> {

        let tf = DocTerm::term_frequencies(sequences, vocab);
        let (n_docs, n_terms) = tf.dim();

        let df = DocTerm::document_frequencies(&tf);
        info!("computed number of documents for each of {} terms", n_terms);
        let idf = DocTerm::idf(&df, n_docs);
        info!("computed IDF over {} documents", n_docs);

        // idf broadcasts across the rows
        tf * &idf
    }

}


#[cfg(test)]
mod tests {

    use super::DocTerm;
    use crate::corpus::Corpus;
    use crate::vocab::Vocabulary;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn term_and_document_frequencies_test() {
        let corpus = Corpus::from_lines(&["a b a", "b c", "a"], false);
        let vocab = Vocabulary::build(&corpus.token2count, 1);
        assert_eq!(vocab.words(), &["a", "b", "c"]);

        let tf = DocTerm::term_frequencies(&corpus.sequences, &vocab);
        assert_eq!(tf, array![[2.0, 1.0, 0.0], [0.0, 1.0, 1.0], [1.0, 0.0, 0.0]]);
        assert_eq!(DocTerm::document_frequencies(&tf), array![2.0, 2.0, 1.0]);
    }

    #[test]
    fn golden_tfidf_test() {
        let corpus = Corpus::from_lines(&["a b a", "b c", "a", "d d d d"], false);
        let vocab = Vocabulary::build(&corpus.token2count, 2);
        // c occurs once and is filtered out
        assert_eq!(vocab.words(), &["d", "a", "b"]);

        let tfidf = DocTerm::tfidf(&corpus.sequences, &vocab);
        let idf_d = 2.0; // -log2(1/4)
        let idf_ab = 1.0; // -log2(2/4)
        let golden = array![
            [0.0, 2.0 * idf_ab, idf_ab],
            [0.0, 0.0, idf_ab],
            [0.0, idf_ab, 0.0],
            [4.0 * idf_d, 0.0, 0.0]
        ];
        assert_eq!(tfidf.dim(), golden.dim());
        for (x, y) in tfidf.iter().zip(golden.iter()) {
            assert_abs_diff_eq!(*x, *y, epsilon = 1e-12);
        }
    }

    #[test]
    fn single_document_is_all_zero_test() {
        let corpus = Corpus::from_lines(&["the cat and the hat and the bat"], false);
        let vocab = Vocabulary::build(&corpus.token2count, 1);
        let tfidf = DocTerm::tfidf(&corpus.sequences, &vocab);
        assert_eq!(tfidf.dim(), (1, 5));
        // every term is in every document: exactly +0.0 everywhere
        assert!(tfidf.iter().all(|x| *x == 0.0 && x.is_sign_positive()));
    }

    #[test]
    fn unseen_term_guard_test() {
        let idf = DocTerm::idf(&array![0.0, 1.0, 2.0], 2);
        assert_eq!(idf, array![0.0, 1.0, 0.0]);
        assert!(DocTerm::idf(&array![0.0], 0).iter().all(|x| *x == 0.0));
    }

    #[test]
    fn empty_inputs_test() {
        let corpus = Corpus::from_lines(&["a b", ""], false);
        let vocab = Vocabulary::build(&corpus.token2count, 3);
        let tfidf = DocTerm::tfidf(&corpus.sequences, &vocab);
        assert_eq!(tfidf.dim(), (2, 0));
    }
}
