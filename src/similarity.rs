use crate::error::{Result, VsmError};

use ndarray::prelude::*;
use rayon::{prelude::*, ThreadPoolBuilder};
use std::collections::HashMap;

/// Distance used when either vector has zero norm, the largest cosine distance possible.
pub const UNDEFINED_DISTANCE: f64 = 2.0;

fn norm(x: ArrayView1<f64>) -> f64 {
    x.dot(&x).sqrt()
}

fn cosine_distance(a: ArrayView1<f64>, a_norm: f64, b: ArrayView1<f64>, b_norm: f64) -> f64 {
    if a_norm == 0.0 || b_norm == 0.0 {
        return UNDEFINED_DISTANCE;
    }
    let similarity = (a.dot(&b) / (a_norm * b_norm)).clamp(-1.0, 1.0);
    1.0 - similarity
}

/// Pairwise cosine distances, `test.nrows() x train.nrows()`.
///
/// Rows are computed in parallel on `num_threads` workers; every cell is computed on
/// its own, so the result does not depend on the number of workers.
pub fn cosine_distances(test: &Array2<f64>, train: &Array2<f64>, num_threads: usize) -> Result<Array2<f64>> {

    if test.ncols() != train.ncols() {
        return Err(VsmError::shape("test and train points", format!("{} columns", train.ncols()), format!("{} columns", test.ncols())));
    }

    let (n_test, n_train) = (test.nrows(), train.nrows());
    let train_norms: Vec<f64> = train.rows().into_iter().map(norm).collect();

    let pool = ThreadPoolBuilder::new().num_threads(num_threads.max(1)).build()?;
    let rows: Vec<Vec<f64>> = pool.install(|| {
        (0..n_test).into_par_iter().map(|i| {
            let a = test.row(i);
            let a_norm = norm(a);
            (0..n_train)
                .map(|j| cosine_distance(a, a_norm, train.row(j), train_norms[j]))
                .collect()
        }).collect()
    });

    let values: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((n_test, n_train), values)
        .map_err(|e| VsmError::shape("distance matrix", format!("{}x{}", n_test, n_train), e))
}


/// Row vectors addressed by word, for nearest-word lookups.
pub struct Similarity {
    w: Array2<f64>,
    t2i: HashMap<String, usize>,
    i2t: Vec<String>
}

impl Similarity {

    pub fn new(mut w: Array2<f64>, words: Vec<String>) -> Result<Similarity> {

        if w.nrows() != words.len() {
            return Err(VsmError::shape("vectors and words", format!("{} rows", words.len()), format!("{} rows", w.nrows())));
        }

        // normalize w so each row has l2 norm 1, zero rows stay zero
        for mut row in w.axis_iter_mut(Axis(0)) {
            let row_norm = norm(row.view());
            if row_norm > 0.0 {
                row.mapv_inplace(|a| a / row_norm);
            }
        }

        let t2i = words.iter().enumerate().map(|(i, t)| (t.to_owned(), i)).collect();

        Ok(Self {
            w,
            t2i,
            i2t: words
        })
    }

    pub fn extract_vec_from_word(&self, token: &str) -> Result<Array1<f64>> {
        match self.t2i.get(token) {
            Some(i) => Ok(self.w.row(*i).to_owned()),
            None => Err(VsmError::Configuration(format!("token: {} is not in the vocabulary", token)))
        }
    }

    /// The `k` rows most similar to `vec` by cosine similarity, best first.
    pub fn find_k_most_similar(&self, vec: &Array1<f64>, k: usize) -> Vec<(String, f64)> {

        let vec_norm = norm(vec.view());
        let mut indexed_scores: Vec<(usize, f64)> = self.w.rows().into_iter().enumerate().map(|(i, row)| {
            let row_norm = norm(row);
            (i, 1.0 - cosine_distance(vec.view(), vec_norm, row, row_norm))
        }).collect();

        // sort by most similar in descending order, lower index first on ties
        indexed_scores.sort_by(|(i, s), (j, t)| t.total_cmp(s).then(i.cmp(j)));

        indexed_scores
            .into_iter()
            .take(k)
            .map(|(index, score)| (self.i2t[index].to_owned(), score))
            .collect()
    }

}
