use crate::error::{Result, VsmError};
use crate::similarity::cosine_distances;

use ndarray::{Array1, Array2, ArrayView1, Axis};
use ndarray_stats::QuantileExt;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;
use tracing::info;


/// k-nearest-neighbour classifier under cosine distance.
#[derive(Clone, Copy, Debug)]
pub struct Knn {
    k: usize,
}

impl Knn {

    pub fn new(k: usize) -> Result<Knn> {
        if k == 0 {
            return Err(VsmError::Configuration("k must be positive".to_owned()));
        }
        Ok(Self { k })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Indices of the k closest training points, closest first; equal distances keep
    /// the lower training index first.
    pub fn nearest(&self, distances: ArrayView1<f64>) -> Vec<usize> {
        let mut order: Vec<usize> = (0..distances.len()).collect();
        order.sort_by(|a, b| distances[*a].total_cmp(&distances[*b]).then(a.cmp(b)));
        order.truncate(self.k);
        order
    }

    /// Most frequent label; the smallest label wins a tie.
    pub fn vote(labels: &[usize]) -> Result<usize> {
        // counts of the distinct labels, in ascending label order
        let mut label2count: BTreeMap<usize, usize> = BTreeMap::new();
        for label in labels {
            *label2count.entry(*label).or_insert(0) += 1;
        }
        let distinct: Vec<usize> = label2count.keys().copied().collect();
        let counts: Array1<usize> = label2count.into_values().collect();

        // argmax returns the first maximum
        let best = counts
            .argmax()
            .map_err(|_| VsmError::Configuration("cannot vote over an empty neighbour set".to_owned()))?;
        Ok(distinct[best])
    }

    /// Predicts a label for every row of `test_points`, in row order.
    pub fn classify(&self,
        train_points: &Array2<f64>,
        train_labels: &Array1<usize>,
        test_points: &Array2<f64>,
        num_threads: usize) -> Result<Array1<usize>> {

        let n_train = train_points.nrows();
        if train_labels.len() != n_train {
            return Err(VsmError::shape("training labels", format!("{} labels (one per training point)", n_train), format!("{} labels", train_labels.len())));
        }
        if self.k > n_train {
            return Err(VsmError::Configuration(format!("k ({}) exceeds the number of training points ({})", self.k, n_train)));
        }

        let distances = cosine_distances(test_points, train_points, num_threads)?;
        info!("computed pairwise distances between {} test and {} training points", test_points.nrows(), n_train);

        let mut predictions = Vec::with_capacity(distances.nrows());
        for row in distances.axis_iter(Axis(0)) {
            let neighbour_labels: Vec<usize> = self.nearest(row).iter().map(|i| train_labels[*i]).collect();
            predictions.push(Knn::vote(&neighbour_labels)?);
        }

        Ok(Array1::from_vec(predictions))
    }

}


/// Rows of a point matrix separated into training and test sets.
#[derive(Debug)]
pub struct Split {
    pub train_points: Array2<f64>,
    pub train_labels: Array1<usize>,
    pub test_points: Array2<f64>,
    pub test_labels: Array1<usize>,
    /// original row index of every test point
    pub test_rows: Vec<usize>,
}

impl Split {

    /// Splits rows by an indicator that is 0 for training rows and 1 for test rows.
    pub fn from_mask(points: &Array2<f64>, labels: &Array1<usize>, mask: &Array1<usize>) -> Result<Split> {

        let n = points.nrows();
        if labels.len() != n {
            return Err(VsmError::shape("category labels", format!("{} rows", n), format!("{} rows", labels.len())));
        }
        if mask.len() != n {
            return Err(VsmError::shape("train/test split", format!("{} rows", n), format!("{} rows", mask.len())));
        }

        let mut train_rows = Vec::new();
        let mut test_rows = Vec::new();
        for (i, indicator) in mask.iter().enumerate() {
            match indicator {
                0 => train_rows.push(i),
                1 => test_rows.push(i),
                other => return Err(VsmError::Configuration(format!("split indicator at row {} is {}, expected 0 or 1", i, other)))
            }
        }

        Ok(Self {
            train_points: points.select(Axis(0), &train_rows),
            train_labels: labels.select(Axis(0), &train_rows),
            test_points: points.select(Axis(0), &test_rows),
            test_labels: labels.select(Axis(0), &test_rows),
            test_rows,
        })
    }

    /// A reproducible indicator with `round(n * test_fraction)` test rows.
    pub fn random_mask(n: usize, test_fraction: f64, seed: u64) -> Array1<usize> {
        let n_test = ((n as f64) * test_fraction).round() as usize;
        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(&mut StdRng::seed_from_u64(seed));

        let mut mask = Array1::zeros(n);
        for i in order.into_iter().take(n_test) {
            mask[i] = 1;
        }
        mask
    }

}

/// Share of matching labels, in percent. Empty inputs give 0.
pub fn accuracy(actual: &Array1<usize>, predicted: &Array1<usize>) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let correct = actual.iter().zip(predicted.iter()).filter(|(a, p)| a == p).count();
    100.0 * correct as f64 / actual.len() as f64
}
