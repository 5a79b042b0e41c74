// Rank reduction by truncated singular value decomposition.
//
// Components are extracted one at a time by power iteration and deflated out of
// a working copy of the matrix, which needs no LAPACK backend.

use ndarray::{Array1, Array2, Axis};
use ndarray_rand::rand::{rngs::StdRng, SeedableRng};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use tracing::{debug, info};

const MAX_ITER: usize = 300;
const TOLERANCE: f64 = 1e-12;
// singular values below this mean the rank of the matrix is exhausted
const RANK_EPSILON: f64 = 1e-10;

/// Leading singular triplets of a matrix: `u` is (rows x r), `s` has length r, `vt` is (r x cols).
#[derive(Debug)]
pub struct TruncatedSvd {
    pub u: Array2<f64>,
    pub s: Array1<f64>,
    pub vt: Array2<f64>,
}

impl TruncatedSvd {

    /// Computes at most `target_rank` components; fewer when the matrix rank is lower.
    /// Start vectors are drawn from `seed`, so equal inputs give equal outputs.
    pub fn fit(matrix: &Array2<f64>, target_rank: usize, seed: u64) -> TruncatedSvd {

        let (m, n) = matrix.dim();
        let max_rank = target_rank.min(m).min(n);
        let mut rng = StdRng::seed_from_u64(seed);

        let mut work = matrix.to_owned();
        let mut us: Vec<Array1<f64>> = Vec::new();
        let mut ss: Vec<f64> = Vec::new();
        let mut vs: Vec<Array1<f64>> = Vec::new();

        for component in 0..max_rank {

            let start: Array1<f64> = Array1::random_using(n, Uniform::new(-1.0, 1.0), &mut rng);
            let (sigma, mut u, mut v) = match power_iteration(&work, start) {
                Some(triplet) => triplet,
                None => {
                    debug!("rank exhausted after {} components", component);
                    break
                }
            };

            // sign convention: the largest entry of each right vector is positive
            let pivot = v.iter().fold(0.0f64, |best, x| if x.abs() > best.abs() { *x } else { best });
            if pivot < 0.0 {
                u.mapv_inplace(|x| -x);
                v.mapv_inplace(|x| -x);
            }

            // deflate: remove this component from the working matrix
            let outer = &u.view().insert_axis(Axis(1)) * &v.view().insert_axis(Axis(0));
            work.scaled_add(-sigma, &outer);

            us.push(u);
            ss.push(sigma);
            vs.push(v);
        }

        let r = ss.len();
        let mut u = Array2::zeros((m, r));
        let mut vt = Array2::zeros((r, n));
        for i in 0..r {
            u.column_mut(i).assign(&us[i]);
            vt.row_mut(i).assign(&vs[i]);
        }

        Self { u, s: Array1::from_vec(ss), vt }
    }

    /// Row embedding `U * S`.
    pub fn embedding(&self) -> Array2<f64> {
        &self.u * &self.s
    }

}

fn norm(x: &Array1<f64>) -> f64 {
    x.dot(x).sqrt()
}

// returns (sigma, u, v) of the leading component of `matrix`, None if it is numerically zero
fn power_iteration(matrix: &Array2<f64>, start: Array1<f64>) -> Option<(f64, Array1<f64>, Array1<f64>)> {

    let start_norm = norm(&start);
    if start_norm < RANK_EPSILON {
        return None;
    }
    let mut v = start / start_norm;

    for _ in 0..MAX_ITER {
        let av = matrix.dot(&v);
        let sigma = norm(&av);
        if sigma < RANK_EPSILON {
            return None;
        }
        let atu = matrix.t().dot(&(av / sigma));
        let atu_norm = norm(&atu);
        if atu_norm < RANK_EPSILON {
            return None;
        }
        let v_new = atu / atu_norm;
        let change = (&v_new - &v).mapv(f64::abs).sum();
        v = v_new;
        if change < TOLERANCE {
            break;
        }
    }

    let av = matrix.dot(&v);
    let sigma = norm(&av);
    if sigma < RANK_EPSILON {
        return None;
    }
    Some((sigma, av / sigma, v))
}

/// Reduces `matrix` to at most `target_rank` columns preserving maximal variance.
pub fn reduce_dimensionality(matrix: &Array2<f64>, target_rank: usize, seed: u64) -> Array2<f64> {
    let svd = TruncatedSvd::fit(matrix, target_rank, seed);
    info!("reduced dimensionality from {} to {} columns", matrix.ncols(), svd.s.len());
    svd.embedding()
}
