use ndarray::{Array1, Array2, Axis, Zip};
use tracing::{info, warn};


/// Tracks which columns of a count matrix survive the PPMI transform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnMap {
    retained: Vec<usize>,
    original_to_retained: Vec<Option<usize>>,
}

impl ColumnMap {

    fn from_column_sums(col_sums: &Array1<f64>) -> ColumnMap {
        let mut retained = Vec::new();
        let original_to_retained = col_sums
            .iter()
            .enumerate()
            .map(|(j, sum)| {
                if *sum > 0.0 {
                    retained.push(j);
                    Some(retained.len() - 1)
                } else {
                    None
                }
            })
            .collect();
        Self { retained, original_to_retained }
    }

    /// Original indices of the retained columns, in order.
    pub fn retained(&self) -> &[usize] {
        &self.retained
    }

    /// Position of an original column in the transformed matrix, `None` if it was dropped.
    pub fn original_to_retained(&self, original: usize) -> Option<usize> {
        self.original_to_retained.get(original).copied().flatten()
    }

    pub fn n_original(&self) -> usize {
        self.original_to_retained.len()
    }

    pub fn len(&self) -> usize {
        self.retained.len()
    }

    pub fn is_empty(&self) -> bool {
        self.retained.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct PpmiMatrix {
    pub values: Array2<f64>,
    pub columns: ColumnMap,
}

pub struct Ppmi {}

impl Ppmi {

    /// Positive pointwise mutual information of a nonnegative count matrix
    /// (rows are targets, columns are contexts).
    ///
    /// Columns that sum to zero are dropped first. Every value whose log is
    /// negative or undefined becomes exactly `0.0`, and a row whose total is
    /// zero comes out as all zeros.
    pub fn transform(counts: &Array2<f64>) -> PpmiMatrix {

        // count of each context, drop the contexts that never appeared
        let col_sums = counts.sum_axis(Axis(0));
        let columns = ColumnMap::from_column_sums(&col_sums);
        let col_totals = col_sums.select(Axis(0), columns.retained());
        let mut values = counts.select(Axis(1), columns.retained());

        // count of each target and of the whole matrix
        let row_totals = values.sum_axis(Axis(1));
        let grand_total = col_totals.sum();

        let empty_rows = row_totals.iter().filter(|total| **total == 0.0).count();
        if empty_rows > 0 {
            warn!("{} rows have no counts, their PPMI values are set to 0", empty_rows);
        }

        // p(x, y) / (p(x) * p(y)) on the log scale, floored at 0
        Zip::from(values.rows_mut()).and(&row_totals).for_each(|mut row, &row_total| {
            if row_total == 0.0 {
                row.fill(0.0);
                return;
            }
            Zip::from(&mut row).and(&col_totals).for_each(|x, &col_total| {
                let pmi = (*x / row_total / col_total * grand_total).log2();
                *x = if pmi > 0.0 { pmi } else { 0.0 };
            });
        });

        info!("converted to positive pointwise mutual information, kept {} of {} columns", columns.len(), columns.n_original());

        PpmiMatrix { values, columns }
    }

}


#[cfg(test)]
mod tests {

    use super::Ppmi;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array2};

    fn assert_close(actual: &Array2<f64>, expected: &Array2<f64>) {
        assert_eq!(actual.dim(), expected.dim());
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(*a, *e, epsilon = 1e-12);
        }
    }

    #[test]
    fn golden_ppmi_test() {
        // counts of the corpus "a b a / b c" with window 1
        // row sums 4 4 2, column sums 2 3 1 2 2, total 10
        let counts = array![
            [0.0, 2.0, 0.0, 1.0, 1.0],
            [2.0, 0.0, 1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0, 0.0, 1.0]
        ];
        let ppmi = Ppmi::transform(&counts);
        // 2*10/(4*3), 1*10/(4*2) and 2*10/(4*2)
        let l53 = (5.0f64 / 3.0).log2();
        let l125 = 1.25f64.log2();
        let l25 = 2.5f64.log2();
        let golden = array![
            [0.0, l53, 0.0, l125, l125],
            [l25, 0.0, l25, l125, 0.0],
            [0.0, l53, 0.0, 0.0, l25]
        ];
        assert_close(&ppmi.values, &golden);
        assert_eq!(ppmi.columns.retained(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn negative_association_is_floored_test() {
        let counts = array![[4.0, 1.0], [1.0, 4.0]];
        let ppmi = Ppmi::transform(&counts);
        let diag = 1.6f64.log2();
        assert_close(&ppmi.values, &array![[diag, 0.0], [0.0, diag]]);
        assert!(ppmi.values.iter().all(|x| *x >= 0.0));
    }

    #[test]
    fn zero_columns_are_dropped_test() {
        let counts = array![[1.0, 0.0, 2.0, 0.0], [3.0, 0.0, 0.0, 0.0]];
        let ppmi = Ppmi::transform(&counts);

        assert_eq!(ppmi.values.dim(), (2, 2));
        assert_eq!(ppmi.columns.retained(), &[0, 2]);
        assert_eq!(ppmi.columns.original_to_retained(0), Some(0));
        assert_eq!(ppmi.columns.original_to_retained(1), None);
        assert_eq!(ppmi.columns.original_to_retained(2), Some(1));
        assert_eq!(ppmi.columns.original_to_retained(3), None);
        assert_eq!(ppmi.columns.original_to_retained(9), None);
        assert_eq!(ppmi.columns.n_original(), 4);

        assert_close(&ppmi.values, &array![[0.0, 1.0], [1.5f64.log2(), 0.0]]);
    }

    #[test]
    fn zero_row_gives_zeros_test() {
        let counts = array![[0.0, 0.0], [1.0, 2.0], [3.0, 1.0]];
        let ppmi = Ppmi::transform(&counts);
        assert_eq!(ppmi.values.dim(), (3, 2));
        assert!(ppmi.values.iter().all(|x| x.is_finite() && *x >= 0.0));
        assert_eq!(ppmi.values.row(0).to_vec(), vec![0.0, 0.0]);
    }

    #[test]
    fn all_zero_matrix_test() {
        let counts: Array2<f64> = Array2::zeros((3, 5));
        let ppmi = Ppmi::transform(&counts);
        assert_eq!(ppmi.values.dim(), (3, 0));
        assert!(ppmi.columns.is_empty());
    }

    #[test]
    fn input_is_untouched_test() {
        let counts = array![[1.0, 0.0, 2.0], [3.0, 0.0, 5.0]];
        let copy = counts.clone();
        let _ = Ppmi::transform(&counts);
        assert_eq!(counts, copy);
    }
}
