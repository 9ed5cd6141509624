//! Dense linear solver.

use nalgebra::{DMatrix, DVector};

use crate::error::{Error, Result};

/// Pivots smaller in magnitude than this are treated as singular.
const PIVOT_TOLERANCE: f64 = 1e-15;

/// Solve `A x = b` by Gaussian elimination with partial pivoting.
///
/// Works on copies of the inputs; O(n^3). At each column the pivot row
/// maximizes the absolute value at or below the diagonal, and a pivot
/// under [`PIVOT_TOLERANCE`] reports [`Error::Singular`].
pub fn solve_dense(a: &DMatrix<f64>, b: &DVector<f64>) -> Result<DVector<f64>> {
    let n = a.nrows();
    if a.ncols() != n {
        return Err(Error::DimensionMismatch {
            expected: n,
            actual: a.ncols(),
        });
    }
    if b.len() != n {
        return Err(Error::DimensionMismatch {
            expected: n,
            actual: b.len(),
        });
    }

    let mut m = a.clone();
    let mut rhs = b.clone();

    for k in 0..n {
        let mut p = k;
        let mut max_v = m[(k, k)].abs();
        for i in (k + 1)..n {
            let v = m[(i, k)].abs();
            if v > max_v {
                max_v = v;
                p = i;
            }
        }
        if max_v < PIVOT_TOLERANCE {
            return Err(Error::Singular);
        }
        if p != k {
            m.swap_rows(k, p);
            rhs.swap_rows(k, p);
        }

        let pivot = m[(k, k)];
        for i in (k + 1)..n {
            let factor = m[(i, k)] / pivot;
            if factor == 0.0 {
                continue;
            }
            for j in k..n {
                m[(i, j)] -= factor * m[(k, j)];
            }
            rhs[i] -= factor * rhs[k];
        }
    }

    let mut x = DVector::zeros(n);
    for i in (0..n).rev() {
        let mut sum = rhs[i];
        for j in (i + 1)..n {
            sum -= m[(i, j)] * x[j];
        }
        x[i] = sum / m[(i, i)];
    }

    Ok(x)
}
