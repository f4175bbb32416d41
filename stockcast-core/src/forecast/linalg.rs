//! Ridge-regularized least squares over `ndarray` matrices.

use ndarray::{Array1, Array2};

/// Solve `(XᵀX + diag(penalty)) β = Xᵀy`. `None` if the system is not positive definite.
pub fn ridge_solve(x: &Array2<f64>, y: &Array1<f64>, penalty: &Array1<f64>) -> Option<Array1<f64>> {
    if x.nrows() != y.len() || x.ncols() != penalty.len() {
        return None;
    }
    let xt = x.t();
    let mut xtx = xt.dot(x);
    xtx.diag_mut().zip_mut_with(penalty, |d, &l| *d += l);
    let xty = xt.dot(y);
    cholesky_solve(&xtx, &xty)
}

/// Solve `A x = b` for symmetric positive definite `A`.
pub fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    if a.ncols() != n || b.len() != n {
        return None;
    }

    // A = L Lᵀ
    let mut l = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        for j in 0..=i {
            let mut sum = 0.0;
            for k in 0..j {
                sum += l[[i, k]] * l[[j, k]];
            }
            if i == j {
                let diag = a[[i, i]] - sum;
                if diag <= 0.0 || !diag.is_finite() {
                    return None;
                }
                l[[i, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    // L z = b
    let mut z = Array1::<f64>::zeros(n);
    for i in 0..n {
        let mut sum = 0.0;
        for j in 0..i {
            sum += l[[i, j]] * z[j];
        }
        z[i] = (b[i] - sum) / l[[i, i]];
    }

    // Lᵀ x = z
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let mut sum = 0.0;
        for j in (i + 1)..n {
            sum += l[[j, i]] * x[j];
        }
        x[i] = (z[i] - sum) / l[[i, i]];
    }

    Some(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array};

    #[test]
    fn solves_small_spd_system() {
        let a = array![[4.0, 2.0], [2.0, 3.0]];
        let x = cholesky_solve(&a, &array![2.0, 1.0]).unwrap();
        assert!((x[0] - 0.5).abs() < 1e-12);
        assert!(x[1].abs() < 1e-12);
    }

    #[test]
    fn rejects_singular_system() {
        let a = Array2::<f64>::zeros((2, 2));
        assert!(cholesky_solve(&a, &array![1.0, 1.0]).is_none());
    }

    #[test]
    fn rejects_mismatched_shapes() {
        let x = Array2::<f64>::ones((3, 2));
        assert!(ridge_solve(&x, &array![1.0, 2.0], &array![0.0, 0.0]).is_none());
        assert!(ridge_solve(&x, &array![1.0, 2.0, 3.0], &array![0.0]).is_none());
    }

    #[test]
    fn ridge_solve_recovers_line() {
        // y = 3 + 2x
        let t = Array::linspace(0.0, 9.0, 10);
        let mut x = Array2::<f64>::ones((10, 2));
        x.column_mut(1).assign(&t);
        let y = t.mapv(|v| 3.0 + 2.0 * v);
        let beta = ridge_solve(&x, &y, &array![0.0, 0.0]).unwrap();
        assert!((beta[0] - 3.0).abs() < 1e-9);
        assert!((beta[1] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn penalty_shrinks_coefficients() {
        let t = Array::linspace(0.0, 9.0, 10);
        let mut x = Array2::<f64>::ones((10, 2));
        x.column_mut(1).assign(&t);
        let y = t.mapv(|v| 3.0 + 2.0 * v);
        let free = ridge_solve(&x, &y, &array![0.0, 0.0]).unwrap();
        let shrunk = ridge_solve(&x, &y, &array![0.0, 1e4]).unwrap();
        assert!(shrunk[1].abs() < free[1].abs());
    }
}
