//! Thomas algorithm for tridiagonal systems.

use crate::error::{SolverError, SolverResult};
use nalgebra::{DMatrix, DVector};

/// Row `i` reads `sub[i]*x[i-1] + diag[i]*x[i] + sup[i]*x[i+1] = rhs[i]`.
///
/// `sub[0]` and `sup[n-1]` fall outside the matrix and are ignored.
#[derive(Clone, Debug, PartialEq)]
pub struct TridiagonalSystem {
    pub sub: Vec<f64>,
    pub diag: Vec<f64>,
    pub sup: Vec<f64>,
    pub rhs: Vec<f64>,
}

impl TridiagonalSystem {
    /// All-zero system of size `n`.
    pub fn zeros(n: usize) -> Self {
        Self {
            sub: vec![0.0; n],
            diag: vec![0.0; n],
            sup: vec![0.0; n],
            rhs: vec![0.0; n],
        }
    }

    pub fn len(&self) -> usize {
        self.rhs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rhs.is_empty()
    }

    /// Solve for `x` with the Thomas algorithm.
    pub fn solve(&self) -> SolverResult<Vec<f64>> {
        solve_tridiagonal(&self.sub, &self.diag, &self.sup, &self.rhs)
    }

    /// Weak row diagonal dominance: `|diag[i]| >= |sub[i]| + |sup[i]|` on every row,
    /// ignoring the out-of-matrix corner entries.
    pub fn is_diagonally_dominant(&self) -> bool {
        let n = self.len();
        (0..n).all(|i| {
            let lower = if i > 0 { self.sub[i].abs() } else { 0.0 };
            let upper = if i + 1 < n { self.sup[i].abs() } else { 0.0 };
            self.diag[i].abs() >= lower + upper
        })
    }

    /// Dense copy of the coefficient matrix.
    pub fn to_dense(&self) -> DMatrix<f64> {
        let n = self.len();
        let mut a = DMatrix::zeros(n, n);
        for i in 0..n {
            a[(i, i)] = self.diag[i];
            if i > 0 {
                a[(i, i - 1)] = self.sub[i];
            }
            if i + 1 < n {
                a[(i, i + 1)] = self.sup[i];
            }
        }
        a
    }

    /// Residual `A*x - rhs`.
    pub fn residual(&self, x: &[f64]) -> SolverResult<Vec<f64>> {
        check_len("x", self.len(), x.len())?;
        let ax = self.to_dense() * DVector::from_column_slice(x);
        Ok(ax
            .iter()
            .zip(&self.rhs)
            .map(|(lhs, rhs)| lhs - rhs)
            .collect())
    }
}

fn check_len(what: &'static str, expected: usize, got: usize) -> SolverResult<()> {
    if expected == got {
        Ok(())
    } else {
        Err(SolverError::DimensionMismatch {
            what,
            expected,
            got,
        })
    }
}

/// A pivot is treated as zero when it is lost in the rounding of its own row.
fn check_pivot(row: usize, pivot: f64, row_scale: f64) -> SolverResult<f64> {
    if !pivot.is_finite() || pivot.abs() <= f64::EPSILON * row_scale || pivot == 0.0 {
        tracing::warn!(row, pivot, "tridiagonal pivot vanished");
        return Err(SolverError::SingularSystem { row, pivot });
    }
    Ok(pivot)
}

/// Solve a tridiagonal system without pivoting.
///
/// The caller is responsible for diagonal dominance; if a pivot vanishes anyway
/// the solve stops with [`SolverError::SingularSystem`].
pub fn solve_tridiagonal(
    sub: &[f64],
    diag: &[f64],
    sup: &[f64],
    rhs: &[f64],
) -> SolverResult<Vec<f64>> {
    let n = rhs.len();
    if n == 0 {
        return Err(SolverError::Empty);
    }
    check_len("sub", n, sub.len())?;
    check_len("diag", n, diag.len())?;
    check_len("sup", n, sup.len())?;

    let mut c_prime = vec![0.0; n];
    let mut d_prime = vec![0.0; n];

    // Forward sweep
    let upper0 = if n > 1 { sup[0] } else { 0.0 };
    let pivot = check_pivot(0, diag[0], diag[0].abs() + upper0.abs())?;
    c_prime[0] = upper0 / pivot;
    d_prime[0] = rhs[0] / pivot;

    for i in 1..n {
        let upper = if i + 1 < n { sup[i] } else { 0.0 };
        let row_scale = sub[i].abs() + diag[i].abs() + upper.abs();
        let pivot = check_pivot(i, diag[i] - sub[i] * c_prime[i - 1], row_scale)?;
        c_prime[i] = upper / pivot;
        d_prime[i] = (rhs[i] - sub[i] * d_prime[i - 1]) / pivot;
    }

    // Back substitution
    let mut x = vec![0.0; n];
    x[n - 1] = d_prime[n - 1];
    for i in (0..n - 1).rev() {
        x[i] = d_prime[i] - c_prime[i] * x[i + 1];
    }

    if let Some(row) = x.iter().position(|v| !v.is_finite()) {
        return Err(SolverError::NonFinite { row });
    }

    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_returns_rhs() {
        let n = 5;
        let sys = TridiagonalSystem {
            sub: vec![0.0; n],
            diag: vec![1.0; n],
            sup: vec![0.0; n],
            rhs: vec![1.0, 2.0, 3.0, 4.0, 5.0],
        };
        let x = sys.solve().unwrap();
        assert_eq!(x, sys.rhs);
    }

    #[test]
    fn laplacian_residual_vanishes() {
        // [ 2 -1  0  0]
        // [-1  2 -1  0]
        // [ 0 -1  2 -1]
        // [ 0  0 -1  2]
        let sys = TridiagonalSystem {
            sub: vec![0.0, -1.0, -1.0, -1.0],
            diag: vec![2.0; 4],
            sup: vec![-1.0, -1.0, -1.0, 0.0],
            rhs: vec![1.0, 0.0, 0.0, 1.0],
        };
        let x = sys.solve().unwrap();
        for r in sys.residual(&x).unwrap() {
            assert!(r.abs() < 1e-12);
        }
        // Symmetric system, symmetric load: x = [1, 1, 1, 1]
        for xi in x {
            assert!((xi - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn corner_entries_are_ignored() {
        let mut sys = TridiagonalSystem::zeros(3);
        sys.diag = vec![4.0, 4.0, 4.0];
        sys.sub = vec![99.0, -1.0, -1.0];
        sys.sup = vec![-1.0, -1.0, 99.0];
        sys.rhs = vec![3.0, 2.0, 3.0];
        let x = sys.solve().unwrap();
        for r in sys.residual(&x).unwrap() {
            assert!(r.abs() < 1e-12);
        }
    }

    #[test]
    fn single_row_system() {
        let x = solve_tridiagonal(&[0.0], &[4.0], &[0.0], &[2.0]).unwrap();
        assert_eq!(x, vec![0.5]);
    }

    #[test]
    fn zero_leading_pivot_is_singular() {
        let err = solve_tridiagonal(&[0.0, 1.0], &[0.0, 1.0], &[1.0, 0.0], &[1.0, 1.0])
            .unwrap_err();
        assert!(matches!(err, SolverError::SingularSystem { row: 0, .. }));
    }

    #[test]
    fn eliminated_pivot_is_singular() {
        // Row 1 becomes 1 - 1*1 = 0 after elimination.
        let err = solve_tridiagonal(&[0.0, 1.0], &[1.0, 1.0], &[1.0, 0.0], &[1.0, 2.0])
            .unwrap_err();
        assert!(matches!(err, SolverError::SingularSystem { row: 1, .. }));
    }

    #[test]
    fn length_mismatch_rejected() {
        let err = solve_tridiagonal(&[0.0], &[1.0, 1.0], &[0.0, 0.0], &[1.0, 1.0]).unwrap_err();
        assert_eq!(
            err,
            SolverError::DimensionMismatch {
                what: "sub",
                expected: 2,
                got: 1
            }
        );
        assert_eq!(solve_tridiagonal(&[], &[], &[], &[]), Err(SolverError::Empty));
    }

    #[test]
    fn dominance_check() {
        let sys = TridiagonalSystem {
            sub: vec![0.0, -1.0, -1.0],
            diag: vec![2.0, 2.0, 2.0],
            sup: vec![-1.0, -1.0, 0.0],
            rhs: vec![0.0; 3],
        };
        assert!(sys.is_diagonally_dominant());
        let mut weak = sys.clone();
        weak.diag[1] = 1.5;
        assert!(!weak.is_diagonally_dominant());
    }
}
