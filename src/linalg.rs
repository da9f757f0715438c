//! Dense numerical routines backing the regression engine.
//!
//! The only algorithm here is a non-negative least squares solver in the
//! Lawson-Hanson active-set formulation, built on [`nalgebra`]. It is
//! consumed as a black box by [`crate::fwhm::PeakParameterFwhm::learn_from`]
//! and deliberately reports numerical failure separately from returning a
//! boundary solution with some coefficients clamped to zero.

use nalgebra::{DMatrix, DVector};
use thiserror::Error;

/// All the ways the constrained solver can fail numerically
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NnlsError {
    #[error("the least squares subproblem is singular or too ill-conditioned to solve")]
    Singular,
    #[error("the active-set iteration did not converge")]
    DidNotConverge,
}

/// Solve `min ||A*x - b||^2` subject to `x >= 0` componentwise.
///
/// `a` is a dense `m x n` design matrix and `b` the `m`-element target
/// vector; the returned solution has `n` non-negative elements. Coordinates
/// that an unconstrained fit would drive negative come back as exactly
/// zero.
pub fn nonnegative_least_squares(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
) -> Result<DVector<f64>, NnlsError> {
    let n = a.ncols();
    let mut passive = vec![false; n];
    let mut x = DVector::<f64>::zeros(n);

    let tolerance = f64::EPSILON * a.nrows().max(n) as f64 * a.amax().max(1.0);
    let mut remaining_iterations = 30 * n.max(1);

    loop {
        // dual vector: the gradient of the residual along each zero-bound
        // coordinate
        let w = a.transpose() * (b - a * &x);

        let mut candidate = None;
        for i in 0..n {
            if !passive[i] && w[i] > tolerance && candidate.is_none_or(|j: usize| w[i] > w[j]) {
                candidate = Some(i);
            }
        }
        // no zero-bound coordinate can improve the residual any further
        let Some(t) = candidate else {
            return Ok(x);
        };
        passive[t] = true;

        loop {
            if remaining_iterations == 0 {
                return Err(NnlsError::DidNotConverge);
            }
            remaining_iterations -= 1;

            let z = solve_for_passive(a, b, &passive)?;
            if (0..n).all(|i| !passive[i] || z[i] > 0.0) {
                x = z;
                break;
            }

            // the unconstrained subproblem left the feasible region; step
            // as far towards it as the bounds allow and drop the
            // coordinates that hit zero
            let mut alpha = f64::INFINITY;
            for i in 0..n {
                if passive[i] && z[i] <= 0.0 {
                    let descent = x[i] - z[i];
                    if descent > 0.0 {
                        alpha = alpha.min(x[i] / descent);
                    }
                }
            }
            if alpha.is_finite() {
                for i in 0..n {
                    if passive[i] {
                        x[i] += alpha * (z[i] - x[i]);
                        if x[i] <= tolerance {
                            x[i] = 0.0;
                            passive[i] = false;
                        }
                    }
                }
            } else {
                // every blocking coordinate already sits on its bound
                for i in 0..n {
                    if passive[i] && z[i] <= 0.0 {
                        x[i] = 0.0;
                        passive[i] = false;
                    }
                }
            }
        }
    }
}

/// Least squares over the passive columns only, zero everywhere else
fn solve_for_passive(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    passive: &[bool],
) -> Result<DVector<f64>, NnlsError> {
    let columns: Vec<usize> = passive
        .iter()
        .enumerate()
        .filter_map(|(i, &included)| included.then_some(i))
        .collect();
    if columns.is_empty() {
        return Ok(DVector::zeros(a.ncols()));
    }

    let subproblem = a.select_columns(columns.iter());
    let solution = subproblem
        .svd(true, true)
        .solve(b, f64::EPSILON.sqrt())
        .map_err(|_| NnlsError::Singular)?;

    let mut z = DVector::zeros(a.ncols());
    for (k, &i) in columns.iter().enumerate() {
        z[i] = solution[k];
    }
    Ok(z)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_recovers_an_exactly_representable_solution() {
        // widths generated from w = 2*sqrt(mz) + 0.5
        let masses = [100.0_f64, 225.0, 400.0, 625.0, 900.0];
        let a = DMatrix::from_fn(masses.len(), 2, |r, c| {
            if c == 0 {
                masses[r].sqrt()
            } else {
                1.0
            }
        });
        let b = DVector::from_iterator(
            masses.len(),
            masses.iter().map(|m| 2.0 * m.sqrt() + 0.5),
        );

        let x = nonnegative_least_squares(&a, &b).unwrap();
        assert!((x[0] - 2.0).abs() < 1e-9, "observed {}", x[0]);
        assert!((x[1] - 0.5).abs() < 1e-9, "observed {}", x[1]);
    }

    #[test]
    fn test_clamps_coefficients_that_would_go_negative() {
        // an unconstrained fit of w = -0.5*x + 4 would make the slope
        // negative; the constrained solution pins it to zero
        let xs = [1.0_f64, 2.0, 3.0, 4.0];
        let a = DMatrix::from_fn(xs.len(), 2, |r, c| if c == 0 { xs[r] } else { 1.0 });
        let b = DVector::from_iterator(xs.len(), xs.iter().map(|x| -0.5 * x + 4.0));

        let x = nonnegative_least_squares(&a, &b).unwrap();
        assert_eq!(x[0], 0.0);
        assert!(x[1] > 0.0);
        assert!(x.iter().all(|v| *v >= 0.0));
    }

    #[test]
    fn test_all_negative_targets_yield_the_zero_solution() {
        let a = DMatrix::from_fn(3, 1, |r, _| (r + 1) as f64);
        let b = DVector::from_column_slice(&[-1.0, -2.0, -3.0]);

        let x = nonnegative_least_squares(&a, &b).unwrap();
        assert_eq!(x[0], 0.0);
    }

    #[test]
    fn test_single_column_projection() {
        let a = DMatrix::from_column_slice(3, 1, &[1.0, 2.0, 2.0]);
        let b = DVector::from_column_slice(&[3.0, 6.0, 6.0]);

        let x = nonnegative_least_squares(&a, &b).unwrap();
        assert!((x[0] - 3.0).abs() < 1e-9);
    }
}
