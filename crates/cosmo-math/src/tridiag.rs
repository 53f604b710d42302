// ─────────────────────────────────────────────────────────────────────
// SCPN Cosmo Core — Tridiag
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Thomas algorithm for tridiagonal systems.
//!
//! Used by the natural cubic spline to solve for knot second derivatives.

use cosmo_types::error::{CosmoError, CosmoResult};

/// Solve tridiagonal system Ax = d using the Thomas algorithm.
///
/// - `sub`: sub-diagonal \[n\] (sub\[0\] unused)
/// - `diag`: main diagonal \[n\]
/// - `sup`: super-diagonal \[n\] (sup\[n-1\] unused)
/// - `rhs`: right-hand side \[n\]
///
/// Fails with `PreconditionViolation` on mismatched lengths and with
/// `NumericalDivergence` when a pivot vanishes.
pub fn solve_tridiagonal(
    sub: &[f64],
    diag: &[f64],
    sup: &[f64],
    rhs: &[f64],
) -> CosmoResult<Vec<f64>> {
    let n = rhs.len();
    if n == 0 {
        return Err(CosmoError::precondition("tridiagonal system size must be > 0"));
    }
    if sub.len() != n || diag.len() != n || sup.len() != n {
        return Err(CosmoError::precondition(format!(
            "tridiagonal bands must all have length {n}, got sub={}, diag={}, sup={}",
            sub.len(),
            diag.len(),
            sup.len()
        )));
    }

    let pivot = |value: f64, row: usize| -> CosmoResult<f64> {
        if value == 0.0 || !value.is_finite() {
            Err(CosmoError::divergence(
                "tridiagonal solve",
                format!("singular pivot {value} at row {row}"),
            ))
        } else {
            Ok(value)
        }
    };

    let mut c_prime = vec![0.0; n];
    let mut d_prime = vec![0.0; n];

    // Forward sweep
    let den = pivot(diag[0], 0)?;
    c_prime[0] = sup[0] / den;
    d_prime[0] = rhs[0] / den;

    for i in 1..n {
        let den = pivot(diag[i] - sub[i] * c_prime[i - 1], i)?;
        if i < n - 1 {
            c_prime[i] = sup[i] / den;
        }
        d_prime[i] = (rhs[i] - sub[i] * d_prime[i - 1]) / den;
    }

    // Back substitution
    let mut x = vec![0.0; n];
    x[n - 1] = d_prime[n - 1];
    for i in (0..n - 1).rev() {
        x[i] = d_prime[i] - c_prime[i] * x[i + 1];
    }

    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_system() {
        let n = 5;
        let sub = vec![0.0; n];
        let diag = vec![1.0; n];
        let sup = vec![0.0; n];
        let rhs = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let x = solve_tridiagonal(&sub, &diag, &sup, &rhs).unwrap();
        for i in 0..n {
            assert!((x[i] - rhs[i]).abs() < 1e-12, "x[{i}] should equal rhs[{i}]");
        }
    }

    #[test]
    fn test_spline_pattern_residual() {
        // Natural-spline interior rows: h, 2(h0+h1), h
        let sub = vec![0.0, 0.5, 0.5, 0.5];
        let diag = vec![2.0, 2.0, 2.0, 2.0];
        let sup = vec![0.5, 0.5, 0.5, 0.0];
        let rhs = vec![1.0, -2.0, 0.5, 3.0];
        let x = solve_tridiagonal(&sub, &diag, &sup, &rhs).unwrap();

        let ax = [
            diag[0] * x[0] + sup[0] * x[1],
            sub[1] * x[0] + diag[1] * x[1] + sup[1] * x[2],
            sub[2] * x[1] + diag[2] * x[2] + sup[2] * x[3],
            sub[3] * x[2] + diag[3] * x[3],
        ];
        for i in 0..4 {
            assert!(
                (ax[i] - rhs[i]).abs() < 1e-12,
                "Ax[{i}] = {}, expected {}",
                ax[i],
                rhs[i]
            );
        }
    }

    #[test]
    fn test_zero_pivot_is_divergence() {
        let err = solve_tridiagonal(&[0.0, 1.0], &[0.0, 1.0], &[1.0, 0.0], &[1.0, 1.0])
            .unwrap_err();
        assert!(matches!(err, CosmoError::NumericalDivergence { .. }));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let err = solve_tridiagonal(&[0.0], &[1.0, 1.0], &[0.0, 0.0], &[1.0, 1.0]).unwrap_err();
        assert!(matches!(err, CosmoError::PreconditionViolation(_)));
        assert!(solve_tridiagonal(&[], &[], &[], &[]).is_err());
    }
}
