// ─────────────────────────────────────────────────────────────────────
// SCPN Cosmo Core — Cubic Spline
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Natural cubic spline through strictly increasing knots.
//!
//! Evaluation never extrapolates: points outside the knot range (beyond a
//! relative slack of `DOMAIN_SLACK`) are reported as `NumericalDivergence`.

use crate::tridiag::solve_tridiagonal;
use cosmo_types::constants::DOMAIN_SLACK;
use cosmo_types::error::{CosmoError, CosmoResult};
use ndarray::Array1;

#[derive(Debug, Clone)]
pub struct CubicSpline {
    x: Array1<f64>,
    y: Array1<f64>,
    /// Second derivatives at the knots; zero at both ends.
    curvature: Array1<f64>,
}

impl CubicSpline {
    pub fn new(x: Array1<f64>, y: Array1<f64>) -> CosmoResult<Self> {
        let n = x.len();
        if n != y.len() {
            return Err(CosmoError::precondition(format!(
                "spline knots and values differ in length: {} vs {}",
                n,
                y.len()
            )));
        }
        if n < 2 {
            return Err(CosmoError::precondition(format!(
                "spline needs at least 2 knots, got {n}"
            )));
        }
        if let Some(bad) = x.iter().chain(y.iter()).find(|v| !v.is_finite()) {
            return Err(CosmoError::precondition(format!(
                "spline input contains non-finite value {bad}"
            )));
        }
        if let Some(i) = (1..n).find(|&i| x[i] <= x[i - 1]) {
            return Err(CosmoError::precondition(format!(
                "spline knots must be strictly increasing: x[{}]={} >= x[{}]={}",
                i - 1,
                x[i - 1],
                i,
                x[i]
            )));
        }

        let mut curvature = Array1::zeros(n);
        if n > 2 {
            let m = n - 2;
            let mut sub = vec![0.0; m];
            let mut diag = vec![0.0; m];
            let mut sup = vec![0.0; m];
            let mut rhs = vec![0.0; m];
            for row in 0..m {
                let i = row + 1;
                let h0 = x[i] - x[i - 1];
                let h1 = x[i + 1] - x[i];
                sub[row] = h0;
                diag[row] = 2.0 * (h0 + h1);
                sup[row] = h1;
                rhs[row] = 6.0 * ((y[i + 1] - y[i]) / h1 - (y[i] - y[i - 1]) / h0);
            }
            let interior = solve_tridiagonal(&sub, &diag, &sup, &rhs)?;
            for (row, value) in interior.into_iter().enumerate() {
                curvature[row + 1] = value;
            }
        }

        Ok(CubicSpline { x, y, curvature })
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.x[0], self.x[self.x.len() - 1])
    }

    pub fn knots(&self) -> &Array1<f64> {
        &self.x
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.y
    }

    /// Whether `x` lies inside the knot range, allowing for roundoff.
    pub fn contains(&self, x: f64) -> bool {
        let (lo, hi) = self.domain();
        let slack = DOMAIN_SLACK * (hi - lo).max(lo.abs()).max(hi.abs());
        x >= lo - slack && x <= hi + slack
    }

    pub fn eval(&self, x: f64) -> CosmoResult<f64> {
        if !self.contains(x) {
            let (lo, hi) = self.domain();
            return Err(CosmoError::divergence(
                "cubic spline",
                format!("x={x} outside interpolation domain [{lo}, {hi}]"),
            ));
        }
        let n = self.x.len();
        let (lo, hi) = self.domain();
        let x = x.clamp(lo, hi);

        // Segment i spans [x[i], x[i+1]].
        let i = self
            .x
            .as_slice()
            .map(|xs| xs.partition_point(|&k| k <= x))
            .unwrap_or_else(|| self.x.iter().take_while(|&&k| k <= x).count())
            .clamp(1, n - 1)
            - 1;

        let h = self.x[i + 1] - self.x[i];
        let a = (self.x[i + 1] - x) / h;
        let b = (x - self.x[i]) / h;
        Ok(a * self.y[i]
            + b * self.y[i + 1]
            + ((a * a * a - a) * self.curvature[i] + (b * b * b - b) * self.curvature[i + 1])
                * h
                * h
                / 6.0)
    }
}
