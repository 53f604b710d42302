// ─────────────────────────────────────────────────────────────────────
// SCPN Cosmo Core — Transform Sizing
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Discretization parameters of the log-spaced spherical Bessel transform.
//!
//! With bias exponent q = (1 - ell)/2 the kernel h(u) = x^q j_ell(x),
//! x = e^u, has an envelope decaying like exp(-a |u - ln kr0|) on both
//! sides of kr0 = ((2ell+1)!!)^(1/(ell+1)), where a = (1 + ell)/2.
//!
//! The kernel is kept over a half width of t/a log units, where t solves
//! t·e^(-t) = veps. The envelope at the cut is then eps = e^(-t), so the
//! discarded mass relative to the kept mass is about veps. The upper cut is
//! moved outward to x = (ell+1)π/2 + mπ, where the leading term of the
//! kernel's asymptotic tail integral vanishes.
//!
//! The step resolves the kernel oscillation (π/(a t)), never exceeds
//! ln(10)/40 and shrinks like veps^(1/3), since the signal is interpolated
//! by cubic pieces between samples.

use cosmo_math::special::ln_double_factorial_odd;
use cosmo_types::constants::{MAX_LOG_STEP, MAX_TOLERANCE, STEP_TOLERANCE_SCALE};
use cosmo_types::error::{CosmoError, CosmoResult};
use log::debug;
use std::f64::consts::{FRAC_PI_2, PI};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformSizing {
    pub ell: usize,
    pub tolerance: f64,
    /// Solution of t·e^(-t) = tolerance.
    pub t: f64,
    /// Kernel envelope at the cut, e^(-t).
    pub eps: f64,
    /// Bias exponent q = (1 - ell)/2.
    pub bias_exponent: f64,
    /// Characteristic wavenumber-radius product.
    pub kr0: f64,
    /// Kernel half width in ln(kr), after snapping.
    pub half_width: f64,
    /// Settling steps on each side of the kernel centre (nsf).
    pub settling_steps: usize,
    /// Log step (dsf).
    pub log_step: f64,
}

impl TransformSizing {
    /// Number of nonzero kernel samples, 2·nsf + 1.
    pub fn kernel_len(&self) -> usize {
        2 * self.settling_steps + 1
    }

    /// Lower and upper kr bounds of the kernel window.
    pub fn kernel_window(&self) -> (f64, f64) {
        (
            self.kr0 * (-self.half_width).exp(),
            self.kr0 * self.half_width.exp(),
        )
    }

    /// Samples per decade implied by the log step.
    pub fn samples_per_decade(&self) -> f64 {
        std::f64::consts::LN_10 / self.log_step
    }
}

/// Validate the (ell, tolerance) pair shared by every transform request.
pub fn check_sizing_inputs(ell: usize, tolerance: f64) -> CosmoResult<()> {
    if ell % 2 != 0 {
        return Err(CosmoError::precondition(format!(
            "multipole order must be even, got ell={ell}"
        )));
    }
    if !(tolerance > 0.0 && tolerance < MAX_TOLERANCE) {
        return Err(CosmoError::precondition(format!(
            "tolerance must lie in (0, {MAX_TOLERANCE}), got {tolerance}"
        )));
    }
    Ok(())
}

/// Lower-branch solution of t·e^(-t) = veps for 0 < veps < 1/e, from the
/// asymptotic expansion of -W_{-1}(-veps) in a = ln(1/veps), L = ln a.
pub fn settling_parameter(veps: f64) -> f64 {
    let a = -veps.ln();
    let l = a.ln();
    a + l + l / a - l * (l - 2.0) / (2.0 * a * a)
        + l * (6.0 - 9.0 * l + 2.0 * l * l) / (6.0 * a * a * a)
}

/// kr0 = ((2ell+1)!!)^(1/(ell+1)), where the small- and large-x envelopes of
/// x^q j_ell(x) cross.
pub fn characteristic_product(ell: usize) -> f64 {
    (ln_double_factorial_odd(ell) / (ell as f64 + 1.0)).exp()
}

pub fn size_transform(ell: usize, tolerance: f64) -> CosmoResult<TransformSizing> {
    check_sizing_inputs(ell, tolerance)?;

    let l = ell as f64;
    let t = settling_parameter(tolerance);
    let eps = (-t).exp();
    let bias_exponent = 0.5 * (1.0 - l);
    let kr0 = characteristic_product(ell);
    let decay = 0.5 * (1.0 + l);

    // Snap the upper edge to a zero of the leading tail term.
    let raw_half_width = t / decay;
    let x_hi_raw = kr0 * raw_half_width.exp();
    let phase0 = (l + 1.0) * FRAC_PI_2;
    let periods = ((x_hi_raw - phase0) / PI).ceil().max(0.0);
    let x_hi = phase0 + periods * PI;
    let half_width = (x_hi / kr0).ln();

    let natural_step = PI / (decay * t);
    let max_step = natural_step
        .min(MAX_LOG_STEP)
        .min(STEP_TOLERANCE_SCALE * tolerance.cbrt());
    let settling_steps = ((half_width / max_step - 0.5).ceil() as usize).max(1);
    let log_step = half_width / (settling_steps as f64 + 0.5);

    let sizing = TransformSizing {
        ell,
        tolerance,
        t,
        eps,
        bias_exponent,
        kr0,
        half_width,
        settling_steps,
        log_step,
    };
    let (x_lo, x_hi) = sizing.kernel_window();
    debug!(
        "sizing ell={ell} veps={tolerance:e}: t={t:.4} kr0={kr0:.4} kr=[{x_lo:.3e}, {x_hi:.3e}] \
         nsf={settling_steps} dsf={log_step:.5} ({:.1}/decade)",
        sizing.samples_per_decade()
    );
    Ok(sizing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settling_parameter_solves_equation() {
        // The expansion is asymptotic in ln(1/veps): loose near 1/e, tight below 1e-2.
        for &(veps, bound) in &[(0.3, 0.05), (0.1, 0.02), (1e-2, 2e-3), (1e-3, 2e-3), (1e-5, 1e-3), (1e-8, 1e-3)] {
            let t = settling_parameter(veps);
            let residual = t * (-t).exp() / veps - 1.0;
            assert!(residual.abs() < bound, "veps={veps}: t={t}, residual {residual}");
            assert!(t > 1.0, "lower branch has t > 1");
        }
    }

    #[test]
    fn test_characteristic_product() {
        assert!((characteristic_product(0) - 1.0).abs() < 1e-12);
        assert!((characteristic_product(2) - 15f64.cbrt()).abs() < 1e-12);
        assert!((characteristic_product(4) - 945f64.powf(0.2)).abs() < 1e-10);
    }

    #[test]
    fn test_upper_edge_is_snapped() {
        for ell in [0usize, 2, 4, 6] {
            let s = size_transform(ell, 1e-3).unwrap();
            let (_, x_hi) = s.kernel_window();
            let phase = (x_hi - (ell as f64 + 1.0) * FRAC_PI_2) / PI;
            assert!((phase - phase.round()).abs() < 1e-6, "ell={ell}: phase {phase}");
            assert!(s.half_width >= s.t / (0.5 * (1.0 + ell as f64)));
        }
    }

    #[test]
    fn test_step_is_bounded_and_tiles_window() {
        for ell in [0usize, 2, 4, 8] {
            for &veps in &[0.3f64, 1e-2, 1e-4] {
                let s = size_transform(ell, veps).unwrap();
                assert!(s.log_step <= MAX_LOG_STEP * (1.0 + 1e-12));
                assert!(s.log_step <= STEP_TOLERANCE_SCALE * veps.cbrt() * (1.0 + 1e-12));
                assert!(s.samples_per_decade() >= 40.0 - 1e-9);
                let tiled = (s.settling_steps as f64 + 0.5) * s.log_step;
                assert!((tiled - s.half_width).abs() < 1e-12);
                assert!(s.settling_steps >= 1);
            }
        }
    }

    #[test]
    fn test_bias_exponent() {
        assert_eq!(size_transform(0, 1e-3).unwrap().bias_exponent, 0.5);
        assert_eq!(size_transform(2, 1e-3).unwrap().bias_exponent, -0.5);
        assert_eq!(size_transform(4, 1e-3).unwrap().bias_exponent, -1.5);
    }

    #[test]
    fn test_tighter_tolerance_needs_wider_kernel() {
        let loose = size_transform(0, 1e-2).unwrap();
        let tight = size_transform(0, 1e-4).unwrap();
        assert!(tight.half_width > loose.half_width);
        assert!(tight.settling_steps > loose.settling_steps);
        assert!(tight.eps < loose.eps);
    }

    #[test]
    fn test_step_shrinks_with_tolerance() {
        // Interpolation error ~ step³ must follow veps down.
        for ell in [0usize, 2, 4] {
            let steps: Vec<f64> = [1e-2, 1e-3, 1e-4, 1e-6]
                .iter()
                .map(|&veps| size_transform(ell, veps).unwrap().log_step)
                .collect();
            for w in steps.windows(2) {
                assert!(w[1] < w[0], "ell={ell}: steps {steps:?}");
            }
            let tight = size_transform(ell, 1e-6).unwrap();
            assert!(tight.log_step.powi(3) <= STEP_TOLERANCE_SCALE.powi(3) * 1e-6 * (1.0 + 1e-9));
        }
    }

    #[test]
    fn test_rejects_invalid_inputs() {
        for (ell, tol) in [(1usize, 1e-3), (3, 1e-3), (0, 0.35), (0, 0.5), (0, 0.0), (0, -1e-3)] {
            let err = size_transform(ell, tol).unwrap_err();
            assert!(
                matches!(err, CosmoError::PreconditionViolation(_)),
                "ell={ell} tol={tol} should be a precondition violation"
            );
        }
        assert!(size_transform(0, f64::NAN).is_err());
    }
}
