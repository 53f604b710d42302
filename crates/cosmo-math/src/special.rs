// ─────────────────────────────────────────────────────────────────────
// SCPN Cosmo Core — Special Functions
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Legendre polynomials and spherical Bessel functions of the first kind.
//!
//! `spherical_bessel_j` switches between two exact representations:
//! - `x < ell + 2`: ascending power series (no cancellation near the origin)
//! - otherwise: the finite trigonometric form
//!   j_ell(x) = Σ_{k=0}^{ell} b_k x^{-(k+1)} cos(x - (ell+1-k)π/2),
//!   b_k = (ell+k)! / (k! (ell-k)! 2^k)

use statrs::function::gamma::ln_gamma;
use std::f64::consts::{FRAC_PI_2, LN_2, PI};

/// Legendre polynomial P_ell(mu) by the three-term recurrence.
pub fn legendre(ell: usize, mu: f64) -> f64 {
    match ell {
        0 => 1.0,
        1 => mu,
        _ => {
            let mut p_prev = 1.0;
            let mut p = mu;
            for n in 2..=ell {
                let nf = n as f64;
                let p_next = ((2.0 * nf - 1.0) * mu * p - (nf - 1.0) * p_prev) / nf;
                p_prev = p;
                p = p_next;
            }
            p
        }
    }
}

/// ln((2 ell + 1)!!) = ln(2^(ell+1) Γ(ell + 3/2) / √π).
pub fn ln_double_factorial_odd(ell: usize) -> f64 {
    let l = ell as f64;
    (l + 1.0) * LN_2 + ln_gamma(l + 1.5) - 0.5 * PI.ln()
}

/// Spherical Bessel function j_ell(x) for x >= 0.
pub fn spherical_bessel_j(ell: usize, x: f64) -> f64 {
    debug_assert!(x >= 0.0, "spherical_bessel_j requires x >= 0, got {x}");
    if x == 0.0 {
        return if ell == 0 { 1.0 } else { 0.0 };
    }
    if x < ell as f64 + 2.0 {
        bessel_series(ell, x)
    } else {
        bessel_trig(ell, x)
    }
}

fn bessel_series(ell: usize, x: f64) -> f64 {
    // x^ell / (2ell+1)!! built as a running product to avoid overflow.
    let mut prefactor = 1.0;
    for i in 1..=ell {
        prefactor *= x / (2 * i + 1) as f64;
    }

    let half_x2 = 0.5 * x * x;
    let two_l = 2.0 * ell as f64;
    let mut term = 1.0;
    let mut sum = 1.0;
    for k in 1..200 {
        let kf = k as f64;
        term *= -half_x2 / (kf * (two_l + 2.0 * kf + 1.0));
        sum += term;
        if term.abs() < 1e-17 * sum.abs() {
            break;
        }
    }
    prefactor * sum
}

fn bessel_trig(ell: usize, x: f64) -> f64 {
    let l = ell as f64;
    let mut b = 1.0;
    let mut x_pow = x;
    let mut sum = 0.0;
    for k in 0..=ell {
        if k > 0 {
            let kf = k as f64;
            b *= (l + kf) * (l - kf + 1.0) / (2.0 * kf);
            x_pow *= x;
        }
        let phase = x - (l + 1.0 - k as f64) * FRAC_PI_2;
        sum += b * phase.cos() / x_pow;
    }
    sum
}

/// Coefficients b_k of the trigonometric form, k = 0..=ell.
pub fn bessel_trig_coefficients(ell: usize) -> Vec<f64> {
    let l = ell as f64;
    let mut out = Vec::with_capacity(ell + 1);
    let mut b = 1.0;
    out.push(b);
    for k in 1..=ell {
        let kf = k as f64;
        b *= (l + kf) * (l - kf + 1.0) / (2.0 * kf);
        out.push(b);
    }
    out
}
