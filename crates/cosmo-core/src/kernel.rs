// ─────────────────────────────────────────────────────────────────────
// SCPN Cosmo Core — Transform Kernel Weights
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Discrete kernel of the log-spaced transform.
//!
//! Between samples the biased signal s(u) is taken to be the cubic
//! convolution (Keys, a = -1/2) interpolant of its samples, s(u) =
//! Σ_j s_j φ((u - u_j)/Δ). The weight of sample j is then
//!
//!   W_j = ∫ φ((u - u_j)/Δ) h(u) du,   h(u) = e^(qu) j_ell(e^u),
//!
//! which reproduces the continuous transform exactly for any signal that is
//! locally quadratic in ln k. The weights are formed cell by cell on the
//! nodes u_n = ln kr0 + nΔ:
//!
//! - below the switch node, each cell contributes the polynomial moments of
//!   h over that cell, from adaptive quadrature;
//! - from the switch node up, φ is integrated against the trigonometric form
//!   of j_ell by parts. Only the jumps of φ and its derivatives at the nodes
//!   survive, each multiplying the asymptotic series of ∫_x^∞ y^p e^(iy) dy
//!   differentiated in p.

use crate::sizing::TransformSizing;
use cosmo_math::quadrature::{integrate_adaptive, QuadratureTolerance};
use cosmo_math::special::{bessel_trig_coefficients, spherical_bessel_j};
use cosmo_types::constants::KERNEL_ASYMPTOTIC_X;
use cosmo_types::error::CosmoResult;
use log::trace;
use ndarray::Array1;
use num_complex::Complex64;
use std::f64::consts::FRAC_PI_2;

/// Terms tried in the asymptotic tail series before giving up on further gain.
const MAX_TAIL_TERMS: usize = 200;

/// Polynomial pieces of the cubic convolution basis in τ = (u - u_n)/Δ on the
/// cell [u_n, u_n+1], for the basis function centred on node n + d, with
/// row d + 1 for d = -1, 0, 1, 2.
const CUBIC_PIECES: [[f64; 4]; 4] = [
    [0.0, -0.5, 1.0, -0.5],
    [1.0, 0.0, -2.5, 1.5],
    [0.0, 0.5, 2.0, -1.5],
    [0.0, 0.0, -0.5, 0.5],
];

/// Piece of the basis function centred `offset` nodes right of the cell start.
fn cubic_piece(offset: isize) -> [f64; 4] {
    match offset {
        -1..=2 => CUBIC_PIECES[(offset + 1) as usize],
        _ => [0.0; 4],
    }
}

/// Re-expand a cell polynomial in τ about the cell's right end: c(1 + σ).
fn shift_to_right_end(c: [f64; 4]) -> [f64; 4] {
    [
        c[0] + c[1] + c[2] + c[3],
        c[1] + 2.0 * c[2] + 3.0 * c[3],
        c[2] + 3.0 * c[3],
        c[3],
    ]
}

/// A_p(x) = Σ_m i^m (p)_m x^(-m) and its first three derivatives in p,
/// where ∫_x^∞ y^p e^(iy) dy = i e^(ix) x^p A_p(x). The series is asymptotic
/// and is cut at its smallest term.
fn tail_series(p: f64, x: f64) -> [Complex64; 4] {
    // (p)_m and its p-derivatives.
    let mut fall = [1.0f64, 0.0, 0.0, 0.0];
    let mut power = Complex64::new(1.0, 0.0);
    let mut sums = [
        Complex64::new(1.0, 0.0),
        Complex64::new(0.0, 0.0),
        Complex64::new(0.0, 0.0),
        Complex64::new(0.0, 0.0),
    ];
    let mut last = f64::INFINITY;
    for m in 0..MAX_TAIL_TERMS {
        let f = p - m as f64;
        fall = [
            fall[0] * f,
            fall[1] * f + fall[0],
            fall[2] * f + 2.0 * fall[1],
            fall[3] * f + 3.0 * fall[2],
        ];
        power *= Complex64::i() / x;
        let size = power.norm() * fall.iter().map(|d| d.abs()).sum::<f64>();
        if m >= 4 && size >= last {
            break;
        }
        for (sum, &d) in sums.iter_mut().zip(fall.iter()) {
            *sum += power * d;
        }
        let total: f64 = sums.iter().map(|s| s.norm()).sum();
        if m >= 4 && size <= 1e-17 * total {
            break;
        }
        last = size;
    }
    sums
}

/// E_r = ∫_{u_n}^∞ (u - u_n)^r h(u) du / Δ^r from the asymptotic form of h,
/// for the node at x = e^(u_n).
fn node_moments(coeffs: &[f64], q: f64, x: f64, step: f64) -> [Complex64; 4] {
    let ell = coeffs.len() - 1;
    let mut out = [Complex64::new(0.0, 0.0); 4];
    for (k, &b) in coeffs.iter().enumerate() {
        let phase = (ell as f64 + 1.0 - k as f64) * FRAC_PI_2;
        let p = q - 2.0 - k as f64;
        let front = -Complex64::i() * Complex64::from_polar(b * x.powf(p), x - phase);
        let series = tail_series(p, x);
        let mut scale = 1.0f64;
        for (e, s) in out.iter_mut().zip(series.iter()) {
            *e += front * s / scale;
            scale *= step;
        }
    }
    out
}

/// Polynomial moments Δ ∫_0^1 τ^r h(u_n + τΔ) dτ, r = 0..3, of one cell.
fn cell_moments(ell: usize, q: f64, start: f64, step: f64) -> CosmoResult<[f64; 4]> {
    let mut moments = [0.0f64; 4];
    for (r, moment) in moments.iter_mut().enumerate() {
        *moment = integrate_adaptive(
            |u: f64| {
                let tau = (u - start) / step;
                Ok(tau.powi(r as i32) * (q * u).exp() * spherical_bessel_j(ell, u.exp()))
            },
            start,
            start + step,
            QuadratureTolerance::default(),
        )
        .map_err(|e| e.within(format!("ell={ell} kernel cell at u={start:.4}")))?
        .value;
    }
    Ok(moments)
}

/// Interpolation-basis kernel weights W_j, j = -nsf..=nsf (stored at j + nsf).
pub fn kernel_weights(sizing: &TransformSizing) -> CosmoResult<Array1<f64>> {
    let ell = sizing.ell;
    let q = sizing.bias_exponent;
    let step = sizing.log_step;
    let centre = sizing.kr0.ln();
    let nsf = sizing.settling_steps as isize;

    let mut weights = Array1::<f64>::zeros(sizing.kernel_len());
    let mut add = |j: isize, w: f64| {
        if j.abs() <= nsf {
            weights[(j + nsf) as usize] += w;
        }
    };

    // Basis functions with |j| <= nsf reach nodes -nsf-2 ..= nsf+2.
    let first = -nsf - 2;
    let last = nsf + 2;
    let x_switch = KERNEL_ASYMPTOTIC_X.max(4.0 * (ell as f64 + 2.0));
    let switch_node = (((x_switch.ln() - centre) / step).ceil() as isize).max(first);

    for n in first..switch_node.min(last) {
        let moments = cell_moments(ell, q, centre + n as f64 * step, step)?;
        for d in -1..=2 {
            let piece = cubic_piece(d);
            add(n + d, piece.iter().zip(moments.iter()).map(|(c, m)| c * m).sum());
        }
    }

    if switch_node < last {
        let coeffs = bessel_trig_coefficients(ell);
        for n in switch_node..=last {
            let x = (centre + n as f64 * step).exp();
            let moments = node_moments(&coeffs, q, x, step);
            for j in n - 2..=n + 2 {
                let right = cubic_piece(j - n);
                let left = if n == switch_node {
                    [0.0; 4]
                } else {
                    shift_to_right_end(cubic_piece(j - n + 1))
                };
                let w: Complex64 = (0..4).map(|r| moments[r] * (left[r] - right[r])).sum();
                add(j, w.re);
            }
        }
    }

    trace!(
        "ell={ell} kernel: {} weights, switch node {switch_node} (x={x_switch})",
        sizing.kernel_len()
    );
    Ok(weights)
}
