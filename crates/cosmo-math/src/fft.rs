// ─────────────────────────────────────────────────────────────────────
// SCPN Cosmo Core — FFT Convolution
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! 1D circular convolution via rustfft.
//!
//! Convention matches numpy:
//! - Forward FFT: unnormalized
//! - Inverse FFT: normalized by 1/n
//!
//! so `circular_convolve(a, b)[m] = sum_i a[i] * b[(m - i) mod n]`.

use cosmo_types::error::{CosmoError, CosmoResult};
use ndarray::Array1;
use num_complex::Complex64;
use rustfft::FftPlanner;

fn check_lengths(a: &Array1<f64>, b: &Array1<f64>) -> CosmoResult<usize> {
    if a.len() != b.len() {
        return Err(CosmoError::precondition(format!(
            "circular convolution requires equal lengths, got {} and {}",
            a.len(),
            b.len()
        )));
    }
    if a.is_empty() {
        return Err(CosmoError::precondition(
            "circular convolution requires non-empty sequences",
        ));
    }
    Ok(a.len())
}

/// Circular convolution of two real sequences of equal length.
///
/// Forward-transforms both inputs, multiplies pointwise, inverse-transforms
/// and keeps the real part scaled by 1/n.
pub fn circular_convolve(a: &Array1<f64>, b: &Array1<f64>) -> CosmoResult<Array1<f64>> {
    let n = check_lengths(a, b)?;
    let mut planner = FftPlanner::new();
    let forward = planner.plan_fft_forward(n);
    let inverse = planner.plan_fft_inverse(n);

    let mut fa: Vec<Complex64> = a.iter().map(|&v| Complex64::new(v, 0.0)).collect();
    let mut fb: Vec<Complex64> = b.iter().map(|&v| Complex64::new(v, 0.0)).collect();
    forward.process(&mut fa);
    forward.process(&mut fb);

    for (x, y) in fa.iter_mut().zip(fb.iter()) {
        *x *= *y;
    }
    inverse.process(&mut fa);

    let norm = 1.0 / n as f64;
    Ok(fa.iter().map(|c| c.re * norm).collect())
}

/// Direct O(n²) circular convolution. Reference oracle for `circular_convolve`.
pub fn circular_convolve_direct(a: &Array1<f64>, b: &Array1<f64>) -> CosmoResult<Array1<f64>> {
    let n = check_lengths(a, b)?;
    let mut out = Array1::zeros(n);
    for m in 0..n {
        let mut acc = 0.0;
        for i in 0..n {
            acc += a[i] * b[(m + n - i) % n];
        }
        out[m] = acc;
    }
    Ok(out)
}

/// Position of a signed index in a length-`n` circular buffer.
pub fn wrap_index(index: isize, n: usize) -> usize {
    index.rem_euclid(n as isize) as usize
}
