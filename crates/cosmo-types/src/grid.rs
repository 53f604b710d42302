// ─────────────────────────────────────────────────────────────────────
// SCPN Cosmo Core — Log Grid
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Geometrically spaced sample grids.
//!
//! Sample `i` sits at `exp(log_start + i * log_step)`. The transform engine
//! anchors one on r0 for its kept r samples; distortion tables span their
//! k-range with one.

use ndarray::Array1;

/// Ordered grid with equal steps in `ln(x)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogGrid {
    pub log_start: f64, // ln of the first sample
    pub log_step: f64,  // step in ln(x), > 0
    pub len: usize,
}

impl LogGrid {
    /// Grid anchored at `center` holding offsets `first..=last` (in steps).
    pub fn anchored(center: f64, log_step: f64, first: isize, last: isize) -> Self {
        debug_assert!(last >= first);
        LogGrid {
            log_start: center.ln() + first as f64 * log_step,
            log_step,
            len: (last - first + 1) as usize,
        }
    }

    /// Grid spanning `[x_min, x_max]` with `len` samples (numpy geomspace).
    pub fn spanning(x_min: f64, x_max: f64, len: usize) -> Self {
        debug_assert!(len >= 2 && x_min > 0.0 && x_max > x_min);
        LogGrid {
            log_start: x_min.ln(),
            log_step: (x_max / x_min).ln() / (len - 1) as f64,
            len,
        }
    }

    pub fn log_value(&self, i: usize) -> f64 {
        self.log_start + i as f64 * self.log_step
    }

    pub fn value(&self, i: usize) -> f64 {
        self.log_value(i).exp()
    }

    pub fn first(&self) -> f64 {
        self.log_start.exp()
    }

    pub fn last(&self) -> f64 {
        self.value(self.len.saturating_sub(1))
    }

    /// Samples per decade implied by the step.
    pub fn samples_per_decade(&self) -> f64 {
        std::f64::consts::LN_10 / self.log_step
    }

    pub fn log_values(&self) -> Array1<f64> {
        Array1::from_shape_fn(self.len, |i| self.log_value(i))
    }
}
