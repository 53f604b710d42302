// ─────────────────────────────────────────────────────────────────────
// SCPN Cosmo Core — Spherical Bessel Transform
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Log-spaced spherical Bessel transform of a power spectrum multipole:
//!
//!   xi_ell(r) = i^ell / (2π²) ∫ k² P_ell(k) j_ell(kr) dk
//!
//! With k = e^v, r = e^w and bias exponent q the integral becomes
//!
//!   xi_ell(r) = i^ell r^(-q) / (2π²) ∫ [k^(3-q) P_ell(k)] h(ln kr) dv,
//!   h(u) = x^q j_ell(x), x = e^u,
//!
//! a correlation in log space. Samples k_i = k0 e^(-iΔ), i in [-ntot, ntot),
//! and r_m = r0 e^(mΔ) with k0 r0 = kr0 turn it into a cyclic convolution of
//! the signal s_i = k_i^(3-q) P(k_i) with kernel weights W_j, |j| <= nsf.
//! W_j integrates h against the cubic interpolation basis of sample j (see
//! [`crate::kernel`]), so the oscillating large-x kernel is never point
//! sampled.
//!
//! Only m in [-nsg, nsg) is kept. For those outputs every index pair that
//! wraps around the period 2·ntot lands outside the kernel support, so the
//! kept window is free of cyclic aliasing.

use crate::distortion::{distortion_multipole_function, DistortionModel};
use crate::kernel::kernel_weights;
use crate::sizing::{check_sizing_inputs, size_transform, TransformSizing};
use crate::spectrum::Spectrum;
use cosmo_math::fft::{circular_convolve, wrap_index};
use cosmo_math::spline::CubicSpline;
use cosmo_types::config::TransformConfig;
use cosmo_types::constants::DOMAIN_SLACK;
use cosmo_types::error::{CosmoError, CosmoResult};
use cosmo_types::grid::LogGrid;
use log::{debug, trace};
use ndarray::Array1;
use std::f64::consts::PI;

/// One transform request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformSpec {
    pub r_min: f64,
    pub r_max: f64,
    pub ell: usize,
    pub tolerance: f64,
}

impl TransformSpec {
    pub fn new(r_min: f64, r_max: f64, ell: usize, tolerance: f64) -> CosmoResult<Self> {
        let spec = TransformSpec {
            r_min,
            r_max,
            ell,
            tolerance,
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> CosmoResult<()> {
        if !(self.r_min.is_finite() && self.r_min > 0.0) {
            return Err(CosmoError::precondition(format!(
                "rmin must be finite and > 0, got {}",
                self.r_min
            )));
        }
        if !(self.r_max.is_finite() && self.r_max > self.r_min) {
            return Err(CosmoError::precondition(format!(
                "rmax must be finite and > rmin, got rmin={} rmax={}",
                self.r_min, self.r_max
            )));
        }
        check_sizing_inputs(self.ell, self.tolerance)
    }
}

fn check_transform_config(config: &TransformConfig) -> CosmoResult<()> {
    if config.edge_margin < 1 {
        return Err(CosmoError::precondition(
            "edge_margin must be >= 1 so the zoom window covers rmax",
        ));
    }
    let spd = config.distortion_samples_per_decade;
    if !(spd.is_finite() && spd > 0.0) {
        return Err(CosmoError::precondition(format!(
            "distortion_samples_per_decade must be > 0, got {spd}"
        )));
    }
    Ok(())
}

/// Grid geometry of one transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformPlan {
    pub spec: TransformSpec,
    pub sizing: TransformSizing,
    /// Geometric-mean anchor sqrt(rmin · rmax).
    pub r0: f64,
    /// kr0 / r0.
    pub k0: f64,
    /// Half width of the kept output window (nsg), including the edge margin.
    pub signal_steps: usize,
    /// nsf + nsg.
    pub total_steps: usize,
}

impl TransformPlan {
    pub fn new(spec: &TransformSpec, config: &TransformConfig) -> CosmoResult<Self> {
        spec.validate()?;
        check_transform_config(config)?;
        let sizing = size_transform(spec.ell, spec.tolerance)?;

        let r0 = (spec.r_min * spec.r_max).sqrt();
        let k0 = sizing.kr0 / r0;
        let span = (spec.r_max / spec.r_min).ln();
        let signal_steps = (span / (2.0 * sizing.log_step)).ceil() as usize + config.edge_margin;
        let total_steps = sizing.settling_steps + signal_steps;

        Ok(TransformPlan {
            spec: *spec,
            sizing,
            r0,
            k0,
            signal_steps,
            total_steps,
        })
    }

    /// Length of the cyclic buffers, 2·ntot.
    pub fn len(&self) -> usize {
        2 * self.total_steps
    }

    pub fn is_empty(&self) -> bool {
        self.total_steps == 0
    }

    /// k_i = k0 e^(-iΔ).
    pub fn wavenumber(&self, i: isize) -> f64 {
        self.k0 * (-(i as f64) * self.sizing.log_step).exp()
    }

    /// Smallest and largest sampled wavenumber.
    pub fn k_range(&self) -> (f64, f64) {
        let ntot = self.total_steps as isize;
        (self.wavenumber(ntot - 1), self.wavenumber(-ntot))
    }

    /// The kept r samples, m in [-nsg, nsg).
    pub fn output_grid(&self) -> LogGrid {
        let nsg = self.signal_steps as isize;
        LogGrid::anchored(self.r0, self.sizing.log_step, -nsg, nsg - 1)
    }

    /// Sample `spectrum`, convolve with the kernel and keep the zoom window.
    pub fn execute<S>(&self, spectrum: &S) -> CosmoResult<CorrelationMultipole>
    where
        S: Spectrum + ?Sized,
    {
        let ell = self.spec.ell;
        let n = self.len();
        let q = self.sizing.bias_exponent;
        let ntot = self.total_steps as isize;
        let nsf = self.sizing.settling_steps as isize;
        let nsg = self.signal_steps as isize;

        let mut signal = Array1::zeros(n);
        for i in -ntot..ntot {
            let k = self.wavenumber(i);
            let p = spectrum
                .power(k)
                .map_err(|e| e.within(format!("ell={ell} signal at k={k:e}")))?;
            signal[wrap_index(i, n)] = k.powf(3.0 - q) * p;
        }

        let weights = kernel_weights(&self.sizing)?;
        let mut kernel = Array1::zeros(n);
        for (offset, &w) in weights.iter().enumerate() {
            kernel[wrap_index(offset as isize - nsf, n)] = w;
        }

        let convolved = circular_convolve(&signal, &kernel)?;

        let grid = self.output_grid();
        let sign = if (ell / 2) % 2 == 0 { 1.0 } else { -1.0 };
        let norm = sign / (2.0 * PI * PI);
        let mut values = Array1::zeros(grid.len);
        for (idx, value) in values.iter_mut().enumerate() {
            let m = idx as isize - nsg;
            let r = grid.value(idx);
            *value = norm * r.powf(-q) * convolved[wrap_index(m, n)];
            if !value.is_finite() {
                return Err(CosmoError::divergence(
                    format!("ell={ell} transform"),
                    format!("non-finite correlation value {value} at r={r:e}"),
                ));
            }
        }
        trace!(
            "ell={ell} transform done: {} kept samples over r=[{:.4}, {:.4}]",
            grid.len,
            grid.first(),
            grid.last()
        );

        let spline = CubicSpline::new(grid.log_values(), values)?;
        Ok(CorrelationMultipole {
            spec: self.spec,
            sizing: self.sizing,
            grid,
            spline,
        })
    }
}

/// One correlation multipole on the zoom window, interpolated in ln r.
#[derive(Debug, Clone)]
pub struct CorrelationMultipole {
    spec: TransformSpec,
    sizing: TransformSizing,
    grid: LogGrid,
    spline: CubicSpline,
}

impl CorrelationMultipole {
    pub fn ell(&self) -> usize {
        self.spec.ell
    }

    /// The requested `[rmin, rmax]`; evaluation is only defined inside it.
    pub fn domain(&self) -> (f64, f64) {
        (self.spec.r_min, self.spec.r_max)
    }

    pub fn spec(&self) -> &TransformSpec {
        &self.spec
    }

    pub fn sizing(&self) -> &TransformSizing {
        &self.sizing
    }

    /// Kept r samples. The outermost few beyond `[rmin, rmax]` are the
    /// lower-confidence edge margin.
    pub fn grid(&self) -> &LogGrid {
        &self.grid
    }

    pub fn values(&self) -> &Array1<f64> {
        self.spline.values()
    }

    pub fn eval(&self, r: f64) -> CosmoResult<f64> {
        let (lo, hi) = self.domain();
        let slack = DOMAIN_SLACK * hi;
        let context = || format!("ell={} correlation multipole", self.spec.ell);
        if !(r >= lo - slack && r <= hi + slack) {
            return Err(CosmoError::divergence(
                context(),
                format!("r={r} outside transform domain [{lo}, {hi}]"),
            ));
        }
        self.spline
            .eval(r.ln())
            .map_err(|e| e.within(format!("{} at r={r}", context())))
    }
}

/// Transform `spectrum` into the `spec.ell` correlation multipole.
///
/// With a distortion model the signal is the `ell` multipole of the
/// distorted spectrum, tabulated over the plan's k-range; without one the
/// spectrum is used as given.
pub fn spherical_bessel_transform<S>(
    spectrum: &S,
    spec: &TransformSpec,
    distortion: Option<&DistortionModel>,
    config: &TransformConfig,
) -> CosmoResult<CorrelationMultipole>
where
    S: Spectrum + ?Sized,
{
    let plan = TransformPlan::new(spec, config)?;
    let (k_lo, k_hi) = plan.k_range();
    debug!(
        "transform ell={} r=[{}, {}] veps={:e}: N={} (nsf={}, nsg={}), k=[{k_lo:e}, {k_hi:e}]",
        spec.ell,
        spec.r_min,
        spec.r_max,
        spec.tolerance,
        plan.len(),
        plan.sizing.settling_steps,
        plan.signal_steps
    );

    match distortion {
        Some(model) => {
            let table = distortion_multipole_function(
                spectrum,
                model,
                k_lo,
                k_hi,
                spec.ell,
                config.distortion_samples_per_decade,
            )?;
            plan.execute(&table)
        }
        None => plan.execute(spectrum),
    }
}
