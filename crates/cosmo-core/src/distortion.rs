// ─────────────────────────────────────────────────────────────────────
// SCPN Cosmo Core — Distortion Model
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Redshift-space and non-linear distortion of a power spectrum.
//!
//! The anisotropic spectrum is
//!   P(k, mu) = P(k) · b1 b2 (1 + β1 mu²)(1 + β2 mu²)
//!            · exp(-k²(mu² σ∥² + (1 - mu²) σ⊥²)/2) / (1 + (mu σs k)²)²
//! and `DistortionMultipole` tabulates its Legendre moments in ln k.

use crate::multipole::project_multipole;
use crate::spectrum::Spectrum;
use cosmo_math::spline::CubicSpline;
use cosmo_types::config::DistortionConfig;
use cosmo_types::constants::MIN_DISTORTION_SAMPLES;
use cosmo_types::error::{CosmoError, CosmoResult};
use cosmo_types::grid::LogGrid;
use log::debug;
use ndarray::Array1;

/// Resolved distortion parameters; secondary-tracer values are explicit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistortionModel {
    pub bias: f64,
    pub secondary_bias: f64,
    pub beta: f64,
    pub secondary_beta: f64,
    pub sigma_parallel: f64,
    pub sigma_transverse: f64,
    pub sigma_fog: f64,
}

impl DistortionModel {
    /// Resolve a configuration. Missing secondary values fall back to the
    /// primary tracer's; every parameter must be finite and damping widths
    /// non-negative.
    pub fn new(config: &DistortionConfig) -> CosmoResult<Self> {
        let model = DistortionModel {
            bias: config.bias,
            secondary_bias: config.secondary_bias.unwrap_or(config.bias),
            beta: config.beta,
            secondary_beta: config.secondary_beta.unwrap_or(config.beta),
            sigma_parallel: config.sigma_parallel,
            sigma_transverse: config.sigma_transverse,
            sigma_fog: config.sigma_fog,
        };
        let params = [
            ("bias", model.bias),
            ("secondary_bias", model.secondary_bias),
            ("beta", model.beta),
            ("secondary_beta", model.secondary_beta),
            ("sigma_parallel", model.sigma_parallel),
            ("sigma_transverse", model.sigma_transverse),
            ("sigma_fog", model.sigma_fog),
        ];
        for (name, value) in params {
            if !value.is_finite() {
                return Err(CosmoError::precondition(format!(
                    "distortion parameter {name} must be finite, got {value}"
                )));
            }
        }
        for (name, value) in &params[4..] {
            if *value < 0.0 {
                return Err(CosmoError::precondition(format!(
                    "damping width {name} must be >= 0, got {value}"
                )));
            }
        }
        Ok(model)
    }

    /// Linear bias and Kaiser factor b1 b2 (1 + β1 mu²)(1 + β2 mu²).
    ///
    /// Independent of `k`; the argument keeps the signature uniform with
    /// `nonlinear_distortion`.
    pub fn redshift_space_distortion(&self, _k: f64, mu: f64) -> f64 {
        let mu2 = mu * mu;
        self.bias * self.secondary_bias * (1.0 + self.beta * mu2) * (1.0 + self.secondary_beta * mu2)
    }

    /// Anisotropic Gaussian damping over the squared fingers-of-god Lorentzian.
    pub fn nonlinear_distortion(&self, k: f64, mu: f64) -> f64 {
        let mu2 = mu * mu;
        let k2 = k * k;
        let gaussian = (-0.5
            * k2
            * (mu2 * self.sigma_parallel.powi(2) + (1.0 - mu2) * self.sigma_transverse.powi(2)))
        .exp();
        let fog = 1.0 + mu2 * self.sigma_fog.powi(2) * k2;
        gaussian / (fog * fog)
    }

    /// Full multiplicative weight applied to P(k).
    pub fn weight(&self, k: f64, mu: f64) -> f64 {
        self.redshift_space_distortion(k, mu) * self.nonlinear_distortion(k, mu)
    }
}

pub fn make_distortion_model(config: &DistortionConfig) -> CosmoResult<DistortionModel> {
    DistortionModel::new(config)
}

/// Tabulated `ell` multipole of the distorted spectrum, a spline in ln k.
#[derive(Debug, Clone)]
pub struct DistortionMultipole {
    ell: usize,
    k_min: f64,
    k_max: f64,
    grid: LogGrid,
    spline: CubicSpline,
}

impl DistortionMultipole {
    pub fn ell(&self) -> usize {
        self.ell
    }

    /// The requested range; the table extends one step beyond it on each side.
    pub fn k_range(&self) -> (f64, f64) {
        (self.k_min, self.k_max)
    }

    pub fn grid(&self) -> &LogGrid {
        &self.grid
    }

    pub fn values(&self) -> &Array1<f64> {
        self.spline.values()
    }
}

impl Spectrum for DistortionMultipole {
    fn power(&self, k: f64) -> CosmoResult<f64> {
        if !(k > 0.0) {
            return Err(CosmoError::precondition(format!(
                "distortion multipole evaluated at invalid wavenumber k={k}"
            )));
        }
        self.spline
            .eval(k.ln())
            .map_err(|e| e.within(format!("ell={} distortion multipole at k={k:e}", self.ell)))
    }
}

/// Tabulate `P(k) · project(mu -> weight(k, mu), ell)` on
/// `max(10, ceil(log10(k_max/k_min) · samples_per_decade))` log-spaced points
/// across `[k_min, k_max]`, plus one extra step on each side.
pub fn distortion_multipole_function<S>(
    spectrum: &S,
    model: &DistortionModel,
    k_min: f64,
    k_max: f64,
    ell: usize,
    samples_per_decade: f64,
) -> CosmoResult<DistortionMultipole>
where
    S: Spectrum + ?Sized,
{
    if !(k_min > 0.0 && k_max > k_min && k_max.is_finite()) {
        return Err(CosmoError::precondition(format!(
            "distortion table needs 0 < k_min < k_max, got [{k_min}, {k_max}]"
        )));
    }
    if !(samples_per_decade > 0.0 && samples_per_decade.is_finite()) {
        return Err(CosmoError::precondition(format!(
            "samples_per_decade must be > 0, got {samples_per_decade}"
        )));
    }

    let decades = (k_max / k_min).log10();
    let n = ((decades * samples_per_decade).ceil() as usize).max(MIN_DISTORTION_SAMPLES);
    // One extra sample beyond each end of [k_min, k_max].
    let step = (k_max / k_min).ln() / (n - 1) as f64;
    let grid = LogGrid::spanning(k_min * (-step).exp(), k_max * step.exp(), n + 2);
    debug!(
        "distortion multipole ell={ell}: {} points over k=[{k_min:e}, {k_max:e}] ({:.1}/decade)",
        grid.len,
        grid.samples_per_decade()
    );

    let mut values = Array1::zeros(grid.len);
    for (i, value) in values.iter_mut().enumerate() {
        let k = grid.value(i);
        let moment = project_multipole(|mu| Ok(model.weight(k, mu)), ell)
            .map_err(|e| e.within(format!("distortion at k={k:e}")))?;
        *value = spectrum.power(k)? * moment;
    }

    let spline = CubicSpline::new(grid.log_values(), values)?;
    Ok(DistortionMultipole {
        ell,
        k_min,
        k_max,
        grid,
        spline,
    })
}
