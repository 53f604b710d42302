// ─────────────────────────────────────────────────────────────────────
// SCPN Cosmo Core — Power Spectrum
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Power spectra as callable functions of wavenumber.
//!
//! A `TabulatedSpectrum` interpolates `ln P` against `ln k` with a natural
//! cubic spline and continues with power laws beyond the table, using the
//! slope through the two outermost points on each side.

use cosmo_math::spline::CubicSpline;
use cosmo_types::config::SpectrumConfig;
use cosmo_types::error::{CosmoError, CosmoResult};
use log::warn;
use ndarray::Array1;
use std::sync::atomic::{AtomicBool, Ordering};

/// Anything that yields P(k). Closures `Fn(f64) -> CosmoResult<f64>` qualify.
pub trait Spectrum: Sync {
    fn power(&self, k: f64) -> CosmoResult<f64>;
}

impl<F> Spectrum for F
where
    F: Fn(f64) -> CosmoResult<f64> + Sync,
{
    fn power(&self, k: f64) -> CosmoResult<f64> {
        self(k)
    }
}

#[derive(Debug)]
pub struct TabulatedSpectrum {
    k: Array1<f64>,
    power: Array1<f64>,
    log_spline: CubicSpline,
    slope_below: f64,
    slope_above: f64,
    config: SpectrumConfig,
    warned_below: AtomicBool,
    warned_above: AtomicBool,
}

impl TabulatedSpectrum {
    /// Build from `(k, P)` pairs with strictly increasing `k > 0` and `P > 0`.
    pub fn new(points: &[(f64, f64)], config: SpectrumConfig) -> CosmoResult<Self> {
        if points.len() < 2 {
            return Err(CosmoError::precondition(format!(
                "tabulated spectrum needs at least 2 points, got {}",
                points.len()
            )));
        }
        for (i, &(k, p)) in points.iter().enumerate() {
            if !(k.is_finite() && k > 0.0) {
                return Err(CosmoError::precondition(format!(
                    "spectrum point {i}: k must be finite and > 0, got {k}"
                )));
            }
            if !(p.is_finite() && p > 0.0) {
                return Err(CosmoError::precondition(format!(
                    "spectrum point {i}: P must be finite and > 0 for log-log interpolation, got {p}"
                )));
            }
            if i > 0 && k <= points[i - 1].0 {
                return Err(CosmoError::precondition(format!(
                    "spectrum k must be strictly increasing: k[{}]={} then k[{i}]={k}",
                    i - 1,
                    points[i - 1].0
                )));
            }
        }

        let k: Array1<f64> = points.iter().map(|p| p.0).collect();
        let power: Array1<f64> = points.iter().map(|p| p.1).collect();
        let ln_k = k.mapv(f64::ln);
        let ln_p = power.mapv(f64::ln);
        let n = k.len();
        let slope_below = (ln_p[1] - ln_p[0]) / (ln_k[1] - ln_k[0]);
        let slope_above = (ln_p[n - 1] - ln_p[n - 2]) / (ln_k[n - 1] - ln_k[n - 2]);
        let log_spline = CubicSpline::new(ln_k, ln_p)?;

        Ok(TabulatedSpectrum {
            k,
            power,
            log_spline,
            slope_below,
            slope_above,
            config,
            warned_below: AtomicBool::new(false),
            warned_above: AtomicBool::new(false),
        })
    }

    /// Load a whitespace-separated two-column `k P(k)` table.
    ///
    /// Blank lines and lines starting with `#` are skipped; extra columns
    /// are ignored.
    pub fn from_file(path: &str, config: SpectrumConfig) -> CosmoResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut points = Vec::new();
        for (lineno, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut cols = line.split_whitespace();
            let mut next = |name: &str| -> CosmoResult<f64> {
                let field = cols.next().ok_or_else(|| {
                    CosmoError::ConfigError(format!("{path}:{}: missing {name} column", lineno + 1))
                })?;
                field.parse::<f64>().map_err(|e| {
                    CosmoError::ConfigError(format!(
                        "{path}:{}: cannot parse {name} '{field}': {e}",
                        lineno + 1
                    ))
                })
            };
            let k = next("k")?;
            let p = next("P(k)")?;
            points.push((k, p));
        }
        Self::new(&points, config)
    }

    pub fn len(&self) -> usize {
        self.k.len()
    }

    pub fn is_empty(&self) -> bool {
        self.k.is_empty()
    }

    /// Tabulated k-range `(k_first, k_last)`.
    pub fn k_range(&self) -> (f64, f64) {
        (self.k[0], self.k[self.k.len() - 1])
    }

    pub fn wavenumbers(&self) -> &Array1<f64> {
        &self.k
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.power
    }

    /// Power-law indices used below and above the table.
    pub fn tail_slopes(&self) -> (f64, f64) {
        (self.slope_below, self.slope_above)
    }

    fn notice_extrapolation(&self, flag: &AtomicBool, side: &str, k: f64, edge: f64) {
        if self.config.warn_on_extrapolation && !flag.swap(true, Ordering::Relaxed) {
            warn!(
                "power spectrum extrapolated {side} its tabulated range: k={k:e} (edge {edge:e}); \
                 further {side}-range evaluations are silent"
            );
        }
    }
}

impl Spectrum for TabulatedSpectrum {
    fn power(&self, k: f64) -> CosmoResult<f64> {
        if !(k.is_finite() && k > 0.0) {
            return Err(CosmoError::precondition(format!(
                "spectrum evaluated at invalid wavenumber k={k}"
            )));
        }
        let (k_lo, k_hi) = self.k_range();
        let ln_k = k.ln();

        if !self.log_spline.contains(ln_k) {
            if k < k_lo {
                if !self.config.extrapolate_below {
                    return Err(CosmoError::precondition(format!(
                        "spectrum evaluated at k={k:e} below tabulated minimum {k_lo:e} with extrapolation disabled"
                    )));
                }
                self.notice_extrapolation(&self.warned_below, "below", k, k_lo);
                return Ok(self.power[0] * (k / k_lo).powf(self.slope_below));
            }
            if !self.config.extrapolate_above {
                return Err(CosmoError::precondition(format!(
                    "spectrum evaluated at k={k:e} above tabulated maximum {k_hi:e} with extrapolation disabled"
                )));
            }
            self.notice_extrapolation(&self.warned_above, "above", k, k_hi);
            return Ok(self.power[self.power.len() - 1] * (k / k_hi).powf(self.slope_above));
        }

        Ok(self.log_spline.eval(ln_k)?.exp())
    }
}

/// Log-log interpolated spectrum with power-law tails.
pub fn make_spectrum(points: &[(f64, f64)], config: &SpectrumConfig) -> CosmoResult<TabulatedSpectrum> {
    TabulatedSpectrum::new(points, *config)
}
