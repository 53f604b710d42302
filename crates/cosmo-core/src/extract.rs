// ─────────────────────────────────────────────────────────────────────
// SCPN Cosmo Core — Multipole Extraction
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Alcock–Paczynski rescaling and reprojection onto a single multipole.
//!
//! For each r the rescaled function
//!   xi'(r, mu) = xi(alpha(mu) r, alpha_parallel mu / alpha(mu)),
//!   alpha(mu) = sqrt(alpha_parallel² mu² + alpha_transverse² (1 - mu²)),
//! is projected onto P_ell. The rescaled separations reach
//! [min(alpha) r_min, max(alpha) r_max], so the source function must be
//! built over that wider range.

use crate::correlation::AnisotropicCorrelation;
use crate::multipole::project_multipole;
use cosmo_math::spline::CubicSpline;
use cosmo_types::config::ExtractConfig;
use cosmo_types::error::{CosmoError, CosmoResult};
use log::debug;
use ndarray::Array1;
use rayon::prelude::*;

/// A tabulated multipole on an evenly spaced r grid, spline-interpolated in r.
#[derive(Debug, Clone)]
pub struct ExtractedMultipole {
    ell: usize,
    spline: CubicSpline,
}

impl ExtractedMultipole {
    pub fn ell(&self) -> usize {
        self.ell
    }

    pub fn r(&self) -> &Array1<f64> {
        self.spline.knots()
    }

    pub fn values(&self) -> &Array1<f64> {
        self.spline.values()
    }

    pub fn domain(&self) -> (f64, f64) {
        self.spline.domain()
    }

    pub fn eval(&self, r: f64) -> CosmoResult<f64> {
        self.spline
            .eval(r)
            .map_err(|e| e.within(format!("extracted ell={} multipole", self.ell)))
    }
}

fn check_extract_config(config: &ExtractConfig) -> CosmoResult<()> {
    if !(config.r_min.is_finite() && config.r_min > 0.0 && config.r_max.is_finite()) {
        return Err(CosmoError::precondition(format!(
            "extraction range must be finite with r_min > 0, got [{}, {}]",
            config.r_min, config.r_max
        )));
    }
    if config.r_max <= config.r_min {
        return Err(CosmoError::precondition(format!(
            "extraction needs r_max > r_min, got [{}, {}]",
            config.r_min, config.r_max
        )));
    }
    for (name, alpha) in [
        ("alpha_parallel", config.alpha_parallel),
        ("alpha_transverse", config.alpha_transverse),
    ] {
        if !(alpha.is_finite() && alpha > 0.0) {
            return Err(CosmoError::precondition(format!(
                "{name} must be finite and > 0, got {alpha}"
            )));
        }
    }
    if let Some(n) = config.npoints {
        if n < 2 {
            return Err(CosmoError::precondition(format!(
                "extraction needs at least 2 points, got {n}"
            )));
        }
    }
    Ok(())
}

/// Rescale `xi` by (alpha_parallel, alpha_transverse) and project onto
/// `config.ell` at `npoints` evenly spaced separations (default
/// `ceil(r_max - r_min)`, at least 2).
pub fn extract_multipole<C>(xi: &C, config: &ExtractConfig) -> CosmoResult<ExtractedMultipole>
where
    C: AnisotropicCorrelation + ?Sized,
{
    check_extract_config(config)?;
    let ell = config.ell;
    let ap = config.alpha_parallel;
    let at = config.alpha_transverse;
    let npoints = config
        .npoints
        .unwrap_or_else(|| (config.r_max - config.r_min).ceil() as usize)
        .max(2);
    debug!(
        "extracting ell={ell} on {npoints} points over r=[{}, {}] with alpha=({ap}, {at})",
        config.r_min, config.r_max
    );

    let r = Array1::linspace(config.r_min, config.r_max, npoints);
    let radii = r.to_vec();
    let values = radii
        .par_iter()
        .map(|&r| {
            project_multipole(
                |mu| {
                    let alpha = (ap * ap * mu * mu + at * at * (1.0 - mu * mu)).sqrt();
                    let mu_scaled = (ap * mu / alpha).clamp(-1.0, 1.0);
                    xi.evaluate(alpha * r, mu_scaled)
                },
                ell,
            )
            .map_err(|e| e.within(format!("extracting ell={ell} at r={r}")))
        })
        .collect::<CosmoResult<Vec<f64>>>()?;

    let spline = CubicSpline::new(r, Array1::from(values))?;
    Ok(ExtractedMultipole { ell, spline })
}
