// ─────────────────────────────────────────────────────────────────────
// SCPN Cosmo Core — Correlation Function
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Anisotropic correlation function xi(r, mu) = Σ_ell xi_ell(r) P_ell(mu).

use crate::distortion::DistortionModel;
use crate::spectrum::Spectrum;
use crate::transform::{spherical_bessel_transform, CorrelationMultipole, TransformSpec};
use cosmo_math::special::legendre;
use cosmo_types::config::{CorrelationConfig, TransformConfig};
use cosmo_types::error::{CosmoError, CosmoResult};
use log::{debug, trace};
use rayon::prelude::*;

/// Anything that yields xi(r, mu). Closures `Fn(f64, f64) -> CosmoResult<f64>` qualify.
pub trait AnisotropicCorrelation: Sync {
    fn evaluate(&self, r: f64, mu: f64) -> CosmoResult<f64>;
}

impl<F> AnisotropicCorrelation for F
where
    F: Fn(f64, f64) -> CosmoResult<f64> + Sync,
{
    fn evaluate(&self, r: f64, mu: f64) -> CosmoResult<f64> {
        self(r, mu)
    }
}

/// Even multipoles 0..=lmax of one correlation function.
#[derive(Debug, Clone)]
pub struct CorrelationFunction {
    multipoles: Vec<CorrelationMultipole>,
    r_min: f64,
    r_max: f64,
}

impl CorrelationFunction {
    /// Transform every even multipole up to `lmax`.
    ///
    /// Without a distortion model the spectrum is isotropic and only the
    /// monopole is non-zero, so only ell = 0 is transformed. Multipoles are
    /// independent and run on the rayon pool.
    pub fn build<S>(
        spectrum: &S,
        config: &CorrelationConfig,
        distortion: Option<&DistortionModel>,
        transform: &TransformConfig,
    ) -> CosmoResult<Self>
    where
        S: Spectrum + ?Sized,
    {
        let ells: Vec<usize> = match distortion {
            Some(_) => (0..=config.lmax).step_by(2).collect(),
            None => vec![0],
        };

        // Reject bad requests before any transform starts.
        let specs = ells
            .iter()
            .map(|&ell| TransformSpec::new(config.r_min, config.r_max, ell, config.tolerance))
            .collect::<CosmoResult<Vec<_>>>()?;
        debug!(
            "building correlation function over r=[{}, {}] with multipoles {:?}",
            config.r_min, config.r_max, ells
        );

        let multipoles = specs
            .par_iter()
            .map(|spec| {
                trace!("transforming ell={}", spec.ell);
                spherical_bessel_transform(spectrum, spec, distortion, transform)
            })
            .collect::<CosmoResult<Vec<_>>>()?;

        Ok(CorrelationFunction {
            multipoles,
            r_min: config.r_min,
            r_max: config.r_max,
        })
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.r_min, self.r_max)
    }

    pub fn ells(&self) -> Vec<usize> {
        self.multipoles.iter().map(|m| m.ell()).collect()
    }

    /// The transformed multipole of order `ell`, if it was built.
    pub fn multipole(&self, ell: usize) -> Option<&CorrelationMultipole> {
        self.multipoles.iter().find(|m| m.ell() == ell)
    }

    pub fn multipoles(&self) -> &[CorrelationMultipole] {
        &self.multipoles
    }

    /// xi(r, mu), exact in mu up to the highest built multipole.
    pub fn eval(&self, r: f64, mu: f64) -> CosmoResult<f64> {
        if !(-1.0..=1.0).contains(&mu) {
            return Err(CosmoError::precondition(format!(
                "line-of-sight cosine must lie in [-1, 1], got mu={mu}"
            )));
        }
        let mut total = 0.0;
        for m in &self.multipoles {
            total += m.eval(r)? * legendre(m.ell(), mu);
        }
        Ok(total)
    }
}

impl AnisotropicCorrelation for CorrelationFunction {
    fn evaluate(&self, r: f64, mu: f64) -> CosmoResult<f64> {
        self.eval(r, mu)
    }
}

pub fn build_correlation_function<S>(
    spectrum: &S,
    config: &CorrelationConfig,
    distortion: Option<&DistortionModel>,
    transform: &TransformConfig,
) -> CosmoResult<CorrelationFunction>
where
    S: Spectrum + ?Sized,
{
    CorrelationFunction::build(spectrum, config, distortion, transform)
}
