// ─────────────────────────────────────────────────────────────────────
// SCPN Cosmo Core — Multipole Projection
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Legendre multipole moments of functions of the line-of-sight cosine.

use cosmo_math::quadrature::{integrate_adaptive, QuadratureTolerance};
use cosmo_math::special::legendre;
use cosmo_types::constants::{PROJECTION_ABS_TOL, PROJECTION_REL_TOL};
use cosmo_types::error::CosmoResult;

/// (2 ell + 1)/2 ∫_{-1}^{1} f(mu) P_ell(mu) dmu.
///
/// Errors returned by `f` propagate; a non-finite integrand or a failure to
/// reach ~12 digits is a `NumericalDivergence`.
pub fn project_multipole<F>(f: F, ell: usize) -> CosmoResult<f64>
where
    F: Fn(f64) -> CosmoResult<f64>,
{
    let tol = QuadratureTolerance {
        rel: PROJECTION_REL_TOL,
        abs: PROJECTION_ABS_TOL,
    };
    let result = integrate_adaptive(|mu| Ok(f(mu)? * legendre(ell, mu)), -1.0, 1.0, tol)
        .map_err(|e| e.within(format!("ell={ell} multipole projection")))?;
    Ok(0.5 * (2 * ell + 1) as f64 * result.value)
}
