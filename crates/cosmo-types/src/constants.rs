// ─────────────────────────────────────────────────────────────────────
// SCPN Cosmo Core — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
/// Upper bound (exclusive) on the transform tolerance. The asymptotic
/// solution of t·exp(-t) = veps only exists below 1/e; 0.35 keeps a margin.
pub const MAX_TOLERANCE: f64 = 0.35;

/// Default transform tolerance.
pub const DEFAULT_TOLERANCE: f64 = 1e-3;

/// Minimum number of log-spaced samples per decade of k (or r).
pub const MIN_SAMPLES_PER_DECADE: f64 = 40.0;

/// Largest log step ever used by the transform: ln(10)/40.
pub const MAX_LOG_STEP: f64 = std::f64::consts::LN_10 / MIN_SAMPLES_PER_DECADE;

/// The log step is also held below this times veps^(1/3). The error of the
/// cubic interpolation of the signal between samples falls like step³.
pub const STEP_TOLERANCE_SCALE: f64 = 0.25;

/// Default tabulation density for distortion multipoles.
pub const DEFAULT_DISTORTION_SAMPLES_PER_DECADE: f64 = 40.0;

/// A distortion multipole table never has fewer points than this.
pub const MIN_DISTORTION_SAMPLES: usize = 10;

/// Extra zoom-window samples kept beyond [rmin, rmax] on each side.
pub const DEFAULT_EDGE_MARGIN: usize = 2;

/// Relative accuracy target of the multipole projector (~12 digits).
pub const PROJECTION_REL_TOL: f64 = 1e-12;

/// Absolute floor of the multipole projector.
pub const PROJECTION_ABS_TOL: f64 = 1e-14;

/// Interval budget of the adaptive quadrature before it reports divergence.
pub const MAX_QUADRATURE_INTERVALS: usize = 500;

/// Below this argument the transform kernel weights come from quadrature;
/// above it they come from the asymptotic expansion of the kernel integral.
pub const KERNEL_ASYMPTOTIC_X: f64 = 40.0;

/// Relative slack applied to interpolation-domain checks.
pub const DOMAIN_SLACK: f64 = 1e-12;

/// Default highest multipole carried by a correlation function.
pub const DEFAULT_LMAX: usize = 4;
