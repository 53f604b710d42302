// ─────────────────────────────────────────────────────────────────────
// SCPN Cosmo Core — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::constants::{
    DEFAULT_DISTORTION_SAMPLES_PER_DECADE, DEFAULT_EDGE_MARGIN, DEFAULT_LMAX, DEFAULT_TOLERANCE,
};
use serde::{Deserialize, Serialize};

/// Top-level run configuration consumed by the `xi-transform` driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub spectrum: SpectrumConfig,
    /// When absent the spectrum is treated as isotropic (monopole only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distortion: Option<DistortionConfig>,
    pub correlation: CorrelationConfig,
    #[serde(default)]
    pub transform: TransformConfig,
    /// Anisotropically rescaled multipoles to extract from the correlation function.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extract: Vec<ExtractConfig>,
}

/// Behaviour of a tabulated spectrum outside its k-range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SpectrumConfig {
    /// Power-law extrapolation below the first k (false: out-of-range is an error).
    #[serde(default = "default_true")]
    pub extrapolate_below: bool,
    /// Power-law extrapolation above the last k (false: out-of-range is an error).
    #[serde(default = "default_true")]
    pub extrapolate_above: bool,
    /// Log a warning the first time each side is extrapolated.
    #[serde(default = "default_true")]
    pub warn_on_extrapolation: bool,
}

impl Default for SpectrumConfig {
    fn default() -> Self {
        SpectrumConfig {
            extrapolate_below: true,
            extrapolate_above: true,
            warn_on_extrapolation: true,
        }
    }
}

/// Redshift-space and non-linear distortion parameters.
///
/// `secondary_*` describe the second tracer of a cross-correlation; when
/// `None` they resolve to the primary tracer's values (auto-correlation).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DistortionConfig {
    #[serde(default = "default_bias")]
    pub bias: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_bias: Option<f64>,
    /// Redshift-space distortion parameter beta.
    #[serde(default)]
    pub beta: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_beta: Option<f64>,
    /// Gaussian damping width along the line of sight.
    #[serde(default)]
    pub sigma_parallel: f64,
    /// Gaussian damping width transverse to the line of sight.
    #[serde(default)]
    pub sigma_transverse: f64,
    /// Fingers-of-god Lorentzian damping scale.
    #[serde(default)]
    pub sigma_fog: f64,
}

fn default_bias() -> f64 {
    1.0
}
fn default_true() -> bool {
    true
}

impl Default for DistortionConfig {
    fn default() -> Self {
        DistortionConfig {
            bias: default_bias(),
            secondary_bias: None,
            beta: 0.0,
            secondary_beta: None,
            sigma_parallel: 0.0,
            sigma_transverse: 0.0,
            sigma_fog: 0.0,
        }
    }
}

/// Knobs of the transform engine that are not part of a single request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TransformConfig {
    /// Zoom-window samples kept beyond [rmin, rmax] on each side.
    #[serde(default = "default_edge_margin")]
    pub edge_margin: usize,
    /// Tabulation density of distortion multipoles in samples per decade of k.
    #[serde(default = "default_distortion_samples_per_decade")]
    pub distortion_samples_per_decade: f64,
}

fn default_edge_margin() -> usize {
    DEFAULT_EDGE_MARGIN
}
fn default_distortion_samples_per_decade() -> f64 {
    DEFAULT_DISTORTION_SAMPLES_PER_DECADE
}

impl Default for TransformConfig {
    fn default() -> Self {
        TransformConfig {
            edge_margin: default_edge_margin(),
            distortion_samples_per_decade: default_distortion_samples_per_decade(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CorrelationConfig {
    pub r_min: f64,
    pub r_max: f64,
    /// Highest multipole (even multipoles 0..=lmax are built).
    #[serde(default = "default_lmax")]
    pub lmax: usize,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

fn default_lmax() -> usize {
    DEFAULT_LMAX
}
fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ExtractConfig {
    pub r_min: f64,
    pub r_max: f64,
    pub ell: usize,
    #[serde(default = "default_alpha")]
    pub alpha_parallel: f64,
    #[serde(default = "default_alpha")]
    pub alpha_transverse: f64,
    /// Number of evenly spaced r samples (default: ceil(r_max - r_min)).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npoints: Option<usize>,
}

fn default_alpha() -> f64 {
    1.0
}

impl RunConfig {
    /// Load from a JSON file.
    pub fn from_file(path: &str) -> crate::error::CosmoResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    /// CARGO_MANIFEST_DIR points to crates/cosmo-types/ at compile time,
    /// so the workspace root is two levels up.
    fn project_root() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..").join("..")
    }

    fn config_path(relative: &str) -> String {
        project_root().join(relative).to_string_lossy().to_string()
    }

    #[test]
    fn test_load_demo_run_config() {
        let cfg = RunConfig::from_file(&config_path("configs/demo_run.json")).unwrap();
        assert!((cfg.correlation.r_min - 10.0).abs() < 1e-12);
        assert!((cfg.correlation.r_max - 200.0).abs() < 1e-12);
        assert_eq!(cfg.correlation.lmax, 4);
        let distortion = cfg.distortion.expect("demo config carries a distortion model");
        assert!((distortion.bias - 2.0).abs() < 1e-12);
        assert!(distortion.secondary_bias.is_none());
        assert_eq!(cfg.extract.len(), 2);
        assert_eq!(cfg.extract[1].ell, 2);
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let json = r#"{ "correlation": { "r_min": 20.0, "r_max": 150.0 } }"#;
        let cfg: RunConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.correlation.lmax, DEFAULT_LMAX);
        assert!((cfg.correlation.tolerance - DEFAULT_TOLERANCE).abs() < 1e-15);
        assert_eq!(cfg.spectrum, SpectrumConfig::default());
        assert_eq!(cfg.transform, TransformConfig::default());
        assert!(cfg.distortion.is_none());
        assert!(cfg.extract.is_empty());
    }

    #[test]
    fn test_distortion_defaults() {
        let cfg: DistortionConfig = serde_json::from_str(r#"{ "beta": 0.4 }"#).unwrap();
        assert!((cfg.bias - 1.0).abs() < 1e-15);
        assert!((cfg.beta - 0.4).abs() < 1e-15);
        assert!(cfg.secondary_beta.is_none());
        assert_eq!(cfg.sigma_fog, 0.0);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = RunConfig::from_file(&config_path("configs/does_not_exist.json")).unwrap_err();
        assert!(matches!(err, crate::error::CosmoError::Io(_)));
    }

    #[test]
    fn test_roundtrip_serialization() {
        let cfg = RunConfig::from_file(&config_path("configs/demo_run.json")).unwrap();
        let json = serde_json::to_string_pretty(&cfg).unwrap();
        let cfg2: RunConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg.correlation, cfg2.correlation);
        assert_eq!(cfg.distortion, cfg2.distortion);
        assert_eq!(cfg.extract, cfg2.extract);
    }

    #[test]
    fn test_float_fields_roundtrip_bit_exact() {
        // Full-mantissa values, where a fast-path parser drifts by one ulp.
        let mut x = 0.5f64;
        for _ in 0..5000 {
            x = (x + std::f64::consts::FRAC_1_SQRT_2 * 3.7).fract();
            let cfg = DistortionConfig {
                bias: 0.5 + 3.5 * x,
                beta: x,
                sigma_fog: 8.0 * (1.0 - x),
                ..Default::default()
            };
            let json = serde_json::to_string(&cfg).unwrap();
            let back: DistortionConfig = serde_json::from_str(&json).unwrap();
            assert_eq!(cfg.bias.to_bits(), back.bias.to_bits(), "{json}");
            assert_eq!(cfg.beta.to_bits(), back.beta.to_bits(), "{json}");
            assert_eq!(cfg.sigma_fog.to_bits(), back.sigma_fog.to_bits(), "{json}");
        }
    }
}
