// ─────────────────────────────────────────────────────────────────────
// SCPN Cosmo Core — Property-Based Tests (proptest) for cosmo-types
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for cosmo-types using proptest.
//!
//! Covers: LogGrid construction invariants, configuration serialization roundtrip.

use cosmo_types::config::{DistortionConfig, ExtractConfig};
use cosmo_types::grid::LogGrid;
use proptest::prelude::*;

// ── LogGrid Invariants ───────────────────────────────────────────────

proptest! {
    /// Spanning grids hit both endpoints.
    #[test]
    fn log_grid_spanning_endpoints(
        x_min in 1e-4f64..1.0,
        decades in 0.5f64..6.0,
        len in 2usize..200,
    ) {
        let x_max = x_min * 10f64.powf(decades);
        let grid = LogGrid::spanning(x_min, x_max, len);

        prop_assert_eq!(grid.len, len);
        prop_assert!((grid.first() - x_min).abs() < 1e-12 * x_min);
        prop_assert!((grid.last() - x_max).abs() < 1e-9 * x_max);
    }

    /// Samples are strictly increasing with a constant ratio.
    #[test]
    fn log_grid_constant_ratio(
        start in 1e-3f64..1e3,
        step in 0.001f64..0.5,
        len in 3usize..100,
    ) {
        let grid = LogGrid::anchored(start, step, 0, len as isize - 1);
        let values: Vec<f64> = (0..grid.len).map(|i| grid.value(i)).collect();
        let ratio = step.exp();
        for i in 1..len {
            prop_assert!(values[i] > values[i - 1],
                "LogGrid not monotone at {}: {} <= {}", i, values[i], values[i - 1]);
            prop_assert!((values[i] / values[i - 1] - ratio).abs() < 1e-10,
                "Non-geometric spacing at {}", i);
        }
    }

    /// Anchored grids place the anchor at offset zero.
    #[test]
    fn log_grid_anchor_offset(
        center in 0.1f64..500.0,
        first in -300isize..-1,
        last in 1isize..300,
    ) {
        let grid = LogGrid::anchored(center, 0.05, first, last);
        let anchor = (-first) as usize;
        prop_assert_eq!(grid.len, (last - first + 1) as usize);
        prop_assert!((grid.value(anchor) - center).abs() < 1e-9 * center);
    }
}

// ── Configuration Roundtrip ──────────────────────────────────────────

proptest! {
    /// DistortionConfig survives a JSON roundtrip, including optional fields.
    #[test]
    fn distortion_config_roundtrip(
        bias in 0.5f64..4.0,
        beta in 0.0f64..1.0,
        secondary in proptest::option::of(0.5f64..4.0),
        sigma_fog in 0.0f64..8.0,
    ) {
        let cfg = DistortionConfig {
            bias,
            secondary_bias: secondary,
            beta,
            secondary_beta: None,
            sigma_parallel: 6.0,
            sigma_transverse: 3.0,
            sigma_fog,
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: DistortionConfig = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(cfg, back);
    }

    /// ExtractConfig keeps its optional sample count.
    #[test]
    fn extract_config_roundtrip(
        ell in 0usize..5,
        npoints in proptest::option::of(2usize..500),
    ) {
        let cfg = ExtractConfig {
            r_min: 20.0,
            r_max: 180.0,
            ell: 2 * ell,
            alpha_parallel: 1.02,
            alpha_transverse: 0.98,
            npoints,
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: ExtractConfig = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(cfg, back);
    }
}
