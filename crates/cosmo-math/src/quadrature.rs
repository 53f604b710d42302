// ─────────────────────────────────────────────────────────────────────
// SCPN Cosmo Core — Adaptive Quadrature
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Globally adaptive Gauss–Kronrod quadrature (G7/K15).
//!
//! Same scheme as QUADPACK `qag` with key 1: the interval with the largest
//! error estimate is bisected until the summed estimate meets the tolerance.
//! K15 is exact for polynomials up to degree 22 and the embedded G7 up to
//! degree 13, so polynomial integrands of degree <= 13 converge on the first
//! pass.

use cosmo_types::constants::MAX_QUADRATURE_INTERVALS;
use cosmo_types::error::{CosmoError, CosmoResult};

/// Kronrod abscissae on [0, 1]; odd indices are the Gauss-7 nodes.
const XGK: [f64; 8] = [
    0.991_455_371_120_812_639_206_854_697_526_329,
    0.949_107_912_342_758_524_526_189_684_047_851,
    0.864_864_423_359_769_072_789_712_788_640_926,
    0.741_531_185_599_394_439_863_864_773_280_788,
    0.586_087_235_467_691_130_294_144_845_693_013,
    0.405_845_151_377_397_166_906_606_412_076_961,
    0.207_784_955_007_898_467_600_689_403_773_245,
    0.0,
];

const WGK: [f64; 8] = [
    0.022_935_322_010_529_224_963_732_008_058_970,
    0.063_092_092_629_978_553_290_700_663_189_204,
    0.104_790_010_322_250_183_839_876_322_541_518,
    0.140_653_259_715_525_918_745_189_590_510_238,
    0.169_004_726_639_267_902_826_583_426_598_550,
    0.190_350_578_064_785_409_913_256_402_421_014,
    0.204_432_940_075_298_892_414_161_999_234_649,
    0.209_482_141_084_727_828_012_999_174_891_714,
];

/// Gauss-7 weights for XGK[1], XGK[3], XGK[5], XGK[7].
const WG: [f64; 4] = [
    0.129_484_966_168_869_693_270_611_432_679_082,
    0.279_705_391_489_276_667_901_467_771_423_780,
    0.381_830_050_505_118_944_950_369_775_488_975,
    0.417_959_183_673_469_387_755_102_040_816_327,
];

/// Accuracy target. Converged when `error <= max(abs, rel * |value|)`,
/// or when the error is at the roundoff level of `∫|f|`.
#[derive(Debug, Clone, Copy)]
pub struct QuadratureTolerance {
    pub rel: f64,
    pub abs: f64,
}

impl Default for QuadratureTolerance {
    fn default() -> Self {
        Self {
            rel: 1e-12,
            abs: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct QuadratureResult {
    pub value: f64,
    pub error: f64,
    pub intervals: usize,
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    a: f64,
    b: f64,
    value: f64,
    error: f64,
    abs_value: f64,
}

fn kronrod_segment<F>(f: &mut F, a: f64, b: f64) -> CosmoResult<Segment>
where
    F: FnMut(f64) -> CosmoResult<f64>,
{
    let center = 0.5 * (a + b);
    let half = 0.5 * (b - a);

    let mut eval = |x: f64| -> CosmoResult<f64> {
        let v = f(x)?;
        if !v.is_finite() {
            return Err(CosmoError::divergence(
                "adaptive quadrature",
                format!("integrand is not finite at x={x}: {v}"),
            ));
        }
        Ok(v)
    };

    let fc = eval(center)?;
    let mut kronrod = WGK[7] * fc;
    let mut gauss = WG[3] * fc;
    let mut abs_sum = WGK[7] * fc.abs();

    for j in 0..7 {
        let dx = half * XGK[j];
        let f1 = eval(center - dx)?;
        let f2 = eval(center + dx)?;
        kronrod += WGK[j] * (f1 + f2);
        abs_sum += WGK[j] * (f1.abs() + f2.abs());
        if j % 2 == 1 {
            gauss += WG[j / 2] * (f1 + f2);
        }
    }

    Ok(Segment {
        a,
        b,
        value: kronrod * half,
        error: ((kronrod - gauss) * half).abs(),
        abs_value: abs_sum * half.abs(),
    })
}

/// Integrate `f` over `[a, b]`.
///
/// Fails with `NumericalDivergence` when the integrand is non-finite or the
/// interval budget is exhausted before the tolerance is met; errors returned
/// by `f` propagate unchanged.
pub fn integrate_adaptive<F>(
    mut f: F,
    a: f64,
    b: f64,
    tol: QuadratureTolerance,
) -> CosmoResult<QuadratureResult>
where
    F: FnMut(f64) -> CosmoResult<f64>,
{
    if !a.is_finite() || !b.is_finite() {
        return Err(CosmoError::precondition(format!(
            "quadrature bounds must be finite, got [{a}, {b}]"
        )));
    }
    if a == b {
        return Ok(QuadratureResult {
            value: 0.0,
            error: 0.0,
            intervals: 0,
        });
    }

    let mut segments = vec![kronrod_segment(&mut f, a, b)?];

    loop {
        let value: f64 = segments.iter().map(|s| s.value).sum();
        let error: f64 = segments.iter().map(|s| s.error).sum();
        let abs_value: f64 = segments.iter().map(|s| s.abs_value).sum();

        let target = tol.abs.max(tol.rel * value.abs());
        let roundoff = 50.0 * f64::EPSILON * abs_value;
        if error <= target || error <= roundoff {
            return Ok(QuadratureResult {
                value,
                error,
                intervals: segments.len(),
            });
        }
        if segments.len() >= MAX_QUADRATURE_INTERVALS {
            return Err(CosmoError::divergence(
                "adaptive quadrature",
                format!(
                    "no convergence on [{a}, {b}] after {} intervals: value={value:e}, error={error:e}",
                    segments.len()
                ),
            ));
        }

        let worst = segments
            .iter()
            .enumerate()
            .max_by(|x, y| x.1.error.total_cmp(&y.1.error))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let seg = segments.swap_remove(worst);
        let mid = 0.5 * (seg.a + seg.b);
        segments.push(kronrod_segment(&mut f, seg.a, mid)?);
        segments.push(kronrod_segment(&mut f, mid, seg.b)?);
    }
}
