// ─────────────────────────────────────────────────────────────────────
// SCPN Cosmo Core — Property-Based Tests (proptest) for cosmo-math
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for cosmo-math using proptest.
//!
//! Covers: FFT convolution against the direct oracle, Thomas solver,
//! Legendre bounds, spherical Bessel bounds, cubic spline knots, quadrature.

use cosmo_math::fft::{circular_convolve, circular_convolve_direct, wrap_index};
use cosmo_math::quadrature::{integrate_adaptive, QuadratureTolerance};
use cosmo_math::special::{legendre, spherical_bessel_j};
use cosmo_math::spline::CubicSpline;
use cosmo_math::tridiag::solve_tridiagonal;
use ndarray::Array1;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ── Convolution Properties ───────────────────────────────────────────

proptest! {
    /// FFT convolution reproduces the O(n²) cyclic sum for random data.
    #[test]
    fn fft_matches_direct(n in 1usize..96, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let a: Array1<f64> = (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect();
        let b: Array1<f64> = (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect();

        let fast = circular_convolve(&a, &b).unwrap();
        let slow = circular_convolve_direct(&a, &b).unwrap();
        for i in 0..n {
            prop_assert!((fast[i] - slow[i]).abs() < 1e-11,
                "n={} i={}: fft {} vs direct {}", n, i, fast[i], slow[i]);
        }
    }

    /// Convolution is commutative.
    #[test]
    fn convolution_commutes(n in 2usize..64, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let a: Array1<f64> = (0..n).map(|_| rng.gen_range(-5.0..5.0)).collect();
        let b: Array1<f64> = (0..n).map(|_| rng.gen_range(-5.0..5.0)).collect();
        let ab = circular_convolve(&a, &b).unwrap();
        let ba = circular_convolve(&b, &a).unwrap();
        for i in 0..n {
            prop_assert!((ab[i] - ba[i]).abs() < 1e-10);
        }
    }

    /// Wrapped indices stay in range and respect the period.
    #[test]
    fn wrap_index_is_periodic(index in -10_000isize..10_000, n in 1usize..500) {
        let w = wrap_index(index, n);
        prop_assert!(w < n);
        prop_assert_eq!(w, wrap_index(index + n as isize, n));
    }
}

// ── Thomas Solver Properties ─────────────────────────────────────────

proptest! {
    /// For any diagonally dominant tridiagonal system the solution satisfies Ax = d.
    #[test]
    fn thomas_solve_ax_eq_d(n in 3usize..30) {
        let a: Vec<f64> = (0..n).map(|i| if i > 0 { -0.3 } else { 0.0 }).collect();
        let b = vec![2.0; n];
        let c: Vec<f64> = (0..n).map(|i| if i < n - 1 { -0.3 } else { 0.0 }).collect();
        let d: Vec<f64> = (0..n).map(|i| (i as f64 + 1.0).sin()).collect();

        let x = solve_tridiagonal(&a, &b, &c, &d).unwrap();
        prop_assert_eq!(x.len(), n);
        for i in 0..n {
            let mut ax_i = b[i] * x[i];
            if i > 0 { ax_i += a[i] * x[i - 1]; }
            if i < n - 1 { ax_i += c[i] * x[i + 1]; }
            prop_assert!((ax_i - d[i]).abs() < 1e-10,
                "Ax[{}] = {}, d[{}] = {}", i, ax_i, i, d[i]);
        }
    }
}

// ── Special Function Properties ──────────────────────────────────────

proptest! {
    /// |P_ell(mu)| <= 1 on [-1, 1].
    #[test]
    fn legendre_bounded(ell in 0usize..20, mu in -1.0f64..=1.0) {
        prop_assert!(legendre(ell, mu).abs() <= 1.0 + 1e-12);
    }

    /// P_ell(-mu) = (-1)^ell P_ell(mu).
    #[test]
    fn legendre_parity(ell in 0usize..20, mu in -1.0f64..=1.0) {
        let sign = if ell % 2 == 0 { 1.0 } else { -1.0 };
        prop_assert!((legendre(ell, -mu) - sign * legendre(ell, mu)).abs() < 1e-12);
    }

    /// |j_ell(x)| <= 1 for x >= 0.
    #[test]
    fn spherical_bessel_bounded(ell in 0usize..10, x in 0.0f64..200.0) {
        prop_assert!(spherical_bessel_j(ell, x).abs() <= 1.0 + 1e-12);
    }

    /// Upward recurrence j_{l-1} + j_{l+1} = (2l+1)/x j_l holds across both branches.
    #[test]
    fn spherical_bessel_recurrence(ell in 1usize..7, x in 0.5f64..60.0) {
        let lhs = spherical_bessel_j(ell - 1, x) + spherical_bessel_j(ell + 1, x);
        let rhs = (2 * ell + 1) as f64 / x * spherical_bessel_j(ell, x);
        prop_assert!((lhs - rhs).abs() < 1e-10, "ell={} x={}: {} vs {}", ell, x, lhs, rhs);
    }
}

// ── Spline and Quadrature Properties ─────────────────────────────────

proptest! {
    /// A natural spline passes through every knot it was built from.
    #[test]
    fn spline_interpolates_knots(n in 2usize..40, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut x = Vec::with_capacity(n);
        let mut acc = 0.0;
        for _ in 0..n {
            acc += rng.gen_range(0.1..1.0);
            x.push(acc);
        }
        let y: Vec<f64> = (0..n).map(|_| rng.gen_range(-10.0..10.0)).collect();
        let spline = CubicSpline::new(Array1::from(x.clone()), Array1::from(y.clone())).unwrap();
        for i in 0..n {
            prop_assert!((spline.eval(x[i]).unwrap() - y[i]).abs() < 1e-9);
        }
    }

    /// Quadrature of c0 + c1 x + c2 x² over [a, b] is exact.
    #[test]
    fn quadrature_quadratic_exact(
        c0 in -5.0f64..5.0, c1 in -5.0f64..5.0, c2 in -5.0f64..5.0,
        a in -3.0f64..0.0, width in 0.1f64..4.0,
    ) {
        let b = a + width;
        let exact = c0 * (b - a) + c1 * (b * b - a * a) / 2.0 + c2 * (b.powi(3) - a.powi(3)) / 3.0;
        let res = integrate_adaptive(
            |x| Ok(c0 + c1 * x + c2 * x * x), a, b, QuadratureTolerance::default(),
        ).unwrap();
        prop_assert!((res.value - exact).abs() < 1e-11, "{} vs {}", res.value, exact);
    }
}
