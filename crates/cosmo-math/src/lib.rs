//! Numerical primitives for SCPN Cosmo Core.

pub mod fft;
pub mod quadrature;
pub mod special;
pub mod spline;
pub mod tridiag;
