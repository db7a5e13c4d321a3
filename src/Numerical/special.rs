//! Special functions consumed by the analytical solutions.
//!
//! Bessel functions come from `spec_math` (cephes port), error functions from `libm`.
use spec_math::Bessel;

/// Bessel function of the first kind, order 0
pub fn j0(x: f64) -> f64 {
    x.bessel_jv(0.0)
}
/// Bessel function of the first kind, order 1
pub fn j1(x: f64) -> f64 {
    x.bessel_jv(1.0)
}
/// Bessel function of the second kind, order 0. Singular (-inf) at x = 0
pub fn y0(x: f64) -> f64 {
    x.bessel_yv(0.0)
}
/// Bessel function of the second kind, order 1. Singular (-inf) at x = 0
pub fn y1(x: f64) -> f64 {
    x.bessel_yv(1.0)
}

pub fn erf(x: f64) -> f64 {
    libm::erf(x)
}

pub fn erfc(x: f64) -> f64 {
    libm::erfc(x)
}
