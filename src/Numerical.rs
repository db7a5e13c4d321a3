//! # Numerical building blocks
//!
//! Everything the evaluators need from "numerical library land" and nothing physical:
//!
//! - [`special`]: Bessel functions of the first and second kind of orders 0 and 1 and the
//!   error functions. Thin wrappers over the `spec_math` and `libm` crates, so the rest of the
//!   crate does not care which implementation is behind them.
//! - [`quadrature`]: globally adaptive Gauss–Kronrod (21 points) integration on a finite
//!   interval with absolute/relative tolerances, a subdivision cap, an optional deadline and an
//!   optional `x = a + s²` substitution for integrable singularities at the lower bound.
//!
//! ## Non-Obvious Features & Tips
//! - The Kronrod rule never samples the interval endpoints, so integrands that blow up
//!   (integrably) at `a` or `b` may be passed as they are.
//! - A non-finite sample is an error, not a silent `NaN` in the result: the integrand must
//!   guard its own removable singularities.
//! - [`quadrature::QuadratureResult`] always carries the error estimate, the number of
//!   subintervals and the convergence flag. Callers decide what an unconverged result means.
pub mod quadrature;
pub mod special;
