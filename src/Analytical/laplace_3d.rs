//! # Laplace-inversion solution for a spherical bubble
//!
//! Gas sphere of radius `R0` (diffusivity `Dg`, initially at `c0`) in an unbounded liquid
//! (diffusivity `Dl`, initially empty), dimensionless Henry's constant `α`
//! (`c_l = α·c_g` at the interface).
//!
//! ## Method
//! The Laplace-domain solution is analytic except for a branch cut along the negative real
//! axis. Folding the Bromwich contour onto both banks of the cut leaves a real integral over
//! `x = -s > 0` in which only the jump across the cut, i.e. the imaginary part of the
//! transform, survives:
//!
//! ```text
//! f(t) = (1/π) ∫_0^∞ Im[F(-x)]·exp(-x·t) dx
//! ```
//!
//! On the cut the wave numbers are purely imaginary:
//!
//! ```text
//! λ_g(x) = i·√(x/Dg),   λ_l(x) = i·√(x/Dl)
//! ξ(x) = 2·Dg·(λ_g·R0·cosh(λ_g·R0) − sinh(λ_g·R0)) / (Dl·exp(−λ_l·R0)·(1 + λ_l·R0))
//! ζ(x) = ξ(x)·exp(−λ_l·R0)/(α·R0) + (2/R0)·sinh(λ_g·R0)
//! ```
//!
//! and the concentrations are
//!
//! ```text
//! c_g(t,r) = −2·c0/(π·r) ∫_0^x_max Im[sinh(λ_g·r)/ζ · exp(−x·t)] / x dx
//! c_l(t,r) =    c0/(π·r) ∫_0^x_max Im[ξ·exp(−λ_l·r)/ζ · exp(−x·t)] / x dx
//! ```
//!
//! [`LaplaceKernel`] keeps the complex transform functions complex; the integrands return
//! only the imaginary part as `f64`.
//!
//! ## Non-Obvious Features & Tips
//! - The `1/x` factor is integrable at `x → 0` but steep; the default quadrature settings
//!   integrate in `s` with `x = s²`, which also turns the `sin(√x·r)` oscillations into
//!   regular ones.
//! - `x_max` (default 1000) must be large against `1/t`: the kernel decays like `exp(−x·t)`.
//!   [`LaplaceModel3D::check_truncation`] compares against `2·x_max`.
//! - No eigenvalue search is needed, the method is valid for every `t > 0`.
use super::batch::{RadialProfile, evaluate_field, radial_profile};
use super::field::ConcentrationField;
use super::models::{
    ConcentrationModel, Evaluation, EvaluationPolicy, ProblemParameters, check_radius, check_time,
};
use crate::Numerical::quadrature::{QuadratureSettings, integrate};
use crate::errors::{HenryError, Phase, ensure_positive};
use log::{debug, info};
use num_complex::Complex64;
use std::cell::Cell;
use std::f64::consts::PI;

pub const DEFAULT_X_MAX: f64 = 1000.0;

/// Complex transform functions ξ(x), ζ(x) on the branch cut.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaplaceKernel {
    dg: f64,
    dl: f64,
    r0: f64,
    alpha: f64,
}

impl LaplaceKernel {
    pub fn new(params: &ProblemParameters) -> Self {
        Self {
            dg: params.dg,
            dl: params.dl,
            r0: params.r0,
            alpha: params.henry,
        }
    }
    /// λ_g(x) = i·√(x/Dg)
    pub fn lambda_g(&self, x: f64) -> Complex64 {
        Complex64::new(0.0, (x / self.dg).sqrt())
    }
    /// λ_l(x) = i·√(x/Dl)
    pub fn lambda_l(&self, x: f64) -> Complex64 {
        Complex64::new(0.0, (x / self.dl).sqrt())
    }

    pub fn xi(&self, x: f64) -> Complex64 {
        let lg_r0 = self.lambda_g(x) * self.r0;
        let ll_r0 = self.lambda_l(x) * self.r0;
        let numerator = (lg_r0 * lg_r0.cosh() - lg_r0.sinh()) * (2.0 * self.dg);
        let denominator = (-ll_r0).exp() * (ll_r0 + 1.0) * self.dl;
        numerator / denominator
    }

    pub fn zeta(&self, x: f64) -> Complex64 {
        let lg_r0 = self.lambda_g(x) * self.r0;
        let ll_r0 = self.lambda_l(x) * self.r0;
        self.xi(x) * (-ll_r0).exp() / (self.alpha * self.r0) + lg_r0.sinh() * (2.0 / self.r0)
    }
}

/// Im[sinh(λ_g·r)/ζ·exp(−x·t)]/x bound to one (r, t).
pub struct GasLaplaceIntegrand<'a> {
    kernel: &'a LaplaceKernel,
    r: f64,
    t: f64,
    degenerate: Cell<usize>,
}

impl<'a> GasLaplaceIntegrand<'a> {
    pub fn new(kernel: &'a LaplaceKernel, r: f64, t: f64) -> Self {
        Self {
            kernel,
            r,
            t,
            degenerate: Cell::new(0),
        }
    }

    pub fn eval(&self, x: f64) -> f64 {
        let zeta = self.kernel.zeta(x);
        if zeta.norm_sqr() == 0.0 || x == 0.0 {
            self.degenerate.set(self.degenerate.get() + 1);
            debug!("zero denominator of the gas kernel at x = {}", x);
            return 0.0;
        }
        let transform = (self.kernel.lambda_g(x) * self.r).sinh() / zeta * (-x * self.t).exp();
        let value = transform.im / x;
        if !value.is_finite() {
            self.degenerate.set(self.degenerate.get() + 1);
            debug!("non-finite gas kernel at x = {}", x);
            return 0.0;
        }
        value
    }

    pub fn degenerate_samples(&self) -> usize {
        self.degenerate.get()
    }
}

/// Im[ξ·exp(−λ_l·r)/ζ·exp(−x·t)]/x bound to one (r, t).
pub struct LiquidLaplaceIntegrand<'a> {
    kernel: &'a LaplaceKernel,
    r: f64,
    t: f64,
    degenerate: Cell<usize>,
}

impl<'a> LiquidLaplaceIntegrand<'a> {
    pub fn new(kernel: &'a LaplaceKernel, r: f64, t: f64) -> Self {
        Self {
            kernel,
            r,
            t,
            degenerate: Cell::new(0),
        }
    }

    pub fn eval(&self, x: f64) -> f64 {
        let zeta = self.kernel.zeta(x);
        if zeta.norm_sqr() == 0.0 || x == 0.0 {
            self.degenerate.set(self.degenerate.get() + 1);
            debug!("zero denominator of the liquid kernel at x = {}", x);
            return 0.0;
        }
        let decay = (-self.kernel.lambda_l(x) * self.r).exp();
        let transform = self.kernel.xi(x) * decay / zeta * (-x * self.t).exp();
        let value = transform.im / x;
        if !value.is_finite() {
            self.degenerate.set(self.degenerate.get() + 1);
            debug!("non-finite liquid kernel at x = {}", x);
            return 0.0;
        }
        value
    }

    pub fn degenerate_samples(&self) -> usize {
        self.degenerate.get()
    }
}

/// Result of re-running an evaluation with a doubled truncation bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TruncationCheck {
    pub base: Evaluation,
    pub doubled: Evaluation,
    /// |doubled − base| / |doubled|
    pub relative_change: f64,
}

impl TruncationCheck {
    pub fn is_converged(&self, rel_tol: f64) -> bool {
        self.relative_change <= rel_tol
    }
}

/// 3D evaluator: numerical inversion of the Laplace-domain Green's function.
///
/// # Examples
/// ```rust, ignore
/// let params = ProblemParameters::new(1.0, 4.0, 1.0, 1.0, 1.0)?;
/// let model = LaplaceModel3D::new(params)?.with_x_max(2000.0)?;
/// let cg = model.gas_concentration(0.5, 1.2)?;
/// let cl = model.liquid_concentration(1.5, 1.2)?;
/// ```
#[derive(Debug, Clone)]
pub struct LaplaceModel3D {
    params: ProblemParameters,
    kernel: LaplaceKernel,
    x_max: f64,
    settings: QuadratureSettings,
    policy: EvaluationPolicy,
}

impl LaplaceModel3D {
    pub fn new(params: ProblemParameters) -> Result<Self, HenryError> {
        params.validate()?;
        Ok(Self {
            params,
            kernel: LaplaceKernel::new(&params),
            x_max: DEFAULT_X_MAX,
            settings: QuadratureSettings::laplace_default(),
            policy: EvaluationPolicy::default(),
        })
    }

    pub fn with_x_max(mut self, x_max: f64) -> Result<Self, HenryError> {
        self.x_max = ensure_positive("x_max", x_max)?;
        Ok(self)
    }

    pub fn with_quadrature(mut self, settings: QuadratureSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_policy(mut self, policy: EvaluationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn params(&self) -> &ProblemParameters {
        &self.params
    }

    pub fn kernel(&self) -> &LaplaceKernel {
        &self.kernel
    }

    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    fn gas_with_bound(&self, r: f64, t: f64, x_max: f64) -> Result<Evaluation, HenryError> {
        check_radius(Phase::Gas, r, 0.0, self.params.r0)?;
        check_time(t)?;
        let integrand = GasLaplaceIntegrand::new(&self.kernel, r, t);
        let res = integrate(|x| integrand.eval(x), 0.0, x_max, &self.settings)?;
        let prefactor = -2.0 * self.params.c0 / (PI * r);
        let evaluation =
            Evaluation::from_quadrature(res, prefactor, integrand.degenerate_samples(), x_max);
        self.policy.check(evaluation)
    }

    fn liquid_with_bound(&self, r: f64, t: f64, x_max: f64) -> Result<Evaluation, HenryError> {
        check_radius(Phase::Liquid, r, self.params.r0, f64::INFINITY)?;
        check_time(t)?;
        let integrand = LiquidLaplaceIntegrand::new(&self.kernel, r, t);
        let res = integrate(|x| integrand.eval(x), 0.0, x_max, &self.settings)?;
        let prefactor = self.params.c0 / (PI * r);
        let evaluation =
            Evaluation::from_quadrature(res, prefactor, integrand.degenerate_samples(), x_max);
        self.policy.check(evaluation)
    }

    /// Evaluates with `x_max` and `2·x_max` to expose truncation bias.
    pub fn check_truncation(
        &self,
        phase: Phase,
        r: f64,
        t: f64,
    ) -> Result<TruncationCheck, HenryError> {
        let (base, doubled) = match phase {
            Phase::Gas => (
                self.gas_with_bound(r, t, self.x_max)?,
                self.gas_with_bound(r, t, 2.0 * self.x_max)?,
            ),
            Phase::Liquid => (
                self.liquid_with_bound(r, t, self.x_max)?,
                self.liquid_with_bound(r, t, 2.0 * self.x_max)?,
            ),
        };
        let scale = doubled.value.abs().max(f64::MIN_POSITIVE);
        let relative_change = (doubled.value - base.value).abs() / scale;
        info!(
            "truncation check ({}, r = {}, t = {}): x_max = {} -> {:e}, 2·x_max -> {:e}, change {:e}",
            phase, r, t, self.x_max, base.value, doubled.value, relative_change
        );
        Ok(TruncationCheck {
            base,
            doubled,
            relative_change,
        })
    }

    /// c_g(t) at a fixed radius, one row per time.
    pub fn cg_series(&self, r: f64, times: &[f64]) -> ConcentrationField {
        evaluate_field(self, Phase::Gas, &[r], times)
    }

    /// c_l(t) at a fixed radius, one row per time.
    pub fn cl_series(&self, r: f64, times: &[f64]) -> ConcentrationField {
        evaluate_field(self, Phase::Liquid, &[r], times)
    }

    /// Gas profile on `radii_inside` followed by the liquid profile on `radii_outside`.
    pub fn radial_profile(
        &self,
        t: f64,
        radii_inside: &[f64],
        radii_outside: &[f64],
    ) -> RadialProfile {
        radial_profile(self, t, radii_inside, radii_outside)
    }
}

impl ConcentrationModel for LaplaceModel3D {
    fn gas_concentration(&self, r: f64, t: f64) -> Result<Evaluation, HenryError> {
        self.gas_with_bound(r, t, self.x_max)
    }

    fn liquid_concentration(&self, r: f64, t: f64) -> Result<Evaluation, HenryError> {
        self.liquid_with_bound(r, t, self.x_max)
    }

    fn interface_position(&self) -> f64 {
        self.params.r0
    }

    fn model_name(&self) -> &'static str {
        "Laplace inversion (3D)"
    }
}
