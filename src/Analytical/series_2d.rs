//! # Eigenfunction series (Hankel-type) solution
//!
//! Gas inside a circle of radius `R0`, liquid outside, diffusivities `Dg` and `Dl`, partition
//! `c_l = He·c_g` at the interface. The solution is a continuous superposition of Bessel modes:
//!
//! ```text
//! c_g(r,t) = 4·c0·Dg·Dl²·He/(π²·R0) ∫_0^∞ exp(-Dg·u²·t)·J0(u·r)·J1(u·R0) / (u²·(Φ²+Ψ²)) du
//! c_l(r,t) = 2·c0·Dg·√Dl·He/π ∫_0^∞ exp(-Dg·u²·t)·J1(u·R0)·(J0(D·u·r)·Φ − Y0(D·u·r)·Ψ) / (u·(Φ²+Ψ²)) du
//! ```
//!
//! with `D = √(Dg/Dl)` and
//!
//! ```text
//! Φ(u) = Dg·√Dl·J1(u·R0)·Y0(D·u·R0) − He·Dl·√Dg·J0(u·R0)·Y1(D·u·R0)
//! Ψ(u) = Dg·√Dl·J1(u·R0)·J0(D·u·R0) − He·Dl·√Dg·J0(u·R0)·J1(D·u·R0)
//! ```
//!
//! The gas-side Bessel functions take `u·R0`, the liquid-side ones the scaled `D·u·R0`.
//!
//! ## Truncation
//! The Gaussian factor makes the integrand negligible beyond `U_max(t) = 5/√(Dg·t)`, so short
//! times need a longer frequency axis. `t = 0` is rejected.
//!
//! ## Zero denominators
//! `Φ² + Ψ²` can vanish at isolated frequencies. A node where the denominator is zero, or so
//! small that the quotient overflows, contributes 0 and is counted in [`Evaluation::degenerate_samples`]; with
//! [`EvaluationPolicy::Strict`] it becomes an error instead.
use super::batch::evaluate_field;
use super::field::ConcentrationField;
use super::models::{
    ConcentrationModel, Evaluation, EvaluationPolicy, ProblemParameters, check_radius, check_time,
};
use crate::Numerical::quadrature::{QuadratureSettings, integrate};
use crate::Numerical::special::{j0, j1, y0, y1};
use crate::errors::{HenryError, Phase};
use log::debug;
use std::cell::Cell;
use std::f64::consts::PI;

/// The pair of auxiliary transform functions Φ(u), Ψ(u) of the series.
pub trait SpectralPair {
    fn phi(&self, u: f64) -> f64;
    fn psi(&self, u: f64) -> f64;
}

/// Φ and Ψ built from Bessel functions of the problem parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BesselPair {
    r0: f64,
    /// D = √(Dg/Dl)
    d: f64,
    /// Dg·√Dl
    gas_coef: f64,
    /// He·Dl·√Dg
    liquid_coef: f64,
}

impl BesselPair {
    pub fn new(params: &ProblemParameters) -> Self {
        Self {
            r0: params.r0,
            d: params.diffusivity_ratio(),
            gas_coef: params.dg * params.dl.sqrt(),
            liquid_coef: params.henry * params.dl * params.dg.sqrt(),
        }
    }
}

impl SpectralPair for BesselPair {
    fn phi(&self, u: f64) -> f64 {
        let ur0 = u * self.r0;
        let dur0 = self.d * ur0;
        self.gas_coef * j1(ur0) * y0(dur0) - self.liquid_coef * j0(ur0) * y1(dur0)
    }

    fn psi(&self, u: f64) -> f64 {
        let ur0 = u * self.r0;
        let dur0 = self.d * ur0;
        self.gas_coef * j1(ur0) * j0(dur0) - self.liquid_coef * j0(ur0) * j1(dur0)
    }
}

/// Gas-side integrand bound to one (r, t).
pub struct GasSeriesIntegrand<'a, S: SpectralPair> {
    pair: &'a S,
    dg: f64,
    r0: f64,
    r: f64,
    t: f64,
    degenerate: Cell<usize>,
}

impl<'a, S: SpectralPair> GasSeriesIntegrand<'a, S> {
    pub fn new(pair: &'a S, dg: f64, r0: f64, r: f64, t: f64) -> Self {
        Self {
            pair,
            dg,
            r0,
            r,
            t,
            degenerate: Cell::new(0),
        }
    }

    pub fn eval(&self, u: f64) -> f64 {
        let phi = self.pair.phi(u);
        let psi = self.pair.psi(u);
        let denominator = u * u * (phi * phi + psi * psi);
        let numerator = (-self.dg * u * u * self.t).exp() * j0(u * self.r) * j1(u * self.r0);
        let value = numerator / denominator;
        if denominator == 0.0 || !value.is_finite() {
            self.degenerate.set(self.degenerate.get() + 1);
            debug!("vanishing denominator of the gas integrand at u = {}", u);
            return 0.0;
        }
        value
    }

    pub fn degenerate_samples(&self) -> usize {
        self.degenerate.get()
    }
}

/// Liquid-side integrand bound to one (r, t).
pub struct LiquidSeriesIntegrand<'a, S: SpectralPair> {
    pair: &'a S,
    dg: f64,
    r0: f64,
    d: f64,
    r: f64,
    t: f64,
    degenerate: Cell<usize>,
}

impl<'a, S: SpectralPair> LiquidSeriesIntegrand<'a, S> {
    pub fn new(pair: &'a S, params: &ProblemParameters, r: f64, t: f64) -> Self {
        Self {
            pair,
            dg: params.dg,
            r0: params.r0,
            d: params.diffusivity_ratio(),
            r,
            t,
            degenerate: Cell::new(0),
        }
    }

    pub fn eval(&self, u: f64) -> f64 {
        let phi = self.pair.phi(u);
        let psi = self.pair.psi(u);
        let denominator = u * (phi * phi + psi * psi);
        let dur = self.d * u * self.r;
        let numerator = (-self.dg * u * u * self.t).exp()
            * j1(u * self.r0)
            * (j0(dur) * phi - y0(dur) * psi);
        let value = numerator / denominator;
        if denominator == 0.0 || !value.is_finite() {
            self.degenerate.set(self.degenerate.get() + 1);
            debug!("vanishing denominator of the liquid integrand at u = {}", u);
            return 0.0;
        }
        value
    }

    pub fn degenerate_samples(&self) -> usize {
        self.degenerate.get()
    }
}

/// 2D evaluator: eigenfunction expansion integrated over a truncated frequency axis.
///
/// # Examples
/// ```rust, ignore
/// let params = ProblemParameters::new(1.0, 4.0, 2.0, 2.0, 1.0)?;
/// let model = SeriesModel2D::new(params)?;
/// let cg = model.gas_concentration(1.0, 0.5)?;
/// println!("c_g = {} ± {}", cg.value, cg.abs_error);
/// ```
#[derive(Debug, Clone)]
pub struct SeriesModel2D {
    params: ProblemParameters,
    pair: BesselPair,
    settings: QuadratureSettings,
    policy: EvaluationPolicy,
}

impl SeriesModel2D {
    pub fn new(params: ProblemParameters) -> Result<Self, HenryError> {
        params.validate()?;
        Ok(Self {
            params,
            pair: BesselPair::new(&params),
            settings: QuadratureSettings::series_default(),
            policy: EvaluationPolicy::default(),
        })
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

    pub fn pair(&self) -> &BesselPair {
        &self.pair
    }

    /// U_max(t) = 5/√(Dg·t)
    pub fn truncation_bound(&self, t: f64) -> Result<f64, HenryError> {
        check_time(t)?;
        Ok(5.0 / (self.params.dg * t).sqrt())
    }

    /// 4·c0·Dg·Dl²·He/(π²·R0)
    pub fn gas_prefactor(&self) -> f64 {
        let p = &self.params;
        4.0 * p.c0 * p.dg * p.dl * p.dl * p.henry / (PI * PI * p.r0)
    }

    /// 2·c0·Dg·√Dl·He/π
    pub fn liquid_prefactor(&self) -> f64 {
        let p = &self.params;
        2.0 * p.c0 * p.dg * p.dl.sqrt() * p.henry / PI
    }

    /// Gas concentration grid, rows are `times`, columns are `radii`.
    pub fn compute_cg(&self, radii: &[f64], times: &[f64]) -> ConcentrationField {
        evaluate_field(self, Phase::Gas, radii, times)
    }

    /// Liquid concentration grid, rows are `times`, columns are `radii`.
    pub fn compute_cl(&self, radii: &[f64], times: &[f64]) -> ConcentrationField {
        evaluate_field(self, Phase::Liquid, radii, times)
    }
}

impl ConcentrationModel for SeriesModel2D {
    fn gas_concentration(&self, r: f64, t: f64) -> Result<Evaluation, HenryError> {
        check_radius(Phase::Gas, r, 0.0, self.params.r0)?;
        let upper = self.truncation_bound(t)?;
        let integrand = GasSeriesIntegrand::new(&self.pair, self.params.dg, self.params.r0, r, t);
        let res = integrate(|u| integrand.eval(u), 0.0, upper, &self.settings)?;
        let evaluation = Evaluation::from_quadrature(
            res,
            self.gas_prefactor(),
            integrand.degenerate_samples(),
            upper,
        );
        self.policy.check(evaluation)
    }

    fn liquid_concentration(&self, r: f64, t: f64) -> Result<Evaluation, HenryError> {
        check_radius(Phase::Liquid, r, self.params.r0, f64::INFINITY)?;
        let upper = self.truncation_bound(t)?;
        let integrand = LiquidSeriesIntegrand::new(&self.pair, &self.params, r, t);
        let res = integrate(|u| integrand.eval(u), 0.0, upper, &self.settings)?;
        let evaluation = Evaluation::from_quadrature(
            res,
            self.liquid_prefactor(),
            integrand.degenerate_samples(),
            upper,
        );
        self.policy.check(evaluation)
    }

    fn interface_position(&self) -> f64 {
        self.params.r0
    }

    fn model_name(&self) -> &'static str {
        "eigenfunction series (2D)"
    }
}
