//! Planar two-domain solution (error functions).
//!
//! Domain 1, `x > x0`, diffusivity `k1`, initially at `c0`; domain 2, `x <= x0`, diffusivity
//! `k2`, initially empty. With `H = He·√(k2/k1)` and `ξ = x − x0`:
//!
//! ```text
//! T1(x,t) = c0/(1+H)·(1 + H·erf(ξ/(2√(k1·t))))        x > x0
//! T2(x,t) = He·c0/(1+H)·erfc(|ξ|/(2√(k2·t)))          x <= x0
//! ```
//!
//! so `T2(x0) = He·T1(x0⁺)`, the same partition convention as the spherical models.
use super::models::{ConcentrationModel, Evaluation, PlanarParameters, check_time};
use crate::Numerical::special::{erf, erfc};
use crate::errors::{HenryError, Phase};

#[derive(Debug, Clone)]
pub struct PlanarModel1D {
    params: PlanarParameters,
}

impl PlanarModel1D {
    pub fn new(params: PlanarParameters) -> Result<Self, HenryError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &PlanarParameters {
        &self.params
    }

    /// H = He·√(k2/k1)
    fn partition_factor(&self) -> f64 {
        self.params.henry * (self.params.k2 / self.params.k1).sqrt()
    }

    fn t1(&self, x: f64, t: f64) -> f64 {
        let p = &self.params;
        let h = self.partition_factor();
        p.c0 / (1.0 + h) * (1.0 + h * erf((x - p.x0) / (2.0 * (p.k1 * t).sqrt())))
    }

    fn t2(&self, x: f64, t: f64) -> f64 {
        let p = &self.params;
        let h = self.partition_factor();
        p.henry * p.c0 / (1.0 + h) * erfc((x - p.x0).abs() / (2.0 * (p.k2 * t).sqrt()))
    }

    /// Both branches on a common grid; each is 0.0 outside its own domain.
    pub fn profile(&self, xs: &[f64], t: f64) -> Result<(Vec<f64>, Vec<f64>), HenryError> {
        check_time(t)?;
        let x0 = self.params.x0;
        let t1 = xs
            .iter()
            .map(|&x| if x > x0 { self.t1(x, t) } else { 0.0 })
            .collect();
        let t2 = xs
            .iter()
            .map(|&x| if x <= x0 { self.t2(x, t) } else { 0.0 })
            .collect();
        Ok((t1, t2))
    }
}

impl ConcentrationModel for PlanarModel1D {
    fn gas_concentration(&self, x: f64, t: f64) -> Result<Evaluation, HenryError> {
        check_time(t)?;
        if !(x.is_finite() && x > self.params.x0) {
            return Err(HenryError::OutOfDomain {
                phase: Phase::Gas,
                r: x,
                lower: self.params.x0,
                upper: f64::INFINITY,
                lower_open: true,
            });
        }
        Ok(Evaluation::exact(self.t1(x, t)))
    }

    fn liquid_concentration(&self, x: f64, t: f64) -> Result<Evaluation, HenryError> {
        check_time(t)?;
        if !(x.is_finite() && x <= self.params.x0) {
            return Err(HenryError::OutOfDomain {
                phase: Phase::Liquid,
                r: x,
                lower: f64::NEG_INFINITY,
                upper: self.params.x0,
                lower_open: true,
            });
        }
        Ok(Evaluation::exact(self.t2(x, t)))
    }

    fn interface_position(&self) -> f64 {
        self.params.x0
    }

    fn model_name(&self) -> &'static str {
        "planar error-function solution (1D)"
    }
}
