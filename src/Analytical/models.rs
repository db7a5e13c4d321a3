//! Shared vocabulary of the analytical models: parameter records, the evaluation result with
//! its diagnostics, the strictness policy and the [`ConcentrationModel`] trait dispatched over
//! [`HenryModel`].
use super::laplace_3d::LaplaceModel3D;
use super::planar_1d::PlanarModel1D;
use super::series_2d::SeriesModel2D;
use crate::Numerical::quadrature::QuadratureResult;
use crate::errors::{HenryError, Phase, ensure_positive};
use enum_dispatch::enum_dispatch;
use log::warn;
use serde::{Deserialize, Serialize};

/// Physical parameters of the spherical (2D/3D) problems.
///
/// # Fields
/// - `dg`: gas-phase diffusivity
/// - `dl`: liquid-phase diffusivity
/// - `r0`: interface radius
/// - `henry`: Henry's constant (the dimensionless α of the Laplace model)
/// - `c0`: initial concentration inside the bubble
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProblemParameters {
    pub dg: f64,
    pub dl: f64,
    pub r0: f64,
    pub henry: f64,
    pub c0: f64,
}

impl ProblemParameters {
    pub fn new(dg: f64, dl: f64, r0: f64, henry: f64, c0: f64) -> Result<Self, HenryError> {
        let params = Self {
            dg,
            dl,
            r0,
            henry,
            c0,
        };
        params.validate()?;
        Ok(params)
    }
    /// Re-checks a record built by hand or by deserialization.
    pub fn validate(&self) -> Result<(), HenryError> {
        ensure_positive("Dg", self.dg)?;
        ensure_positive("Dl", self.dl)?;
        ensure_positive("R0", self.r0)?;
        ensure_positive("He", self.henry)?;
        ensure_positive("c0", self.c0)?;
        Ok(())
    }
    /// D = sqrt(Dg/Dl)
    pub fn diffusivity_ratio(&self) -> f64 {
        (self.dg / self.dl).sqrt()
    }
}

/// Parameters of the planar problem: domain 1 (x > x0, initially at `c0`) with diffusivity
/// `k1`, domain 2 (x <= x0, initially empty) with diffusivity `k2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanarParameters {
    pub k1: f64,
    pub k2: f64,
    pub henry: f64,
    pub x0: f64,
    pub c0: f64,
}

impl PlanarParameters {
    pub fn new(k1: f64, k2: f64, henry: f64, x0: f64, c0: f64) -> Result<Self, HenryError> {
        let params = Self {
            k1,
            k2,
            henry,
            x0,
            c0,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), HenryError> {
        ensure_positive("k1", self.k1)?;
        ensure_positive("k2", self.k2)?;
        ensure_positive("He", self.henry)?;
        ensure_positive("c0", self.c0)?;
        if !self.x0.is_finite() {
            return Err(HenryError::InvalidParameter {
                name: "x0",
                value: self.x0,
            });
        }
        Ok(())
    }
}

/// One concentration value with the diagnostics of the integral behind it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub value: f64,
    /// error estimate, scaled by the same prefactor as `value`
    pub abs_error: f64,
    pub subdivisions: usize,
    pub evaluations: usize,
    pub converged: bool,
    pub timed_out: bool,
    /// quadrature nodes where the integrand denominator was exactly zero
    pub degenerate_samples: usize,
    /// truncation bound of the transform variable
    pub upper_bound: f64,
}

impl Evaluation {
    /// closed-form value, no integration behind it
    pub fn exact(value: f64) -> Self {
        Self {
            value,
            abs_error: 0.0,
            subdivisions: 0,
            evaluations: 0,
            converged: true,
            timed_out: false,
            degenerate_samples: 0,
            upper_bound: f64::INFINITY,
        }
    }

    pub(crate) fn from_quadrature(
        res: QuadratureResult,
        prefactor: f64,
        degenerate_samples: usize,
        upper_bound: f64,
    ) -> Self {
        Self {
            value: prefactor * res.value,
            abs_error: prefactor.abs() * res.abs_error,
            subdivisions: res.subdivisions,
            evaluations: res.evaluations,
            converged: res.converged,
            timed_out: res.timed_out,
            degenerate_samples,
            upper_bound,
        }
    }

    pub fn relative_error(&self) -> f64 {
        if self.value == 0.0 {
            self.abs_error
        } else {
            self.abs_error / self.value.abs()
        }
    }
}

/// What to do with unconverged integrals and zero-denominator samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EvaluationPolicy {
    /// report them in the [`Evaluation`] and log a warning
    #[default]
    Lenient,
    /// turn them into errors
    Strict,
}

impl EvaluationPolicy {
    pub fn check(&self, evaluation: Evaluation) -> Result<Evaluation, HenryError> {
        match self {
            EvaluationPolicy::Lenient => {
                if evaluation.timed_out {
                    warn!(
                        "integration deadline hit: value {:e}, error estimate {:e}",
                        evaluation.value, evaluation.abs_error
                    );
                } else if !evaluation.converged {
                    warn!(
                        "integration not converged after {} subintervals: value {:e}, error estimate {:e} ({:.1e} relative)",
                        evaluation.subdivisions,
                        evaluation.value,
                        evaluation.abs_error,
                        evaluation.relative_error()
                    );
                }
                if evaluation.degenerate_samples > 0 {
                    warn!(
                        "{} degenerate samples (vanishing denominator or non-finite quotient) replaced by 0",
                        evaluation.degenerate_samples
                    );
                }
                Ok(evaluation)
            }
            EvaluationPolicy::Strict => {
                if evaluation.timed_out {
                    return Err(HenryError::Timeout {
                        value: evaluation.value,
                        abs_error: evaluation.abs_error,
                    });
                }
                if !evaluation.converged {
                    return Err(HenryError::NonConvergence {
                        value: evaluation.value,
                        abs_error: evaluation.abs_error,
                        subdivisions: evaluation.subdivisions,
                    });
                }
                if evaluation.degenerate_samples > 0 {
                    return Err(HenryError::NumericalDegeneracy(format!(
                        "{} samples with zero denominator",
                        evaluation.degenerate_samples
                    )));
                }
                Ok(evaluation)
            }
        }
    }
}

/// Checks that `t` is a valid (strictly positive) time.
pub(crate) fn check_time(t: f64) -> Result<(), HenryError> {
    ensure_positive("t", t).map(|_| ())
}

/// Checks `lower <= r <= upper` for a finite, strictly positive radius; with `lower <= 0` the
/// domain is reported as `(0, upper]`.
pub(crate) fn check_radius(phase: Phase, r: f64, lower: f64, upper: f64) -> Result<(), HenryError> {
    let inside = r.is_finite() && r >= lower && r <= upper && r > 0.0;
    if inside {
        Ok(())
    } else {
        Err(HenryError::OutOfDomain {
            phase,
            r,
            lower: lower.max(0.0),
            upper,
            lower_open: lower <= 0.0,
        })
    }
}

/// Common interface of the 1D, 2D and 3D solutions.
#[enum_dispatch]
pub trait ConcentrationModel {
    /// concentration on the gas (source) side at coordinate `r` and time `t`
    fn gas_concentration(&self, r: f64, t: f64) -> Result<Evaluation, HenryError>;
    /// concentration on the liquid (host) side
    fn liquid_concentration(&self, r: f64, t: f64) -> Result<Evaluation, HenryError>;
    /// R0 for the spherical models, x0 for the planar one
    fn interface_position(&self) -> f64;
    fn model_name(&self) -> &'static str;

    fn concentration(&self, phase: Phase, r: f64, t: f64) -> Result<Evaluation, HenryError> {
        match phase {
            Phase::Gas => self.gas_concentration(r, t),
            Phase::Liquid => self.liquid_concentration(r, t),
        }
    }
}

#[enum_dispatch(ConcentrationModel)]
#[derive(Debug, Clone)]
pub enum HenryModel {
    Planar(PlanarModel1D),
    Series(SeriesModel2D),
    Laplace(LaplaceModel3D),
}

/// Model kinds accepted in task files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelKind {
    Planar1D,
    Series2D,
    Laplace3D,
}
