//! # Adaptive Gauss–Kronrod quadrature
//!
//! Globally adaptive integration in the QUADPACK `QAG` manner: the interval is covered by
//! subintervals, each carrying a 21-point Kronrod estimate and an error estimate obtained
//! from the embedded 10-point Gauss rule. The subinterval with the largest error is bisected
//! until
//!
//! ```text
//! Σ error ≤ max(abs_tol, rel_tol·|Σ value|)
//! ```
//!
//! or until the subdivision cap or the deadline is reached. In the latter cases the current
//! estimate is still returned, flagged as not converged.
//!
//! ## Singular lower bound
//! With `sqrt_substitution` the integral is rewritten with `x = a + s²`:
//!
//! ```text
//! ∫_a^b f(x) dx = ∫_0^√(b-a) 2·s·f(a + s²) ds
//! ```
//!
//! which turns `1/√(x-a)` behaviour into a bounded integrand and `1/x`-type kernels whose
//! numerators vanish like `√x` into smooth ones.
use crate::errors::HenryError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

/// Kronrod abscissae (positive half, the last one is the centre)
const XGK: [f64; 11] = [
    0.995657163025808080735527280689003,
    0.973906528517171720077964012084452,
    0.930157491355708226001207180059508,
    0.865063366688984510732096688423493,
    0.780817726586416897063717578345042,
    0.679409568299024406234327365114874,
    0.562757134668604683339000099272694,
    0.433395394129247190799265943165784,
    0.294392862701460198131126603103866,
    0.148874338981631210884826001129720,
    0.000000000000000000000000000000000,
];
/// Kronrod weights
const WGK: [f64; 11] = [
    0.011694638867371874278064396062192,
    0.032558162307964727478818972459390,
    0.054755896574351996031381300244580,
    0.075039674810919952767043140916190,
    0.093125454583697605535065465083366,
    0.109387158802297641899210590325805,
    0.123491976262065851077208977211822,
    0.134709217311473325928054001771707,
    0.142775938577060080797094273138717,
    0.147739104901338491374841515972068,
    0.149445554002916905664936468389821,
];
/// Gauss weights of the embedded 10-point rule, for XGK[1], XGK[3], ..., XGK[9]
const WG: [f64; 5] = [
    0.066671344308688137593568809893332,
    0.149451349150580593145776339657697,
    0.219086362515982043995534934228163,
    0.269266719309996355091226921569469,
    0.295524224714752870173892994651338,
];

/// Knobs of the adaptive integrator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuadratureSettings {
    /// absolute error tolerance
    pub abs_tol: f64,
    /// relative error tolerance
    pub rel_tol: f64,
    /// maximal number of subintervals
    pub max_subdivisions: usize,
    /// integrate in s with x = a + s² (singular lower bound)
    #[serde(default)]
    pub sqrt_substitution: bool,
    /// wall-clock budget of one integration call
    #[serde(default)]
    pub max_duration: Option<Duration>,
}

impl Default for QuadratureSettings {
    fn default() -> Self {
        Self::series_default()
    }
}

impl QuadratureSettings {
    /// tolerances 1e-6, 500 subintervals
    pub fn series_default() -> Self {
        Self {
            abs_tol: 1e-6,
            rel_tol: 1e-6,
            max_subdivisions: 500,
            sqrt_substitution: false,
            max_duration: None,
        }
    }
    /// tolerances 1.49e-8, 500 subintervals, substitution x = s² on
    pub fn laplace_default() -> Self {
        Self {
            abs_tol: 1.49e-8,
            rel_tol: 1.49e-8,
            max_subdivisions: 500,
            sqrt_substitution: true,
            max_duration: None,
        }
    }

    pub fn with_tolerances(mut self, abs_tol: f64, rel_tol: f64) -> Self {
        self.abs_tol = abs_tol;
        self.rel_tol = rel_tol;
        self
    }

    pub fn with_max_subdivisions(mut self, max_subdivisions: usize) -> Self {
        self.max_subdivisions = max_subdivisions;
        self
    }

    pub fn with_sqrt_substitution(mut self, on: bool) -> Self {
        self.sqrt_substitution = on;
        self
    }

    pub fn with_deadline(mut self, max_duration: Duration) -> Self {
        self.max_duration = Some(max_duration);
        self
    }

    pub fn validate(&self) -> Result<(), HenryError> {
        if !(self.abs_tol >= 0.0 && self.abs_tol.is_finite()) {
            return Err(HenryError::InvalidParameter {
                name: "abs_tol",
                value: self.abs_tol,
            });
        }
        if !(self.rel_tol >= 0.0 && self.rel_tol.is_finite()) {
            return Err(HenryError::InvalidParameter {
                name: "rel_tol",
                value: self.rel_tol,
            });
        }
        if self.abs_tol == 0.0 && self.rel_tol == 0.0 {
            return Err(HenryError::Config(
                "abs_tol and rel_tol cannot both be zero".to_string(),
            ));
        }
        if self.max_subdivisions == 0 {
            return Err(HenryError::InvalidParameter {
                name: "max_subdivisions",
                value: 0.0,
            });
        }
        Ok(())
    }
}

/// Integral estimate and its diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuadratureResult {
    pub value: f64,
    /// estimate of |value - exact integral|
    pub abs_error: f64,
    /// number of subintervals at exit
    pub subdivisions: usize,
    /// number of integrand calls
    pub evaluations: usize,
    pub converged: bool,
    pub timed_out: bool,
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    a: f64,
    b: f64,
    value: f64,
    error: f64,
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        self.error.total_cmp(&other.error) == Ordering::Equal
    }
}
impl Eq for Segment {}
impl PartialOrd for Segment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Segment {
    fn cmp(&self, other: &Self) -> Ordering {
        self.error.total_cmp(&other.error)
    }
}

fn sample<F: Fn(f64) -> f64>(f: &F, x: f64) -> Result<f64, HenryError> {
    let y = f(x);
    if y.is_finite() {
        Ok(y)
    } else {
        Err(HenryError::NumericalDegeneracy(format!(
            "integrand returned {} at x = {}",
            y, x
        )))
    }
}

/// 21-point Kronrod rule with the QUADPACK error heuristic
fn gauss_kronrod_21<F: Fn(f64) -> f64>(f: &F, a: f64, b: f64) -> Result<Segment, HenryError> {
    let centre = 0.5 * (a + b);
    let half_length = 0.5 * (b - a);
    let abs_half_length = half_length.abs();

    let fc = sample(f, centre)?;
    let mut res_gauss = 0.0;
    let mut res_kronrod = WGK[10] * fc;
    let mut res_abs = res_kronrod.abs();
    let mut fv1 = [0.0; 10];
    let mut fv2 = [0.0; 10];

    for j in 0..10 {
        let dx = half_length * XGK[j];
        let f1 = sample(f, centre - dx)?;
        let f2 = sample(f, centre + dx)?;
        fv1[j] = f1;
        fv2[j] = f2;
        let pair = f1 + f2;
        res_kronrod += WGK[j] * pair;
        res_abs += WGK[j] * (f1.abs() + f2.abs());
        if j % 2 == 1 {
            res_gauss += WG[j / 2] * pair;
        }
    }

    let mean = 0.5 * res_kronrod;
    let mut res_asc = WGK[10] * (fc - mean).abs();
    for j in 0..10 {
        res_asc += WGK[j] * ((fv1[j] - mean).abs() + (fv2[j] - mean).abs());
    }

    let value = res_kronrod * half_length;
    res_abs *= abs_half_length;
    res_asc *= abs_half_length;
    let mut error = ((res_kronrod - res_gauss) * half_length).abs();
    if res_asc != 0.0 && error != 0.0 {
        error = res_asc * (1.0f64).min((200.0 * error / res_asc).powf(1.5));
    }
    if res_abs > f64::MIN_POSITIVE / (50.0 * f64::EPSILON) {
        error = error.max(50.0 * f64::EPSILON * res_abs);
    }
    Ok(Segment { a, b, value, error })
}

/// Integrates `f` over `[a, b]`.
///
/// # Returns
/// * `Ok(QuadratureResult)` - estimate with diagnostics; `converged == false` when the cap or the
///   deadline stopped the refinement
/// * `Err(HenryError)` - invalid bounds/settings or a non-finite integrand sample
pub fn integrate<F: Fn(f64) -> f64>(
    f: F,
    a: f64,
    b: f64,
    settings: &QuadratureSettings,
) -> Result<QuadratureResult, HenryError> {
    settings.validate()?;
    if !a.is_finite() {
        return Err(HenryError::InvalidParameter {
            name: "lower bound",
            value: a,
        });
    }
    if !b.is_finite() || b < a {
        return Err(HenryError::InvalidParameter {
            name: "upper bound",
            value: b,
        });
    }
    if a == b {
        return Ok(QuadratureResult {
            value: 0.0,
            abs_error: 0.0,
            subdivisions: 0,
            evaluations: 0,
            converged: true,
            timed_out: false,
        });
    }
    if settings.sqrt_substitution {
        let g = |s: f64| 2.0 * s * f(a + s * s);
        adaptive(&g, 0.0, (b - a).sqrt(), settings)
    } else {
        adaptive(&f, a, b, settings)
    }
}

fn adaptive<F: Fn(f64) -> f64>(
    f: &F,
    a: f64,
    b: f64,
    settings: &QuadratureSettings,
) -> Result<QuadratureResult, HenryError> {
    let start = Instant::now();
    let first = gauss_kronrod_21(f, a, b)?;
    let mut evaluations = 21;
    let mut value = first.value;
    let mut error = first.error;
    let mut heap = BinaryHeap::with_capacity(settings.max_subdivisions + 1);
    heap.push(first);

    let mut converged = false;
    let mut timed_out = false;
    loop {
        let tolerance = settings.abs_tol.max(settings.rel_tol * value.abs());
        if error <= tolerance {
            converged = true;
            break;
        }
        if heap.len() >= settings.max_subdivisions {
            debug!(
                "subdivision cap {} reached, error {:e} > {:e}",
                settings.max_subdivisions, error, tolerance
            );
            break;
        }
        if let Some(limit) = settings.max_duration {
            if start.elapsed() > limit {
                timed_out = true;
                break;
            }
        }
        let Some(worst) = heap.pop() else { break };
        let mid = 0.5 * (worst.a + worst.b);
        if !(worst.a < mid && mid < worst.b) {
            // no more room to bisect in floating point
            heap.push(worst);
            break;
        }
        let left = gauss_kronrod_21(f, worst.a, mid)?;
        let right = gauss_kronrod_21(f, mid, worst.b)?;
        evaluations += 42;
        value += left.value + right.value - worst.value;
        error += left.error + right.error - worst.error;
        heap.push(left);
        heap.push(right);
    }

    // resum to get rid of the drift of the running sums
    let value: f64 = heap.iter().map(|s| s.value).sum();
    let abs_error: f64 = heap.iter().map(|s| s.error).sum();
    Ok(QuadratureResult {
        value,
        abs_error,
        subdivisions: heap.len(),
        evaluations,
        converged,
        timed_out,
    })
}
