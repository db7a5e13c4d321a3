//! Error type shared by the evaluators, the quadrature layer and the task loaders.
use std::fmt;
use thiserror::Error;

/// Which side of the interface a value refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Phase {
    /// inside the bubble (or the x > x0 half-space for the planar model)
    Gas,
    /// host medium
    Liquid,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Gas => write!(f, "gas"),
            Phase::Liquid => write!(f, "liquid"),
        }
    }
}

/// error types for the concentration evaluators
#[derive(Debug, Error)]
pub enum HenryError {
    #[error("Invalid parameter {name} = {value}: must be positive and finite")]
    InvalidParameter { name: &'static str, value: f64 },
    #[error(
        "Coordinate {r} is outside the {phase} domain {}",
        domain_label(.lower, .upper, .lower_open)
    )]
    OutOfDomain {
        phase: Phase,
        r: f64,
        lower: f64,
        upper: f64,
        /// `lower` itself is excluded
        lower_open: bool,
    },
    #[error("Numerical degeneracy: {0}")]
    NumericalDegeneracy(String),
    #[error(
        "Quadrature did not converge: value {value}, error estimate {abs_error} after {subdivisions} subdivisions"
    )]
    NonConvergence {
        value: f64,
        abs_error: f64,
        subdivisions: usize,
    },
    #[error("Quadrature deadline exceeded: partial value {value}, error estimate {abs_error}")]
    Timeout { value: f64, abs_error: f64 },
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// `[a, b]`, `(a, b]`, `[a, inf)` ...
fn domain_label(lower: &f64, upper: &f64, lower_open: &bool) -> String {
    let open = if *lower_open || lower.is_infinite() { '(' } else { '[' };
    let close = if upper.is_infinite() { ')' } else { ']' };
    format!("{}{}, {}{}", open, lower, upper, close)
}

/// Checks that a physical parameter is strictly positive and finite.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<f64, HenryError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(HenryError::InvalidParameter { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_positive() {
        assert_eq!(ensure_positive("Dg", 1.5).unwrap(), 1.5);
        assert!(matches!(
            ensure_positive("Dg", 0.0),
            Err(HenryError::InvalidParameter { name: "Dg", .. })
        ));
        assert!(ensure_positive("Dl", -1.0).is_err());
        assert!(ensure_positive("R0", f64::NAN).is_err());
        assert!(ensure_positive("He", f64::INFINITY).is_err());
    }

    #[test]
    fn test_error_messages() {
        let e = HenryError::OutOfDomain {
            phase: Phase::Gas,
            r: 2.0,
            lower: 0.0,
            upper: 1.0,
            lower_open: true,
        };
        assert_eq!(
            e.to_string(),
            "Coordinate 2 is outside the gas domain (0, 1]"
        );
        let e = HenryError::OutOfDomain {
            phase: Phase::Liquid,
            r: 0.5,
            lower: 1.0,
            upper: f64::INFINITY,
            lower_open: false,
        };
        assert_eq!(
            e.to_string(),
            "Coordinate 0.5 is outside the liquid domain [1, inf)"
        );
    }
}
