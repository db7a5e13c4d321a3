//! Concentration grid produced by batch evaluation.
use super::models::Evaluation;
use crate::errors::{HenryError, Phase};
use nalgebra::DMatrix;

/// Values and error estimates on a (time × radius) grid.
///
/// Row `i` belongs to `times[i]`, column `j` to `radii[j]`. An entry whose evaluation failed
/// holds `NaN` in both matrices and its error is kept in `failures`.
#[derive(Debug)]
pub struct ConcentrationField {
    pub phase: Phase,
    pub model_name: String,
    pub times: Vec<f64>,
    pub radii: Vec<f64>,
    pub values: DMatrix<f64>,
    pub errors: DMatrix<f64>,
    pub unit: String,
    /// (time index, radius index, error)
    pub failures: Vec<(usize, usize, HenryError)>,
    /// entries whose integral did not converge
    pub unconverged: usize,
    /// zero-denominator samples summed over the grid
    pub degenerate_samples: usize,
}

impl ConcentrationField {
    pub(crate) fn from_results(
        phase: Phase,
        model_name: &str,
        radii: &[f64],
        times: &[f64],
        results: Vec<Result<Evaluation, HenryError>>,
    ) -> Self {
        let (nt, nr) = (times.len(), radii.len());
        let mut values = DMatrix::from_element(nt, nr, f64::NAN);
        let mut errors = DMatrix::from_element(nt, nr, f64::NAN);
        let mut failures = Vec::new();
        let mut unconverged = 0;
        let mut degenerate_samples = 0;
        for (k, res) in results.into_iter().enumerate() {
            let (i, j) = (k / nr, k % nr);
            match res {
                Ok(evaluation) => {
                    values[(i, j)] = evaluation.value;
                    errors[(i, j)] = evaluation.abs_error;
                    if !evaluation.converged {
                        unconverged += 1;
                    }
                    degenerate_samples += evaluation.degenerate_samples;
                }
                Err(e) => failures.push((i, j, e)),
            }
        }
        Self {
            phase,
            model_name: model_name.to_string(),
            times: times.to_vec(),
            radii: radii.to_vec(),
            values,
            errors,
            unit: "mol/m³".to_string(),
            failures,
            unconverged,
            degenerate_samples,
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.values.shape()
    }

    pub fn value(&self, time_index: usize, radius_index: usize) -> f64 {
        self.values[(time_index, radius_index)]
    }

    pub fn error(&self, time_index: usize, radius_index: usize) -> f64 {
        self.errors[(time_index, radius_index)]
    }

    /// every entry evaluated without error
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// profile c(r) at `times[time_index]`
    pub fn profile_at(&self, time_index: usize) -> Vec<f64> {
        self.values.row(time_index).iter().copied().collect()
    }

    /// history c(t) at `radii[radius_index]`
    pub fn history_at(&self, radius_index: usize) -> Vec<f64> {
        self.values.column(radius_index).iter().copied().collect()
    }

    /// largest error estimate over the evaluated entries
    pub fn max_error(&self) -> f64 {
        self.errors
            .iter()
            .filter(|e| e.is_finite())
            .fold(0.0, |acc: f64, &e| acc.max(e))
    }

    /// values as nested rows, for serialization
    pub fn rows(&self) -> Vec<Vec<f64>> {
        (0..self.values.nrows()).map(|i| self.profile_at(i)).collect()
    }
}
