//! Batch evaluation over (time, radius) grids.
//!
//! Every entry is an independent evaluation. With the `parallel` feature the entries are
//! distributed over the rayon pool; the output order is the same either way (time-major).
//! A failing entry never stops the others, it is recorded in the field.
use super::field::ConcentrationField;
use super::models::{ConcentrationModel, Evaluation};
use crate::errors::{HenryError, Phase};
use log::{info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Below this many entries the grid is evaluated on the calling thread.
pub const PARALLEL_THRESHOLD: usize = 4;

#[cfg(feature = "parallel")]
fn map_indices<T, F>(n: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    if n >= PARALLEL_THRESHOLD {
        (0..n).into_par_iter().map(f).collect()
    } else {
        (0..n).map(f).collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn map_indices<T, F>(n: usize, f: F) -> Vec<T>
where
    F: Fn(usize) -> T,
{
    (0..n).map(f).collect()
}

fn evaluate_entries<M: ConcentrationModel + Sync + ?Sized>(
    model: &M,
    phase: Phase,
    radii: &[f64],
    times: &[f64],
) -> Vec<Result<Evaluation, HenryError>> {
    let nr = radii.len();
    let n = times.len() * nr;
    map_indices(n, |k| model.concentration(phase, radii[k % nr], times[k / nr]))
}

/// Evaluates `phase` on every (t, r) pair; rows are `times`, columns `radii`.
pub fn evaluate_field<M: ConcentrationModel + Sync + ?Sized>(
    model: &M,
    phase: Phase,
    radii: &[f64],
    times: &[f64],
) -> ConcentrationField {
    let results = evaluate_entries(model, phase, radii, times);
    let field = ConcentrationField::from_results(phase, model.model_name(), radii, times, results);
    info!(
        "{} {} field: {}x{} entries, {} failed, {} unconverged, max error estimate {:e}",
        model.model_name(),
        phase,
        times.len(),
        radii.len(),
        field.failures.len(),
        field.unconverged,
        field.max_error()
    );
    for (i, j, e) in &field.failures {
        warn!("entry (t = {}, r = {}) failed: {}", times[*i], radii[*j], e);
    }
    field
}

/// Gas values on `radii_inside` followed by liquid values on `radii_outside`, at one time.
#[derive(Debug)]
pub struct RadialProfile {
    pub t: f64,
    pub radii: Vec<f64>,
    pub values: Vec<f64>,
    pub phases: Vec<Phase>,
    pub failures: Vec<(usize, HenryError)>,
}

pub fn radial_profile<M: ConcentrationModel + Sync + ?Sized>(
    model: &M,
    t: f64,
    radii_inside: &[f64],
    radii_outside: &[f64],
) -> RadialProfile {
    let gas = evaluate_entries(model, Phase::Gas, radii_inside, &[t]);
    let liquid = evaluate_entries(model, Phase::Liquid, radii_outside, &[t]);

    let mut profile = RadialProfile {
        t,
        radii: Vec::with_capacity(radii_inside.len() + radii_outside.len()),
        values: Vec::with_capacity(radii_inside.len() + radii_outside.len()),
        phases: Vec::with_capacity(radii_inside.len() + radii_outside.len()),
        failures: Vec::new(),
    };
    let tagged = radii_inside
        .iter()
        .zip(gas)
        .map(|(r, res)| (*r, Phase::Gas, res))
        .chain(
            radii_outside
                .iter()
                .zip(liquid)
                .map(|(r, res)| (*r, Phase::Liquid, res)),
        );
    for (k, (r, phase, res)) in tagged.enumerate() {
        profile.radii.push(r);
        profile.phases.push(phase);
        match res {
            Ok(evaluation) => profile.values.push(evaluation.value),
            Err(e) => {
                warn!("profile point r = {} ({}) failed: {}", r, phase, e);
                profile.values.push(f64::NAN);
                profile.failures.push((k, e));
            }
        }
    }
    profile
}
